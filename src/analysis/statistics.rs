/// Descriptive statistics of the finite sampled values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation
    pub std_dev: f64,
}

impl Statistics {
    /// `None` when `values` is empty
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        // Sums run on values scaled by a power of two into [-2, 2] so finite
        // input near f64::MAX cannot overflow
        let exponent = min.abs().max(max.abs()).log2().ceil().clamp(-1022.0, 1023.0);
        let scale = 2.0_f64.powi(exponent as i32);
        let scaled_mean = values.iter().map(|v| v / scale).sum::<f64>() / n;
        let mean = scaled_mean * scale;

        // Two-pass variance avoids the cancellation of sum-of-squares
        let variance = values
            .iter()
            .map(|v| (v / scale - scaled_mean).powi(2))
            .sum::<f64>()
            / n;

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            sorted[mid - 1] / 2.0 + sorted[mid] / 2.0
        } else {
            sorted[mid]
        };

        Some(Statistics {
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt() * scale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_huge_values_stay_finite() {
        let s = Statistics::from_values(&[1e308, 1e308, 1e308]).unwrap();
        assert!((s.mean / 1e308 - 1.0).abs() < 1e-12);
        assert_eq!(s.median, 1e308);
        assert!(s.std_dev / 1e308 < 1e-12);

        let s = Statistics::from_values(&[-1.5e308, 1.5e308]).unwrap();
        assert_eq!(s.mean, 0.0);
        assert_eq!(s.median, 0.0);
        assert!((s.std_dev / 1.5e308 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty() {
        assert_eq!(Statistics::from_values(&[]), None);
    }

    #[test]
    fn test_odd_count() {
        let s = Statistics::from_values(&[3.0, 1.0, 2.0]).unwrap();
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 3.0);
        assert_eq!(s.mean, 2.0);
        assert_eq!(s.median, 2.0);
        assert!((s.std_dev - (2.0_f64 / 3.0).sqrt()).abs() < 1e-15);
    }

    #[test]
    fn test_even_count_median() {
        let s = Statistics::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(s.median, 2.5);
    }

    #[test]
    fn test_population_std() {
        let s = Statistics::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(s.std_dev, 2.0);
    }
}
