//! Curve analysis: statistics, roots, extrema, inflection points, derivative,
//! area and arc length of one formula over an interval.
//!
//! Each field of [`AnalysisResult`] is computed on its own; a failure in one
//! (say, quadrature overflowing) leaves the others intact.

mod extrema;
mod inflection;
mod integration;
mod outcome;
mod roots;
mod sampling;
mod statistics;

pub use extrema::find_extrema;
pub use inflection::find_inflection_points;
pub use integration::{
    AdaptiveResult, DEFAULT_MAX_SUBDIVISIONS, DEFAULT_QUADRATURE_TOLERANCE, QuadratureConfig,
    arc_length, area_under_curve, integrate,
};
pub use outcome::{FiniteValue, Outcome, attempt, round4};
pub use roots::{Bisection, DEFAULT_TOLERANCE, bisect, find_roots, max_iterations, refine_sign_changes};
pub use sampling::{Sample, SampleSet};
pub use statistics::Statistics;

use tracing::debug;

use crate::{Analyzer, Derivatives, Formula, Unavailable};

/// A point on a curve, rounded to 4 decimals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtremumKind {
    Minimum,
    Maximum,
}

/// Local extremum, rounded to 4 decimals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremum {
    pub x: f64,
    pub y: f64,
    pub kind: ExtremumKind,
}

impl FiniteValue for Point {
    fn is_finite_value(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl FiniteValue for Extremum {
    fn is_finite_value(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Everything derived for one function
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub roots: Outcome<Vec<f64>>,
    pub extrema: Outcome<Vec<Extremum>>,
    pub inflection_points: Outcome<Vec<Point>>,
    /// First derivative as formula text
    pub derivative: Outcome<String>,
    pub area_under_curve: Outcome<f64>,
    pub arc_length: Outcome<f64>,
}

impl AnalysisResult {
    pub fn statistics(&self) -> Statistics {
        Statistics {
            min: self.min,
            max: self.max,
            mean: self.mean,
            median: self.median,
            std_dev: self.std_dev,
        }
    }

    /// True when a quadrature run was aborted by the cancellation token
    pub(crate) fn was_cancelled(&self) -> bool {
        [&self.area_under_curve, &self.arc_length]
            .iter()
            .any(|field| matches!(field, Err(Unavailable::Cancelled)))
    }
}

/// Analyse one formula over `[x_min, x_max]`
///
/// `None` when the formula does not parse or has no finite value on the
/// sample grid; such functions are left out of the result mapping.
pub(crate) fn analyze_formula(
    name: &str,
    text: &str,
    x_min: f64,
    x_max: f64,
    analyzer: &Analyzer,
) -> Option<AnalysisResult> {
    let formula = match Formula::parse_with(text, analyzer.parse_options) {
        Ok(f) => f,
        Err(e) => {
            debug!(name, error = %e, "function omitted: formula does not parse");
            return None;
        }
    };

    let samples = SampleSet::new(&formula, x_min, x_max, analyzer.resolution);
    let finite = samples.finite();
    let values: Vec<f64> = finite.iter().map(|&(_, y)| y).collect();
    let Some(stats) = Statistics::from_values(&values) else {
        debug!(name, "function omitted: no finite samples");
        return None;
    };

    let tolerance = analyzer.tolerance;
    let cancel = &analyzer.cancel;
    let quadrature = &analyzer.quadrature;
    let derivatives = Derivatives::of(&formula);

    let result = AnalysisResult {
        min: stats.min,
        max: stats.max,
        mean: stats.mean,
        median: stats.median,
        std_dev: stats.std_dev,
        roots: attempt(|| Ok::<_, Unavailable>(find_roots(&samples, &formula, tolerance))),
        extrema: attempt(|| Ok::<_, Unavailable>(find_extrema(&finite))),
        inflection_points: attempt(|| {
            find_inflection_points(
                &formula,
                derivatives.second(),
                &samples,
                tolerance,
                analyzer.parse_options,
            )
        }),
        derivative: attempt(|| Ok::<_, Unavailable>(derivatives.first().to_string())),
        area_under_curve: attempt(|| {
            area_under_curve(&formula, x_min, x_max, quadrature, cancel)
        }),
        arc_length: attempt(|| arc_length(derivatives.first(), x_min, x_max, quadrature, cancel)),
    };

    debug!(
        name,
        finite_samples = values.len(),
        roots = result.roots.as_ref().map_or(0, Vec::len),
        extrema = result.extrema.as_ref().map_or(0, Vec::len),
        "function analysed"
    );
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cubic_fields() {
        let result = analyze_formula("f", "x**3 - 3*x", -3.0, 3.0, &Analyzer::new()).unwrap();
        assert_eq!(result.derivative, Ok("3*x**2 - 3".to_string()));
        assert_eq!(result.roots, Ok(vec![-1.7321, 0.0, 1.7321]));

        let extrema = result.extrema.unwrap();
        assert_eq!(extrema.len(), 2);
        assert_eq!(extrema[0].kind, ExtremumKind::Maximum);
        assert!((extrema[0].x + 1.0).abs() < 1e-3);
        assert!((extrema[0].y - 2.0).abs() < 1e-4);
        assert_eq!(extrema[1].kind, ExtremumKind::Minimum);

        assert_eq!(result.inflection_points, Ok(vec![Point { x: 0.0, y: 0.0 }]));
        assert_eq!(result.area_under_curve, Ok(0.0));
        assert_eq!(result.min, -18.0);
        assert_eq!(result.max, 18.0);
    }

    #[test]
    fn test_inflection_y_off_axis() {
        let analyzer = Analyzer::new().tolerance(1e-10);
        let result =
            analyze_formula("f", "(x - 0.12345678)**3 + 1000*x", -1.0, 1.0, &analyzer).unwrap();
        assert_eq!(result.inflection_points, Ok(vec![Point { x: 0.1235, y: 123.4568 }]));
    }

    #[test]
    fn test_huge_constant_statistics() {
        let result = analyze_formula("f", "1e308 + 0*x", -1.0, 1.0, &Analyzer::new()).unwrap();
        assert!(result.mean.is_finite());
        assert!(result.std_dev.is_finite());
        assert_eq!(result.max, 1e308);
    }

    #[test]
    fn test_unparsable_is_omitted() {
        assert!(analyze_formula("f", "x +* 2", -1.0, 1.0, &Analyzer::new()).is_none());
    }

    #[test]
    fn test_nowhere_defined_is_omitted() {
        assert!(analyze_formula("f", "sqrt(x)", -2.0, -1.0, &Analyzer::new()).is_none());
    }

    #[test]
    fn test_partial_domain() {
        // log is undefined left of 0; the remaining fields still work
        let result = analyze_formula("f", "log(x)", -1.0, 2.0, &Analyzer::new()).unwrap();
        assert_eq!(result.roots, Ok(vec![1.0]));
        assert_eq!(result.derivative, Ok("1/x".to_string()));
        assert_eq!(result.extrema, Ok(vec![]));
        assert!(result.area_under_curve.is_ok());
    }

    #[test]
    fn test_statistics_accessor() {
        let result = analyze_formula("f", "2", 0.0, 1.0, &Analyzer::new()).unwrap();
        let stats = result.statistics();
        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(result.inflection_points, Ok(vec![]));
    }
}
