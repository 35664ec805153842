//! Evenly spaced samples of a formula over a closed interval

use crate::Formula;

/// One sample: `x` and the value there, `None` where the formula is undefined
pub type Sample = (f64, Option<f64>);

/// Ordered samples over `[x_min, x_max]`, gaps included
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    samples: Vec<Sample>,
}

impl SampleSet {
    /// Sample `formula` at `n` points (at least two) from `x_min` to `x_max`
    ///
    /// `x_i = x_min + i*step` with `step = (x_max - x_min)/(n - 1)`; the last
    /// point is pinned to `x_max` so rounding never drops the right end.
    pub fn new(formula: &Formula, x_min: f64, x_max: f64, n: usize) -> Self {
        let n = n.max(2);
        let step = (x_max - x_min) / (n - 1) as f64;
        let mut stack = Vec::with_capacity(formula.compiled().stack_size());

        let samples = (0..n)
            .map(|i| {
                let x = if i == n - 1 {
                    x_max
                } else {
                    x_min + i as f64 * step
                };
                (x, formula.eval_with_stack(x, &mut stack).ok())
            })
            .collect();

        SampleSet { samples }
    }

    /// Build from precomputed samples
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        SampleSet { samples }
    }

    /// Full sequence, gaps included
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// The `(x, y)` pairs with a finite value, in order
    pub fn finite(&self) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .filter_map(|&(x, y)| y.filter(|v| v.is_finite()).map(|v| (x, v)))
            .collect()
    }

    pub fn finite_values(&self) -> Vec<f64> {
        self.finite().into_iter().map(|(_, y)| y).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn has_finite(&self) -> bool {
        self.samples.iter().any(|(_, y)| y.is_some_and(f64::is_finite))
    }
}
