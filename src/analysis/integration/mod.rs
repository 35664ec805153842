//! Area under the curve and arc length by adaptive Gauss-Kronrod quadrature

mod adaptive;
mod gauss_kronrod;

pub use adaptive::AdaptiveResult;

use tracing::warn;

use super::outcome::round4;
use crate::{CancellationToken, Expr, Formula, Unavailable};

/// Default absolute and relative tolerance
pub const DEFAULT_QUADRATURE_TOLERANCE: f64 = 1.49e-8;
/// Default cap on interval bisections
pub const DEFAULT_MAX_SUBDIVISIONS: usize = 50;

/// Quadrature settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureConfig {
    pub abs_tol: f64,
    pub rel_tol: f64,
    pub max_subdivisions: usize,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        QuadratureConfig {
            abs_tol: DEFAULT_QUADRATURE_TOLERANCE,
            rel_tol: DEFAULT_QUADRATURE_TOLERANCE,
            max_subdivisions: DEFAULT_MAX_SUBDIVISIONS,
        }
    }
}

impl QuadratureConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abs_tol(mut self, tol: f64) -> Self {
        self.abs_tol = tol;
        self
    }

    pub fn rel_tol(mut self, tol: f64) -> Self {
        self.rel_tol = tol;
        self
    }

    pub fn max_subdivisions(mut self, n: usize) -> Self {
        self.max_subdivisions = n;
        self
    }
}

/// Integrate `f` over `[a, b]`, rounded to 4 decimals
///
/// # Errors
/// `Cancelled` if `cancel` fires mid-run, `IntegrationFailure` if the result
/// is not finite.
pub fn integrate<F: Fn(f64) -> f64>(
    f: F,
    a: f64,
    b: f64,
    config: &QuadratureConfig,
    cancel: &CancellationToken,
) -> Result<f64, Unavailable> {
    let result = adaptive::adaptive_integrate(
        &f,
        a,
        b,
        config.abs_tol,
        config.rel_tol,
        config.max_subdivisions,
        cancel,
    )
    .ok_or(Unavailable::Cancelled)?;

    if !result.value.is_finite() {
        return Err(Unavailable::IntegrationFailure);
    }
    if !result.converged {
        warn!(
            a,
            b,
            value = result.value,
            error = result.error,
            intervals = result.intervals,
            "quadrature stopped before reaching its tolerance"
        );
    }
    Ok(round4(result.value))
}

/// Signed area between the curve and the x axis; undefined points count as 0
pub fn area_under_curve(
    formula: &Formula,
    a: f64,
    b: f64,
    config: &QuadratureConfig,
    cancel: &CancellationToken,
) -> Result<f64, Unavailable> {
    integrate(|x| formula.eval(x).unwrap_or(0.0), a, b, config, cancel)
}

/// Length of the curve from its derivative: ∫ sqrt(1 + f'(x)²) dx
///
/// Where `f'` cannot be evaluated the integrand is 0.
pub fn arc_length(
    derivative: &Expr,
    a: f64,
    b: f64,
    config: &QuadratureConfig,
    cancel: &CancellationToken,
) -> Result<f64, Unavailable> {
    let integrand = |x: f64| match derivative.eval_at(x) {
        Ok(slope) => (1.0 + slope * slope).sqrt(),
        Err(_) => 0.0,
    };
    integrate(integrand, a, b, config, cancel)
}
