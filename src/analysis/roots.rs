//! Root localisation by bisection between sign-changing samples

use tracing::trace;

use super::outcome::round4;
use super::sampling::{Sample, SampleSet};
use crate::{EvalError, Formula, Unavailable};

/// Default bisection width at which a bracket counts as converged
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Converged bracket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bisection {
    /// Midpoint of the final bracket, unrounded
    pub midpoint: f64,
    pub iterations: u32,
}

/// Largest number of halvings needed to shrink `width` below `tolerance`
pub fn max_iterations(width: f64, tolerance: f64) -> u32 {
    if !(width > tolerance) || !(tolerance > 0.0) {
        return 0;
    }
    // f64 has 2^11 exponent range, so the count stays far below u32::MAX
    (width / tolerance).log2().ceil().min(f64::from(u32::MAX)) as u32
}

/// Bisect `[x1, x2]` where `y1 = f(x1)` and `f(x2)` have opposite signs (or one is zero)
///
/// While the bracket is wider than `tolerance` the midpoint is evaluated; if
/// `f(mid) * y1 <= 0` the right bound moves in, otherwise the left bound moves
/// and `y1` follows it. Halving stops after [`max_iterations`] steps or when the
/// midpoint can no longer be told apart from an endpoint.
///
/// # Errors
/// `ConvergenceFailure` if `f` is undefined at any midpoint.
pub fn bisect<F>(f: F, x1: f64, y1: f64, x2: f64, tolerance: f64) -> Result<Bisection, Unavailable>
where
    F: Fn(f64) -> Result<f64, EvalError>,
{
    let (mut x1, mut y1, mut x2) = (x1, y1, x2);
    let cap = max_iterations((x2 - x1).abs(), tolerance);
    let mut iterations = 0;

    while (x2 - x1).abs() > tolerance && iterations < cap {
        let mid = (x1 + x2) / 2.0;
        if mid == x1 || mid == x2 {
            break;
        }
        let y_mid = f(mid).map_err(|_| Unavailable::ConvergenceFailure)?;
        iterations += 1;

        if y_mid * y1 <= 0.0 {
            x2 = mid;
        } else {
            x1 = mid;
            y1 = y_mid;
        }
    }

    Ok(Bisection {
        midpoint: (x1 + x2) / 2.0,
        iterations,
    })
}

/// Refine every sign change between adjacent finite samples into a root
///
/// Roots are unrounded bisection midpoints ordered by `x`; neighbours that
/// agree to 4 decimals are reported once. A bracket whose bisection fails is
/// skipped. A converged point where `f` is undefined, or larger in magnitude
/// than both bracket ends, is a pole rather than a root and is skipped as well.
pub fn refine_sign_changes<F>(samples: &[Sample], f: F, tolerance: f64) -> Vec<f64>
where
    F: Fn(f64) -> Result<f64, EvalError>,
{
    let mut roots: Vec<f64> = Vec::new();

    for pair in samples.windows(2) {
        let ((x1, Some(y1)), (x2, Some(y2))) = (pair[0], pair[1]) else {
            continue;
        };
        if !(y1 * y2 <= 0.0) {
            continue;
        }

        let bisection = match bisect(&f, x1, y1, x2, tolerance) {
            Ok(b) => b,
            Err(reason) => {
                trace!(x1, x2, %reason, "bracket aborted");
                continue;
            }
        };

        let bound = y1.abs().max(y2.abs());
        match f(bisection.midpoint) {
            Ok(v) if v.abs() <= bound => {}
            _ => {
                trace!(x = bisection.midpoint, "sign change across a pole rejected");
                continue;
            }
        }

        let root = bisection.midpoint;
        if roots.last().map(|&r| round4(r)) != Some(round4(root)) {
            roots.push(root);
        }
    }

    roots
}

/// Roots of `formula` located from the sign changes in `samples`, rounded to 4 decimals
pub fn find_roots(samples: &SampleSet, formula: &Formula, tolerance: f64) -> Vec<f64> {
    refine_sign_changes(samples.samples(), |x| formula.eval(x), tolerance)
        .into_iter()
        .map(round4)
        .collect()
}
