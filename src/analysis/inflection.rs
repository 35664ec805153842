//! Inflection points: sign changes of the symbolic second derivative

use super::outcome::round4;
use super::roots::refine_sign_changes;
use super::sampling::{Sample, SampleSet};
use super::Point;
use crate::parser::ParseOptions;
use crate::{Expr, Formula, Unavailable};

/// Locate inflection points of `formula` from its second derivative
///
/// The second derivative is substituted directly at every sample `x`; brackets
/// where it changes sign are refined by bisection against the second
/// derivative re-parsed from its printed form under `options`, and `y` comes
/// from `formula` at the refined `x` before both are rounded. A constant second
/// derivative has no inflection points.
///
/// # Errors
/// `Parse` if the printed second derivative does not parse back.
pub fn find_inflection_points(
    formula: &Formula,
    second: &Expr,
    samples: &SampleSet,
    tolerance: f64,
    options: ParseOptions,
) -> Result<Vec<Point>, Unavailable> {
    if second.as_number().is_some() {
        return Ok(Vec::new());
    }

    let reparsed = Formula::parse_with(&second.to_string(), options)?;

    let curvature: Vec<Sample> = samples
        .samples()
        .iter()
        .map(|&(x, _)| (x, second.eval_at(x).ok()))
        .collect();

    let points = refine_sign_changes(&curvature, |x| reparsed.eval(x), tolerance)
        .into_iter()
        .filter_map(|x| {
            let y = formula.eval(x).ok()?;
            Some(Point {
                x: round4(x),
                y: round4(y),
            })
        })
        .collect();

    Ok(points)
}
