//! Discrete local extremum scan over the finite samples

use super::outcome::round4;
use super::{Extremum, ExtremumKind};

/// Local extrema of the finite `(x, y)` sequence
///
/// An interior point is a maximum when both neighbours are strictly lower and
/// a minimum when both are strictly higher. A run of equal values counts as a
/// single point at the midpoint of the run's `x` range when the values on
/// either side are both lower (or both higher). Endpoints are never reported.
pub fn find_extrema(points: &[(f64, f64)]) -> Vec<Extremum> {
    let mut extrema: Vec<Extremum> = Vec::new();
    let n = points.len();
    if n < 3 {
        return extrema;
    }

    let mut start = 1;
    while start < n - 1 {
        let y = points[start].1;
        // Extend over a plateau of equal values
        let mut end = start;
        while end + 1 < n - 1 && points[end + 1].1 == y {
            end += 1;
        }

        let before = points[start - 1].1;
        let after = points[end + 1].1;
        let kind = if before < y && after < y {
            Some(ExtremumKind::Maximum)
        } else if before > y && after > y {
            Some(ExtremumKind::Minimum)
        } else {
            None
        };

        if let Some(kind) = kind {
            let x = (points[start].0 + points[end].0) / 2.0;
            let extremum = Extremum {
                x: round4(x),
                y: round4(y),
                kind,
            };
            if extrema.last() != Some(&extremum) {
                extrema.push(extremum);
            }
        }

        start = end + 1;
    }

    extrema
}
