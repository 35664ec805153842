//! Adaptive subdivision driven by the largest error estimate

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::gauss_kronrod::g7k15;
use crate::CancellationToken;

/// Result of adaptive integration.
#[derive(Clone, Copy, Debug)]
pub struct AdaptiveResult {
    /// Computed integral value
    pub value: f64,
    /// Estimated absolute error
    pub error: f64,
    /// Number of subintervals used
    pub intervals: usize,
    /// Whether the tolerance was met
    pub converged: bool,
}

/// An interval with its contribution and error estimate.
#[derive(Clone, Debug)]
struct Interval {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Interval {}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Interval {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap by error (largest error first)
        self.error.total_cmp(&other.error)
    }
}

/// Integrate `f` over `[a, b]` with at most `max_subdivisions` bisections
///
/// Converged when the summed error estimate is within
/// `max(abs_tol, rel_tol * |value|)`. Returns `None` if `cancel` fires.
pub(crate) fn adaptive_integrate<F: Fn(f64) -> f64>(
    f: &F,
    a: f64,
    b: f64,
    abs_tol: f64,
    rel_tol: f64,
    max_subdivisions: usize,
    cancel: &CancellationToken,
) -> Option<AdaptiveResult> {
    let tolerance = |value: f64| abs_tol.max(rel_tol * value.abs());

    let initial = g7k15(f, a, b);

    // Priority queue ordered by error (largest first)
    let mut heap: BinaryHeap<Interval> = BinaryHeap::new();
    heap.push(Interval {
        a,
        b,
        value: initial.value,
        error: initial.error,
    });

    let mut subdivisions = 0;
    loop {
        // Summed afresh each pass, never updated incrementally
        let (value, error) = totals(&heap);
        if error <= tolerance(value) || subdivisions >= max_subdivisions {
            break;
        }

        if cancel.is_cancelled() {
            return None;
        }

        // Pop interval with largest error
        let Some(interval) = heap.pop() else {
            break;
        };
        subdivisions += 1;

        let mid = (interval.a + interval.b) / 2.0;
        let left = g7k15(f, interval.a, mid);
        let right = g7k15(f, mid, interval.b);

        heap.push(Interval {
            a: interval.a,
            b: mid,
            value: left.value,
            error: left.error,
        });
        heap.push(Interval {
            a: mid,
            b: interval.b,
            value: right.value,
            error: right.error,
        });
    }

    let (value, error) = totals(&heap);

    Some(AdaptiveResult {
        value,
        error,
        intervals: heap.len(),
        converged: error <= tolerance(value),
    })
}

/// Summed value and error estimate over all intervals
fn totals(heap: &BinaryHeap<Interval>) -> (f64, f64) {
    heap.iter()
        .fold((0.0, 0.0), |(value, error), i| (value + i.value, error + i.error))
}
