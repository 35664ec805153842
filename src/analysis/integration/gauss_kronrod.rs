//! Gauss-Kronrod G7/K15 rule
//!
//! The 15-point Kronrod rule embeds the 7-point Gauss rule, so one set of
//! evaluations yields both an estimate and its error.

/// 15-point Kronrod nodes on [0, 1] (symmetric about 0; only non-negative listed)
const KRONROD_NODES: [f64; 8] = [
    0.0,
    0.207784955007898467600689403773245,
    0.405845151377397166906606412076961,
    0.586087235467691130294144838258730,
    0.741531185599394439863864773280788,
    0.864864423359769072789712788640926,
    0.949107912342758524526189684047851,
    0.991455371120812639206854697526329,
];

/// Kronrod weights (for positive nodes, same weight for negative)
const KRONROD_WEIGHTS: [f64; 8] = [
    0.209482141084727828012999174891714,
    0.204432940075298892414161999234649,
    0.190350578064785409913256402421014,
    0.169004726639267902826583426598550,
    0.140653259715525918745189590510238,
    0.104790010322250183839876322541518,
    0.063092092629978553290700663189204,
    0.022935322010529224963732008058970,
];

/// Gauss weights for the Kronrod nodes at indices 0, 2, 4, 6
const GAUSS_WEIGHTS: [f64; 4] = [
    0.417959183673469387755102040816327,
    0.381830050505118944950369775488975,
    0.279705391489276667901467771423780,
    0.129484966168869693270611432679082,
];

/// Estimate over one interval
#[derive(Clone, Copy, Debug)]
pub(crate) struct GkEstimate {
    /// Kronrod value
    pub value: f64,
    /// |Kronrod - Gauss|
    pub error: f64,
}

/// Apply G7/K15 to `f` over `[a, b]`
pub(crate) fn g7k15<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64) -> GkEstimate {
    let mid = (a + b) / 2.0;
    let half_length = (b - a) / 2.0;

    let f_center = f(mid);
    let mut kronrod_sum = KRONROD_WEIGHTS[0] * f_center;
    let mut gauss_sum = GAUSS_WEIGHTS[0] * f_center;

    // Symmetric pairs
    for i in 1..KRONROD_NODES.len() {
        let offset = half_length * KRONROD_NODES[i];
        let f_sum = f(mid - offset) + f(mid + offset);
        kronrod_sum += KRONROD_WEIGHTS[i] * f_sum;
        if i % 2 == 0 {
            gauss_sum += GAUSS_WEIGHTS[i / 2] * f_sum;
        }
    }

    let value = half_length * kronrod_sum;
    let gauss_value = half_length * gauss_sum;
    GkEstimate {
        value,
        error: (value - gauss_value).abs(),
    }
}
