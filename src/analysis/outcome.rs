//! Per-field results
//!
//! Every field of an analysis result is computed independently; a failure in
//! one never hides the others. `Ok(vec![])` means a search ran and found
//! nothing, `Err(reason)` means it could not run.

use crate::{EvalError, Unavailable};

/// Result of one analysis field
pub type Outcome<T> = Result<T, Unavailable>;

/// Values whose every number must be finite to be reported
pub trait FiniteValue {
    fn is_finite_value(&self) -> bool;
}

impl FiniteValue for f64 {
    fn is_finite_value(&self) -> bool {
        self.is_finite()
    }
}

impl FiniteValue for String {
    fn is_finite_value(&self) -> bool {
        true
    }
}

impl<T: FiniteValue> FiniteValue for Vec<T> {
    fn is_finite_value(&self) -> bool {
        self.iter().all(FiniteValue::is_finite_value)
    }
}

/// Run one field computation, turning its error and any non-finite value into
/// an [`Unavailable`] reason
pub fn attempt<T, E>(compute: impl FnOnce() -> Result<T, E>) -> Outcome<T>
where
    T: FiniteValue,
    E: Into<Unavailable>,
{
    let value = compute().map_err(Into::into)?;
    if value.is_finite_value() {
        Ok(value)
    } else {
        Err(Unavailable::Domain(EvalError::NonFinite))
    }
}

/// Round to 4 decimal places, ties to even; values too large to scale are returned as-is
pub fn round4(v: f64) -> f64 {
    let scaled = v * 1e4;
    if !scaled.is_finite() {
        return v;
    }
    // `+ 0.0` turns -0 into 0
    scaled.round_ties_even() / 1e4 + 0.0
}
