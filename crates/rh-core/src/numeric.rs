use crate::{RhError, RhResult};

/// Floating point type used throughout the system.
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> RhResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(RhError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: Real, what: &'static str) -> RhResult<Real> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(RhError::NonPositive { what, value: v })
    }
}

/// Index and value of the first non-finite element, if any.
pub fn first_non_finite(values: &[Real]) -> Option<(usize, Real)> {
    values
        .iter()
        .copied()
        .enumerate()
        .find(|(_, v)| !v.is_finite())
}

/// Integer quotient `num / den`, snapped to the nearest integer when the
/// quotient lies within `rel` of it, otherwise floored.
///
/// `3.0 / 0.01` evaluates to `299.99999999999994`; this returns 300.
pub fn snapped_quotient(num: Real, den: Real, rel: Real) -> Real {
    let q = num / den;
    let nearest = q.round();
    if (q - nearest).abs() <= rel * nearest.abs().max(1.0) {
        nearest
    } else {
        q.floor()
    }
}
