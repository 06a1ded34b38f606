use crate::TlError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, TlError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(TlError::NonFinite { what, value: v })
    }
}

/// Running extremum that distinguishes "no samples yet" from a real value.
///
/// Replaces the classic +inf/-inf sentinel initialization so infinities never
/// cross an interface boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extremum {
    #[default]
    Unset,
    Value(Real),
}

impl Extremum {
    /// The tracked value, if any sample has been observed.
    pub fn value(self) -> Option<Real> {
        match self {
            Extremum::Unset => None,
            Extremum::Value(v) => Some(v),
        }
    }

    /// Track the running minimum.
    pub fn observe_min(&mut self, x: Real) {
        *self = match *self {
            Extremum::Unset => Extremum::Value(x),
            Extremum::Value(v) => Extremum::Value(v.min(x)),
        };
    }

    /// Track the running maximum.
    pub fn observe_max(&mut self, x: Real) {
        *self = match *self {
            Extremum::Unset => Extremum::Value(x),
            Extremum::Value(v) => Extremum::Value(v.max(x)),
        };
    }

    pub fn reset(&mut self) {
        *self = Extremum::Unset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn extremum_starts_unset() {
        let e = Extremum::default();
        assert_eq!(e.value(), None);
    }

    #[test]
    fn extremum_tracks_min_and_max() {
        let mut lo = Extremum::Unset;
        let mut hi = Extremum::Unset;
        for x in [3.0, -1.0, 2.0] {
            lo.observe_min(x);
            hi.observe_max(x);
        }
        assert_eq!(lo.value(), Some(-1.0));
        assert_eq!(hi.value(), Some(3.0));

        lo.reset();
        assert_eq!(lo.value(), None);
    }
}
