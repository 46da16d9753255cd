use crate::HyError;
use serde::{Deserialize, Serialize};

/// Absolute and relative slack for comparing computed quantities.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

/// Equal within `tol.abs`, or within `tol.rel` of the larger magnitude.
pub fn nearly_equal(a: f64, b: f64, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Relative change from `previous` to `next`, guarded against a zero reference.
pub fn relative_change(previous: f64, next: f64) -> f64 {
    let scale = previous.abs().max(next.abs());
    if scale == 0.0 {
        0.0
    } else {
        (next - previous).abs() / scale
    }
}

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, HyError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(HyError::NonFinite { what, value: v })
    }
}

/// Linear interpolation in a table sorted by ascending `x`.
///
/// Returns `None` outside the tabulated range; tables are never extrapolated.
pub fn interpolate(table: &[(f64, f64)], x: f64) -> Option<f64> {
    let first = table.first()?;
    let last = table.last()?;
    if x < first.0 || x > last.0 {
        return None;
    }
    for pair in table.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if x <= x1 {
            if x1 == x0 {
                return Some(y0);
            }
            let t = (x - x0) / (x1 - x0);
            return Some(y0 + t * (y1 - y0));
        }
    }
    Some(last.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressure_drops_compare_relatively() {
        let tol = Tolerances::default();
        assert!(nearly_equal(1200.0, 1200.0 + 1e-7, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1200.0, 1000.0, tol));
        assert!(!nearly_equal(1e-3, 2e-3, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(f64::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn relative_change_handles_zero() {
        assert_eq!(relative_change(0.0, 0.0), 0.0);
        assert!((relative_change(1.0, 1.1) - 0.1 / 1.1).abs() < 1e-15);
    }

    #[test]
    fn interpolate_inside_and_outside() {
        let table = [(0.0, 10.0), (10.0, 20.0), (20.0, 0.0)];
        assert_eq!(interpolate(&table, 5.0), Some(15.0));
        assert_eq!(interpolate(&table, 15.0), Some(10.0));
        assert_eq!(interpolate(&table, 20.0), Some(0.0));
        assert_eq!(interpolate(&table, -1.0), None);
        assert_eq!(interpolate(&table, 21.0), None);
        assert_eq!(interpolate(&[], 1.0), None);
    }
}
