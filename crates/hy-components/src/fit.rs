//! Linear least-squares fitting for characteristic curves.

use crate::error::{ComponentError, ComponentResult};
use nalgebra::{DMatrix, DVector};

/// Least-squares coefficients `c` minimising `Σ (rows[i]·c − values[i])²`.
///
/// Columns are scaled to unit magnitude before the normal equations are
/// formed, so flows in m³/s and their squares can share one system.
///
/// # Errors
/// `CurveFit` with fewer samples than coefficients, an all-zero column, or a
/// singular system.
pub fn least_squares<const N: usize>(
    rows: &[[f64; N]],
    values: &[f64],
) -> ComponentResult<[f64; N]> {
    if rows.len() != values.len() {
        return Err(ComponentError::CurveFit {
            what: "sample and value counts differ",
        });
    }
    if rows.len() < N {
        return Err(ComponentError::CurveFit {
            what: "fewer samples than coefficients",
        });
    }

    let mut scale = [0.0_f64; N];
    for row in rows {
        for (s, v) in scale.iter_mut().zip(row.iter()) {
            *s = s.max(v.abs());
        }
    }
    if scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
        return Err(ComponentError::CurveFit {
            what: "degenerate basis column",
        });
    }

    let a = DMatrix::from_fn(rows.len(), N, |i, j| rows[i][j] / scale[j]);
    let b = DVector::from_column_slice(values);
    let ata = a.transpose() * &a;
    let atb = a.transpose() * b;

    let solution = ata.lu().solve(&atb).ok_or(ComponentError::CurveFit {
        what: "normal equations are singular",
    })?;

    let mut coefficients = [0.0; N];
    for (j, c) in coefficients.iter_mut().enumerate() {
        *c = solution[j] / scale[j];
        if !c.is_finite() {
            return Err(ComponentError::CurveFit {
                what: "non-finite coefficient",
            });
        }
    }
    Ok(coefficients)
}
