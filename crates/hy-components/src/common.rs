//! Common utilities for component calculations.

use crate::error::{ComponentError, ComponentResult};
use hy_core::numeric::ensure_finite;

/// Flows below this (m³/s) are treated as no flow.
pub const EPSILON_FLOW: f64 = 1e-12;

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })?;
    Ok(())
}

/// Ensure a value is finite and strictly positive.
pub fn check_positive(value: f64, what: &'static str) -> ComponentResult<()> {
    check_finite(value, what)?;
    if value <= 0.0 {
        return Err(ComponentError::NonPhysical { what });
    }
    Ok(())
}

/// Ensure a value is finite and not negative.
pub fn check_non_negative(value: f64, what: &'static str) -> ComponentResult<()> {
    check_finite(value, what)?;
    if value < 0.0 {
        return Err(ComponentError::InvalidArg { what });
    }
    Ok(())
}

/// Cross-sectional area of a round bore (m²).
pub fn bore_area(diameter: f64) -> f64 {
    std::f64::consts::PI * diameter * diameter / 4.0
}
