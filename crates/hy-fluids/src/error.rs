//! Fluid property errors.

use hy_core::HyError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur while building fluid or material records.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (negative density, viscosity, roughness).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Value outside the tabulated range.
    #[error("Value out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: f64 },
}

impl From<HyError> for FluidError {
    fn from(err: HyError) -> Self {
        match err {
            HyError::NonFinite { what, .. } => FluidError::NonPhysical { what },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FluidError::OutOfRange {
            what: "water temperature",
            value: 120.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("water temperature"));
        assert!(msg.contains("120"));
    }

    #[test]
    fn non_finite_maps_to_non_physical() {
        let err: FluidError = HyError::NonFinite {
            what: "density",
            value: f64::NAN,
        }
        .into();
        assert_eq!(err, FluidError::NonPhysical { what: "density" });
    }
}
