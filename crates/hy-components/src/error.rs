//! Error types for component calculations.

use hy_core::{EdgeId, HyError};
use thiserror::Error;

/// Errors that can occur during component calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Colebrook-White iteration hit its bound without settling.
    #[error(
        "Friction factor did not converge{} at Re = {reynolds:.0} after {iterations} iterations (last f = {last_estimate:.6})",
        edge_label(.edge)
    )]
    FrictionConvergence {
        edge: Option<EdgeId>,
        reynolds: f64,
        last_estimate: f64,
        iterations: usize,
    },

    #[error("Value out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: f64 },

    #[error("Pump efficiency {value} is outside (0, 1]")]
    InvalidEfficiency { value: f64 },

    #[error("No candidate diameter carries {flow_m3ps} m³/s within the sizing rules")]
    NoSuitableSize { flow_m3ps: f64 },

    #[error("Curve fit failed: {what}")]
    CurveFit { what: &'static str },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

fn edge_label(edge: &Option<EdgeId>) -> String {
    match edge {
        Some(e) => format!(" on edge {e}"),
        None => String::new(),
    }
}

impl ComponentError {
    /// Attach the edge a friction failure happened on.
    pub fn on_edge(self, id: EdgeId) -> Self {
        match self {
            ComponentError::FrictionConvergence {
                reynolds,
                last_estimate,
                iterations,
                ..
            } => ComponentError::FrictionConvergence {
                edge: Some(id),
                reynolds,
                last_estimate,
                iterations,
            },
            other => other,
        }
    }
}

impl From<HyError> for ComponentError {
    fn from(e: HyError) -> Self {
        match e {
            HyError::NonFinite { what, .. } => ComponentError::NonPhysical { what },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ComponentError::NonPhysical { what: "density" };
        assert!(err.to_string().contains("density"));
    }

    #[test]
    fn friction_error_names_edge() {
        let err = ComponentError::FrictionConvergence {
            edge: None,
            reynolds: 1.0e5,
            last_estimate: 0.0191,
            iterations: 50,
        };
        assert!(!err.to_string().contains("edge"));

        let err = err.on_edge(EdgeId::from_index(7));
        let msg = err.to_string();
        assert!(msg.contains("on edge 7"));
        assert!(msg.contains("50 iterations"));
    }

    #[test]
    fn error_conversion() {
        let err: ComponentError = HyError::NonFinite {
            what: "flow",
            value: f64::NAN,
        }
        .into();
        assert_eq!(err, ComponentError::NonPhysical { what: "flow" });
    }
}
