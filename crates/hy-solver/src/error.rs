//! Error types for solver operations.

use crate::balancing::BalancingShortfall;
use crate::operating_point::NoOperatingPointReason;
use hy_components::ComponentError;
use hy_core::NodeId;
use hy_fluids::FluidError;
use hy_graph::TopologyError;
use thiserror::Error;

/// Errors that can occur while analysing a scope.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("No flow demand for terminal {terminal}")]
    MissingDemand { terminal: NodeId },

    #[error("Invalid flow demand for terminal {terminal}: {value} m³/s")]
    InvalidDemand { terminal: NodeId, value: f64 },

    #[error("No paths to analyse")]
    NoPaths,

    /// Balancing bound exhausted with some paths still outside tolerance.
    #[error("Balancing not achieved for {}", describe_shortfalls(.shortfalls))]
    BalancingNotAchieved { shortfalls: Vec<BalancingShortfall> },

    #[error("No operating point: pump appears {reason} for the system curve")]
    NoOperatingPoint { reason: NoOperatingPointReason },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type SolverResult<T> = Result<T, SolverError>;

fn describe_shortfalls(shortfalls: &[BalancingShortfall]) -> String {
    let parts: Vec<String> = shortfalls
        .iter()
        .map(|s| format!("terminal {} (residual {:+.1} Pa)", s.terminal, s.residual.value))
        .collect();
    parts.join(", ")
}
