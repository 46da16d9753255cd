//! hy-solver: hydraulic analysis of heating circuits.
//!
//! Provides:
//! - Design flow assignment from terminal demands up the supply tree
//! - Supply→return path enumeration with per-edge pressure drops
//! - Index circuit selection
//! - Balancing valve sizing with authority checks and discrete presets
//! - System curves and the pump operating point
//! - Pump duty with safety margins
//! - Per-scope analysis, run in parallel across independent scopes
//!
//! Every entry point is a deterministic function of its inputs. Iterative
//! stages carry explicit bounds and report exhaustion as an error.

pub mod analysis;
pub mod balancing;
pub mod config;
pub mod duty;
pub mod error;
pub mod flows;
pub mod index;
pub mod operating_point;
pub mod paths;

pub use analysis::{
    ScopeAnalysis, ScopeDesign, analyze_scope, analyze_scopes, design_scope, size_scope,
};
pub use balancing::{
    BalancingConfig, BalancingResult, BalancingShortfall, LowAuthorityWarning, ValveSizing,
    balance, balance_with_existing,
};
pub use config::EngineConfig;
pub use duty::{DutyMargins, PumpDuty, pump_duty};
pub use error::{SolverError, SolverResult};
pub use flows::{EdgeFlows, FlowDemands, assign_flows};
pub use index::{IndexCircuit, index_circuit};
pub use operating_point::{
    NoOperatingPointReason, OperatingPoint, OperatingPointConfig, SystemCurve, operating_point,
};
pub use paths::{HydraulicContext, PathResult, SegmentLoss, enumerate_paths};
