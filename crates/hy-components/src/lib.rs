//! hy-components: hydraulic element models for the hydronics engine.
//!
//! Provides:
//! - Darcy friction factor (laminar, Colebrook-White with a Swamee-Jain start)
//! - Darcy-Weisbach pressure drop of pipe segments with fitting allowances
//! - Fitting loss coefficients
//! - Kv relations, valve authority and lockshield preset catalogs
//! - Pump curves (tables or quadratic coefficients) and curve fitting
//! - Pipe sizing against velocity and Pa/m limits
//!
//! Every function here is a deterministic function of its inputs; iterative
//! solves carry explicit iteration bounds.
//!
//! # Example
//!
//! ```
//! use hy_components::{FlowRegime, darcy_weisbach, FrictionConfig};
//! use hy_core::units::{lps, m, mm};
//! use hy_fluids::{FluidProperties, Material, PipeMaterial};
//! use hy_graph::PipeGeometry;
//!
//! let run = PipeGeometry::new(mm(13.6), m(10.0));
//! let result = darcy_weisbach(
//!     &run,
//!     lps(0.1),
//!     &FluidProperties::water_20c(),
//!     &PipeMaterial::standard(Material::Copper),
//!     &FrictionConfig::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(result.regime, FlowRegime::Turbulent);
//! println!("Loss: {:.0} Pa", result.head_loss.value);
//! ```

pub mod common;
pub mod error;
pub mod fit;
pub mod fittings;
pub mod friction;
pub mod pipe;
pub mod pump;
pub mod sizing;
pub mod traits;
pub mod valve;

// Re-exports
pub use error::{ComponentError, ComponentResult};
pub use fittings::Fitting;
pub use friction::{FlowRegime, FrictionConfig, FrictionSolution, friction_factor};
pub use pipe::{PressureDropResult, darcy_weisbach, pressure_drop, pressure_drop_with};
pub use pump::{PumpCurve, PumpPoint};
pub use sizing::{PipeSize, SizingRules, size_pipe};
pub use traits::PumpCharacteristic;
pub use valve::{KvSelection, ValveCatalog, ValvePreset, authority, kv_for, valve_dp};
