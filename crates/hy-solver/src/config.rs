//! Engine-wide configuration.

use crate::balancing::BalancingConfig;
use crate::duty::DutyMargins;
use crate::operating_point::OperatingPointConfig;
use crate::paths::HydraulicContext;
use hy_components::{FrictionConfig, SizingRules};
use hy_fluids::{FluidProperties, PipeMaterial};
use serde::{Deserialize, Serialize};

/// Every tunable of the engine; missing sections take their defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub friction: FrictionConfig,
    pub balancing: BalancingConfig,
    pub operating_point: OperatingPointConfig,
    pub duty: DutyMargins,
    pub sizing: SizingRules,
}

impl EngineConfig {
    /// Hydraulic context for `fluid` and `material` using this friction configuration.
    pub fn context(&self, fluid: FluidProperties, material: PipeMaterial) -> HydraulicContext {
        HydraulicContext::new(fluid, material).with_friction(self.friction)
    }
}
