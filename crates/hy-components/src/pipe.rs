//! Pipe pressure drop using the Darcy-Weisbach equation.

use crate::common::{EPSILON_FLOW, bore_area, check_finite, check_positive};
use crate::error::{ComponentError, ComponentResult};
use crate::friction::{FlowRegime, FrictionConfig, friction_factor, reynolds};
use hy_core::units::{Pressure, Velocity, VolumeRate, mps, pa};
use hy_fluids::{FluidProperties, PipeMaterial};
use hy_graph::{Edge, FittingAllowance, PipeGeometry};
use serde::{Deserialize, Serialize};

/// Loss across one pipe segment at a given flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureDropResult {
    /// Total loss including fittings (Pa).
    pub head_loss: Pressure,
    pub velocity: Velocity,
    pub reynolds: f64,
    pub friction_factor: f64,
    pub regime: FlowRegime,
}

impl PressureDropResult {
    pub fn no_flow() -> Self {
        Self {
            head_loss: pa(0.0),
            velocity: mps(0.0),
            reynolds: 0.0,
            friction_factor: 0.0,
            regime: FlowRegime::NoFlow,
        }
    }
}

/// Pressure drop along an edge at `flow`, with the default friction solver.
///
/// # Errors
/// `FrictionConvergence` naming the edge if Colebrook-White does not settle,
/// `InvalidArg` for negative flow.
pub fn pressure_drop(
    edge: &Edge,
    flow: VolumeRate,
    fluid: &FluidProperties,
    material: &PipeMaterial,
) -> ComponentResult<PressureDropResult> {
    pressure_drop_with(edge, flow, fluid, material, &FrictionConfig::default())
}

/// Pressure drop along an edge with an explicit friction configuration.
pub fn pressure_drop_with(
    edge: &Edge,
    flow: VolumeRate,
    fluid: &FluidProperties,
    material: &PipeMaterial,
    config: &FrictionConfig,
) -> ComponentResult<PressureDropResult> {
    darcy_weisbach(&edge.geometry, flow, fluid, material, config).map_err(|e| e.on_edge(edge.id))
}

/// Darcy-Weisbach loss for a pipe geometry.
///
/// ```text
/// Δp = (f·(L + Le)/D + ΣK) · ρv²/2
/// ```
pub fn darcy_weisbach(
    geometry: &PipeGeometry,
    flow: VolumeRate,
    fluid: &FluidProperties,
    material: &PipeMaterial,
    config: &FrictionConfig,
) -> ComponentResult<PressureDropResult> {
    let q = flow.value;
    check_finite(q, "flow rate")?;
    if q < 0.0 {
        return Err(ComponentError::InvalidArg {
            what: "flow rate cannot be negative",
        });
    }

    let d = geometry.diameter.value;
    check_positive(d, "pipe diameter")?;
    check_positive(fluid.density.value, "density")?;
    check_positive(fluid.viscosity.value, "viscosity")?;

    if q < EPSILON_FLOW {
        return Ok(PressureDropResult::no_flow());
    }

    let (extra_length, k_sum) = match geometry.fittings {
        FittingAllowance::None => (0.0, 0.0),
        FittingAllowance::EquivalentLength(le) => (le.value, 0.0),
        FittingAllowance::KSum(k) => (0.0, k),
    };
    let l_eff = geometry.length.value + extra_length;

    let rho = fluid.density.value;
    let v = q / bore_area(d);
    let re = reynolds(v, d, fluid.kinematic_viscosity());
    check_finite(re, "Reynolds number")?;

    let friction = friction_factor(re, material.roughness.value / d, config)?;
    let dynamic = 0.5 * rho * v * v;
    let dp = (friction.factor * l_eff / d + k_sum) * dynamic;
    check_finite(dp, "pressure drop")?;

    Ok(PressureDropResult {
        head_loss: pa(dp),
        velocity: mps(v),
        reynolds: re,
        friction_factor: friction.factor,
        regime: friction.regime,
    })
}
