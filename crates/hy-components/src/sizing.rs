//! Pipe sizing against velocity and specific pressure drop limits.

use crate::error::{ComponentError, ComponentResult};
use crate::friction::FrictionConfig;
use crate::pipe::darcy_weisbach;
use hy_core::units::{Length, Velocity, VolumeRate, m, mm, mps};
use hy_fluids::{FluidProperties, PipeMaterial};
use hy_graph::PipeGeometry;
use serde::{Deserialize, Serialize};

/// Internal bores of EN 1057 copper tube, 10 mm to 54 mm outside diameter.
pub const COPPER_EN1057_BORES_MM: [f64; 8] = [8.6, 10.6, 13.6, 20.2, 26.2, 33.0, 39.6, 51.6];

/// Limits a selected bore must satisfy at its design flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingRules {
    pub max_velocity: Velocity,
    /// Maximum straight-pipe loss (Pa/m); unlimited when `None`.
    pub max_pa_per_m: Option<f64>,
}

impl Default for SizingRules {
    fn default() -> Self {
        Self {
            max_velocity: mps(0.8),
            max_pa_per_m: None,
        }
    }
}

/// Chosen bore and its duty at the design flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipeSize {
    pub diameter: Length,
    pub velocity: Velocity,
    pub pa_per_m: f64,
}

pub fn copper_bores() -> Vec<Length> {
    COPPER_EN1057_BORES_MM.iter().map(|&d| mm(d)).collect()
}

/// Straight-pipe loss per metre of bore `diameter` at `flow`.
pub fn specific_pressure_drop(
    diameter: Length,
    flow: VolumeRate,
    fluid: &FluidProperties,
    material: &PipeMaterial,
    config: &FrictionConfig,
) -> ComponentResult<PipeSize> {
    let unit_run = PipeGeometry::new(diameter, m(1.0));
    let r = darcy_weisbach(&unit_run, flow, fluid, material, config)?;
    Ok(PipeSize {
        diameter,
        velocity: r.velocity,
        pa_per_m: r.head_loss.value,
    })
}

/// Smallest candidate bore that carries `flow` within `rules`.
///
/// # Errors
/// `NoSuitableSize` when even the largest candidate breaks a limit.
pub fn size_pipe(
    flow: VolumeRate,
    candidates: &[Length],
    fluid: &FluidProperties,
    material: &PipeMaterial,
    rules: &SizingRules,
    config: &FrictionConfig,
) -> ComponentResult<PipeSize> {
    let mut bores: Vec<Length> = candidates.to_vec();
    bores.sort_by(|a, b| a.value.total_cmp(&b.value));

    for diameter in bores {
        let size = specific_pressure_drop(diameter, flow, fluid, material, config)?;
        let velocity_ok = size.velocity.value <= rules.max_velocity.value;
        let gradient_ok = rules.max_pa_per_m.is_none_or(|limit| size.pa_per_m <= limit);
        if velocity_ok && gradient_ok {
            return Ok(size);
        }
    }

    Err(ComponentError::NoSuitableSize {
        flow_m3ps: flow.value,
    })
}
