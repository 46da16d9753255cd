//! Required pump duty from the index circuit.

use crate::error::{SolverError, SolverResult};
use hy_core::units::{Length, Power, Pressure, VolumeRate, m3ps, pa, w};
use hy_fluids::FluidProperties;
use serde::{Deserialize, Serialize};

/// Safety margins and efficiency applied when sizing a circulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DutyMargins {
    pub flow_factor: f64,
    pub head_factor: f64,
    /// Overall pump and motor efficiency in (0, 1].
    pub efficiency: f64,
}

impl Default for DutyMargins {
    fn default() -> Self {
        Self {
            flow_factor: 1.05,
            head_factor: 1.10,
            efficiency: 0.45,
        }
    }
}

/// Duty point a circulator must meet, margins included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PumpDuty {
    pub flow: VolumeRate,
    pub head: Length,
    pub pressure: Pressure,
    /// Q·Δp
    pub hydraulic_power: Power,
    pub electrical_power: Power,
}

/// Duty for `total_flow` against the index pressure drop `index_dp`.
///
/// # Errors
/// `InvalidArg` for a non-positive flow or pressure drop, a margin below one
/// or an efficiency outside (0, 1].
pub fn pump_duty(
    total_flow: VolumeRate,
    index_dp: Pressure,
    fluid: &FluidProperties,
    margins: &DutyMargins,
) -> SolverResult<PumpDuty> {
    if !total_flow.value.is_finite() || total_flow.value <= 0.0 {
        return Err(SolverError::InvalidArg {
            what: "duty flow must be positive",
        });
    }
    if !index_dp.value.is_finite() || index_dp.value <= 0.0 {
        return Err(SolverError::InvalidArg {
            what: "duty pressure drop must be positive",
        });
    }
    if margins.flow_factor < 1.0 || margins.head_factor < 1.0 {
        return Err(SolverError::InvalidArg {
            what: "duty margins cannot be below one",
        });
    }
    if !(margins.efficiency > 0.0 && margins.efficiency <= 1.0) {
        return Err(SolverError::InvalidArg {
            what: "pump efficiency must lie in (0, 1]",
        });
    }

    let q = total_flow.value * margins.flow_factor;
    let dp = index_dp.value * margins.head_factor;
    let hydraulic = q * dp;

    Ok(PumpDuty {
        flow: m3ps(q),
        head: fluid.head_from_pressure(pa(dp)),
        pressure: pa(dp),
        hydraulic_power: w(hydraulic),
        electrical_power: w(hydraulic / margins.efficiency),
    })
}
