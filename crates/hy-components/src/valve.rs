//! Balancing valve relations and selectable presets.
//!
//! ## Kv convention
//!
//! Kv follows IEC 60534: the flow in m³/h of water (ρ = 1000 kg/m³) passed
//! at a pressure drop of 1 bar.
//!
//! ```text
//! Q[m³/h] = Kv · sqrt(Δp[bar] · 1000 / ρ)
//! ```

use crate::common::{check_finite, check_non_negative, check_positive};
use crate::error::{ComponentError, ComponentResult};
use hy_core::units::{Density, Pressure, VolumeRate, pa, to_m3ph};
use serde::{Deserialize, Serialize};

/// Reference density of the Kv definition (kg/m³).
pub const KV_REFERENCE_DENSITY: f64 = 1000.0;

const PA_PER_BAR: f64 = 1.0e5;

/// Kv that drops `dp` at `flow`.
///
/// # Errors
/// `InvalidArg` unless flow and pressure drop are strictly positive.
pub fn kv_for(flow: VolumeRate, dp: Pressure, density: Density) -> ComponentResult<f64> {
    check_positive(flow.value, "valve flow")?;
    check_positive(dp.value, "valve pressure drop")?;
    check_positive(density.value, "density")?;

    let relative_density = density.value / KV_REFERENCE_DENSITY;
    let kv = to_m3ph(flow) / (dp.value / PA_PER_BAR / relative_density).sqrt();
    check_finite(kv, "Kv")?;
    Ok(kv)
}

/// Pressure drop across a valve of `kv` at `flow`.
pub fn valve_dp(flow: VolumeRate, kv: f64, density: Density) -> ComponentResult<Pressure> {
    check_non_negative(flow.value, "valve flow")?;
    check_positive(kv, "Kv")?;
    check_positive(density.value, "density")?;

    let ratio = to_m3ph(flow) / kv;
    let relative_density = density.value / KV_REFERENCE_DENSITY;
    Ok(pa(ratio * ratio * relative_density * PA_PER_BAR))
}

/// Valve authority: valve Δp over valve Δp plus the rest of the circuit.
///
/// Zero when nothing drops any pressure.
pub fn authority(valve_dp: Pressure, circuit_dp: Pressure) -> ComponentResult<f64> {
    check_non_negative(valve_dp.value, "valve pressure drop")?;
    check_non_negative(circuit_dp.value, "circuit pressure drop")?;
    let total = valve_dp.value + circuit_dp.value;
    if total == 0.0 {
        return Ok(0.0);
    }
    Ok(valve_dp.value / total)
}

/// One selectable valve setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValvePreset {
    pub label: String,
    pub kv: f64,
}

/// Selectable settings of a valve, ordered by ascending Kv.
///
/// Deserialized catalogs go through [`ValveCatalog::new`], so any listing
/// order is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCatalog")]
pub struct ValveCatalog {
    presets: Vec<ValvePreset>,
}

#[derive(Deserialize)]
struct RawCatalog {
    presets: Vec<ValvePreset>,
}

impl TryFrom<RawCatalog> for ValveCatalog {
    type Error = ComponentError;

    fn try_from(raw: RawCatalog) -> ComponentResult<Self> {
        Self::new(raw.presets)
    }
}

impl ValveCatalog {
    /// # Errors
    /// `InvalidArg` for an empty list, a non-positive Kv or two presets with the same Kv.
    pub fn new(mut presets: Vec<ValvePreset>) -> ComponentResult<Self> {
        if presets.is_empty() {
            return Err(ComponentError::InvalidArg {
                what: "valve catalog is empty",
            });
        }
        for p in &presets {
            check_positive(p.kv, "preset Kv")?;
        }
        presets.sort_by(|a, b| a.kv.total_cmp(&b.kv));
        if presets.windows(2).any(|w| w[0].kv == w[1].kv) {
            return Err(ComponentError::InvalidArg {
                what: "valve catalog has duplicate Kv values",
            });
        }
        Ok(Self { presets })
    }

    /// Typical radiator lockshield, by turns open from closed.
    pub fn lockshield() -> Self {
        const TABLE: [(&str, f64); 12] = [
            ("0.5 turn", 0.05),
            ("1.0 turn", 0.09),
            ("1.5 turns", 0.14),
            ("2.0 turns", 0.20),
            ("2.5 turns", 0.27),
            ("3.0 turns", 0.35),
            ("3.5 turns", 0.44),
            ("4.0 turns", 0.54),
            ("4.5 turns", 0.65),
            ("5.0 turns", 0.77),
            ("5.5 turns", 0.90),
            ("open", 1.04),
        ];
        Self {
            presets: TABLE
                .iter()
                .map(|&(label, kv)| ValvePreset {
                    label: label.to_string(),
                    kv,
                })
                .collect(),
        }
    }

    pub fn presets(&self) -> &[ValvePreset] {
        &self.presets
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ValvePreset> {
        self.presets.get(index)
    }

    /// Index of the preset closest to `kv` on a log scale; ties go to the smaller Kv.
    pub fn nearest_index(&self, kv: f64) -> usize {
        let target = kv.max(f64::MIN_POSITIVE).ln();
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, p) in self.presets.iter().enumerate() {
            let dist = (p.kv.ln() - target).abs();
            if dist < best_dist {
                best = i;
                best_dist = dist;
            }
        }
        best
    }

    pub fn nearest(&self, kv: f64) -> Option<&ValvePreset> {
        self.presets.get(self.nearest_index(kv))
    }
}

impl Default for ValveCatalog {
    fn default() -> Self {
        Self::lockshield()
    }
}

/// How a required Kv becomes an installed one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum KvSelection {
    /// Any Kv can be set.
    #[default]
    Continuous,
    /// Only catalog presets can be set.
    Discrete(ValveCatalog),
}
