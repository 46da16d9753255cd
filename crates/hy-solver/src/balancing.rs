//! Balancing valve sizing against the index circuit.
//!
//! Every non-index path gets a valve whose loss at the path's design flow
//! lifts the path to the index pressure drop. With discrete presets the
//! installed Kv is stepped through the catalog until the achieved drop is
//! within tolerance of the target or the step bound runs out.

use std::collections::BTreeMap;

use crate::error::{SolverError, SolverResult};
use crate::index::{IndexCircuit, index_circuit};
use crate::paths::PathResult;
use hy_components::{KvSelection, ValveCatalog, authority, kv_for, valve_dp};
use hy_core::units::{Density, Pressure, pa};
use hy_core::{NodeId, Tolerances, nearly_equal};
use serde::{Deserialize, Serialize};

/// Balancing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancingConfig {
    /// Accepted deviation from the target, as a fraction of the target.
    pub tolerance: f64,
    /// Authority below which a warning is attached.
    pub min_authority: f64,
    /// Preset steps per path before giving up.
    pub max_iterations: usize,
    pub selection: KvSelection,
    /// Kv of a fully open valve on the index path, if it has one.
    pub index_valve_kv: Option<f64>,
}

impl Default for BalancingConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.05,
            min_authority: 0.3,
            max_iterations: 20,
            selection: KvSelection::Continuous,
            index_valve_kv: None,
        }
    }
}

impl BalancingConfig {
    pub fn discrete(catalog: ValveCatalog) -> Self {
        Self {
            selection: KvSelection::Discrete(catalog),
            ..Self::default()
        }
    }

    fn validate(&self) -> SolverResult<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(SolverError::InvalidArg {
                what: "balancing tolerance must be positive",
            });
        }
        if !(0.0..=1.0).contains(&self.min_authority) {
            return Err(SolverError::InvalidArg {
                what: "minimum authority must lie in [0, 1]",
            });
        }
        if self.max_iterations == 0 {
            return Err(SolverError::InvalidArg {
                what: "balancing needs at least one iteration",
            });
        }
        if let KvSelection::Discrete(catalog) = &self.selection {
            if catalog.is_empty() {
                return Err(SolverError::InvalidArg {
                    what: "valve catalog is empty",
                });
            }
        }
        Ok(())
    }
}

/// Valve selected for one path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValveSizing {
    pub terminal: NodeId,
    /// Kv that would absorb the deficit exactly.
    pub required_kv: f64,
    /// Kv actually set.
    pub selected_kv: f64,
    /// Catalog label of the selected setting.
    pub preset: Option<String>,
    pub valve_dp: Pressure,
    /// Path loss excluding the valve.
    pub circuit_dp: Pressure,
    pub achieved_dp: Pressure,
    pub authority: f64,
    pub iterations: usize,
}

/// Non-fatal: a valve regulates too small a share of its circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowAuthorityWarning {
    pub terminal: NodeId,
    pub authority: f64,
    pub minimum: f64,
}

/// A path left outside tolerance when balancing gave up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancingShortfall {
    pub terminal: NodeId,
    pub target: Pressure,
    pub achieved: Pressure,
    /// `achieved - target`; negative when the path is still short.
    pub residual: Pressure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancingResult {
    pub index_terminal: NodeId,
    /// Pressure drop every path is balanced to.
    pub target_dp: Pressure,
    pub valves: Vec<ValveSizing>,
    /// Paths already within tolerance that need no valve.
    pub unregulated: Vec<NodeId>,
    pub warnings: Vec<LowAuthorityWarning>,
}

impl BalancingResult {
    /// Installed Kv per terminal, ready to feed back into [`balance_with_existing`].
    pub fn installed_kv(&self) -> BTreeMap<NodeId, f64> {
        self.valves
            .iter()
            .map(|v| (v.terminal, v.selected_kv))
            .collect()
    }

    pub fn valve(&self, terminal: NodeId) -> Option<&ValveSizing> {
        self.valves.iter().find(|v| v.terminal == terminal)
    }
}

/// Size balancing valves for every non-index path.
///
/// # Errors
/// `BalancingNotAchieved` naming every path left outside tolerance,
/// `NoPaths` for an empty path list, `InvalidArg` for a bad configuration.
pub fn balance(
    paths: &[PathResult],
    index: &IndexCircuit,
    density: Density,
    config: &BalancingConfig,
) -> SolverResult<BalancingResult> {
    balance_with_existing(paths, index, density, &BTreeMap::new(), config)
}

/// Balance with valves already set at `existing` Kv values.
///
/// An existing valve that already lands within tolerance is kept as is, so
/// balancing a balanced network returns the same settings.
pub fn balance_with_existing(
    paths: &[PathResult],
    index: &IndexCircuit,
    density: Density,
    existing: &BTreeMap<NodeId, f64>,
    config: &BalancingConfig,
) -> SolverResult<BalancingResult> {
    config.validate()?;
    if paths.is_empty() {
        return Err(SolverError::NoPaths);
    }

    let index = if index_is_current(paths, index) {
        index.clone()
    } else {
        let fresh = index_circuit(paths)?;
        tracing::warn!(
            "Index circuit {} at {:.1} Pa is stale, re-deriving: terminal {} at {:.1} Pa",
            index.path.terminal,
            index.path.total_dp.value,
            fresh.path.terminal,
            fresh.path.total_dp.value
        );
        fresh
    };

    let mut target = index.path.total_dp.value;
    let mut valves = Vec::new();
    let mut warnings = Vec::new();

    if let Some(kv) = config.index_valve_kv {
        let dp = valve_dp(index.path.design_flow, kv, density)?;
        target += dp.value;
        valves.push(ValveSizing {
            terminal: index.path.terminal,
            required_kv: kv,
            selected_kv: kv,
            preset: preset_label(config, kv),
            valve_dp: dp,
            circuit_dp: index.path.total_dp,
            achieved_dp: pa(target),
            authority: authority(dp, index.path.total_dp)?,
            iterations: 0,
        });
    }

    tracing::debug!(
        "Balancing {} paths to {:.1} Pa (index terminal {})",
        paths.len(),
        target,
        index.path.terminal
    );

    let tol = config.tolerance * target;
    let mut unregulated = Vec::new();
    let mut shortfalls = Vec::new();

    for (position, path) in paths.iter().enumerate() {
        if position == index.position {
            continue;
        }
        let q = path.design_flow;
        let circuit = path.total_dp.value;
        let deficit = (target - circuit).max(0.0);

        if let Some(&kv) = existing.get(&path.terminal) {
            let dp = valve_dp(q, kv, density)?;
            if (circuit + dp.value - target).abs() <= tol {
                let required_kv = if deficit > 0.0 {
                    kv_for(q, pa(deficit), density)?
                } else {
                    kv
                };
                valves.push(ValveSizing {
                    terminal: path.terminal,
                    required_kv,
                    selected_kv: kv,
                    preset: preset_label(config, kv),
                    valve_dp: dp,
                    circuit_dp: path.total_dp,
                    achieved_dp: pa(circuit + dp.value),
                    authority: authority(dp, path.total_dp)?,
                    iterations: 0,
                });
                continue;
            }
        }

        if deficit <= tol {
            unregulated.push(path.terminal);
            continue;
        }

        let required_kv = kv_for(q, pa(deficit), density)?;
        let sizing = match &config.selection {
            KvSelection::Continuous => {
                let dp = valve_dp(q, required_kv, density)?;
                ValveSizing {
                    terminal: path.terminal,
                    required_kv,
                    selected_kv: required_kv,
                    preset: None,
                    valve_dp: dp,
                    circuit_dp: path.total_dp,
                    achieved_dp: pa(circuit + dp.value),
                    authority: authority(dp, path.total_dp)?,
                    iterations: 1,
                }
            }
            KvSelection::Discrete(catalog) => {
                match step_presets(catalog, path, required_kv, target, tol, density, config)? {
                    Ok(sizing) => sizing,
                    Err(shortfall) => {
                        shortfalls.push(shortfall);
                        continue;
                    }
                }
            }
        };
        valves.push(sizing);
    }

    if !shortfalls.is_empty() {
        tracing::warn!("Balancing not achieved for {} paths", shortfalls.len());
        return Err(SolverError::BalancingNotAchieved { shortfalls });
    }

    for v in &valves {
        if v.authority < config.min_authority {
            tracing::warn!(
                "Low valve authority at terminal {}: {:.2} < {:.2}",
                v.terminal,
                v.authority,
                config.min_authority
            );
            warnings.push(LowAuthorityWarning {
                terminal: v.terminal,
                authority: v.authority,
                minimum: config.min_authority,
            });
        }
    }

    Ok(BalancingResult {
        index_terminal: index.path.terminal,
        target_dp: pa(target),
        valves,
        unregulated,
        warnings,
    })
}

/// The supplied index still sits at its position with the same drop, and no
/// path drops more.
fn index_is_current(paths: &[PathResult], index: &IndexCircuit) -> bool {
    let tol = Tolerances::default();
    let dp = index.path.total_dp.value;
    let in_place = paths.get(index.position).is_some_and(|p| {
        p.terminal == index.path.terminal && nearly_equal(p.total_dp.value, dp, tol)
    });
    in_place
        && paths
            .iter()
            .all(|p| p.total_dp.value <= dp || nearly_equal(p.total_dp.value, dp, tol))
}

/// Walk the catalog from the preset nearest `required_kv` until the achieved
/// drop is within `tol` of `target`.
///
/// A residual that changes sign between neighbouring presets means no preset
/// fits; the closer of the two is reported as the shortfall.
fn step_presets(
    catalog: &ValveCatalog,
    path: &PathResult,
    required_kv: f64,
    target: f64,
    tol: f64,
    density: Density,
    config: &BalancingConfig,
) -> SolverResult<Result<ValveSizing, BalancingShortfall>> {
    let q = path.design_flow;
    let circuit = path.total_dp.value;
    let mut index = catalog.nearest_index(required_kv);
    let mut previous_step: Option<bool> = None;
    let mut best = f64::NAN;

    for iteration in 1..=config.max_iterations {
        let Some(preset) = catalog.get(index) else {
            break;
        };
        let dp = valve_dp(q, preset.kv, density)?;
        let achieved = circuit + dp.value;
        let residual = achieved - target;
        if best.is_nan() || residual.abs() < (best - target).abs() {
            best = achieved;
        }

        if residual.abs() <= tol {
            return Ok(Ok(ValveSizing {
                terminal: path.terminal,
                required_kv,
                selected_kv: preset.kv,
                preset: Some(preset.label.clone()),
                valve_dp: dp,
                circuit_dp: path.total_dp,
                achieved_dp: pa(achieved),
                authority: authority(dp, path.total_dp)?,
                iterations: iteration,
            }));
        }

        // Too much loss opens the valve further, too little closes it.
        let open_further = residual > 0.0;
        if previous_step.is_some_and(|prev| prev != open_further) {
            break;
        }
        previous_step = Some(open_further);
        index = match (open_further, index) {
            (true, i) if i + 1 < catalog.len() => i + 1,
            (false, i) if i > 0 => i - 1,
            _ => break,
        };
    }

    tracing::debug!(
        "No preset within tolerance for terminal {} (required Kv {:.3})",
        path.terminal,
        required_kv
    );
    Ok(Err(BalancingShortfall {
        terminal: path.terminal,
        target: pa(target),
        achieved: pa(best),
        residual: pa(best - target),
    }))
}

fn preset_label(config: &BalancingConfig, kv: f64) -> Option<String> {
    match &config.selection {
        KvSelection::Continuous => None,
        KvSelection::Discrete(catalog) => catalog
            .presets()
            .iter()
            .find(|p| p.kv == kv)
            .map(|p| p.label.clone()),
    }
}
