//! Darcy friction factor: laminar, Swamee-Jain and Colebrook-White.

use crate::common::check_finite;
use crate::error::{ComponentError, ComponentResult};
use hy_core::numeric::relative_change;
use serde::{Deserialize, Serialize};
use std::f64::consts::LN_10;

/// Friction solver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrictionConfig {
    /// Maximum Colebrook-White iterations
    pub max_iterations: usize,
    /// Convergence bound on the relative change of f between iterations
    pub rel_tol: f64,
    /// Reynolds number below which flow is laminar
    pub laminar_limit: f64,
}

impl Default for FrictionConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            rel_tol: 1e-6,
            laminar_limit: 2300.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowRegime {
    NoFlow,
    Laminar,
    Turbulent,
}

/// Solved Darcy friction factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrictionSolution {
    pub factor: f64,
    pub regime: FlowRegime,
    /// Colebrook-White iterations spent; zero for the closed forms.
    pub iterations: usize,
}

/// Reynolds number from velocity, bore and kinematic viscosity.
pub fn reynolds(velocity: f64, diameter: f64, kinematic_viscosity: f64) -> f64 {
    velocity * diameter / kinematic_viscosity
}

/// Swamee-Jain explicit approximation of Colebrook-White.
pub fn swamee_jain(reynolds: f64, relative_roughness: f64) -> f64 {
    let a = relative_roughness / 3.7;
    let b = 5.74 / reynolds.powf(0.9);
    0.25 / (a + b).log10().powi(2)
}

/// Solve Colebrook-White for the Darcy friction factor.
///
/// Newton iteration on `x = 1/√f` for
/// `g(x) = x + 2·log10(ε/(3.7·D) + 2.51·x/Re) = 0`, starting from Swamee-Jain.
/// Converges when successive `f` differ by less than `rel_tol` (relative).
///
/// # Errors
/// `FrictionConvergence` with the last estimate when the bound is exhausted
/// or the iterate leaves the domain of the logarithm.
pub fn colebrook_white(
    reynolds: f64,
    relative_roughness: f64,
    config: &FrictionConfig,
) -> ComponentResult<FrictionSolution> {
    let a = relative_roughness / 3.7;
    let b = 2.51 / reynolds;

    let mut f = swamee_jain(reynolds, relative_roughness);
    let mut x = 1.0 / f.sqrt();
    let not_converged = |f: f64, iterations: usize| ComponentError::FrictionConvergence {
        edge: None,
        reynolds,
        last_estimate: f,
        iterations,
    };

    for iteration in 1..=config.max_iterations {
        let arg = a + b * x;
        if arg.is_nan() || arg <= 0.0 {
            return Err(not_converged(f, iteration - 1));
        }
        let g = x + 2.0 * arg.log10();
        let dg = 1.0 + 2.0 * b / (LN_10 * arg);
        x -= g / dg;

        if !x.is_finite() || x <= 0.0 {
            return Err(not_converged(f, iteration));
        }
        let next = 1.0 / (x * x);
        let change = relative_change(f, next);
        f = next;
        if change < config.rel_tol {
            return Ok(FrictionSolution {
                factor: f,
                regime: FlowRegime::Turbulent,
                iterations: iteration,
            });
        }
    }

    Err(not_converged(f, config.max_iterations))
}

/// Darcy friction factor for any Reynolds number.
///
/// Zero Reynolds number is no flow (`f = 0`), below the laminar limit
/// `f = 64/Re`, otherwise Colebrook-White.
pub fn friction_factor(
    reynolds: f64,
    relative_roughness: f64,
    config: &FrictionConfig,
) -> ComponentResult<FrictionSolution> {
    check_finite(reynolds, "Reynolds number")?;
    check_finite(relative_roughness, "relative roughness")?;
    if reynolds < 0.0 {
        return Err(ComponentError::InvalidArg {
            what: "Reynolds number cannot be negative",
        });
    }
    if relative_roughness < 0.0 {
        return Err(ComponentError::NonPhysical {
            what: "relative roughness",
        });
    }

    if reynolds == 0.0 {
        return Ok(FrictionSolution {
            factor: 0.0,
            regime: FlowRegime::NoFlow,
            iterations: 0,
        });
    }
    if reynolds < config.laminar_limit {
        return Ok(FrictionSolution {
            factor: 64.0 / reynolds,
            regime: FlowRegime::Laminar,
            iterations: 0,
        });
    }
    colebrook_white(reynolds, relative_roughness, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Colebrook-White residual in the `1/√f` form.
    fn residual(f: f64, re: f64, rr: f64) -> f64 {
        1.0 / f.sqrt() + 2.0 * (rr / 3.7 + 2.51 / (re * f.sqrt())).log10()
    }

    #[test]
    fn laminar_branch() {
        let sol = friction_factor(1000.0, 1e-4, &FrictionConfig::default()).unwrap();
        assert_eq!(sol.regime, FlowRegime::Laminar);
        assert!((sol.factor - 0.064).abs() < 1e-15);
    }

    #[test]
    fn zero_reynolds_is_no_flow() {
        let sol = friction_factor(0.0, 1e-4, &FrictionConfig::default()).unwrap();
        assert_eq!(sol.regime, FlowRegime::NoFlow);
        assert_eq!(sol.factor, 0.0);
    }

    #[test]
    fn turbulent_satisfies_colebrook() {
        let cfg = FrictionConfig::default();
        for (re, rr) in [(5.0e3, 0.0), (1.0e5, 1e-4), (2.0e6, 3e-3)] {
            let sol = friction_factor(re, rr, &cfg).unwrap();
            assert_eq!(sol.regime, FlowRegime::Turbulent);
            assert!(sol.iterations <= 10);
            assert!(residual(sol.factor, re, rr).abs() < 1e-6);
        }
    }

    #[test]
    fn moody_chart_point() {
        // Smooth pipe at Re = 1e5 reads f ≈ 0.018 on the Moody chart.
        let sol = friction_factor(1.0e5, 0.0, &FrictionConfig::default()).unwrap();
        assert!((sol.factor - 0.018).abs() < 0.0005);
    }

    #[test]
    fn swamee_jain_is_close() {
        let sj = swamee_jain(1.0e5, 1e-4);
        let cw = colebrook_white(1.0e5, 1e-4, &FrictionConfig::default())
            .unwrap()
            .factor;
        assert!((sj - cw).abs() / cw < 0.02);
    }

    #[test]
    fn exhausted_bound_is_an_error() {
        let cfg = FrictionConfig {
            max_iterations: 1,
            rel_tol: 1e-14,
            ..FrictionConfig::default()
        };
        let err = friction_factor(1.0e5, 1e-4, &cfg).unwrap_err();
        match err {
            ComponentError::FrictionConvergence {
                edge,
                reynolds,
                last_estimate,
                iterations,
            } => {
                assert_eq!(edge, None);
                assert_eq!(reynolds, 1.0e5);
                assert_eq!(iterations, 1);
                assert!(last_estimate > 0.01 && last_estimate < 0.03);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_inputs() {
        let cfg = FrictionConfig::default();
        assert!(friction_factor(-10.0, 1e-4, &cfg).is_err());
        assert!(friction_factor(f64::NAN, 1e-4, &cfg).is_err());
        assert!(friction_factor(1.0e5, -1e-4, &cfg).is_err());
    }
}
