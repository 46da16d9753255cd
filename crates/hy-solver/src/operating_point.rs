//! System curve and pump operating point.

use std::fmt;

use crate::error::{SolverError, SolverResult};
use hy_components::PumpCharacteristic;
use hy_components::fit::least_squares;
use hy_core::units::constants::G0_MPS2;
use hy_core::units::{Length, Power, Pressure, VolumeRate, m, m3ps, w};
use hy_fluids::FluidProperties;
use serde::{Deserialize, Serialize};

/// Head the network needs to pass a flow: `H(Q) = H0 + r·Q²`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemCurve {
    pub static_head: Length,
    /// Resistance in m per (m³/s)².
    pub resistance: f64,
}

impl SystemCurve {
    /// # Errors
    /// `InvalidArg` for a non-finite static head or a negative resistance.
    pub fn new(static_head: Length, resistance: f64) -> SolverResult<Self> {
        if !static_head.value.is_finite() {
            return Err(SolverError::InvalidArg {
                what: "static head must be finite",
            });
        }
        if !resistance.is_finite() || resistance < 0.0 {
            return Err(SolverError::InvalidArg {
                what: "system resistance must be non-negative",
            });
        }
        Ok(Self {
            static_head,
            resistance,
        })
    }

    /// Curve through one design point: `r = (H - H0) / Q²`.
    pub fn through_design_point(
        flow: VolumeRate,
        head: Length,
        static_head: Length,
    ) -> SolverResult<Self> {
        let q = flow.value;
        if !q.is_finite() || q <= 0.0 {
            return Err(SolverError::InvalidArg {
                what: "design flow must be positive",
            });
        }
        Self::new(static_head, (head.value - static_head.value) / (q * q))
    }

    /// Least-squares curve through measured `(flow, head)` samples.
    pub fn fit(samples: &[(VolumeRate, Length)]) -> SolverResult<Self> {
        let rows: Vec<[f64; 2]> = samples
            .iter()
            .map(|(q, _)| [1.0, q.value * q.value])
            .collect();
        let heads: Vec<f64> = samples.iter().map(|(_, h)| h.value).collect();
        let [h0, r] = least_squares(&rows, &heads)?;
        Self::new(m(h0), r)
    }

    pub fn head_at(&self, flow: VolumeRate) -> Length {
        m(self.static_head.value + self.resistance * flow.value * flow.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingPointConfig {
    /// Bisection steps before giving up.
    pub max_iterations: usize,
    /// Bracket width relative to the flow at which the search stops.
    pub flow_tol: f64,
    /// Head mismatch (m) accepted as an intersection.
    pub head_tol: f64,
}

impl Default for OperatingPointConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            flow_tol: 1e-12,
            head_tol: 1e-9,
        }
    }
}

/// Why a pump and system curve do not cross.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoOperatingPointReason {
    /// Pump head is below the system head even at the lowest flow.
    Undersized,
    /// Pump head is still above the system head at the highest flow.
    Oversized,
}

impl fmt::Display for NoOperatingPointReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoOperatingPointReason::Undersized => write!(f, "undersized"),
            NoOperatingPointReason::Oversized => write!(f, "oversized"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    pub flow: VolumeRate,
    pub head: Length,
    pub pressure: Pressure,
    pub efficiency: f64,
    /// ρ·g·Q·H
    pub hydraulic_power: Power,
    /// Hydraulic power over efficiency.
    pub shaft_power: Power,
    pub iterations: usize,
}

/// Intersect `pump` with `system` by bisection over the pump's flow domain.
///
/// # Errors
/// `NoOperatingPoint` when the curves do not cross inside the domain,
/// `ConvergenceFailed` when the bound runs out, component errors for a
/// pump whose head does not fall with flow or an invalid efficiency at the
/// intersection.
pub fn operating_point(
    system: &SystemCurve,
    pump: &dyn PumpCharacteristic,
    fluid: &FluidProperties,
    config: &OperatingPointConfig,
) -> SolverResult<OperatingPoint> {
    pump.validate()?;

    let residual = |q: f64| -> SolverResult<f64> {
        let flow = m3ps(q);
        Ok(pump.head_at(flow)?.value - system.head_at(flow).value)
    };

    let (lo, hi) = pump.flow_domain();
    let (mut a, mut b) = (lo.value, hi.value);
    let r_a = residual(a)?;
    if r_a < 0.0 {
        return Err(SolverError::NoOperatingPoint {
            reason: NoOperatingPointReason::Undersized,
        });
    }
    let r_b = residual(b)?;
    if r_b > 0.0 {
        return Err(SolverError::NoOperatingPoint {
            reason: NoOperatingPointReason::Oversized,
        });
    }

    let mut found = if r_a.abs() <= config.head_tol {
        Some((a, 0))
    } else if r_b.abs() <= config.head_tol {
        Some((b, 0))
    } else {
        None
    };

    let mut iteration = 0;
    while found.is_none() && iteration < config.max_iterations {
        iteration += 1;
        let mid = 0.5 * (a + b);
        let r_mid = residual(mid)?;
        let narrow = (b - a) <= config.flow_tol * b.abs().max(f64::MIN_POSITIVE);
        if r_mid.abs() <= config.head_tol || narrow {
            found = Some((mid, iteration));
        } else if r_mid > 0.0 {
            a = mid;
        } else {
            b = mid;
        }
    }

    let (q, iterations) = found.ok_or(SolverError::ConvergenceFailed {
        what: "pump/system intersection",
    })?;

    let flow = m3ps(q);
    let head = system.head_at(flow);
    let efficiency = pump.efficiency_at(flow)?;
    let hydraulic = fluid.density.value * G0_MPS2 * q * head.value;
    let shaft = hydraulic / efficiency;

    tracing::debug!(
        "Operating point: Q = {:.6} m³/s, H = {:.3} m, eta = {:.3} after {} iterations",
        q,
        head.value,
        efficiency,
        iterations
    );

    Ok(OperatingPoint {
        flow,
        head,
        pressure: fluid.pressure_from_head(head),
        efficiency,
        hydraulic_power: w(hydraulic),
        shaft_power: w(shaft),
        iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hy_components::{ComponentError, PumpCurve, PumpPoint};
    use hy_core::units::{kgpm3, lps, pas};

    fn textbook_pump() -> PumpCurve {
        PumpCurve::from_coefficients([100.0, 0.0, -2.0], [0.6, 0.0, 0.0], m3ps(6.0)).unwrap()
    }

    fn reference_water() -> FluidProperties {
        FluidProperties::new(kgpm3(1000.0), pas(1.0e-3), hy_core::units::degc(20.0)).unwrap()
    }

    #[test]
    fn rising_pump_is_rejected_before_bisection() {
        // Built directly, skipping the constructor checks; it would cross
        // this system curve near 4.7 m³/s if bisected.
        let rising = PumpCurve::Quadratic {
            head: [20.0, 10.0, 0.0],
            efficiency: [0.6, 0.0, 0.0],
            max_flow: m3ps(6.0),
        };
        let system = SystemCurve::new(m(10.0), 3.0).unwrap();
        let err = operating_point(
            &system,
            &rising,
            &reference_water(),
            &OperatingPointConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SolverError::Component(ComponentError::InvalidArg { .. })
        ));
    }

    #[test]
    fn quadratic_curves_meet_at_four() {
        let system = SystemCurve::new(m(20.0), 3.0).unwrap();
        let op = operating_point(
            &system,
            &textbook_pump(),
            &reference_water(),
            &OperatingPointConfig::default(),
        )
        .unwrap();

        assert!((op.flow.value - 4.0).abs() < 1e-9);
        assert!((op.head.value - 68.0).abs() < 1e-8);
        assert!((op.efficiency - 0.6).abs() < 1e-12);
        let hydraulic = 1000.0 * G0_MPS2 * 4.0 * 68.0;
        assert!((op.hydraulic_power.value - hydraulic).abs() / hydraulic < 1e-9);
        assert!((op.shaft_power.value - hydraulic / 0.6).abs() / hydraulic < 1e-9);
    }

    #[test]
    fn weak_pump_is_undersized() {
        let system = SystemCurve::new(m(120.0), 3.0).unwrap();
        let err = operating_point(
            &system,
            &textbook_pump(),
            &reference_water(),
            &OperatingPointConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SolverError::NoOperatingPoint {
                reason: NoOperatingPointReason::Undersized
            }
        );
        assert!(err.to_string().contains("undersized"));
    }

    #[test]
    fn strong_pump_is_oversized() {
        let system = SystemCurve::new(m(0.0), 0.5).unwrap();
        let err = operating_point(
            &system,
            &textbook_pump(),
            &reference_water(),
            &OperatingPointConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SolverError::NoOperatingPoint {
                reason: NoOperatingPointReason::Oversized
            }
        );
    }

    #[test]
    fn bound_exhaustion_is_an_error() {
        let system = SystemCurve::new(m(20.0), 3.0).unwrap();
        let config = OperatingPointConfig {
            max_iterations: 3,
            ..OperatingPointConfig::default()
        };
        let err = operating_point(&system, &textbook_pump(), &reference_water(), &config)
            .unwrap_err();
        assert!(matches!(err, SolverError::ConvergenceFailed { .. }));
    }

    #[test]
    fn table_pump_is_not_extrapolated() {
        let pump = PumpCurve::from_points(vec![
            PumpPoint::new(lps(0.0), m(6.0), 0.10),
            PumpPoint::new(lps(0.2), m(5.5), 0.35),
            PumpPoint::new(lps(0.4), m(4.4), 0.45),
        ])
        .unwrap();
        // Needs 2 m at 0.4 L/s: the pump still has head to spare at its last point.
        let system = SystemCurve::through_design_point(lps(0.4), m(2.0), m(0.0)).unwrap();
        let err = operating_point(
            &system,
            &pump,
            &FluidProperties::water_20c(),
            &OperatingPointConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SolverError::NoOperatingPoint {
                reason: NoOperatingPointReason::Oversized
            }
        );

        // 5 m at 0.3 L/s crosses inside the table.
        let system = SystemCurve::through_design_point(lps(0.3), m(5.0), m(0.0)).unwrap();
        let op = operating_point(
            &system,
            &pump,
            &FluidProperties::water_20c(),
            &OperatingPointConfig::default(),
        )
        .unwrap();
        assert!(op.flow.value > 2e-4 && op.flow.value < 4e-4);
        assert!(op.efficiency > 0.35 && op.efficiency < 0.45);
    }

    #[test]
    fn system_curve_fit_recovers_coefficients() {
        let samples: Vec<(VolumeRate, Length)> = [0.0, 1.0e-4, 2.0e-4, 3.0e-4]
            .iter()
            .map(|&q| (m3ps(q), m(1.5 + 2.0e7 * q * q)))
            .collect();
        let curve = SystemCurve::fit(&samples).unwrap();
        assert!((curve.static_head.value - 1.5).abs() < 1e-6);
        assert!((curve.resistance - 2.0e7).abs() / 2.0e7 < 1e-6);
    }

    #[test]
    fn design_point_needs_flow() {
        assert!(SystemCurve::through_design_point(m3ps(0.0), m(3.0), m(0.0)).is_err());
        assert!(SystemCurve::new(m(0.0), -1.0).is_err());
    }
}
