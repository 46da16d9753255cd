//! Pump performance curves.

use crate::common::{check_finite, check_non_negative, check_positive};
use crate::error::{ComponentError, ComponentResult};
use crate::fit::least_squares;
use crate::traits::PumpCharacteristic;
use hy_core::numeric::interpolate;
use hy_core::units::{Length, VolumeRate, m, m3ps};
use serde::{Deserialize, Serialize};

/// Relative slack on the flow domain bounds.
const DOMAIN_SLACK: f64 = 1e-9;

/// One measured duty of a pump.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PumpPoint {
    pub flow: VolumeRate,
    pub head: Length,
    pub efficiency: f64,
}

impl PumpPoint {
    pub fn new(flow: VolumeRate, head: Length, efficiency: f64) -> Self {
        Self {
            flow,
            head,
            efficiency,
        }
    }
}

/// Head-versus-flow characteristic of a circulator.
///
/// ## Model
///
/// Either a table of measured points, interpolated linearly and never
/// extrapolated, or quadratic coefficients in SI units
///
/// ```text
/// H(Q) = h0 + h1·Q + h2·Q²     [m, Q in m³/s]
/// η(Q) = e0 + e1·Q + e2·Q²
/// ```
///
/// valid on `[0, max_flow]`. Head must fall as flow rises; deserialized
/// curves are checked the same way as constructed ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPumpCurve")]
pub enum PumpCurve {
    Table(Vec<PumpPoint>),
    Quadratic {
        head: [f64; 3],
        efficiency: [f64; 3],
        max_flow: VolumeRate,
    },
}

/// Unchecked wire form of [`PumpCurve`].
#[derive(Deserialize)]
enum RawPumpCurve {
    Table(Vec<PumpPoint>),
    Quadratic {
        head: [f64; 3],
        efficiency: [f64; 3],
        max_flow: VolumeRate,
    },
}

impl TryFrom<RawPumpCurve> for PumpCurve {
    type Error = ComponentError;

    fn try_from(raw: RawPumpCurve) -> ComponentResult<Self> {
        match raw {
            RawPumpCurve::Table(points) => Self::from_points(points),
            RawPumpCurve::Quadratic {
                head,
                efficiency,
                max_flow,
            } => Self::from_coefficients(head, efficiency, max_flow),
        }
    }
}

impl PumpCurve {
    /// Curve from measured points.
    ///
    /// # Errors
    /// `InvalidArg` unless there are at least two points with non-negative,
    /// strictly increasing flow and strictly decreasing head;
    /// `InvalidEfficiency` for an efficiency outside (0, 1].
    pub fn from_points(mut points: Vec<PumpPoint>) -> ComponentResult<Self> {
        points.sort_by(|a, b| a.flow.value.total_cmp(&b.flow.value));
        let curve = PumpCurve::Table(points);
        curve.validate()?;
        Ok(curve)
    }

    /// Curve from quadratic coefficients.
    pub fn from_coefficients(
        head: [f64; 3],
        efficiency: [f64; 3],
        max_flow: VolumeRate,
    ) -> ComponentResult<Self> {
        let curve = PumpCurve::Quadratic {
            head,
            efficiency,
            max_flow,
        };
        curve.validate()?;
        Ok(curve)
    }

    /// Least-squares quadratic through measured points, valid up to the
    /// largest measured flow.
    ///
    /// # Errors
    /// `CurveFit` for fewer than three distinct flows; otherwise the same
    /// checks as `from_coefficients`.
    pub fn fit_quadratic(points: &[PumpPoint]) -> ComponentResult<Self> {
        let rows: Vec<[f64; 3]> = points
            .iter()
            .map(|p| {
                let q = p.flow.value;
                [1.0, q, q * q]
            })
            .collect();
        let heads: Vec<f64> = points.iter().map(|p| p.head.value).collect();
        let etas: Vec<f64> = points.iter().map(|p| p.efficiency).collect();

        let head = least_squares(&rows, &heads)?;
        let efficiency = least_squares(&rows, &etas)?;
        let max_flow = points
            .iter()
            .map(|p| p.flow.value)
            .fold(0.0_f64, f64::max);

        Self::from_coefficients(head, efficiency, m3ps(max_flow))
    }

    fn check_in_domain(&self, flow: VolumeRate) -> ComponentResult<f64> {
        let q = flow.value;
        check_finite(q, "pump flow")?;
        let (lo, hi) = self.flow_domain();
        let slack = DOMAIN_SLACK * hi.value.abs().max(1.0e-12);
        if q < lo.value - slack || q > hi.value + slack {
            return Err(ComponentError::OutOfRange {
                what: "pump curve flow (m³/s)",
                value: q,
            });
        }
        Ok(q.clamp(lo.value, hi.value))
    }

    fn table(points: &[PumpPoint], value: impl Fn(&PumpPoint) -> f64) -> Vec<(f64, f64)> {
        points.iter().map(|p| (p.flow.value, value(p))).collect()
    }
}

impl PumpCharacteristic for PumpCurve {
    fn validate(&self) -> ComponentResult<()> {
        match self {
            PumpCurve::Table(points) => {
                if points.len() < 2 {
                    return Err(ComponentError::InvalidArg {
                        what: "pump curve needs at least two points",
                    });
                }
                for p in points {
                    check_non_negative(p.flow.value, "pump curve flow")?;
                    check_finite(p.head.value, "pump curve head")?;
                    check_efficiency(p.efficiency)?;
                }
                for w in points.windows(2) {
                    if w[1].flow.value <= w[0].flow.value {
                        return Err(ComponentError::InvalidArg {
                            what: "pump curve flows must be strictly increasing",
                        });
                    }
                    if w[1].head.value >= w[0].head.value {
                        return Err(ComponentError::InvalidArg {
                            what: "pump curve head must fall as flow rises",
                        });
                    }
                }
                Ok(())
            }
            PumpCurve::Quadratic {
                head,
                efficiency,
                max_flow,
            } => {
                for c in head.iter().chain(efficiency.iter()) {
                    check_finite(*c, "pump curve coefficient")?;
                }
                check_positive(max_flow.value, "pump maximum flow")?;
                // dH/dQ is linear, so checking both ends covers the domain.
                let slope_at = |q: f64| head[1] + 2.0 * head[2] * q;
                if slope_at(0.0) > 0.0 || slope_at(max_flow.value) > 0.0 {
                    return Err(ComponentError::InvalidArg {
                        what: "pump curve head must fall as flow rises",
                    });
                }
                if polynomial(head, max_flow.value) >= head[0] {
                    return Err(ComponentError::InvalidArg {
                        what: "pump curve head must fall as flow rises",
                    });
                }
                Ok(())
            }
        }
    }

    fn flow_domain(&self) -> (VolumeRate, VolumeRate) {
        match self {
            PumpCurve::Table(points) => {
                let lo = points.first().map_or(0.0, |p| p.flow.value);
                let hi = points.last().map_or(0.0, |p| p.flow.value);
                (m3ps(lo), m3ps(hi))
            }
            PumpCurve::Quadratic { max_flow, .. } => (m3ps(0.0), *max_flow),
        }
    }

    fn head_at(&self, flow: VolumeRate) -> ComponentResult<Length> {
        let q = self.check_in_domain(flow)?;
        let h = match self {
            PumpCurve::Table(points) => {
                interpolate(&Self::table(points, |p| p.head.value), q).ok_or(
                    ComponentError::OutOfRange {
                        what: "pump curve flow (m³/s)",
                        value: q,
                    },
                )?
            }
            PumpCurve::Quadratic { head, .. } => polynomial(head, q),
        };
        check_finite(h, "pump head")?;
        Ok(m(h))
    }

    fn efficiency_at(&self, flow: VolumeRate) -> ComponentResult<f64> {
        let q = self.check_in_domain(flow)?;
        let eta = match self {
            PumpCurve::Table(points) => {
                interpolate(&Self::table(points, |p| p.efficiency), q).ok_or(
                    ComponentError::OutOfRange {
                        what: "pump curve flow (m³/s)",
                        value: q,
                    },
                )?
            }
            PumpCurve::Quadratic { efficiency, .. } => polynomial(efficiency, q),
        };
        check_efficiency(eta)?;
        Ok(eta)
    }
}

fn polynomial(c: &[f64; 3], q: f64) -> f64 {
    c[0] + c[1] * q + c[2] * q * q
}

fn check_efficiency(eta: f64) -> ComponentResult<()> {
    if !eta.is_finite() || eta <= 0.0 || eta > 1.0 {
        return Err(ComponentError::InvalidEfficiency { value: eta });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hy_core::units::lps;

    fn table() -> Vec<PumpPoint> {
        vec![
            PumpPoint::new(lps(0.0), m(6.0), 0.10),
            PumpPoint::new(lps(0.2), m(5.5), 0.35),
            PumpPoint::new(lps(0.4), m(4.4), 0.45),
            PumpPoint::new(lps(0.6), m(2.6), 0.38),
        ]
    }

    #[test]
    fn table_interpolates_inside_domain() {
        let curve = PumpCurve::from_points(table()).unwrap();
        let h = curve.head_at(lps(0.3)).unwrap();
        assert!((h.value - 4.95).abs() < 1e-9);
        let eta = curve.efficiency_at(lps(0.5)).unwrap();
        assert!((eta - 0.415).abs() < 1e-9);
    }

    #[test]
    fn table_is_not_extrapolated() {
        let curve = PumpCurve::from_points(table()).unwrap();
        assert!(matches!(
            curve.head_at(lps(0.7)),
            Err(ComponentError::OutOfRange { .. })
        ));
        let (lo, hi) = curve.flow_domain();
        assert_eq!(lo.value, 0.0);
        assert!((hi.value - 6e-4).abs() < 1e-15);
    }

    #[test]
    fn table_must_fall() {
        let mut pts = table();
        pts[2].head = m(5.8);
        assert!(PumpCurve::from_points(pts).is_err());
        assert!(PumpCurve::from_points(vec![PumpPoint::new(lps(0.0), m(6.0), 0.3)]).is_err());
    }

    #[test]
    fn efficiency_is_validated() {
        let mut pts = table();
        pts[0].efficiency = 0.0;
        assert_eq!(
            PumpCurve::from_points(pts).unwrap_err(),
            ComponentError::InvalidEfficiency { value: 0.0 }
        );

        // Coefficient curve whose efficiency goes negative near shut-off.
        let curve =
            PumpCurve::from_coefficients([100.0, 0.0, -2.0], [-0.1, 0.3, 0.0], m3ps(6.0))
                .unwrap();
        assert!(matches!(
            curve.efficiency_at(m3ps(0.1)),
            Err(ComponentError::InvalidEfficiency { .. })
        ));
        assert!((curve.efficiency_at(m3ps(2.0)).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn coefficients_evaluate() {
        let curve =
            PumpCurve::from_coefficients([100.0, 0.0, -2.0], [0.7, 0.0, 0.0], m3ps(6.0)).unwrap();
        assert!((curve.head_at(m3ps(4.0)).unwrap().value - 68.0).abs() < 1e-12);
        assert!(curve.head_at(m3ps(6.5)).is_err());
    }

    #[test]
    fn rising_coefficients_are_rejected() {
        assert!(PumpCurve::from_coefficients([10.0, 1.0, -1.0], [0.5, 0.0, 0.0], m3ps(3.0)).is_err());
        assert!(PumpCurve::from_coefficients([10.0, 0.0, 0.0], [0.5, 0.0, 0.0], m3ps(3.0)).is_err());
        assert!(PumpCurve::from_coefficients([10.0, 0.0, -1.0], [0.5, 0.0, 0.0], m3ps(0.0)).is_err());
    }

    #[test]
    fn fit_recovers_quadratic() {
        let pts: Vec<PumpPoint> = [0.0, 1.0e-4, 2.0e-4, 3.0e-4, 4.0e-4]
            .iter()
            .map(|&q| {
                PumpPoint::new(
                    m3ps(q),
                    m(6.0 - 2.5e7 * q * q),
                    0.2 + 1500.0 * q - 2.5e6 * q * q,
                )
            })
            .collect();
        let curve = PumpCurve::fit_quadratic(&pts).unwrap();
        match &curve {
            PumpCurve::Quadratic {
                head,
                efficiency,
                max_flow,
            } => {
                assert!((head[0] - 6.0).abs() < 1e-8);
                assert!(head[1].abs() < 1e-3);
                assert!((head[2] + 2.5e7).abs() / 2.5e7 < 1e-8);
                assert!((efficiency[0] - 0.2).abs() < 1e-9);
                assert!((max_flow.value - 4.0e-4).abs() < 1e-18);
            }
            other => panic!("expected coefficients, got {other:?}"),
        }
        let h = curve.head_at(m3ps(2.5e-4)).unwrap();
        assert!((h.value - (6.0 - 2.5e7 * 6.25e-8)).abs() < 1e-8);
    }

    #[test]
    fn yaml_curve_is_validated_on_load() {
        let falling = "!Quadratic\nhead: [6.0, 0.0, -2.5e7]\nefficiency: [0.4, 0.0, 0.0]\nmax_flow: 4.0e-4\n";
        let curve: PumpCurve = serde_yaml::from_str(falling).unwrap();
        assert!((curve.head_at(m3ps(2.0e-4)).unwrap().value - 5.0).abs() < 1e-9);

        let rising = "!Quadratic\nhead: [6.0, 1.0e4, 0.0]\nefficiency: [0.4, 0.0, 0.0]\nmax_flow: 4.0e-4\n";
        assert!(serde_yaml::from_str::<PumpCurve>(rising).is_err());

        let rising_table = r#"!Table
- { flow: 0.0, head: 2.0, efficiency: 0.3 }
- { flow: 0.0005, head: 4.0, efficiency: 0.4 }
"#;
        assert!(serde_yaml::from_str::<PumpCurve>(rising_table).is_err());
    }

    #[test]
    fn yaml_table_points_are_sorted_on_load() {
        let yaml = r#"!Table
- { flow: 0.0004, head: 4.4, efficiency: 0.45 }
- { flow: 0.0, head: 6.0, efficiency: 0.1 }
"#;
        let curve: PumpCurve = serde_yaml::from_str(yaml).unwrap();
        let (lo, hi) = curve.flow_domain();
        assert_eq!(lo.value, 0.0);
        assert!((hi.value - 4.0e-4).abs() < 1e-18);
        assert!(curve.validate().is_ok());
    }
}
