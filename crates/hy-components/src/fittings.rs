//! Loss coefficients for common hydronic fittings.

use hy_graph::FittingAllowance;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ComponentError;

/// Fitting types with a fixed loss coefficient K (velocity heads).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fitting {
    #[serde(rename = "ELBOW_90_STD")]
    Elbow90Std,
    #[serde(rename = "ELBOW_90_LONG")]
    Elbow90Long,
    #[serde(rename = "BEND_90_SWEPT")]
    Bend90Swept,
    #[serde(rename = "TEE_THROUGH")]
    TeeThrough,
    #[serde(rename = "TEE_BRANCH")]
    TeeBranch,
    #[serde(rename = "GATE_VALVE")]
    GateValve,
    #[serde(rename = "BALL_VALVE")]
    BallValve,
    #[serde(rename = "CHECK_VALVE")]
    CheckValve,
    /// Thermostatic radiator valve, fully open
    #[serde(rename = "TRV")]
    Trv,
    #[serde(rename = "LOCKSHIELD")]
    Lockshield,
}

impl Fitting {
    pub const ALL: [Fitting; 10] = [
        Fitting::Elbow90Std,
        Fitting::Elbow90Long,
        Fitting::Bend90Swept,
        Fitting::TeeThrough,
        Fitting::TeeBranch,
        Fitting::GateValve,
        Fitting::BallValve,
        Fitting::CheckValve,
        Fitting::Trv,
        Fitting::Lockshield,
    ];

    pub fn k_value(self) -> f64 {
        match self {
            Fitting::Elbow90Std => 0.9,
            Fitting::Elbow90Long => 0.6,
            Fitting::Bend90Swept => 0.2,
            Fitting::TeeThrough => 0.6,
            Fitting::TeeBranch => 1.8,
            Fitting::GateValve => 0.15,
            Fitting::BallValve => 0.05,
            Fitting::CheckValve => 2.0,
            Fitting::Trv => 2.5,
            Fitting::Lockshield => 1.5,
        }
    }

    /// Stable identifier, as used in input files.
    pub fn id(self) -> &'static str {
        match self {
            Fitting::Elbow90Std => "ELBOW_90_STD",
            Fitting::Elbow90Long => "ELBOW_90_LONG",
            Fitting::Bend90Swept => "BEND_90_SWEPT",
            Fitting::TeeThrough => "TEE_THROUGH",
            Fitting::TeeBranch => "TEE_BRANCH",
            Fitting::GateValve => "GATE_VALVE",
            Fitting::BallValve => "BALL_VALVE",
            Fitting::CheckValve => "CHECK_VALVE",
            Fitting::Trv => "TRV",
            Fitting::Lockshield => "LOCKSHIELD",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Fitting::Elbow90Std => "90° standard elbow",
            Fitting::Elbow90Long => "90° long-radius elbow",
            Fitting::Bend90Swept => "90° swept / formed bend",
            Fitting::TeeThrough => "Tee fitting, straight-through flow",
            Fitting::TeeBranch => "Tee fitting, branch flow",
            Fitting::GateValve => "Fully open gate valve",
            Fitting::BallValve => "Fully open ball valve",
            Fitting::CheckValve => "Spring-loaded check valve",
            Fitting::Trv => "Thermostatic radiator valve (open)",
            Fitting::Lockshield => "Lockshield valve (balanced)",
        }
    }
}

impl FromStr for Fitting {
    type Err = ComponentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fitting::ALL
            .into_iter()
            .find(|f| f.id() == s)
            .ok_or(ComponentError::InvalidArg {
                what: "unknown fitting identifier",
            })
    }
}

/// Sum of K over a list of fittings (repeat an entry for several of a kind).
pub fn k_sum<I>(fittings: I) -> f64
where
    I: IntoIterator<Item = Fitting>,
{
    fittings.into_iter().map(Fitting::k_value).sum()
}

/// Fitting allowance for an edge carrying these fittings.
pub fn allowance<I>(fittings: I) -> FittingAllowance
where
    I: IntoIterator<Item = Fitting>,
{
    FittingAllowance::KSum(k_sum(fittings))
}
