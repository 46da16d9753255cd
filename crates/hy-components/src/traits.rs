//! Pump characteristic trait.

use crate::error::ComponentResult;
use hy_core::units::{Length, VolumeRate};

/// Head and efficiency of a circulator against flow.
///
/// Implementations are deterministic functions of flow and are only
/// evaluated inside `flow_domain()`; callers never extrapolate.
pub trait PumpCharacteristic {
    /// Closed flow interval the characteristic is valid on.
    fn flow_domain(&self) -> (VolumeRate, VolumeRate);

    /// Head developed at `flow`.
    fn head_at(&self, flow: VolumeRate) -> ComponentResult<Length>;

    /// Efficiency at `flow`, validated to lie in (0, 1].
    fn efficiency_at(&self, flow: VolumeRate) -> ComponentResult<f64>;

    /// Check the characteristic describes a physical circulator, with head
    /// falling as flow rises.
    fn validate(&self) -> ComponentResult<()> {
        Ok(())
    }
}
