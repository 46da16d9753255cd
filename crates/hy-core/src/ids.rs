use core::fmt;
use core::num::NonZeroU32;
use serde::{Deserialize, Serialize};

/// Arena handle for the nodes, edges and groups of a topology.
///
/// Stored as `index + 1` in a `NonZeroU32`, so `Option<Id>` costs nothing extra.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(NonZeroU32);

impl Id {
    /// Handle for arena slot `index`. `u32::MAX` saturates.
    pub fn from_index(index: u32) -> Self {
        Self(NonZeroU32::new(index.saturating_add(1)).unwrap_or(NonZeroU32::MAX))
    }

    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// The 0-based index as a `usize`, for arena lookups.
    pub fn slot(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

// Role aliases; all three share one representation.
pub type NodeId = Id;
pub type EdgeId = Id;
pub type GroupId = Id;
