//! Index circuit selection.

use crate::error::{SolverError, SolverResult};
use crate::paths::PathResult;
use serde::{Deserialize, Serialize};

/// The path with the greatest pressure drop in its scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexCircuit {
    /// Position of the index path in the enumerated path list.
    pub position: usize,
    pub path: PathResult,
}

/// Path with the strict maximum `total_dp`; ties go to the earlier path.
///
/// # Errors
/// `NoPaths` for an empty slice.
pub fn index_circuit(paths: &[PathResult]) -> SolverResult<IndexCircuit> {
    let mut best: Option<(usize, &PathResult)> = None;
    for (i, p) in paths.iter().enumerate() {
        if best.is_none_or(|(_, b)| p.total_dp.value > b.total_dp.value) {
            best = Some((i, p));
        }
    }
    let (position, path) = best.ok_or(SolverError::NoPaths)?;
    Ok(IndexCircuit {
        position,
        path: path.clone(),
    })
}
