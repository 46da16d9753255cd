//! Structural validation run by the builder.

use crate::error::{GraphResult, TopologyError};
use crate::topology::{Edge, FittingAllowance, Group, Node};

/// Validate references, geometry and the group hierarchy.
pub(crate) fn validate_structure(nodes: &[Node], edges: &[Edge], groups: &[Group]) -> GraphResult<()> {
    validate_groups(groups)?;

    for node in nodes {
        for &g in &node.groups {
            if g.slot() >= groups.len() {
                return Err(TopologyError::InvalidGroupRef { group: g });
            }
        }
    }

    for edge in edges {
        for node in [edge.from, edge.to] {
            if node.slot() >= nodes.len() {
                return Err(TopologyError::InvalidNodeRef {
                    edge: edge.id,
                    node,
                });
            }
        }
        if edge.from == edge.to {
            return Err(TopologyError::SelfLoop { edge: edge.id });
        }
        for &g in &edge.groups {
            if g.slot() >= groups.len() {
                return Err(TopologyError::InvalidGroupRef { group: g });
            }
        }
        validate_geometry(edge)?;
    }

    Ok(())
}

fn validate_geometry(edge: &Edge) -> GraphResult<()> {
    let invalid = |what| TopologyError::InvalidGeometry {
        edge: edge.id,
        what,
    };

    let d = edge.diameter().value;
    if !d.is_finite() || d <= 0.0 {
        return Err(invalid("diameter must be positive"));
    }
    let l = edge.length().value;
    if !l.is_finite() || l < 0.0 {
        return Err(invalid("length must be non-negative"));
    }
    match edge.fittings() {
        FittingAllowance::None => {}
        FittingAllowance::EquivalentLength(le) => {
            if !le.value.is_finite() || le.value < 0.0 {
                return Err(invalid("equivalent length must be non-negative"));
            }
        }
        FittingAllowance::KSum(k) => {
            if !k.is_finite() || k < 0.0 {
                return Err(invalid("fitting K sum must be non-negative"));
            }
        }
    }
    Ok(())
}

/// Parents must exist and the hierarchy must be a forest.
fn validate_groups(groups: &[Group]) -> GraphResult<()> {
    for group in groups {
        if let Some(parent) = group.parent {
            if parent.slot() >= groups.len() {
                return Err(TopologyError::InvalidGroupRef { group: parent });
            }
        }
    }

    for group in groups {
        let mut current = group.parent;
        let mut steps = 0;
        while let Some(g) = current {
            if g == group.id || steps > groups.len() {
                return Err(TopologyError::GroupCycle { group: group.id });
            }
            current = groups[g.slot()].parent;
            steps += 1;
        }
    }

    Ok(())
}
