//! Topology-specific error types.

use hy_core::{EdgeId, GroupId, NodeId};

pub type GraphResult<T> = Result<T, TopologyError>;

/// Topology construction and scope validation errors.
///
/// Structural errors are raised by `TopologyBuilder::build`; the scope-level
/// ones (tree shape, connectivity, return twins) by `ScopeView::new`, before
/// any pressure drop is evaluated for that scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// An edge refers to a node that doesn't exist.
    InvalidNodeRef { edge: EdgeId, node: NodeId },

    /// A group id (membership, parent or scope) doesn't exist.
    InvalidGroupRef { group: GroupId },

    /// An edge starts and ends at the same node.
    SelfLoop { edge: EdgeId },

    /// Diameter, length or fitting allowance is missing or non-physical.
    InvalidGeometry { edge: EdgeId, what: &'static str },

    /// The group hierarchy is not a tree.
    GroupCycle { group: GroupId },

    /// The scope contains no supply edges.
    EmptyScope { scope: GroupId },

    /// A node is fed by more than one supply edge within the scope.
    NotATree { scope: GroupId, node: NodeId },

    /// Supply edges form a loop with no source.
    Cycle { scope: GroupId, node: NodeId },

    /// More than one node in the scope has no incoming supply edge.
    MultipleSources { scope: GroupId, nodes: Vec<NodeId> },

    /// The scope's supply tree starts at a node that is neither plant nor manifold.
    InvalidSource { scope: GroupId, node: NodeId },

    /// A supply branch ends at a node that is not an emitter.
    DeadEnd { scope: GroupId, node: NodeId },

    /// An emitter feeds further supply edges; emitters must be leaves.
    EmitterInSeries { scope: GroupId, node: NodeId },

    /// An emitter in the scope is not reachable from the scope's source.
    DisconnectedTerminal { scope: GroupId, node: NodeId },

    /// A supply edge has no associated return edge.
    MissingReturn { scope: GroupId, edge: EdgeId },

    /// A return edge is not the reverse of any unpaired supply edge.
    OrphanReturn { scope: GroupId, edge: EdgeId },
}

impl std::fmt::Display for TopologyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopologyError::InvalidNodeRef { edge, node } => {
                write!(f, "Edge {} refers to non-existent node {}", edge, node)
            }
            TopologyError::InvalidGroupRef { group } => {
                write!(f, "Group {} does not exist", group)
            }
            TopologyError::SelfLoop { edge } => {
                write!(f, "Edge {} starts and ends at the same node", edge)
            }
            TopologyError::InvalidGeometry { edge, what } => {
                write!(f, "Edge {} has invalid geometry: {}", edge, what)
            }
            TopologyError::GroupCycle { group } => {
                write!(f, "Group {} is its own ancestor", group)
            }
            TopologyError::EmptyScope { scope } => {
                write!(f, "Scope {} contains no supply edges", scope)
            }
            TopologyError::NotATree { scope, node } => {
                write!(
                    f,
                    "Node {} is fed by more than one supply edge in scope {}",
                    node, scope
                )
            }
            TopologyError::Cycle { scope, node } => {
                write!(f, "Supply cycle through node {} in scope {}", node, scope)
            }
            TopologyError::MultipleSources { scope, nodes } => {
                let list: Vec<String> = nodes.iter().map(|n| n.to_string()).collect();
                write!(
                    f,
                    "Scope {} has several source nodes: [{}]",
                    scope,
                    list.join(", ")
                )
            }
            TopologyError::InvalidSource { scope, node } => {
                write!(
                    f,
                    "Scope {} starts at node {} which is not a plant or manifold",
                    scope, node
                )
            }
            TopologyError::DeadEnd { scope, node } => {
                write!(
                    f,
                    "Supply branch in scope {} ends at non-emitter node {}",
                    scope, node
                )
            }
            TopologyError::EmitterInSeries { scope, node } => {
                write!(
                    f,
                    "Emitter {} feeds further supply edges in scope {}",
                    node, scope
                )
            }
            TopologyError::DisconnectedTerminal { scope, node } => {
                write!(
                    f,
                    "Emitter {} is not connected to the source of scope {}",
                    node, scope
                )
            }
            TopologyError::MissingReturn { scope, edge } => {
                write!(f, "Supply edge {} in scope {} has no return edge", edge, scope)
            }
            TopologyError::OrphanReturn { scope, edge } => {
                write!(
                    f,
                    "Return edge {} in scope {} does not pair with a supply edge",
                    edge, scope
                )
            }
        }
    }
}

impl std::error::Error for TopologyError {}
