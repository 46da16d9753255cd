//! Core topology data structures.

use hy_core::units::Length;
use hy_core::{EdgeId, GroupId, NodeId};
use serde::{Deserialize, Serialize};

/// What a node is in the circuit. Nodes hold no physical quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeRole {
    /// Heat source (boiler, heat pump) with its circulator.
    Plant,
    /// Distribution header feeding legs.
    Manifold,
    /// Room emitter (radiator, UFH loop, fan coil). Terminals of the supply tree.
    Emitter,
    /// Plain tee or branch point.
    Junction,
}

impl NodeRole {
    /// Whether a scope's supply tree may start here.
    pub fn can_source(self) -> bool {
        matches!(self, NodeRole::Plant | NodeRole::Manifold)
    }
}

/// Flow or return side of a pipe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeRole {
    Supply,
    Return,
}

/// Level of a group in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKind {
    System,
    Leg,
    Subleg,
    Zone,
}

/// How returns are routed back to the source of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReturnRouting {
    /// Each branch returns along the shortest route (its own supply route reversed).
    #[default]
    Direct,
    /// First supplied, last returned.
    Reverse,
}

/// Minor-loss allowance for the fittings on an edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum FittingAllowance {
    #[default]
    None,
    /// Extra straight-pipe length with the same loss as the fittings.
    EquivalentLength(Length),
    /// Sum of fitting loss coefficients (velocity heads).
    KSum(f64),
}

/// Pipe geometry of one edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipeGeometry {
    /// Internal diameter.
    pub diameter: Length,
    /// Physical length.
    pub length: Length,
    #[serde(default)]
    pub fittings: FittingAllowance,
}

impl PipeGeometry {
    pub fn new(diameter: Length, length: Length) -> Self {
        Self {
            diameter,
            length,
            fittings: FittingAllowance::None,
        }
    }

    pub fn with_fittings(mut self, fittings: FittingAllowance) -> Self {
        self.fittings = fittings;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub role: NodeRole,
    pub groups: Vec<GroupId>,
}

/// A pipe segment between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub name: String,
    pub from: NodeId,
    pub to: NodeId,
    pub role: EdgeRole,
    pub geometry: PipeGeometry,
    pub groups: Vec<GroupId>,
}

impl Edge {
    pub fn diameter(&self) -> Length {
        self.geometry.diameter
    }

    pub fn length(&self) -> Length {
        self.geometry.length
    }

    pub fn fittings(&self) -> FittingAllowance {
        self.geometry.fittings
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub kind: GroupKind,
    pub parent: Option<GroupId>,
    pub routing: ReturnRouting,
}

/// A validated, immutable hydronic topology.
///
/// Nodes, edges and groups live in arenas indexed by their ids. Outgoing
/// edges per node are kept in a compact offset table sorted by edge id, so
/// every traversal is deterministic.
#[derive(Debug, Clone)]
pub struct Topology {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) groups: Vec<Group>,

    /// node i's outgoing edges are in out_edges[out_offsets[i]..out_offsets[i+1]].
    pub(crate) out_offsets: Vec<usize>,
    pub(crate) out_edges: Vec<EdgeId>,
}

impl Topology {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.slot())
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.slot())
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.slot())
    }

    /// Edges leaving a node, in id order.
    pub fn outgoing(&self, node: NodeId) -> &[EdgeId] {
        let idx = node.slot();
        if idx >= self.nodes.len() {
            return &[];
        }
        &self.out_edges[self.out_offsets[idx]..self.out_offsets[idx + 1]]
    }

    /// True if `group` is `ancestor` or lies below it in the hierarchy.
    pub fn group_contains(&self, ancestor: GroupId, group: GroupId) -> bool {
        let mut current = Some(group);
        // The hierarchy is validated acyclic; the bound only guards the walk.
        for _ in 0..=self.groups.len() {
            match current {
                Some(g) if g == ancestor => return true,
                Some(g) => current = self.group(g).and_then(|grp| grp.parent),
                None => return false,
            }
        }
        false
    }

    pub fn edge_in_scope(&self, edge: EdgeId, scope: GroupId) -> bool {
        self.edge(edge)
            .is_some_and(|e| e.groups.iter().any(|&g| self.group_contains(scope, g)))
    }

    pub fn node_in_scope(&self, node: NodeId, scope: GroupId) -> bool {
        self.node(node)
            .is_some_and(|n| n.groups.iter().any(|&g| self.group_contains(scope, g)))
    }

    /// Direct children of a group, in id order.
    pub fn child_groups(&self, parent: GroupId) -> Vec<GroupId> {
        self.groups
            .iter()
            .filter(|g| g.parent == Some(parent))
            .map(|g| g.id)
            .collect()
    }

    /// All groups of one kind, in id order.
    pub fn groups_of_kind(&self, kind: GroupKind) -> Vec<GroupId> {
        self.groups
            .iter()
            .filter(|g| g.kind == kind)
            .map(|g| g.id)
            .collect()
    }
}
