//! Incremental topology builder.

use hy_core::{EdgeId, GroupId, NodeId};

use crate::error::GraphResult;
use crate::topology::{
    Edge, EdgeRole, Group, GroupKind, Node, NodeRole, PipeGeometry, ReturnRouting, Topology,
};
use crate::validate;

/// Builder for constructing a topology incrementally.
///
/// Use `add_group`, `add_node` and `add_supply`/`add_return` to build up the
/// network, then call `build()` to validate and freeze it into an immutable
/// `Topology`. Any change after that means building a new topology.
#[derive(Debug, Default)]
pub struct TopologyBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    groups: Vec<Group>,
}

impl TopologyBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group. `parent` must refer to an earlier group (or be `None` for a root).
    pub fn add_group(
        &mut self,
        name: impl Into<String>,
        kind: GroupKind,
        parent: Option<GroupId>,
        routing: ReturnRouting,
    ) -> GroupId {
        let id = GroupId::from_index(self.groups.len() as u32);
        self.groups.push(Group {
            id,
            name: name.into(),
            kind,
            parent,
            routing,
        });
        id
    }

    /// Add a node and return its ID.
    pub fn add_node(&mut self, name: impl Into<String>, role: NodeRole) -> NodeId {
        let id = NodeId::from_index(self.nodes.len() as u32);
        self.nodes.push(Node {
            id,
            name: name.into(),
            role,
            groups: Vec::new(),
        });
        id
    }

    /// Add a pipe segment from `from` to `to` in the direction of flow.
    pub fn add_edge(
        &mut self,
        name: impl Into<String>,
        from: NodeId,
        to: NodeId,
        role: EdgeRole,
        geometry: PipeGeometry,
    ) -> EdgeId {
        let id = EdgeId::from_index(self.edges.len() as u32);
        self.edges.push(Edge {
            id,
            name: name.into(),
            from,
            to,
            role,
            geometry,
            groups: Vec::new(),
        });
        id
    }

    /// Add a flow-side segment.
    pub fn add_supply(
        &mut self,
        name: impl Into<String>,
        from: NodeId,
        to: NodeId,
        geometry: PipeGeometry,
    ) -> EdgeId {
        self.add_edge(name, from, to, EdgeRole::Supply, geometry)
    }

    /// Add a return-side segment. Its twin is the supply edge running `to -> from`.
    pub fn add_return(
        &mut self,
        name: impl Into<String>,
        from: NodeId,
        to: NodeId,
        geometry: PipeGeometry,
    ) -> EdgeId {
        self.add_edge(name, from, to, EdgeRole::Return, geometry)
    }

    pub fn add_node_to_group(&mut self, node: NodeId, group: GroupId) {
        if let Some(n) = self.nodes.get_mut(node.slot()) {
            if !n.groups.contains(&group) {
                n.groups.push(group);
            }
        }
    }

    pub fn add_edge_to_group(&mut self, edge: EdgeId, group: GroupId) {
        if let Some(e) = self.edges.get_mut(edge.slot()) {
            if !e.groups.contains(&group) {
                e.groups.push(group);
            }
        }
    }

    /// Build and validate the topology.
    ///
    /// Checks references, pipe geometry and the group hierarchy, then builds
    /// the outgoing-edge adjacency.
    pub fn build(self) -> GraphResult<Topology> {
        validate::validate_structure(&self.nodes, &self.edges, &self.groups)?;

        let (out_offsets, out_edges) = Self::build_adjacency(&self.nodes, &self.edges);

        Ok(Topology {
            nodes: self.nodes,
            edges: self.edges,
            groups: self.groups,
            out_offsets,
            out_edges,
        })
    }

    /// Build compact adjacency lists: for each node, its outgoing edges in id order.
    fn build_adjacency(nodes: &[Node], edges: &[Edge]) -> (Vec<usize>, Vec<EdgeId>) {
        let mut per_node: Vec<Vec<EdgeId>> = vec![Vec::new(); nodes.len()];
        for edge in edges {
            per_node[edge.from.slot()].push(edge.id);
        }

        let mut offsets = Vec::with_capacity(nodes.len() + 1);
        let mut flat = Vec::with_capacity(edges.len());
        offsets.push(0);
        for mut list in per_node {
            list.sort();
            flat.extend_from_slice(&list);
            offsets.push(flat.len());
        }

        (offsets, flat)
    }
}
