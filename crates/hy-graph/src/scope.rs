//! Scope views: the validated supply tree of one group and its routes.

use std::collections::BTreeMap;

use hy_core::{EdgeId, GroupId, NodeId};
use serde::{Deserialize, Serialize};

use crate::error::{GraphResult, TopologyError};
use crate::topology::{EdgeRole, NodeRole, ReturnRouting, Topology};

/// Ordered edges from the scope source to one terminal and back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub terminal: NodeId,
    /// Supply edges, source first.
    pub supply: Vec<EdgeId>,
    /// Return edges, source last.
    pub returns: Vec<EdgeId>,
}

impl Route {
    /// Supply edges followed by return edges.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.supply.iter().chain(self.returns.iter()).copied()
    }

    pub fn len(&self) -> usize {
        self.supply.len() + self.returns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supply.is_empty() && self.returns.is_empty()
    }
}

/// Validated view of one scope (system, leg, subleg or zone).
///
/// Within a scope the supply edges must form a tree rooted at a single plant
/// or manifold, every leaf must be an emitter (and every emitter a leaf), and
/// every supply edge must have exactly one return twin (the return edge
/// running the opposite way between the same nodes).
#[derive(Debug, Clone)]
pub struct ScopeView<'a> {
    topology: &'a Topology,
    scope: GroupId,
    routing: ReturnRouting,
    source: NodeId,
    /// Supply edges in depth-first preorder from the source.
    supply_edges: Vec<EdgeId>,
    /// Incoming supply edge per node slot.
    parent_edge: Vec<Option<EdgeId>>,
    /// Supply <-> return pairing per edge slot.
    twin: Vec<Option<EdgeId>>,
    /// Supply depth (edge count from source) per node slot.
    depth: Vec<usize>,
    /// Terminals, nearest first, ties in discovery order.
    terminals: Vec<NodeId>,
}

impl Topology {
    /// Validate and return the view of one scope.
    pub fn scope(&self, scope: GroupId) -> GraphResult<ScopeView<'_>> {
        ScopeView::new(self, scope)
    }
}

impl<'a> ScopeView<'a> {
    pub fn new(topology: &'a Topology, scope: GroupId) -> GraphResult<Self> {
        let group = topology
            .group(scope)
            .ok_or(TopologyError::InvalidGroupRef { group: scope })?;

        let n_nodes = topology.nodes().len();
        let n_edges = topology.edges().len();

        let mut in_scope_supply = vec![false; n_edges];
        let mut supply = Vec::new();
        let mut returns = Vec::new();
        for edge in topology.edges() {
            if !topology.edge_in_scope(edge.id, scope) {
                continue;
            }
            match edge.role {
                EdgeRole::Supply => {
                    in_scope_supply[edge.id.slot()] = true;
                    supply.push(edge.id);
                }
                EdgeRole::Return => returns.push(edge.id),
            }
        }
        if supply.is_empty() {
            return Err(TopologyError::EmptyScope { scope });
        }

        // Each node may be fed by at most one supply edge.
        let mut parent_edge: Vec<Option<EdgeId>> = vec![None; n_nodes];
        for &e in &supply {
            let to = topology.edges()[e.slot()].to;
            if parent_edge[to.slot()].is_some() {
                return Err(TopologyError::NotATree { scope, node: to });
            }
            parent_edge[to.slot()] = Some(e);
        }

        let mut sources: Vec<NodeId> = supply
            .iter()
            .map(|e| topology.edges()[e.slot()].from)
            .filter(|n| parent_edge[n.slot()].is_none())
            .collect();
        sources.sort();
        sources.dedup();
        let source = match sources.as_slice() {
            [] => {
                let node = topology.edges()[supply[0].slot()].from;
                return Err(TopologyError::Cycle { scope, node });
            }
            [single] => *single,
            _ => {
                return Err(TopologyError::MultipleSources {
                    scope,
                    nodes: sources,
                });
            }
        };
        if !topology.nodes()[source.slot()].role.can_source() {
            return Err(TopologyError::InvalidSource {
                scope,
                node: source,
            });
        }

        // Depth-first walk from the source, children in edge-id order.
        let children = |node: NodeId| -> Vec<EdgeId> {
            topology
                .outgoing(node)
                .iter()
                .copied()
                .filter(|e| in_scope_supply[e.slot()])
                .collect()
        };
        let mut depth = vec![0usize; n_nodes];
        let mut visited = vec![false; n_edges];
        let mut supply_edges = Vec::with_capacity(supply.len());
        let mut discovered_terminals = Vec::new();
        let mut stack: Vec<EdgeId> = children(source).into_iter().rev().collect();
        while let Some(e) = stack.pop() {
            if visited[e.slot()] {
                continue;
            }
            visited[e.slot()] = true;
            supply_edges.push(e);

            let edge = &topology.edges()[e.slot()];
            depth[edge.to.slot()] = depth[edge.from.slot()] + 1;
            let next = children(edge.to);
            let is_emitter = topology.nodes()[edge.to.slot()].role == NodeRole::Emitter;
            if is_emitter && !next.is_empty() {
                return Err(TopologyError::EmitterInSeries {
                    scope,
                    node: edge.to,
                });
            }
            if next.is_empty() {
                if !is_emitter {
                    return Err(TopologyError::DeadEnd {
                        scope,
                        node: edge.to,
                    });
                }
                discovered_terminals.push(edge.to);
            }
            stack.extend(next.into_iter().rev());
        }

        // Anything not reached hangs off a loop with no way in from the source.
        if let Some(&e) = supply.iter().find(|e| !visited[e.slot()]) {
            let node = topology.edges()[e.slot()].from;
            return Err(TopologyError::Cycle { scope, node });
        }

        for node in topology.nodes() {
            if node.role == NodeRole::Emitter
                && topology.node_in_scope(node.id, scope)
                && !discovered_terminals.contains(&node.id)
                && parent_edge[node.id.slot()].is_none()
            {
                return Err(TopologyError::DisconnectedTerminal {
                    scope,
                    node: node.id,
                });
            }
        }

        let twin = Self::pair_returns(topology, scope, &supply, &returns)?;

        let mut terminals = discovered_terminals;
        terminals.sort_by_key(|n| depth[n.slot()]);

        Ok(Self {
            topology,
            scope,
            routing: group.routing,
            source,
            supply_edges,
            parent_edge,
            twin,
            depth,
            terminals,
        })
    }

    /// Pair every supply edge a→b with the return edge b→a, lowest ids first.
    fn pair_returns(
        topology: &Topology,
        scope: GroupId,
        supply: &[EdgeId],
        returns: &[EdgeId],
    ) -> GraphResult<Vec<Option<EdgeId>>> {
        let mut twin = vec![None; topology.edges().len()];
        let by_endpoints: BTreeMap<(NodeId, NodeId), EdgeId> = supply
            .iter()
            .map(|&e| {
                let edge = &topology.edges()[e.slot()];
                ((edge.from, edge.to), e)
            })
            .collect();

        for &r in returns {
            let edge = &topology.edges()[r.slot()];
            match by_endpoints.get(&(edge.to, edge.from)) {
                Some(&s) if twin[s.slot()].is_none() => {
                    twin[s.slot()] = Some(r);
                    twin[r.slot()] = Some(s);
                }
                _ => return Err(TopologyError::OrphanReturn { scope, edge: r }),
            }
        }

        if let Some(&missing) = supply.iter().find(|s| twin[s.slot()].is_none()) {
            return Err(TopologyError::MissingReturn {
                scope,
                edge: missing,
            });
        }

        Ok(twin)
    }

    pub fn topology(&self) -> &'a Topology {
        self.topology
    }

    pub fn scope(&self) -> GroupId {
        self.scope
    }

    pub fn routing(&self) -> ReturnRouting {
        self.routing
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Terminals in enumeration order: nearest first, ties in discovery order.
    pub fn terminals(&self) -> &[NodeId] {
        &self.terminals
    }

    pub fn is_terminal(&self, node: NodeId) -> bool {
        self.terminals.contains(&node)
    }

    /// Supply edges in depth-first preorder.
    pub fn supply_edges(&self) -> &[EdgeId] {
        &self.supply_edges
    }

    /// Every edge of the scope: supply edges in preorder, then their return twins.
    pub fn edges(&self) -> Vec<EdgeId> {
        let returns = self.supply_edges.iter().filter_map(|e| self.twin_of(*e));
        self.supply_edges.iter().copied().chain(returns).collect()
    }

    /// The paired edge of a supply or return edge.
    pub fn twin_of(&self, edge: EdgeId) -> Option<EdgeId> {
        self.twin.get(edge.slot()).copied().flatten()
    }

    /// Number of supply edges between the source and `node`.
    pub fn depth(&self, node: NodeId) -> usize {
        self.depth.get(node.slot()).copied().unwrap_or(0)
    }

    /// Supply edges from the source down to `node`, source first.
    pub fn supply_chain(&self, node: NodeId) -> Vec<EdgeId> {
        let mut chain = Vec::new();
        let mut current = node;
        while current != self.source {
            match self.parent_edge.get(current.slot()).copied().flatten() {
                Some(e) => {
                    chain.push(e);
                    current = self.topology.edges()[e.slot()].from;
                }
                None => break,
            }
            if chain.len() > self.supply_edges.len() {
                break;
            }
        }
        chain.reverse();
        chain
    }

    /// Return twins of `node`'s supply chain, from `node` back to the source.
    pub fn return_chain(&self, node: NodeId) -> Vec<EdgeId> {
        self.supply_chain(node)
            .iter()
            .rev()
            .filter_map(|&e| self.twin_of(e))
            .collect()
    }

    /// One route per terminal, in terminal order.
    ///
    /// Direct return: each terminal returns along its own supply route
    /// reversed. Reverse return: the i-th terminal (nearest first) returns
    /// along the return chain of the i-th terminal from the far end, so the
    /// first supplied is the last returned.
    pub fn routes(&self) -> Vec<Route> {
        let n = self.terminals.len();
        self.terminals
            .iter()
            .enumerate()
            .map(|(i, &terminal)| {
                let return_from = match self.routing {
                    ReturnRouting::Direct => terminal,
                    ReturnRouting::Reverse => self.terminals[n - 1 - i],
                };
                Route {
                    terminal,
                    supply: self.supply_chain(terminal),
                    returns: self.return_chain(return_from),
                }
            })
            .collect()
    }
}
