//! Terminal demands and their accumulation up the supply tree.

use std::collections::BTreeMap;

use crate::error::{SolverError, SolverResult};
use hy_core::units::{VolumeRate, m3ps};
use hy_core::{EdgeId, NodeId};
use hy_graph::ScopeView;
use serde::{Deserialize, Serialize};

/// Design flow required at each terminal, supplied by emitter sizing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowDemands {
    demands: BTreeMap<NodeId, VolumeRate>,
}

impl FlowDemands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, terminal: NodeId, flow: VolumeRate) {
        self.demands.insert(terminal, flow);
    }

    pub fn with(mut self, terminal: NodeId, flow: VolumeRate) -> Self {
        self.insert(terminal, flow);
        self
    }

    pub fn get(&self, terminal: NodeId) -> Option<VolumeRate> {
        self.demands.get(&terminal).copied()
    }

    pub fn len(&self) -> usize {
        self.demands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.demands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, VolumeRate)> + '_ {
        self.demands.iter().map(|(n, q)| (*n, *q))
    }

    /// Demand of a scope terminal, validated finite and positive.
    pub fn require(&self, terminal: NodeId) -> SolverResult<VolumeRate> {
        let q = self
            .get(terminal)
            .ok_or(SolverError::MissingDemand { terminal })?;
        if !q.value.is_finite() || q.value <= 0.0 {
            return Err(SolverError::InvalidDemand {
                terminal,
                value: q.value,
            });
        }
        Ok(q)
    }
}

impl FromIterator<(NodeId, VolumeRate)> for FlowDemands {
    fn from_iter<T: IntoIterator<Item = (NodeId, VolumeRate)>>(iter: T) -> Self {
        Self {
            demands: iter.into_iter().collect(),
        }
    }
}

/// Design flow in every edge of one scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeFlows {
    flows: BTreeMap<EdgeId, VolumeRate>,
    total: f64,
}

impl EdgeFlows {
    pub fn get(&self, edge: EdgeId) -> Option<VolumeRate> {
        self.flows.get(&edge).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EdgeId, VolumeRate)> + '_ {
        self.flows.iter().map(|(e, q)| (*e, *q))
    }

    /// Flow leaving the scope source: the sum of all terminal demands.
    pub fn total(&self) -> VolumeRate {
        m3ps(self.total)
    }
}

/// Assign design flows to every edge of a scope.
///
/// A supply edge carries the sum of the demands of all terminals below it;
/// a return edge carries the flow of its supply twin.
///
/// # Errors
/// `MissingDemand`/`InvalidDemand` for a terminal without a positive demand.
/// Demands for nodes outside the scope are ignored.
pub fn assign_flows(scope: &ScopeView<'_>, demands: &FlowDemands) -> SolverResult<EdgeFlows> {
    let mut sums: BTreeMap<EdgeId, f64> = BTreeMap::new();
    let mut total = 0.0;

    for &terminal in scope.terminals() {
        let q = demands.require(terminal)?.value;
        total += q;
        for e in scope.supply_chain(terminal) {
            *sums.entry(e).or_insert(0.0) += q;
        }
    }

    let mut flows = BTreeMap::new();
    for (&supply, &q) in &sums {
        flows.insert(supply, m3ps(q));
        if let Some(ret) = scope.twin_of(supply) {
            flows.insert(ret, m3ps(q));
        }
    }

    Ok(EdgeFlows { flows, total })
}
