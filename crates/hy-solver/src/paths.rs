//! Supply→return path enumeration with per-edge pressure drops.

use std::collections::BTreeMap;

use crate::error::{SolverError, SolverResult};
use crate::flows::{EdgeFlows, FlowDemands, assign_flows};
use hy_components::{FrictionConfig, PressureDropResult, pressure_drop_with};
use hy_core::units::{Length, Pressure, VolumeRate, m, m3ps, pa};
use hy_core::{EdgeId, GroupId, NodeId};
use hy_fluids::{FluidProperties, PipeMaterial};
use hy_graph::{ScopeView, Topology};
use serde::{Deserialize, Serialize};

/// Fluid, pipe material and friction settings shared by every edge of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HydraulicContext {
    pub fluid: FluidProperties,
    pub material: PipeMaterial,
    pub friction: FrictionConfig,
}

impl HydraulicContext {
    pub fn new(fluid: FluidProperties, material: PipeMaterial) -> Self {
        Self {
            fluid,
            material,
            friction: FrictionConfig::default(),
        }
    }

    pub fn with_friction(mut self, friction: FrictionConfig) -> Self {
        self.friction = friction;
        self
    }
}

/// One edge of a path at its assigned flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentLoss {
    pub edge: EdgeId,
    pub flow: VolumeRate,
    pub loss: PressureDropResult,
}

/// A supply→terminal→return path and its total pressure drop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    pub terminal: NodeId,
    /// Supply edges source first, then return edges back to the source.
    pub segments: Vec<SegmentLoss>,
    /// Physical pipe length, fittings excluded.
    pub total_length: Length,
    pub total_dp: Pressure,
    /// Demand of the terminal the path serves.
    pub design_flow: VolumeRate,
}

impl PathResult {
    pub fn edges(&self) -> Vec<EdgeId> {
        self.segments.iter().map(|s| s.edge).collect()
    }
}

/// Pressure drop of every edge in `scope` at its assigned flow.
///
/// Each edge is evaluated once and shared by every path through it.
pub(crate) fn edge_losses(
    scope: &ScopeView<'_>,
    flows: &EdgeFlows,
    ctx: &HydraulicContext,
) -> SolverResult<BTreeMap<EdgeId, SegmentLoss>> {
    let topology = scope.topology();
    let mut losses = BTreeMap::new();
    for id in scope.edges() {
        let edge = topology.edge(id).ok_or(SolverError::InvalidArg {
            what: "scope edge missing from topology",
        })?;
        let flow = flows.get(id).unwrap_or(m3ps(0.0));
        let loss = pressure_drop_with(edge, flow, &ctx.fluid, &ctx.material, &ctx.friction)?;
        losses.insert(id, SegmentLoss { edge: id, flow, loss });
    }
    Ok(losses)
}

/// Assemble one path per route of `scope` from precomputed edge losses.
pub(crate) fn assemble_paths(
    scope: &ScopeView<'_>,
    demands: &FlowDemands,
    losses: &BTreeMap<EdgeId, SegmentLoss>,
) -> SolverResult<Vec<PathResult>> {
    let topology = scope.topology();
    let mut paths = Vec::with_capacity(scope.terminals().len());

    for route in scope.routes() {
        let mut segments = Vec::with_capacity(route.len());
        let mut length = 0.0;
        let mut dp = 0.0;
        for id in route.edges() {
            let seg = *losses.get(&id).ok_or(SolverError::InvalidArg {
                what: "route edge has no computed loss",
            })?;
            length += topology.edge(id).map_or(0.0, |e| e.length().value);
            dp += seg.loss.head_loss.value;
            segments.push(seg);
        }
        paths.push(PathResult {
            terminal: route.terminal,
            segments,
            total_length: m(length),
            total_dp: pa(dp),
            design_flow: demands.require(route.terminal)?,
        });
    }

    Ok(paths)
}

/// Enumerate every supply→return path of `scope` with its pressure drop.
///
/// Paths come back in terminal order (nearest first, then discovery order),
/// which is the tie-break order of [`crate::index_circuit`].
///
/// # Errors
/// Topology errors for an invalid scope, demand errors for a terminal
/// without a positive demand, component errors naming the failing edge.
pub fn enumerate_paths(
    topology: &Topology,
    scope: GroupId,
    demands: &FlowDemands,
    ctx: &HydraulicContext,
) -> SolverResult<Vec<PathResult>> {
    let view = topology.scope(scope)?;
    let flows = assign_flows(&view, demands)?;
    let losses = edge_losses(&view, &flows, ctx)?;
    assemble_paths(&view, demands, &losses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hy_core::units::{lps, mm};
    use hy_fluids::Material;
    use hy_graph::{GroupKind, NodeRole, PipeGeometry, ReturnRouting, TopologyBuilder};

    fn ctx() -> HydraulicContext {
        HydraulicContext::new(
            FluidProperties::water_20c(),
            PipeMaterial::standard(Material::Copper),
        )
    }

    #[test]
    fn single_terminal_sums_its_edges() {
        let mut b = TopologyBuilder::new();
        let g = b.add_group("leg", GroupKind::Leg, None, ReturnRouting::Direct);
        let mnf = b.add_node("M", NodeRole::Manifold);
        let rad = b.add_node("R", NodeRole::Emitter);
        let f = b.add_supply("f", mnf, rad, PipeGeometry::new(mm(13.6), m(6.0)));
        let r = b.add_return("r", rad, mnf, PipeGeometry::new(mm(13.6), m(7.0)));
        b.add_edge_to_group(f, g);
        b.add_edge_to_group(r, g);
        let topo = b.build().unwrap();

        let demands = FlowDemands::new().with(rad, lps(0.05));
        let paths = enumerate_paths(&topo, g, &demands, &ctx()).unwrap();
        assert_eq!(paths.len(), 1);

        let p = &paths[0];
        assert_eq!(p.edges(), vec![f, r]);
        assert!((p.total_length.value - 13.0).abs() < 1e-12);

        let sum: f64 = [f, r]
            .iter()
            .map(|&e| {
                hy_components::pressure_drop(
                    topo.edge(e).unwrap(),
                    lps(0.05),
                    &FluidProperties::water_20c(),
                    &PipeMaterial::standard(Material::Copper),
                )
                .unwrap()
                .head_loss
                .value
            })
            .sum();
        assert!((p.total_dp.value - sum).abs() < 1e-9);
    }

    #[test]
    fn missing_demand_stops_the_scope() {
        let mut b = TopologyBuilder::new();
        let g = b.add_group("leg", GroupKind::Leg, None, ReturnRouting::Direct);
        let mnf = b.add_node("M", NodeRole::Manifold);
        let rad = b.add_node("R", NodeRole::Emitter);
        let pipe = PipeGeometry::new(mm(13.6), m(6.0));
        let f = b.add_supply("f", mnf, rad, pipe);
        let r = b.add_return("r", rad, mnf, pipe);
        b.add_edge_to_group(f, g);
        b.add_edge_to_group(r, g);
        let topo = b.build().unwrap();

        let err = enumerate_paths(&topo, g, &FlowDemands::new(), &ctx()).unwrap_err();
        assert_eq!(err, SolverError::MissingDemand { terminal: rad });
    }
}
