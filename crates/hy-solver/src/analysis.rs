//! Per-scope pipeline: validation, flows, losses, paths and index circuit.
//!
//! Scopes share nothing mutable, so a batch of them runs in parallel and a
//! failure in one leaves the others complete.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::balancing::{BalancingResult, balance_with_existing};
use crate::config::EngineConfig;
use crate::duty::{PumpDuty, pump_duty};
use crate::error::SolverResult;
use crate::flows::{EdgeFlows, FlowDemands, assign_flows};
use crate::index::{IndexCircuit, index_circuit};
use crate::operating_point::{OperatingPoint, SystemCurve, operating_point};
use crate::paths::{HydraulicContext, PathResult, assemble_paths, edge_losses};
use hy_components::{PipeSize, PumpCharacteristic, size_pipe};
use hy_core::units::{Length, VolumeRate, m};
use hy_core::{EdgeId, GroupId, NodeId};
use hy_fluids::{FluidProperties, PipeMaterial};
use hy_graph::Topology;
use serde::{Deserialize, Serialize};

/// Hydraulic picture of one scope at design flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeAnalysis {
    pub scope: GroupId,
    pub source: NodeId,
    /// Flow leaving the source.
    pub total_flow: VolumeRate,
    pub edge_flows: EdgeFlows,
    pub paths: Vec<PathResult>,
    pub index: IndexCircuit,
}

impl ScopeAnalysis {
    /// Closed-loop system curve through (total flow, index head).
    pub fn system_curve(&self, fluid: &FluidProperties) -> SolverResult<SystemCurve> {
        let head = fluid.head_from_pressure(self.index.path.total_dp);
        SystemCurve::through_design_point(self.total_flow, head, m(0.0))
    }
}

/// Analyse one scope.
///
/// # Errors
/// The first error of the pipeline: topology, demand, then component errors.
pub fn analyze_scope(
    topology: &Topology,
    scope: GroupId,
    demands: &FlowDemands,
    ctx: &HydraulicContext,
) -> SolverResult<ScopeAnalysis> {
    let view = topology.scope(scope)?;
    let edge_flows = assign_flows(&view, demands)?;
    let losses = edge_losses(&view, &edge_flows, ctx)?;
    let paths = assemble_paths(&view, demands, &losses)?;
    let index = index_circuit(&paths)?;

    tracing::debug!(
        "Scope {} analysed: {} paths, index terminal {} at {:.1} Pa",
        scope,
        paths.len(),
        index.path.terminal,
        index.path.total_dp.value
    );

    Ok(ScopeAnalysis {
        scope,
        source: view.source(),
        total_flow: edge_flows.total(),
        edge_flows,
        paths,
        index,
    })
}

/// Analyse independent scopes in parallel, one result per scope in input order.
pub fn analyze_scopes(
    topology: &Topology,
    scopes: &[GroupId],
    demands: &FlowDemands,
    ctx: &HydraulicContext,
) -> Vec<SolverResult<ScopeAnalysis>> {
    scopes
        .par_iter()
        .map(|&scope| analyze_scope(topology, scope, demands, ctx))
        .collect()
}

/// Analysis plus balancing, pump duty and, given a pump, its operating point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeDesign {
    pub analysis: ScopeAnalysis,
    pub balancing: BalancingResult,
    pub duty: PumpDuty,
    pub operating_point: Option<OperatingPoint>,
}

/// Full design pass over one scope.
///
/// Every setting, friction included, comes from `config`. `existing` carries
/// valve settings from a previous pass.
#[allow(clippy::too_many_arguments)]
pub fn design_scope(
    topology: &Topology,
    scope: GroupId,
    demands: &FlowDemands,
    fluid: &FluidProperties,
    material: &PipeMaterial,
    config: &EngineConfig,
    existing: &BTreeMap<NodeId, f64>,
    pump: Option<&dyn PumpCharacteristic>,
) -> SolverResult<ScopeDesign> {
    let ctx = config.context(*fluid, *material);
    let analysis = analyze_scope(topology, scope, demands, &ctx)?;
    let balancing = balance_with_existing(
        &analysis.paths,
        &analysis.index,
        ctx.fluid.density,
        existing,
        &config.balancing,
    )?;
    let duty = pump_duty(
        analysis.total_flow,
        balancing.target_dp,
        &ctx.fluid,
        &config.duty,
    )?;

    let op = match pump {
        Some(pump) => {
            let head = ctx.fluid.head_from_pressure(balancing.target_dp);
            let system = SystemCurve::through_design_point(analysis.total_flow, head, m(0.0))?;
            Some(operating_point(
                &system,
                pump,
                &ctx.fluid,
                &config.operating_point,
            )?)
        }
        None => None,
    };

    Ok(ScopeDesign {
        analysis,
        balancing,
        duty,
        operating_point: op,
    })
}

/// Smallest candidate bore for every edge of a scope at its design flow.
pub fn size_scope(
    topology: &Topology,
    scope: GroupId,
    demands: &FlowDemands,
    fluid: &FluidProperties,
    material: &PipeMaterial,
    candidates: &[Length],
    config: &EngineConfig,
) -> SolverResult<BTreeMap<EdgeId, PipeSize>> {
    let ctx = config.context(*fluid, *material);
    let view = topology.scope(scope)?;
    let flows = assign_flows(&view, demands)?;
    let mut sizes = BTreeMap::new();
    for (edge, flow) in flows.iter() {
        let size = size_pipe(
            flow,
            candidates,
            &ctx.fluid,
            &ctx.material,
            &config.sizing,
            &ctx.friction,
        )
        .map_err(|e| e.on_edge(edge))?;
        sizes.insert(edge, size);
    }
    Ok(sizes)
}
