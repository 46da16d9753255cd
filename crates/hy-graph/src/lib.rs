//! hy-graph: topology layer for the hydronics engine.
//!
//! Provides:
//! - Core topology data structures (Node, Edge, Group, Topology)
//! - Incremental topology builder with validation
//! - Scope views: the validated supply tree of one system/leg/subleg/zone,
//!   with return twins and supply→return routes per terminal
//!
//! The topology carries structure and pipe geometry only; no flows or losses.
//!
//! # Example
//!
//! ```
//! use hy_core::units::{m, mm};
//! use hy_graph::{
//!     GroupKind, NodeRole, PipeGeometry, ReturnRouting, TopologyBuilder,
//! };
//!
//! let mut b = TopologyBuilder::new();
//! let leg = b.add_group("leg-1", GroupKind::Leg, None, ReturnRouting::Direct);
//! let manifold = b.add_node("manifold", NodeRole::Manifold);
//! let rad = b.add_node("radiator", NodeRole::Emitter);
//! let pipe = PipeGeometry::new(mm(15.0), m(8.0));
//! let flow = b.add_supply("flow", manifold, rad, pipe);
//! let ret = b.add_return("return", rad, manifold, pipe);
//! b.add_edge_to_group(flow, leg);
//! b.add_edge_to_group(ret, leg);
//! let topology = b.build().unwrap();
//!
//! let scope = topology.scope(leg).unwrap();
//! assert_eq!(scope.source(), manifold);
//! assert_eq!(scope.routes().len(), 1);
//! ```

pub mod builder;
pub mod error;
pub mod scope;
pub mod topology;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::TopologyBuilder;
pub use error::{GraphResult, TopologyError};
pub use scope::{Route, ScopeView};
pub use topology::{
    Edge, EdgeRole, FittingAllowance, Group, GroupKind, Node, NodeRole, PipeGeometry,
    ReturnRouting, Topology,
};
