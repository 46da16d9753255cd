//! Integration tests for hy-graph.

use hy_core::units::{m, mm};
use hy_core::{EdgeId, GroupId, NodeId};
use hy_graph::{
    FittingAllowance, GroupKind, NodeRole, PipeGeometry, ReturnRouting, Topology,
    TopologyBuilder, TopologyError,
};

fn pipe(len: f64) -> PipeGeometry {
    PipeGeometry::new(mm(15.0), m(len))
}

struct Ladder {
    topology: Topology,
    scope: GroupId,
    t1: NodeId,
    t2: NodeId,
    r1: NodeId,
    r2: NodeId,
    supply: [EdgeId; 4],
    returns: [EdgeId; 4],
}

/// Manifold -> T1 -> T2 with a radiator off each tee:
///
/// ```text
/// M --s0-- T1 --s1-- T2 --s3-- R2
///          |
///          s2
///          |
///          R1
/// ```
fn ladder(routing: ReturnRouting) -> Ladder {
    let mut b = TopologyBuilder::new();
    let g = b.add_group("leg", GroupKind::Leg, None, routing);
    let mnf = b.add_node("M", NodeRole::Manifold);
    let t1 = b.add_node("T1", NodeRole::Junction);
    let t2 = b.add_node("T2", NodeRole::Junction);
    let r1 = b.add_node("R1", NodeRole::Emitter);
    let r2 = b.add_node("R2", NodeRole::Emitter);

    let s0 = b.add_supply("s0", mnf, t1, pipe(5.0));
    let s1 = b.add_supply("s1", t1, t2, pipe(3.0));
    let s2 = b.add_supply("s2", t1, r1, pipe(2.0));
    let s3 = b.add_supply("s3", t2, r2, pipe(2.0));
    let q0 = b.add_return("q0", t1, mnf, pipe(5.0));
    let q1 = b.add_return("q1", t2, t1, pipe(3.0));
    let q2 = b.add_return("q2", r1, t1, pipe(2.0));
    let q3 = b.add_return("q3", r2, t2, pipe(2.0));

    for e in [s0, s1, s2, s3, q0, q1, q2, q3] {
        b.add_edge_to_group(e, g);
    }
    for n in [mnf, t1, t2, r1, r2] {
        b.add_node_to_group(n, g);
    }

    Ladder {
        topology: b.build().unwrap(),
        scope: g,
        t1,
        t2,
        r1,
        r2,
        supply: [s0, s1, s2, s3],
        returns: [q0, q1, q2, q3],
    }
}

#[test]
fn direct_return_routes() {
    let l = ladder(ReturnRouting::Direct);
    let view = l.topology.scope(l.scope).unwrap();
    let [s0, s1, s2, s3] = l.supply;
    let [q0, q1, q2, q3] = l.returns;

    // Preorder visits s0, then T1's children in id order.
    assert_eq!(view.supply_edges(), &[s0, s1, s3, s2]);
    // R1 is nearer than R2 even though R2 is discovered first.
    assert_eq!(view.terminals(), &[l.r1, l.r2]);
    assert_eq!(view.depth(l.t1), 1);
    assert_eq!(view.depth(l.t2), 2);

    let routes = view.routes();
    assert_eq!(routes[0].terminal, l.r1);
    assert_eq!(routes[0].supply, vec![s0, s2]);
    assert_eq!(routes[0].returns, vec![q2, q0]);
    assert_eq!(routes[1].terminal, l.r2);
    assert_eq!(routes[1].supply, vec![s0, s1, s3]);
    assert_eq!(routes[1].returns, vec![q3, q1, q0]);
}

#[test]
fn reverse_return_routes() {
    let l = ladder(ReturnRouting::Reverse);
    let view = l.topology.scope(l.scope).unwrap();
    let [s0, s1, s2, s3] = l.supply;
    let [q0, q1, q2, q3] = l.returns;

    let routes = view.routes();
    // First supplied, last returned.
    assert_eq!(routes[0].supply, vec![s0, s2]);
    assert_eq!(routes[0].returns, vec![q3, q1, q0]);
    assert_eq!(routes[1].supply, vec![s0, s1, s3]);
    assert_eq!(routes[1].returns, vec![q2, q0]);
}

#[test]
fn every_edge_appears_once_in_scope_edges() {
    let l = ladder(ReturnRouting::Direct);
    let view = l.topology.scope(l.scope).unwrap();
    let mut edges = view.edges();
    edges.sort();
    let mut expected: Vec<_> = l.supply.iter().chain(l.returns.iter()).copied().collect();
    expected.sort();
    assert_eq!(edges, expected);
    for (s, r) in l.supply.iter().zip(l.returns.iter()) {
        assert_eq!(view.twin_of(*s), Some(*r));
    }
}

#[test]
fn supply_chain_of_intermediate_node() {
    let l = ladder(ReturnRouting::Direct);
    let view = l.topology.scope(l.scope).unwrap();
    assert_eq!(view.supply_chain(l.t2), vec![l.supply[0], l.supply[1]]);
    assert_eq!(view.return_chain(l.t2), vec![l.returns[1], l.returns[0]]);
    assert!(view.supply_chain(view.source()).is_empty());
}

#[test]
fn nested_groups_fold_into_parent_scope() {
    let mut b = TopologyBuilder::new();
    let sys = b.add_group("sys", GroupKind::System, None, ReturnRouting::Direct);
    let leg_a = b.add_group("a", GroupKind::Leg, Some(sys), ReturnRouting::Direct);
    let leg_b = b.add_group("b", GroupKind::Leg, Some(sys), ReturnRouting::Direct);
    let plant = b.add_node("boiler", NodeRole::Plant);
    let ra = b.add_node("RA", NodeRole::Emitter);
    let rb = b.add_node("RB", NodeRole::Emitter);
    let sa = b.add_supply("sa", plant, ra, pipe(4.0));
    let qa = b.add_return("qa", ra, plant, pipe(4.0));
    let sb = b.add_supply("sb", plant, rb, pipe(9.0));
    let qb = b.add_return("qb", rb, plant, pipe(9.0));
    for e in [sa, qa] {
        b.add_edge_to_group(e, leg_a);
    }
    for e in [sb, qb] {
        b.add_edge_to_group(e, leg_b);
    }
    let topo = b.build().unwrap();

    assert_eq!(topo.child_groups(sys), vec![leg_a, leg_b]);
    assert_eq!(topo.groups_of_kind(GroupKind::Leg), vec![leg_a, leg_b]);

    let whole = topo.scope(sys).unwrap();
    assert_eq!(whole.terminals(), &[ra, rb]);
    let only_a = topo.scope(leg_a).unwrap();
    assert_eq!(only_a.terminals(), &[ra]);
    assert!(!only_a.is_terminal(rb));
}

#[test]
fn orphan_return_is_rejected() {
    let mut b = TopologyBuilder::new();
    let g = b.add_group("leg", GroupKind::Leg, None, ReturnRouting::Direct);
    let mnf = b.add_node("M", NodeRole::Manifold);
    let r1 = b.add_node("R1", NodeRole::Emitter);
    let r2 = b.add_node("R2", NodeRole::Emitter);
    let s = b.add_supply("s", mnf, r1, pipe(3.0));
    let q = b.add_return("q", r1, mnf, pipe(3.0));
    let stray = b.add_return("stray", r2, mnf, pipe(3.0));
    for e in [s, q, stray] {
        b.add_edge_to_group(e, g);
    }
    let topo = b.build().unwrap();

    assert_eq!(
        topo.scope(g).unwrap_err(),
        TopologyError::OrphanReturn {
            scope: g,
            edge: stray
        }
    );
}

#[test]
fn disconnected_emitter_is_rejected() {
    let mut b = TopologyBuilder::new();
    let g = b.add_group("leg", GroupKind::Leg, None, ReturnRouting::Direct);
    let mnf = b.add_node("M", NodeRole::Manifold);
    let r1 = b.add_node("R1", NodeRole::Emitter);
    let lonely = b.add_node("R2", NodeRole::Emitter);
    let s = b.add_supply("s", mnf, r1, pipe(3.0));
    let q = b.add_return("q", r1, mnf, pipe(3.0));
    b.add_edge_to_group(s, g);
    b.add_edge_to_group(q, g);
    b.add_node_to_group(lonely, g);
    let topo = b.build().unwrap();

    assert_eq!(
        topo.scope(g).unwrap_err(),
        TopologyError::DisconnectedTerminal {
            scope: g,
            node: lonely
        }
    );
}

#[test]
fn two_sources_are_rejected() {
    let mut b = TopologyBuilder::new();
    let g = b.add_group("leg", GroupKind::Leg, None, ReturnRouting::Direct);
    let m1 = b.add_node("M1", NodeRole::Manifold);
    let m2 = b.add_node("M2", NodeRole::Manifold);
    let r1 = b.add_node("R1", NodeRole::Emitter);
    let r2 = b.add_node("R2", NodeRole::Emitter);
    for (from, to) in [(m1, r1), (m2, r2)] {
        let s = b.add_supply("s", from, to, pipe(3.0));
        let q = b.add_return("q", to, from, pipe(3.0));
        b.add_edge_to_group(s, g);
        b.add_edge_to_group(q, g);
    }
    let topo = b.build().unwrap();

    assert_eq!(
        topo.scope(g).unwrap_err(),
        TopologyError::MultipleSources {
            scope: g,
            nodes: vec![m1, m2]
        }
    );
}

#[test]
fn converging_supply_is_not_a_tree() {
    let mut b = TopologyBuilder::new();
    let g = b.add_group("leg", GroupKind::Leg, None, ReturnRouting::Direct);
    let mnf = b.add_node("M", NodeRole::Manifold);
    let t = b.add_node("T", NodeRole::Junction);
    let r = b.add_node("R", NodeRole::Emitter);
    let a = b.add_supply("a", mnf, r, pipe(3.0));
    let c = b.add_supply("b", mnf, t, pipe(3.0));
    let d = b.add_supply("c", t, r, pipe(3.0));
    for e in [a, c, d] {
        b.add_edge_to_group(e, g);
    }
    let topo = b.build().unwrap();

    assert_eq!(
        topo.scope(g).unwrap_err(),
        TopologyError::NotATree { scope: g, node: r }
    );
}

#[test]
fn emitter_source_is_rejected() {
    let mut b = TopologyBuilder::new();
    let g = b.add_group("leg", GroupKind::Leg, None, ReturnRouting::Direct);
    let r1 = b.add_node("R1", NodeRole::Emitter);
    let r2 = b.add_node("R2", NodeRole::Emitter);
    let s = b.add_supply("s", r1, r2, pipe(3.0));
    b.add_edge_to_group(s, g);
    let topo = b.build().unwrap();

    assert_eq!(
        topo.scope(g).unwrap_err(),
        TopologyError::InvalidSource { scope: g, node: r1 }
    );
}

#[test]
fn geometry_loads_from_yaml() {
    let yaml = r#"
diameter: 0.022
length: 12.5
fittings: !KSum 4.2
"#;
    let geometry: PipeGeometry = serde_yaml::from_str(yaml).unwrap();
    assert!((geometry.diameter.value - 0.022).abs() < 1e-15);
    assert!((geometry.length.value - 12.5).abs() < 1e-15);
    assert_eq!(geometry.fittings, FittingAllowance::KSum(4.2));

    let plain: PipeGeometry = serde_yaml::from_str("diameter: 0.015\nlength: 3.0\n").unwrap();
    assert_eq!(plain.fittings, FittingAllowance::None);
}
