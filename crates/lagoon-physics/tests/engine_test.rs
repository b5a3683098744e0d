use lagoon_graph::{Edge, Graph, Node, NodeId, NodeMap, Vec2, is_finite};
use lagoon_physics::{LayoutEngine, PhysicsOptions, SolverKind, energy};

fn square() -> Graph {
    let mut g = Graph::new();
    g.insert_node(Node::new(1, 0.0, 0.0));
    g.insert_node(Node::new(2, 50.0, 10.0));
    g.insert_node(Node::new(3, -30.0, 40.0));
    g.insert_node(Node::new(4, 10.0, -60.0));
    g.set_path(&[1, 2, 3, 4, 1]);
    g
}

fn exact_options() -> PhysicsOptions {
    PhysicsOptions {
        theta: 0.0,
        ..Default::default()
    }
}

fn run(engine: &mut LayoutEngine, nodes: &NodeMap, edges: &[Edge], ticks: usize) -> NodeMap {
    let mut current = nodes.clone();
    for _ in 0..ticks {
        current = engine.tick(&current, edges);
    }
    current
}

#[test]
fn engine_tick_leaves_the_previous_snapshot_untouched() {
    let g = square();
    let mut engine = LayoutEngine::default();
    let next = engine.tick(&g.nodes, &g.edges);
    assert_eq!(g.nodes, square().nodes);
    assert_ne!(next, g.nodes);
    assert_eq!(next.len(), g.nodes.len());
}

#[test]
fn engine_settles_and_stays_quiescent() {
    for kind in [SolverKind::Standard, SolverKind::Adaptive] {
        let g = square();
        let mut engine = LayoutEngine::new(kind, exact_options());
        let settled = run(&mut engine, &g.nodes, &g.edges, 300);
        assert!(energy(&settled) < 1e-3, "{kind}: energy {}", energy(&settled));

        let after = engine.tick(&settled, &g.edges);
        for (a, b) in settled.values().zip(after.values()) {
            assert!((a.position - b.position).norm() < 1e-2, "{kind}: node {} moved", a.id);
        }
    }
}

#[test]
fn engine_does_not_move_without_forces() {
    let options = PhysicsOptions {
        gravity: 0.0,
        repulsion: 0.0,
        spring: 0.0,
        ..Default::default()
    };
    let mut g = Graph::new();
    g.insert_node(Node::new(1, 0.0, 0.0));
    g.insert_node(Node::new(2, 500.0, 300.0));
    g.insert_node(Node::new(3, -500.0, 300.0));
    g.set_path(&[1, 2, 3]);

    for kind in SolverKind::ALL {
        let mut engine = LayoutEngine::new(kind, options.clone());
        let next = engine.tick(&g.nodes, &g.edges);
        for (a, b) in g.nodes.values().zip(next.values()) {
            assert_eq!(a.position, b.position, "{kind}");
        }
        assert_eq!(engine.last_stats().energy, 0.0);
    }
}

#[test]
fn engine_keeps_locked_and_fixed_nodes_in_place_for_every_solver() {
    for kind in SolverKind::ALL {
        let mut g = square();
        if let Some(n) = g.node_mut(NodeId(1)) {
            n.locked = true;
        }
        if let Some(n) = g.node_mut(NodeId(3)) {
            n.fixed = true;
            n.velocity = Vec2::new(5.0, 5.0);
        }

        let mut engine = LayoutEngine::new(kind, PhysicsOptions::default());
        let mut current = g.nodes.clone();
        for _ in 0..20 {
            current = engine.tick(&current, &g.edges);
        }

        for id in [1, 3] {
            let before = &g.nodes[&NodeId(id)];
            let after = &current[&NodeId(id)];
            assert_eq!(after.position, before.position, "{kind}: node {id}");
            assert_eq!(after.velocity, Vec2::zeros(), "{kind}: node {id}");
        }
        assert_ne!(current[&NodeId(2)].position, g.nodes[&NodeId(2)].position);
        assert_eq!(engine.last_stats().free_nodes, 2);
    }
}

#[test]
fn engine_skips_non_finite_nodes() {
    let mut g = square();
    g.insert_node(Node::new(9, f64::NAN, 0.0));
    g.add_edge(Edge::new(9, 1));

    for kind in SolverKind::ALL {
        let mut engine = LayoutEngine::new(kind, PhysicsOptions::default());
        let next = engine.tick(&g.nodes, &g.edges);
        for n in next.values().filter(|n| n.id != NodeId(9)) {
            assert!(is_finite(&n.position), "{kind}: node {}", n.id);
            assert!(is_finite(&n.velocity), "{kind}: node {}", n.id);
        }
        assert_eq!(next[&NodeId(9)].velocity, Vec2::zeros());
    }
}

#[test]
fn engine_reports_adaptive_speed_statistics() {
    let g = square();
    let mut engine = LayoutEngine::new(SolverKind::Adaptive, PhysicsOptions::default());
    let first = engine.tick(&g.nodes, &g.edges);
    let stats = engine.last_stats();
    assert_eq!(stats.free_nodes, 4);
    assert!(stats.global_swinging > 0.0);
    assert!((0.01..=1.0).contains(&stats.global_speed));
    assert!((stats.energy - energy(&first)).abs() < 1e-9);

    for n in first.values() {
        assert!(n.adaptive.last_force.norm() > 0.0);
    }
}

#[test]
fn engine_switches_solvers_in_place() {
    let mut engine = LayoutEngine::default();
    assert_eq!(engine.solver_kind(), SolverKind::Standard);
    engine.set_solver(SolverKind::Ranked);
    assert_eq!(engine.solver_kind(), SolverKind::Ranked);

    let options = PhysicsOptions {
        gravity: 0.5,
        ..Default::default()
    };
    engine.set_options(options.clone());
    assert_eq!(engine.options(), &options);
}

#[test]
fn engine_handles_an_empty_snapshot() {
    let mut engine = LayoutEngine::default();
    let next = engine.tick(&NodeMap::new(), &[]);
    assert!(next.is_empty());
    assert_eq!(engine.last_stats().free_nodes, 0);
}
