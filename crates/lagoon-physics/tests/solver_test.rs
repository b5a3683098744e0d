use lagoon_graph::{Edge, Graph, Node, NodeId, Vec2};
use lagoon_physics::force::RECT_COLLISION_FORCE;
use lagoon_physics::solver::VERTICAL_DAMPING;
use lagoon_physics::{Error, PhysicsOptions, SolverKind};

fn quiet() -> PhysicsOptions {
    PhysicsOptions {
        gravity: 0.0,
        repulsion: 0.0,
        spring: 0.0,
        ..Default::default()
    }
}

#[test]
fn solver_kind_parses_names_and_aliases() {
    for kind in SolverKind::ALL {
        assert_eq!(kind.as_str().parse::<SolverKind>(), Ok(kind));
        assert_eq!(kind.build().kind(), kind);
    }
    assert_eq!("ForceAtlas2".parse::<SolverKind>(), Ok(SolverKind::Adaptive));
    assert_eq!(" swimlane ".parse::<SolverKind>(), Ok(SolverKind::Ranked));
    assert_eq!(
        "spring".parse::<SolverKind>(),
        Err(Error::UnknownSolver {
            name: "spring".to_string()
        })
    );
}

#[test]
fn solver_kind_serializes_as_kebab_case() {
    let json = serde_json::to_string(&SolverKind::Rectangular).unwrap();
    assert_eq!(json, "\"rectangular\"");
    let kind: SolverKind = serde_json::from_str("\"ranked\"").unwrap();
    assert_eq!(kind, SolverKind::Ranked);
}

#[test]
fn rectangular_solver_pushes_overlapping_boxes_apart() {
    let mut g = Graph::new();
    g.insert_node(Node::new(1, 0.0, 0.0).with_size(100.0, 40.0));
    g.insert_node(Node::new(2, 80.0, 5.0).with_size(100.0, 40.0));

    let forces = SolverKind::Rectangular
        .build()
        .compute_forces(&g.nodes, &g.edges, &quiet());
    // Horizontal penetration 20, vertical 35: resolve along x.
    assert_eq!(forces[&NodeId(1)], Vec2::new(-RECT_COLLISION_FORCE, 0.0));
    assert_eq!(forces[&NodeId(2)], Vec2::new(RECT_COLLISION_FORCE, 0.0));
}

#[test]
fn standard_solver_ignores_box_overlap_between_distant_discs() {
    let mut g = Graph::new();
    g.insert_node(Node::new(1, 0.0, 0.0).with_size(300.0, 300.0).with_radius(5.0));
    g.insert_node(Node::new(2, 100.0, 0.0).with_size(300.0, 300.0).with_radius(5.0));

    let forces = SolverKind::Standard
        .build()
        .compute_forces(&g.nodes, &g.edges, &quiet());
    assert_eq!(forces[&NodeId(1)], Vec2::zeros());
}

#[test]
fn springs_pull_stretched_edges_together() {
    let options = PhysicsOptions {
        gravity: 0.0,
        repulsion: 0.0,
        ..Default::default()
    };
    let mut g = Graph::new();
    g.insert_node(Node::new(1, 0.0, 0.0));
    g.insert_node(Node::new(2, 300.0, 0.0));
    g.add_edge(Edge::new(1, 2).with_strength(2.0));
    g.add_edge(Edge::new(2, 2));

    for kind in [SolverKind::Standard, SolverKind::Rectangular, SolverKind::Ranked] {
        let forces = kind.build().compute_forces(&g.nodes, &g.edges, &options);
        // Rest length 20 + 20 + 60 = 100.
        let expected = (300.0 - 100.0) * options.spring * 2.0;
        assert!((forces[&NodeId(1)].x - expected).abs() < 1e-9, "{kind}");
        assert!((forces[&NodeId(2)].x + expected).abs() < 1e-9, "{kind}");
    }
}

#[test]
fn ranked_solver_only_produces_horizontal_forces() {
    let mut g = Graph::new();
    for (i, (x, y)) in [(0.0, 0.0), (10.0, 5.0), (-40.0, 12.0), (5.0, 100.0), (7.0, 104.0)]
        .into_iter()
        .enumerate()
    {
        g.insert_node(Node::new(i as u64 + 1, x, y));
    }
    g.set_path(&[1, 2, 3, 4, 5]);

    let forces = SolverKind::Ranked
        .build()
        .compute_forces(&g.nodes, &g.edges, &PhysicsOptions::default());
    for (id, f) in &forces {
        assert_eq!(f.y, 0.0, "node {id}");
        assert!(f.x.is_finite());
    }
    // Node 1 sits left of node 2 in the same band and is pushed further left.
    assert!(forces[&NodeId(1)].x < 0.0);
}

#[test]
fn ranked_solver_ignores_nodes_in_other_bands() {
    let mut g = Graph::new();
    g.insert_node(Node::new(1, 0.0, 0.0));
    g.insert_node(Node::new(2, 5.0, 200.0));
    let options = PhysicsOptions {
        gravity: 0.0,
        ..Default::default()
    };
    let forces = SolverKind::Ranked
        .build()
        .compute_forces(&g.nodes, &g.edges, &options);
    assert_eq!(forces[&NodeId(1)], Vec2::zeros());
    assert_eq!(forces[&NodeId(2)], Vec2::zeros());
}

#[test]
fn ranked_solver_damps_vertical_velocity() {
    let solver = SolverKind::Ranked.build();
    let v = solver.constrain_velocity(Vec2::new(4.0, 10.0));
    assert_eq!(v, Vec2::new(4.0, 10.0 * VERTICAL_DAMPING));

    let standard = SolverKind::Standard.build();
    assert_eq!(standard.constrain_velocity(Vec2::new(4.0, 10.0)), Vec2::new(4.0, 10.0));
}
