use lagoon_graph::{Node, Vec2};
use lagoon_physics::quadtree::MAX_DEPTH;
use lagoon_physics::{Body, Bounds, Contact, Insertion, PhysicsOptions, QuadTree, force};

fn scattered(count: u64) -> Vec<Node> {
    (0..count)
        .map(|i| {
            let x = (i % 7) as f64 * 37.0 - (i / 7) as f64 * 11.0;
            let y = (i / 7) as f64 * 29.0 + (i % 3) as f64 * 5.0;
            Node::new(i + 1, x, y).with_mass(1.0 + (i % 3) as f64)
        })
        .collect()
}

fn brute_force(target: &Node, nodes: &[Node], options: &PhysicsOptions) -> Vec2 {
    let t = Body::from_node(target);
    nodes
        .iter()
        .filter(|n| n.id != target.id)
        .map(|n| force::pairwise(&t, &Body::from_node(n), options, Contact::Circular))
        .sum()
}

#[test]
fn quadtree_conserves_mass_and_center_of_mass() {
    let nodes = scattered(40);
    let tree = QuadTree::from_nodes(&nodes);

    let total: f64 = nodes.iter().map(|n| n.mass).sum();
    let com = nodes.iter().map(|n| n.position * n.mass).sum::<Vec2>() / total;

    assert_eq!(tree.len(), nodes.len());
    assert!((tree.total_mass() - total).abs() < 1e-9);
    assert!((tree.center_of_mass() - com).norm() < 1e-9);
}

#[test]
fn quadtree_bounds_contain_every_node() {
    let nodes = scattered(25);
    let tree = QuadTree::from_nodes(&nodes);
    for n in &nodes {
        assert!(tree.bounds().contains(&n.position), "node {} outside", n.id);
    }
}

#[test]
fn quadtree_terminates_with_fifty_coincident_nodes() {
    let nodes: Vec<Node> = (1..=50).map(|i| Node::new(i, 5.0, 5.0)).collect();
    let tree = QuadTree::from_nodes(&nodes);

    assert_eq!(tree.len(), 50);
    assert!((tree.total_mass() - 50.0).abs() < 1e-9);
    assert!(tree.depth() <= MAX_DEPTH);

    let options = PhysicsOptions::default();
    let f = tree.repulsion(&Body::from_node(&nodes[0]), options.theta, &options, Contact::Circular);
    assert!(f.x.is_finite() && f.y.is_finite());
}

#[test]
fn quadtree_skips_non_finite_and_out_of_bounds_bodies() {
    let mut tree = QuadTree::new(Bounds::new(Vec2::zeros(), 10.0));
    assert_eq!(
        tree.insert(Body::from_node(&Node::new(1, f64::NAN, 0.0))),
        Insertion::NonFinite
    );
    assert_eq!(
        tree.insert(Body::from_node(&Node::new(2, 100.0, 0.0))),
        Insertion::OutOfBounds
    );
    assert_eq!(
        tree.insert(Body::from_node(&Node::new(3, 1.0, 1.0))),
        Insertion::Stored
    );
    assert_eq!(tree.len(), 1);

    let nodes = vec![
        Node::new(1, 0.0, 0.0),
        Node::new(2, f64::INFINITY, 3.0),
        Node::new(3, 40.0, 0.0),
    ];
    let tree = QuadTree::from_nodes(&nodes);
    assert_eq!(tree.len(), 2);
    assert!((tree.total_mass() - 2.0).abs() < 1e-12);
}

#[test]
fn quadtree_theta_zero_matches_brute_force() {
    let options = PhysicsOptions::default();
    let nodes = scattered(30);
    let tree = QuadTree::from_nodes(&nodes);
    for target in &nodes {
        let approx = tree.repulsion(&Body::from_node(target), 0.0, &options, Contact::Circular);
        let exact = brute_force(target, &nodes, &options);
        assert!(
            (approx - exact).norm() <= 1e-9 * exact.norm().max(1.0),
            "node {}: {approx:?} vs {exact:?}",
            target.id
        );
    }
}

#[test]
fn quadtree_approximates_a_distant_cluster() {
    let options = PhysicsOptions::default();
    let mut nodes: Vec<Node> = (0..20)
        .map(|i| Node::new(i + 1, (i % 5) as f64 * 12.0, (i / 5) as f64 * 12.0))
        .collect();
    let target = Node::new(100, 1000.0, 0.0);
    nodes.push(target.clone());

    let tree = QuadTree::from_nodes(&nodes);
    let approx = tree.repulsion(&Body::from_node(&target), 0.5, &options, Contact::Circular);
    let exact = brute_force(&target, &nodes, &options);
    assert!((approx - exact).norm() / exact.norm() < 1e-2);
}

#[test]
fn quadtree_direct_force_follows_inverse_distance() {
    let options = PhysicsOptions::default();
    let nodes = vec![
        Node::new(1, 0.0, 0.0).with_radius(0.0),
        Node::new(2, 10.0, 0.0).with_radius(0.0),
    ];
    let tree = QuadTree::from_nodes(&nodes);
    let f = tree.repulsion(&Body::from_node(&nodes[0]), options.theta, &options, Contact::Circular);
    let expected = Vec2::new(-options.repulsion / 10.0, 0.0);
    assert!((f - expected).norm() < 1e-9, "{f:?}");
}
