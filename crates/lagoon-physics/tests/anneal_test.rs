use lagoon_graph::{Graph, Node, NodeId};
use lagoon_physics::{AnnealFrame, AnnealOptions, CancelToken, anneal};

fn pair() -> Graph {
    let mut g = Graph::new();
    g.insert_node(Node::new(1, 0.0, 0.0).with_size(60.0, 30.0));
    g.insert_node(Node::new(2, 0.0, 0.0).with_size(60.0, 30.0));
    g.set_path(&[1, 2]);
    g
}

fn path(len: u64) -> Graph {
    let mut g = Graph::new();
    for i in 1..=len {
        g.insert_node(Node::new(i, 0.0, 0.0));
    }
    let ids: Vec<u64> = (1..=len).collect();
    g.set_path(&ids);
    g
}

fn assert_displacement_settles(frames: &[AnnealFrame]) {
    for w in frames.windows(2) {
        assert!(
            w[1].max_displacement <= w[0].max_displacement + 1e-12,
            "displacement grew at iteration {}: {} -> {}",
            w[1].iteration,
            w[0].max_displacement,
            w[1].max_displacement
        );
    }
}

#[test]
fn anneal_yields_one_frame_per_iteration() {
    let options = AnnealOptions {
        iterations: 25,
        ..Default::default()
    };
    let frames = anneal(&pair(), &options, CancelToken::new());
    assert_eq!(frames.size_hint(), (0, Some(25)));
    let frames: Vec<AnnealFrame> = frames.collect();
    assert_eq!(frames.len(), 25);
    for (i, f) in frames.iter().enumerate() {
        assert_eq!(f.iteration, i);
        assert_eq!(f.positions.len(), 2);
        assert!(f.positions.contains_key(&NodeId(1)));
    }
}

#[test]
fn anneal_cooling_decreases_linearly() {
    let options = AnnealOptions {
        iterations: 10,
        ..Default::default()
    };
    let frames: Vec<AnnealFrame> = anneal(&pair(), &options, CancelToken::new()).collect();
    assert_eq!(frames[0].cooling, 1.0);
    assert_eq!(frames[9].cooling, 0.0);
    assert_eq!(frames[9].max_displacement, 0.0);
    for w in frames.windows(2) {
        assert!(w[1].cooling < w[0].cooling);
        assert!(((w[0].cooling - w[1].cooling) - 1.0 / 9.0).abs() < 1e-12);
    }
}

#[test]
fn anneal_displacement_settles_for_a_connected_pair() {
    let options = AnnealOptions {
        iterations: 100,
        area_scale: 1.0,
        gravity: 0.1,
    };
    let frames: Vec<AnnealFrame> = anneal(&pair(), &options, CancelToken::new()).collect();
    assert_displacement_settles(&frames[50..]);
}

#[test]
fn anneal_displacement_settles_for_a_path() {
    let frames: Vec<AnnealFrame> =
        anneal(&path(6), &AnnealOptions::default(), CancelToken::new()).collect();
    assert_eq!(frames.len(), 300);
    assert_displacement_settles(&frames[150..]);
    assert!(frames[299].max_displacement < frames[0].max_displacement);
}

#[test]
fn anneal_separates_boxes() {
    let mut g = Graph::new();
    for i in 1..=8 {
        g.insert_node(Node::new(i, 0.0, 0.0).with_size(80.0, 40.0));
    }
    for i in 2..=8 {
        g.set_path(&[1, i]);
    }
    let options = AnnealOptions {
        iterations: 200,
        ..Default::default()
    };
    let Some(last) = anneal(&g, &options, CancelToken::new()).last() else {
        panic!("expected frames");
    };

    let ids: Vec<NodeId> = last.positions.keys().copied().collect();
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            let d = last.positions[a] - last.positions[b];
            assert!(
                d.x.abs() >= 80.0 || d.y.abs() >= 40.0,
                "nodes {a} and {b} overlap"
            );
        }
    }
}

#[test]
fn anneal_is_deterministic() {
    let options = AnnealOptions {
        iterations: 40,
        ..Default::default()
    };
    let a: Vec<AnnealFrame> = anneal(&path(5), &options, CancelToken::new()).collect();
    let b: Vec<AnnealFrame> = anneal(&path(5), &options, CancelToken::new()).collect();
    assert_eq!(a, b);
}

#[test]
fn anneal_stops_once_cancelled() {
    let token = CancelToken::new();
    let mut frames = anneal(&path(4), &AnnealOptions::default(), token.clone());
    assert!(frames.next().is_some());
    assert!(frames.next().is_some());

    token.cancel();
    assert!(frames.cancel_token().is_cancelled());
    assert!(frames.next().is_none());
    assert!(frames.next().is_none());
    assert_eq!(frames.size_hint(), (0, Some(0)));
    assert_eq!(frames.ideal_distance(), None);
}

#[test]
fn anneal_of_nothing_is_empty() {
    let mut frames = anneal(&Graph::new(), &AnnealOptions::default(), CancelToken::new());
    assert!(frames.next().is_none());

    let options = AnnealOptions {
        iterations: 0,
        ..Default::default()
    };
    assert_eq!(anneal(&pair(), &options, CancelToken::new()).count(), 0);
}

#[test]
fn anneal_ideal_distance_tracks_area_scale() {
    let base = anneal(&pair(), &AnnealOptions::default(), CancelToken::new());
    let wide = anneal(
        &pair(),
        &AnnealOptions {
            area_scale: 4.0,
            ..Default::default()
        },
        CancelToken::new(),
    );
    let (Some(k1), Some(k4)) = (base.ideal_distance(), wide.ideal_distance()) else {
        panic!("expected a running layout");
    };
    // (60 + 40) * (30 + 40) per node.
    assert!((k1 - 7000f64.sqrt()).abs() < 1e-9);
    assert!((k4 - 2.0 * k1).abs() < 1e-9);
}
