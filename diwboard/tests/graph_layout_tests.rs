use std::f64::consts::PI;

use diwboard::graph::{layout, render_svg, Canvas, DEFAULT_LABEL_WRAP};
use diwboard::models::{GraphEdge, GraphNode, RelationshipGraph};

fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn triangle() -> RelationshipGraph {
    RelationshipGraph::with_data(
        vec![
            GraphNode::new("A", "Construction"),
            GraphNode::new("B", "Energy Transition"),
            GraphNode::new("C", "Sovereign Debt"),
        ],
        vec![
            GraphEdge::new("A", "B", "input costs"),
            GraphEdge::new("B", "C", "public investment"),
            GraphEdge::new("C", "X", "dangling"),
        ],
    )
}

#[test]
fn test_three_nodes_on_default_canvas() {
    let canvas = Canvas::default();
    let result = layout(&triangle(), &canvas, DEFAULT_LABEL_WRAP);

    // radius = min(500, 400) / 2 - 60 = 140 around (250, 200)
    let a = result.positions["A"];
    approx(a.x, 250.0);
    approx(a.y, 60.0);

    let b = result.positions["B"];
    let angle_b = 2.0 * PI / 3.0 - PI / 2.0;
    approx(b.x, 250.0 + 140.0 * angle_b.cos());
    approx(b.y, 200.0 + 140.0 * angle_b.sin());

    let c = result.positions["C"];
    let angle_c = 4.0 * PI / 3.0 - PI / 2.0;
    approx(c.x, 250.0 + 140.0 * angle_c.cos());
    approx(c.y, 200.0 + 140.0 * angle_c.sin());

    // clockwise from the top: B lands lower right, C lower left
    assert!(b.x > 250.0 && b.y > 200.0);
    assert!(c.x < 250.0 && c.y > 200.0);

    assert_eq!(result.edges.len(), 2);
    assert_eq!(result.edges[0].source, "A");
    assert_eq!(result.edges[1].index, 1);

    let (ab, bc) = (&result.edges[0], &result.edges[1]);
    assert_eq!((ab.from, ab.to), (a, b));
    assert_eq!((bc.from, bc.to), (b, c));
    assert_eq!(ab.path, format!("M {},{} L {},{}", a.x, a.y, b.x, b.y));
    assert_eq!(bc.path, format!("M {},{} L {},{}", b.x, b.y, c.x, c.y));
}

#[test]
fn test_every_node_is_positioned_within_canvas() {
    let nodes: Vec<GraphNode> = (0..7)
        .map(|i| GraphNode::new(format!("n{i}"), format!("Node {i}")))
        .collect();
    let graph = RelationshipGraph::with_data(nodes, vec![]);
    let canvas = Canvas::default();

    let result = layout(&graph, &canvas, DEFAULT_LABEL_WRAP);

    assert_eq!(result.positions.len(), 7);
    assert_eq!(result.nodes.len(), 7);
    for p in result.positions.values() {
        assert!((0.0..=canvas.width).contains(&p.x));
        assert!((0.0..=canvas.height).contains(&p.y));
        let distance = ((p.x - 250.0).powi(2) + (p.y - 200.0).powi(2)).sqrt();
        approx(distance, 140.0);
    }

    let points: Vec<_> = result.positions.values().collect();
    for (i, p) in points.iter().enumerate() {
        for q in &points[i + 1..] {
            assert!(
                (p.x - q.x).abs() > 1e-6 || (p.y - q.y).abs() > 1e-6,
                "two nodes share {p:?}"
            );
        }
    }
}

#[test]
fn test_layout_is_deterministic() {
    let canvas = Canvas {
        width: 640.0,
        height: 480.0,
    };
    let first = layout(&triangle(), &canvas, 12);
    let second = layout(&triangle(), &canvas, 12);

    assert_eq!(first, second);
    assert_eq!(render_svg(&first, &canvas), render_svg(&second, &canvas));
}

#[test]
fn test_node_labels_are_wrapped() {
    let graph = RelationshipGraph::with_data(
        vec![GraphNode::new("g", "Gender Care Gap in German Households")],
        vec![],
    );
    let result = layout(&graph, &Canvas::default(), DEFAULT_LABEL_WRAP);

    assert_eq!(
        result.nodes[0].label_lines,
        vec!["Gender Care Gap in", "German Households"]
    );
}
