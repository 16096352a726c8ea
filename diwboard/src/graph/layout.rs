use std::collections::HashMap;
use std::f64::consts::PI;

use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::GraphConfig;
use crate::models::RelationshipGraph;

/// Space kept between the ring of nodes and the canvas edge for labels.
pub const LABEL_MARGIN: f64 = 60.0;

pub const DEFAULT_LABEL_WRAP: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 400.0,
        }
    }
}

impl From<&GraphConfig> for Canvas {
    fn from(config: &GraphConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
        }
    }
}

impl Canvas {
    pub fn center(&self) -> Point {
        Point {
            x: self.width / 2.0,
            y: self.height / 2.0,
        }
    }

    pub fn radius(&self) -> f64 {
        (self.width.min(self.height) / 2.0 - LABEL_MARGIN).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLayout {
    pub id: String,
    pub title: String,
    pub position: Point,
    pub label_lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgePath {
    /// Index of the edge in the source graph, stable across skipped edges.
    pub index: usize,
    pub source: String,
    pub target: String,
    pub label: String,
    pub from: Point,
    pub to: Point,
    /// Straight-line path data, `M x,y L x,y`.
    pub path: String,
    /// Direction of travel in degrees, used to orient the arrowhead.
    pub angle: f64,
    /// Fraction along the path where the label is centred.
    pub label_offset: f64,
    pub midpoint: Point,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphLayout {
    pub positions: HashMap<String, Point>,
    pub nodes: Vec<NodeLayout>,
    pub edges: Vec<EdgePath>,
}

/// Place nodes evenly on a circle, first node at the top and the rest
/// clockwise, then route every edge whose endpoints were placed.
pub fn layout(graph: &RelationshipGraph, canvas: &Canvas, label_wrap: usize) -> GraphLayout {
    let n = graph.nodes.len();
    if n == 0 {
        return GraphLayout::default();
    }

    let center = canvas.center();
    let radius = canvas.radius();
    let step = 2.0 * PI / n as f64;

    let mut positions = HashMap::with_capacity(n);
    let nodes: Vec<NodeLayout> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let angle = i as f64 * step - PI / 2.0;
            let position = Point {
                x: center.x + radius * angle.cos(),
                y: center.y + radius * angle.sin(),
            };
            // Later nodes reusing an id take over its position.
            positions.insert(node.id.clone(), position);
            NodeLayout {
                id: node.id.clone(),
                title: node.title.clone(),
                position,
                label_lines: wrap_text(&node.title, label_wrap),
            }
        })
        .collect();

    let edges = graph
        .edges
        .iter()
        .enumerate()
        .filter_map(|(index, edge)| {
            let (Some(&from), Some(&to)) = (positions.get(&edge.source), positions.get(&edge.target))
            else {
                tracing::debug!(
                    source = %edge.source,
                    target = %edge.target,
                    "Skipping edge with unknown endpoint"
                );
                return None;
            };

            Some(EdgePath {
                index,
                source: edge.source.clone(),
                target: edge.target.clone(),
                label: edge.label.clone(),
                from,
                to,
                path: format!("M {},{} L {},{}", from.x, from.y, to.x, to.y),
                angle: (to.y - from.y).atan2(to.x - from.x).to_degrees(),
                label_offset: 0.5,
                midpoint: Point {
                    x: (from.x + to.x) / 2.0,
                    y: (from.y + to.y) / 2.0,
                },
            })
        })
        .collect();

    GraphLayout {
        positions,
        nodes,
        edges,
    }
}

/// Greedy word wrap. Lines never exceed `max_chars` graphemes unless a
/// single word does; no empty lines are produced.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.graphemes(true).count();

        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len > max_chars {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        } else {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GraphEdge, GraphNode};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_graph() {
        let graph = RelationshipGraph::with_data(vec![], vec![GraphEdge::new("a", "b", "x")]);
        let result = layout(&graph, &Canvas::default(), DEFAULT_LABEL_WRAP);
        assert!(result.positions.is_empty());
        assert!(result.edges.is_empty());
    }

    #[test]
    fn test_single_node_sits_at_top() {
        let graph = RelationshipGraph::with_data(vec![GraphNode::new("a", "Alpha")], vec![]);
        let result = layout(&graph, &Canvas::default(), DEFAULT_LABEL_WRAP);
        let p = result.positions["a"];
        assert!(close(p.x, 250.0));
        assert!(close(p.y, 60.0));
    }

    #[test]
    fn test_radius_never_negative() {
        let canvas = Canvas {
            width: 80.0,
            height: 80.0,
        };
        assert_eq!(canvas.radius(), 0.0);
        let graph = RelationshipGraph::with_data(
            vec![GraphNode::new("a", "A"), GraphNode::new("b", "B")],
            vec![],
        );
        let result = layout(&graph, &canvas, DEFAULT_LABEL_WRAP);
        for p in result.positions.values() {
            assert!(close(p.x, 40.0) && close(p.y, 40.0));
        }
    }

    #[test]
    fn test_edge_path_and_label_offset() {
        let graph = RelationshipGraph::with_data(
            vec![GraphNode::new("a", "A"), GraphNode::new("b", "B")],
            vec![GraphEdge::new("a", "b", "drives")],
        );
        let result = layout(&graph, &Canvas::default(), DEFAULT_LABEL_WRAP);
        let edge = &result.edges[0];

        assert!(edge.path.starts_with("M 250,60 L "));
        assert_eq!(edge.label_offset, 0.5);
        assert!(close(edge.angle, 90.0));
        assert!(close(edge.midpoint.x, 250.0));
        assert!(close(edge.midpoint.y, 200.0));
    }

    #[test]
    fn test_wrap_text_greedy() {
        assert_eq!(
            wrap_text("Construction Volume in Germany Declines", 20),
            vec!["Construction Volume", "in Germany Declines"]
        );
        assert_eq!(wrap_text("Short", 20), vec!["Short"]);
        assert!(wrap_text("   ", 20).is_empty());
    }

    #[test]
    fn test_wrap_text_long_word_gets_own_line() {
        assert_eq!(
            wrap_text("Gender Arbeitsmarktintegrationsmaßnahmen now", 20),
            vec!["Gender", "Arbeitsmarktintegrationsmaßnahmen", "now"]
        );
    }

    #[test]
    fn test_wrap_counts_graphemes_not_bytes() {
        // 20 graphemes, more than 20 bytes
        let lines = wrap_text("Übergänge für Frauen", 20);
        assert_eq!(lines, vec!["Übergänge für Frauen"]);
    }
}
