use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// Center x.
    pub x: f32,
    /// Center y.
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

impl Node {
    pub fn new(id: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width: None,
            height: None,
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Size of the node, falling back to the supplied defaults.
    pub fn size(&self, default_width: f32, default_height: f32) -> (f32, f32) {
        (
            self.width.unwrap_or(default_width).max(0.0),
            self.height.unwrap_or(default_height).max(0.0),
        )
    }

    pub fn rect(&self, default_width: f32, default_height: f32) -> Rect {
        let (width, height) = self.size(default_width, default_height);
        Rect::from_center(self.center(), width, height)
    }

    /// A copy of this node moved to `point`.
    pub fn moved_to(&self, point: Point) -> Self {
        Self {
            x: point.x,
            y: point.y,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default)]
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        let from = from.into();
        let to = to.into();
        Self {
            id: format!("{from}->{to}"),
            from,
            to,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(input: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Inserts a node at `(x, y)` unless the id is already present.
    pub fn ensure_node(&mut self, id: &str, x: f32, y: f32) -> &mut Node {
        let index = match self.nodes.iter().position(|node| node.id == id) {
            Some(index) => index,
            None => {
                self.nodes.push(Node::new(id, x, y));
                self.nodes.len() - 1
            }
        };
        &mut self.nodes[index]
    }

    pub fn connect(&mut self, from: &str, to: &str) {
        self.edges.push(Edge::new(from, to));
    }

    /// A copy of the graph with its node list replaced.
    pub fn with_nodes(&self, nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            edges: self.edges.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_graph_document() {
        let graph = Graph::from_json(
            r#"{
                "nodes": [
                    {"id": "root", "x": 0, "y": 0},
                    {"id": "a", "x": 10, "y": 5, "width": 80, "height": 30}
                ],
                "edges": [{"from": "root", "to": "a", "label": "idea"}]
            }"#,
        )
        .unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[1].size(160.0, 60.0), (80.0, 30.0));
        assert_eq!(graph.nodes[0].size(160.0, 60.0), (160.0, 60.0));
        assert_eq!(graph.edges[0].label.as_deref(), Some("idea"));
        assert!(graph.edges[0].id.is_empty());
    }

    #[test]
    fn ensure_node_is_idempotent() {
        let mut graph = Graph::new();
        graph.ensure_node("a", 1.0, 2.0);
        graph.ensure_node("a", 9.0, 9.0).x = 3.0;
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].x, 3.0);
        assert_eq!(graph.nodes[0].y, 2.0);
    }
}
