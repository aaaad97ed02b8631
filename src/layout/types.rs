use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::geometry::BoundingBox;
use crate::ir::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutStrategy {
    #[default]
    ForceDirected,
    TreeVertical,
    TreeHorizontal,
    Radial,
    Grid,
    Circular,
}

impl LayoutStrategy {
    pub const ALL: [LayoutStrategy; 6] = [
        LayoutStrategy::ForceDirected,
        LayoutStrategy::TreeVertical,
        LayoutStrategy::TreeHorizontal,
        LayoutStrategy::Radial,
        LayoutStrategy::Grid,
        LayoutStrategy::Circular,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutStrategy::ForceDirected => "force-directed",
            LayoutStrategy::TreeVertical => "tree-vertical",
            LayoutStrategy::TreeHorizontal => "tree-horizontal",
            LayoutStrategy::Radial => "radial",
            LayoutStrategy::Grid => "grid",
            LayoutStrategy::Circular => "circular",
        }
    }
}

impl fmt::Display for LayoutStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutStrategy {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        LayoutStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| Error::UnknownStrategy(token.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOptions {
    pub strategy: LayoutStrategy,
    /// Overrides the strategy's primary spacing.
    #[serde(default)]
    pub spacing: Option<f32>,
    /// Inflates the reported bounding box on every side.
    #[serde(default)]
    pub padding: Option<f32>,
}

impl LayoutOptions {
    pub fn new(strategy: LayoutStrategy) -> Self {
        Self {
            strategy,
            spacing: None,
            padding: None,
        }
    }

    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = Some(padding);
        self
    }

    /// The override when it is usable, otherwise `fallback`.
    pub(crate) fn spacing_or(&self, fallback: f32) -> f32 {
        match self.spacing {
            Some(value) if value.is_finite() && value > 0.0 => value,
            _ => fallback,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1200.0, 800.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    pub nodes: Vec<Node>,
    pub bounds: BoundingBox,
}

impl LayoutResult {
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            bounds: BoundingBox::default(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }
}
