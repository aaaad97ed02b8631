pub mod animation;
mod circular;
mod force;
mod grid;
pub mod hierarchy;
mod radial;
mod tree;
pub(crate) mod types;
pub use animation::{LayoutTransition, animate_layout, ease_in_out_cubic};
pub use force::min_clearance;
pub use hierarchy::{Forest, Hierarchy};
pub use radial::ring_radius;
pub use types::*;
use circular::*;
use force::*;
use grid::*;
use radial::*;
use tree::*;

use crate::config::LayoutConfig;
use crate::geometry::{BoundingBox, EPSILON, Point};
use crate::ir::{Graph, Node};

/// Positions every node of `graph` with the chosen strategy and centers the result.
///
/// Edges with a missing endpoint are ignored, cycles and multi-parent nodes are
/// handled by a breadth-first spanning forest, and an empty graph yields an empty
/// result with a zero bounding box.
pub fn compute_layout(
    graph: &Graph,
    options: &LayoutOptions,
    viewport: Viewport,
    config: &LayoutConfig,
) -> LayoutResult {
    let _span = tracing::debug_span!(
        "compute_layout",
        strategy = %options.strategy,
        nodes = graph.nodes.len(),
        edges = graph.edges.len()
    )
    .entered();

    if graph.nodes.is_empty() {
        return LayoutResult::empty();
    }

    let hierarchy = Hierarchy::build(graph);
    if hierarchy.ignored_edges() > 0 {
        tracing::debug!(
            ignored = hierarchy.ignored_edges(),
            "skipped dangling, self-referencing or duplicate edges"
        );
    }

    let raw = match options.strategy {
        LayoutStrategy::ForceDirected => {
            force_directed_positions(graph, &hierarchy, options, config)
        }
        LayoutStrategy::TreeVertical => tree_positions(&hierarchy, options, config, false),
        LayoutStrategy::TreeHorizontal => tree_positions(&hierarchy, options, config, true),
        LayoutStrategy::Radial => radial_positions(graph, &hierarchy, options, config),
        LayoutStrategy::Grid => grid_positions(graph, options, config),
        LayoutStrategy::Circular => circular_positions(graph, &hierarchy, options, config),
    };

    let placed: Vec<Node> = graph
        .nodes
        .iter()
        .zip(raw)
        .map(|(node, point)| node.moved_to(point))
        .collect();
    let nodes = center_in_viewport(&placed, viewport, config);
    let padding = options.padding.unwrap_or(config.padding);
    let bounds = bounding_box(&nodes, config).inflate(padding);
    LayoutResult { nodes, bounds }
}

/// Center distance at which no two node rectangles of `graph` can overlap.
fn overlap_free_distance(graph: &Graph, config: &LayoutConfig) -> f32 {
    graph
        .nodes
        .iter()
        .map(|node| {
            let (width, height) = node.size(config.node_width, config.node_height);
            width.hypot(height)
        })
        .fold(0.0, f32::max)
}

/// Tight box around the node rectangles.
pub fn bounding_box(nodes: &[Node], config: &LayoutConfig) -> BoundingBox {
    BoundingBox::from_rects(
        nodes
            .iter()
            .map(|node| node.rect(config.node_width, config.node_height)),
    )
}

/// Translates `nodes` so their bounding box center lands on the viewport center.
pub fn center_in_viewport(nodes: &[Node], viewport: Viewport, config: &LayoutConfig) -> Vec<Node> {
    if nodes.is_empty() {
        return Vec::new();
    }
    let center = bounding_box(nodes, config).center();
    let dx = viewport.width / 2.0 - center.x;
    let dy = viewport.height / 2.0 - center.y;
    nodes
        .iter()
        .map(|node| node.moved_to(node.center().offset(dx, dy)))
        .collect()
}
