//! Incremental placement helpers for interactive editing.
//!
//! Everything here works on node centers and returns new node lists; the inputs are never
//! mutated.

use std::collections::HashMap;
use std::f32::consts::FRAC_PI_4;

use crate::config::PlacementConfig;
use crate::geometry::{EPSILON, Point};
use crate::ir::{Edge, Graph, Node};
use crate::layout::Hierarchy;

/// True when every node center is farther than `threshold` from `point`.
pub fn is_position_available(point: Point, nodes: &[Node], threshold: f32) -> bool {
    nodes
        .iter()
        .all(|node| node.center().distance(point) > threshold)
}

/// First free point on growing rings of eight compass directions around `center`.
///
/// Directions start east and turn clockwise (screen coordinates). When every ring is
/// occupied the fixed fallback offset from `center` is returned.
pub fn spider_web_position(center: Point, nodes: &[Node], config: &PlacementConfig) -> Point {
    let mut radius = config.spider_base_radius;
    for _ in 0..config.spider_rings {
        for step in 0..8 {
            let angle = step as f32 * FRAC_PI_4;
            let candidate = Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            );
            if is_position_available(candidate, nodes, config.collision_threshold) {
                return candidate;
            }
        }
        radius *= config.spider_growth;
    }
    center.offset(config.fallback_offset_x, config.fallback_offset_y)
}

/// Where a new unparented node goes: below the lowest node, or the origin.
pub fn next_root_position(nodes: &[Node], config: &PlacementConfig) -> Point {
    let lowest = nodes.iter().max_by(|a, b| a.y.total_cmp(&b.y));
    let Some(lowest) = lowest else {
        return Point::new(config.origin_x, config.origin_y);
    };
    let candidate = Point::new(lowest.x, lowest.y + config.stack_gap);
    if is_position_available(candidate, nodes, config.collision_threshold) {
        candidate
    } else {
        spider_web_position(candidate, nodes, config)
    }
}

/// Where the next child of `parent_id` goes.
///
/// The first child drops below the parent, later ones chain to the right of the last
/// sibling. A missing parent behaves like a root insertion.
pub fn next_child_position(parent_id: &str, graph: &Graph, config: &PlacementConfig) -> Point {
    let Some(parent) = graph.node(parent_id) else {
        return next_root_position(&graph.nodes, config);
    };
    let hierarchy = Hierarchy::build(graph);
    let last_sibling = hierarchy
        .children_of(parent_id)
        .last()
        .and_then(|id| graph.node(id));
    let candidate = match last_sibling {
        Some(sibling) => Point::new(sibling.x + config.sibling_step_x, sibling.y),
        None => Point::new(parent.x, parent.y + config.child_offset_y),
    };
    if is_position_available(candidate, &graph.nodes, config.collision_threshold) {
        candidate
    } else {
        spider_web_position(candidate, &graph.nodes, config)
    }
}

/// Spreads the children of `parent_id` evenly along the axis they mostly occupy.
///
/// A row (x-spread at least the y-spread) gets `row_spacing` between neighbours, a
/// column gets `column_spacing`. Both are centered on the parent and keep the existing
/// order along the axis. The other coordinate of each child is left alone.
pub fn rebalance_children(parent_id: &str, graph: &Graph, config: &PlacementConfig) -> Vec<Node> {
    let mut nodes = graph.nodes.clone();
    let Some(parent) = graph.node(parent_id).map(Node::center) else {
        return nodes;
    };
    let position = first_positions(&nodes);
    let hierarchy = Hierarchy::build(graph);
    let mut children: Vec<usize> = hierarchy
        .children_of(parent_id)
        .into_iter()
        .filter_map(|id| position.get(id).copied())
        .collect();
    if children.is_empty() {
        return nodes;
    }

    let spread = |axis: fn(&Node) -> f32| {
        let (lo, hi) = children.iter().fold((f32::MAX, f32::MIN), |(lo, hi), &idx| {
            let value = axis(&nodes[idx]);
            (lo.min(value), hi.max(value))
        });
        hi - lo
    };
    let x_spread = spread(|node| node.x);
    let y_spread = spread(|node| node.y);
    let as_row = if x_spread <= EPSILON && y_spread <= EPSILON {
        // No spread to read from: run the axis across the offset from the parent.
        let only = nodes[children[0]].center();
        (only.x - parent.x).abs() < (only.y - parent.y).abs()
    } else {
        x_spread >= y_spread
    };

    if as_row {
        children.sort_by(|&a, &b| nodes[a].x.total_cmp(&nodes[b].x));
    } else {
        children.sort_by(|&a, &b| nodes[a].y.total_cmp(&nodes[b].y));
    }
    let count = children.len();
    let spacing = if as_row {
        config.row_spacing
    } else {
        config.column_spacing
    };
    for (rank, idx) in children.into_iter().enumerate() {
        let offset = (rank as f32 - (count as f32 - 1.0) / 2.0) * spacing;
        if as_row {
            nodes[idx].x = parent.x + offset;
        } else {
            nodes[idx].y = parent.y + offset;
        }
    }
    nodes
}

/// Moves every node crowding `mover_id` out to the collision threshold.
///
/// The mover itself and `protected` ids stay put. A node sitting exactly on the mover
/// is pushed along +x.
pub fn push_apart(
    mover_id: &str,
    nodes: &[Node],
    protected: &[String],
    config: &PlacementConfig,
) -> Vec<Node> {
    let Some(mover) = nodes.iter().find(|node| node.id == mover_id).map(Node::center) else {
        return nodes.to_vec();
    };
    let threshold = config.collision_threshold;
    nodes
        .iter()
        .map(|node| {
            if node.id == mover_id || protected.iter().any(|id| *id == node.id) {
                return node.clone();
            }
            let center = node.center();
            let dist = center.distance(mover);
            if dist >= threshold {
                return node.clone();
            }
            let (ux, uy) = if dist <= EPSILON {
                (1.0, 0.0)
            } else {
                ((center.x - mover.x) / dist, (center.y - mover.y) / dist)
            };
            node.moved_to(mover.offset(ux * threshold, uy * threshold))
        })
        .collect()
}

/// `node_id`, its parents and every child of those parents.
pub fn family_ids(node_id: &str, graph: &Graph) -> Vec<String> {
    let hierarchy = Hierarchy::build(graph);
    let mut family = vec![node_id.to_string()];
    for parent in hierarchy.parents_of(node_id) {
        let members = std::iter::once(parent).chain(hierarchy.children_of(parent));
        for id in members {
            if !family.iter().any(|known| known == id) {
                family.push(id.to_string());
            }
        }
    }
    family
}

/// Adds `child` under `parent_id`: places it, connects it, rebalances the siblings and
/// clears non-family nodes out of their way.
///
/// The child's own coordinates are replaced by the computed placement.
pub fn insert_child(graph: &Graph, parent_id: &str, child: Node, config: &PlacementConfig) -> Graph {
    let point = next_child_position(parent_id, graph, config);
    let child_id = child.id.clone();
    let mut next = graph.clone();
    next.nodes.push(child.moved_to(point));
    if graph.node(parent_id).is_none() {
        tracing::debug!(parent = parent_id, child = %child_id, "parent missing, inserted as root");
        return next;
    }
    next.edges.push(Edge::new(parent_id, child_id.as_str()));
    next.nodes = rebalance_children(parent_id, &next, config);

    let siblings: Vec<String> = Hierarchy::build(&next)
        .children_of(parent_id)
        .into_iter()
        .map(str::to_string)
        .collect();
    for sibling in siblings {
        let protected = family_ids(&sibling, &next);
        next.nodes = push_apart(&sibling, &next.nodes, &protected, config);
    }
    next
}

/// Shifts `root_id` and everything reachable below it by `(dx, dy)`.
pub fn translate_subtree(graph: &Graph, root_id: &str, dx: f32, dy: f32) -> Vec<Node> {
    let hierarchy = Hierarchy::build(graph);
    if hierarchy.index_of(root_id).is_none() {
        return graph.nodes.clone();
    }
    let mut moving = hierarchy.descendants(root_id);
    moving.push(root_id);
    graph
        .nodes
        .iter()
        .map(|node| {
            if moving.contains(&node.id.as_str()) {
                node.moved_to(node.center().offset(dx, dy))
            } else {
                node.clone()
            }
        })
        .collect()
}

fn first_positions(nodes: &[Node]) -> HashMap<&str, usize> {
    let mut position = HashMap::with_capacity(nodes.len());
    for (idx, node) in nodes.iter().enumerate() {
        position.entry(node.id.as_str()).or_insert(idx);
    }
    position
}
