mod bezier;

pub use bezier::CubicBezier;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::{LayoutConfig, RouterConfig};
use crate::geometry::{EPSILON, Point, Rect};
use crate::ir::Graph;

// ── Candidate search ────────────────────────────────────────────────
/// (handle scale, bow scale) pairs tried in order until a curve clears every obstacle.
const CANDIDATES: [(f32, f32); 12] = [
    (1.0, 1.0),
    (1.0, -1.0),
    (1.0, 2.0),
    (1.0, -2.0),
    (0.6, 1.0),
    (0.6, -1.0),
    (1.6, 1.0),
    (1.6, -1.0),
    (1.0, 0.0),
    (0.6, 0.0),
    (1.0, 3.0),
    (1.0, -3.0),
];

// ── Label placement ────────────────────────────────────────────────
/// Share of the endpoint x-span kept clear on each side of the label anchor.
const LABEL_SPAN_INSET: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Outward unit normal in screen coordinates.
    pub fn normal(self) -> (f32, f32) {
        match self {
            Side::Top => (0.0, -1.0),
            Side::Bottom => (0.0, 1.0),
            Side::Left => (-1.0, 0.0),
            Side::Right => (1.0, 0.0),
        }
    }

    /// Left and right sides run vertically and fan out along y.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

/// Exit side of a connection from `from` toward `to`; ties favor left/right.
pub fn dominant_side(from: Point, to: Point) -> Side {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx.abs() >= dy.abs() {
        if dx >= 0.0 { Side::Right } else { Side::Left }
    } else if dy > 0.0 {
        Side::Bottom
    } else {
        Side::Top
    }
}

/// Point on `side` of `rect`, shifted `offset` along that side from its midpoint.
pub fn perimeter_anchor(rect: &Rect, side: Side, offset: f32) -> Point {
    let rect = rect.normalized();
    let center = rect.center();
    let half = if side.is_horizontal() {
        rect.height() / 2.0
    } else {
        rect.width() / 2.0
    };
    let offset = offset.clamp(-half, half);
    match side {
        Side::Top => Point::new(center.x + offset, rect.top),
        Side::Bottom => Point::new(center.x + offset, rect.bottom),
        Side::Left => Point::new(rect.left, center.y + offset),
        Side::Right => Point::new(rect.right, center.y + offset),
    }
}

/// What a single connection knows about its neighbours.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteContext {
    /// Forced exit side; derived from the rectangle centers when absent.
    pub side: Option<Side>,
    /// Ordinal among connections leaving the same origin through the same side.
    pub index: usize,
    /// Number of such connections.
    pub total: usize,
    /// Rectangles the curve must stay out of, endpoints excluded.
    pub obstacles: Vec<Rect>,
}

impl RouteContext {
    pub fn siblings(side: Side, index: usize, total: usize) -> Self {
        Self {
            side: Some(side),
            index,
            total,
            obstacles: Vec::new(),
        }
    }

    pub fn with_obstacles(mut self, obstacles: Vec<Rect>) -> Self {
        self.obstacles = obstacles;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectionPath {
    pub curve: CubicBezier,
    pub start_side: Side,
    pub end_side: Side,
    pub label: Point,
}

impl ConnectionPath {
    pub fn start(&self) -> Point {
        self.curve.start
    }

    pub fn end(&self) -> Point {
        self.curve.end
    }

    pub fn point_at(&self, t: f32) -> Point {
        self.curve.point_at(t)
    }

    pub fn sample(&self, count: usize) -> Vec<Point> {
        self.curve.sample(count)
    }

    pub fn to_svg_path(&self) -> String {
        self.curve.to_svg_path()
    }
}

/// Samples of `curve` that fall inside any obstacle grown by `buffer`.
///
/// The `skip` samples nearest each endpoint are not checked.
pub fn curve_collisions(
    curve: &CubicBezier,
    obstacles: &[Rect],
    samples: usize,
    skip: usize,
    buffer: f32,
) -> usize {
    if obstacles.is_empty() {
        return 0;
    }
    let points = curve.sample(samples);
    let upper = points.len().saturating_sub(skip);
    points
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx >= skip && *idx < upper)
        .filter(|(_, point)| {
            obstacles
                .iter()
                .any(|rect| rect.normalized().contains(**point, buffer))
        })
        .count()
}

fn label_anchor(curve: &CubicBezier) -> Point {
    let mid = curve.point_at(0.5);
    let lo = curve.start.x.min(curve.end.x);
    let hi = curve.start.x.max(curve.end.x);
    let span = hi - lo;
    if span <= EPSILON {
        return mid;
    }
    let inset = span * LABEL_SPAN_INSET;
    Point::new(mid.x.clamp(lo + inset, hi - inset), mid.y)
}

/// Computes one organic cubic curve from `from` to `to`.
///
/// Exits through the side facing `to` (or `context.side`), fans out along that side by
/// `context.index / context.total`, bows perpendicular to the chord, and tries
/// alternative bows and handle lengths until no interior sample touches an obstacle.
/// When every candidate collides, the one with the fewest colliding samples wins.
pub fn route_connection(
    from: Rect,
    to: Rect,
    context: &RouteContext,
    config: &RouterConfig,
) -> ConnectionPath {
    let (from, to) = (from.normalized(), to.normalized());
    let side = context
        .side
        .unwrap_or_else(|| dominant_side(from.center(), to.center()));
    let entry = side.opposite();
    let total = context.total.max(1);
    let index = context.index.min(total - 1);

    let edge_length = if side.is_horizontal() {
        from.height()
    } else {
        from.width()
    };
    let fan = if total > 1 {
        ((index as f32 + 0.5) / total as f32 - 0.5) * edge_length * config.fan_ratio
    } else {
        0.0
    };
    let start = perimeter_anchor(&from, side, fan);
    let end = perimeter_anchor(&to, entry, 0.0);

    let dist = start.distance(end).max(EPSILON);
    let max_handle = config.max_handle.max(config.min_handle);
    let base_handle = (dist * config.handle_ratio).clamp(config.min_handle, max_handle);
    let (exit_x, exit_y) = side.normal();
    let (entry_x, entry_y) = entry.normal();
    let perp_x = -(end.y - start.y) / dist;
    let perp_y = (end.x - start.x) / dist;

    let centered = index as f32 - (total as f32 - 1.0) / 2.0;
    let bow_base =
        (dist * config.bow_ratio * (1.0 + centered.abs() * config.bow_step)).min(config.max_bow);
    let bow_sign = if centered < 0.0 { -1.0 } else { 1.0 };

    let build = |handle_scale: f32, bow_scale: f32| {
        let handle = base_handle * handle_scale;
        let bow = bow_base * bow_scale * bow_sign;
        CubicBezier::new(
            start,
            Point::new(
                start.x + exit_x * handle + perp_x * bow,
                start.y + exit_y * handle + perp_y * bow,
            ),
            Point::new(
                end.x + entry_x * handle + perp_x * bow,
                end.y + entry_y * handle + perp_y * bow,
            ),
            end,
        )
    };

    let mut best: Option<(usize, CubicBezier)> = None;
    for (handle_scale, bow_scale) in CANDIDATES {
        let curve = build(handle_scale, bow_scale);
        let hits = curve_collisions(
            &curve,
            &context.obstacles,
            config.samples,
            config.endpoint_skip,
            config.obstacle_buffer,
        );
        if best.as_ref().is_none_or(|(fewest, _)| hits < *fewest) {
            best = Some((hits, curve));
        }
        if hits == 0 {
            break;
        }
    }
    let (hits, curve) = best.unwrap_or_else(|| (0, build(1.0, 1.0)));
    if hits > 0 {
        tracing::trace!(hits, "no collision-free candidate, keeping the closest");
    }

    ConnectionPath {
        curve,
        start_side: side,
        end_side: entry,
        label: label_anchor(&curve),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutedConnection {
    pub edge_id: String,
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub path: ConnectionPath,
}

/// Routes every edge of `graph` whose endpoints exist.
///
/// Edges leaving the same node through the same side form one fan, ordered by the
/// target's coordinate along that side so neighbouring curves do not cross. Every other
/// node rectangle is an obstacle.
pub fn route_connections(
    graph: &Graph,
    layout: &LayoutConfig,
    config: &RouterConfig,
) -> Vec<RoutedConnection> {
    let _span = tracing::debug_span!(
        "route_connections",
        nodes = graph.nodes.len(),
        edges = graph.edges.len()
    )
    .entered();

    let mut index: HashMap<&str, usize> = HashMap::with_capacity(graph.nodes.len());
    for (idx, node) in graph.nodes.iter().enumerate() {
        index.entry(node.id.as_str()).or_insert(idx);
    }
    let rects: Vec<Rect> = graph
        .nodes
        .iter()
        .map(|node| node.rect(layout.node_width, layout.node_height))
        .collect();

    // (edge position, from, to, side)
    let mut resolved: Vec<(usize, usize, usize, Side)> = Vec::new();
    for (pos, edge) in graph.edges.iter().enumerate() {
        let (Some(&from), Some(&to)) = (index.get(edge.from.as_str()), index.get(edge.to.as_str()))
        else {
            continue;
        };
        if from == to {
            continue;
        }
        let side = dominant_side(rects[from].center(), rects[to].center());
        resolved.push((pos, from, to, side));
    }
    let skipped = graph.edges.len() - resolved.len();
    if skipped > 0 {
        tracing::debug!(skipped, "skipped edges without two distinct endpoints");
    }

    let mut fans: HashMap<(usize, Side), Vec<usize>> = HashMap::new();
    for (slot, &(_, from, _, side)) in resolved.iter().enumerate() {
        fans.entry((from, side)).or_default().push(slot);
    }
    let mut ordinal = vec![(0usize, 1usize); resolved.len()];
    for ((_, side), mut members) in fans {
        members.sort_by(|&a, &b| {
            let ta = rects[resolved[a].2].center();
            let tb = rects[resolved[b].2].center();
            let (ka, kb) = if side.is_horizontal() {
                (ta.y, tb.y)
            } else {
                (ta.x, tb.x)
            };
            ka.total_cmp(&kb).then(a.cmp(&b))
        });
        let total = members.len();
        for (rank, slot) in members.into_iter().enumerate() {
            ordinal[slot] = (rank, total);
        }
    }

    resolved
        .iter()
        .zip(ordinal)
        .map(|(&(pos, from, to, side), (rank, total))| {
            let obstacles = rects
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != from && *idx != to)
                .map(|(_, rect)| *rect)
                .collect();
            let context = RouteContext::siblings(side, rank, total).with_obstacles(obstacles);
            let edge = &graph.edges[pos];
            RoutedConnection {
                edge_id: edge.id.clone(),
                from: edge.from.clone(),
                to: edge.to.clone(),
                label: edge.label.clone(),
                path: route_connection(rects[from], rects[to], &context, config),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Edge, Node};

    fn rect(cx: f32, cy: f32) -> Rect {
        Rect::from_center(Point::new(cx, cy), 160.0, 60.0)
    }

    #[test]
    fn side_selection_prefers_horizontal_on_ties() {
        let origin = Point::new(0.0, 0.0);
        assert_eq!(dominant_side(origin, Point::new(10.0, 10.0)), Side::Right);
        assert_eq!(dominant_side(origin, Point::new(-10.0, 10.0)), Side::Left);
        assert_eq!(dominant_side(origin, Point::new(3.0, 10.0)), Side::Bottom);
        assert_eq!(dominant_side(origin, Point::new(3.0, -10.0)), Side::Top);
        assert_eq!(dominant_side(origin, origin), Side::Right);
    }

    #[test]
    fn anchors_sit_on_facing_edges() {
        let path = route_connection(
            rect(0.0, 0.0),
            rect(400.0, 30.0),
            &RouteContext::default(),
            &RouterConfig::default(),
        );
        assert_eq!(path.start(), Point::new(80.0, 0.0));
        assert_eq!(path.end(), Point::new(320.0, 30.0));
        assert_eq!(path.start_side, Side::Right);
        assert_eq!(path.end_side, Side::Left);
        assert!(path.label.x > 80.0 && path.label.x < 320.0);
    }

    #[test]
    fn explicit_side_overrides_geometry() {
        let context = RouteContext {
            side: Some(Side::Bottom),
            ..RouteContext::default()
        };
        let path = route_connection(
            rect(0.0, 0.0),
            rect(400.0, 30.0),
            &context,
            &RouterConfig::default(),
        );
        assert_eq!(path.start(), Point::new(0.0, 30.0));
        assert_eq!(path.end(), Point::new(400.0, 0.0));
    }

    #[test]
    fn siblings_fan_out_along_the_exit_edge() {
        let config = RouterConfig::default();
        let starts: Vec<Point> = (0..3)
            .map(|i| {
                route_connection(
                    rect(0.0, 0.0),
                    rect(400.0, -150.0 + 150.0 * i as f32),
                    &RouteContext::siblings(Side::Right, i, 3),
                    &config,
                )
                .start()
            })
            .collect();
        assert!(starts.iter().all(|p| p.x == 80.0));
        assert!(starts[0].y < starts[1].y && starts[1].y < starts[2].y);
        assert!(starts[1].y.abs() < 1e-4);
    }

    #[test]
    fn curve_avoids_an_obstacle_on_the_chord() {
        let config = RouterConfig::default();
        let blocker = Rect::from_center(Point::new(300.0, 0.0), 60.0, 40.0);
        let context = RouteContext::default().with_obstacles(vec![blocker]);
        let path = route_connection(rect(0.0, 0.0), rect(600.0, 0.0), &context, &config);
        let hits = curve_collisions(&path.curve, &[blocker], 50, 2, 2.0);
        assert_eq!(hits, 0);
    }

    #[test]
    fn degenerate_rectangles_do_not_produce_nan() {
        let point = Rect::from_center(Point::new(5.0, 5.0), 0.0, 0.0);
        let path = route_connection(point, point, &RouteContext::default(), &RouterConfig::default());
        for sample in path.sample(10) {
            assert!(sample.x.is_finite() && sample.y.is_finite());
        }
        assert!(path.label.x.is_finite());
    }

    #[test]
    fn inverted_rectangles_are_normalized() {
        let inverted = Rect {
            left: 10.0,
            top: 10.0,
            right: 0.0,
            bottom: 0.0,
        };
        let target = Rect::new(100.0, 0.0, 120.0, 20.0);
        let context = RouteContext::siblings(Side::Right, 0, 2);
        let path = route_connection(inverted, target, &context, &RouterConfig::default());
        let start = path.start();
        assert!(start.x.is_finite() && start.y.is_finite());
        assert_eq!(start.x, 10.0);
        assert!((0.0..=10.0).contains(&start.y));
        assert_eq!(path.end().x, 100.0);

        let anchor = perimeter_anchor(&inverted, Side::Bottom, 50.0);
        assert_eq!(anchor, Point::new(10.0, 10.0));
    }

    #[test]
    fn routes_every_valid_edge() {
        let graph = Graph {
            nodes: vec![
                Node::new("root", 0.0, 0.0),
                Node::new("a", 400.0, -120.0),
                Node::new("b", 400.0, 120.0),
            ],
            edges: vec![
                Edge::new("root", "b").with_label("second"),
                Edge::new("root", "a"),
                Edge::new("root", "ghost"),
                Edge::new("a", "a"),
            ],
        };
        let routed = route_connections(&graph, &LayoutConfig::default(), &RouterConfig::default());
        assert_eq!(routed.len(), 2);
        assert_eq!(routed[0].to, "b");
        assert_eq!(routed[0].label.as_deref(), Some("second"));
        // "a" is above "b", so it takes the upper fan slot.
        assert!(routed[1].path.start().y < routed[0].path.start().y);
    }
}
