use std::f32::consts::{FRAC_PI_2, PI, TAU};

use super::*;

/// Radius of a ring holding `count` nodes `arc_width` apart, never below `min_radius`.
///
/// The circumference term reserves `arc_width` of arc per node; the chord term makes
/// the straight-line distance between ring neighbours at least `arc_width` too.
pub fn ring_radius(min_radius: f32, count: usize, arc_width: f32) -> f32 {
    let min_radius = min_radius.max(0.0);
    if count < 2 {
        return min_radius;
    }
    let arc_width = arc_width.max(0.0);
    let circumference = count as f32 * arc_width / TAU;
    let chord = arc_width / (2.0 * (PI / count as f32).sin()).max(EPSILON);
    min_radius.max(circumference).max(chord)
}

/// Evenly spaced points on a ring, the first one at the top.
pub(super) fn ring_points(center: Point, count: usize, radius: f32) -> Vec<Point> {
    (0..count)
        .map(|i| {
            let angle = i as f32 * TAU / count as f32 - FRAC_PI_2;
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

/// Roots on the innermost ring, each depth on its own ring further out.
///
/// The arc width never drops below the diagonal of the largest node.
pub(super) fn radial_positions(
    graph: &Graph,
    hierarchy: &Hierarchy,
    options: &LayoutOptions,
    config: &LayoutConfig,
) -> Vec<Point> {
    let radial = &config.radial;
    let arc_width = options
        .spacing_or(radial.arc_width)
        .max(overlap_free_distance(graph, config));
    let forest = hierarchy.spanning_forest();
    let mut positions = vec![Point::default(); hierarchy.len()];
    let origin = Point::default();

    let mut previous_radius: Option<f32> = None;
    for (depth, level) in forest.levels().iter().enumerate() {
        let radius = match previous_radius {
            None if level.len() == 1 => 0.0,
            None => ring_radius(radial.root_ring_radius, level.len(), arc_width),
            Some(previous) => {
                let base = depth as f32 * radial.level_spacing;
                ring_radius(base, level.len(), arc_width).max(previous + arc_width)
            }
        };
        for (&node, point) in level.iter().zip(ring_points(origin, level.len(), radius)) {
            positions[node] = point;
        }
        previous_radius = Some(radius);
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::ir::Edge;

    fn star(leaves: usize) -> Graph {
        let mut graph = Graph {
            nodes: vec![Node::new("hub", 0.0, 0.0)],
            edges: Vec::new(),
        };
        for i in 0..leaves {
            let id = format!("leaf{i}");
            graph.nodes.push(Node::new(id.clone(), 0.0, 0.0));
            graph.edges.push(Edge::new("hub", id));
        }
        graph
    }

    #[test]
    fn ring_grows_with_member_count() {
        assert_eq!(ring_radius(220.0, 1, 200.0), 220.0);
        assert_eq!(ring_radius(220.0, 2, 200.0), 220.0);
        let crowded = ring_radius(220.0, 24, 200.0);
        assert!(crowded >= 24.0 * 200.0 / TAU);
    }

    #[test]
    fn ring_neighbours_keep_arc_width_apart() {
        for count in 2..=30 {
            let radius = ring_radius(0.0, count, 150.0);
            let points = ring_points(Point::default(), count, radius);
            let dist = points[0].distance(points[1]);
            assert!(dist >= 150.0 - 1e-2, "count {count}: {dist}");
        }
    }

    #[test]
    fn first_ring_member_sits_on_top() {
        let points = ring_points(Point::default(), 4, 100.0);
        assert!(points[0].x.abs() < 1e-4);
        assert!((points[0].y + 100.0).abs() < 1e-4);
    }

    #[test]
    fn single_root_sits_at_origin() {
        let graph = star(24);
        let hierarchy = Hierarchy::build(&graph);
        let options = LayoutOptions::new(LayoutStrategy::Radial);
        let positions = radial_positions(&graph, &hierarchy, &options, &LayoutConfig::default());
        assert_eq!(positions[0], Point::default());
        let radius = positions[1].distance(Point::default());
        for point in &positions[1..] {
            assert!((point.distance(Point::default()) - radius).abs() < 1e-2);
        }
    }

    #[test]
    fn deeper_rings_clear_the_previous_ring() {
        let mut graph = star(30);
        graph.nodes.push(Node::new("deep", 0.0, 0.0));
        graph.edges.push(Edge::new("leaf0", "deep"));
        let hierarchy = Hierarchy::build(&graph);
        let options = LayoutOptions::new(LayoutStrategy::Radial);
        let positions = radial_positions(&graph, &hierarchy, &options, &LayoutConfig::default());
        let ring1 = positions[1].distance(Point::default());
        let ring2 = positions[31].distance(Point::default());
        assert!(ring2 - ring1 >= 200.0 - 1e-2);
    }

    #[test]
    fn tight_spacing_still_keeps_boxes_apart() {
        let mut graph = star(24);
        graph.nodes.push(Node::new("wide", 0.0, 0.0).with_size(320.0, 90.0));
        graph.edges.push(Edge::new("leaf3", "wide"));
        let config = LayoutConfig::default();
        let hierarchy = Hierarchy::build(&graph);
        let options = LayoutOptions::new(LayoutStrategy::Radial).with_spacing(60.0);
        let positions = radial_positions(&graph, &hierarchy, &options, &config);
        let rects: Vec<Rect> = graph
            .nodes
            .iter()
            .zip(&positions)
            .map(|(node, &point)| node.moved_to(point).rect(config.node_width, config.node_height))
            .collect();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
            }
        }
    }
}
