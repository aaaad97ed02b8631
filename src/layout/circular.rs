use super::*;

/// First root (or first node) at the origin, everything else on one ring around it.
pub(super) fn circular_positions(
    graph: &Graph,
    hierarchy: &Hierarchy,
    options: &LayoutOptions,
    config: &LayoutConfig,
) -> Vec<Point> {
    let count = hierarchy.len();
    let mut positions = vec![Point::default(); count];
    if count == 0 {
        return positions;
    }
    let center = hierarchy.roots().first().copied().unwrap_or(0);
    let others: Vec<usize> = (0..count).filter(|&idx| idx != center).collect();
    let arc_width = options
        .spacing_or(config.circular.arc_width)
        .max(overlap_free_distance(graph, config));
    let radius = ring_radius(config.circular.radius.max(arc_width), others.len(), arc_width);
    for (&node, point) in others
        .iter()
        .zip(ring_points(Point::default(), others.len(), radius))
    {
        positions[node] = point;
    }
    positions
}
