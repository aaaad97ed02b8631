use super::*;

pub(super) fn snap(value: f32, cell: f32) -> f32 {
    (value / cell).round() * cell
}

/// Snaps every node independently to the nearest grid intersection.
pub(super) fn grid_positions(
    graph: &Graph,
    options: &LayoutOptions,
    config: &LayoutConfig,
) -> Vec<Point> {
    let cell = options.spacing_or(config.grid.cell_size);
    graph
        .nodes
        .iter()
        .map(|node| Point::new(snap(node.x, cell), snap(node.y, cell)))
        .collect()
}
