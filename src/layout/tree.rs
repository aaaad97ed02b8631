use super::*;

/// Number of sibling slots each node's subtree occupies (leaf = 1).
pub(super) fn subtree_widths(forest: &Forest) -> Vec<usize> {
    let mut widths = vec![1usize; forest.depth.len()];
    for &node in forest.order.iter().rev() {
        let total: usize = forest.children[node].iter().map(|&c| widths[c]).sum();
        widths[node] = total.max(1);
    }
    widths
}

pub(super) fn tree_positions(
    hierarchy: &Hierarchy,
    options: &LayoutOptions,
    config: &LayoutConfig,
    horizontal: bool,
) -> Vec<Point> {
    let count = hierarchy.len();
    let forest = hierarchy.spanning_forest();
    let widths = subtree_widths(&forest);
    let slot = options.spacing_or(config.tree.sibling_spacing);
    let level_spacing = config.tree.level_spacing;

    // Left edge of every node's slot block, parents before children.
    let mut block_left = vec![0.0_f32; count];
    let mut cursor = 0.0;
    for &root in &forest.roots {
        block_left[root] = cursor;
        cursor += widths[root] as f32 * slot + config.tree.subtree_gap;
    }
    for &node in &forest.order {
        let mut child_cursor = block_left[node];
        for &child in &forest.children[node] {
            block_left[child] = child_cursor;
            child_cursor += widths[child] as f32 * slot;
        }
    }

    // Leaves sit mid-slot; parents center over their first and last child.
    let mut across = vec![0.0_f32; count];
    for &node in forest.order.iter().rev() {
        let children = &forest.children[node];
        across[node] = match (children.first(), children.last()) {
            (Some(&first), Some(&last)) => (across[first] + across[last]) / 2.0,
            _ => block_left[node] + slot / 2.0,
        };
    }

    (0..count)
        .map(|idx| {
            let along = forest.depth[idx] as f32 * level_spacing;
            if horizontal {
                Point::new(along, across[idx])
            } else {
                Point::new(across[idx], along)
            }
        })
        .collect()
}
