//! Property-based invariant tests for the layout engine and placement helpers.
//!
//! 1. Every strategy centers its bounding box on the viewport.
//! 2. Force-directed layouts keep every pair at least the clearance apart.
//! 3. Radial and circular layouts keep every pair at least the arc width apart.
//! 4. Tree siblings are at least the sibling spacing apart, one level per depth.
//! 5. Rebalanced children are evenly spaced and symmetric around the parent.

use mindmap_layout::config::{LayoutConfig, PlacementConfig};
use mindmap_layout::layout::{LayoutStrategy, min_clearance};
use mindmap_layout::placement::rebalance_children;
use mindmap_layout::{Edge, Graph, LayoutOptions, LayoutResult, Node, Viewport, compute_layout};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn graph_strategy(max_nodes: usize) -> impl Strategy<Value = Graph> {
    (1..=max_nodes).prop_flat_map(|count| {
        (
            prop::collection::vec((-1000.0f32..1000.0, -1000.0f32..1000.0), count),
            prop::collection::vec((0..count, 0..count), 0..count * 2),
        )
            .prop_map(|(points, pairs)| Graph {
                nodes: points
                    .into_iter()
                    .enumerate()
                    .map(|(i, (x, y))| Node::new(format!("n{i}"), x, y))
                    .collect(),
                edges: pairs
                    .into_iter()
                    .map(|(a, b)| Edge::new(format!("n{a}"), format!("n{b}")))
                    .collect(),
            })
    })
}

/// Node `i > 0` hangs below a random earlier node.
fn tree_strategy(max_nodes: usize) -> impl Strategy<Value = Graph> {
    (2..=max_nodes).prop_flat_map(|count| {
        prop::collection::vec(any::<prop::sample::Index>(), count - 1).prop_map(move |parents| {
            let nodes = (0..count).map(|i| Node::new(format!("n{i}"), 0.0, 0.0)).collect();
            let edges = parents
                .iter()
                .enumerate()
                .map(|(i, parent)| {
                    let child = i + 1;
                    Edge::new(format!("n{}", parent.index(child)), format!("n{child}"))
                })
                .collect();
            Graph { nodes, edges }
        })
    })
}

fn strategy_strategy() -> impl Strategy<Value = LayoutStrategy> {
    prop::sample::select(LayoutStrategy::ALL.to_vec())
}

fn run(graph: &Graph, strategy: LayoutStrategy) -> LayoutResult {
    compute_layout(
        graph,
        &LayoutOptions::new(strategy),
        Viewport::new(1200.0, 800.0),
        &LayoutConfig::default(),
    )
}

fn min_pair_distance(result: &LayoutResult) -> f32 {
    let mut best = f32::MAX;
    for (i, a) in result.nodes.iter().enumerate() {
        for b in &result.nodes[i + 1..] {
            best = best.min(a.center().distance(b.center()));
        }
    }
    best
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Centering
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn bounding_box_is_centered(graph in graph_strategy(20), strategy in strategy_strategy()) {
        let result = run(&graph, strategy);
        let center = result.bounds.center();
        prop_assert!((center.x - 600.0).abs() < 0.05, "{strategy}: {center:?}");
        prop_assert!((center.y - 400.0).abs() < 0.05, "{strategy}: {center:?}");
        prop_assert_eq!(result.nodes.len(), graph.nodes.len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Force-directed clearance
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn force_directed_clears_every_pair(graph in graph_strategy(24).prop_filter("two or more", |g| g.nodes.len() >= 2)) {
        let config = LayoutConfig::default();
        let clearance = min_clearance(
            (config.node_width, config.node_height),
            (config.node_width, config.node_height),
            config.force.clearance_margin,
        );
        let result = run(&graph, LayoutStrategy::ForceDirected);
        let closest = min_pair_distance(&result);
        prop_assert!(closest >= clearance - 0.5, "closest pair {closest} < {clearance}");
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Ring spacing
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn rings_keep_arc_width(graph in graph_strategy(24).prop_filter("two or more", |g| g.nodes.len() >= 2)) {
        let config = LayoutConfig::default();
        let radial = run(&graph, LayoutStrategy::Radial);
        prop_assert!(min_pair_distance(&radial) >= config.radial.arc_width - 0.05);
        let circular = run(&graph, LayoutStrategy::Circular);
        prop_assert!(min_pair_distance(&circular) >= config.circular.arc_width - 0.05);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Tree slots and levels
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn tree_siblings_and_levels(graph in tree_strategy(20), horizontal in any::<bool>()) {
        let config = LayoutConfig::default();
        let strategy = if horizontal { LayoutStrategy::TreeHorizontal } else { LayoutStrategy::TreeVertical };
        let result = run(&graph, strategy);
        // (across, along) in layout orientation
        let axes = |id: &str| {
            let node = result.node(id).map(Node::center).unwrap_or_default();
            if horizontal { (node.y, node.x) } else { (node.x, node.y) }
        };
        for parent in &graph.nodes {
            let children: Vec<&str> = graph
                .edges
                .iter()
                .filter(|edge| edge.from == parent.id)
                .map(|edge| edge.to.as_str())
                .collect();
            let (_, parent_along) = axes(&parent.id);
            for pair in children.windows(2) {
                let (a, _) = axes(pair[0]);
                let (b, _) = axes(pair[1]);
                prop_assert!(b - a >= config.tree.sibling_spacing - 0.05, "{} -> {}: {a} {b}", pair[0], pair[1]);
            }
            for child in children {
                let (_, along) = axes(child);
                prop_assert!((along - parent_along - config.tree.level_spacing).abs() < 0.05);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Rebalance spacing
// ═════════════════════════════════════════════════════════════════════════

fn evenly_spaced(values: &mut [f32], base: f32, spacing: f32) -> bool {
    values.sort_by(f32::total_cmp);
    let steps = values.windows(2).all(|pair| (pair[1] - pair[0] - spacing).abs() < 1e-2);
    let symmetric = (values[0] + values[values.len() - 1] - 2.0 * base).abs() < 1e-2;
    steps && symmetric
}

proptest! {
    #[test]
    fn rebalanced_children_are_even(
        parent in (-500.0f32..500.0, -500.0f32..500.0),
        children in prop::collection::vec((-900.0f32..900.0, -900.0f32..900.0), 1..10),
    ) {
        let config = PlacementConfig::default();
        let mut graph = Graph::new();
        graph.ensure_node("parent", parent.0, parent.1);
        for (i, (x, y)) in children.iter().enumerate() {
            let id = format!("c{i}");
            graph.ensure_node(&id, *x, *y);
            graph.connect("parent", &id);
        }
        let nodes = rebalance_children("parent", &graph, &config);
        let mut xs: Vec<f32> = nodes[1..].iter().map(|n| n.x).collect();
        let mut ys: Vec<f32> = nodes[1..].iter().map(|n| n.y).collect();
        let row = evenly_spaced(&mut xs, parent.0, config.row_spacing);
        let column = evenly_spaced(&mut ys, parent.1, config.column_spacing);
        prop_assert!(row || column, "xs {xs:?} ys {ys:?}");
    }
}
