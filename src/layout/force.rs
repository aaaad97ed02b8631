use std::f32::consts::TAU;

use super::*;
use crate::geometry::Rect;

/// Golden angle in radians; spreads coincident pairs without randomness.
const GOLDEN_ANGLE: f32 = 2.399_963;
/// Closest distance used as the repulsion denominator.
const REPULSION_MIN_DISTANCE: f32 = 1.0;
/// Extra distance added when the separation sweep pushes a pair apart.
const SEPARATION_SLACK: f32 = 0.5;

/// Center-to-center distance two nodes must keep after a force layout.
pub fn min_clearance(a: (f32, f32), b: (f32, f32), margin: f32) -> f32 {
    (a.0.max(a.1) + b.0.max(b.1)) / 2.0 + margin.max(0.0)
}

fn pair_direction(i: usize, j: usize) -> (f32, f32) {
    let angle = ((i * 31 + j * 17) as f32 * GOLDEN_ANGLE) % TAU;
    (angle.cos(), angle.sin())
}

fn unit(dx: f32, dy: f32, dist: f32, i: usize, j: usize) -> (f32, f32) {
    if dist < EPSILON {
        pair_direction(i, j)
    } else {
        (dx / dist, dy / dist)
    }
}

pub(super) fn force_directed_positions(
    graph: &Graph,
    hierarchy: &Hierarchy,
    options: &LayoutOptions,
    config: &LayoutConfig,
) -> Vec<Point> {
    let force = &config.force;
    let count = graph.nodes.len();
    let mut positions: Vec<Point> = graph.nodes.iter().map(Node::center).collect();
    if count < 2 {
        return positions;
    }

    let sizes: Vec<(f32, f32)> = graph
        .nodes
        .iter()
        .map(|node| node.size(config.node_width, config.node_height))
        .collect();
    let reference = config.node_width.max(config.node_height).max(EPSILON);
    let extents: Vec<f32> = sizes.iter().map(|(w, h)| w.max(*h)).collect();
    let rest_length = options.spacing_or(force.rest_length);
    let damping = force.damping.clamp(0.0, 0.999);

    let mut velocities = vec![(0.0_f32, 0.0_f32); count];
    for _ in 0..force.iterations {
        let mut forces = vec![(0.0_f32, 0.0_f32); count];

        for i in 0..count {
            for j in (i + 1)..count {
                let dx = positions[i].x - positions[j].x;
                let dy = positions[i].y - positions[j].y;
                let dist = dx.hypot(dy);
                let (ux, uy) = unit(dx, dy, dist, i, j);
                let denom = dist.max(REPULSION_MIN_DISTANCE);
                let size_scale = (extents[i] + extents[j]) / (2.0 * reference);
                let mut magnitude = force.repulsion * size_scale / (denom * denom);
                let clearance = min_clearance(sizes[i], sizes[j], force.clearance_margin);
                if dist < clearance {
                    magnitude += force.overlap_boost * (clearance - dist);
                }
                forces[i].0 += magnitude * ux;
                forces[i].1 += magnitude * uy;
                forces[j].0 -= magnitude * ux;
                forces[j].1 -= magnitude * uy;
            }
        }

        for &(from, to) in hierarchy.edges() {
            let dx = positions[to].x - positions[from].x;
            let dy = positions[to].y - positions[from].y;
            let dist = dx.hypot(dy);
            if dist < EPSILON {
                continue;
            }
            let magnitude = force.spring * (dist - rest_length);
            let (ux, uy) = (dx / dist, dy / dist);
            forces[from].0 += magnitude * ux;
            forces[from].1 += magnitude * uy;
            forces[to].0 -= magnitude * ux;
            forces[to].1 -= magnitude * uy;
        }

        for (idx, velocity) in velocities.iter_mut().enumerate() {
            let mut vx = (velocity.0 + forces[idx].0) * damping;
            let mut vy = (velocity.1 + forces[idx].1) * damping;
            let speed = vx.hypot(vy);
            if speed > force.max_step && speed > EPSILON {
                let scale = force.max_step / speed;
                vx *= scale;
                vy *= scale;
            }
            *velocity = (vx, vy);
            positions[idx].x += vx;
            positions[idx].y += vy;
        }
    }

    let residual = separate_overlaps(
        &mut positions,
        &sizes,
        force.clearance_margin,
        force.separation_passes,
    );
    tracing::trace!(
        iterations = force.iterations,
        residual_overlaps = residual,
        touching_boxes = overlapping_boxes(&positions, &sizes),
        "force simulation settled"
    );
    positions
}

/// Projects every pair closer than its clearance apart. Returns the pairs still too close.
fn separate_overlaps(
    positions: &mut [Point],
    sizes: &[(f32, f32)],
    margin: f32,
    passes: usize,
) -> usize {
    let count = positions.len();
    for _ in 0..passes {
        let mut moved = false;
        for i in 0..count {
            for j in (i + 1)..count {
                let need = min_clearance(sizes[i], sizes[j], margin);
                let dx = positions[i].x - positions[j].x;
                let dy = positions[i].y - positions[j].y;
                let dist = dx.hypot(dy);
                if dist >= need {
                    continue;
                }
                let (ux, uy) = unit(dx, dy, dist, i, j);
                let push = (need - dist) / 2.0 + SEPARATION_SLACK;
                positions[i].x += ux * push;
                positions[i].y += uy * push;
                positions[j].x -= ux * push;
                positions[j].y -= uy * push;
                moved = true;
            }
        }
        if !moved {
            return 0;
        }
    }
    let mut residual = 0;
    for i in 0..count {
        for j in (i + 1)..count {
            if positions[i].distance(positions[j]) < min_clearance(sizes[i], sizes[j], margin) {
                residual += 1;
            }
        }
    }
    residual
}

/// Pairs whose node rectangles intersect.
fn overlapping_boxes(positions: &[Point], sizes: &[(f32, f32)]) -> usize {
    let rects: Vec<Rect> = positions
        .iter()
        .zip(sizes)
        .map(|(&center, &(width, height))| Rect::from_center(center, width, height))
        .collect();
    rects
        .iter()
        .enumerate()
        .map(|(i, a)| rects[i + 1..].iter().filter(|b| a.intersects(b)).count())
        .sum()
}
