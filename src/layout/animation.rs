use std::collections::HashMap;

use crate::geometry::Point;
use crate::ir::Node;

/// Cubic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Position-only interpolation from one node list to another.
///
/// The target list defines the output. Nodes missing from the source list appear at
/// their target position immediately.
#[derive(Debug, Clone)]
pub struct LayoutTransition {
    frames: Vec<(Node, Option<Point>)>,
}

impl LayoutTransition {
    pub fn new(old: &[Node], new: &[Node]) -> Self {
        let mut sources: HashMap<&str, Point> = HashMap::with_capacity(old.len());
        for node in old {
            sources.entry(node.id.as_str()).or_insert(node.center());
        }
        let frames = new
            .iter()
            .map(|node| (node.clone(), sources.get(node.id.as_str()).copied()))
            .collect();
        Self { frames }
    }

    pub fn at(&self, progress: f32) -> Vec<Node> {
        let eased = ease_in_out_cubic(progress);
        self.frames
            .iter()
            .map(|(target, source)| match source {
                Some(source) => target.moved_to(source.lerp(target.center(), eased)),
                None => target.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

pub fn animate_layout(old: &[Node], new: &[Node]) -> impl Fn(f32) -> Vec<Node> + use<> {
    let transition = LayoutTransition::new(old, new);
    move |progress| transition.at(progress)
}
