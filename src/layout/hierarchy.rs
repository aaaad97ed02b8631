use std::collections::{HashMap, HashSet, VecDeque};

use crate::ir::Graph;

/// Index-based view of the parent→child structure of a graph.
///
/// Node indices refer to positions in `Graph::nodes`. When an id is duplicated the first
/// occurrence owns it and later copies stay isolated. Edges with a missing endpoint,
/// self-loops and repeated parent→child pairs are dropped while building.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    ids: Vec<String>,
    index: HashMap<String, usize>,
    children: Vec<Vec<usize>>,
    parents: Vec<Vec<usize>>,
    edges: Vec<(usize, usize)>,
    ignored_edges: usize,
}

/// Spanning forest of a [`Hierarchy`], claimed breadth-first.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    pub roots: Vec<usize>,
    pub children: Vec<Vec<usize>>,
    pub parent: Vec<Option<usize>>,
    pub depth: Vec<usize>,
    /// Breadth-first visiting order, one tree after another.
    pub order: Vec<usize>,
}

impl Forest {
    /// Node indices grouped by depth, each level in visiting order.
    pub fn levels(&self) -> Vec<Vec<usize>> {
        let mut levels: Vec<Vec<usize>> = Vec::new();
        for &node in &self.order {
            let depth = self.depth[node];
            if levels.len() <= depth {
                levels.resize_with(depth + 1, Vec::new);
            }
            levels[depth].push(node);
        }
        levels
    }
}

impl Hierarchy {
    pub fn build(graph: &Graph) -> Self {
        let count = graph.nodes.len();
        let mut ids = Vec::with_capacity(count);
        let mut index: HashMap<String, usize> = HashMap::with_capacity(count);
        for (idx, node) in graph.nodes.iter().enumerate() {
            ids.push(node.id.clone());
            index.entry(node.id.clone()).or_insert(idx);
        }

        let mut children = vec![Vec::new(); count];
        let mut parents = vec![Vec::new(); count];
        let mut edges = Vec::new();
        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        let mut ignored_edges = 0;
        for edge in &graph.edges {
            let (Some(&from), Some(&to)) = (index.get(&edge.from), index.get(&edge.to)) else {
                ignored_edges += 1;
                continue;
            };
            if from == to || !seen.insert((from, to)) {
                ignored_edges += 1;
                continue;
            }
            children[from].push(to);
            parents[to].push(from);
            edges.push((from, to));
        }

        Self {
            ids,
            index,
            children,
            parents,
            edges,
            ignored_edges,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn id(&self, idx: usize) -> &str {
        &self.ids[idx]
    }

    /// Valid parent→child pairs in edge order.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn ignored_edges(&self) -> usize {
        self.ignored_edges
    }

    pub fn children(&self, idx: usize) -> &[usize] {
        &self.children[idx]
    }

    pub fn parents(&self, idx: usize) -> &[usize] {
        &self.parents[idx]
    }

    pub fn children_of(&self, id: &str) -> Vec<&str> {
        self.index_of(id)
            .map(|idx| self.children(idx).iter().map(|&c| self.id(c)).collect())
            .unwrap_or_default()
    }

    pub fn parents_of(&self, id: &str) -> Vec<&str> {
        self.index_of(id)
            .map(|idx| self.parents(idx).iter().map(|&p| self.id(p)).collect())
            .unwrap_or_default()
    }

    /// Nodes without an incoming edge, in input order.
    pub fn roots(&self) -> Vec<usize> {
        (0..self.len())
            .filter(|&idx| self.parents(idx).is_empty())
            .collect()
    }

    pub fn spanning_forest(&self) -> Forest {
        let count = self.len();
        let mut forest = Forest {
            roots: Vec::new(),
            children: vec![Vec::new(); count],
            parent: vec![None; count],
            depth: vec![0; count],
            order: Vec::with_capacity(count),
        };
        let mut visited = vec![false; count];
        let mut queue = VecDeque::new();

        // Cycles with no entry point get seeded by their first node in input order.
        let seeds = self.roots().into_iter().chain(0..count);
        for seed in seeds {
            if visited[seed] {
                continue;
            }
            visited[seed] = true;
            forest.roots.push(seed);
            queue.push_back(seed);
            while let Some(current) = queue.pop_front() {
                forest.order.push(current);
                for &child in self.children(current) {
                    if visited[child] {
                        continue;
                    }
                    visited[child] = true;
                    forest.parent[child] = Some(current);
                    forest.depth[child] = forest.depth[current] + 1;
                    forest.children[current].push(child);
                    queue.push_back(child);
                }
            }
        }
        forest
    }

    /// Everything reachable below `id`, excluding `id` itself.
    pub fn descendants(&self, id: &str) -> Vec<&str> {
        let Some(start) = self.index_of(id) else {
            return Vec::new();
        };
        let mut visited = vec![false; self.len()];
        visited[start] = true;
        let mut stack: Vec<usize> = self.children(start).iter().rev().copied().collect();
        let mut out = Vec::new();
        while let Some(current) = stack.pop() {
            if visited[current] {
                continue;
            }
            visited[current] = true;
            out.push(self.id(current));
            for &child in self.children(current).iter().rev() {
                if !visited[child] {
                    stack.push(child);
                }
            }
        }
        out
    }

    /// Breadth-first depth of `id` in the spanning forest.
    pub fn depth_of(&self, id: &str) -> Option<usize> {
        let idx = self.index_of(id)?;
        Some(self.spanning_forest().depth[idx])
    }
}
