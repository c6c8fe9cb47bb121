//! Spanning tree and fitness assignment values.

use crate::numeric::Number;
use std::collections::BTreeSet;
use std::collections::VecDeque;

/// An undirected spanning tree over the vertices `0..n`.
///
/// Edges are canonical `(min, max)` pairs held in a sorted set. Trees are
/// produced by [`SpanningTreeBuilder`](super::SpanningTreeBuilder) and are
/// not mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanningTree {
    num_vertices: usize,
    edges: BTreeSet<(usize, usize)>,
}

impl SpanningTree {
    /// Builds a tree from raw edges, canonicalising each pair.
    ///
    /// No connectivity check is made; builders guarantee it by
    /// construction.
    pub fn from_edges<I: IntoIterator<Item = (usize, usize)>>(num_vertices: usize, edges: I) -> Self {
        Self {
            num_vertices,
            edges: edges
                .into_iter()
                .map(|(a, b)| (a.min(b), a.max(b)))
                .collect(),
        }
    }

    /// Canonical edge set.
    pub fn edges(&self) -> &BTreeSet<(usize, usize)> {
        &self.edges
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the tree has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Number of vertices the tree spans.
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Neighbour lists, each sorted ascending.
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adj = vec![Vec::new(); self.num_vertices];
        for &(a, b) in &self.edges {
            adj[a].push(b);
            adj[b].push(a);
        }
        for neighbours in &mut adj {
            neighbours.sort_unstable();
        }
        adj
    }

    /// Degree of every vertex.
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.num_vertices];
        for &(a, b) in &self.edges {
            degrees[a] += 1;
            degrees[b] += 1;
        }
        degrees
    }

    /// Vertices of degree one, ascending.
    pub fn leaves(&self) -> Vec<usize> {
        self.degrees()
            .into_iter()
            .enumerate()
            .filter(|&(_, d)| d == 1)
            .map(|(v, _)| v)
            .collect()
    }
}

/// Breadth-first depth of every vertex from `source`.
///
/// Neighbours are visited in adjacency order. Vertices unreachable from
/// `source` get `None`.
pub fn breadth_first_depths(adjacency: &[Vec<usize>], source: usize) -> Vec<Option<usize>> {
    let mut depths = vec![None; adjacency.len()];
    let Some(slot) = depths.get_mut(source) else {
        return depths;
    };
    *slot = Some(0);
    let mut queue = VecDeque::from([source]);
    while let Some(v) = queue.pop_front() {
        let next = depths[v].map(|d| d + 1);
        for &w in &adjacency[v] {
            if depths[w].is_none() {
                depths[w] = next;
                queue.push_back(w);
            }
        }
    }
    depths
}

/// Per-seed fitness values and the designated optimum vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct FitnessAssignment {
    /// Fitness of each seed, aligned by index.
    pub fitnesses: Vec<Number>,
    /// Index of the optimum seed.
    pub optimum: usize,
}
