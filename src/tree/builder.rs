//! Spanning tree construction over seed points.
//!
//! Every builder works on the complete graph the metric induces over the
//! seeds, with edges sorted ascending by `(weight, v1, v2)`. The optimised
//! builders are plain Kruskal; the selector-driven builders re-run the
//! selector over the current candidate list at every step, trading speed
//! for control over the tree's shape.
//!
//! # References
//!
//! - Kruskal (1956), "On the Shortest Spanning Subtree of a Graph"
//! - Prim (1957), "Shortest Connection Networks and Some Generalizations"

use super::selectors::EdgeSelector;
use super::types::SpanningTree;
use super::union_find::UnionFind;
use crate::error::{LandscapeError, Result};
use crate::metric::{Edge, Metric};
use crate::numeric::Coordinate;
use rand::Rng;
use tracing::debug;

/// Strategy for building a spanning tree over seeds.
///
/// # Examples
///
/// ```
/// use u_landscape::metric::Metric;
/// use u_landscape::numeric::int_point;
/// use u_landscape::random::create_rng;
/// use u_landscape::tree::{EdgeSelector, SpanningTreeBuilder};
///
/// let seeds = vec![
///     int_point(&[0, 0, 0]),
///     int_point(&[1, 0, 0]),
///     int_point(&[1, 1, 0]),
///     int_point(&[1, 1, 1]),
/// ];
/// let builder = SpanningTreeBuilder::Kruskal {
///     metric: Metric::Hamming,
///     selector: EdgeSelector::Minimum,
/// };
/// let tree = builder.build(&seeds, &mut create_rng(42)).unwrap();
/// assert_eq!(tree.edges().iter().copied().collect::<Vec<_>>(), vec![(0, 1), (1, 2), (2, 3)]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum SpanningTreeBuilder {
    /// Minimum spanning tree by Kruskal's algorithm.
    OptimisedMin {
        /// Metric weighting the edges.
        #[cfg_attr(feature = "serde", serde(default))]
        metric: Metric,
    },
    /// Maximum spanning tree by Kruskal's algorithm over descending edges.
    OptimisedMax {
        /// Metric weighting the edges.
        #[cfg_attr(feature = "serde", serde(default))]
        metric: Metric,
    },
    /// Grows one component from vertex 0, letting `selector` pick among
    /// the edges crossing the cut.
    Prim {
        /// Metric weighting the edges.
        #[cfg_attr(feature = "serde", serde(default))]
        metric: Metric,
        /// Policy over the crossing edges.
        #[cfg_attr(feature = "serde", serde(default))]
        selector: EdgeSelector,
    },
    /// Joins components, letting `selector` pick among every edge that
    /// still connects two different components.
    Kruskal {
        /// Metric weighting the edges.
        #[cfg_attr(feature = "serde", serde(default))]
        metric: Metric,
        /// Policy over the remaining edges.
        #[cfg_attr(feature = "serde", serde(default))]
        selector: EdgeSelector,
    },
}

impl Default for SpanningTreeBuilder {
    fn default() -> Self {
        SpanningTreeBuilder::OptimisedMin {
            metric: Metric::default(),
        }
    }
}

impl SpanningTreeBuilder {
    /// Metric used to weight edges.
    pub fn metric(&self) -> &Metric {
        match self {
            SpanningTreeBuilder::OptimisedMin { metric }
            | SpanningTreeBuilder::OptimisedMax { metric }
            | SpanningTreeBuilder::Prim { metric, .. }
            | SpanningTreeBuilder::Kruskal { metric, .. } => metric,
        }
    }

    /// Edge selector, if the builder uses one.
    pub fn selector(&self) -> Option<&EdgeSelector> {
        match self {
            SpanningTreeBuilder::Prim { selector, .. }
            | SpanningTreeBuilder::Kruskal { selector, .. } => Some(selector),
            _ => None,
        }
    }

    /// Short name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            SpanningTreeBuilder::OptimisedMin { .. } => "optimised min",
            SpanningTreeBuilder::OptimisedMax { .. } => "optimised max",
            SpanningTreeBuilder::Prim { .. } => "prim",
            SpanningTreeBuilder::Kruskal { .. } => "kruskal",
        }
    }

    /// Checks the selector's parameters.
    pub fn validate(&self) -> Result<()> {
        self.selector().map_or(Ok(()), EdgeSelector::validate)
    }

    /// Builds a spanning tree over `seeds`.
    ///
    /// The result always has `seeds.len() - 1` edges and is connected.
    ///
    /// # Errors
    /// - [`LandscapeError::InsufficientSeeds`] for fewer than 2 seeds.
    /// - Any error of [`Metric::distance`] on the seeds.
    pub fn build<R: Rng>(&self, seeds: &[Vec<Coordinate>], rng: &mut R) -> Result<SpanningTree> {
        let n = seeds.len();
        if n < 2 {
            return Err(LandscapeError::InsufficientSeeds {
                required: 2,
                available: n,
            });
        }
        self.validate()?;
        let edges = self.metric().sorted_edge_list(seeds)?;
        let considered = edges.len();

        let selected = match self {
            SpanningTreeBuilder::OptimisedMin { .. } => optimised(n, edges.iter()),
            SpanningTreeBuilder::OptimisedMax { .. } => optimised(n, edges.iter().rev()),
            SpanningTreeBuilder::Prim { selector, .. } => prim(n, &edges, selector, rng)?,
            SpanningTreeBuilder::Kruskal { selector, .. } => kruskal(n, edges, selector, rng)?,
        };

        debug!(
            builder = self.name(),
            metric = self.metric().name(),
            vertices = n,
            edges_considered = considered,
            "built spanning tree"
        );
        Ok(SpanningTree::from_edges(n, selected))
    }
}

/// Kruskal over pre-ordered edges. Every scanned edge is unioned, accepted
/// or not; joining a component with itself is a no-op.
fn optimised<'a, I: Iterator<Item = &'a Edge>>(n: usize, edges: I) -> Vec<(usize, usize)> {
    let mut uf = UnionFind::new(n);
    let mut selected = Vec::with_capacity(n - 1);
    for e in edges {
        if !uf.same_component(e.v1, e.v2) {
            selected.push(e.endpoints());
        }
        uf.union(e.v1, e.v2);
    }
    selected
}

fn prim<R: Rng>(
    n: usize,
    edges: &[Edge],
    selector: &EdgeSelector,
    rng: &mut R,
) -> Result<Vec<(usize, usize)>> {
    let mut in_tree = vec![false; n];
    in_tree[0] = true;
    let mut selected = Vec::with_capacity(n - 1);
    for _ in 1..n {
        let crossing: Vec<Edge> = edges
            .iter()
            .filter(|e| in_tree[e.v1] != in_tree[e.v2])
            .cloned()
            .collect();
        let chosen = &crossing[selector.select_index(&crossing, rng)?];
        selected.push(chosen.endpoints());
        in_tree[chosen.v1] = true;
        in_tree[chosen.v2] = true;
    }
    Ok(selected)
}

fn kruskal<R: Rng>(
    n: usize,
    mut remaining: Vec<Edge>,
    selector: &EdgeSelector,
    rng: &mut R,
) -> Result<Vec<(usize, usize)>> {
    let mut uf = UnionFind::new(n);
    let mut selected = Vec::with_capacity(n - 1);
    while !remaining.is_empty() {
        let chosen = &remaining[selector.select_index(&remaining, rng)?];
        let (v1, v2) = chosen.endpoints();
        selected.push((v1, v2));
        uf.union(v1, v2);
        remaining.retain(|e| !uf.same_component(e.v1, e.v2));
    }
    Ok(selected)
}
