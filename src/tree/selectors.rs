//! Edge and vertex selection policies.
//!
//! Selectors decide which candidate a builder or fitness assigner takes
//! next. Deterministic policies (minimum, maximum, order statistic) give
//! classic minimum/maximum spanning trees and their quantile variants;
//! randomised policies let a generator move the landscape away from the
//! strict optimum-tree shape.

use super::types::SpanningTree;
use crate::error::{LandscapeError, Result};
use crate::metric::Edge;
use rand::Rng;

/// Policy for choosing one edge from a list sorted ascending by
/// `(weight, v1, v2)`.
///
/// # Examples
///
/// ```
/// use u_landscape::tree::EdgeSelector;
///
/// // Median edge of each candidate list
/// let sel = EdgeSelector::new_order_statistic(0.5).unwrap();
///
/// // Probabilities outside [0, 1] are rejected
/// assert!(EdgeSelector::new_random_min_max(1.5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum EdgeSelector {
    /// Always the first (lightest) edge.
    #[default]
    Minimum,
    /// Always the last (heaviest) edge.
    Maximum,
    /// The edge at quantile `p`: index `(len - 1) * p` rounded to the
    /// nearest integer, ties to even.
    OrderStatistic {
        /// Quantile in `[0, 1]`.
        p: f64,
    },
    /// The heaviest edge with probability `p`, otherwise the lightest.
    RandomMinMax {
        /// Probability of picking the heaviest edge, in `[0, 1]`.
        p: f64,
    },
    /// Any edge, uniformly.
    UniformRandom,
}

impl EdgeSelector {
    /// Order-statistic selector, validating `p`.
    pub fn new_order_statistic(p: f64) -> Result<Self> {
        let sel = EdgeSelector::OrderStatistic { p };
        sel.validate()?;
        Ok(sel)
    }

    /// Random min/max selector, validating `p`.
    pub fn new_random_min_max(p: f64) -> Result<Self> {
        let sel = EdgeSelector::RandomMinMax { p };
        sel.validate()?;
        Ok(sel)
    }

    /// Checks that any probability parameter lies in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        match self {
            EdgeSelector::OrderStatistic { p } | EdgeSelector::RandomMinMax { p }
                if !(0.0..=1.0).contains(p) =>
            {
                Err(LandscapeError::InvalidParameter(format!(
                    "edge selector p = {p}, expected 0 <= p <= 1"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Short name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            EdgeSelector::Minimum => "minimum",
            EdgeSelector::Maximum => "maximum",
            EdgeSelector::OrderStatistic { .. } => "order statistic",
            EdgeSelector::RandomMinMax { .. } => "random min/max",
            EdgeSelector::UniformRandom => "uniform random",
        }
    }

    /// Picks an index into `sorted_edges`.
    ///
    /// # Errors
    /// [`LandscapeError::EmptyCandidates`] if `sorted_edges` is empty.
    pub fn select_index<R: Rng>(&self, sorted_edges: &[Edge], rng: &mut R) -> Result<usize> {
        if sorted_edges.is_empty() {
            return Err(LandscapeError::EmptyCandidates("edges"));
        }
        let last = sorted_edges.len() - 1;
        let index = match self {
            EdgeSelector::Minimum => 0,
            EdgeSelector::Maximum => last,
            EdgeSelector::OrderStatistic { p } => {
                let index = (last as f64 * p).round_ties_even();
                (index.max(0.0) as usize).min(last)
            }
            EdgeSelector::RandomMinMax { p } => {
                if rng.random::<f64>() < *p {
                    last
                } else {
                    0
                }
            }
            EdgeSelector::UniformRandom => rng.random_range(0..=last),
        };
        Ok(index)
    }
}

/// Policy for choosing a vertex of a spanning tree, typically the source
/// of a depth-based fitness assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum VertexSelector {
    /// Any vertex, uniformly.
    #[default]
    UniformRandom,
    /// Any vertex of degree one, uniformly.
    UniformRandomLeaf,
    /// A fixed vertex.
    Forced {
        /// Vertex index; must be below the tree's vertex count.
        vertex: usize,
    },
}

impl VertexSelector {
    /// Selector that always returns `vertex`.
    pub fn forced(vertex: usize) -> Self {
        VertexSelector::Forced { vertex }
    }

    /// Short name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            VertexSelector::UniformRandom => "uniform random",
            VertexSelector::UniformRandomLeaf => "uniform random leaf",
            VertexSelector::Forced { .. } => "forced",
        }
    }

    /// Picks a vertex of `tree`.
    ///
    /// # Errors
    /// - [`LandscapeError::EmptyCandidates`] if the tree has no vertices, or
    ///   no leaves for [`VertexSelector::UniformRandomLeaf`].
    /// - [`LandscapeError::InvalidParameter`] if a forced vertex does not
    ///   exist.
    pub fn select_index<R: Rng>(&self, tree: &SpanningTree, rng: &mut R) -> Result<usize> {
        let n = tree.num_vertices();
        if n == 0 {
            return Err(LandscapeError::EmptyCandidates("vertices"));
        }
        match self {
            VertexSelector::UniformRandom => Ok(rng.random_range(0..n)),
            VertexSelector::UniformRandomLeaf => {
                let leaves = tree.leaves();
                if leaves.is_empty() {
                    return Err(LandscapeError::EmptyCandidates("leaf vertices"));
                }
                Ok(leaves[rng.random_range(0..leaves.len())])
            }
            VertexSelector::Forced { vertex } if *vertex < n => Ok(*vertex),
            VertexSelector::Forced { vertex } => Err(LandscapeError::InvalidParameter(format!(
                "cannot force vertex {vertex}, tree has {n} vertices"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::Number;
    use crate::random::{create_rng, LandscapeRng};

    fn edges(n: usize) -> Vec<Edge> {
        (0..n)
            .map(|i| Edge::new(Number::Int(i as i64), i, i + 1))
            .collect()
    }

    #[test]
    fn test_empty_candidates() {
        let mut rng = create_rng(42);
        for sel in [
            EdgeSelector::Minimum,
            EdgeSelector::Maximum,
            EdgeSelector::OrderStatistic { p: 0.5 },
            EdgeSelector::RandomMinMax { p: 0.5 },
            EdgeSelector::UniformRandom,
        ] {
            assert!(matches!(
                sel.select_index(&[], &mut rng),
                Err(LandscapeError::EmptyCandidates(_))
            ));
        }
    }

    #[test]
    fn test_min_max() {
        let mut rng = create_rng(42);
        let e = edges(5);
        assert_eq!(EdgeSelector::Minimum.select_index(&e, &mut rng).unwrap(), 0);
        assert_eq!(EdgeSelector::Maximum.select_index(&e, &mut rng).unwrap(), 4);
    }

    #[test]
    fn test_order_statistic() {
        let mut rng = create_rng(42);
        let e = edges(5);
        let at = |p: f64, rng: &mut LandscapeRng| {
            EdgeSelector::OrderStatistic { p }
                .select_index(&e, rng)
                .unwrap()
        };
        assert_eq!(at(0.0, &mut rng), 0);
        assert_eq!(at(1.0, &mut rng), 4);
        assert_eq!(at(0.5, &mut rng), 2);
        // 4 * 0.625 = 2.5 rounds to even
        assert_eq!(at(0.625, &mut rng), 2);
        // 4 * 0.875 = 3.5 rounds to even
        assert_eq!(at(0.875, &mut rng), 4);
    }

    #[test]
    fn test_random_min_max_extremes() {
        let mut rng = create_rng(42);
        let e = edges(6);
        for _ in 0..50 {
            assert_eq!(
                EdgeSelector::RandomMinMax { p: 0.0 }.select_index(&e, &mut rng).unwrap(),
                0
            );
            assert_eq!(
                EdgeSelector::RandomMinMax { p: 1.0 }.select_index(&e, &mut rng).unwrap(),
                5
            );
        }
    }

    #[test]
    fn test_random_min_max_only_extremes() {
        let mut rng = create_rng(42);
        let e = edges(6);
        let sel = EdgeSelector::RandomMinMax { p: 0.5 };
        let picks: Vec<usize> = (0..200).map(|_| sel.select_index(&e, &mut rng).unwrap()).collect();
        assert!(picks.iter().all(|&i| i == 0 || i == 5));
        assert!(picks.contains(&0));
        assert!(picks.contains(&5));
    }

    #[test]
    fn test_uniform_random_in_range() {
        let mut rng = create_rng(42);
        let e = edges(7);
        let mut seen = [false; 7];
        for _ in 0..500 {
            let i = EdgeSelector::UniformRandom.select_index(&e, &mut rng).unwrap();
            seen[i] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_validate() {
        assert!(EdgeSelector::new_order_statistic(0.0).is_ok());
        assert!(EdgeSelector::new_order_statistic(1.0).is_ok());
        assert!(EdgeSelector::new_order_statistic(-0.1).is_err());
        assert!(EdgeSelector::new_random_min_max(1.01).is_err());
        assert!(EdgeSelector::OrderStatistic { p: f64::NAN }.validate().is_err());
        assert!(EdgeSelector::Minimum.validate().is_ok());
    }

    #[test]
    fn test_vertex_selectors() {
        let mut rng = create_rng(42);
        let star = SpanningTree::from_edges(4, [(0, 1), (0, 2), (0, 3)]);
        for _ in 0..50 {
            let v = VertexSelector::UniformRandomLeaf
                .select_index(&star, &mut rng)
                .unwrap();
            assert!((1..4).contains(&v));
            let v = VertexSelector::UniformRandom
                .select_index(&star, &mut rng)
                .unwrap();
            assert!(v < 4);
        }
        assert_eq!(
            VertexSelector::forced(2).select_index(&star, &mut rng).unwrap(),
            2
        );
        assert!(matches!(
            VertexSelector::forced(4).select_index(&star, &mut rng),
            Err(LandscapeError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_vertex_selector_no_candidates() {
        let mut rng = create_rng(42);
        let empty = SpanningTree::from_edges(0, []);
        assert!(matches!(
            VertexSelector::UniformRandom.select_index(&empty, &mut rng),
            Err(LandscapeError::EmptyCandidates(_))
        ));
        let single = SpanningTree::from_edges(1, []);
        assert!(matches!(
            VertexSelector::UniformRandomLeaf.select_index(&single, &mut rng),
            Err(LandscapeError::EmptyCandidates(_))
        ));
    }
}
