//! Weighted edges of the complete graph over a point set.

use super::types::Metric;
use crate::error::Result;
use crate::numeric::{Coordinate, Number};
use std::cmp::Ordering;

/// An undirected edge between two seed indices, `v1 < v2`.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Metric distance between the two endpoints.
    pub weight: Number,
    /// Smaller endpoint index.
    pub v1: usize,
    /// Larger endpoint index.
    pub v2: usize,
}

impl Edge {
    /// Creates an edge, normalising the endpoint order.
    pub fn new(weight: Number, a: usize, b: usize) -> Self {
        Self {
            weight,
            v1: a.min(b),
            v2: a.max(b),
        }
    }

    /// Endpoints as a canonical `(min, max)` pair.
    pub fn endpoints(&self) -> (usize, usize) {
        (self.v1, self.v2)
    }

    /// Ascending order by `(weight, v1, v2)`, weights compared numerically.
    ///
    /// A NaN weight compares equal to everything so sorting stays total.
    pub fn sort_cmp(&self, other: &Edge) -> Ordering {
        self.weight
            .numeric_cmp(&other.weight)
            .unwrap_or(Ordering::Equal)
            .then(self.v1.cmp(&other.v1))
            .then(self.v2.cmp(&other.v2))
    }
}

impl Metric {
    /// All pairwise distances; symmetric with a zero diagonal.
    pub fn create_distance_matrix(&self, points: &[Vec<Coordinate>]) -> Result<Vec<Vec<Number>>> {
        points
            .iter()
            .map(|a| points.iter().map(|b| self.distance(a, b)).collect())
            .collect()
    }

    /// Every unordered pair `i < j` exactly once, in row order.
    pub fn create_edge_list(&self, points: &[Vec<Coordinate>]) -> Result<Vec<Edge>> {
        let n = points.len();
        let mut edges = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in i + 1..n {
                edges.push(Edge {
                    weight: self.distance(&points[i], &points[j])?,
                    v1: i,
                    v2: j,
                });
            }
        }
        Ok(edges)
    }

    /// [`create_edge_list`](Metric::create_edge_list) sorted ascending by
    /// `(weight, v1, v2)`.
    pub fn sorted_edge_list(&self, points: &[Vec<Coordinate>]) -> Result<Vec<Edge>> {
        let mut edges = self.create_edge_list(points)?;
        edges.sort_by(Edge::sort_cmp);
        Ok(edges)
    }
}

/// Sum of edge weights, `Int(0)` for no edges.
pub fn total_weight<'a, I: IntoIterator<Item = &'a Edge>>(edges: I) -> Number {
    edges
        .into_iter()
        .fold(Number::Int(0), |acc, e| &acc + &e.weight)
}
