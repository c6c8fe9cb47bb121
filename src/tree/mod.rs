//! Spanning trees over seeds and the fitness values derived from them.
//!
//! Generation runs in two steps:
//!
//! 1. A [`SpanningTreeBuilder`] connects the seeds, optionally steered by an
//!    [`EdgeSelector`]. Connectivity is tracked with [`UnionFind`].
//! 2. A [`TreeFitnessAssigner`] turns the tree into per-seed fitness values
//!    and an optimum vertex, optionally steered by a [`VertexSelector`].
//!
//! The tree itself is discarded once fitnesses are known; evaluating a
//! problem only needs seeds, fitnesses and the interpolation metric.

mod builder;
mod fitness;
mod selectors;
mod types;
mod union_find;

pub use builder::SpanningTreeBuilder;
pub use fitness::TreeFitnessAssigner;
pub(crate) use fitness::best_index;
pub use selectors::{EdgeSelector, VertexSelector};
pub use types::{breadth_first_depths, FitnessAssignment, SpanningTree};
pub use union_find::UnionFind;
