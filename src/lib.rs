//! Seeded metric problems: reproducible synthetic fitness landscapes.
//!
//! A landscape is defined by a handful of seed points with known fitness;
//! every other point is evaluated by interpolating from the seeds under a
//! distance metric. Generation runs in four steps:
//!
//! - **Seeds**: distinct points drawn from a bit string, integer, float,
//!   fraction or permutation space ([`generator::SeedGenerator`]).
//! - **Spanning tree**: the seeds are connected by a minimum, maximum or
//!   selector-driven spanning tree under a [`metric::Metric`]
//!   ([`tree::SpanningTreeBuilder`]).
//! - **Fitness**: seed fitnesses follow from the tree, either as random
//!   values or as breadth-first depth from an optimum vertex
//!   ([`tree::TreeFitnessAssigner`]).
//! - **Interpolation**: nearest neighbour or inverse distance weighting
//!   extends the seed fitnesses to the whole space
//!   ([`interpolation::InterpolationMethod`]).
//!
//! The result is an immutable [`problem::SeededMetricProblem`] that
//! round-trips through the `seededmetricproblem 4.0` text format.
//!
//! # Architecture
//!
//! Arithmetic is exact wherever the inputs are: [`numeric::Number`] keeps
//! integers and fractions exact and only falls back to floats when a float
//! operand appears. Every stochastic step takes an explicit random source
//! ([`random::create_rng`]), so a generator configuration plus a seed
//! determines the output file byte for byte.

pub mod error;
pub mod generator;
pub mod interpolation;
pub mod metric;
pub mod numeric;
pub mod problem;
pub mod random;
pub mod tree;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{LandscapeError, Result};
