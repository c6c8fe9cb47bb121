//! Problem generators.
//!
//! A generator draws distinct seeds from a [`SeedGenerator`], connects
//! them with the configured [`SpanningTreeBuilder`](crate::tree::SpanningTreeBuilder),
//! derives fitnesses with the configured
//! [`TreeFitnessAssigner`](crate::tree::TreeFitnessAssigner) and packages
//! the result as a [`SeededMetricProblem`](crate::problem::SeededMetricProblem).
//!
//! All randomness of a run comes from one generator seeded by
//! [`GeneratorConfig::seed`], recorded in the problem's `seed` metadata, so
//! a run can be repeated exactly.
//!
//! # Configuration
//!
//! ```yaml
//! num_seeds: 20
//! minimise: false
//! seed: 42
//! space: { kind: bit_string, length: 16 }
//! metric: "metric hamming"
//! interpolation: "interpolation inversedistanceweighting 2 5"
//! builder: { kind: kruskal, metric: "metric hamming", selector: { kind: order_statistic, p: 0.25 } }
//! assigner: { kind: int_depth, vertex: { kind: uniform_random_leaf } }
//! ```

mod config;
mod runner;
mod seeds;

pub use config::GeneratorConfig;
pub use runner::{GeneratedProblem, SpanningTreePairProblemGenerator, SpanningTreeProblemGenerator};
pub use seeds::{
    seed_generator_for, SeedGenerator, SeedSpace, UniformBitString, UniformFloatVector,
    UniformFractionVector, UniformIntVector, UniformPermutation, MAX_DUPLICATE_DRAWS,
};
