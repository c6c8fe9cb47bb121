//! Seeded metric problems and their persisted form.
//!
//! A [`SeededMetricProblem`] is the output of a generator: a domain, a
//! fitness codomain, a list of seeds with fitnesses, and the metric and
//! interpolation method that extend those fitnesses to every other point.
//! Problems are immutable apart from write-once metadata and round-trip
//! through the `seededmetricproblem 4.0` text format.

mod domain;
mod format;
mod types;

pub use domain::{Codomain, Domain};
pub use types::{Problem, SeededMetricProblem};
