//! Distance metrics over points.
//!
//! A [`Metric`] measures the distance between two points of equal length.
//! Spanning tree builders consume the complete graph it induces over the
//! seeds ([`Metric::sorted_edge_list`]) and interpolation methods use it to
//! weight seed fitnesses.
//!
//! # Metrics
//!
//! - Hamming: bit strings, integer result.
//! - Manhattan and maximum norm: result kind follows the coordinates, so
//!   fraction vectors keep exact distances.
//! - Euclidean and general p-norm: always floating point.
//! - Kendall-tau: permutations of a common alphabet, exact rational when
//!   normalised (see [`kendall_tau_inversions`]).

mod edges;
mod kendall;
mod types;

pub use edges::{total_weight, Edge};
pub use kendall::{count_inversions, kendall_tau_adjust, kendall_tau_inversions};
pub use types::Metric;
