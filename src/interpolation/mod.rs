//! Fitness interpolation from seeds.
//!
//! A seeded problem only stores its seeds and their fitnesses. Every other
//! point is evaluated by an [`InterpolationMethod`] under the problem's
//! metric: nearest neighbour gives a landscape of flat plateaus, inverse
//! distance weighting a smooth one whose optima are the seeds themselves.
//!
//! # References
//!
//! - Shepard (1968), "A two-dimensional interpolation function for
//!   irregularly-spaced data"

mod types;

pub use types::InterpolationMethod;
