//! Numeric values and point coordinates.
//!
//! Landscapes mix integer, floating-point and exact rational arithmetic.
//! [`Number`] is a closed set of those three kinds with explicit promotion
//! rules, so an interpolated fitness stays exact for as long as every
//! operand is exact.
//!
//! # Token grammar
//!
//! The same tokens are used by the problem file format and the command
//! line:
//!
//! | Token | Value |
//! |---|---|
//! | `'x'` or `"x"` | [`Coordinate::Symbol`] |
//! | contains `/` | [`Number::Fraction`] `n/d` |
//! | contains `.` | [`Number::Float`] |
//! | otherwise | [`Number::Int`] |

mod coordinate;
mod number;

pub use coordinate::{int_point, numeric_coordinates, Coordinate, Point};
pub use number::{Number, NumberKind};
