//! Uniform seed generators over the supported search spaces.

use crate::error::{LandscapeError, Result};
use crate::numeric::{Coordinate, Number};
use crate::problem::{Domain, SeededMetricProblem};
use crate::random::shuffle;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive};
use rand::{Rng, RngCore};
use std::collections::HashSet;

/// Draws points from a search space.
///
/// Generators are used as trait objects, so the random source is passed
/// as `&mut dyn RngCore`; any `rand` generator coerces to it.
pub trait SeedGenerator {
    /// One uniformly drawn point.
    fn generate_seed(&self, rng: &mut dyn RngCore) -> Vec<Coordinate>;

    /// Number of coordinates per point.
    fn length(&self) -> usize;

    /// Domain written to problem files.
    ///
    /// # Errors
    /// [`LandscapeError::Domain`] when coordinates have differing ranges.
    fn domain(&self) -> Result<Domain>;

    /// Number of distinct points, when finite and small enough to count.
    fn size(&self) -> Option<u128> {
        None
    }

    /// `n` distinct points in order of first appearance.
    ///
    /// # Errors
    /// [`LandscapeError::InvalidParameter`] when the space is known to hold
    /// fewer than `n` points, or when [`MAX_DUPLICATE_DRAWS`] draws in a
    /// row repeat points already seen.
    fn generate_seeds(&self, n: usize, rng: &mut dyn RngCore) -> Result<Vec<Vec<Coordinate>>> {
        if let Some(size) = self.size() {
            if n as u128 > size {
                return Err(LandscapeError::InvalidParameter(format!(
                    "{n} distinct seeds requested from a space of {size} points"
                )));
            }
        }
        let mut seen = HashSet::with_capacity(n);
        let mut seeds = Vec::with_capacity(n);
        let mut duplicates = 0;
        while seeds.len() < n {
            let seed = self.generate_seed(rng);
            if seen.insert(point_key(&seed)) {
                seeds.push(seed);
                duplicates = 0;
            } else {
                duplicates += 1;
                if duplicates >= MAX_DUPLICATE_DRAWS {
                    return Err(LandscapeError::InvalidParameter(format!(
                        "only {} distinct seeds found after {MAX_DUPLICATE_DRAWS} repeated draws, {n} requested",
                        seeds.len()
                    )));
                }
            }
        }
        Ok(seeds)
    }
}

/// Consecutive repeated draws after which [`SeedGenerator::generate_seeds`]
/// gives up on a space too small for the request.
pub const MAX_DUPLICATE_DRAWS: usize = 10_000;

fn point_key(point: &[Coordinate]) -> String {
    point
        .iter()
        .map(Coordinate::token)
        .collect::<Vec<_>>()
        .join(" ")
}

fn invalid(msg: impl Into<String>) -> LandscapeError {
    LandscapeError::InvalidParameter(msg.into())
}

fn non_empty(length: usize) -> Result<()> {
    if length == 0 {
        return Err(invalid("seed length must be positive"));
    }
    Ok(())
}

/// The single range shared by every coordinate.
fn homogeneous<T: PartialEq + Clone>(ranges: &[T]) -> Result<T> {
    match ranges.split_first() {
        Some((first, rest)) if rest.iter().all(|r| r == first) => Ok(first.clone()),
        _ => Err(LandscapeError::Domain(
            "heterogeneous domains not supported for output".into(),
        )),
    }
}

/// Uniform bit strings.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformBitString {
    length: usize,
}

impl UniformBitString {
    /// Bit strings of `length` bits.
    pub fn new(length: usize) -> Result<Self> {
        non_empty(length)?;
        Ok(Self { length })
    }
}

impl SeedGenerator for UniformBitString {
    fn generate_seed(&self, rng: &mut dyn RngCore) -> Vec<Coordinate> {
        (0..self.length)
            .map(|_| Coordinate::int(rng.random_range(0..=1)))
            .collect()
    }

    fn length(&self) -> usize {
        self.length
    }

    fn domain(&self) -> Result<Domain> {
        Ok(Domain::Bit)
    }

    fn size(&self) -> Option<u128> {
        u32::try_from(self.length)
            .ok()
            .and_then(|l| 2u128.checked_pow(l))
    }
}

/// Uniform integer vectors with an inclusive range per coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformIntVector {
    ranges: Vec<(i64, i64)>,
}

impl UniformIntVector {
    /// One `(a, b)` range per coordinate, in either order.
    pub fn new(ranges: Vec<(i64, i64)>) -> Result<Self> {
        non_empty(ranges.len())?;
        let ranges = ranges.into_iter().map(|(a, b)| (a.min(b), a.max(b))).collect();
        Ok(Self { ranges })
    }
}

impl SeedGenerator for UniformIntVector {
    fn generate_seed(&self, rng: &mut dyn RngCore) -> Vec<Coordinate> {
        self.ranges
            .iter()
            .map(|&(min, max)| Coordinate::int(rng.random_range(min..=max)))
            .collect()
    }

    fn length(&self) -> usize {
        self.ranges.len()
    }

    fn domain(&self) -> Result<Domain> {
        match homogeneous(&self.ranges)? {
            (0, 1) => Ok(Domain::Bit),
            (min, max) if min < max => Ok(Domain::Int { min, max }),
            (min, max) => Err(LandscapeError::Domain(format!(
                "degenerate int range {min}..={max}"
            ))),
        }
    }

    fn size(&self) -> Option<u128> {
        self.ranges.iter().try_fold(1u128, |acc, &(min, max)| {
            let width = (i128::from(max) - i128::from(min) + 1) as u128;
            acc.checked_mul(width)
        })
    }
}

/// Uniform float vectors with an inclusive range per coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformFloatVector {
    ranges: Vec<(f64, f64)>,
}

impl UniformFloatVector {
    /// One finite, non-empty `(a, b)` range per coordinate, in either
    /// order.
    pub fn new(ranges: Vec<(f64, f64)>) -> Result<Self> {
        non_empty(ranges.len())?;
        if ranges.iter().any(|(a, b)| !a.is_finite() || !b.is_finite()) {
            return Err(invalid("float ranges must be finite"));
        }
        let ranges: Vec<_> = ranges.into_iter().map(|(a, b)| (a.min(b), a.max(b))).collect();
        if let Some((min, max)) = ranges.iter().find(|(min, max)| min >= max) {
            return Err(invalid(format!("degenerate float range {min}..={max}")));
        }
        Ok(Self { ranges })
    }
}

impl SeedGenerator for UniformFloatVector {
    fn generate_seed(&self, rng: &mut dyn RngCore) -> Vec<Coordinate> {
        self.ranges
            .iter()
            .map(|&(min, max)| Coordinate::float(rng.random_range(min..=max)))
            .collect()
    }

    fn length(&self) -> usize {
        self.ranges.len()
    }

    fn domain(&self) -> Result<Domain> {
        let (min, max) = homogeneous(&self.ranges)?;
        if min < max {
            Ok(Domain::Float { min, max })
        } else {
            Err(LandscapeError::Domain(format!("degenerate float range {min}..={max}")))
        }
    }
}

/// Uniform fraction vectors on a grid: coordinate `i` is
/// `min_i + k * increment_i` for a uniform `k` with the result `<= max_i`.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformFractionVector {
    ranges: Vec<(BigRational, BigRational)>,
    increments: Vec<BigRational>,
    steps: Vec<u64>,
}

impl UniformFractionVector {
    /// One `(a, b)` range and one positive increment per coordinate.
    pub fn new(ranges: Vec<(BigRational, BigRational)>, increments: Vec<BigRational>) -> Result<Self> {
        non_empty(ranges.len())?;
        if ranges.len() != increments.len() {
            return Err(invalid(format!(
                "{} ranges but {} increments",
                ranges.len(),
                increments.len()
            )));
        }
        let ranges: Vec<_> = ranges
            .into_iter()
            .map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
            .collect();
        let mut steps = Vec::with_capacity(ranges.len());
        for ((min, max), inc) in ranges.iter().zip(&increments) {
            if !inc.is_positive() {
                return Err(invalid(format!("increment {inc} must be positive")));
            }
            let count = ((max - min) / inc).floor().to_integer();
            steps.push(
                count
                    .to_u64()
                    .ok_or_else(|| invalid(format!("too many steps of {inc} in range")))?,
            );
        }
        Ok(Self {
            ranges,
            increments,
            steps,
        })
    }
}

impl SeedGenerator for UniformFractionVector {
    fn generate_seed(&self, rng: &mut dyn RngCore) -> Vec<Coordinate> {
        self.ranges
            .iter()
            .zip(&self.increments)
            .zip(&self.steps)
            .map(|(((min, _), inc), &steps)| {
                let k = BigRational::from_integer(rng.random_range(0..=steps).into());
                Coordinate::Number(Number::Fraction(min + k * inc))
            })
            .collect()
    }

    fn length(&self) -> usize {
        self.ranges.len()
    }

    fn domain(&self) -> Result<Domain> {
        let (min, max) = homogeneous(&self.ranges)?;
        let increment = homogeneous(&self.increments)?;
        if min >= max {
            return Err(LandscapeError::Domain(format!(
                "degenerate fraction range {min}..={max}"
            )));
        }
        Ok(Domain::Fraction {
            min,
            max,
            increment: Some(increment),
        })
    }

    fn size(&self) -> Option<u128> {
        self.steps
            .iter()
            .try_fold(1u128, |acc, &s| acc.checked_mul(u128::from(s) + 1))
    }
}

/// Uniform permutations of a fixed alphabet.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformPermutation {
    symbols: Vec<Coordinate>,
}

impl UniformPermutation {
    /// Permutations of `symbols`, which must be distinct.
    pub fn new(symbols: Vec<Coordinate>) -> Result<Self> {
        Domain::permutation(symbols.clone())
            .map_err(|e| invalid(format!("permutation alphabet: {e}")))?;
        Ok(Self { symbols })
    }

    /// Permutations of the integers `0..n`.
    pub fn of_len(n: usize) -> Self {
        Self {
            symbols: (0..n as i64).map(Coordinate::int).collect(),
        }
    }
}

impl SeedGenerator for UniformPermutation {
    fn generate_seed(&self, rng: &mut dyn RngCore) -> Vec<Coordinate> {
        let mut seed = self.symbols.clone();
        shuffle(&mut seed, rng);
        seed
    }

    fn length(&self) -> usize {
        self.symbols.len()
    }

    fn domain(&self) -> Result<Domain> {
        Domain::permutation(self.symbols.clone())
    }

    fn size(&self) -> Option<u128> {
        (1..=self.symbols.len() as u128).try_fold(1u128, |acc, k| acc.checked_mul(k))
    }
}

/// Declarative description of a seed space, as found in generator
/// configuration files.
///
/// ```yaml
/// space: { kind: permutation, length: 8 }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum SeedSpace {
    /// Bit strings.
    BitString {
        /// Bits per seed.
        length: usize,
    },
    /// Integer vectors, every coordinate in `[min, max]`.
    IntVector {
        /// Coordinates per seed.
        length: usize,
        /// Lower bound.
        min: i64,
        /// Upper bound.
        max: i64,
    },
    /// Float vectors, every coordinate in `[min, max]`.
    FloatVector {
        /// Coordinates per seed.
        length: usize,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// Exact fraction vectors on a grid of `increment`.
    FractionVector {
        /// Coordinates per seed.
        length: usize,
        /// Lower bound.
        min: Number,
        /// Upper bound.
        max: Number,
        /// Grid step.
        increment: Number,
    },
    /// Permutations of `0..length`.
    Permutation {
        /// Items per permutation.
        length: usize,
    },
    /// Permutations of an explicit alphabet.
    SymbolPermutation {
        /// Distinct items.
        symbols: Vec<Coordinate>,
    },
}

impl Default for SeedSpace {
    fn default() -> Self {
        SeedSpace::BitString { length: 16 }
    }
}

fn exact(value: &Number, what: &str) -> Result<BigRational> {
    value
        .to_rational()
        .ok_or_else(|| invalid(format!("fraction space {what} {value} is not exact")))
}

impl SeedSpace {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            SeedSpace::BitString { .. } => "bit_string",
            SeedSpace::IntVector { .. } => "int_vector",
            SeedSpace::FloatVector { .. } => "float_vector",
            SeedSpace::FractionVector { .. } => "fraction_vector",
            SeedSpace::Permutation { .. } => "permutation",
            SeedSpace::SymbolPermutation { .. } => "symbol_permutation",
        }
    }

    /// Builds the generator this space describes.
    pub fn generator(&self) -> Result<Box<dyn SeedGenerator>> {
        Ok(match self {
            SeedSpace::BitString { length } => Box::new(UniformBitString::new(*length)?),
            SeedSpace::IntVector { length, min, max } => {
                Box::new(UniformIntVector::new(vec![(*min, *max); *length])?)
            }
            SeedSpace::FloatVector { length, min, max } => {
                Box::new(UniformFloatVector::new(vec![(*min, *max); *length])?)
            }
            SeedSpace::FractionVector {
                length,
                min,
                max,
                increment,
            } => {
                let range = (exact(min, "minimum")?, exact(max, "maximum")?);
                let increment = exact(increment, "increment")?;
                Box::new(UniformFractionVector::new(
                    vec![range; *length],
                    vec![increment; *length],
                )?)
            }
            SeedSpace::Permutation { length } => {
                non_empty(*length)?;
                Box::new(UniformPermutation::of_len(*length))
            }
            SeedSpace::SymbolPermutation { symbols } => {
                Box::new(UniformPermutation::new(symbols.clone())?)
            }
        })
    }

    /// Space matching a loaded problem's domain and point length.
    ///
    /// # Errors
    /// [`LandscapeError::Domain`] for a fraction domain without an
    /// increment, or a permutation alphabet whose size is not `length`.
    pub fn for_domain(domain: &Domain, length: usize) -> Result<Self> {
        Ok(match domain {
            Domain::Bit => SeedSpace::BitString { length },
            Domain::Int { min, max } => SeedSpace::IntVector {
                length,
                min: *min,
                max: *max,
            },
            Domain::Float { min, max } => SeedSpace::FloatVector {
                length,
                min: *min,
                max: *max,
            },
            Domain::Fraction {
                min,
                max,
                increment: Some(increment),
            } => SeedSpace::FractionVector {
                length,
                min: Number::Fraction(min.clone()),
                max: Number::Fraction(max.clone()),
                increment: Number::Fraction(increment.clone()),
            },
            Domain::Fraction { increment: None, .. } => {
                return Err(LandscapeError::Domain(
                    "no seed generator for a fraction domain without increment".into(),
                ))
            }
            Domain::Permutation(symbols) => {
                if symbols.len() != length {
                    return Err(LandscapeError::Domain(format!(
                        "permutation of {} items with point length {length}",
                        symbols.len()
                    )));
                }
                let is_range = symbols
                    .iter()
                    .enumerate()
                    .all(|(i, s)| *s == Coordinate::int(i as i64));
                if is_range {
                    SeedSpace::Permutation { length }
                } else {
                    SeedSpace::SymbolPermutation {
                        symbols: symbols.clone(),
                    }
                }
            }
        })
    }
}

/// Generator drawing fresh points from the same space as `problem`.
pub fn seed_generator_for(problem: &SeededMetricProblem) -> Result<Box<dyn SeedGenerator>> {
    SeedSpace::for_domain(problem.domain(), problem.length())?.generator()
}
