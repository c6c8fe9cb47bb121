//! Seed fitness assignment from a spanning tree.
//!
//! Random assigners ignore the tree and give an unstructured landscape.
//! Depth assigners run a breadth-first search from a selected source
//! vertex, so fitness improves monotonically along every tree path towards
//! the source and the source is the unique optimum.

use super::selectors::VertexSelector;
use super::types::{breadth_first_depths, FitnessAssignment, SpanningTree};
use crate::error::{LandscapeError, Result};
use crate::numeric::Number;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive};
use rand::Rng;
use tracing::debug;

/// Strategy for assigning fitness values to the vertices of a tree.
///
/// # Examples
///
/// ```
/// use u_landscape::numeric::Number;
/// use u_landscape::random::create_rng;
/// use u_landscape::tree::{SpanningTree, TreeFitnessAssigner, VertexSelector};
///
/// let path = SpanningTree::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
/// let assigner = TreeFitnessAssigner::IntDepth {
///     vertex: VertexSelector::forced(0),
/// };
/// let a = assigner.assign(&path, false, &mut create_rng(42)).unwrap();
/// assert_eq!(a.fitnesses, vec![Number::Int(3), Number::Int(2), Number::Int(1), Number::Int(0)]);
/// assert_eq!(a.optimum, 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum TreeFitnessAssigner {
    /// Independent uniform floats in `[min, max)`; constant if equal.
    RandomFloat {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// Independent uniform integers in `[min, max]`.
    RandomInt {
        /// Lower bound.
        min: i64,
        /// Upper bound, inclusive.
        max: i64,
    },
    /// Independent uniform fractions `min + k * increment`, with `k` drawn
    /// from `0..=floor((max - min) / increment)`.
    RandomFraction {
        /// Exact lower bound.
        min: Number,
        /// Exact upper bound.
        max: Number,
        /// Exact positive step.
        increment: Number,
    },
    /// Integer depth from a selected source vertex.
    IntDepth {
        /// Chooses the source vertex.
        #[cfg_attr(feature = "serde", serde(default))]
        vertex: VertexSelector,
    },
    /// Depth from a selected source rescaled into `[min, max]` as exact
    /// fractions.
    FractionDepth {
        /// Chooses the source vertex.
        #[cfg_attr(feature = "serde", serde(default))]
        vertex: VertexSelector,
        /// Exact lower bound.
        min: Number,
        /// Exact upper bound, greater than `min`.
        max: Number,
    },
}

impl Default for TreeFitnessAssigner {
    fn default() -> Self {
        TreeFitnessAssigner::IntDepth {
            vertex: VertexSelector::default(),
        }
    }
}

fn exact(value: &Number, what: &str) -> Result<BigRational> {
    value.to_rational().ok_or_else(|| {
        LandscapeError::InvalidParameter(format!("{what} must be an int or fraction, got {value}"))
    })
}

impl TreeFitnessAssigner {
    /// Short name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            TreeFitnessAssigner::RandomFloat { .. } => "random float",
            TreeFitnessAssigner::RandomInt { .. } => "random int",
            TreeFitnessAssigner::RandomFraction { .. } => "random fraction",
            TreeFitnessAssigner::IntDepth { .. } => "int depth",
            TreeFitnessAssigner::FractionDepth { .. } => "fraction depth",
        }
    }

    /// Vertex selector of a depth assigner.
    pub fn vertex_selector(&self) -> Option<&VertexSelector> {
        match self {
            TreeFitnessAssigner::IntDepth { vertex }
            | TreeFitnessAssigner::FractionDepth { vertex, .. } => Some(vertex),
            _ => None,
        }
    }

    /// Returns a copy with the vertex selector replaced. Random assigners
    /// have no selector and are returned unchanged.
    pub fn with_vertex_selector(mut self, selector: VertexSelector) -> Self {
        match &mut self {
            TreeFitnessAssigner::IntDepth { vertex }
            | TreeFitnessAssigner::FractionDepth { vertex, .. } => *vertex = selector,
            _ => {}
        }
        self
    }

    /// Checks the range parameters.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(LandscapeError::InvalidParameter(msg));
        match self {
            TreeFitnessAssigner::RandomFloat { min, max } => {
                if !min.is_finite() || !max.is_finite() || max < min {
                    return invalid(format!("random float range [{min}, {max}) is invalid"));
                }
            }
            TreeFitnessAssigner::RandomInt { min, max } => {
                if max < min {
                    return invalid(format!("random int range [{min}, {max}] is empty"));
                }
            }
            TreeFitnessAssigner::RandomFraction {
                min,
                max,
                increment,
            } => {
                let (lo, hi) = (exact(min, "minimum")?, exact(max, "maximum")?);
                let inc = exact(increment, "increment")?;
                if !inc.is_positive() {
                    return invalid(format!("increment {increment} must be positive"));
                }
                if hi < lo {
                    return invalid(format!("random fraction range [{min}, {max}] is empty"));
                }
            }
            TreeFitnessAssigner::IntDepth { .. } => {}
            TreeFitnessAssigner::FractionDepth { min, max, .. } => {
                if exact(max, "maximum")? <= exact(min, "minimum")? {
                    return invalid(format!("fraction depth needs max > min, got [{min}, {max}]"));
                }
            }
        }
        Ok(())
    }

    /// Assigns a fitness to every vertex of `tree`.
    ///
    /// Random assigners designate the first best value as the optimum;
    /// depth assigners designate the source vertex, which attains the best
    /// value under either objective.
    pub fn assign<R: Rng>(
        &self,
        tree: &SpanningTree,
        minimise: bool,
        rng: &mut R,
    ) -> Result<FitnessAssignment> {
        self.validate()?;
        let n = tree.num_vertices();
        let assignment = match self {
            TreeFitnessAssigner::RandomFloat { min, max } => {
                let fitnesses: Vec<Number> = (0..n)
                    .map(|_| {
                        if min == max {
                            Number::Float(*min)
                        } else {
                            Number::Float(rng.random_range(*min..*max))
                        }
                    })
                    .collect();
                best_of(fitnesses, minimise)
            }
            TreeFitnessAssigner::RandomInt { min, max } => {
                let fitnesses = (0..n)
                    .map(|_| Number::Int(rng.random_range(*min..=*max)))
                    .collect();
                best_of(fitnesses, minimise)
            }
            TreeFitnessAssigner::RandomFraction {
                min,
                max,
                increment,
            } => {
                let lo = exact(min, "minimum")?;
                let inc = exact(increment, "increment")?;
                let steps = ((exact(max, "maximum")? - &lo) / &inc)
                    .floor()
                    .to_integer()
                    .to_u64()
                    .ok_or_else(|| {
                        LandscapeError::InvalidParameter(format!(
                            "too many {increment} steps between {min} and {max}"
                        ))
                    })?;
                let fitnesses = (0..n)
                    .map(|_| {
                        let k = BigInt::from(rng.random_range(0..=steps));
                        Number::Fraction(&lo + &inc * BigRational::from_integer(k))
                    })
                    .collect();
                best_of(fitnesses, minimise)
            }
            TreeFitnessAssigner::IntDepth { vertex } => {
                let (source, depths) = source_depths(tree, vertex, rng)?;
                let max_depth = depths.iter().copied().max().unwrap_or(0);
                let fitnesses = depths
                    .iter()
                    .map(|&d| {
                        let d = if minimise { d } else { max_depth - d };
                        Number::Int(d as i64)
                    })
                    .collect();
                FitnessAssignment {
                    fitnesses,
                    optimum: source,
                }
            }
            TreeFitnessAssigner::FractionDepth { vertex, min, max } => {
                let (source, depths) = source_depths(tree, vertex, rng)?;
                let lo = exact(min, "minimum")?;
                let range = exact(max, "maximum")? - &lo;
                let max_depth = depths.iter().copied().max().unwrap_or(0);
                let scaled: Vec<BigRational> = depths
                    .iter()
                    .map(|&d| {
                        if max_depth == 0 {
                            lo.clone()
                        } else {
                            &lo + &range * BigRational::new(BigInt::from(d), BigInt::from(max_depth))
                        }
                    })
                    .collect();
                let values = if minimise {
                    scaled
                } else {
                    mirror(scaled)
                };
                FitnessAssignment {
                    fitnesses: values.into_iter().map(Number::Fraction).collect(),
                    optimum: source,
                }
            }
        };
        debug!(
            assigner = self.name(),
            vertices = n,
            optimum = assignment.optimum,
            minimise,
            "assigned fitnesses"
        );
        Ok(assignment)
    }
}

/// Maps each value `v` to `lo + ((hi - lo) - (v - lo))`, flipping the
/// order while keeping the same extremes.
fn mirror(values: Vec<BigRational>) -> Vec<BigRational> {
    let (Some(lo), Some(hi)) = (values.iter().min().cloned(), values.iter().max().cloned()) else {
        return values;
    };
    let range = &hi - &lo;
    values
        .into_iter()
        .map(|v| &lo + (&range - (v - &lo)))
        .collect()
}

fn source_depths<R: Rng>(
    tree: &SpanningTree,
    vertex: &VertexSelector,
    rng: &mut R,
) -> Result<(usize, Vec<usize>)> {
    let source = vertex.select_index(tree, rng)?;
    let depths = breadth_first_depths(&tree.adjacency(), source)
        .into_iter()
        .collect::<Option<Vec<usize>>>()
        .ok_or_else(|| {
            LandscapeError::InvalidParameter("spanning tree is not connected".to_string())
        })?;
    Ok((source, depths))
}

fn best_of(fitnesses: Vec<Number>, minimise: bool) -> FitnessAssignment {
    let optimum = best_index(&fitnesses, minimise).unwrap_or(0);
    FitnessAssignment { fitnesses, optimum }
}

/// Index of the first best value under the objective.
pub(crate) fn best_index(values: &[Number], minimise: bool) -> Option<usize> {
    let best = if minimise {
        Number::min_of(values)?
    } else {
        Number::max_of(values)?
    };
    values.iter().position(|v| std::ptr::eq(v, best))
}
