//! Coordinate domains and fitness codomains.

use crate::error::{LandscapeError, Result};
use crate::numeric::{Coordinate, Number, NumberKind};
use num_rational::BigRational;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

/// The space every coordinate of a point is drawn from.
///
/// `Bit` is written as `int 0 1`, and `int 0 1` reads back as `Bit`.
#[derive(Debug, Clone, PartialEq)]
pub enum Domain {
    /// `{0, 1}`.
    Bit,
    /// Integers in `[min, max]`.
    Int {
        /// Lower bound.
        min: i64,
        /// Upper bound.
        max: i64,
    },
    /// Floats in `[min, max]`.
    Float {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// Exact fractions in `[min, max]`, optionally on a grid of `increment`.
    Fraction {
        /// Lower bound.
        min: BigRational,
        /// Upper bound.
        max: BigRational,
        /// Grid step.
        increment: Option<BigRational>,
    },
    /// Permutations of a finite alphabet, kept sorted.
    Permutation(Vec<Coordinate>),
}

fn domain_error(msg: impl Into<String>) -> LandscapeError {
    LandscapeError::Domain(msg.into())
}

fn number_token(token: &str) -> Result<Number> {
    Number::parse_token(token).ok_or_else(|| domain_error(format!("invalid number '{token}'")))
}

fn rational_token(token: &str) -> Result<BigRational> {
    number_token(token)?
        .to_kind(NumberKind::Fraction)
        .to_rational()
        .ok_or_else(|| domain_error(format!("'{token}' is not an exact value")))
}

impl Domain {
    /// Permutation domain over `symbols`, sorted, rejecting repeats.
    pub fn permutation(mut symbols: Vec<Coordinate>) -> Result<Self> {
        if symbols.is_empty() {
            return Err(domain_error("permutation domain needs at least one symbol"));
        }
        let mut seen = HashSet::with_capacity(symbols.len());
        for s in &symbols {
            if let Coordinate::Symbol(name) = s {
                if name.is_empty() || name.contains(char::is_whitespace) {
                    return Err(domain_error(format!(
                        "symbol {s} is empty or contains whitespace"
                    )));
                }
            }
            if !seen.insert(s.token()) {
                return Err(domain_error(format!("repeated item {s} in permutation")));
            }
        }
        symbols.sort_by(Coordinate::sort_cmp);
        Ok(Domain::Permutation(symbols))
    }

    /// Short kind name as used in problem files.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Domain::Bit | Domain::Int { .. } => "int",
            Domain::Float { .. } => "float",
            Domain::Fraction { .. } => "fraction",
            Domain::Permutation(_) => "permutation",
        }
    }

    /// Parses the tokens following `domain` in a problem file.
    ///
    /// Ranges need `min < max`.
    pub fn parse_tokens(tokens: &[&str]) -> Result<Self> {
        let range_error = || domain_error(format!("maximum <= minimum in '{}'", tokens.join(" ")));
        match tokens {
            ["permutation", symbols @ ..] => {
                let symbols = symbols
                    .iter()
                    .map(|t| {
                        Coordinate::parse_token(t)
                            .ok_or_else(|| domain_error(format!("invalid permutation item '{t}'")))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Domain::permutation(symbols)
            }
            ["int", min, max] => {
                let parse = |t: &str| {
                    t.parse::<i64>()
                        .map_err(|_| domain_error(format!("invalid integer '{t}'")))
                };
                let (min, max) = (parse(min)?, parse(max)?);
                match (min, max) {
                    (0, 1) => Ok(Domain::Bit),
                    _ if min < max => Ok(Domain::Int { min, max }),
                    _ => Err(range_error()),
                }
            }
            ["float", min, max] => {
                let (min, max) = (number_token(min)?.to_f64(), number_token(max)?.to_f64());
                if min < max {
                    Ok(Domain::Float { min, max })
                } else {
                    Err(range_error())
                }
            }
            ["fraction", min, max, increment @ ..] if increment.len() <= 1 => {
                let (min, max) = (rational_token(min)?, rational_token(max)?);
                if min >= max {
                    return Err(range_error());
                }
                let increment = match increment {
                    [inc] => Some(rational_token(inc)?),
                    _ => None,
                };
                Ok(Domain::Fraction {
                    min,
                    max,
                    increment,
                })
            }
            [kind, ..] => Err(domain_error(format!(
                "unknown or malformed domain '{kind}' in '{}'",
                tokens.join(" ")
            ))),
            [] => Err(domain_error("empty domain")),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frac = |v: &BigRational| format!("{}/{}", v.numer(), v.denom());
        match self {
            Domain::Bit => write!(f, "int 0 1"),
            Domain::Int { min, max } => write!(f, "int {min} {max}"),
            Domain::Float { min, max } => {
                write!(f, "float {} {}", Number::Float(*min), Number::Float(*max))
            }
            Domain::Fraction {
                min,
                max,
                increment,
            } => {
                write!(f, "fraction {} {}", frac(min), frac(max))?;
                if let Some(inc) = increment {
                    write!(f, " {}", frac(inc))?;
                }
                Ok(())
            }
            Domain::Permutation(symbols) => {
                write!(f, "permutation")?;
                for s in symbols {
                    write!(f, " {s}")?;
                }
                Ok(())
            }
        }
    }
}

/// The fitness range of a problem.
///
/// Both bounds share one kind; `min <= max`.
#[derive(Debug, Clone, PartialEq)]
pub struct Codomain {
    min: Number,
    max: Number,
}

impl Codomain {
    /// Creates a codomain, checking that the bounds share a kind and are
    /// ordered.
    pub fn new(min: Number, max: Number) -> Result<Self> {
        if min.kind() != max.kind() {
            return Err(domain_error(format!(
                "codomain bounds {min} and {max} are not the same kind"
            )));
        }
        if min.numeric_cmp(&max) == Some(Ordering::Greater) {
            return Err(domain_error(format!("codomain minimum {min} exceeds maximum {max}")));
        }
        Ok(Self { min, max })
    }

    /// `(min, max)` of a set of fitness values.
    pub fn of_values(values: &[Number]) -> Result<Self> {
        match (Number::min_of(values), Number::max_of(values)) {
            (Some(min), Some(max)) => Codomain::new(min.clone(), max.clone()),
            _ => Err(domain_error("codomain of no values")),
        }
    }

    /// Lower bound.
    pub fn min(&self) -> &Number {
        &self.min
    }

    /// Upper bound.
    pub fn max(&self) -> &Number {
        &self.max
    }

    /// Kind of both bounds.
    pub fn kind(&self) -> NumberKind {
        self.min.kind()
    }

    /// Parses the tokens following `codomain` in a problem file.
    ///
    /// Bounds are converted to the declared kind. Unlike domains, equal
    /// bounds are accepted since a generated landscape can be flat.
    pub fn parse_tokens(tokens: &[&str]) -> Result<Self> {
        let (kind, min, max) = match tokens {
            ["permutation", ..] => {
                return Err(domain_error("permutation not supported as codomain"));
            }
            [kind, min, max] => (*kind, number_token(min)?, number_token(max)?),
            _ => {
                return Err(domain_error(format!(
                    "malformed codomain '{}'",
                    tokens.join(" ")
                )))
            }
        };
        let kind = match kind {
            "int" => {
                if min.kind() != NumberKind::Int || max.kind() != NumberKind::Int {
                    return Err(domain_error(format!("int codomain with bounds {min} {max}")));
                }
                NumberKind::Int
            }
            "float" => NumberKind::Float,
            "fraction" => NumberKind::Fraction,
            other => return Err(domain_error(format!("unknown codomain kind '{other}'"))),
        };
        Codomain::new(min.to_kind(kind), max.to_kind(kind))
    }
}

impl fmt::Display for Codomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.kind(), self.min, self.max)
    }
}
