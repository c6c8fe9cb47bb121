//! Point coordinates: numbers or permutation symbols.

use super::number::{Number, NumberKind};
use crate::error::{LandscapeError, Result};
use std::cmp::Ordering;
use std::fmt;

/// One coordinate of a point.
///
/// Bit strings, integer, float and fraction vectors use
/// [`Coordinate::Number`]; permutations may use numbers or quoted
/// [`Coordinate::Symbol`]s.
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinate {
    /// Numeric coordinate.
    Number(Number),
    /// Named symbol from a permutation alphabet.
    Symbol(String),
}

/// A point in the search space.
pub type Point = Vec<Coordinate>;

impl Coordinate {
    /// Shorthand for an integer coordinate.
    pub fn int(v: i64) -> Self {
        Coordinate::Number(Number::Int(v))
    }

    /// Shorthand for a float coordinate.
    pub fn float(v: f64) -> Self {
        Coordinate::Number(Number::Float(v))
    }

    /// Shorthand for a symbol coordinate.
    pub fn symbol(s: impl Into<String>) -> Self {
        Coordinate::Symbol(s.into())
    }

    /// Numeric value, if any.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Coordinate::Number(n) => Some(n),
            Coordinate::Symbol(_) => None,
        }
    }

    /// Numeric kind, `None` for symbols.
    pub fn kind(&self) -> Option<NumberKind> {
        self.as_number().map(Number::kind)
    }

    /// Canonical token: numbers as [`Number::token`], symbols quoted.
    ///
    /// Symbols are single-quoted unless they contain a single quote.
    pub fn token(&self) -> String {
        match self {
            Coordinate::Number(n) => n.token(),
            Coordinate::Symbol(s) if s.contains('\'') => format!("\"{s}\""),
            Coordinate::Symbol(s) => format!("'{s}'"),
        }
    }

    /// Parses a token: `'x'`/`"x"` is a symbol, otherwise a number.
    pub fn parse_token(token: &str) -> Option<Coordinate> {
        let token = token.trim();
        for quote in ['\'', '"'] {
            if token.len() >= 2 && token.starts_with(quote) && token.ends_with(quote) {
                return Some(Coordinate::Symbol(token[1..token.len() - 1].to_string()));
            }
        }
        Number::parse_token(token).map(Coordinate::Number)
    }

    /// Total order used for sorting alphabets: numbers (numerically) before
    /// symbols (lexicographically).
    pub fn sort_cmp(&self, other: &Coordinate) -> Ordering {
        match (self, other) {
            (Coordinate::Number(a), Coordinate::Number(b)) => {
                a.numeric_cmp(b).unwrap_or(Ordering::Equal)
            }
            (Coordinate::Number(_), Coordinate::Symbol(_)) => Ordering::Less,
            (Coordinate::Symbol(_), Coordinate::Number(_)) => Ordering::Greater,
            (Coordinate::Symbol(a), Coordinate::Symbol(b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

impl From<Number> for Coordinate {
    fn from(n: Number) -> Self {
        Coordinate::Number(n)
    }
}

impl From<i64> for Coordinate {
    fn from(v: i64) -> Self {
        Coordinate::int(v)
    }
}

impl From<f64> for Coordinate {
    fn from(v: f64) -> Self {
        Coordinate::float(v)
    }
}

impl From<&str> for Coordinate {
    fn from(s: &str) -> Self {
        Coordinate::symbol(s)
    }
}

/// Builds an integer point, handy for bit strings and tests.
pub fn int_point(values: &[i64]) -> Point {
    values.iter().map(|&v| Coordinate::int(v)).collect()
}

/// Numeric view of a point whose coordinates all share one kind.
///
/// Fails with [`LandscapeError::TypeMismatch`] on a symbol or on mixed
/// kinds within the point.
pub fn numeric_coordinates(point: &[Coordinate]) -> Result<(Vec<&Number>, Option<NumberKind>)> {
    let mut kind = None;
    let mut numbers = Vec::with_capacity(point.len());
    for c in point {
        let n = c.as_number().ok_or_else(|| {
            LandscapeError::TypeMismatch(format!("symbol {c} in a numeric point"))
        })?;
        match kind {
            None => kind = Some(n.kind()),
            Some(k) if k != n.kind() => {
                return Err(LandscapeError::TypeMismatch(format!(
                    "mixed coordinate kinds {k} and {} within one point",
                    n.kind()
                )))
            }
            Some(_) => {}
        }
        numbers.push(n);
    }
    Ok((numbers, kind))
}

/// Numbers serialise as [`Number`] does, symbols as their quoted token.
/// A string that is not a valid token reads back as a bare symbol.
#[cfg(feature = "serde")]
impl serde::Serialize for Coordinate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Coordinate::Number(n) => serde::Serialize::serialize(n, serializer),
            Coordinate::Symbol(_) => serializer.serialize_str(&self.token()),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Coordinate {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        struct CoordinateVisitor;

        impl serde::de::Visitor<'_> for CoordinateVisitor {
            type Value = Coordinate;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number or a symbol")
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> std::result::Result<Coordinate, E> {
                Ok(Coordinate::int(v))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> std::result::Result<Coordinate, E> {
                i64::try_from(v)
                    .map(Coordinate::int)
                    .map_err(|_| E::custom(format!("integer {v} out of range")))
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> std::result::Result<Coordinate, E> {
                Ok(Coordinate::float(v))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> std::result::Result<Coordinate, E> {
                Ok(Coordinate::parse_token(v).unwrap_or_else(|| Coordinate::symbol(v)))
            }
        }

        deserializer.deserialize_any(CoordinateVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_tokens() {
        assert_eq!(Coordinate::symbol("A").token(), "'A'");
        assert_eq!(Coordinate::symbol("it's").token(), "\"it's\"");
        assert_eq!(
            Coordinate::parse_token("'A'"),
            Some(Coordinate::symbol("A"))
        );
        assert_eq!(
            Coordinate::parse_token("\"B\""),
            Some(Coordinate::symbol("B"))
        );
    }

    #[test]
    fn test_numeric_tokens() {
        assert_eq!(Coordinate::parse_token("1"), Some(Coordinate::int(1)));
        assert_eq!(
            Coordinate::parse_token("1/3"),
            Some(Coordinate::Number(Number::fraction(1, 3)))
        );
        assert_eq!(Coordinate::parse_token("'"), None);
    }

    #[test]
    fn test_sort_cmp_numbers_before_symbols() {
        let mut v = vec![
            Coordinate::symbol("b"),
            Coordinate::int(3),
            Coordinate::symbol("a"),
            Coordinate::int(1),
        ];
        v.sort_by(|a, b| a.sort_cmp(b));
        assert_eq!(
            v,
            vec![
                Coordinate::int(1),
                Coordinate::int(3),
                Coordinate::symbol("a"),
                Coordinate::symbol("b"),
            ]
        );
    }

    #[test]
    fn test_numeric_coordinates_rejects_mixed() {
        let p = vec![Coordinate::int(1), Coordinate::float(1.0)];
        assert!(matches!(
            numeric_coordinates(&p),
            Err(LandscapeError::TypeMismatch(_))
        ));
        let q = int_point(&[1, 2, 3]);
        let (nums, kind) = numeric_coordinates(&q).unwrap();
        assert_eq!(nums.len(), 3);
        assert_eq!(kind, Some(NumberKind::Int));
    }
}
