//! The [`Metric`] enum and its distance functions.

use super::kendall::kendall_tau_inversions;
use crate::error::{LandscapeError, Result};
use crate::numeric::{numeric_coordinates, Coordinate, Number, NumberKind};
use num_bigint::BigInt;
use num_rational::BigRational;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A distance function over points of equal length.
///
/// Every variant is symmetric and zero for equal points. Each round-trips
/// through its canonical token (see [`fmt::Display`] and [`FromStr`]),
/// which is how metrics are stored in problem files.
///
/// | Variant | Token | Result kind |
/// |---|---|---|
/// | `Hamming` | `metric hamming` | `Int` |
/// | `Manhattan` | `metric manhattan` | coordinate kind |
/// | `Euclidean` | `metric euclidean` | `Float` |
/// | `PNorm(p)` | `metric pnorm <p>` | `Float` |
/// | `Maximum` | `metric maximum` | coordinate kind |
/// | `KendallTau { normalised: false }` | `metric kendalltau` | `Int` |
/// | `KendallTau { normalised: true }` | `metric kendalltau normalised` | `Fraction` |
///
/// # Examples
///
/// ```
/// use u_landscape::metric::Metric;
/// use u_landscape::numeric::{int_point, Number};
///
/// let metric: Metric = "metric hamming".parse().unwrap();
/// let d = metric.distance(&int_point(&[0, 1, 1]), &int_point(&[1, 0, 1])).unwrap();
/// assert_eq!(d, Number::Int(2));
/// assert_eq!(metric.to_string(), "metric hamming");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum Metric {
    /// Number of differing bits; coordinates must be 0 or 1.
    #[default]
    Hamming,
    /// Sum of absolute coordinate differences.
    Manhattan,
    /// Square root of the sum of squared differences.
    Euclidean,
    /// General p-norm with a positive exponent (integer, float or fraction).
    PNorm(Number),
    /// Largest absolute coordinate difference (Chebyshev).
    Maximum,
    /// Kendall-tau rank distance between permutations.
    KendallTau {
        /// Divide the discordant-pair count by `C(n, 2)`.
        normalised: bool,
    },
}

impl Metric {
    /// Normalised Kendall-tau distance.
    pub fn kendall_tau() -> Self {
        Metric::KendallTau { normalised: true }
    }

    /// p-norm metric, validating `p > 0`.
    pub fn pnorm(p: Number) -> Result<Self> {
        if p.numeric_cmp(&Number::Int(0)) != Some(Ordering::Greater) {
            return Err(LandscapeError::InvalidParameter(format!(
                "pnorm exponent must be positive, got {p}"
            )));
        }
        Ok(Metric::PNorm(p))
    }

    /// Short name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Hamming => "hamming",
            Metric::Manhattan => "manhattan",
            Metric::Euclidean => "euclidean",
            Metric::PNorm(_) => "pnorm",
            Metric::Maximum => "maximum",
            Metric::KendallTau { .. } => "kendalltau",
        }
    }

    /// Whether the metric operates on permutations.
    pub fn is_permutation_metric(&self) -> bool {
        matches!(self, Metric::KendallTau { .. })
    }

    /// Distance between two points.
    ///
    /// # Errors
    ///
    /// - [`LandscapeError::DimensionMismatch`] if the lengths differ.
    /// - [`LandscapeError::TypeMismatch`] for non-bit Hamming coordinates,
    ///   symbols in a numeric metric, mixed kinds within one point, or
    ///   points that are not permutations of each other (Kendall-tau).
    pub fn distance(&self, a: &[Coordinate], b: &[Coordinate]) -> Result<Number> {
        if a.len() != b.len() {
            return Err(LandscapeError::DimensionMismatch {
                left: a.len(),
                right: b.len(),
            });
        }
        match self {
            Metric::Hamming => hamming(a, b),
            Metric::Manhattan => {
                let diffs = abs_differences(a, b)?;
                let kind = diffs.first().map(Number::kind).unwrap_or(NumberKind::Int);
                Ok(diffs
                    .iter()
                    .fold(Number::zero(kind), |acc, d| &acc + d))
            }
            Metric::Euclidean => {
                let diffs = abs_differences(a, b)?;
                let squares = diffs
                    .iter()
                    .fold(Number::Int(0), |acc, d| &acc + &(d * d));
                Ok(squares.sqrt())
            }
            Metric::PNorm(p) => {
                let diffs = abs_differences(a, b)?;
                let p = p.to_f64();
                let sum: f64 = diffs.iter().map(|d| d.to_f64().powf(p)).sum();
                Ok(Number::Float(sum.powf(1.0 / p)))
            }
            Metric::Maximum => {
                let diffs = abs_differences(a, b)?;
                Ok(Number::max_of(&diffs)
                    .cloned()
                    .unwrap_or(Number::Int(0)))
            }
            Metric::KendallTau { normalised } => {
                let inversions = kendall_tau_inversions(a, b)?;
                if !normalised {
                    return Ok(Number::Int(inversions as i64));
                }
                let n = a.len() as u64;
                let pairs = n * n.saturating_sub(1) / 2;
                if pairs == 0 {
                    return Ok(Number::fraction(0, 1));
                }
                Ok(Number::Fraction(BigRational::new(
                    BigInt::from(inversions),
                    BigInt::from(pairs),
                )))
            }
        }
    }
}

fn hamming(a: &[Coordinate], b: &[Coordinate]) -> Result<Number> {
    let bit = |c: &Coordinate| match c {
        Coordinate::Number(Number::Int(0)) => Ok(false),
        Coordinate::Number(Number::Int(1)) => Ok(true),
        other => Err(LandscapeError::TypeMismatch(format!(
            "hamming distance needs bit strings, found {other}"
        ))),
    };
    let mut dist = 0i64;
    for (x, y) in a.iter().zip(b) {
        if bit(x)? != bit(y)? {
            dist += 1;
        }
    }
    Ok(Number::Int(dist))
}

fn abs_differences(a: &[Coordinate], b: &[Coordinate]) -> Result<Vec<Number>> {
    let (xs, _) = numeric_coordinates(a)?;
    let (ys, _) = numeric_coordinates(b)?;
    Ok(xs.iter().zip(&ys).map(|(x, y)| (*x - *y).abs()).collect())
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::PNorm(p) => write!(f, "metric pnorm {p}"),
            Metric::KendallTau { normalised: true } => write!(f, "metric kendalltau normalised"),
            other => write!(f, "metric {}", other.name()),
        }
    }
}

impl FromStr for Metric {
    type Err = LandscapeError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || LandscapeError::format(format!("invalid metric: \"{}\"", s.trim()));
        let tokens: Vec<&str> = s.split_whitespace().collect();
        match tokens.as_slice() {
            ["metric", "hamming"] => Ok(Metric::Hamming),
            ["metric", "manhattan"] => Ok(Metric::Manhattan),
            ["metric", "euclidean"] => Ok(Metric::Euclidean),
            ["metric", "maximum"] => Ok(Metric::Maximum),
            ["metric", "kendalltau"] => Ok(Metric::KendallTau { normalised: false }),
            ["metric", "kendalltau", "normalised"] => Ok(Metric::KendallTau { normalised: true }),
            ["metric", "pnorm", p] => {
                let p = Number::parse_token(p).ok_or_else(invalid)?;
                Metric::pnorm(p).map_err(|_| invalid())
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Metric {
    type Error = LandscapeError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Metric> for String {
    fn from(m: Metric) -> Self {
        m.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::int_point;

    fn floats(v: &[f64]) -> Vec<Coordinate> {
        v.iter().map(|&x| Coordinate::float(x)).collect()
    }

    fn fractions(v: &[(i64, i64)]) -> Vec<Coordinate> {
        v.iter()
            .map(|&(n, d)| Coordinate::Number(Number::fraction(n, d)))
            .collect()
    }

    #[test]
    fn test_hamming() {
        let d = Metric::Hamming
            .distance(&int_point(&[0, 1, 1]), &int_point(&[1, 0, 1]))
            .unwrap();
        assert_eq!(d, Number::Int(2));
    }

    #[test]
    fn test_hamming_rejects_non_bits() {
        let r = Metric::Hamming.distance(&int_point(&[0, 2]), &int_point(&[0, 1]));
        assert!(matches!(r, Err(LandscapeError::TypeMismatch(_))));
    }

    #[test]
    fn test_length_mismatch() {
        for m in [
            Metric::Hamming,
            Metric::Manhattan,
            Metric::Euclidean,
            Metric::Maximum,
            Metric::kendall_tau(),
        ] {
            let r = m.distance(&int_point(&[0, 1]), &int_point(&[0, 1, 1]));
            assert!(
                matches!(r, Err(LandscapeError::DimensionMismatch { left: 2, right: 3 })),
                "{m}"
            );
        }
    }

    #[test]
    fn test_manhattan_follows_kind() {
        let d = Metric::Manhattan
            .distance(&int_point(&[5, 42, 16, 9]), &int_point(&[1, 10, 100, 50]))
            .unwrap();
        assert_eq!(d, Number::Int(4 + 32 + 84 + 41));

        let d = Metric::Manhattan
            .distance(&floats(&[1.0, 6.0]), &floats(&[-2.0, 2.0]))
            .unwrap();
        assert_eq!(d, Number::Float(7.0));

        let d = Metric::Manhattan
            .distance(&fractions(&[(1, 2), (1, 3)]), &fractions(&[(0, 1), (1, 1)]))
            .unwrap();
        assert_eq!(d, Number::fraction(7, 6));
    }

    #[test]
    fn test_manhattan_rejects_mixed_point() {
        let a = vec![Coordinate::int(1), Coordinate::float(2.0)];
        let b = vec![Coordinate::int(1), Coordinate::float(1.0)];
        assert!(matches!(
            Metric::Manhattan.distance(&a, &b),
            Err(LandscapeError::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_euclidean() {
        let d = Metric::Euclidean
            .distance(&floats(&[1.0, 6.0]), &floats(&[-2.0, 2.0]))
            .unwrap();
        assert_eq!(d, Number::Float(5.0));
        let d = Metric::Euclidean
            .distance(&int_point(&[0, 0]), &int_point(&[3, 4]))
            .unwrap();
        assert_eq!(d, Number::Float(5.0));
    }

    #[test]
    fn test_pnorm() {
        let m = Metric::pnorm(Number::Int(2)).unwrap();
        let d = m.distance(&floats(&[1.0, 6.0]), &floats(&[-2.0, 2.0])).unwrap();
        assert!((d.to_f64() - 5.0).abs() < 1e-12);

        let m = Metric::pnorm(Number::Int(1)).unwrap();
        let d = m
            .distance(&floats(&[5.0, 42.0, 16.0, 9.0]), &floats(&[1.0, 10.0, 100.0, 50.0]))
            .unwrap();
        assert!((d.to_f64() - 161.0).abs() < 1e-9);

        let m = Metric::pnorm(Number::fraction(2, 3)).unwrap();
        let d = m
            .distance(&floats(&[10.0, 15.0]), &floats(&[52.0, 100.0]))
            .unwrap();
        let expected = (42f64.powf(2.0 / 3.0) + 85f64.powf(2.0 / 3.0)).powf(1.5);
        assert!((d.to_f64() - expected).abs() < 1e-9);
        assert_eq!(d.kind(), NumberKind::Float);
    }

    #[test]
    fn test_pnorm_rejects_non_positive() {
        assert!(Metric::pnorm(Number::Int(0)).is_err());
        assert!(Metric::pnorm(Number::Float(-1.5)).is_err());
    }

    #[test]
    fn test_maximum() {
        let d = Metric::Maximum
            .distance(&int_point(&[1, 6]), &int_point(&[-2, 2]))
            .unwrap();
        assert_eq!(d, Number::Int(4));
    }

    #[test]
    fn test_kendall_tau_normalised() {
        let a = int_point(&[0, 1, 2, 3]);
        let r = int_point(&[3, 2, 1, 0]);
        let m = Metric::kendall_tau();
        assert!(m.distance(&a, &a).unwrap().is_zero());
        assert_eq!(m.distance(&a, &r).unwrap(), Number::fraction(1, 1));
        let b = int_point(&[2, 3, 0, 1]);
        assert_eq!(m.distance(&a, &b).unwrap(), Number::fraction(4, 6));
    }

    #[test]
    fn test_kendall_tau_raw_count() {
        let m = Metric::KendallTau { normalised: false };
        let d = m
            .distance(&int_point(&[0, 1, 2, 3, 4]), &int_point(&[2, 3, 0, 1, 4]))
            .unwrap();
        assert_eq!(d, Number::Int(4));
    }

    #[test]
    fn test_kendall_tau_single_element() {
        let m = Metric::kendall_tau();
        let d = m.distance(&int_point(&[0]), &int_point(&[0])).unwrap();
        assert!(d.is_zero());
    }

    #[test]
    fn test_token_round_trip() {
        for m in [
            Metric::Hamming,
            Metric::Manhattan,
            Metric::Euclidean,
            Metric::Maximum,
            Metric::KendallTau { normalised: false },
            Metric::kendall_tau(),
            Metric::PNorm(Number::Int(2)),
            Metric::PNorm(Number::Float(2.5)),
            Metric::PNorm(Number::fraction(2, 3)),
        ] {
            let s = m.to_string();
            assert_eq!(s.parse::<Metric>().unwrap(), m, "{s}");
        }
        assert_eq!(
            Metric::PNorm(Number::fraction(2, 3)).to_string(),
            "metric pnorm 2/3"
        );
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        let m: Metric = "  metric   kendalltau\tnormalised \n".parse().unwrap();
        assert_eq!(m, Metric::kendall_tau());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for s in [
            "",
            "metric",
            "hamming",
            "metric chebyshev",
            "metric kendalltau yes",
            "metric pnorm",
            "metric pnorm x",
            "metric pnorm 0",
            "metric hamming extra",
        ] {
            let r = s.parse::<Metric>();
            assert!(r.map_err(|e| e.is_format()).unwrap_err(), "{s:?}");
        }
    }
}
