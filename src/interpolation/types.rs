//! The [`InterpolationMethod`] enum.

use crate::error::{LandscapeError, Result};
use crate::metric::Metric;
use crate::numeric::{Coordinate, Number};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Estimates the fitness of an arbitrary point from the seeds.
///
/// # Examples
///
/// ```
/// use u_landscape::interpolation::InterpolationMethod;
/// use u_landscape::metric::Metric;
/// use u_landscape::numeric::{int_point, Number};
///
/// let seeds = vec![int_point(&[1, 0, 0]), int_point(&[1, 0, 1]), int_point(&[0, 1, 1])];
/// let fitnesses = vec![Number::Int(5), Number::Int(7), Number::Int(11)];
///
/// let idw: InterpolationMethod = "interpolation inversedistanceweighting 1 2".parse().unwrap();
/// let f = idw.interpolate(&int_point(&[0, 0, 0]), &seeds, &fitnesses, &Metric::Hamming).unwrap();
/// // nearest two seeds at distances 1 and 2: (5/1 + 7/2) / (1/1 + 1/2)
/// assert_eq!(f, Number::fraction(17, 3));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum InterpolationMethod {
    /// Fitness of the closest seed; the earliest seed wins ties.
    NearestNeighbour,
    /// Inverse distance weighting, `Σ fᵢ/dᵢᵖ / Σ 1/dᵢᵖ`, optionally over the
    /// `n` nearest seeds only.
    ///
    /// The result stays exact while every fitness, distance and `p` is
    /// exact and each `dᵢᵖ` is exact (integer `p`).
    InverseDistanceWeighting {
        /// Distance exponent.
        p: Number,
        /// Number of nearest seeds used, at least 2; all seeds if `None`.
        n: Option<usize>,
    },
}

impl Default for InterpolationMethod {
    fn default() -> Self {
        InterpolationMethod::InverseDistanceWeighting {
            p: Number::Int(2),
            n: None,
        }
    }
}

impl InterpolationMethod {
    /// Inverse distance weighting, validating `n >= 2`.
    pub fn new_idw(p: Number, n: Option<usize>) -> Result<Self> {
        let method = InterpolationMethod::InverseDistanceWeighting { p, n };
        method.validate()?;
        Ok(method)
    }

    /// Checks `n >= 2` and a finite exponent.
    pub fn validate(&self) -> Result<()> {
        match self {
            InterpolationMethod::NearestNeighbour => Ok(()),
            InterpolationMethod::InverseDistanceWeighting { p, n } => {
                if !p.to_f64().is_finite() {
                    return Err(LandscapeError::InvalidParameter(format!(
                        "idw exponent must be finite, got {p}"
                    )));
                }
                match n {
                    Some(n) if *n < 2 => Err(LandscapeError::InvalidParameter(format!(
                        "idw needs n >= 2, got {n}"
                    ))),
                    _ => Ok(()),
                }
            }
        }
    }

    /// Minimum number of seeds [`interpolate`](Self::interpolate) accepts.
    pub fn required_seeds(&self) -> usize {
        match self {
            InterpolationMethod::NearestNeighbour => 1,
            InterpolationMethod::InverseDistanceWeighting { n, .. } => n.unwrap_or(2),
        }
    }

    /// Interpolated fitness of `candidate`.
    ///
    /// # Errors
    /// - [`LandscapeError::InsufficientSeeds`] with fewer seeds than
    ///   [`required_seeds`](Self::required_seeds).
    /// - [`LandscapeError::InvalidParameter`] if seeds and fitnesses are
    ///   not aligned.
    /// - Any error of [`Metric::distance`].
    pub fn interpolate(
        &self,
        candidate: &[Coordinate],
        seeds: &[Vec<Coordinate>],
        fitnesses: &[Number],
        metric: &Metric,
    ) -> Result<Number> {
        let required = self.required_seeds();
        if seeds.len() < required {
            return Err(LandscapeError::InsufficientSeeds {
                required,
                available: seeds.len(),
            });
        }
        if seeds.len() != fitnesses.len() {
            return Err(LandscapeError::InvalidParameter(format!(
                "{} seeds but {} fitnesses",
                seeds.len(),
                fitnesses.len()
            )));
        }
        match self {
            InterpolationMethod::NearestNeighbour => {
                let mut best: Option<(Number, usize)> = None;
                for (i, seed) in seeds.iter().enumerate() {
                    let d = metric.distance(candidate, seed)?;
                    let closer = match &best {
                        None => true,
                        Some((lowest, _)) => d.numeric_cmp(lowest) == Some(Ordering::Less),
                    };
                    if closer {
                        best = Some((d, i));
                    }
                }
                let index = best.map_or(0, |(_, i)| i);
                Ok(fitnesses[index].clone())
            }
            InterpolationMethod::InverseDistanceWeighting { p, n } => {
                let mut used: Vec<(Number, usize)> = seeds
                    .iter()
                    .enumerate()
                    .map(|(i, seed)| Ok((metric.distance(candidate, seed)?, i)))
                    .collect::<Result<_>>()?;
                if let Some(n) = n {
                    used.sort_by(|(da, ia), (db, ib)| {
                        da.numeric_cmp(db)
                            .unwrap_or(Ordering::Equal)
                            .then(ia.cmp(ib))
                    });
                    used.truncate(*n);
                }
                if let Some((_, i)) = used.iter().find(|(d, _)| d.is_zero()) {
                    return Ok(fitnesses[*i].clone());
                }
                inverse_distance_weighting(&used, fitnesses, p)
            }
        }
    }
}

fn inverse_distance_weighting(
    used: &[(Number, usize)],
    fitnesses: &[Number],
    p: &Number,
) -> Result<Number> {
    let zero_weight = || LandscapeError::InvalidParameter("idw weight underflowed to zero".into());
    let mut top = Number::fraction(0, 1);
    let mut bottom = Number::fraction(0, 1);
    for (d, i) in used {
        let weight = d.pow(p);
        top = &top + &fitnesses[*i].checked_div(&weight).ok_or_else(zero_weight)?;
        bottom = &bottom + &weight.recip().ok_or_else(zero_weight)?;
    }
    top.checked_div(&bottom).ok_or_else(zero_weight)
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpolationMethod::NearestNeighbour => write!(f, "interpolation nearestneighbour"),
            InterpolationMethod::InverseDistanceWeighting { p, n: None } => {
                write!(f, "interpolation inversedistanceweighting {p}")
            }
            InterpolationMethod::InverseDistanceWeighting { p, n: Some(n) } => {
                write!(f, "interpolation inversedistanceweighting {p} {n}")
            }
        }
    }
}

impl FromStr for InterpolationMethod {
    type Err = LandscapeError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            LandscapeError::format(format!("invalid interpolation method: \"{}\"", s.trim()))
        };
        let tokens: Vec<&str> = s.split_whitespace().collect();
        match tokens.as_slice() {
            ["interpolation", "nearestneighbour"] => Ok(InterpolationMethod::NearestNeighbour),
            ["interpolation", "inversedistanceweighting", p, rest @ ..] if rest.len() <= 1 => {
                let p = Number::parse_token(p).ok_or_else(invalid)?;
                let n = match rest {
                    [n] => Some(n.parse::<usize>().map_err(|_| invalid())?),
                    _ => None,
                };
                InterpolationMethod::new_idw(p, n).map_err(|_| invalid())
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for InterpolationMethod {
    type Error = LandscapeError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<InterpolationMethod> for String {
    fn from(m: InterpolationMethod) -> Self {
        m.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{int_point, NumberKind};

    fn three_seeds() -> (Vec<Vec<Coordinate>>, Vec<Number>) {
        (
            vec![
                int_point(&[1, 0, 0]),
                int_point(&[1, 0, 1]),
                int_point(&[0, 1, 1]),
            ],
            vec![Number::Int(5), Number::Int(7), Number::Int(11)],
        )
    }

    #[test]
    fn test_nearest_neighbour() {
        let (seeds, fit) = three_seeds();
        let nn = InterpolationMethod::NearestNeighbour;
        // distances from 111: 2, 1, 1 -> index 1 wins the tie
        let f = nn
            .interpolate(&int_point(&[1, 1, 1]), &seeds, &fit, &Metric::Hamming)
            .unwrap();
        assert_eq!(f, Number::Int(7));
        // distances from 000: 1, 2, 2
        let f = nn
            .interpolate(&int_point(&[0, 0, 0]), &seeds, &fit, &Metric::Hamming)
            .unwrap();
        assert_eq!(f, Number::Int(5));
    }

    #[test]
    fn test_nearest_neighbour_scans_every_seed() {
        // more seeds than coordinates: the last seed must still be reachable
        let seeds = vec![
            int_point(&[0]),
            int_point(&[3]),
            int_point(&[6]),
            int_point(&[9]),
        ];
        let fit = vec![Number::Int(0), Number::Int(1), Number::Int(2), Number::Int(3)];
        let f = InterpolationMethod::NearestNeighbour
            .interpolate(&int_point(&[10]), &seeds, &fit, &Metric::Manhattan)
            .unwrap();
        assert_eq!(f, Number::Int(3));
    }

    #[test]
    fn test_idw_at_seed_returns_fitness() {
        let (seeds, fit) = three_seeds();
        for method in [
            InterpolationMethod::default(),
            InterpolationMethod::new_idw(Number::Int(1), Some(2)).unwrap(),
            InterpolationMethod::new_idw(Number::Float(2.5), Some(3)).unwrap(),
        ] {
            for (seed, f) in seeds.iter().zip(&fit) {
                let got = method.interpolate(seed, &seeds, &fit, &Metric::Hamming).unwrap();
                assert_eq!(&got, f);
            }
        }
    }

    #[test]
    fn test_idw_exact() {
        let (seeds, fit) = three_seeds();
        let idw = InterpolationMethod::new_idw(Number::Int(1), None).unwrap();
        // 000: distances 1, 2, 2 -> (5 + 7/2 + 11/2) / (1 + 1/2 + 1/2) = 7
        let f = idw
            .interpolate(&int_point(&[0, 0, 0]), &seeds, &fit, &Metric::Hamming)
            .unwrap();
        assert_eq!(f, Number::fraction(7, 1));
        assert_eq!(f.kind(), NumberKind::Fraction);
    }

    #[test]
    fn test_idw_nearest_n() {
        let (seeds, fit) = three_seeds();
        let idw = InterpolationMethod::new_idw(Number::Int(1), Some(2)).unwrap();
        // 011 is seed 2; 010: distances 2, 3, 1 -> seeds 2 and 0
        let f = idw
            .interpolate(&int_point(&[0, 1, 0]), &seeds, &fit, &Metric::Hamming)
            .unwrap();
        // (11/1 + 5/2) / (1 + 1/2) = 9
        assert_eq!(f, Number::fraction(9, 1));
    }

    #[test]
    fn test_idw_fraction_exponent_is_float() {
        let (seeds, fit) = three_seeds();
        let idw = InterpolationMethod::new_idw(Number::fraction(1, 2), None).unwrap();
        let f = idw
            .interpolate(&int_point(&[0, 0, 0]), &seeds, &fit, &Metric::Hamming)
            .unwrap();
        assert_eq!(f.kind(), NumberKind::Float);
        let w2 = 1.0 / 2f64.sqrt();
        let expected = (5.0 + 7.0 * w2 + 11.0 * w2) / (1.0 + 2.0 * w2);
        assert!((f.to_f64() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_idw_float_fitness_is_float() {
        let (seeds, _) = three_seeds();
        let fit = vec![Number::Float(1.0), Number::Int(2), Number::Int(3)];
        let f = InterpolationMethod::default()
            .interpolate(&int_point(&[0, 0, 0]), &seeds, &fit, &Metric::Hamming)
            .unwrap();
        assert_eq!(f.kind(), NumberKind::Float);
    }

    #[test]
    fn test_insufficient_seeds() {
        let (seeds, fit) = three_seeds();
        let idw = InterpolationMethod::new_idw(Number::Int(2), Some(4)).unwrap();
        assert!(matches!(
            idw.interpolate(&int_point(&[0, 0, 0]), &seeds, &fit, &Metric::Hamming),
            Err(LandscapeError::InsufficientSeeds {
                required: 4,
                available: 3
            })
        ));
        assert!(matches!(
            InterpolationMethod::default().interpolate(
                &int_point(&[0]),
                &seeds[..1],
                &fit[..1],
                &Metric::Hamming
            ),
            Err(LandscapeError::InsufficientSeeds { required: 2, .. })
        ));
        assert!(matches!(
            InterpolationMethod::NearestNeighbour.interpolate(
                &int_point(&[0]),
                &[],
                &[],
                &Metric::Hamming
            ),
            Err(LandscapeError::InsufficientSeeds { required: 1, .. })
        ));
    }

    #[test]
    fn test_new_idw_validates_n() {
        assert!(InterpolationMethod::new_idw(Number::Int(2), Some(1)).is_err());
        assert!(InterpolationMethod::new_idw(Number::Int(2), Some(2)).is_ok());
    }

    #[test]
    fn test_token_round_trip() {
        for m in [
            InterpolationMethod::NearestNeighbour,
            InterpolationMethod::default(),
            InterpolationMethod::new_idw(Number::Int(2), Some(5)).unwrap(),
            InterpolationMethod::new_idw(Number::Float(1.5), None).unwrap(),
            InterpolationMethod::new_idw(Number::fraction(3, 2), Some(3)).unwrap(),
        ] {
            let s = m.to_string();
            assert_eq!(s.parse::<InterpolationMethod>().unwrap(), m, "{s}");
        }
        assert_eq!(
            InterpolationMethod::new_idw(Number::Int(2), Some(5))
                .unwrap()
                .to_string(),
            "interpolation inversedistanceweighting 2 5"
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for s in [
            "interpolation",
            "interpolation nearest",
            "interpolation nearestneighbour 2",
            "interpolation inversedistanceweighting",
            "interpolation inversedistanceweighting x",
            "interpolation inversedistanceweighting 2 1",
            "interpolation inversedistanceweighting 2 -3",
            "interpolation inversedistanceweighting 2 5 7",
            "metric hamming",
        ] {
            let err = s.parse::<InterpolationMethod>().unwrap_err();
            assert!(err.is_format(), "{s:?}");
        }
    }
}
