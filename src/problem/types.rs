//! The seeded metric problem entity and the [`Problem`] trait.

use super::domain::{Codomain, Domain};
use crate::error::{LandscapeError, Result};
use crate::interpolation::InterpolationMethod;
use crate::metric::Metric;
use crate::numeric::{Coordinate, Number};
use crate::tree::best_index;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Anything that assigns a fitness to a point.
///
/// Difficulty measures and search algorithms only need this view of a
/// problem.
pub trait Problem {
    /// Fitness of `candidate`.
    fn evaluate(&self, candidate: &[Coordinate]) -> Result<Number>;
}

/// An immutable landscape defined by seeds, their fitnesses, a metric and
/// an interpolation method.
///
/// Only the metadata map may change after construction, and each key can
/// be written once.
///
/// # Examples
///
/// ```
/// use u_landscape::interpolation::InterpolationMethod;
/// use u_landscape::metric::Metric;
/// use u_landscape::numeric::{int_point, Number};
/// use u_landscape::problem::{Codomain, Domain, SeededMetricProblem};
///
/// let problem = SeededMetricProblem::new(
///     Domain::Bit,
///     Codomain::new(Number::Int(0), Number::Int(3)).unwrap(),
///     vec![int_point(&[0, 0]), int_point(&[1, 1])],
///     vec![Number::Int(0), Number::Int(3)],
///     InterpolationMethod::NearestNeighbour,
///     Metric::Hamming,
///     false,
/// )
/// .unwrap();
/// assert_eq!(problem.evaluate(&int_point(&[1, 0])).unwrap(), Number::Int(0));
/// assert_eq!(problem.best_seed(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SeededMetricProblem {
    domain: Domain,
    codomain: Codomain,
    seeds: Vec<Vec<Coordinate>>,
    fitnesses: Vec<Number>,
    interpolation: InterpolationMethod,
    metric: Metric,
    minimise: bool,
    metadata: BTreeMap<String, String>,
}

impl SeededMetricProblem {
    /// Creates a problem. `Domain::Int { min: 0, max: 1 }` is stored as
    /// [`Domain::Bit`], the form it reads back as.
    ///
    /// # Errors
    /// [`LandscapeError::Format`] for fewer than 2 seeds, a fitness count
    /// that differs from the seed count, seeds of differing or zero
    /// length, or an infinite or NaN value anywhere in the problem.
    pub fn new(
        domain: Domain,
        codomain: Codomain,
        seeds: Vec<Vec<Coordinate>>,
        fitnesses: Vec<Number>,
        interpolation: InterpolationMethod,
        metric: Metric,
        minimise: bool,
    ) -> Result<Self> {
        if seeds.len() < 2 {
            return Err(LandscapeError::format(format!(
                "expected 2 or more seeds, found {}",
                seeds.len()
            )));
        }
        if seeds.len() != fitnesses.len() {
            return Err(LandscapeError::format(format!(
                "{} seeds but {} fitnesses",
                seeds.len(),
                fitnesses.len()
            )));
        }
        let length = seeds[0].len();
        if length == 0 || seeds.iter().any(|s| s.len() != length) {
            return Err(LandscapeError::format(
                "not all seeds have the same non-zero length",
            ));
        }
        let domain_bounds = match &domain {
            Domain::Float { min, max } => vec![Number::Float(*min), Number::Float(*max)],
            _ => Vec::new(),
        };
        let non_finite = domain_bounds
            .iter()
            .chain([codomain.min(), codomain.max()])
            .chain(&fitnesses)
            .chain(seeds.iter().flatten().filter_map(Coordinate::as_number))
            .find(|v| !v.is_finite());
        if let Some(v) = non_finite {
            return Err(LandscapeError::format(format!(
                "non-finite value {v} cannot be saved"
            )));
        }
        let domain = match domain {
            Domain::Int { min: 0, max: 1 } => Domain::Bit,
            other => other,
        };
        Ok(Self {
            domain,
            codomain,
            seeds,
            fitnesses,
            interpolation,
            metric,
            minimise,
            metadata: BTreeMap::new(),
        })
    }

    /// Coordinate domain.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Fitness range.
    pub fn codomain(&self) -> &Codomain {
        &self.codomain
    }

    /// Seed points.
    pub fn seeds(&self) -> &[Vec<Coordinate>] {
        &self.seeds
    }

    /// Seed fitnesses, aligned with [`seeds`](Self::seeds).
    pub fn fitnesses(&self) -> &[Number] {
        &self.fitnesses
    }

    /// Length of every point.
    pub fn length(&self) -> usize {
        self.seeds[0].len()
    }

    /// Number of seeds.
    pub fn num_seeds(&self) -> usize {
        self.seeds.len()
    }

    /// Interpolation method used by [`evaluate`](Self::evaluate).
    pub fn interpolation(&self) -> &InterpolationMethod {
        &self.interpolation
    }

    /// Interpolation metric.
    pub fn metric(&self) -> &Metric {
        &self.metric
    }

    /// Whether lower fitness is better.
    pub fn minimise_objective(&self) -> bool {
        self.minimise
    }

    /// Provenance metadata, sorted by key.
    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Metadata value for `key`.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Records a metadata entry.
    ///
    /// # Errors
    /// [`LandscapeError::InvalidParameter`] if the key already exists, the
    /// key is empty or holds whitespace, or the value holds a double quote
    /// or line break (neither survives the file format).
    pub fn set_meta(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let (key, value) = (key.into(), value.into());
        if key.is_empty() || key.contains(char::is_whitespace) {
            return Err(LandscapeError::InvalidParameter(format!(
                "invalid metadata key {key:?}"
            )));
        }
        if value.contains(['"', '\n', '\r']) {
            return Err(LandscapeError::InvalidParameter(format!(
                "invalid metadata value {value:?} for key {key}"
            )));
        }
        if self.metadata.contains_key(&key) {
            return Err(LandscapeError::InvalidParameter(format!(
                "metadata key {key} is already set"
            )));
        }
        self.metadata.insert(key, value);
        Ok(())
    }

    /// Builder form of [`set_meta`](Self::set_meta).
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        self.set_meta(key, value)?;
        Ok(self)
    }

    /// Interpolated fitness of `candidate`.
    pub fn evaluate(&self, candidate: &[Coordinate]) -> Result<Number> {
        self.interpolation
            .interpolate(candidate, &self.seeds, &self.fitnesses, &self.metric)
    }

    /// Whether fitness `a` is strictly better than `b` under the objective.
    pub fn is_better(&self, a: &Number, b: &Number) -> bool {
        let wanted = if self.minimise {
            Ordering::Less
        } else {
            Ordering::Greater
        };
        a.numeric_cmp(b) == Some(wanted)
    }

    /// Index of the best seed, the first one on ties.
    pub fn best_seed(&self) -> usize {
        best_index(&self.fitnesses, self.minimise).unwrap_or(0)
    }
}

impl Problem for SeededMetricProblem {
    fn evaluate(&self, candidate: &[Coordinate]) -> Result<Number> {
        SeededMetricProblem::evaluate(self, candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::int_point;

    fn sample(minimise: bool) -> SeededMetricProblem {
        SeededMetricProblem::new(
            Domain::Bit,
            Codomain::new(Number::Int(0), Number::Int(3)).unwrap(),
            vec![
                int_point(&[0, 0, 0]),
                int_point(&[1, 0, 0]),
                int_point(&[1, 1, 0]),
                int_point(&[1, 1, 1]),
            ],
            vec![Number::Int(3), Number::Int(2), Number::Int(1), Number::Int(0)],
            InterpolationMethod::default(),
            Metric::Hamming,
            minimise,
        )
        .unwrap()
    }

    #[test]
    fn test_accessors() {
        let p = sample(false);
        assert_eq!(p.length(), 3);
        assert_eq!(p.num_seeds(), 4);
        assert_eq!(p.domain(), &Domain::Bit);
        assert!(!p.minimise_objective());
        assert!(p.metadata().is_empty());
    }

    #[test]
    fn test_new_rejects_bad_seeds() {
        let codomain = Codomain::new(Number::Int(0), Number::Int(1)).unwrap();
        let build = |seeds: Vec<Vec<Coordinate>>, fitnesses: Vec<Number>| {
            SeededMetricProblem::new(
                Domain::Bit,
                codomain.clone(),
                seeds,
                fitnesses,
                InterpolationMethod::NearestNeighbour,
                Metric::Hamming,
                true,
            )
        };
        let one = build(vec![int_point(&[0])], vec![Number::Int(0)]);
        assert!(one.unwrap_err().is_format());
        let misaligned = build(
            vec![int_point(&[0]), int_point(&[1])],
            vec![Number::Int(0)],
        );
        assert!(misaligned.unwrap_err().is_format());
        let ragged = build(
            vec![int_point(&[0]), int_point(&[1, 0])],
            vec![Number::Int(0), Number::Int(1)],
        );
        assert!(ragged.unwrap_err().is_format());
        let empty = build(vec![vec![], vec![]], vec![Number::Int(0), Number::Int(1)]);
        assert!(empty.unwrap_err().is_format());
    }

    #[test]
    fn test_new_rejects_non_finite() {
        let seeds = vec![vec![Coordinate::float(0.0)], vec![Coordinate::float(1.0)]];
        let build = |domain: Domain, seeds: Vec<Vec<Coordinate>>, fitnesses: Vec<Number>| {
            SeededMetricProblem::new(
                domain,
                Codomain::new(Number::Float(0.0), Number::Float(1.0)).unwrap(),
                seeds,
                fitnesses,
                InterpolationMethod::NearestNeighbour,
                Metric::Euclidean,
                false,
            )
        };
        let unit = Domain::Float { min: 0.0, max: 1.0 };
        let fitnesses = vec![Number::Float(0.0), Number::Float(1.0)];
        assert!(build(unit.clone(), seeds.clone(), fitnesses.clone()).is_ok());
        let inf_fitness = vec![Number::Float(0.0), Number::Float(f64::INFINITY)];
        assert!(build(unit.clone(), seeds.clone(), inf_fitness).unwrap_err().is_format());
        let nan_seed = vec![vec![Coordinate::float(0.0)], vec![Coordinate::float(f64::NAN)]];
        assert!(build(unit, nan_seed, fitnesses.clone()).unwrap_err().is_format());
        let open = Domain::Float {
            min: f64::NEG_INFINITY,
            max: 1.0,
        };
        assert!(build(open, seeds, fitnesses).unwrap_err().is_format());
    }

    #[test]
    fn test_int_zero_one_domain_stored_as_bit() {
        let p = SeededMetricProblem::new(
            Domain::Int { min: 0, max: 1 },
            Codomain::new(Number::Int(0), Number::Int(1)).unwrap(),
            vec![int_point(&[0, 1]), int_point(&[1, 1])],
            vec![Number::Int(0), Number::Int(1)],
            InterpolationMethod::default(),
            Metric::Hamming,
            true,
        )
        .unwrap();
        assert_eq!(p.domain(), &Domain::Bit);
        let reloaded: SeededMetricProblem = p.to_text().parse().unwrap();
        assert_eq!(reloaded, p);
    }

    #[test]
    fn test_evaluate_at_seeds() {
        let p = sample(false);
        for (seed, f) in p.seeds().iter().zip(p.fitnesses()) {
            assert_eq!(&p.evaluate(seed).unwrap(), f);
        }
        let via_trait: &dyn Problem = &p;
        assert_eq!(via_trait.evaluate(&int_point(&[0, 0, 0])).unwrap(), Number::Int(3));
    }

    #[test]
    fn test_best_seed_follows_objective() {
        assert_eq!(sample(false).best_seed(), 0);
        assert_eq!(sample(true).best_seed(), 3);
    }

    #[test]
    fn test_is_better() {
        let max = sample(false);
        assert!(max.is_better(&Number::Int(2), &Number::fraction(3, 2)));
        assert!(!max.is_better(&Number::Int(2), &Number::Int(2)));
        let min = sample(true);
        assert!(min.is_better(&Number::Float(0.5), &Number::Int(1)));
    }

    #[test]
    fn test_metadata_write_once() {
        let mut p = sample(false);
        p.set_meta("generator", "test").unwrap();
        assert_eq!(p.meta("generator"), Some("test"));
        assert!(matches!(
            p.set_meta("generator", "again"),
            Err(LandscapeError::InvalidParameter(_))
        ));
        assert!(p.set_meta("bad key", "x").is_err());
        assert!(p.set_meta("quote", "a\"b").is_err());
        let p = p.with_meta("seed", "42").unwrap();
        assert_eq!(
            p.metadata().keys().cloned().collect::<Vec<_>>(),
            vec!["generator", "seed"]
        );
    }
}
