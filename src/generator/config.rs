//! Generator configuration.

use super::seeds::SeedSpace;
use crate::error::{LandscapeError, Result};
use crate::interpolation::InterpolationMethod;
use crate::metric::Metric;
use crate::tree::{SpanningTreeBuilder, TreeFitnessAssigner};

/// Configuration for the spanning tree problem generators.
///
/// The tree is built under the builder's own metric; `metric` is the
/// interpolation metric stored in the generated problem.
///
/// # Examples
///
/// ```
/// use u_landscape::generator::{GeneratorConfig, SeedSpace};
/// use u_landscape::tree::{EdgeSelector, SpanningTreeBuilder};
/// use u_landscape::metric::Metric;
///
/// let config = GeneratorConfig::default()
///     .with_num_seeds(30)
///     .with_minimise(true)
///     .with_space(SeedSpace::BitString { length: 12 })
///     .with_builder(SpanningTreeBuilder::Kruskal {
///         metric: Metric::Hamming,
///         selector: EdgeSelector::new_order_statistic(0.25).unwrap(),
///     })
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GeneratorConfig {
    /// Number of distinct seeds. At least 2.
    pub num_seeds: usize,

    /// Whether generated problems minimise fitness.
    pub minimise: bool,

    /// Random seed for reproducibility. `None` draws a fresh one, which is
    /// still recorded in the problem metadata.
    pub seed: Option<u64>,

    /// Interpolation method of the generated problem.
    pub interpolation: InterpolationMethod,

    /// Interpolation metric of the generated problem.
    pub metric: Metric,

    /// Spanning tree construction, including the tree metric.
    pub builder: SpanningTreeBuilder,

    /// Fitness assignment from the tree.
    pub assigner: TreeFitnessAssigner,

    /// Search space the seeds are drawn from.
    pub space: SeedSpace,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_seeds: 20,
            minimise: false,
            seed: None,
            interpolation: InterpolationMethod::default(),
            metric: Metric::default(),
            builder: SpanningTreeBuilder::default(),
            assigner: TreeFitnessAssigner::default(),
            space: SeedSpace::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn with_num_seeds(mut self, n: usize) -> Self {
        self.num_seeds = n;
        self
    }

    pub fn with_minimise(mut self, minimise: bool) -> Self {
        self.minimise = minimise;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_interpolation(mut self, interpolation: InterpolationMethod) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_builder(mut self, builder: SpanningTreeBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn with_assigner(mut self, assigner: TreeFitnessAssigner) -> Self {
        self.assigner = assigner;
        self
    }

    pub fn with_space(mut self, space: SeedSpace) -> Self {
        self.space = space;
        self
    }

    /// Validates the configuration before any randomness is consumed.
    ///
    /// # Errors
    /// [`LandscapeError::InvalidParameter`] for too few seeds, an invalid
    /// component, or a metric that cannot measure points of the space.
    pub fn validate(&self) -> Result<()> {
        if self.num_seeds < 2 {
            return Err(LandscapeError::InvalidParameter(format!(
                "num_seeds must be at least 2, got {}",
                self.num_seeds
            )));
        }
        self.interpolation.validate()?;
        if self.interpolation.required_seeds() > self.num_seeds {
            return Err(LandscapeError::InvalidParameter(format!(
                "{} needs {} seeds but only {} are generated",
                self.interpolation,
                self.interpolation.required_seeds(),
                self.num_seeds
            )));
        }
        self.builder.validate()?;
        self.assigner.validate()?;
        self.space.generator()?;
        for metric in [&self.metric, self.builder.metric()] {
            if !metric_fits(metric, &self.space) {
                return Err(LandscapeError::InvalidParameter(format!(
                    "{metric} cannot measure {} seeds",
                    self.space.name()
                )));
            }
        }
        Ok(())
    }

    /// Reads a configuration from YAML. Missing fields take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| LandscapeError::Config(e.to_string()))
    }

    /// Writes the configuration as YAML.
    #[cfg(feature = "serde")]
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| LandscapeError::Config(e.to_string()))
    }
}

fn metric_fits(metric: &Metric, space: &SeedSpace) -> bool {
    match (metric, space) {
        (Metric::KendallTau { .. }, space) => matches!(
            space,
            SeedSpace::Permutation { .. } | SeedSpace::SymbolPermutation { .. }
        ),
        (Metric::Hamming, space) => matches!(
            space,
            SeedSpace::BitString { .. } | SeedSpace::IntVector { min: 0, max: 1, .. }
        ),
        (_, SeedSpace::SymbolPermutation { symbols }) => {
            symbols.iter().all(|s| s.as_number().is_some())
        }
        _ => true,
    }
}
