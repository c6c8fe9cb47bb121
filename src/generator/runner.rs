//! Spanning tree problem generation.

use super::config::GeneratorConfig;
use super::seeds::SeedGenerator;
use crate::error::{LandscapeError, Result};
use crate::numeric::Coordinate;
use crate::problem::{Codomain, SeededMetricProblem};
use crate::random::{create_rng, resolve_seed, LandscapeRng};
use crate::tree::{
    FitnessAssignment, SpanningTree, SpanningTreeBuilder, TreeFitnessAssigner, VertexSelector,
};
use tracing::info;

/// A generated problem together with how it was made.
///
/// The tree is not part of the problem file; it is returned so callers can
/// inspect the structure the fitnesses were derived from.
#[derive(Debug, Clone)]
pub struct GeneratedProblem {
    /// The generated instance.
    pub problem: SeededMetricProblem,
    /// Index of the seed designated as optimum.
    pub optimum: usize,
    /// Spanning tree over the seeds.
    pub tree: SpanningTree,
}

/// One generation run: the seed set and what every problem of the run
/// shares.
struct Run<'a> {
    config: &'a GeneratorConfig,
    seed_generator: &'a dyn SeedGenerator,
    generator_name: &'static str,
    rng_seed: u64,
    rng: LandscapeRng,
    seeds: Vec<Vec<Coordinate>>,
}

impl<'a> Run<'a> {
    fn start(
        config: &'a GeneratorConfig,
        seed_generator: &'a dyn SeedGenerator,
        generator_name: &'static str,
    ) -> Result<Self> {
        let rng_seed = resolve_seed(config.seed);
        let mut rng = create_rng(rng_seed);
        let seeds = seed_generator.generate_seeds(config.num_seeds, &mut rng)?;
        Ok(Self {
            config,
            seed_generator,
            generator_name,
            rng_seed,
            rng,
            seeds,
        })
    }

    fn tree(&mut self, builder: &SpanningTreeBuilder) -> Result<SpanningTree> {
        builder.build(&self.seeds, &mut self.rng)
    }

    fn assign(&mut self, assigner: &TreeFitnessAssigner, tree: &SpanningTree) -> Result<FitnessAssignment> {
        assigner.assign(tree, self.config.minimise, &mut self.rng)
    }

    /// Wraps an assignment into a problem carrying the run's metadata.
    fn problem(
        &self,
        builder: &SpanningTreeBuilder,
        tree: SpanningTree,
        assignment: FitnessAssignment,
    ) -> Result<GeneratedProblem> {
        let config = self.config;
        let codomain = Codomain::of_values(&assignment.fitnesses)?;
        let problem = SeededMetricProblem::new(
            self.seed_generator.domain()?,
            codomain,
            self.seeds.clone(),
            assignment.fitnesses,
            config.interpolation.clone(),
            config.metric.clone(),
            config.minimise,
        )?
        .with_meta("generator", self.generator_name)?
        .with_meta("spanningtreemetric", builder.metric().to_string())?
        .with_meta("seed", self.rng_seed.to_string())?;
        info!(
            generator = self.generator_name,
            builder = builder.name(),
            seeds = problem.num_seeds(),
            codomain = %problem.codomain(),
            optimum = assignment.optimum,
            "generated problem"
        );
        Ok(GeneratedProblem {
            problem,
            optimum: assignment.optimum,
            tree,
        })
    }
}

/// Generates one problem per call from a spanning tree over random seeds.
///
/// # Examples
///
/// ```
/// use u_landscape::generator::{GeneratorConfig, SpanningTreeProblemGenerator};
///
/// let config = GeneratorConfig::default().with_num_seeds(10).with_seed(42);
/// let generator = SpanningTreeProblemGenerator::new(config).unwrap();
/// let generated = generator.generate_from_space().unwrap();
/// assert_eq!(generated.problem.num_seeds(), 10);
/// assert_eq!(generated.tree.len(), 9);
/// ```
#[derive(Debug, Clone)]
pub struct SpanningTreeProblemGenerator {
    config: GeneratorConfig,
}

impl SpanningTreeProblemGenerator {
    /// Metadata value of the `generator` key.
    pub const NAME: &'static str = "spanning tree problem generator";

    /// Creates a generator after validating `config`.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates a problem with seeds drawn from `seed_generator`.
    pub fn generate(&self, seed_generator: &dyn SeedGenerator) -> Result<GeneratedProblem> {
        let config = &self.config;
        let mut run = Run::start(config, seed_generator, Self::NAME)?;
        let tree = run.tree(&config.builder)?;
        let assignment = run.assign(&config.assigner, &tree)?;
        run.problem(&config.builder, tree, assignment)
    }

    /// Generates a problem with seeds drawn from the configured space.
    pub fn generate_from_space(&self) -> Result<GeneratedProblem> {
        let seed_generator = self.config.space.generator()?;
        self.generate(seed_generator.as_ref())
    }
}

/// Generates two problems over one seed set with two tree builders.
///
/// The configured builder makes the first problem and `builder_b` the
/// second. With `same_optimum` the second assignment is forced to start
/// from the first optimum, so both problems share their best seed.
#[derive(Debug, Clone)]
pub struct SpanningTreePairProblemGenerator {
    config: GeneratorConfig,
    builder_b: SpanningTreeBuilder,
    same_optimum: bool,
}

impl SpanningTreePairProblemGenerator {
    /// Metadata value of the `generator` key.
    pub const NAME: &'static str = "spanning tree pair problem generator";

    /// Creates a pair generator.
    ///
    /// # Errors
    /// [`LandscapeError::InvalidParameter`] if either builder is invalid,
    /// or `same_optimum` is requested with an assigner that does not pick
    /// its optimum through a vertex selector.
    pub fn new(
        config: GeneratorConfig,
        builder_b: SpanningTreeBuilder,
        same_optimum: bool,
    ) -> Result<Self> {
        config.validate()?;
        config.clone().with_builder(builder_b.clone()).validate()?;
        if same_optimum && config.assigner.vertex_selector().is_none() {
            return Err(LandscapeError::InvalidParameter(format!(
                "{} assigner cannot force a shared optimum",
                config.assigner.name()
            )));
        }
        Ok(Self {
            config,
            builder_b,
            same_optimum,
        })
    }

    /// Whether both problems share their optimum.
    pub fn same_optimum(&self) -> bool {
        self.same_optimum
    }

    /// Generates a pair of problems with seeds drawn from `seed_generator`.
    pub fn generate(
        &self,
        seed_generator: &dyn SeedGenerator,
    ) -> Result<(GeneratedProblem, GeneratedProblem)> {
        let config = &self.config;
        let mut run = Run::start(config, seed_generator, Self::NAME)?;

        let tree_a = run.tree(&config.builder)?;
        let assignment_a = run.assign(&config.assigner, &tree_a)?;

        let tree_b = run.tree(&self.builder_b)?;
        let assignment_b = if self.same_optimum {
            let forced = config
                .assigner
                .clone()
                .with_vertex_selector(VertexSelector::forced(assignment_a.optimum));
            run.assign(&forced, &tree_b)?
        } else {
            run.assign(&config.assigner, &tree_b)?
        };
        if self.same_optimum && assignment_b.optimum != assignment_a.optimum {
            return Err(LandscapeError::InvalidParameter(format!(
                "forced optimum {} but assigner chose {}",
                assignment_a.optimum, assignment_b.optimum
            )));
        }

        let a = run.problem(&config.builder, tree_a, assignment_a)?;
        let b = run.problem(&self.builder_b, tree_b, assignment_b)?;
        Ok((a, b))
    }

    /// Generates a pair with seeds drawn from the configured space.
    pub fn generate_from_space(&self) -> Result<(GeneratedProblem, GeneratedProblem)> {
        let seed_generator = self.config.space.generator()?;
        self.generate(seed_generator.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::seeds::{SeedSpace, UniformPermutation};
    use crate::interpolation::InterpolationMethod;
    use crate::metric::Metric;
    use crate::numeric::Number;
    use crate::tree::EdgeSelector;

    fn config() -> GeneratorConfig {
        GeneratorConfig::default()
            .with_num_seeds(12)
            .with_space(SeedSpace::BitString { length: 10 })
            .with_seed(42)
    }

    #[test]
    fn test_generate_problem() {
        let generator = SpanningTreeProblemGenerator::new(config()).unwrap();
        let generated = generator.generate_from_space().unwrap();
        let problem = &generated.problem;
        assert_eq!(problem.num_seeds(), 12);
        assert_eq!(problem.length(), 10);
        assert_eq!(generated.tree.len(), 11);
        assert_eq!(problem.meta("generator"), Some(SpanningTreeProblemGenerator::NAME));
        assert_eq!(problem.meta("spanningtreemetric"), Some("metric hamming"));
        assert_eq!(problem.meta("seed"), Some("42"));
        assert_eq!(
            problem.codomain(),
            &Codomain::of_values(problem.fitnesses()).unwrap()
        );
    }

    #[test]
    fn test_optimum_holds_best_fitness() {
        for minimise in [false, true] {
            let generator =
                SpanningTreeProblemGenerator::new(config().with_minimise(minimise)).unwrap();
            let generated = generator.generate_from_space().unwrap();
            let problem = &generated.problem;
            let best = &problem.fitnesses()[generated.optimum];
            assert!(problem
                .fitnesses()
                .iter()
                .all(|f| !problem.is_better(f, best)));
            let seed = &problem.seeds()[generated.optimum];
            assert_eq!(&problem.evaluate(seed).unwrap(), best);
        }
    }

    #[test]
    fn test_same_seed_same_text() {
        let a = SpanningTreeProblemGenerator::new(config()).unwrap();
        let b = SpanningTreeProblemGenerator::new(config()).unwrap();
        assert_eq!(
            a.generate_from_space().unwrap().problem.to_text(),
            b.generate_from_space().unwrap().problem.to_text()
        );
    }

    #[test]
    fn test_explicit_seed_generator() {
        let config = config()
            .with_num_seeds(6)
            .with_metric(Metric::kendall_tau())
            .with_space(SeedSpace::Permutation { length: 4 })
            .with_builder(SpanningTreeBuilder::Kruskal {
                metric: Metric::kendall_tau(),
                selector: EdgeSelector::UniformRandom,
            })
            .with_interpolation(InterpolationMethod::NearestNeighbour);
        let generator = SpanningTreeProblemGenerator::new(config).unwrap();
        let letters = UniformPermutation::new(vec!["A".into(), "B".into(), "C".into(), "D".into()])
            .unwrap();
        let generated = generator.generate(&letters).unwrap();
        assert_eq!(generated.problem.domain(), &letters.domain().unwrap());
        assert_eq!(
            generated.problem.meta("spanningtreemetric"),
            Some("metric kendalltau normalised")
        );
    }

    #[test]
    fn test_fraction_fitnesses() {
        let config = config().with_assigner(TreeFitnessAssigner::FractionDepth {
            vertex: VertexSelector::UniformRandomLeaf,
            min: Number::Int(0),
            max: Number::Int(1),
        });
        let generated = SpanningTreeProblemGenerator::new(config)
            .unwrap()
            .generate_from_space()
            .unwrap();
        assert!(generated
            .problem
            .fitnesses()
            .iter()
            .all(|f| matches!(f, Number::Fraction(_))));
        let text = generated.problem.to_text();
        let loaded: SeededMetricProblem = text.parse().unwrap();
        assert_eq!(loaded, generated.problem);
    }

    #[test]
    fn test_pair_same_optimum() {
        let pair = SpanningTreePairProblemGenerator::new(
            config().with_builder(SpanningTreeBuilder::OptimisedMin {
                metric: Metric::Hamming,
            }),
            SpanningTreeBuilder::OptimisedMax {
                metric: Metric::Hamming,
            },
            true,
        )
        .unwrap();
        assert!(pair.same_optimum());
        let (a, b) = pair.generate_from_space().unwrap();
        assert_eq!(a.optimum, b.optimum);
        assert_eq!(a.problem.seeds(), b.problem.seeds());
        assert_eq!(a.problem.meta("generator"), Some(SpanningTreePairProblemGenerator::NAME));
        assert_eq!(b.problem.meta("spanningtreemetric"), Some("metric hamming"));
    }

    #[test]
    fn test_pair_needs_vertex_selector_for_same_optimum() {
        let config = config().with_assigner(TreeFitnessAssigner::RandomInt { min: 0, max: 9 });
        let err = SpanningTreePairProblemGenerator::new(
            config.clone(),
            SpanningTreeBuilder::default(),
            true,
        )
        .unwrap_err();
        assert!(matches!(err, LandscapeError::InvalidParameter(_)));
        assert!(
            SpanningTreePairProblemGenerator::new(config, SpanningTreeBuilder::default(), false)
                .is_ok()
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(SpanningTreeProblemGenerator::new(config().with_num_seeds(1)).is_err());
    }
}
