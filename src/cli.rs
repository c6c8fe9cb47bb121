//! Command line front end.

use crate::error::{LandscapeError, Result};
use crate::generator::{
    GeneratorConfig, SpanningTreePairProblemGenerator, SpanningTreeProblemGenerator,
};
use crate::numeric::Coordinate;
use crate::problem::SeededMetricProblem;
use crate::tree::SpanningTreeBuilder;
use clap::{Parser, Subcommand};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "u-landscape")]
#[command(author, version, about = "Generate, inspect and evaluate seeded metric problems")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate a problem (or a pair) from a YAML configuration
    Generate {
        /// Generator configuration file
        config: PathBuf,

        /// Output problem file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Random seed, overriding the configuration
        #[arg(long)]
        seed: Option<u64>,

        /// Generate a pair using the configuration's `pair_builder`,
        /// written next to OUTPUT as `<stem>-a` and `<stem>-b`
        #[arg(long)]
        pair: bool,

        /// Force both problems of a pair to share their optimum
        #[arg(long, requires = "pair")]
        same_optimum: bool,
    },
    /// Evaluate a point, given as coordinate tokens
    Evaluate {
        /// Problem file
        problem: PathBuf,

        /// Coordinates, e.g. `0 1 1` or `'B' 'A' 'C'`
        #[arg(allow_hyphen_values = true, required = true)]
        coordinates: Vec<String>,
    },
    /// Print the header, metadata and best seed of a problem
    Info {
        /// Problem file
        problem: PathBuf,
    },
}

/// Contents of a `generate` configuration file: a [`GeneratorConfig`] plus
/// the second builder used by `--pair`.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct GenerateFile {
    #[serde(flatten)]
    pub config: GeneratorConfig,
    pub pair_builder: Option<SpanningTreeBuilder>,
}

impl GenerateFile {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| LandscapeError::Config(e.to_string()))
    }
}

/// `dir/stem-<suffix>.ext` for `dir/stem.ext`.
pub fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}-{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{suffix}"),
    };
    path.with_file_name(name)
}

/// Runs a parsed command, writing its report to `out`.
pub fn run<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    match cli.command {
        Command::Generate {
            config,
            output,
            seed,
            pair,
            same_optimum,
        } => {
            let text = fs::read_to_string(&config)?;
            let mut file = GenerateFile::from_yaml_str(&text)?;
            if let Some(seed) = seed {
                file.config = file.config.with_seed(seed);
            }
            generate(file, &output, pair, same_optimum, out)
        }
        Command::Evaluate {
            problem,
            coordinates,
        } => {
            let problem = SeededMetricProblem::load(&problem)?;
            let point = coordinates
                .iter()
                .map(|t| {
                    Coordinate::parse_token(t).ok_or_else(|| {
                        LandscapeError::InvalidParameter(format!("invalid coordinate '{t}'"))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            if point.len() != problem.length() {
                return Err(LandscapeError::DimensionMismatch {
                    left: point.len(),
                    right: problem.length(),
                });
            }
            writeln!(out, "{}", problem.evaluate(&point)?.token())?;
            Ok(())
        }
        Command::Info { problem } => {
            let problem = SeededMetricProblem::load(&problem)?;
            describe(&problem, out)
        }
    }
}

fn generate<W: Write>(
    file: GenerateFile,
    output: &Path,
    pair: bool,
    same_optimum: bool,
    out: &mut W,
) -> Result<()> {
    if !pair {
        let generator = SpanningTreeProblemGenerator::new(file.config)?;
        let generated = generator.generate_from_space()?;
        generated.problem.save(output)?;
        writeln!(out, "{} (optimum seed {})", output.display(), generated.optimum)?;
        return Ok(());
    }
    let builder_b = file.pair_builder.ok_or_else(|| {
        LandscapeError::Config("--pair needs a `pair_builder` in the configuration".into())
    })?;
    let generator = SpanningTreePairProblemGenerator::new(file.config, builder_b, same_optimum)?;
    let (a, b) = generator.generate_from_space()?;
    for (generated, suffix) in [(a, "a"), (b, "b")] {
        let path = sibling_path(output, suffix);
        generated.problem.save(&path)?;
        writeln!(out, "{} (optimum seed {})", path.display(), generated.optimum)?;
    }
    info!(same_optimum, "generated problem pair");
    Ok(())
}

fn describe<W: Write>(problem: &SeededMetricProblem, out: &mut W) -> Result<()> {
    let objective = if problem.minimise_objective() { "min" } else { "max" };
    writeln!(out, "objective      {objective}")?;
    writeln!(out, "domain         {}", problem.domain())?;
    writeln!(out, "codomain       {}", problem.codomain())?;
    writeln!(out, "seeds          {}", problem.num_seeds())?;
    writeln!(out, "length         {}", problem.length())?;
    writeln!(out, "interpolation  {}", problem.interpolation())?;
    writeln!(out, "metric         {}", problem.metric())?;
    for (key, value) in problem.metadata() {
        writeln!(out, "meta {key} = {value}")?;
    }
    let best = problem.best_seed();
    let coords: Vec<String> = problem.seeds()[best].iter().map(Coordinate::token).collect();
    writeln!(
        out,
        "best seed      #{best}: {} : {}",
        coords.join(" "),
        problem.fitnesses()[best].token()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKED: &str = "seededmetricproblem 4.0
objective max
domain int 0 1
codomain int 0 3
numseeds 4
length 3
interpolation nearestneighbour
metric hamming
start seeds
0 0 0 : 3
1 0 0 : 2
1 1 0 : 1
1 1 1 : 0
end seeds
";

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("u-landscape-cli-{}-{name}", std::process::id()))
    }

    fn run_args(args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(args.iter().copied()).map_err(|e| LandscapeError::Config(e.to_string()))?;
        let mut out = Vec::new();
        run(cli, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_sibling_path() {
        assert_eq!(
            sibling_path(Path::new("out/problem.smp"), "a"),
            PathBuf::from("out/problem-a.smp")
        );
        assert_eq!(sibling_path(Path::new("problem"), "b"), PathBuf::from("problem-b"));
    }

    #[test]
    fn test_same_optimum_requires_pair() {
        assert!(Cli::try_parse_from(["u-landscape", "generate", "c.yaml", "-o", "p", "--same-optimum"]).is_err());
    }

    #[test]
    fn test_evaluate_and_info() {
        let path = temp_path("worked.smp");
        fs::write(&path, WORKED).unwrap();
        let p = path.to_str().unwrap();
        assert_eq!(run_args(&["u-landscape", "evaluate", p, "1", "1", "0"]).unwrap(), "1\n");
        assert!(matches!(
            run_args(&["u-landscape", "evaluate", p, "1", "1"]),
            Err(LandscapeError::DimensionMismatch { .. })
        ));
        let info = run_args(&["u-landscape", "info", p]).unwrap();
        assert!(info.contains("best seed      #0: 0 0 0 : 3"), "{info}");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_generate_pair() {
        let config = temp_path("pair.yaml");
        fs::write(
            &config,
            "num_seeds: 8\nspace: { kind: bit_string, length: 6 }\n\
             pair_builder: { kind: optimised_max }\n",
        )
        .unwrap();
        let output = temp_path("pair.smp");
        let c = config.to_str().unwrap();
        let o = output.to_str().unwrap();
        run_args(&["u-landscape", "generate", c, "-o", o, "--seed", "7", "--pair", "--same-optimum"])
            .unwrap();
        let a = SeededMetricProblem::load(sibling_path(&output, "a")).unwrap();
        let b = SeededMetricProblem::load(sibling_path(&output, "b")).unwrap();
        assert_eq!(a.seeds(), b.seeds());
        assert_eq!(a.meta("seed"), Some("7"));
        assert_eq!(a.best_seed(), b.best_seed());
        for path in [config, sibling_path(&output, "a"), sibling_path(&output, "b")] {
            fs::remove_file(path).unwrap();
        }
    }

    #[test]
    fn test_pair_without_builder() {
        let config = temp_path("single.yaml");
        fs::write(&config, "num_seeds: 4\n").unwrap();
        let c = config.to_str().unwrap();
        let err = run_args(&["u-landscape", "generate", c, "-o", "unused.smp", "--pair"]).unwrap_err();
        assert!(matches!(err, LandscapeError::Config(_)));
        fs::remove_file(config).unwrap();
    }
}
