//! The `seededmetricproblem 4.0` text format.
//!
//! ```text
//! seededmetricproblem 4.0
//! # meta generator "spanning tree problem generator"
//! objective max
//! domain int 0 1
//! codomain int 0 3
//! numseeds 4
//! length 3
//! interpolation inversedistanceweighting 2
//! metric hamming
//! start seeds
//! 0 0 0 : 3
//! 1 0 0 : 2
//! 1 1 0 : 1
//! 1 1 1 : 0
//! end seeds
//! ```

use super::domain::{Codomain, Domain};
use super::types::SeededMetricProblem;
use crate::error::{LandscapeError, Result};
use crate::interpolation::InterpolationMethod;
use crate::metric::Metric;
use crate::numeric::{Coordinate, Number};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

const HEADER: &str = "seededmetricproblem 4.0";
const META_PREFIX: &str = "# meta ";

impl fmt::Display for SeededMetricProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{HEADER}")?;
        for (key, value) in self.metadata() {
            writeln!(f, "{META_PREFIX}{key} \"{value}\"")?;
        }
        let objective = if self.minimise_objective() { "min" } else { "max" };
        writeln!(f, "objective {objective}")?;
        writeln!(f, "domain {}", self.domain())?;
        writeln!(f, "codomain {}", self.codomain())?;
        writeln!(f, "numseeds {}", self.num_seeds())?;
        writeln!(f, "length {}", self.length())?;
        writeln!(f, "{}", self.interpolation())?;
        writeln!(f, "{}", self.metric())?;
        writeln!(f, "start seeds")?;
        for (seed, fitness) in self.seeds().iter().zip(self.fitnesses()) {
            for c in seed {
                write!(f, "{} ", c.token())?;
            }
            writeln!(f, ": {}", fitness.token())?;
        }
        writeln!(f, "end seeds")
    }
}

impl SeededMetricProblem {
    /// Serialises the problem to its canonical text.
    ///
    /// Metadata is written sorted by key so equal problems give equal text.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Writes the canonical text to any stream.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        write!(writer, "{self}")?;
        writer.flush()?;
        Ok(())
    }

    /// Saves the problem to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))?;
        info!(path = %path.display(), seeds = self.num_seeds(), "saved problem");
        Ok(())
    }

    /// Loads a problem from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let problem = Self::read_from(BufReader::new(File::open(path)?))?;
        info!(path = %path.display(), seeds = problem.num_seeds(), "loaded problem");
        Ok(problem)
    }

    /// Parses a problem from any buffered stream.
    ///
    /// Parsing stops at the first invalid line. Line numbers in errors are
    /// 1-based.
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self> {
        let lines = reader.lines().collect::<std::io::Result<Vec<_>>>()?;
        parse_lines(&lines)
    }
}

impl FromStr for SeededMetricProblem {
    type Err = LandscapeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::read_from(s.as_bytes())
    }
}

/// Header fields seen so far; each may be set once.
#[derive(Default)]
struct Header {
    minimise: Option<bool>,
    length: Option<usize>,
    num_seeds: Option<usize>,
    interpolation: Option<InterpolationMethod>,
    metric: Option<Metric>,
    domain: Option<Domain>,
    codomain: Option<Codomain>,
    seeds: Vec<Vec<Coordinate>>,
    fitnesses: Vec<Number>,
    meta: Vec<(String, String)>,
}

fn set_once<T>(slot: &mut Option<T>, value: T, field: &str, line: usize) -> Result<()> {
    if slot.is_some() {
        return Err(LandscapeError::format_at(line, format!("repeated '{field}'")));
    }
    *slot = Some(value);
    Ok(())
}

fn required<T>(slot: Option<T>, field: &str) -> Result<T> {
    slot.ok_or_else(|| LandscapeError::format(format!("missing '{field}'")))
}

/// Moves a line-less format error onto `line`.
fn at_line(err: LandscapeError, line: usize) -> LandscapeError {
    match err {
        LandscapeError::Format { line: None, message } => LandscapeError::format_at(line, message),
        other => other,
    }
}

fn parse_count(token: &str, field: &str, minimum: usize, line: usize) -> Result<usize> {
    let value: usize = token.trim().parse().map_err(|_| {
        LandscapeError::format_at(line, format!("invalid {field} '{token}', expected integer"))
    })?;
    if value < minimum {
        return Err(LandscapeError::format_at(
            line,
            format!("invalid {field} {value}, expected >= {minimum}"),
        ));
    }
    Ok(value)
}

fn parse_meta(rest: &str, line: usize) -> Result<(String, String)> {
    let invalid = || LandscapeError::format_at(line, format!("invalid meta '{META_PREFIX}{rest}'"));
    let (key, value) = rest.split_once(' ').ok_or_else(invalid)?;
    let value = value.trim();
    if key.is_empty() || value.len() < 2 || !value.starts_with('"') || !value.ends_with('"') {
        return Err(invalid());
    }
    Ok((key.to_string(), value[1..value.len() - 1].to_string()))
}

fn parse_seed(text: &str, line: usize) -> Result<(Vec<Coordinate>, Number)> {
    let invalid = || LandscapeError::format_at(line, format!("invalid seed '{text}'"));
    let (coords, fitness) = text.split_once(" : ").ok_or_else(invalid)?;
    if fitness.contains(" : ") {
        return Err(invalid());
    }
    let fitness = Number::parse_token(fitness).ok_or_else(invalid)?;
    let seed = coords
        .split_whitespace()
        .map(|t| Coordinate::parse_token(t).ok_or_else(invalid))
        .collect::<Result<Vec<_>>>()?;
    Ok((seed, fitness))
}

fn is_skippable(line: &str) -> bool {
    line.is_empty() || (line.starts_with('#') && !line.starts_with(META_PREFIX))
}

fn parse_lines(raw: &[String]) -> Result<SeededMetricProblem> {
    let lines: Vec<&str> = raw.iter().map(|l| l.trim()).collect();
    let mut i = lines.iter().take_while(|l| is_skippable(l)).count();
    if lines.get(i) != Some(&HEADER) {
        return Err(LandscapeError::format_at(
            i + 1,
            format!("expected '{HEADER}' before any parameters or metadata"),
        ));
    }
    i += 1;

    let mut header = Header::default();
    let mut skipped_comments = 0usize;
    while i < lines.len() {
        let line = lines[i];
        let number = i + 1;
        if let Some(rest) = line.strip_prefix(META_PREFIX) {
            let (key, value) = parse_meta(rest, number)?;
            if header.meta.iter().any(|(k, _)| *k == key) {
                return Err(LandscapeError::format_at(
                    number,
                    format!("meta data key {key} appears more than once"),
                ));
            }
            header.meta.push((key, value));
        } else if is_skippable(line) {
            if !line.is_empty() {
                skipped_comments += 1;
            }
        } else if let Some(token) = line.strip_prefix("objective ") {
            let minimise = match token.trim() {
                "min" => true,
                "max" => false,
                other => {
                    return Err(LandscapeError::format_at(
                        number,
                        format!("invalid objective '{other}'"),
                    ))
                }
            };
            set_once(&mut header.minimise, minimise, "objective", number)?;
        } else if let Some(token) = line.strip_prefix("length ") {
            let length = parse_count(token, "length", 1, number)?;
            set_once(&mut header.length, length, "length", number)?;
        } else if let Some(token) = line.strip_prefix("numseeds ") {
            let num_seeds = parse_count(token, "numseeds", 2, number)?;
            set_once(&mut header.num_seeds, num_seeds, "numseeds", number)?;
        } else if line.starts_with("interpolation ") {
            let method = line.parse().map_err(|e| at_line(e, number))?;
            set_once(&mut header.interpolation, method, "interpolation", number)?;
        } else if line.starts_with("metric ") {
            let metric = line.parse().map_err(|e| at_line(e, number))?;
            set_once(&mut header.metric, metric, "metric", number)?;
        } else if let Some(rest) = line.strip_prefix("domain ") {
            let tokens: Vec<&str> = rest.split_whitespace().collect();
            set_once(&mut header.domain, Domain::parse_tokens(&tokens)?, "domain", number)?;
        } else if let Some(rest) = line.strip_prefix("codomain ") {
            let tokens: Vec<&str> = rest.split_whitespace().collect();
            let codomain = Codomain::parse_tokens(&tokens)?;
            set_once(&mut header.codomain, codomain, "codomain", number)?;
        } else if line == "start seeds" {
            if !header.seeds.is_empty() {
                return Err(LandscapeError::format_at(number, "repeated 'start seeds'"));
            }
            i += 1;
            loop {
                let Some(&seed_line) = lines.get(i) else {
                    return Err(LandscapeError::format_at(number, "missing 'end seeds'"));
                };
                if seed_line == "end seeds" {
                    break;
                }
                let (seed, fitness) = parse_seed(seed_line, i + 1)?;
                header.seeds.push(seed);
                header.fitnesses.push(fitness);
                i += 1;
            }
        } else {
            return Err(LandscapeError::format_at(number, format!("invalid line '{line}'")));
        }
        i += 1;
    }
    if skipped_comments > 0 {
        warn!(lines = skipped_comments, "skipped comment lines in problem file");
    }
    build(header)
}

fn build(header: Header) -> Result<SeededMetricProblem> {
    let minimise = required(header.minimise, "objective")?;
    let length = required(header.length, "length")?;
    let num_seeds = required(header.num_seeds, "numseeds")?;
    let interpolation = required(header.interpolation, "interpolation")?;
    let metric = required(header.metric, "metric")?;
    let domain = required(header.domain, "domain")?;
    let codomain = required(header.codomain, "codomain")?;
    if header.seeds.len() < 2 {
        return Err(LandscapeError::format("expected 2 or more seeds"));
    }
    if header.seeds.len() != num_seeds {
        return Err(LandscapeError::format(format!(
            "stated {num_seeds} seeds, found {}",
            header.seeds.len()
        )));
    }
    if header.seeds.iter().any(|s| s.len() != length) {
        return Err(LandscapeError::format("not all seeds of stated length"));
    }
    let mut problem = SeededMetricProblem::new(
        domain,
        codomain,
        header.seeds,
        header.fitnesses,
        interpolation,
        metric,
        minimise,
    )?;
    for (key, value) in header.meta {
        problem
            .set_meta(key, value)
            .map_err(|e| LandscapeError::format(e.to_string()))?;
    }
    Ok(problem)
}
