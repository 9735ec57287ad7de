//! Flag, environment and config-file resolution shared by `play` and `solve`.
//!
//! Precedence (highest wins): command-line flags, `SORTDRILL_*` environment
//! variables, the config file, built-in defaults.

use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Args;
use sortdrill_core::config::{self, QuizConfig, SessionSettings};
use sortdrill_core::sequence::{
    FixedSource, MAX_LENGTH, MAX_VALUE, MIN_VALUE, RandomSource, SequenceSource,
};
use sortdrill_core::{Algorithm, ConvergenceDirection, OrderDirection};

/// Session options accepted by every command that runs a quiz.
#[derive(Args, Debug, Clone, Default)]
pub struct SessionFlags {
    /// Sorting algorithm to drill.
    #[arg(short, long)]
    pub algorithm: Option<Algorithm>,

    /// Target order (`ascending`/`asc` or `descending`/`desc`).
    #[arg(short, long)]
    pub order: Option<OrderDirection>,

    /// Side of the sequence where the settled region grows (`left` or `right`).
    #[arg(short, long)]
    pub convergence: Option<ConvergenceDirection>,

    /// Number of generated values.
    #[arg(short, long)]
    pub length: Option<usize>,

    /// Seed for reproducible sequences.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Explicit comma-separated values instead of a generated sequence.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub values: Option<Vec<i32>>,

    /// Pause after each settling step, in milliseconds.
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

/// Everything a command needs to start a session.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub settings: SessionSettings,
    pub values: Option<Vec<i32>>,
    pub seed: Option<u64>,
    pub value_min: i32,
    pub value_max: i32,
    pub delay_ms: u64,
}

impl ResolvedSession {
    /// The sequence source implied by explicit values, or the seed and value range.
    ///
    /// Explicit values replay on every restart.
    pub fn source(&self) -> Box<dyn SequenceSource> {
        if let Some(values) = &self.values {
            return Box::new(FixedSource::new(values.clone()));
        }
        let source = self
            .seed
            .map_or_else(RandomSource::new, RandomSource::seeded)
            .with_range(self.value_min, self.value_max);
        Box::new(source)
    }
}

/// Load the config file named by `--config`, or the user config.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or an environment
/// override is malformed.
pub fn load_quiz_config(path: Option<&Path>) -> Result<QuizConfig> {
    let mut cfg = match path {
        Some(path) => config::load_config(path)?,
        None => config::load_user_config()?,
    };
    cfg.apply_env()?;
    Ok(cfg)
}

impl SessionFlags {
    /// Layer these flags over `cfg` and validate the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged settings fall outside the session
    /// bounds, or explicit values are empty, too long, or out of range.
    pub fn resolve(&self, mut cfg: QuizConfig) -> Result<ResolvedSession> {
        if let Some(algorithm) = self.algorithm {
            cfg.session.algorithm = algorithm;
        }
        if let Some(order) = self.order {
            cfg.session.order = order;
        }
        if let Some(convergence) = self.convergence {
            cfg.session.convergence = convergence;
        }
        if let Some(length) = self.length {
            cfg.session.length = length;
        }
        if let Some(delay_ms) = self.delay_ms {
            cfg.pacing.settle_delay_ms = delay_ms;
        }

        if let Some(values) = &self.values {
            validate_values(values)?;
            cfg.session.length = values.len();
        } else {
            cfg.validate().context("invalid session settings")?;
        }

        Ok(ResolvedSession {
            settings: cfg.session,
            values: self.values.clone(),
            seed: self.seed,
            value_min: cfg.values.min,
            value_max: cfg.values.max,
            delay_ms: cfg.pacing.settle_delay_ms,
        })
    }
}

/// Explicit lists skip the generated-length minimum but keep the other bounds.
fn validate_values(values: &[i32]) -> Result<()> {
    if values.is_empty() {
        bail!("--values must list at least one value");
    }
    if values.len() > MAX_LENGTH {
        bail!(
            "--values lists {} values; at most {MAX_LENGTH} are allowed",
            values.len()
        );
    }
    if let Some(bad) = values
        .iter()
        .find(|value| !(MIN_VALUE..=MAX_VALUE).contains(*value))
    {
        bail!("--values entry {bad} is outside {MIN_VALUE}..={MAX_VALUE}");
    }
    Ok(())
}
