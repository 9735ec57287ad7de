//! Campaign runner for deterministic simulation campaigns.
//!
//! Executes many seeds, collecting pass/fail results and identifying the
//! first failing seed for replay.

use std::ops::Range;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::oracle::{InvariantViolation, OracleResult, SortOracle};
use crate::{SimulationConfig, SimulationResult, Simulator};

/// Campaign-level configuration controlling how many seeds to run and
/// what simulation parameters to use for each seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignConfig {
    /// Range of seeds to execute, e.g., `0..100`.
    pub seed_range: Range<u64>,
    /// Sequence length per seed.
    pub length: usize,
    /// Learner mistake probability (percent, 0–100).
    pub mistake_percent: u8,
    /// Submission ceiling per combination.
    pub max_steps: usize,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        let sim = SimulationConfig::default();
        Self {
            seed_range: 0..100,
            length: sim.length,
            mistake_percent: sim.mistake_percent,
            max_steps: sim.max_steps,
        }
    }
}

impl CampaignConfig {
    /// Build a [`SimulationConfig`] for a specific seed.
    #[must_use]
    pub const fn sim_config_for_seed(&self, seed: u64) -> SimulationConfig {
        SimulationConfig {
            seed,
            length: self.length,
            mistake_percent: self.mistake_percent,
            max_steps: self.max_steps,
        }
    }

    /// Validate configuration before running.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.seed_range.is_empty() {
            bail!("seed_range must not be empty");
        }
        self.sim_config_for_seed(self.seed_range.start).validate()
    }
}

/// Failure details for a single seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedFailure {
    pub seed: u64,
    /// Invariant violations found, formatted for humans.
    pub violations: Vec<String>,
}

/// Aggregate report produced by a campaign run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignReport {
    pub seeds_run: usize,
    pub seeds_passed: usize,
    /// First seed that failed (for prioritized replay).
    pub first_failure: Option<u64>,
    pub failures: Vec<SeedFailure>,
    /// Deliberate mistakes the engines refused across all seeds.
    pub mistakes_exercised: usize,
}

impl CampaignReport {
    /// True if every seed passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Detailed trace produced by replaying a single seed.
#[derive(Debug, Clone)]
pub struct DetailedTrace {
    pub result: SimulationResult,
    pub oracle: OracleResult,
}

/// Run a full campaign across all seeds in the config.
///
/// # Errors
///
/// Returns an error if config validation fails or a simulation encounters
/// an internal error.
pub fn run_campaign(config: &CampaignConfig) -> Result<CampaignReport> {
    config.validate()?;

    let mut seeds_run = 0_usize;
    let mut seeds_passed = 0_usize;
    let mut first_failure: Option<u64> = None;
    let mut failures = Vec::new();
    let mut mistakes_exercised = 0_usize;

    for seed in config.seed_range.clone() {
        seeds_run += 1;
        let (result, oracle) = evaluate_seed(seed, config)?;
        mistakes_exercised += result.mistakes_exercised();

        if oracle.passed {
            seeds_passed += 1;
        } else {
            tracing::warn!(seed, violations = oracle.violations.len(), "seed failed");
            first_failure.get_or_insert(seed);
            failures.push(SeedFailure {
                seed,
                violations: oracle.violations.iter().map(format_violation).collect(),
            });
        }
    }

    tracing::info!(
        seeds_run,
        seeds_passed,
        mistakes_exercised,
        "campaign finished"
    );

    Ok(CampaignReport {
        seeds_run,
        seeds_passed,
        first_failure,
        failures,
        mistakes_exercised,
    })
}

/// Run a single seed and return Ok(()) on pass, Err(violations) on failure.
///
/// # Errors
///
/// Returns an `anyhow::Error` if the simulation itself encounters an internal
/// error (invalid config, etc). The inner `Result` distinguishes pass from
/// invariant violations.
pub fn run_single_seed(
    seed: u64,
    config: &CampaignConfig,
) -> Result<std::result::Result<(), Vec<InvariantViolation>>> {
    let (_, oracle) = evaluate_seed(seed, config)?;
    if oracle.passed {
        Ok(Ok(()))
    } else {
        Ok(Err(oracle.violations))
    }
}

/// Replay a single seed with full trace details for debugging.
///
/// # Errors
///
/// Returns an error when config validation or simulation fails.
pub fn replay_seed(seed: u64, config: &CampaignConfig) -> Result<DetailedTrace> {
    config.validate()?;
    let (result, oracle) = evaluate_seed(seed, config)?;
    Ok(DetailedTrace { result, oracle })
}

fn evaluate_seed(seed: u64, config: &CampaignConfig) -> Result<(SimulationResult, OracleResult)> {
    let simulator = Simulator::new(config.sim_config_for_seed(seed))?;
    let result = simulator.run()?;
    let oracle = SortOracle::check_all(&result);
    tracing::debug!(seed, passed = oracle.passed, "seed evaluated");
    Ok((result, oracle))
}

/// Format an invariant violation into a human-readable string.
#[must_use]
pub fn format_violation(v: &InvariantViolation) -> String {
    match v {
        InvariantViolation::Sortedness {
            combination,
            final_values,
        } => format!("Sortedness: {combination} finished unsorted ({final_values:?})"),
        InvariantViolation::Permutation {
            combination,
            initial,
            final_values,
        } => format!(
            "Permutation: {combination} changed the multiset \
             (initial={initial:?}, final={final_values:?})"
        ),
        InvariantViolation::RejectionIdempotence {
            combination,
            step,
            action,
        } => format!(
            "RejectionIdempotence: {combination} step {step}: refusing '{action}' \
             changed state or was not repeatable"
        ),
        InvariantViolation::MistakeAccepted {
            combination,
            step,
            action,
        } => format!("MistakeAccepted: {combination} step {step}: wrong '{action}' was applied"),
        InvariantViolation::CorrectRefused {
            combination,
            step,
            action,
        } => format!("CorrectRefused: {combination} step {step}: expected '{action}' was refused"),
        InvariantViolation::ConvergenceSymmetry {
            algorithm,
            order,
            left,
            right,
        } => format!(
            "ConvergenceSymmetry: {algorithm}/{order} left={left:?} right={right:?}"
        ),
        InvariantViolation::DecisionBound {
            combination,
            accepted,
            expected,
        } => format!(
            "DecisionBound: {combination} accepted {accepted} decisions, expected {expected}"
        ),
        InvariantViolation::Incomplete {
            combination,
            submissions,
        } => format!("Incomplete: {combination} unfinished after {submissions} submissions"),
    }
}
