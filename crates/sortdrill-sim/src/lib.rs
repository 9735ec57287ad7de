//! sortdrill-sim library.
//!
//! Drives every engine combination with a seeded [`learner::SimulatedLearner`]
//! and checks the resulting traces with [`oracle::SortOracle`]. Everything is
//! derived from a single `u64` seed so any failure replays exactly.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod campaign;
pub mod learner;
pub mod oracle;
pub mod rng;

use std::fmt;

use anyhow::{Result, bail};
use serde::Serialize;
use sortdrill_core::sequence::{MAX_LENGTH, SequenceSource};
use sortdrill_core::{
    Action, Algorithm, ConvergenceDirection, Effect, Engine, ErrorCode, OrderDirection, Sequence,
};

use crate::learner::SimulatedLearner;
use crate::rng::DeterministicRng;

/// Parameters for one simulated seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimulationConfig {
    pub seed: u64,
    /// Length of the generated sequence shared by every combination.
    pub length: usize,
    /// Chance (0–100) that the learner answers wrong when it can.
    pub mistake_percent: u8,
    /// Submission ceiling per combination.
    pub max_steps: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            length: 10,
            mistake_percent: 20,
            max_steps: 10_000,
        }
    }
}

impl SimulationConfig {
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.length > MAX_LENGTH {
            bail!("length must be <= {MAX_LENGTH}, got {}", self.length);
        }
        if self.mistake_percent > 100 {
            bail!("mistake_percent must be <= 100, got {}", self.mistake_percent);
        }
        if self.max_steps == 0 {
            bail!("max_steps must be > 0");
        }
        Ok(())
    }
}

/// One (algorithm, order, convergence) policy triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Combination {
    pub algorithm: Algorithm,
    pub order: OrderDirection,
    pub convergence: ConvergenceDirection,
}

impl Combination {
    /// All twelve combinations, algorithm-major.
    #[must_use]
    pub fn all() -> Vec<Self> {
        let mut all = Vec::with_capacity(12);
        for algorithm in Algorithm::ALL {
            for order in [OrderDirection::Ascending, OrderDirection::Descending] {
                for convergence in [ConvergenceDirection::Left, ConvergenceDirection::Right] {
                    all.push(Self {
                        algorithm,
                        order,
                        convergence,
                    });
                }
            }
        }
        all
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.algorithm, self.order, self.convergence)
    }
}

/// A single submission recorded during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEvent {
    /// Submission index within the combination's run.
    pub step: usize,
    pub combination: Combination,
    pub kind: TraceEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEventKind {
    /// A correct answer that the engine applied.
    Accepted { action: Action, effect: Effect },
    /// A deliberate mistake, submitted twice in a row.
    Rejected {
        action: Action,
        first: ErrorCode,
        /// Outcome of the repeat; `None` if the repeat was accepted.
        repeat: Option<ErrorCode>,
        /// Sequence and prompt were identical before and after both attempts.
        state_unchanged: bool,
    },
    /// A deliberate mistake the engine applied anyway.
    MistakeAccepted { action: Action },
    /// The engine refused its own correct action.
    Refused { action: Action, code: ErrorCode },
}

/// Summary of one combination's run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunRecord {
    pub combination: Combination,
    pub final_values: Vec<i32>,
    pub complete: bool,
    /// Submissions the engine applied.
    pub accepted: usize,
    /// Deliberate mistakes the engine refused.
    pub rejected: usize,
    pub submissions: usize,
}

/// Everything produced by one seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationResult {
    pub seed: u64,
    pub initial: Vec<i32>,
    pub runs: Vec<RunRecord>,
    pub trace: Vec<TraceEvent>,
}

impl SimulationResult {
    /// Deliberate mistakes refused across all runs.
    #[must_use]
    pub fn mistakes_exercised(&self) -> usize {
        self.runs.iter().map(|run| run.rejected).sum()
    }

    /// `blake3` digest of the serialized trace, for comparing replays.
    ///
    /// # Errors
    ///
    /// Returns an error if the trace cannot be serialized.
    pub fn trace_fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(&self.trace)?;
        Ok(format!("blake3:{}", blake3::hash(&bytes).to_hex()))
    }
}

/// Plays every combination on one generated sequence.
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimulationConfig,
}

impl Simulator {
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> SimulationConfig {
        self.config
    }

    /// Run all combinations.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn run(&self) -> Result<SimulationResult> {
        self.config.validate()?;
        let SimulationConfig { seed, length, .. } = self.config;
        let initial = DeterministicRng::new(seed).generate(length);
        let mut learner =
            SimulatedLearner::new(seed.wrapping_add(1), self.config.mistake_percent);

        let mut runs = Vec::new();
        let mut trace = Vec::new();
        for combination in Combination::all() {
            let run = self.play(combination, &initial, &mut learner, &mut trace);
            tracing::debug!(
                seed,
                %combination,
                accepted = run.accepted,
                rejected = run.rejected,
                complete = run.complete,
                "combination played"
            );
            runs.push(run);
        }

        Ok(SimulationResult {
            seed,
            initial,
            runs,
            trace,
        })
    }

    fn play(
        &self,
        combination: Combination,
        initial: &[i32],
        learner: &mut SimulatedLearner,
        trace: &mut Vec<TraceEvent>,
    ) -> RunRecord {
        let sequence = Sequence::new(
            initial.to_vec(),
            combination.order,
            combination.convergence,
        );
        let mut engine = Engine::initialize(combination.algorithm, sequence);
        let mut accepted = 0;
        let mut rejected = 0;
        let mut submissions = 0;

        while submissions < self.config.max_steps {
            let Some(answer) = learner.answer(&engine) else {
                break;
            };
            let step = submissions;
            let kind = if answer.deliberate_mistake {
                submissions += 2;
                let kind = submit_mistake(&mut engine, answer.action);
                if matches!(kind, TraceEventKind::Rejected { repeat: Some(_), .. }) {
                    rejected += 1;
                } else {
                    accepted += 1;
                }
                kind
            } else {
                submissions += 1;
                match engine.submit_action(answer.action) {
                    Ok(outcome) => {
                        accepted += 1;
                        TraceEventKind::Accepted {
                            action: answer.action,
                            effect: outcome.effect,
                        }
                    }
                    Err(error) => TraceEventKind::Refused {
                        action: answer.action,
                        code: error.code(),
                    },
                }
            };

            let refused = matches!(kind, TraceEventKind::Refused { .. });
            trace.push(TraceEvent {
                step,
                combination,
                kind,
            });
            if refused {
                tracing::warn!(%combination, step, "engine refused its own answer");
                break;
            }
        }

        RunRecord {
            combination,
            final_values: engine.sequence().values().to_vec(),
            complete: engine.is_complete(),
            accepted,
            rejected,
            submissions,
        }
    }
}

/// Submit a known-wrong action twice and record how the engine held up.
fn submit_mistake(engine: &mut Engine, action: Action) -> TraceEventKind {
    let values_before = engine.sequence().values().to_vec();
    let prompt_before = engine.current_prompt();

    let first = match engine.submit_action(action) {
        Ok(_) => return TraceEventKind::MistakeAccepted { action },
        Err(error) => error.code(),
    };
    let repeat = engine.submit_action(action).err().map(|error| error.code());
    let state_unchanged = engine.sequence().values() == values_before.as_slice()
        && engine.current_prompt() == prompt_before;

    TraceEventKind::Rejected {
        action,
        first,
        repeat,
        state_unchanged,
    }
}
