use serde::Serialize;
use sortdrill_core::{Algorithm, ConvergenceDirection, OrderDirection};

use crate::{Combination, RunRecord, SimulationResult, TraceEventKind};

// ── Core result types ─────────────────────────────────────────────────────────

/// Oracle result for an invariant check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OracleResult {
    /// `true` iff no violations were found.
    pub passed: bool,
    pub violations: Vec<InvariantViolation>,
}

impl OracleResult {
    #[must_use]
    fn pass() -> Self {
        Self {
            passed: true,
            violations: Vec::new(),
        }
    }

    #[must_use]
    fn fail(violations: Vec<InvariantViolation>) -> Self {
        Self {
            passed: false,
            violations,
        }
    }

    #[must_use]
    fn from_violations(violations: Vec<InvariantViolation>) -> Self {
        if violations.is_empty() {
            Self::pass()
        } else {
            Self::fail(violations)
        }
    }

    /// Merge another result into this one (failures accumulate).
    #[must_use]
    fn merge(mut self, other: Self) -> Self {
        if !other.passed {
            self.passed = false;
            self.violations.extend(other.violations);
        }
        self
    }
}

// ── Invariant violation diagnostics ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "invariant", rename_all = "snake_case")]
pub enum InvariantViolation {
    /// A completed run left the values out of order.
    Sortedness {
        combination: Combination,
        final_values: Vec<i32>,
    },
    /// The final values are not a rearrangement of the initial ones.
    Permutation {
        combination: Combination,
        initial: Vec<i32>,
        final_values: Vec<i32>,
    },
    /// A refused action changed state, or the repeat was not refused the same way.
    RejectionIdempotence {
        combination: Combination,
        step: usize,
        action: String,
    },
    /// The engine applied an action the learner knew to be wrong.
    MistakeAccepted {
        combination: Combination,
        step: usize,
        action: String,
    },
    /// The engine refused the action it reported as correct.
    CorrectRefused {
        combination: Combination,
        step: usize,
        action: String,
    },
    /// Left and Right convergence disagree on the final arrangement.
    ConvergenceSymmetry {
        algorithm: Algorithm,
        order: OrderDirection,
        left: Vec<i32>,
        right: Vec<i32>,
    },
    /// A completed run accepted a different number of decisions than the algorithm takes.
    DecisionBound {
        combination: Combination,
        accepted: usize,
        expected: usize,
    },
    /// The run hit the step ceiling.
    Incomplete {
        combination: Combination,
        submissions: usize,
    },
}

/// Decisions a flawless learner makes to sort `len` values.
#[must_use]
pub const fn decision_bound(algorithm: Algorithm, len: usize) -> usize {
    if len < 2 {
        return 0;
    }
    match algorithm {
        Algorithm::Bubble => len * (len - 1) / 2,
        // One pick plus one placement per unsettled element.
        Algorithm::Insertion => 2 * (len - 1),
        Algorithm::Selection => len - 1,
    }
}

// ── Oracle ────────────────────────────────────────────────────────────────────

/// Checks a [`SimulationResult`] against the engines' invariants.
///
/// 1. **Sortedness**: completed runs end in policy order.
/// 2. **Permutation**: no value is lost or invented.
/// 3. **Rejection idempotence**: refused actions change nothing and refuse again.
/// 4. **Convergence symmetry**: Left and Right agree per algorithm and order.
/// 5. **Decision bound**: completed runs take the algorithm's exact step count.
pub struct SortOracle;

impl SortOracle {
    #[must_use]
    pub fn check_all(result: &SimulationResult) -> OracleResult {
        let per_run = result.runs.iter().fold(OracleResult::pass(), |acc, run| {
            acc.merge(Self::check_completion(run))
                .merge(Self::check_sortedness(run))
                .merge(Self::check_permutation(run, &result.initial))
                .merge(Self::check_decision_bound(run, result.initial.len()))
        });

        per_run
            .merge(Self::check_rejections(result))
            .merge(Self::check_convergence_symmetry(&result.runs))
    }

    #[must_use]
    pub fn check_completion(run: &RunRecord) -> OracleResult {
        if run.complete {
            return OracleResult::pass();
        }
        OracleResult::fail(vec![InvariantViolation::Incomplete {
            combination: run.combination,
            submissions: run.submissions,
        }])
    }

    #[must_use]
    pub fn check_sortedness(run: &RunRecord) -> OracleResult {
        if !run.complete || run.combination.order.is_ordered(&run.final_values) {
            return OracleResult::pass();
        }
        OracleResult::fail(vec![InvariantViolation::Sortedness {
            combination: run.combination,
            final_values: run.final_values.clone(),
        }])
    }

    #[must_use]
    pub fn check_permutation(run: &RunRecord, initial: &[i32]) -> OracleResult {
        let mut expected = initial.to_vec();
        let mut actual = run.final_values.clone();
        expected.sort_unstable();
        actual.sort_unstable();
        if expected == actual {
            return OracleResult::pass();
        }
        OracleResult::fail(vec![InvariantViolation::Permutation {
            combination: run.combination,
            initial: initial.to_vec(),
            final_values: run.final_values.clone(),
        }])
    }

    #[must_use]
    pub fn check_decision_bound(run: &RunRecord, len: usize) -> OracleResult {
        let expected = decision_bound(run.combination.algorithm, len);
        if !run.complete || run.accepted == expected {
            return OracleResult::pass();
        }
        OracleResult::fail(vec![InvariantViolation::DecisionBound {
            combination: run.combination,
            accepted: run.accepted,
            expected,
        }])
    }

    /// Scan the trace for mistakes that were not cleanly refused.
    #[must_use]
    pub fn check_rejections(result: &SimulationResult) -> OracleResult {
        let violations = result
            .trace
            .iter()
            .filter_map(|event| {
                let combination = event.combination;
                let step = event.step;
                match event.kind {
                    TraceEventKind::Rejected {
                        action,
                        first,
                        repeat,
                        state_unchanged,
                    } if repeat != Some(first) || !state_unchanged => {
                        Some(InvariantViolation::RejectionIdempotence {
                            combination,
                            step,
                            action: action.to_string(),
                        })
                    }
                    TraceEventKind::MistakeAccepted { action } => {
                        Some(InvariantViolation::MistakeAccepted {
                            combination,
                            step,
                            action: action.to_string(),
                        })
                    }
                    TraceEventKind::Refused { action, .. } => {
                        Some(InvariantViolation::CorrectRefused {
                            combination,
                            step,
                            action: action.to_string(),
                        })
                    }
                    _ => None,
                }
            })
            .collect();
        OracleResult::from_violations(violations)
    }

    /// Compare the Left and Right runs of every algorithm/order pair.
    #[must_use]
    pub fn check_convergence_symmetry(runs: &[RunRecord]) -> OracleResult {
        let find = |algorithm, order, convergence| {
            runs.iter().find(|run| {
                run.combination
                    == Combination {
                        algorithm,
                        order,
                        convergence,
                    }
            })
        };

        let mut violations = Vec::new();
        for &algorithm in &Algorithm::ALL {
            for order in [OrderDirection::Ascending, OrderDirection::Descending] {
                let left = find(algorithm, order, ConvergenceDirection::Left);
                let right = find(algorithm, order, ConvergenceDirection::Right);
                let (Some(left), Some(right)) = (left, right) else {
                    continue;
                };
                if left.complete && right.complete && left.final_values != right.final_values {
                    violations.push(InvariantViolation::ConvergenceSymmetry {
                        algorithm,
                        order,
                        left: left.final_values.clone(),
                        right: right.final_values.clone(),
                    });
                }
            }
        }
        OracleResult::from_violations(violations)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
