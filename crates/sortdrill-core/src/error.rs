//! Why an engine refused an action.
//!
//! [`Violation`] names the rule a learner broke. [`StepError`] wraps it
//! alongside the contract errors a presentation layer can trigger, and
//! [`ErrorCode`] gives every refusal a stable `E####` identifier.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::order::Algorithm;

/// Machine-readable error codes for front-ends that branch on failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    NoSwapNeeded,
    SwapNeeded,
    WrongSlot,
    NotExtremal,
    IllegalTarget,
    WrongPhase,
    UnsupportedAction,
    AlreadyComplete,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NoSwapNeeded => "E1001",
            Self::SwapNeeded => "E1002",
            Self::WrongSlot => "E1003",
            Self::NotExtremal => "E1004",
            Self::IllegalTarget => "E2001",
            Self::WrongPhase => "E2002",
            Self::UnsupportedAction => "E2003",
            Self::AlreadyComplete => "E3001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NoSwapNeeded => "No swap needed",
            Self::SwapNeeded => "A swap is needed",
            Self::WrongSlot => "Wrong insertion slot",
            Self::NotExtremal => "Not the extremal element",
            Self::IllegalTarget => "Index is not an eligible target",
            Self::WrongPhase => "Action does not fit the current phase",
            Self::UnsupportedAction => "Action does not belong to this algorithm",
            Self::AlreadyComplete => "Session already complete",
        }
    }

    /// Optional remediation hint that can be surfaced to the learner.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NoSwapNeeded => Some("The pair is already in order; skip it."),
            Self::SwapNeeded => Some("The pair is out of order; swap it."),
            Self::WrongSlot => {
                Some("Insert before the first settled value the picked value precedes.")
            }
            Self::NotExtremal => Some("Look for the value that belongs in the next settled slot."),
            Self::IllegalTarget | Self::WrongPhase | Self::UnsupportedAction => None,
            Self::AlreadyComplete => Some("Start a new session to keep practicing."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The specific rule a learner's answer broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Violation {
    /// Learner chose to swap a pair that is already in order.
    NoSwapNeeded { left: i32, right: i32 },
    /// Learner skipped a pair that is out of order.
    SwapNeeded { left: i32, right: i32 },
    /// Learner named the wrong slot for the picked value.
    WrongSlot { value: i32, slot: usize },
    /// Learner selected a value other than the extremal one.
    NotExtremal { picked: i32, extremal: i32 },
}

impl Violation {
    #[must_use]
    pub const fn code(self) -> ErrorCode {
        match self {
            Self::NoSwapNeeded { .. } => ErrorCode::NoSwapNeeded,
            Self::SwapNeeded { .. } => ErrorCode::SwapNeeded,
            Self::WrongSlot { .. } => ErrorCode::WrongSlot,
            Self::NotExtremal { .. } => ErrorCode::NotExtremal,
        }
    }

    /// Human-facing explanation derived from the broken rule.
    #[must_use]
    pub fn reason(self) -> String {
        match self {
            Self::NoSwapNeeded { left, right } => {
                format!("no swap needed: {left} and {right} are already in order")
            }
            Self::SwapNeeded { left, right } => {
                format!("swap needed: {left} and {right} are out of order")
            }
            Self::WrongSlot { value, slot } => {
                format!("wrong insertion slot: {value} does not belong in slot {slot}")
            }
            Self::NotExtremal { picked, extremal } => {
                format!("not the extremal element: picked {picked}, expected {extremal}")
            }
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason())
    }
}

/// Why an engine refused an action.
///
/// Only [`StepError::InvalidAction`] is learner-facing. The rest signal a
/// contract breach by the caller: the presentation layer offered something
/// the engine never made eligible.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    #[error("{0}")]
    InvalidAction(Violation),

    #[error("index {index} is not an eligible target (eligible: {eligible:?})")]
    IllegalTarget { index: usize, eligible: Range<usize> },

    #[error("action not valid while {expected}")]
    WrongPhase { expected: &'static str },

    #[error("action does not apply to {algorithm} sort")]
    UnsupportedAction { algorithm: Algorithm },

    #[error("session already complete")]
    AlreadyComplete,
}

impl StepError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidAction(violation) => violation.code(),
            Self::IllegalTarget { .. } => ErrorCode::IllegalTarget,
            Self::WrongPhase { .. } => ErrorCode::WrongPhase,
            Self::UnsupportedAction { .. } => ErrorCode::UnsupportedAction,
            Self::AlreadyComplete => ErrorCode::AlreadyComplete,
        }
    }

    /// Learner mistakes are recoverable; contract breaches are not.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidAction(_))
    }

    #[must_use]
    pub const fn violation(&self) -> Option<Violation> {
        match self {
            Self::InvalidAction(violation) => Some(*violation),
            _ => None,
        }
    }
}
