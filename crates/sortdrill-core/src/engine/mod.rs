//! Step machines for the three quiz algorithms.
//!
//! Each algorithm is its own hand-written machine with its own action type.
//! [`Engine`] is the closed set of them behind one step-machine surface so a
//! session controller can hold "whichever engine is active" without dynamic
//! dispatch.

pub mod bubble;
pub mod insertion;
pub mod selection;

use std::fmt;
use std::ops::Range;

use serde::Serialize;

pub use bubble::{BubbleAction, BubbleEngine};
pub use insertion::{InsertionAction, InsertionEngine};
pub use selection::{SelectionAction, SelectionEngine};

use crate::error::StepError;
use crate::order::Algorithm;
use crate::prompt::{PromptDescriptor, StepOutcome};
use crate::sequence::Sequence;

/// Any learner action, across all algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "index", rename_all = "lowercase")]
pub enum Action {
    Swap,
    Skip,
    Pick(usize),
    Place(usize),
    Select(usize),
}

impl From<BubbleAction> for Action {
    fn from(action: BubbleAction) -> Self {
        match action {
            BubbleAction::Swap => Self::Swap,
            BubbleAction::Skip => Self::Skip,
        }
    }
}

impl From<InsertionAction> for Action {
    fn from(action: InsertionAction) -> Self {
        match action {
            InsertionAction::Pick(index) => Self::Pick(index),
            InsertionAction::Place(slot) => Self::Place(slot),
        }
    }
}

impl From<SelectionAction> for Action {
    fn from(action: SelectionAction) -> Self {
        match action {
            SelectionAction::Select(index) => Self::Select(index),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Swap => f.write_str("swap"),
            Self::Skip => f.write_str("skip"),
            Self::Pick(index) => write!(f, "pick {index}"),
            Self::Place(slot) => write!(f, "place {slot}"),
            Self::Select(index) => write!(f, "select {index}"),
        }
    }
}

/// The active step machine of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Engine {
    Bubble(BubbleEngine),
    Insertion(InsertionEngine),
    Selection(SelectionEngine),
}

impl Engine {
    /// Build a fresh engine that takes ownership of `sequence`.
    #[must_use]
    pub fn initialize(algorithm: Algorithm, sequence: Sequence) -> Self {
        tracing::debug!(
            %algorithm,
            len = sequence.len(),
            order = %sequence.order(),
            convergence = %sequence.convergence(),
            "engine initialized"
        );
        match algorithm {
            Algorithm::Bubble => Self::Bubble(BubbleEngine::new(sequence)),
            Algorithm::Insertion => Self::Insertion(InsertionEngine::new(sequence)),
            Algorithm::Selection => Self::Selection(SelectionEngine::new(sequence)),
        }
    }

    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        match self {
            Self::Bubble(_) => Algorithm::Bubble,
            Self::Insertion(_) => Algorithm::Insertion,
            Self::Selection(_) => Algorithm::Selection,
        }
    }

    /// Validate and, when correct, apply a learner action.
    ///
    /// # Errors
    ///
    /// Whatever the active engine reports, plus
    /// [`StepError::UnsupportedAction`] for an action of another algorithm.
    pub fn submit_action(&mut self, action: Action) -> Result<StepOutcome, StepError> {
        let unsupported = StepError::UnsupportedAction {
            algorithm: self.algorithm(),
        };
        match (self, action) {
            (Self::Bubble(engine), Action::Swap) => engine.submit(BubbleAction::Swap),
            (Self::Bubble(engine), Action::Skip) => engine.submit(BubbleAction::Skip),
            (Self::Insertion(engine), Action::Pick(index)) => {
                engine.submit(InsertionAction::Pick(index))
            }
            (Self::Insertion(engine), Action::Place(slot)) => {
                engine.submit(InsertionAction::Place(slot))
            }
            (Self::Selection(engine), Action::Select(index)) => {
                engine.submit(SelectionAction::Select(index))
            }
            _ => Err(unsupported),
        }
    }

    #[must_use]
    pub fn current_prompt(&self) -> PromptDescriptor {
        match self {
            Self::Bubble(engine) => engine.current_prompt(),
            Self::Insertion(engine) => engine.current_prompt(),
            Self::Selection(engine) => engine.current_prompt(),
        }
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        match self {
            Self::Bubble(engine) => engine.is_complete(),
            Self::Insertion(engine) => engine.is_complete(),
            Self::Selection(engine) => engine.is_complete(),
        }
    }

    /// The action the engine would accept next, or `None` once complete.
    #[must_use]
    pub fn correct_action(&self) -> Option<Action> {
        match self {
            Self::Bubble(engine) => engine.correct_action().map(Action::from),
            Self::Insertion(engine) => engine.correct_action().map(Action::from),
            Self::Selection(engine) => engine.correct_action().map(Action::from),
        }
    }

    #[must_use]
    pub const fn sequence(&self) -> &Sequence {
        match self {
            Self::Bubble(engine) => engine.sequence(),
            Self::Insertion(engine) => engine.sequence(),
            Self::Selection(engine) => engine.sequence(),
        }
    }

    #[must_use]
    pub const fn settled(&self) -> Range<usize> {
        match self {
            Self::Bubble(engine) => engine.settled(),
            Self::Insertion(engine) => engine.settled(),
            Self::Selection(engine) => engine.settled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{ConvergenceDirection, OrderDirection};

    fn sequence(values: &[i32]) -> Sequence {
        Sequence::new(
            values.to_vec(),
            OrderDirection::Ascending,
            ConvergenceDirection::Left,
        )
    }

    #[test]
    fn initialize_selects_the_variant() {
        for algorithm in Algorithm::ALL {
            let engine = Engine::initialize(algorithm, sequence(&[3, 1, 2]));
            assert_eq!(engine.algorithm(), algorithm);
            assert_eq!(engine.current_prompt().algorithm, algorithm);
        }
    }

    #[test]
    fn foreign_actions_are_unsupported() {
        let mut engine = Engine::initialize(Algorithm::Selection, sequence(&[3, 1, 2]));
        assert_eq!(
            engine.submit_action(Action::Swap),
            Err(StepError::UnsupportedAction {
                algorithm: Algorithm::Selection
            })
        );
        assert_eq!(engine.sequence().values(), &[3, 1, 2]);
    }

    #[test]
    fn correct_actions_drive_every_engine_to_completion() {
        for algorithm in Algorithm::ALL {
            let mut engine = Engine::initialize(algorithm, sequence(&[7, 3, 9, 3, 1]));
            while let Some(action) = engine.correct_action() {
                engine.submit_action(action).unwrap();
            }
            assert!(engine.is_complete());
            assert_eq!(engine.sequence().values(), &[1, 3, 3, 7, 9]);
            assert_eq!(engine.settled(), 0..5);
        }
    }

    const EMPTY: Sequence = Sequence::new(
        Vec::new(),
        OrderDirection::Ascending,
        ConvergenceDirection::Right,
    );
    const BUBBLE: BubbleEngine = BubbleEngine::new(EMPTY);
    const INSERTION: InsertionEngine = InsertionEngine::new(EMPTY);
    const SELECTION: SelectionEngine = SelectionEngine::new(EMPTY);

    #[test]
    fn engines_build_in_const_context() {
        assert!(BUBBLE.is_complete());
        assert!(INSERTION.is_complete());
        assert!(SELECTION.is_complete());
        assert_eq!(BUBBLE.settled(), 0..0);
        assert_eq!(SELECTION.eligible(), 0..0);
        assert!(Engine::Insertion(INSERTION).settled().is_empty());
    }

    #[test]
    fn action_display_is_command_like() {
        assert_eq!(Action::Swap.to_string(), "swap");
        assert_eq!(Action::Place(2).to_string(), "place 2");
        assert_eq!(Action::from(SelectionAction::Select(4)).to_string(), "select 4");
    }
}
