//! Extremal-element selection quiz.

use std::ops::Range;

use serde::Serialize;

use crate::error::{StepError, Violation};
use crate::order::{Algorithm, ConvergenceDirection};
use crate::prompt::{Effect, PromptDescriptor, PromptKind, StepOutcome};
use crate::sequence::Sequence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "index", rename_all = "lowercase")]
pub enum SelectionAction {
    Select(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEngine {
    sequence: Sequence,
    /// Next slot to fill: grows up from 0 for Left, down from `len - 1` for Right.
    sorted_index: usize,
    complete: bool,
}

impl SelectionEngine {
    #[must_use]
    pub const fn new(sequence: Sequence) -> Self {
        let len = sequence.len();
        let sorted_index = match sequence.convergence() {
            ConvergenceDirection::Left => 0,
            ConvergenceDirection::Right => len.saturating_sub(1),
        };
        Self {
            sequence,
            sorted_index,
            complete: len < 2,
        }
    }

    #[must_use]
    pub const fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    #[must_use]
    pub const fn sorted_index(&self) -> usize {
        self.sorted_index
    }

    #[must_use]
    pub const fn settled(&self) -> Range<usize> {
        let len = self.sequence.len();
        if self.complete {
            return 0..len;
        }
        match self.sequence.convergence() {
            ConvergenceDirection::Left => 0..self.sorted_index,
            ConvergenceDirection::Right => self.sorted_index + 1..len,
        }
    }

    /// Indices the learner may select from.
    #[must_use]
    pub const fn eligible(&self) -> Range<usize> {
        if self.complete {
            return 0..0;
        }
        match self.sequence.convergence() {
            ConvergenceDirection::Left => self.sorted_index..self.sequence.len(),
            ConvergenceDirection::Right => 0..self.sorted_index + 1,
        }
    }

    /// The value that belongs in the next settled slot.
    ///
    /// Left convergence wants the value that precedes all others; Right wants
    /// the value all others precede.
    #[must_use]
    pub fn extremal(&self) -> Option<i32> {
        let values = &self.sequence.values()[self.eligible()];
        let (&first, rest) = values.split_first()?;
        let convergence = self.sequence.convergence();
        Some(rest.iter().fold(first, |best, &value| {
            let better = match convergence {
                ConvergenceDirection::Left => self.sequence.precedes(value, best),
                ConvergenceDirection::Right => self.sequence.precedes(best, value),
            };
            if better { value } else { best }
        }))
    }

    #[must_use]
    pub fn correct_action(&self) -> Option<SelectionAction> {
        let extremal = self.extremal()?;
        self.eligible()
            .find(|&index| self.sequence.get(index) == Some(extremal))
            .map(SelectionAction::Select)
    }

    #[must_use]
    pub fn current_prompt(&self) -> PromptDescriptor {
        let kind = if self.complete {
            PromptKind::Complete
        } else {
            PromptKind::Select {
                range: self.eligible(),
            }
        };
        PromptDescriptor::new(Algorithm::Selection, &self.sequence, self.settled(), kind)
    }

    /// Accept any index holding the extremal value and swap it into place.
    ///
    /// # Errors
    ///
    /// - [`StepError::InvalidAction`] when the value is not extremal.
    /// - [`StepError::IllegalTarget`] when the index is outside the unsettled region.
    /// - [`StepError::AlreadyComplete`] once sorted.
    pub fn submit(&mut self, action: SelectionAction) -> Result<StepOutcome, StepError> {
        if self.complete {
            return Err(StepError::AlreadyComplete);
        }
        let SelectionAction::Select(index) = action;
        let eligible = self.eligible();
        if !eligible.contains(&index) {
            return Err(StepError::IllegalTarget { index, eligible });
        }
        let extremal = self.extremal().ok_or(StepError::AlreadyComplete)?;
        let picked = self
            .sequence
            .get(index)
            .ok_or(StepError::IllegalTarget { index, eligible })?;
        if picked != extremal {
            return Err(StepError::InvalidAction(Violation::NotExtremal {
                picked,
                extremal,
            }));
        }

        let to = self.sorted_index;
        self.sequence.swap(index, to);
        tracing::debug!(from = index, to, value = picked, "selection accepted");
        self.advance();

        Ok(StepOutcome {
            effect: Effect::Selected {
                from: index,
                to,
                value: picked,
            },
            settled: self.settled(),
            complete: self.complete,
        })
    }

    fn advance(&mut self) {
        let len = self.sequence.len();
        match self.sequence.convergence() {
            ConvergenceDirection::Left => {
                self.sorted_index += 1;
                self.complete = self.sorted_index >= len - 1;
            }
            ConvergenceDirection::Right => {
                self.sorted_index -= 1;
                self.complete = self.sorted_index == 0;
            }
        }
        if self.complete {
            tracing::info!(len, "selection sort complete");
        }
    }
}
