//! Adjacent compare-and-swap quiz.
//!
//! Under Right convergence the cursor walks up from index 0 and the largest
//! remaining value (per the order) bubbles to the high end; under Left
//! convergence the cursor walks down from the last index and the settled
//! region grows from index 0.

use std::ops::Range;

use serde::Serialize;

use crate::error::{StepError, Violation};
use crate::order::{Algorithm, ConvergenceDirection};
use crate::prompt::{Effect, PromptDescriptor, PromptKind, StepOutcome};
use crate::sequence::Sequence;

/// Learner's verdict on the active pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BubbleAction {
    Swap,
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BubbleEngine {
    sequence: Sequence,
    /// Number of settled elements.
    pass: usize,
    /// Scan cursor; see [`BubbleEngine::active_pair`].
    cursor: usize,
    complete: bool,
}

impl BubbleEngine {
    #[must_use]
    pub const fn new(sequence: Sequence) -> Self {
        let len = sequence.len();
        let cursor = match sequence.convergence() {
            ConvergenceDirection::Right => 0,
            ConvergenceDirection::Left => len.saturating_sub(1),
        };
        Self {
            sequence,
            pass: 0,
            cursor,
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
    pub const fn pass(&self) -> usize {
        self.pass
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Indices of the pair under comparison, lower index first.
    #[must_use]
    pub const fn active_pair(&self) -> Option<(usize, usize)> {
        if self.complete {
            return None;
        }
        match self.sequence.convergence() {
            ConvergenceDirection::Right => Some((self.cursor, self.cursor + 1)),
            ConvergenceDirection::Left => Some((self.cursor - 1, self.cursor)),
        }
    }

    #[must_use]
    pub const fn settled(&self) -> Range<usize> {
        let len = self.sequence.len();
        if self.complete {
            return 0..len;
        }
        match self.sequence.convergence() {
            ConvergenceDirection::Right => len - self.pass..len,
            ConvergenceDirection::Left => 0..self.pass,
        }
    }

    #[must_use]
    pub fn correct_action(&self) -> Option<BubbleAction> {
        let (left, right) = self.active_values()?;
        Some(if self.should_swap(left, right) {
            BubbleAction::Swap
        } else {
            BubbleAction::Skip
        })
    }

    #[must_use]
    pub fn current_prompt(&self) -> PromptDescriptor {
        let kind = self
            .active_pair()
            .map_or(PromptKind::Complete, |(left, right)| PromptKind::Compare {
                left,
                right,
            });
        PromptDescriptor::new(Algorithm::Bubble, &self.sequence, self.settled(), kind)
    }

    /// Validate the learner's verdict and, if correct, apply it.
    ///
    /// # Errors
    ///
    /// [`StepError::InvalidAction`] when the verdict is wrong (nothing changes),
    /// [`StepError::AlreadyComplete`] once the sequence is sorted.
    pub fn submit(&mut self, action: BubbleAction) -> Result<StepOutcome, StepError> {
        let Some((left, right)) = self.active_pair() else {
            return Err(StepError::AlreadyComplete);
        };
        let (left_value, right_value) = self.active_values().ok_or(StepError::AlreadyComplete)?;
        let should_swap = self.should_swap(left_value, right_value);

        match (action, should_swap) {
            (BubbleAction::Swap, false) => {
                return Err(StepError::InvalidAction(Violation::NoSwapNeeded {
                    left: left_value,
                    right: right_value,
                }));
            }
            (BubbleAction::Skip, true) => {
                return Err(StepError::InvalidAction(Violation::SwapNeeded {
                    left: left_value,
                    right: right_value,
                }));
            }
            _ => {}
        }

        let effect = if should_swap {
            self.sequence.swap(left, right);
            Effect::Swapped { left, right }
        } else {
            Effect::Kept { left, right }
        };
        tracing::debug!(left, right, swapped = should_swap, "bubble step accepted");

        self.advance();

        Ok(StepOutcome {
            effect,
            settled: self.settled(),
            complete: self.complete,
        })
    }

    fn active_values(&self) -> Option<(i32, i32)> {
        let (left, right) = self.active_pair()?;
        Some((self.sequence.get(left)?, self.sequence.get(right)?))
    }

    const fn should_swap(&self, left: i32, right: i32) -> bool {
        left != right && !self.sequence.precedes(left, right)
    }

    fn advance(&mut self) {
        let len = self.sequence.len();
        match self.sequence.convergence() {
            ConvergenceDirection::Right => {
                self.cursor += 1;
                if self.cursor >= len - 1 - self.pass {
                    tracing::debug!(index = len - 1 - self.pass, "bubble pass settled");
                    self.pass += 1;
                    self.cursor = 0;
                }
            }
            ConvergenceDirection::Left => {
                self.cursor -= 1;
                if self.cursor <= self.pass {
                    tracing::debug!(index = self.pass, "bubble pass settled");
                    self.pass += 1;
                    self.cursor = len - 1;
                }
            }
        }

        if self.pass >= len - 1 {
            // The last unsettled element is in place by elimination.
            self.complete = true;
            tracing::info!(len, "bubble sort complete");
        }
    }
}
