//! Pick-then-place insertion quiz.
//!
//! Each round has two phases. The learner first picks the single unsettled
//! element next to the settled region, then names the slot it belongs in.
//! Slots are numbered in index order across the settled region regardless of
//! convergence direction.

use std::ops::Range;

use serde::Serialize;

use crate::error::{StepError, Violation};
use crate::order::{Algorithm, ConvergenceDirection};
use crate::prompt::{Effect, PromptDescriptor, PromptKind, Slot, StepOutcome};
use crate::sequence::Sequence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "index", rename_all = "lowercase")]
pub enum InsertionAction {
    /// Pick the element at an absolute index.
    Pick(usize),
    /// Place the picked value in a slot (see [`Slot::slot`]).
    Place(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    AwaitingPick,
    Placing { value: i32, from: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionEngine {
    sequence: Sequence,
    /// Inner edge of the settled region: `[0, boundary]` for Left,
    /// `[boundary, len - 1]` for Right.
    boundary: usize,
    phase: Phase,
    complete: bool,
}

impl InsertionEngine {
    #[must_use]
    pub const fn new(sequence: Sequence) -> Self {
        let len = sequence.len();
        let boundary = match sequence.convergence() {
            ConvergenceDirection::Left => 0,
            ConvergenceDirection::Right => len.saturating_sub(1),
        };
        Self {
            sequence,
            boundary,
            phase: Phase::AwaitingPick,
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
    pub const fn boundary(&self) -> usize {
        self.boundary
    }

    /// The value and original index of an in-flight pick.
    #[must_use]
    pub const fn picked(&self) -> Option<(i32, usize)> {
        match self.phase {
            Phase::AwaitingPick => None,
            Phase::Placing { value, from } => Some((value, from)),
        }
    }

    #[must_use]
    pub const fn settled(&self) -> Range<usize> {
        let len = self.sequence.len();
        if self.complete {
            return 0..len;
        }
        match self.sequence.convergence() {
            ConvergenceDirection::Left => 0..self.boundary + 1,
            ConvergenceDirection::Right => self.boundary..len,
        }
    }

    /// The only index that may be picked next.
    #[must_use]
    pub const fn pick_target(&self) -> Option<usize> {
        if self.complete {
            return None;
        }
        match self.sequence.convergence() {
            ConvergenceDirection::Left => Some(self.boundary + 1),
            ConvergenceDirection::Right => Some(self.boundary - 1),
        }
    }

    #[must_use]
    pub fn slots(&self) -> Vec<Slot> {
        let settled = self.settled();
        let count = settled.len();
        (0..=count)
            .map(|slot| Slot {
                slot,
                before: (slot < count).then_some(settled.start + slot),
            })
            .collect()
    }

    #[must_use]
    pub fn correct_action(&self) -> Option<InsertionAction> {
        if self.complete {
            return None;
        }
        match self.phase {
            Phase::AwaitingPick => self.pick_target().map(InsertionAction::Pick),
            Phase::Placing { value, .. } => Some(InsertionAction::Place(self.correct_slot(value))),
        }
    }

    #[must_use]
    pub fn current_prompt(&self) -> PromptDescriptor {
        let kind = if self.complete {
            PromptKind::Complete
        } else {
            match self.phase {
                Phase::AwaitingPick => self
                    .pick_target()
                    .map_or(PromptKind::Complete, |index| PromptKind::Pick { index }),
                Phase::Placing { value, from } => PromptKind::Place {
                    value,
                    from,
                    slots: self.slots(),
                },
            }
        };
        PromptDescriptor::new(Algorithm::Insertion, &self.sequence, self.settled(), kind)
    }

    /// Apply a pick or a placement.
    ///
    /// # Errors
    ///
    /// - [`StepError::InvalidAction`] for a wrong slot; the pick stays in flight.
    /// - [`StepError::IllegalTarget`] for a pick other than the boundary-adjacent
    ///   element or a slot number past the last candidate.
    /// - [`StepError::WrongPhase`] for a pick during placement or vice versa.
    /// - [`StepError::AlreadyComplete`] once sorted.
    pub fn submit(&mut self, action: InsertionAction) -> Result<StepOutcome, StepError> {
        if self.complete {
            return Err(StepError::AlreadyComplete);
        }
        let effect = match action {
            InsertionAction::Pick(index) => self.pick(index)?,
            InsertionAction::Place(slot) => self.place(slot)?,
        };
        Ok(StepOutcome {
            effect,
            settled: self.settled(),
            complete: self.complete,
        })
    }

    fn pick(&mut self, index: usize) -> Result<Effect, StepError> {
        if self.phase != Phase::AwaitingPick {
            return Err(StepError::WrongPhase {
                expected: "placing the picked value",
            });
        }
        let target = self.pick_target().ok_or(StepError::AlreadyComplete)?;
        if index != target {
            return Err(StepError::IllegalTarget {
                index,
                eligible: target..target + 1,
            });
        }
        let value = self
            .sequence
            .get(index)
            .ok_or(StepError::IllegalTarget {
                index,
                eligible: target..target + 1,
            })?;

        self.phase = Phase::Placing { value, from: index };
        tracing::debug!(index, value, "insertion pick accepted");
        Ok(Effect::Picked { index, value })
    }

    fn place(&mut self, slot: usize) -> Result<Effect, StepError> {
        let Phase::Placing { value, from } = self.phase else {
            return Err(StepError::WrongPhase {
                expected: "awaiting a pick",
            });
        };
        let settled = self.settled();
        if slot > settled.len() {
            return Err(StepError::IllegalTarget {
                index: slot,
                eligible: 0..settled.len() + 1,
            });
        }
        if slot != self.correct_slot(value) {
            return Err(StepError::InvalidAction(Violation::WrongSlot { value, slot }));
        }

        let to = self.sequence.relocate(from, settled.start + slot);
        self.phase = Phase::AwaitingPick;
        self.grow();
        tracing::debug!(from, to, value, "insertion placement accepted");

        Ok(Effect::Inserted { from, to, value })
    }

    /// First slot, scanning the settled region in index order, whose element
    /// the value precedes; otherwise the slot after the last settled element.
    fn correct_slot(&self, value: i32) -> usize {
        let settled = self.settled();
        let count = settled.len();
        self.sequence.values()[settled]
            .iter()
            .position(|&other| self.sequence.precedes(value, other))
            .unwrap_or(count)
    }

    fn grow(&mut self) {
        let len = self.sequence.len();
        match self.sequence.convergence() {
            ConvergenceDirection::Left => {
                self.boundary += 1;
                self.complete = self.boundary >= len - 1;
            }
            ConvergenceDirection::Right => {
                self.boundary -= 1;
                self.complete = self.boundary == 0;
            }
        }
        if self.complete {
            tracing::info!(len, "insertion sort complete");
        }
    }
}
