//! Descriptors an engine hands to the presentation layer.
//!
//! Nothing here refers to rendering. A prompt says which indices matter and
//! what question the learner is answering; a step outcome says what the engine
//! just did to the sequence.

use std::ops::Range;

use serde::Serialize;

use crate::order::{Algorithm, ConvergenceDirection, OrderDirection};
use crate::sequence::Sequence;

/// A candidate insertion slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    /// Slot number, counted in index order across the settled region.
    pub slot: usize,
    /// Absolute index of the settled element this slot sits before;
    /// `None` for the slot after the last settled element.
    pub before: Option<usize>,
}

/// What the learner is being asked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PromptKind {
    /// Bubble: swap or skip the active pair.
    Compare { left: usize, right: usize },
    /// Insertion: pick the boundary-adjacent element.
    Pick { index: usize },
    /// Insertion: name the slot for the picked value.
    Place {
        value: i32,
        from: usize,
        slots: Vec<Slot>,
    },
    /// Selection: choose the extremal element within `range`.
    Select { range: Range<usize> },
    Complete,
}

impl PromptKind {
    /// Sequence indices the presentation layer may offer as click targets.
    ///
    /// For `Place` these are the settled elements a slot sits before; the
    /// trailing slot has no element of its own and is not listed.
    #[must_use]
    pub fn eligible_indices(&self) -> Vec<usize> {
        match self {
            Self::Compare { left, right } => vec![*left, *right],
            Self::Pick { index } => vec![*index],
            Self::Place { slots, .. } => slots.iter().filter_map(|slot| slot.before).collect(),
            Self::Select { range } => range.clone().collect(),
            Self::Complete => Vec::new(),
        }
    }
}

/// Snapshot of an engine's current question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptDescriptor {
    pub algorithm: Algorithm,
    pub order: OrderDirection,
    pub convergence: ConvergenceDirection,
    pub values: Vec<i32>,
    /// Index range already in final position.
    pub settled: Range<usize>,
    pub kind: PromptKind,
    pub instruction: String,
}

impl PromptDescriptor {
    pub(crate) fn new(
        algorithm: Algorithm,
        sequence: &Sequence,
        settled: Range<usize>,
        kind: PromptKind,
    ) -> Self {
        let instruction = instruction_for(&kind, sequence);
        Self {
            algorithm,
            order: sequence.order(),
            convergence: sequence.convergence(),
            values: sequence.values().to_vec(),
            settled,
            kind,
            instruction,
        }
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self.kind, PromptKind::Complete)
    }
}

fn instruction_for(kind: &PromptKind, sequence: &Sequence) -> String {
    let value_at = |index: usize| sequence.get(index).unwrap_or_default();
    match kind {
        PromptKind::Compare { left, right } => format!(
            "Compare {} and {}: swap or skip?",
            value_at(*left),
            value_at(*right)
        ),
        PromptKind::Pick { index } => {
            format!("Pick {} (index {index}) to insert", value_at(*index))
        }
        PromptKind::Place { value, slots, .. } => format!(
            "Choose the slot for {value} (0..={})",
            slots.len().saturating_sub(1)
        ),
        PromptKind::Select { range } => {
            let which = match (sequence.order(), sequence.convergence()) {
                (OrderDirection::Ascending, ConvergenceDirection::Left)
                | (OrderDirection::Descending, ConvergenceDirection::Right) => "smallest",
                (OrderDirection::Ascending, ConvergenceDirection::Right)
                | (OrderDirection::Descending, ConvergenceDirection::Left) => "largest",
            };
            format!(
                "Select the {which} value among indices {}..={}",
                range.start,
                range.end.saturating_sub(1)
            )
        }
        PromptKind::Complete => "Sorted!".to_string(),
    }
}

/// What an accepted action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    Swapped { left: usize, right: usize },
    Kept { left: usize, right: usize },
    Picked { index: usize, value: i32 },
    Inserted { from: usize, to: usize, value: i32 },
    Selected { from: usize, to: usize, value: i32 },
}

impl Effect {
    /// Whether the effect has a visible settle that the pacing hook waits on.
    #[must_use]
    pub const fn settles(self) -> bool {
        matches!(
            self,
            Self::Swapped { .. } | Self::Inserted { .. } | Self::Selected { .. }
        )
    }
}

/// Result of an accepted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub effect: Effect,
    /// Settled region after the step.
    pub settled: Range<usize>,
    pub complete: bool,
}
