use serde::Serialize;
use sortdrill_core::{Action, Engine, PromptKind};

use crate::rng::DeterministicRng;

/// One answer from a simulated learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub action: Action,
    /// The learner chose this answer knowing it was wrong.
    pub deliberate_mistake: bool,
}

/// A learner that knows the right answer but sometimes gives a wrong one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedLearner {
    mistake_percent: u8,
    rng: DeterministicRng,
}

impl SimulatedLearner {
    #[must_use]
    pub const fn new(seed: u64, mistake_percent: u8) -> Self {
        Self {
            mistake_percent,
            rng: DeterministicRng::new(seed),
        }
    }

    /// Answer the engine's current prompt; `None` once the engine is complete.
    ///
    /// Mistakes are only made when a learner-facing wrong answer exists
    /// (an insertion pick, for instance, has none).
    pub fn answer(&mut self, engine: &Engine) -> Option<Answer> {
        let correct = engine.correct_action()?;
        if self.rng.hit_rate_percent(self.mistake_percent) {
            let wrong = wrong_actions(engine);
            if let Some(action) = self.rng.choose(&wrong) {
                return Some(Answer {
                    action,
                    deliberate_mistake: true,
                });
            }
        }
        Some(Answer {
            action: correct,
            deliberate_mistake: false,
        })
    }
}

/// Every wrong answer the engine would reject as a learner mistake.
#[must_use]
pub fn wrong_actions(engine: &Engine) -> Vec<Action> {
    let Some(correct) = engine.correct_action() else {
        return Vec::new();
    };
    let prompt = engine.current_prompt();
    match (prompt.kind, correct) {
        (PromptKind::Compare { .. }, Action::Swap) => vec![Action::Skip],
        (PromptKind::Compare { .. }, Action::Skip) => vec![Action::Swap],
        (PromptKind::Place { slots, .. }, Action::Place(right)) => slots
            .iter()
            .map(|slot| slot.slot)
            .filter(|&slot| slot != right)
            .map(Action::Place)
            .collect(),
        (PromptKind::Select { range }, Action::Select(right)) => {
            let extremal = prompt.values.get(right).copied();
            range
                .filter(|&index| prompt.values.get(index).copied() != extremal)
                .map(Action::Select)
                .collect()
        }
        _ => Vec::new(),
    }
}
