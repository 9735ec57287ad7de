//! Session controller: owns the active engine and relays learner actions.
//!
//! This is the only piece that talks to the presentation layer. It asks the
//! [`Presenter`] to redraw after every state change and runs the [`Pacer`]
//! after steps that settle something. Starting a session drops the previous
//! engine before the new one exists, so two engines never share a sequence.

use serde::Serialize;

use crate::config::SessionSettings;
use crate::engine::{Action, Engine};
use crate::error::StepError;
use crate::pacing::Pacer;
use crate::prompt::{PromptDescriptor, StepOutcome};
use crate::sequence::{Sequence, SequenceSource};

/// The excluded presentation layer, seen from the core.
pub trait Presenter {
    /// Render the current prompt. Called after every state change.
    fn redraw(&mut self, prompt: &PromptDescriptor);

    /// Surface a refused action.
    fn reject(&mut self, error: &StepError) {
        let _ = error;
    }
}

/// Running tally for the current session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub attempts: u32,
    pub accepted: u32,
    pub mistakes: u32,
    pub hints: u32,
}

pub struct Session<P, C> {
    presenter: P,
    pacer: C,
    source: Box<dyn SequenceSource>,
    settings: SessionSettings,
    engine: Option<Engine>,
    stats: SessionStats,
}

impl<P: Presenter, C: Pacer> Session<P, C> {
    pub fn new(presenter: P, pacer: C, source: Box<dyn SequenceSource>) -> Self {
        Self {
            presenter,
            pacer,
            source,
            settings: SessionSettings::default(),
            engine: None,
            stats: SessionStats::default(),
        }
    }

    /// Start a session on a freshly generated sequence.
    pub fn start(&mut self, settings: SessionSettings) -> PromptDescriptor {
        let values = self.source.generate(settings.length);
        self.start_with(settings, values)
    }

    /// Start a session on the given values. The length in `settings` is
    /// ignored in favour of `values.len()`.
    pub fn start_with(&mut self, settings: SessionSettings, values: Vec<i32>) -> PromptDescriptor {
        self.engine = None;
        self.settings = SessionSettings {
            length: values.len(),
            ..settings
        };
        self.stats = SessionStats::default();

        tracing::info!(
            algorithm = %settings.algorithm,
            order = %settings.order,
            convergence = %settings.convergence,
            len = values.len(),
            "session started"
        );

        let sequence = Sequence::new(values, settings.order, settings.convergence);
        let engine = self
            .engine
            .insert(Engine::initialize(settings.algorithm, sequence));
        let prompt = engine.current_prompt();
        self.presenter.redraw(&prompt);
        prompt
    }

    /// New sequence, same policies.
    pub fn restart(&mut self) -> PromptDescriptor {
        self.start(self.settings)
    }

    /// Relay a learner action to the active engine.
    ///
    /// # Errors
    ///
    /// Propagates the engine's [`StepError`]; returns
    /// [`StepError::AlreadyComplete`] when no session is active.
    pub fn submit(&mut self, action: Action) -> Result<StepOutcome, StepError> {
        let Some(engine) = self.engine.as_mut() else {
            return Err(StepError::AlreadyComplete);
        };
        self.stats.attempts += 1;

        match engine.submit_action(action) {
            Ok(outcome) => {
                self.stats.accepted += 1;
                if outcome.effect.settles() {
                    self.pacer.settle(&outcome);
                }
                let prompt = engine.current_prompt();
                self.presenter.redraw(&prompt);
                if outcome.complete {
                    tracing::info!(
                        attempts = self.stats.attempts,
                        mistakes = self.stats.mistakes,
                        hints = self.stats.hints,
                        "session complete"
                    );
                }
                Ok(outcome)
            }
            Err(error) => {
                if error.is_recoverable() {
                    self.stats.mistakes += 1;
                } else {
                    tracing::warn!(%action, %error, "contract violation from presenter");
                }
                tracing::debug!(%action, code = %error.code(), "action rejected");
                self.presenter.reject(&error);
                Err(error)
            }
        }
    }

    /// The action the engine would accept next. Counts as a hint.
    pub fn hint(&mut self) -> Option<Action> {
        let action = self.engine.as_ref()?.correct_action()?;
        self.stats.hints += 1;
        Some(action)
    }

    #[must_use]
    pub fn current_prompt(&self) -> Option<PromptDescriptor> {
        self.engine.as_ref().map(Engine::current_prompt)
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.engine.is_some()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.engine.as_ref().is_some_and(Engine::is_complete)
    }

    #[must_use]
    pub const fn stats(&self) -> SessionStats {
        self.stats
    }

    #[must_use]
    pub const fn settings(&self) -> SessionSettings {
        self.settings
    }

    #[must_use]
    pub const fn engine(&self) -> Option<&Engine> {
        self.engine.as_ref()
    }

    pub const fn presenter(&self) -> &P {
        &self.presenter
    }

    pub const fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Tear down the active engine, discarding any in-flight prompt.
    pub fn end(&mut self) -> Option<Engine> {
        let engine = self.engine.take();
        if engine.is_some() {
            tracing::info!("session ended");
        }
        engine
    }
}
