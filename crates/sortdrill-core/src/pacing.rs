//! Post-mutation pacing hook.
//!
//! After a step that visibly settles something (a swap, an insertion, a
//! selection swap) the session waits before exposing the next prompt. The
//! wait is presentation pacing only; engine correctness never depends on it.

use std::time::Duration;

use crate::prompt::StepOutcome;

pub trait Pacer {
    /// Called after an accepted step whose effect settles.
    fn settle(&mut self, outcome: &StepOutcome);
}

/// Zero delay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoPacing;

impl Pacer for NoPacing {
    fn settle(&mut self, _outcome: &StepOutcome) {}
}

/// Blocking, non-cancelable delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay(pub Duration);

impl FixedDelay {
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }
}

impl Pacer for FixedDelay {
    fn settle(&mut self, outcome: &StepOutcome) {
        if self.0.is_zero() {
            return;
        }
        tracing::trace!(delay_ms = self.0.as_millis(), effect = ?outcome.effect, "pacing");
        std::thread::sleep(self.0);
    }
}

impl<P: Pacer + ?Sized> Pacer for Box<P> {
    fn settle(&mut self, outcome: &StepOutcome) {
        (**self).settle(outcome);
    }
}
