//! sortdrill-core library.
//!
//! Interactive step machines that turn bubble, insertion and selection sort
//! into quizzes: every step the learner predicts the algorithm's next action
//! and the engine validates it against the true trace before advancing.
//!
//! # Conventions
//!
//! - **Errors**: engine operations return [`error::StepError`]; configuration
//!   and other I/O-bound code returns `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod config;
pub mod engine;
pub mod error;
pub mod order;
pub mod pacing;
pub mod prompt;
pub mod sequence;
pub mod session;

pub use engine::{Action, Engine};
pub use error::{ErrorCode, StepError, Violation};
pub use order::{Algorithm, ConvergenceDirection, OrderDirection};
pub use prompt::{Effect, PromptDescriptor, PromptKind, StepOutcome};
pub use sequence::Sequence;
pub use session::{Presenter, Session, SessionStats};
