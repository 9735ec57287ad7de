//! `sortdrill play` - interactive line-based quiz over stdin/stdout.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use sortdrill_core::pacing::FixedDelay;
use sortdrill_core::{
    Action, PromptDescriptor, PromptKind, Presenter, Session, SessionStats, StepError,
};

use crate::output::{OutputMode, pretty_kv, pretty_section, render_prompt, render_rejection};
use crate::settings::{ResolvedSession, SessionFlags, load_quiz_config};

const HELP: &str = "commands: swap|s, skip|k, <index>, hint|h, restart|r, quit|q, help|?";

/// Arguments for `sortdrill play`.
#[derive(Args, Debug)]
pub struct PlayArgs {
    #[command(flatten)]
    pub session: SessionFlags,
}

/// One parsed line of learner input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Act(Action),
    Hint,
    Restart,
    Quit,
    Help,
}

/// Parse a line against the current prompt. A bare number becomes the
/// index or slot the prompt is asking for.
fn parse_command(line: &str, kind: &PromptKind) -> Result<Command, String> {
    let word = line.trim().to_ascii_lowercase();
    match word.as_str() {
        "swap" | "s" => return Ok(Command::Act(Action::Swap)),
        "skip" | "k" => return Ok(Command::Act(Action::Skip)),
        "hint" | "h" => return Ok(Command::Hint),
        "restart" | "r" => return Ok(Command::Restart),
        "quit" | "q" | "exit" => return Ok(Command::Quit),
        "help" | "?" => return Ok(Command::Help),
        _ => {}
    }

    let Ok(number) = word.parse::<usize>() else {
        return Err(format!("unrecognized input '{}'; {HELP}", line.trim()));
    };
    match kind {
        PromptKind::Pick { .. } => Ok(Command::Act(Action::Pick(number))),
        PromptKind::Place { .. } => Ok(Command::Act(Action::Place(number))),
        PromptKind::Select { .. } => Ok(Command::Act(Action::Select(number))),
        PromptKind::Compare { .. } => Err("answer with swap or skip".to_string()),
        PromptKind::Complete => Err("already sorted; restart or quit".to_string()),
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum PlayEvent<'a> {
    Prompt {
        #[serde(flatten)]
        prompt: &'a PromptDescriptor,
    },
    Rejected {
        code: &'a str,
        title: &'static str,
        message: String,
        hint: Option<&'static str>,
    },
    Hint {
        action: Action,
    },
    Notice {
        message: &'a str,
    },
    Summary {
        complete: bool,
        #[serde(flatten)]
        stats: SessionStats,
    },
}

/// Writes prompts and feedback to a line-oriented stream.
///
/// Write failures are held until [`LinePresenter::take_error`] so the
/// `Presenter` callbacks stay infallible.
pub struct LinePresenter<W: Write> {
    out: W,
    mode: OutputMode,
    error: Option<io::Error>,
}

impl<W: Write> LinePresenter<W> {
    pub const fn new(out: W, mode: OutputMode) -> Self {
        Self {
            out,
            mode,
            error: None,
        }
    }

    fn record(&mut self, result: io::Result<()>) {
        if let Err(err) = result {
            self.error.get_or_insert(err);
        }
    }

    fn emit(&mut self, event: &PlayEvent<'_>) -> io::Result<()> {
        let line = serde_json::to_string(event).map_err(io::Error::other)?;
        writeln!(self.out, "{line}")
    }

    fn notice(&mut self, message: &str) {
        let result = if self.mode.is_json() {
            self.emit(&PlayEvent::Notice { message })
        } else {
            writeln!(self.out, "{message}")
        };
        self.record(result);
    }

    fn hint(&mut self, action: Action) {
        let result = if self.mode.is_json() {
            self.emit(&PlayEvent::Hint { action })
        } else {
            writeln!(self.out, "hint: {action}")
        };
        self.record(result);
    }

    fn summary(&mut self, stats: SessionStats, complete: bool) {
        let result = match self.mode {
            OutputMode::Json => self.emit(&PlayEvent::Summary { complete, stats }),
            OutputMode::Text => writeln!(
                self.out,
                "summary complete={complete} attempts={} accepted={} mistakes={} hints={}",
                stats.attempts, stats.accepted, stats.mistakes, stats.hints
            ),
            OutputMode::Pretty => write_pretty_summary(&mut self.out, stats, complete),
        };
        self.record(result);
    }

    fn take_error(&mut self) -> io::Result<()> {
        self.error.take().map_or(Ok(()), Err)
    }
}

fn write_pretty_summary(w: &mut dyn Write, stats: SessionStats, complete: bool) -> io::Result<()> {
    writeln!(w)?;
    pretty_section(w, if complete { "Sorted" } else { "Session ended" })?;
    pretty_kv(w, "Attempts", stats.attempts.to_string())?;
    pretty_kv(w, "Correct", stats.accepted.to_string())?;
    pretty_kv(w, "Mistakes", stats.mistakes.to_string())?;
    pretty_kv(w, "Hints", stats.hints.to_string())
}

impl<W: Write> Presenter for LinePresenter<W> {
    fn redraw(&mut self, prompt: &PromptDescriptor) {
        let result = if self.mode.is_json() {
            self.emit(&PlayEvent::Prompt { prompt })
        } else {
            writeln!(self.out).and_then(|()| render_prompt(&mut self.out, prompt))
        };
        self.record(result);
    }

    fn reject(&mut self, error: &StepError) {
        let result = if self.mode.is_json() {
            let code = error.code();
            self.emit(&PlayEvent::Rejected {
                code: code.code(),
                title: code.message(),
                message: error.to_string(),
                hint: code.hint(),
            })
        } else {
            render_rejection(&mut self.out, error)
        };
        self.record(result);
    }
}

/// Execute `sortdrill play` against the process's stdin and stdout.
///
/// # Errors
///
/// Returns an error if configuration fails to resolve or terminal I/O fails.
pub fn run_play(args: &PlayArgs, config_path: Option<&Path>, output: OutputMode) -> Result<()> {
    let resolved = args.session.resolve(load_quiz_config(config_path)?)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    play_loop(&resolved, stdin.lock(), stdout.lock(), output)?;
    Ok(())
}

/// Drive one session from `input` until it is quit or the input ends.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub fn play_loop<R: BufRead, W: Write>(
    resolved: &ResolvedSession,
    input: R,
    out: W,
    mode: OutputMode,
) -> Result<SessionStats> {
    let mut session = Session::new(
        LinePresenter::new(out, mode),
        FixedDelay::from_millis(resolved.delay_ms),
        resolved.source(),
    );
    session.start(resolved.settings);
    session.presenter_mut().take_error()?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let Some(prompt) = session.current_prompt() else {
            break;
        };

        match parse_command(&line, &prompt.kind) {
            Err(message) => session.presenter_mut().notice(&message),
            Ok(Command::Quit) => break,
            Ok(Command::Help) => session.presenter_mut().notice(HELP),
            Ok(Command::Hint) => match session.hint() {
                Some(action) => session.presenter_mut().hint(action),
                None => session.presenter_mut().notice("nothing left to do"),
            },
            Ok(Command::Restart) => {
                session.restart();
            }
            Ok(Command::Act(action)) => {
                if let Ok(outcome) = session.submit(action)
                    && outcome.complete
                {
                    let stats = session.stats();
                    session.presenter_mut().summary(stats, true);
                }
            }
        }
        session.presenter_mut().take_error()?;
    }

    let stats = session.stats();
    if !session.is_complete() {
        session.presenter_mut().summary(stats, false);
    }
    session.presenter_mut().take_error()?;
    session.end();
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortdrill_core::config::SessionSettings;
    use sortdrill_core::{Algorithm, ConvergenceDirection, OrderDirection};

    fn resolved(algorithm: Algorithm, values: &[i32]) -> ResolvedSession {
        ResolvedSession {
            settings: SessionSettings {
                algorithm,
                order: OrderDirection::Ascending,
                convergence: ConvergenceDirection::Right,
                length: values.len(),
            },
            values: Some(values.to_vec()),
            seed: None,
            value_min: 1,
            value_max: 99,
            delay_ms: 0,
        }
    }

    fn play(
        algorithm: Algorithm,
        values: &[i32],
        input: &str,
        mode: OutputMode,
    ) -> (SessionStats, String) {
        let mut out = Vec::new();
        let resolved = resolved(algorithm, values);
        let stats = play_loop(&resolved, input.as_bytes(), &mut out, mode).unwrap();
        (stats, String::from_utf8(out).unwrap())
    }

    #[test]
    fn numbers_follow_the_prompt() {
        let pick = PromptKind::Pick { index: 2 };
        let select = PromptKind::Select { range: 0..3 };
        let compare = PromptKind::Compare { left: 0, right: 1 };
        assert_eq!(parse_command("2", &pick), Ok(Command::Act(Action::Pick(2))));
        assert_eq!(parse_command(" 1 ", &select), Ok(Command::Act(Action::Select(1))));
        assert!(parse_command("1", &compare).is_err());
        assert_eq!(parse_command("S", &compare), Ok(Command::Act(Action::Swap)));
        assert!(parse_command("sideways", &compare).is_err());
    }

    #[test]
    fn bubble_walkthrough_completes() {
        let (stats, text) = play(
            Algorithm::Bubble,
            &[5, 3, 4],
            "swap\nswap\nskip\n",
            OutputMode::Text,
        );
        assert_eq!(stats.accepted, 3);
        assert_eq!(stats.mistakes, 0);
        assert!(text.contains("Compare 5 and 3: swap or skip?"));
        assert!(text.contains("summary complete=true attempts=3"));
    }

    #[test]
    fn mistakes_show_the_rule_and_keep_the_prompt() {
        let (stats, text) = play(Algorithm::Bubble, &[5, 3, 4], "skip\nq\n", OutputMode::Text);
        assert_eq!(stats.mistakes, 1);
        assert!(text.contains("E1002"));
        assert!(text.contains("swap needed"));
        assert!(text.contains("summary complete=false"));
    }

    #[test]
    fn hint_and_restart() {
        let (stats, text) = play(Algorithm::Selection, &[4, 1, 3], "h\nr\n", OutputMode::Text);
        assert!(text.contains("hint: select 0"));
        // Restart resets the tally.
        assert_eq!(stats, SessionStats::default());
    }

    #[test]
    fn json_mode_emits_one_event_per_line() {
        let (_, text) = play(
            Algorithm::Insertion,
            &[2, 5, 1],
            "1\n1\nquit\n",
            OutputMode::Json,
        );
        let events: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(events[0]["event"], "prompt");
        assert_eq!(events[0]["kind"]["type"], "pick");
        assert_eq!(events[1]["kind"]["type"], "place");
        assert_eq!(events.last().unwrap()["event"], "summary");
    }

    #[test]
    fn json_rejection_carries_code_title_and_detail() {
        // Right convergence on [2, 5, 1]: only index 1 may be picked.
        let (stats, text) = play(Algorithm::Insertion, &[2, 5, 1], "0\nq\n", OutputMode::Json);
        let rejected: serde_json::Value = text
            .lines()
            .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap())
            .find(|event| event["event"] == "rejected")
            .unwrap();
        assert_eq!(rejected["code"], "E2001");
        assert_eq!(rejected["title"], "Index is not an eligible target");
        assert_eq!(
            rejected["message"],
            "index 0 is not an eligible target (eligible: 1..2)"
        );
        assert!(rejected["hint"].is_null());
        // Contract errors are not learner mistakes.
        assert_eq!(stats.mistakes, 0);
    }
}
