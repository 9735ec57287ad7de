//! Shared output layer for pretty/text/JSON parity across all CLI commands.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` / hidden `--json` flag
//! 2. `SORTDRILL_FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.

use clap::ValueEnum;
use sortdrill_core::{PromptDescriptor, PromptKind, StepError};
use std::io::{self, IsTerminal, Write};

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<12} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (sections, visual framing).
    Pretty,
    /// Compact `key=value` lines for scripts and pipes.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }

    if json_flag {
        return OutputMode::Json;
    }

    if let Some(val) = format_env {
        match val.to_lowercase().as_str() {
            "json" => return OutputMode::Json,
            "text" => return OutputMode::Text,
            "pretty" => return OutputMode::Pretty,
            _ => {} // unknown value; fall through to TTY detection
        }
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from CLI flags, environment, and TTY defaults.
pub fn resolve_output_mode(format_flag: Option<OutputMode>, json_flag: bool) -> OutputMode {
    let env_val = std::env::var("SORTDRILL_FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(format_flag, json_flag, env_val.as_deref(), is_tty)
}

/// Indices the learner's eye should be drawn to.
fn focus_indices(kind: &PromptKind) -> Vec<usize> {
    match kind {
        PromptKind::Compare { left, right } => vec![*left, *right],
        PromptKind::Pick { index } => vec![*index],
        PromptKind::Place { from, .. } => vec![*from],
        PromptKind::Select { .. } | PromptKind::Complete => Vec::new(),
    }
}

/// One line of values: `[v]` marks focus, `(v)` marks settled positions.
pub fn value_row(prompt: &PromptDescriptor) -> String {
    let focus = focus_indices(&prompt.kind);
    prompt
        .values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            if focus.contains(&index) {
                format!("[{value}]")
            } else if prompt.settled.contains(&index) {
                format!("({value})")
            } else {
                format!(" {value} ")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Matching row of indices, each centred under its value cell.
pub fn index_row(prompt: &PromptDescriptor) -> String {
    prompt
        .values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let width = value.to_string().len() + 2;
            format!("{index:^width$}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render a prompt for a human at the terminal.
pub fn render_prompt(w: &mut dyn Write, prompt: &PromptDescriptor) -> io::Result<()> {
    writeln!(
        w,
        "{} sort, {}, settling {}",
        prompt.algorithm, prompt.order, prompt.convergence
    )?;
    writeln!(w, "  {}", value_row(prompt))?;
    writeln!(w, "  {}", index_row(prompt))?;
    if let PromptKind::Place { slots, .. } = &prompt.kind {
        let listed = slots
            .iter()
            .map(|slot| match slot.before {
                Some(index) => format!("{}: before index {index}", slot.slot),
                None => format!("{}: after the last", slot.slot),
            })
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(w, "  slots {listed}")?;
    }
    writeln!(w, "{}", prompt.instruction)
}

/// Render a refused action with its code, reason and hint.
///
/// Learner mistakes show the broken rule; contract errors show the code's
/// summary with the raw error as detail.
pub fn render_rejection(w: &mut dyn Write, error: &StepError) -> io::Result<()> {
    let code = error.code();
    match error.violation() {
        Some(violation) => writeln!(w, "✗ {code}: {violation}")?,
        None => {
            writeln!(w, "✗ {code}: {}", code.message())?;
            writeln!(w, "  detail: {error}")?;
        }
    }
    if let Some(hint) = code.hint() {
        writeln!(w, "  hint: {hint}")?;
    }
    Ok(())
}
