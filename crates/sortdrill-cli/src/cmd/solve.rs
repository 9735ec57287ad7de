//! `sortdrill solve` - play a session with the engine's own answers.

use std::io::{self, Write};
use std::ops::Range;
use std::path::Path;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use sortdrill_core::pacing::FixedDelay;
use sortdrill_core::{
    Action, Algorithm, ConvergenceDirection, Effect, Engine, OrderDirection, PromptDescriptor,
    Presenter, Session,
};

use crate::output::{OutputMode, pretty_kv, pretty_section};
use crate::settings::{ResolvedSession, SessionFlags, load_quiz_config};

/// Arguments for `sortdrill solve`.
#[derive(Args, Debug)]
pub struct SolveArgs {
    /// Session options. `--delay-ms` defaults to 0 here; the config file's
    /// pacing only applies to `play`.
    #[command(flatten)]
    pub session: SessionFlags,
}

#[derive(Debug, Serialize)]
struct SolveStep {
    step: usize,
    action: Action,
    effect: Effect,
    values: Vec<i32>,
    settled: Range<usize>,
}

#[derive(Debug, Serialize)]
struct SolveOutput {
    algorithm: Algorithm,
    order: OrderDirection,
    convergence: ConvergenceDirection,
    initial: Vec<i32>,
    final_values: Vec<i32>,
    decisions: usize,
    steps: Vec<SolveStep>,
}

/// Nothing to draw; the step list is the output.
struct Silent;

impl Presenter for Silent {
    fn redraw(&mut self, _prompt: &PromptDescriptor) {}
}

/// Execute `sortdrill solve`.
///
/// # Errors
///
/// Returns an error if configuration fails to resolve, the engine refuses
/// its own answer, or writing output fails.
pub fn run_solve(args: &SolveArgs, config_path: Option<&Path>, output: OutputMode) -> Result<()> {
    let mut resolved = args.session.resolve(load_quiz_config(config_path)?)?;
    resolved.delay_ms = args.session.delay_ms.unwrap_or(0);
    let solved = solve(&resolved)?;

    let stdout = io::stdout();
    let mut w = stdout.lock();
    match output {
        OutputMode::Json => writeln!(w, "{}", serde_json::to_string_pretty(&solved)?)?,
        OutputMode::Text => write_text(&mut w, &solved)?,
        OutputMode::Pretty => write_pretty(&mut w, &solved)?,
    }
    Ok(())
}

fn solve(resolved: &ResolvedSession) -> Result<SolveOutput> {
    let mut session = Session::new(
        Silent,
        FixedDelay::from_millis(resolved.delay_ms),
        resolved.source(),
    );
    let first = session.start(resolved.settings);

    let mut steps = Vec::new();
    while let Some(action) = session.engine().and_then(Engine::correct_action) {
        let outcome = session.submit(action)?;
        let values = session
            .engine()
            .map(|engine| engine.sequence().values().to_vec())
            .unwrap_or_default();
        steps.push(SolveStep {
            step: steps.len() + 1,
            action,
            effect: outcome.effect,
            values,
            settled: outcome.settled,
        });
    }

    let final_values = steps
        .last()
        .map_or_else(|| first.values.clone(), |step| step.values.clone());
    Ok(SolveOutput {
        algorithm: first.algorithm,
        order: first.order,
        convergence: first.convergence,
        initial: first.values,
        final_values,
        decisions: steps.len(),
        steps,
    })
}

fn join(values: &[i32]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn write_text(w: &mut dyn Write, solved: &SolveOutput) -> io::Result<()> {
    writeln!(
        w,
        "solve algorithm={} order={} convergence={} initial={}",
        solved.algorithm,
        solved.order,
        solved.convergence,
        join(&solved.initial)
    )?;
    for step in &solved.steps {
        writeln!(
            w,
            "step={} action=\"{}\" values={}",
            step.step,
            step.action,
            join(&step.values)
        )?;
    }
    writeln!(
        w,
        "sorted decisions={} final={}",
        solved.decisions,
        join(&solved.final_values)
    )
}

fn write_pretty(w: &mut dyn Write, solved: &SolveOutput) -> io::Result<()> {
    pretty_section(
        w,
        &format!(
            "{} sort, {}, settling {}",
            solved.algorithm, solved.order, solved.convergence
        ),
    )?;
    pretty_kv(w, "Initial", format!("{:?}", solved.initial))?;
    for step in &solved.steps {
        writeln!(
            w,
            "{:>4}. {:<10} {:?}",
            step.step,
            step.action.to_string(),
            step.values
        )?;
    }
    pretty_kv(w, "Sorted", format!("{:?}", solved.final_values))?;
    pretty_kv(w, "Decisions", solved.decisions.to_string())
}
