//! `sortdrill sim` - deterministic simulation campaign commands.
//!
//! `sortdrill sim run`: execute a campaign across many seeds.
//! `sortdrill sim replay`: replay a single seed with detailed trace output.

use std::process;

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use sortdrill_sim::campaign::{CampaignConfig, format_violation, replay_seed, run_campaign};
use sortdrill_sim::{RunRecord, TraceEvent};

use crate::output::{OutputMode, pretty_kv, pretty_section};

/// Top-level arguments for `sortdrill sim`.
#[derive(Args, Debug)]
pub struct SimArgs {
    #[command(subcommand)]
    pub command: SimCommand,
}

#[derive(Subcommand, Debug)]
pub enum SimCommand {
    #[command(
        about = "Run a simulation campaign across multiple seeds",
        long_about = "Drive every algorithm, order and convergence combination with a\n\
                      simulated learner for each seed, checking sortedness, rejection\n\
                      idempotence, convergence symmetry and decision counts. Reports\n\
                      pass/fail per seed and identifies the first failure for replay.",
        after_help = "EXAMPLES:\n    # Run 100 seeds with defaults\n    sortdrill sim run --seeds 100\n\n\
                      # Longer sequences, clumsier learner\n    sortdrill sim run --seeds 200 --length 16 --mistakes 40\n\n\
                      # Machine-readable output\n    sortdrill sim run --seeds 100 --format json"
    )]
    Run(SimRunArgs),

    #[command(
        about = "Replay a single seed with detailed trace output",
        long_about = "Replay a specific seed to get its generated sequence, per-combination\n\
                      results, oracle verdict and violation details. Use after a campaign\n\
                      failure to debug.",
        after_help = "EXAMPLES:\n    # Replay seed 42\n    sortdrill sim replay --seed 42\n\n\
                      # Include every submission\n    sortdrill sim replay --seed 42 --trace\n\n\
                      # Machine-readable output\n    sortdrill sim replay --seed 42 --format json"
    )]
    Replay(SimReplayArgs),
}

/// Parameters shared by `run` and `replay`.
#[derive(Args, Debug, Clone)]
pub struct SimParams {
    /// Sequence length per seed.
    #[arg(long, default_value = "10")]
    pub length: usize,

    /// Learner mistake probability in percent (0-100).
    #[arg(long, default_value = "20")]
    pub mistakes: u8,

    /// Submission ceiling per combination.
    #[arg(long, default_value = "10000")]
    pub max_steps: usize,
}

/// Arguments for `sortdrill sim run`.
#[derive(Args, Debug)]
pub struct SimRunArgs {
    /// Number of seeds to run.
    #[arg(long, default_value = "100")]
    pub seeds: u64,

    /// Starting seed value.
    #[arg(long, default_value = "0")]
    pub seed_start: u64,

    #[command(flatten)]
    pub params: SimParams,
}

/// Arguments for `sortdrill sim replay`.
#[derive(Args, Debug)]
pub struct SimReplayArgs {
    /// Seed to replay.
    #[arg(long)]
    pub seed: u64,

    /// Include every recorded submission in the output.
    #[arg(long)]
    pub trace: bool,

    #[command(flatten)]
    pub params: SimParams,
}

#[derive(Debug, Serialize)]
struct RunOutput {
    seeds_run: usize,
    seeds_passed: usize,
    seeds_failed: usize,
    first_failure: Option<u64>,
    mistakes_exercised: usize,
    all_passed: bool,
    failures: Vec<FailureOutput>,
}

#[derive(Debug, Serialize)]
struct FailureOutput {
    seed: u64,
    violations: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ReplayOutput<'a> {
    seed: u64,
    initial: &'a [i32],
    trace_events: usize,
    mistakes_exercised: usize,
    oracle_passed: bool,
    violations: Vec<String>,
    trace_fingerprint: String,
    runs: &'a [RunRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<&'a [TraceEvent]>,
}

const fn build_campaign_config(seed_start: u64, seeds: u64, params: &SimParams) -> CampaignConfig {
    CampaignConfig {
        seed_range: seed_start..seed_start.saturating_add(seeds),
        length: params.length,
        mistake_percent: params.mistakes,
        max_steps: params.max_steps,
    }
}

/// Execute `sortdrill sim run`.
///
/// Exits the process with status 1 when any seed fails.
///
/// # Errors
///
/// Returns an error if the campaign configuration is invalid or output fails.
pub fn run_sim_run(args: &SimRunArgs, output: OutputMode) -> Result<()> {
    let config = build_campaign_config(args.seed_start, args.seeds, &args.params);
    let report = run_campaign(&config)?;

    let out = RunOutput {
        seeds_run: report.seeds_run,
        seeds_passed: report.seeds_passed,
        seeds_failed: report.failures.len(),
        first_failure: report.first_failure,
        mistakes_exercised: report.mistakes_exercised,
        all_passed: report.all_passed(),
        failures: report
            .failures
            .iter()
            .map(|f| FailureOutput {
                seed: f.seed,
                violations: f.violations.clone(),
            })
            .collect(),
    };

    match output {
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputMode::Text => {
            println!(
                "campaign seeds_run={} length={} mistakes_pct={}",
                out.seeds_run, args.params.length, args.params.mistakes
            );
            println!(
                "results passed={} failed={} mistakes_exercised={} all_passed={}",
                out.seeds_passed, out.seeds_failed, out.mistakes_exercised, out.all_passed
            );
            if !out.all_passed {
                for failure in out.failures.iter().take(5) {
                    println!(
                        "failure seed={} violations={}",
                        failure.seed,
                        failure.violations.len()
                    );
                }
                if out.failures.len() > 5 {
                    println!("failures_truncated count={}", out.failures.len() - 5);
                }
                println!(
                    "hint replay_seed={} length={} mistakes={}",
                    out.first_failure.unwrap_or(0),
                    args.params.length,
                    args.params.mistakes
                );
            }
        }
        OutputMode::Pretty => {
            let stdout = std::io::stdout();
            let mut w = stdout.lock();
            pretty_section(&mut w, "Simulation Campaign")?;
            pretty_kv(&mut w, "Seeds", out.seeds_run.to_string())?;
            pretty_kv(&mut w, "Length", args.params.length.to_string())?;
            pretty_kv(&mut w, "Mistakes", format!("{}%", args.params.mistakes))?;
            pretty_kv(
                &mut w,
                "Results",
                format!(
                    "{} passed / {} failed ({} mistakes refused)",
                    out.seeds_passed, out.seeds_failed, out.mistakes_exercised
                ),
            )?;

            if out.all_passed {
                pretty_kv(&mut w, "Status", "all seeds passed")?;
            } else {
                pretty_kv(
                    &mut w,
                    "Status",
                    format!(
                        "{} failures (first at seed {})",
                        out.seeds_failed,
                        out.first_failure.unwrap_or(0)
                    ),
                )?;
                println!();
                pretty_section(&mut w, "Failure Samples")?;
                for failure in out.failures.iter().take(5) {
                    println!(
                        "seed {:<8} violations={}",
                        failure.seed,
                        failure.violations.len()
                    );
                    for violation in &failure.violations {
                        println!("  - {violation}");
                    }
                }
                if out.failures.len() > 5 {
                    println!("... and {} more failures", out.failures.len() - 5);
                }
                println!();
                pretty_kv(
                    &mut w,
                    "Replay",
                    format!(
                        "sortdrill sim replay --seed {} --length {} --mistakes {}",
                        out.first_failure.unwrap_or(0),
                        args.params.length,
                        args.params.mistakes
                    ),
                )?;
            }
        }
    }

    // Exit code 1 on any failure for CI integration
    if !report.all_passed() {
        process::exit(1);
    }

    Ok(())
}

/// Execute `sortdrill sim replay`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or output fails.
pub fn run_sim_replay(args: &SimReplayArgs, output: OutputMode) -> Result<()> {
    let config = build_campaign_config(args.seed, 1, &args.params);
    let detailed = replay_seed(args.seed, &config)?;
    let result = &detailed.result;

    let out = ReplayOutput {
        seed: args.seed,
        initial: &result.initial,
        trace_events: result.trace.len(),
        mistakes_exercised: result.mistakes_exercised(),
        oracle_passed: detailed.oracle.passed,
        violations: detailed
            .oracle
            .violations
            .iter()
            .map(format_violation)
            .collect(),
        trace_fingerprint: result.trace_fingerprint()?,
        runs: &result.runs,
        trace: args.trace.then_some(result.trace.as_slice()),
    };

    match output {
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputMode::Text => {
            println!(
                "replay seed={} length={} trace_events={} mistakes_exercised={} oracle_passed={} fingerprint={}",
                out.seed,
                out.initial.len(),
                out.trace_events,
                out.mistakes_exercised,
                out.oracle_passed,
                out.trace_fingerprint
            );
            for run in out.runs {
                println!(
                    "run combination={} complete={} accepted={} rejected={}",
                    run.combination, run.complete, run.accepted, run.rejected
                );
            }
            for violation in &out.violations {
                println!("violation {violation}");
            }
            if let Some(trace) = out.trace {
                for event in trace {
                    println!("trace {}", serde_json::to_string(event)?);
                }
            }
        }
        OutputMode::Pretty => {
            let stdout = std::io::stdout();
            let mut w = stdout.lock();
            pretty_section(&mut w, &format!("Replay seed {}", out.seed))?;
            pretty_kv(&mut w, "Initial", format!("{:?}", out.initial))?;
            pretty_kv(&mut w, "Trace", format!("{} submissions", out.trace_events))?;
            pretty_kv(&mut w, "Mistakes", out.mistakes_exercised.to_string())?;
            pretty_kv(&mut w, "Fingerprint", &out.trace_fingerprint)?;
            pretty_kv(
                &mut w,
                "Oracle",
                if out.oracle_passed { "passed" } else { "FAILED" },
            )?;
            println!();
            pretty_section(&mut w, "Combinations")?;
            for run in out.runs {
                println!(
                    "{:<28} {:<10} accepted={:<4} rejected={}",
                    run.combination.to_string(),
                    if run.complete { "sorted" } else { "unfinished" },
                    run.accepted,
                    run.rejected
                );
            }
            if !out.violations.is_empty() {
                println!();
                pretty_section(&mut w, "Violations")?;
                for violation in &out.violations {
                    println!("  - {violation}");
                }
            }
            if let Some(trace) = out.trace {
                println!();
                pretty_section(&mut w, "Trace")?;
                for event in trace {
                    println!(
                        "{:<28} step {:<5} {}",
                        event.combination.to_string(),
                        event.step,
                        serde_json::to_string(&event.kind)?
                    );
                }
            }
        }
    }

    Ok(())
}
