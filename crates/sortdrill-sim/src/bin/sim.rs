#![forbid(unsafe_code)]

use std::{env, process};

use anyhow::{Context, Result};
use sortdrill_sim::campaign::{CampaignConfig, format_violation, run_single_seed};

/// Check one seed (first argument, default 0) with campaign defaults.
fn main() -> Result<()> {
    let seed = env::args()
        .nth(1)
        .map(|raw| raw.parse::<u64>())
        .transpose()
        .context("seed must be an unsigned integer")?
        .unwrap_or(0);

    match run_single_seed(seed, &CampaignConfig::default())? {
        Ok(()) => println!("simulation complete: seed={seed} passed=true"),
        Err(violations) => {
            println!(
                "simulation complete: seed={seed} passed=false violations={}",
                violations.len()
            );
            for violation in &violations {
                println!("  - {}", format_violation(violation));
            }
            process::exit(1);
        }
    }

    Ok(())
}
