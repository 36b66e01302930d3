use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::process::ExitCode;
use tracing::info;
use wrapped_config::Config;

mod attack;
mod cli;
mod session;
mod walkthrough;

use cli::{Cli, Command};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::from_env().context("loading configuration")?;
    wrapped_telemetry::init(&config.log_filter)?;
    info!(command = ?cli.command, "wrapctl starting");

    match &cli.command {
        Command::Walkthrough => {
            let (_, walkthrough) = walkthrough::run(&config)?;
            if cli.json {
                print_json(&walkthrough)?;
            } else {
                for (index, step) in walkthrough.steps.iter().enumerate() {
                    println!("Step {}: {}", index + 1, step.title);
                    println!("{}", step.token);
                    println!();
                }
                for holder in &walkthrough.holders {
                    println!("{holder}");
                }
            }
            Ok(exit_code(walkthrough.backed))
        }
        Command::Attack(args) => {
            let outcome = attack::run(&config, args)?;
            if cli.json {
                print_json(&outcome)?;
            } else {
                println!(
                    "Ledger: ordering {}, guard {}",
                    outcome.ordering,
                    if outcome.guard { "on" } else { "off" }
                );
                println!();
                println!("Before attack:\n{}", outcome.before);
                println!();
                println!("After attack:\n{}", outcome.after);
                println!();
                println!("{}", outcome.owner);
                println!();
                println!(
                    "Attacker staked {} and withdrew {} after {} re-entries",
                    outcome.stake, outcome.withdrawn, outcome.reentries
                );
                if outcome.backed {
                    println!("Verdict: reserve == totalSupply holds");
                } else {
                    println!(
                        "Verdict: BROKEN - {} lamports taken beyond the stake",
                        outcome.excess()
                    );
                }
            }
            Ok(exit_code(outcome.backed))
        }
        Command::CheckBalance(args) => {
            let (session, walkthrough) = walkthrough::run(&config)?;
            let report = session.lookup_report(args.holder, args.address)?;
            if cli.json {
                print_json(&report)?;
            } else {
                println!("{report}");
            }
            Ok(exit_code(walkthrough.backed))
        }
        Command::Config => {
            print_json(&config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn exit_code(backed: bool) -> ExitCode {
    if backed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
