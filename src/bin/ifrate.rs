//! ifrate: Compute interface rates and utilization from raw SNMP counters.
//!
//! Part of the snmp-ifrate CLI utilities.

use clap::{Parser, Subcommand};
use snmp_ifrate::cli::args::{DiscontinuityArgs, OutputArgs, RateArgs, UtilizationArgs};
use snmp_ifrate::{calculate_rate, calculate_utilization, has_discontinuity};
use std::process::ExitCode;

/// Post-process polled interface counters.
#[derive(Debug, Parser)]
#[command(name = "ifrate", version, about)]
struct Args {
    #[command(flatten)]
    output: OutputArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Feed one counter sample and print the rate with the new snapshot.
    Rate(RateArgs),
    /// Print utilization in percent for a pair of bit rates.
    Utilization(UtilizationArgs),
    /// Print whether the discontinuity marker changed.
    Discontinuity(DiscontinuityArgs),
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing
    args.output.init_tracing();

    match run(&args.command) {
        Ok(line) => {
            println!("{}", line);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: &Command) -> snmp_ifrate::Result<String> {
    match command {
        Command::Rate(args) => {
            let config = args.rate_config()?;
            let (rate, snapshot) = calculate_rate(
                &args.snapshot,
                args.value,
                args.timestamp(),
                &config,
                args.width.into(),
                &args.tracking(),
            )?;
            Ok(serde_json::json!({ "rate": rate, "snapshot": snapshot }).to_string())
        }
        Command::Utilization(args) => {
            let utilization =
                calculate_utilization(args.input, args.output, args.speed, args.duplex.into());
            Ok(utilization.to_string())
        }
        Command::Discontinuity(args) => {
            Ok(has_discontinuity(&args.current, &args.previous).to_string())
        }
    }
}
