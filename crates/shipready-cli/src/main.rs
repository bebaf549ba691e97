//! shipready CLI binary entry point.

mod cli;
mod scan;

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use shipready_core::tracing::init_tracing;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Command::Scan(args) => {
            init_tracing(if args.quiet { "warn" } else { "info" });
            let report = scan::run(&args);
            if let Some(console) = report.console {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(console.as_bytes())
                    .and_then(|()| stdout.flush())
                    .context("writing console summary")?;
            }
            Ok(ExitCode::from(report.exit_code))
        }
    }
}
