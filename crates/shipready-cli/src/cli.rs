//! CLI argument parsing via `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "shipready",
    version,
    about = "Static release-readiness scanner for Next.js + Supabase projects",
    long_about = "shipready indexes a project, builds an application graph from its routes, \
handlers, data access, environment reads and migrations, and reports the gaps that \
should block a release.\n\nConfiguration precedence: CLI > SHIPREADY_* env > shipready.toml > \
~/.shipready/config.toml > defaults.",
    after_help = "Examples:\n  shipready scan\n  shipready scan --project ../app --format json,md --fail-on HIGH\n  shipready scan --baseline validation-baseline.json --quiet",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan a project and write readiness reports
    #[command(
        long_about = "Scan the project, write validation-context.json / .md to the output directory \
and print a summary. Exits 1 when an unsuppressed finding reaches --fail-on, 2 on fatal errors."
    )]
    Scan(ScanArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Project root
    #[arg(long, default_value = ".")]
    pub project: PathBuf,

    /// Report directory (default: <project>/.shipready)
    #[arg(long)]
    pub out: Option<String>,

    /// Report formats, comma-separated: json, md, console
    #[arg(long, value_delimiter = ',')]
    pub format: Vec<String>,

    /// Lowest severity that fails the run: CRITICAL, HIGH, MEDIUM, LOW
    #[arg(long)]
    pub fail_on: Option<String>,

    /// Baseline file (default: <project>/validation-baseline.json when present)
    #[arg(long)]
    pub baseline: Option<String>,

    /// Config file replacing <project>/shipready.toml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Only print warnings and errors
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub quiet: bool,

    /// Parse threads (0 = one per core)
    #[arg(long)]
    pub threads: Option<usize>,
}
