use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "chainkv",
    about = "Record a baseline of names and report names missing from it",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write names from INPUT (or stdin) to the baseline file
    Record(RecordArgs),
    /// Report names from INPUT (or stdin) that are not in the baseline
    Check(CheckArgs),
    /// Print the baseline table
    Dump(DumpArgs),
}

/// Options shared by every command that reads a baseline.
#[derive(Args, Debug, Default)]
pub struct BaselineOpts {
    /// Baseline file, one name per line
    #[arg(short, long)]
    pub baseline: Option<PathBuf>,
    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct RecordArgs {
    #[command(flatten)]
    pub opts: BaselineOpts,
    /// Names to record; `-` or omitted reads stdin
    pub input: Option<PathBuf>,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub opts: BaselineOpts,
    /// Value stored for every baseline name
    #[arg(long)]
    pub sentinel: Option<String>,
    /// Initial bucket count (0 sizes the table from the baseline)
    #[arg(long)]
    pub capacity: Option<usize>,
    /// Live names to check; `-` or omitted reads stdin
    pub input: Option<PathBuf>,
}

#[derive(Args)]
pub struct DumpArgs {
    #[command(flatten)]
    pub opts: BaselineOpts,
}
