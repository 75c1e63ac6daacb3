use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use tracing::info;

use crate::baseline::{read_names, write_names, Baseline};
use crate::cli::*;
use crate::config::BaselineConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Record(args) => cmd_record(args),
        Command::Check(args) => cmd_check(args, format),
        Command::Dump(args) => cmd_dump(args, format),
    }
}

/// Outcome of checking live names against a baseline.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub baseline_entries: usize,
    pub checked: usize,
    pub unrecognized: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DumpEntry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct DumpReport {
    pub entries: Vec<DumpEntry>,
    pub capacity: usize,
    pub load_factor: f64,
}

fn cmd_record(args: RecordArgs) -> anyhow::Result<()> {
    let config = BaselineConfig::from_opts(&args.opts)?;
    let names = read_input(args.input.as_deref())?;
    record(&config.baseline_path, &names)?;
    println!(
        "{} Recorded {} names to {}",
        "✓".green().bold(),
        names.len().to_string().bold(),
        config.baseline_path.display()
    );
    Ok(())
}

fn cmd_check(args: CheckArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut config = BaselineConfig::from_opts(&args.opts)?;
    if let Some(sentinel) = args.sentinel {
        config.sentinel = sentinel;
    }
    if let Some(capacity) = args.capacity {
        config.initial_capacity = capacity;
    }

    let live = read_input(args.input.as_deref())?;
    let report = check(&config, &live)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            for name in &report.unrecognized {
                println!("{} {}", "unrecognized:".red(), name);
            }
            if report.unrecognized.is_empty() {
                println!(
                    "{} All {} names are in the baseline",
                    "✓".green().bold(),
                    report.checked
                );
            }
        }
    }
    Ok(())
}

fn cmd_dump(args: DumpArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = BaselineConfig::from_opts(&args.opts)?;
    let baseline = load_baseline(&config)?;
    let table = baseline.table();

    match format {
        OutputFormat::Json => {
            let report = DumpReport {
                entries: table
                    .iter()
                    .map(|(key, value)| DumpEntry {
                        key: key.to_string(),
                        value: value.to_string(),
                    })
                    .collect(),
                capacity: table.capacity(),
                load_factor: table.load_factor(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            print!("{table}");
            println!(
                "{} entries, {} buckets, load factor {:.2}",
                table.len().to_string().bold(),
                table.capacity(),
                table.load_factor()
            );
        }
    }
    Ok(())
}

/// Overwrite the baseline file with `names`.
pub fn record(path: &Path, names: &[String]) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating baseline {}", path.display()))?;
    write_names(BufWriter::new(file), names)
        .with_context(|| format!("writing baseline {}", path.display()))?;
    info!(names = names.len(), path = %path.display(), "baseline recorded");
    Ok(())
}

/// Load the configured baseline and report every live name it does not know.
pub fn check(config: &BaselineConfig, live: &[String]) -> anyhow::Result<CheckReport> {
    let baseline = load_baseline(config)?;
    let unrecognized: Vec<String> = baseline
        .unrecognized(live)
        .into_iter()
        .map(str::to_owned)
        .collect();
    info!(
        checked = live.len(),
        unrecognized = unrecognized.len(),
        "check complete"
    );
    Ok(CheckReport {
        baseline_entries: baseline.table().len(),
        checked: live.len(),
        unrecognized,
    })
}

fn load_baseline(config: &BaselineConfig) -> anyhow::Result<Baseline> {
    let path = &config.baseline_path;
    let file = File::open(path).with_context(|| format!("opening baseline {}", path.display()))?;
    let names = read_names(BufReader::new(file))
        .with_context(|| format!("reading baseline {}", path.display()))?;
    Baseline::from_names(&names, &config.sentinel, config.initial_capacity)
        .with_context(|| format!("loading baseline {}", path.display()))
}

/// Read names from a file, or stdin when the path is absent or `-`.
fn read_input(path: Option<&Path>) -> anyhow::Result<Vec<String>> {
    let reader: Box<dyn BufRead> = match path {
        Some(p) if p != Path::new("-") => {
            let file = File::open(p).with_context(|| format!("opening {}", p.display()))?;
            Box::new(BufReader::new(file))
        }
        _ => Box::new(io::stdin().lock()),
    };
    read_names(reader).context("reading names")
}
