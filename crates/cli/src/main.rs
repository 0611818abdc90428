//! Reorder buffer scenario runner.
//!
//! This binary replays recorded port traces through the core. It provides:
//! 1. **Run:** Load a JSON scenario, step it cycle by cycle and print one JSON trace line per cycle.
//! 2. **Config:** Print the default configuration as a starting point for `--config`.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::{fs, process};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rvrob_core::common::ScenarioError;
use rvrob_core::config::Config;
use rvrob_core::sim::Scenario;

#[derive(Parser, Debug)]
#[command(
    name = "rvrob",
    author,
    version,
    about = "Cycle-level reorder buffer model",
    long_about = "Replay a JSON scenario of per-cycle port inputs through the reorder buffer.\n\nEvery input field defaults to inactive, so each cycle only lists the wires it drives.\n\nExamples:\n  rvrob run -f scenarios/forwarding.json\n  rvrob run -f trace.json --config big_rob.json --stats --quiet\n  rvrob config > rob.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a scenario file.
    Run {
        /// Scenario to replay.
        #[arg(short, long)]
        file: PathBuf,

        /// Configuration file overriding the one embedded in the scenario.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print statistics after the run.
        #[arg(long)]
        stats: bool,

        /// Statistics sections to print (summary, occupancy, hazards). Implies --stats.
        #[arg(long, value_delimiter = ',')]
        sections: Vec<String>,

        /// Do not print per-cycle trace lines.
        #[arg(short, long)]
        quiet: bool,

        /// Log every dispatch, completion and commit to stderr.
        #[arg(long)]
        trace: bool,

        /// Exit with status 2 if any protocol violation was reported.
        #[arg(long)]
        strict: bool,
    },

    /// Print the default configuration as JSON.
    Config,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            file,
            config,
            stats,
            sections,
            quiet,
            trace,
            strict,
        } => {
            init_logging(trace);
            cmd_run(&file, config.as_deref(), stats || !sections.is_empty(), &sections, quiet)
                .map(|violations| if strict && violations > 0 { 2 } else { 0 })
        }
        Commands::Config => cmd_config().map(|()| 0),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("[!] {e}");
            process::exit(1);
        }
    }
}

/// Installs a stderr subscriber honouring `RUST_LOG`, defaulting to warnings only.
fn init_logging(trace: bool) {
    let filter = if trace {
        EnvFilter::new("rvrob_core=trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Replays `file` and returns the number of protocol violations reported.
fn cmd_run(
    file: &Path,
    config: Option<&Path>,
    stats: bool,
    sections: &[String],
    quiet: bool,
) -> Result<u64, ScenarioError> {
    let mut scenario = Scenario::load(file)?;
    if let Some(path) = config {
        let text = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        scenario = scenario.with_config(config);
    }
    tracing::info!(
        entries = scenario.config.rob.entries,
        writeback_ports = scenario.config.rob.writeback_ports,
        cycles = scenario.cycles.len(),
        "replaying scenario"
    );

    let (trace, rob_stats) = scenario.run()?;

    if !quiet {
        let mut out = io::stdout().lock();
        for cycle in &trace {
            serde_json::to_writer(&mut out, cycle)?;
            writeln!(out)?;
        }
        out.flush()?;
    }
    if stats {
        rob_stats.print_sections(sections);
    }
    Ok(rob_stats.violations)
}

fn cmd_config() -> Result<(), ScenarioError> {
    let text = serde_json::to_string_pretty(&Config::default())?;
    println!("{text}");
    Ok(())
}
