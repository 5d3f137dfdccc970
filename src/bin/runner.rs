//! # Runner
//!
//! Resolve an input document into a component graph and invoke its root.
//!
//! ```bash
//! runner job.json -v DEBUG -l /var/log/job.log
//! ```

use anyhow::Context;
use clap::Parser;
use runner_core::models::LogLevel;
use runner_core::runner::{run, RunOptions};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "runner")]
#[command(about = "Resolve a declarative document into components and run it")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Input document (JSON or YAML) with `metadata` and `data` fields
    input_path: PathBuf,

    /// Log file path (default: the input path with a .log extension)
    #[arg(short = 'l', long = "log_path", alias = "log-path")]
    log_path: Option<PathBuf>,

    /// Log level (default: the document's metadata, then INFO)
    #[arg(short = 'v', long = "log_level", alias = "log-level", value_enum)]
    log_level: Option<LogLevel>,

    /// Runner configuration file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    let options = RunOptions {
        input_path: cli.input_path,
        log_path: cli.log_path,
        log_level: cli.log_level,
        config_path: cli.config,
    };

    let result = run(&options)
        .with_context(|| format!("run of {} failed", options.input_path.display()));

    if let Err(e) = result {
        eprintln!("❌ {e:#}");
        process::exit(1);
    }
}
