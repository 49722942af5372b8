//! Verify or create type markers in leaf source directories.

use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use leafmark::core::types::Mode;
use leafmark::exit_codes;
use leafmark::io::config::resolve_config;
use leafmark::logging;
use leafmark::run::run_markers;

#[derive(Parser, Debug)]
#[command(
    name = "leafmark",
    version,
    about = "Verify or create type markers in leaf source directories"
)]
struct Cli {
    /// `check` reports missing markers; `create` adds them and bumps manifests.
    #[arg(value_enum)]
    mode: Mode,

    /// Repository root to scan.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Config file (defaults to `<root>/leafmark.toml` when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the run report as JSON instead of text lines.
    #[arg(long)]
    json: bool,
}

fn main() {
    logging::init();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.exit_code() == 0 {
                exit_codes::OK
            } else {
                exit_codes::FAILURE
            };
            err.print().ok();
            process::exit(code);
        }
    };
    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("error: {:#}", err);
            process::exit(exit_codes::FAILURE);
        }
    }
}

fn run(cli: &Cli) -> Result<i32> {
    let config = resolve_config(&cli.root, cli.config.as_deref())?;
    let report = if cli.json {
        let report = run_markers(&cli.root, cli.mode, &config, &mut io::sink())?;
        let payload = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{payload}");
        report
    } else {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        run_markers(&cli.root, cli.mode, &config, &mut out)?
    };
    Ok(report.exit_code())
}
