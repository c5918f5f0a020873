use std::path::PathBuf;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fgd_core::{ToolFailure, EXIT_FGD_ERROR};
use fgd_runner::{resolve, verify, write_result, Config, Overrides};

/// Audit a finished CI job's evidence and decide whether its green status holds.
#[derive(Parser, Debug)]
#[command(name = "fgd", version)]
struct Cli {
    /// Commit identifier under audit
    #[arg(long)]
    commit: Option<String>,

    /// Root of the required artifacts and the provenance record [default: artifacts]
    #[arg(long)]
    artifacts_dir: Option<String>,

    /// Console log of the job [default: logs/ci.log]
    #[arg(long)]
    logs: Option<String>,

    /// Build-cache metadata record [default: cache/metadata.json]
    #[arg(long)]
    cache_meta: Option<String>,

    /// Where to write the result record [default: <artifacts-dir>/fgd_result.json]
    #[arg(long)]
    out: Option<String>,

    /// Comma-separated required artifact paths, relative to --artifacts-dir
    /// [default: test_report.xml,build_artifact.bin,provenance.json]
    #[arg(long)]
    required: Option<String>,

    /// Exit code the job reported [default: 0]
    #[arg(long, allow_negative_numbers = true)]
    exit_code: Option<i32>,

    /// Extra log pattern (regular expression), checked after the built-in ones
    #[arg(long)]
    error_pattern: Option<String>,

    /// TOML file supplying defaults for any of the flags above
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let file = match &cli.config {
        Some(path) => Some(Config::load_from(path)?),
        None => None,
    };
    let overrides = Overrides {
        commit: cli.commit,
        artifacts_dir: cli.artifacts_dir,
        logs: cli.logs,
        cache_meta: cli.cache_meta,
        out: cli.out,
        required: cli.required,
        exit_code: cli.exit_code,
        error_pattern: cli.error_pattern,
    };
    let settings = resolve(overrides, file.as_ref())?;

    let result = verify(&settings.request)?;
    let json = write_result(&settings.out_path, &result).context("persist result")?;
    println!("{json}");
    Ok(result.exit_code())
}

fn fail(failure: ToolFailure) -> i32 {
    eprintln!("{}", failure.to_json());
    EXIT_FGD_ERROR
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let code = match Cli::try_parse() {
        Ok(cli) => match run(cli) {
            Ok(code) => code,
            Err(e) => fail(ToolFailure::new(format!("{e:#}"))),
        },
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            0
        }
        Err(e) => {
            let msg = e.to_string();
            let first = msg.lines().next().unwrap_or_default();
            fail(ToolFailure::new(first.trim_start_matches("error: ").to_string()))
        }
    };
    std::process::exit(code);
}
