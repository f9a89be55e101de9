//! usrgrp-ldif binary entry point.
//!
//! Parses the command line, resolves the run configuration, and drives one
//! CSV to LDIF conversion pass.
//!
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use usrgrp_ldif::config::Config;
use usrgrp_ldif::run::{self, Mode};

#[derive(Debug, Parser)]
#[command(name = "usrgrp-ldif")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CSV file with user records (default: auto-detected layout).
    input: Option<PathBuf>,

    /// Force the mode instead of inferring it from the input.
    #[arg(value_enum)]
    mode: Option<ForcedMode>,

    /// Directory the LDIF documents are written to.
    #[arg(short, long, env = "USRGRP_LDIF_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Optional key=value file overriding directory constants.
    #[arg(short, long, env = "USRGRP_LDIF_CONFIG")]
    config: Option<PathBuf>,
}

/// Modes an operator may force from the command line. `all` is only ever
/// inferred from mixed content, never forced.
#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum ForcedMode {
    Admins,
    Additional,
}

impl From<ForcedMode> for Mode {
    fn from(mode: ForcedMode) -> Self {
        match mode {
            ForcedMode::Admins => Mode::Admins,
            ForcedMode::Additional => Mode::Additional,
        }
    }
}

/// Build the run configuration: config file first, then the filesystem
/// layout probe, then command-line overrides.
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(&path.to_string_lossy())
            .with_context(|| format!("failed to read config file '{}'", path.display()))?,
        None => Config::default(),
    };
    config.detect_layout();
    if let Some(input) = &cli.input {
        config.users_csv = input.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    Ok(config)
}

/// Program entry point: run one conversion pass and report any top-level
/// error to stderr with a non-zero exit status.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    };

    if let Some(input) = &cli.input {
        if !input.exists() {
            eprintln!("error: CSV file '{}' not found", input.display());
            std::process::exit(1);
        }
    }

    match run::run(&config, cli.mode.map(Into::into)) {
        Ok(summary) => {
            info!(
                mode = %summary.mode,
                admins = ?summary.admins,
                users = ?summary.users,
                "conversion complete"
            );
            for path in &summary.written {
                info!(path = %path.display(), "wrote");
            }
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
