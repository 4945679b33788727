//! Command-line interface for clone
//!
//! `clone REPO [USER] [SITE]` with a handful of options for the parent
//! directory, config file and logging.

use anyhow::{Context, Result};
use clap::Parser;
use clone::config::{default_config_dir, load_config};
use clone::{Driver, Invocation, USAGE};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Clone repositories from hosting sites without installing git
#[derive(Parser)]
#[command(name = "clone")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Repository name, optionally followed by user and site
    #[arg(value_name = "REPO [USER] [SITE]")]
    args: Vec<String>,

    /// Directory to clone into (defaults to the current directory)
    #[arg(short = 'C', long, value_name = "DIR")]
    parent: Option<PathBuf>,

    /// List every matching repo/user/site instead of cloning the first
    #[arg(long)]
    list: bool,

    /// Config file (TOML or YAML)
    #[arg(long, env = "CLONE_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Timeout for each existence probe, in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    verbose: bool,
}

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let Some(invocation) = Invocation::from_positional(&cli.args) else {
        println!("{USAGE}");
        return Ok(ExitCode::FAILURE);
    };

    let mut config = load_config(default_config_dir().as_deref(), cli.config.as_deref())?;
    if let Some(secs) = cli.timeout {
        config.probe_timeout_secs = secs;
    }

    let sites = config.site_table();
    let transport = config.transport().context("Failed to set up HTTP client")?;
    let driver = Driver::new(&transport, &sites).parent(cli.parent).list_only(cli.list);

    let mut stdout = std::io::stdout().lock();
    let outcome = driver
        .drive(&invocation, &mut stdout)
        .with_context(|| format!("Failed to clone {}", invocation.repo))?;

    Ok(if outcome.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
