//! Edge proxy configuration bootstrap.
//!
//! # Startup Overview
//!
//! ```text
//!   flags / env / cwd / stdin
//!            │
//!            ▼
//!   ┌──────────────────┐     ┌──────────────────┐     ┌───────────────┐
//!   │  SourceResolver  │────▶│  LoaderRegistry  │────▶│ format loader │
//!   │ (precedence)     │     │ (ext → name)     │     │ (json / toml) │
//!   └──────────────────┘     └──────────────────┘     └───────┬───────┘
//!                                                              │
//!                                                              ▼
//!                                                    Config → engine
//! ```
//!
//! Exit statuses: 0 success, 1 startup failure, 23 configuration error.
//! Long flags also accept a single dash (`-config`, `-confdir=DIR`).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use edge_bootstrap::config::{LoaderRegistry, SourceResolver};
use edge_bootstrap::lifecycle::startup::{
    describe, exit_code_for, load_startup_config, normalize_args, BootstrapOptions, EXIT_FAILURE,
    EXIT_OK,
};
use edge_bootstrap::observability::{init_logging, LogFormat};
use edge_bootstrap::version::version_statement;

#[derive(Parser, Debug)]
#[command(name = "edge-bootstrap")]
#[command(about = "Locate, select and load the proxy configuration", long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Config file or http(s) URL. Repeatable; later files override earlier ones
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: Vec<String>,

    /// Directory with multiple json config files
    #[arg(long, value_name = "DIR")]
    confdir: Option<PathBuf>,

    /// Format of input file, used when the extension is not recognised
    #[arg(long, default_value = "json")]
    format: String,

    /// Test config file only, without handing it to the engine
    #[arg(long)]
    test: bool,

    /// Show current version and exit
    #[arg(long)]
    version: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    for line in version_statement() {
        println!("{line}");
    }
    if cli.version {
        return ExitCode::from(EXIT_OK);
    }

    if let Err(e) = init_logging(cli.log_format) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::from(EXIT_FAILURE);
    }

    let registry = match LoaderRegistry::with_builtin_formats() {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!(error = %describe(&e), "Format registration failed");
            return ExitCode::from(exit_code_for(&e));
        }
    };
    tracing::debug!(formats = ?registry.format_names(), "Config formats registered");

    let options = BootstrapOptions {
        config_files: cli.config,
        config_dir: cli.confdir,
        format: cli.format,
    };

    let config = match load_startup_config(&registry, &SourceResolver::from_process(), &options) {
        Ok(config) => config,
        Err(e) => {
            // Printed as well as logged so the message survives a broken RUST_LOG.
            eprintln!("{}", describe(&e));
            tracing::error!(error = %describe(&e), "Failed to load configuration");
            return ExitCode::from(exit_code_for(&e));
        }
    };

    if cli.test {
        println!("Configuration OK.");
        return ExitCode::from(EXIT_OK);
    }

    tracing::info!(
        inbounds = config.inbounds.len(),
        outbounds = config.outbounds.len(),
        loglevel = %config.log.loglevel,
        "Configuration loaded"
    );

    ExitCode::from(EXIT_OK)
}
