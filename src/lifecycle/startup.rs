//! Startup orchestration.
//!
//! # Responsibilities
//! - Translate command-line inputs into a resolution request
//! - Resolve sources and dispatch them to the registry
//! - Map failures to documented exit statuses
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Registry and resolver are injected so tests never touch process state

use std::error::Error;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::env::EnvLookup;
use crate::config::error::ConfigError;
use crate::config::registry::LoaderRegistry;
use crate::config::resolver::{ResolveRequest, SourceResolver};
use crate::config::schema::Config;
use crate::config::source::SourceLocation;

/// Normal exit.
pub const EXIT_OK: u8 = 0;

/// Startup failed for a reason other than configuration.
pub const EXIT_FAILURE: u8 = 1;

/// The configuration is invalid; supervisors should not restart.
pub const EXIT_CONFIG_ERROR: u8 = 23;

/// Inputs collected by the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapOptions {
    /// `--config` values, in order. URLs are fetched, everything else is a path.
    pub config_files: Vec<String>,
    /// `--confdir`.
    pub config_dir: Option<PathBuf>,
    /// `--format`; used when the first source's extension is not registered.
    pub format: String,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            config_files: Vec::new(),
            config_dir: None,
            format: "json".to_string(),
        }
    }
}

/// Lower-cased, trimmed format name. `pb` is an alias for `protobuf`.
pub fn canonical_format_name(raw: &str) -> String {
    match raw.trim().to_lowercase().as_str() {
        "pb" => "protobuf".to_string(),
        name => name.to_string(),
    }
}

/// Long flags that are also accepted with a single dash.
const SINGLE_DASH_FLAGS: &[&str] = &["config", "confdir", "format", "test", "version", "log-format"];

/// Rewrite `-config`, `-confdir=DIR` and the other single-dash long flags to
/// their `--` form. Everything after a bare `--` is left alone, as are short
/// flags such as `-c`.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut positional = false;
    args.into_iter()
        .map(|arg| {
            if positional {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                positional = true;
                return arg;
            }
            match text.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
                    if SINGLE_DASH_FLAGS.contains(&name) {
                        OsString::from(format!("-{text}"))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}

/// Resolve sources and load the startup configuration.
pub fn load_startup_config<E: EnvLookup>(
    registry: &LoaderRegistry,
    resolver: &SourceResolver<E>,
    options: &BootstrapOptions,
) -> Result<Config, ConfigError> {
    let request = ResolveRequest {
        config_files: options
            .config_files
            .iter()
            .map(|f| SourceLocation::parse(f))
            .collect(),
        config_dir: options.config_dir.clone(),
    };

    let resolution = resolver.resolve(&request);
    let file_name = resolution.input.representative_name();
    let format = canonical_format_name(&options.format);

    tracing::debug!(origin = ?resolution.origin, file_name = %file_name, format = %format, "Sources resolved");

    registry.load(&format, &file_name, resolution.input)
}

/// Exit status for a failed bootstrap.
pub fn exit_code_for(err: &ConfigError) -> u8 {
    if err.is_registration_error() {
        EXIT_FAILURE
    } else {
        EXIT_CONFIG_ERROR
    }
}

/// The error and all of its sources, joined with `: `.
pub fn describe(err: &ConfigError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
