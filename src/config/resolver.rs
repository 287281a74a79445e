//! Config source discovery.
//!
//! # Precedence
//! ```text
//! 1. --confdir (existing dir with *.json)        → scanned files
//! 2. v2ray.location.confdir (same)               → scanned files
//! 3. --config / -c                               → explicit files
//! 4. <cwd>/config.json                           → single file
//! 5. <v2ray.location.config or exe dir>/config.json → single file
//! 6. stdin                                       → always available
//! ```
//!
//! # Design Decisions
//! - First step with at least one source wins; later steps never run
//! - A confdir scan replaces explicit files, it does not append to them
//! - Missing or wrong-type paths are "unavailable", never errors
//! - Scan order is sorted by file name so repeated runs agree

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::env::{self, EnvLookup, ProcessEnv, DEFAULT_CONFIG_FILE};
use crate::config::source::{SourceInput, SourceLocation};

/// Command-line inputs to resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveRequest {
    /// Files passed with `--config`, in order.
    pub config_files: Vec<SourceLocation>,
    /// Directory passed with `--confdir`.
    pub config_dir: Option<PathBuf>,
}

/// Which precedence step produced the sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOrigin {
    ConfDirFlag(PathBuf),
    ConfDirEnv(PathBuf),
    ExplicitFiles,
    WorkingDirDefault,
    EnvConfigFile,
    Stdin,
}

/// The chosen sources and where they came from.
#[derive(Debug)]
pub struct Resolution {
    pub input: SourceInput,
    pub origin: SourceOrigin,
}

impl Resolution {
    fn paths(paths: Vec<PathBuf>, origin: SourceOrigin) -> Self {
        Self {
            input: SourceInput::from_paths(paths),
            origin,
        }
    }
}

/// Resolves the single ordered source list for this process.
#[derive(Debug, Clone)]
pub struct SourceResolver<E = ProcessEnv> {
    env: E,
    working_dir: Option<PathBuf>,
    executable_dir: Option<PathBuf>,
}

impl SourceResolver<ProcessEnv> {
    /// Resolver over the real environment, working directory and executable.
    pub fn from_process() -> Self {
        Self {
            env: ProcessEnv,
            working_dir: std::env::current_dir().ok(),
            executable_dir: env::executable_dir(),
        }
    }
}

impl<E: EnvLookup> SourceResolver<E> {
    /// Resolver with no working or executable directory.
    pub fn new(env: E) -> Self {
        Self {
            env,
            working_dir: None,
            executable_dir: None,
        }
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_executable_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.executable_dir = Some(dir.into());
        self
    }

    /// Pick the configuration sources. Never fails; stdin is the last resort.
    pub fn resolve(&self, request: &ResolveRequest) -> Resolution {
        if let Some(dir) = request.config_dir.as_deref().filter(|d| dir_exists(d)) {
            let files = scan_config_dir(dir);
            if !files.is_empty() {
                tracing::info!(confdir = %dir.display(), files = files.len(), "Using confdir from arg");
                warn_ignored_files(request);
                return Resolution::paths(files, SourceOrigin::ConfDirFlag(dir.to_path_buf()));
            }
        }

        if let Some(dir) = env::conf_dir_path(&self.env).filter(|d| dir_exists(d)) {
            let files = scan_config_dir(&dir);
            if !files.is_empty() {
                tracing::info!(confdir = %dir.display(), files = files.len(), "Using confdir from env");
                warn_ignored_files(request);
                return Resolution::paths(files, SourceOrigin::ConfDirEnv(dir));
            }
        }

        if !request.config_files.is_empty() {
            tracing::info!(files = ?request.config_files, "Using config files from arg");
            return Resolution {
                input: SourceInput::Files(request.config_files.clone()),
                origin: SourceOrigin::ExplicitFiles,
            };
        }

        if let Some(working_dir) = &self.working_dir {
            let file = working_dir.join(DEFAULT_CONFIG_FILE);
            if file_exists(&file) {
                tracing::info!(path = %file.display(), "Using default config");
                return Resolution::paths(vec![file], SourceOrigin::WorkingDirDefault);
            }
        }

        if let Some(file) = env::config_file_path(&self.env, self.executable_dir.as_deref())
            .filter(|f| file_exists(f))
        {
            tracing::info!(path = %file.display(), "Using config from env");
            return Resolution::paths(vec![file], SourceOrigin::EnvConfigFile);
        }

        tracing::info!("Using config from STDIN");
        Resolution {
            input: SourceInput::Stdin,
            origin: SourceOrigin::Stdin,
        }
    }
}

fn warn_ignored_files(request: &ResolveRequest) {
    if !request.config_files.is_empty() {
        tracing::warn!(
            files = ?request.config_files,
            "Ignoring explicit config files because a confdir was found"
        );
    }
}

/// List `*.json` entries of `dir` (case-sensitive, non-recursive), sorted
/// by file name. An unreadable directory yields nothing.
pub fn scan_config_dir(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(confdir = %dir.display(), error = %e, "Failed to read confdir");
            return Vec::new();
        }
    };

    let mut found: Vec<(OsString, PathBuf)> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(confdir = %dir.display(), error = %e, "Skipping unreadable confdir entry");
                None
            }
        })
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".json"))
        .map(|entry| (entry.file_name(), entry.path()))
        .filter(|(_, path)| !path.is_dir())
        .collect();

    found.sort_by(|a, b| a.0.cmp(&b.0));
    found.into_iter().map(|(_, path)| path).collect()
}

/// An existing directory. Empty paths and files are not.
pub fn dir_exists(path: &Path) -> bool {
    !path.as_os_str().is_empty() && path.is_dir()
}

/// An existing non-directory.
pub fn file_exists(path: &Path) -> bool {
    !path.as_os_str().is_empty() && path.exists() && !path.is_dir()
}
