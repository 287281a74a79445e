//! Environment-provided config locations.
//!
//! Each setting has a dotted name (`v2ray.location.confdir`) and an
//! upper-cased alternate (`V2RAY_LOCATION_CONFDIR`) for shells that cannot
//! export dots. The dotted name is looked up first.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Directory scanned for `*.json` config files.
pub const CONF_DIR_ENV: &str = "v2ray.location.confdir";

/// Directory holding `config.json`; defaults to the executable's directory.
pub const CONFIG_LOCATION_ENV: &str = "v2ray.location.config";

/// File name looked up in the working directory and config location.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Read access to environment variables.
pub trait EnvLookup {
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key).map(|v| v.to_string_lossy().into_owned())
    }
}

impl EnvLookup for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Upper-case, trim and replace `.` with `_`.
pub fn normalize_env_name(name: &str) -> String {
    name.trim().to_uppercase().replace('.', "_")
}

/// A setting readable under its dotted name or its normalized alternate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFlag {
    pub name: String,
    pub alt_name: String,
}

impl EnvFlag {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            alt_name: normalize_env_name(name),
        }
    }

    /// The first variable that is set, even if empty; otherwise `default()`.
    pub fn get_value<E, F>(&self, env: &E, default: F) -> String
    where
        E: EnvLookup + ?Sized,
        F: FnOnce() -> String,
    {
        if let Some(value) = env.var(&self.name) {
            return value;
        }
        if !self.alt_name.is_empty() {
            if let Some(value) = env.var(&self.alt_name) {
                return value;
            }
        }
        default()
    }
}

/// Confdir declared in the environment, if any.
pub fn conf_dir_path<E: EnvLookup + ?Sized>(env: &E) -> Option<PathBuf> {
    let value = EnvFlag::new(CONF_DIR_ENV).get_value(env, String::new);
    (!value.is_empty()).then(|| PathBuf::from(value))
}

/// `config.json` under the environment's config location, falling back to
/// the executable's directory. `None` when neither is known.
pub fn config_file_path<E: EnvLookup + ?Sized>(env: &E, exe_dir: Option<&Path>) -> Option<PathBuf> {
    let location = EnvFlag::new(CONFIG_LOCATION_ENV).get_value(env, || {
        exe_dir
            .map(|dir| dir.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    if location.is_empty() {
        return None;
    }
    Some(Path::new(&location).join(DEFAULT_CONFIG_FILE))
}

/// Directory containing the running executable.
pub fn executable_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}
