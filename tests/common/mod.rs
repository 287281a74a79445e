//! Shared utilities for integration tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use edge_bootstrap::config::{Config, ConfigError, SourceInput, SourceLocation, SourceResolver};

/// Write `contents` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// A resolver that sees no environment variables and uses `cwd` as its
/// working directory.
pub fn isolated_resolver(cwd: &Path) -> SourceResolver<HashMap<String, String>> {
    SourceResolver::new(HashMap::new()).with_working_dir(cwd)
}

/// Locations passed to a recording loader, one entry per call.
pub type Calls = Arc<Mutex<Vec<Vec<SourceLocation>>>>;

/// A loader that records the file list it was called with and returns `result`.
#[allow(dead_code)]
pub fn recording_loader(
    result: Config,
) -> (
    impl Fn(SourceInput) -> Result<Config, ConfigError> + Send + Sync + 'static,
    Calls,
) {
    let calls: Calls = Arc::default();
    let recorded = Arc::clone(&calls);
    let loader = move |input: SourceInput| -> Result<Config, ConfigError> {
        let locations = input.locations().map(<[_]>::to_vec).unwrap_or_default();
        recorded.lock().unwrap().push(locations);
        Ok(result.clone())
    };
    (loader, calls)
}
