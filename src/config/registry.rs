//! Format loader registry.
//!
//! # Responsibilities
//! - Own the name and extension lookup tables
//! - Reject colliding registrations atomically
//! - Dispatch a source to the right loader
//!
//! # Design Decisions
//! - Both tables sit behind a single lock so a half-registered format is never visible
//! - Extension match wins over the format hint; directory scans carry no per-file format
//! - Names and extensions are compared case-insensitively
//! - The lock is released before a loader runs

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::error::ConfigError;
use crate::config::format::FormatDescriptor;
use crate::config::formats;
use crate::config::schema::Config;
use crate::config::source::SourceInput;

#[derive(Default)]
struct Tables {
    by_name: HashMap<String, Arc<FormatDescriptor>>,
    by_extension: HashMap<String, Arc<FormatDescriptor>>,
}

/// Registry of configuration formats, keyed by name and by file extension.
///
/// Built once during startup and then shared by reference or `Arc`.
#[derive(Default)]
pub struct LoaderRegistry {
    tables: RwLock<Tables>,
}

impl LoaderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the builtin formats registered.
    pub fn with_builtin_formats() -> Result<Self, ConfigError> {
        let registry = Self::new();
        formats::register_builtin(&registry)?;
        Ok(registry)
    }

    /// Register a format. Either the whole descriptor is registered or,
    /// on any collision, nothing is.
    pub fn register(&self, descriptor: FormatDescriptor) -> Result<(), ConfigError> {
        let name = descriptor.name.to_lowercase();
        let extensions: Vec<String> = descriptor
            .extensions
            .iter()
            .map(|ext| normalize_extension(ext))
            .filter(|ext| !ext.is_empty())
            .collect();

        let mut tables = self.write();

        if tables.by_name.contains_key(&name) {
            return Err(ConfigError::AlreadyRegistered {
                name: descriptor.name.clone(),
            });
        }
        for (i, ext) in extensions.iter().enumerate() {
            if let Some(owner) = tables.by_extension.get(ext) {
                return Err(ConfigError::ExtensionAlreadyRegistered {
                    extension: ext.clone(),
                    owner: owner.name.clone(),
                });
            }
            if extensions[..i].contains(ext) {
                return Err(ConfigError::ExtensionAlreadyRegistered {
                    extension: ext.clone(),
                    owner: descriptor.name.clone(),
                });
            }
        }

        tracing::debug!(format = %descriptor.name, extensions = ?extensions, "Registered config format");

        let descriptor = Arc::new(descriptor);
        for ext in extensions {
            tables.by_extension.insert(ext, Arc::clone(&descriptor));
        }
        tables.by_name.insert(name, descriptor);
        Ok(())
    }

    /// Pick the format for a file name and hint without loading anything.
    pub fn select(&self, format_hint: &str, file_name: &str) -> Option<Arc<FormatDescriptor>> {
        let tables = self.read();

        let ext = extension_of(file_name);
        if !ext.is_empty() {
            if let Some(format) = tables.by_extension.get(&ext.to_lowercase()) {
                return Some(Arc::clone(format));
            }
        }

        tables.by_name.get(&format_hint.to_lowercase()).cloned()
    }

    /// Load a configuration.
    ///
    /// The extension of `file_name` selects the format when it is registered;
    /// otherwise `format_hint` does. Loader failures are wrapped with the
    /// format name.
    ///
    /// Blocking. URL sources are fetched on a dedicated thread, so this is
    /// safe to call from inside an async runtime, though it will stall the
    /// calling worker until the load completes.
    pub fn load(
        &self,
        format_hint: &str,
        file_name: &str,
        input: SourceInput,
    ) -> Result<Config, ConfigError> {
        let format = self
            .select(format_hint, file_name)
            .ok_or_else(|| ConfigError::UnknownFormat {
                format: format_hint.to_string(),
            })?;

        tracing::info!(format = %format.name, source = ?input, "Loading config");

        format
            .loader
            .load(input)
            .map_err(|source| ConfigError::Load {
                format: format.name.clone(),
                source: Box::new(source),
            })
    }

    /// Names of all registered formats, sorted.
    pub fn format_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .read()
            .by_name
            .values()
            .map(|f| f.name.clone())
            .collect();
        names.sort();
        names
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The substring after the last `.`, or empty when there is none.
pub fn extension_of(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) => &file_name[idx + 1..],
        None => "",
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::source::SourceLocation;

    /// A loader whose result records which format ran.
    fn stub(tag: &'static str) -> impl Fn(SourceInput) -> Result<Config, ConfigError> + Send + Sync {
        move |_input: SourceInput| -> Result<Config, ConfigError> {
            let mut config = Config::default();
            config.log.access = tag.to_string();
            Ok(config)
        }
    }

    fn registry() -> LoaderRegistry {
        let registry = LoaderRegistry::new();
        registry
            .register(FormatDescriptor::new("JSON", ["json"], stub("json")))
            .unwrap();
        registry
            .register(FormatDescriptor::new("toml", ["toml", "tml"], stub("toml")))
            .unwrap();
        registry
    }

    fn loaded_by(result: Result<Config, ConfigError>) -> String {
        result.unwrap().log.access
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("config.json"), "json");
        assert_eq!(extension_of("/etc/conf.d/a.b.TOML"), "TOML");
        assert_eq!(extension_of("config"), "");
        assert_eq!(extension_of("trailing."), "");
        assert_eq!(extension_of(""), "");
    }

    #[test]
    fn duplicate_name_is_rejected_case_insensitively() {
        let registry = registry();
        let err = registry
            .register(FormatDescriptor::new("json", ["jsonc"], stub("other")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::AlreadyRegistered { ref name } if name == "json"));

        // The rejected descriptor's extension was not inserted.
        assert!(registry.select("", "a.jsonc").is_none());
    }

    #[test]
    fn extension_collision_is_atomic() {
        let registry = registry();
        let err = registry
            .register(FormatDescriptor::new("yaml", ["yaml", "TML"], stub("yaml")))
            .unwrap_err();
        match err {
            ConfigError::ExtensionAlreadyRegistered { extension, owner } => {
                assert_eq!(extension, "tml");
                assert_eq!(owner, "toml");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // Nothing from the rejected descriptor is visible.
        assert!(registry.select("yaml", "").is_none());
        assert!(registry.select("", "x.yaml").is_none());
        // The first registration is intact.
        assert_eq!(loaded_by(registry.load("", "x.tml", SourceInput::Stdin)), "toml");
        assert_eq!(registry.format_names(), vec!["JSON", "toml"]);
    }

    #[test]
    fn repeated_extension_within_descriptor_is_rejected() {
        let registry = LoaderRegistry::new();
        let err = registry
            .register(FormatDescriptor::new("yaml", ["yml", ".YML"], stub("yaml")))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ExtensionAlreadyRegistered { ref owner, .. } if owner == "yaml"
        ));
        assert!(registry.format_names().is_empty());
    }

    #[test]
    fn extension_wins_over_hint() {
        let registry = registry();
        assert_eq!(loaded_by(registry.load("toml", "config.json", SourceInput::Stdin)), "json");
        assert_eq!(loaded_by(registry.load("json", "config.TOML", SourceInput::Stdin)), "toml");
        assert_eq!(loaded_by(registry.load("bogus", "config.json", SourceInput::Stdin)), "json");
    }

    #[test]
    fn falls_back_to_hint() {
        let registry = registry();
        assert_eq!(loaded_by(registry.load("TOML", "config", SourceInput::Stdin)), "toml");
        assert_eq!(loaded_by(registry.load("json", "config.conf", SourceInput::Stdin)), "json");
    }

    #[test]
    fn unknown_format() {
        let registry = registry();
        let err = registry
            .load("protobuf", "config.pb", SourceInput::Stdin)
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownFormat { ref format } if format == "protobuf"));
    }

    #[test]
    fn loader_failure_is_wrapped_with_format() {
        let registry = LoaderRegistry::new();
        registry
            .register(FormatDescriptor::new(
                "broken",
                ["brk"],
                |_input: SourceInput| -> Result<Config, ConfigError> {
                    Err(ConfigError::SourceRead {
                        location: "a.brk".into(),
                        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
                    })
                },
            ))
            .unwrap();

        let input = SourceInput::Files(vec![SourceLocation::parse("a.brk")]);
        let err = registry.load("", "a.brk", input).unwrap_err();
        match &err {
            ConfigError::Load { format, .. } => assert_eq!(format, "broken"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(err.root(), ConfigError::SourceRead { location, .. } if location == "a.brk"));
    }

    #[test]
    fn builtin_formats_are_registered() {
        let registry = LoaderRegistry::with_builtin_formats().unwrap();
        assert_eq!(registry.format_names(), vec!["json", "toml"]);
        assert_eq!(registry.select("", "a.json").unwrap().name, "json");
        assert_eq!(registry.select("", "a.toml").unwrap().name, "toml");
    }
}
