//! Error types for configuration registration, loading and validation.

use thiserror::Error;

/// Boxed error produced by a format decoder.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while registering formats or loading a configuration.
///
/// Resolution of sources never produces one of these; only registration and
/// the final dispatch to a loader do.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A format with the same (case-insensitive) name is already registered.
    #[error("config format {name} already registered")]
    AlreadyRegistered { name: String },

    /// An extension is already owned by another format.
    #[error("config extension {extension} already registered to {owner}")]
    ExtensionAlreadyRegistered { extension: String, owner: String },

    /// Neither the sniffed extension nor the format hint matched a registered format.
    #[error("unable to load config in format {format}")]
    UnknownFormat { format: String },

    /// A local source (file, stdin, stream) could not be read.
    #[error("failed to read config from {location}")]
    SourceRead {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// A remote source could not be fetched.
    #[error("failed to fetch config from {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The selected format could not decode the bytes it was given.
    #[error("failed to decode config from {origin}")]
    Decode {
        origin: String,
        #[source]
        source: BoxError,
    },

    /// The decoded configuration is semantically invalid.
    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    /// A loader failed; carries the format that was dispatched to.
    #[error("{format} loader failed")]
    Load {
        format: String,
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// True for the startup-time registry collisions.
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            ConfigError::AlreadyRegistered { .. } | ConfigError::ExtensionAlreadyRegistered { .. }
        )
    }

    /// Strips any `Load` wrappers and returns the loader's own error.
    pub fn root(&self) -> &ConfigError {
        match self {
            ConfigError::Load { source, .. } => source.root(),
            other => other,
        }
    }
}

/// A single semantic problem found in a decoded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("inbound {index} has port 0")]
    ZeroPort { index: usize },

    #[error("duplicate tag {tag}")]
    DuplicateTag { tag: String },

    #[error("unknown log level {level}")]
    UnknownLogLevel { level: String },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
