//! Configuration bootstrap for the edge proxy engine.
//!
//! Finds the startup configuration, picks the format that can read it and
//! produces a [`Config`] for the engine.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod version;

pub use config::{Config, ConfigError, LoaderRegistry, SourceInput, SourceResolver};
pub use lifecycle::startup::{load_startup_config, BootstrapOptions};
