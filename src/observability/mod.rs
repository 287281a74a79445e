//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! bootstrap (registry, resolver, loaders)
//!     → tracing events with structured fields
//!     → logging.rs subscriber (stderr, pretty or JSON)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Initialized once, before the registry is built

pub mod logging;

pub use logging::{init_logging, LogFormat};
