//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! startup
//!     → registry.rs (formats register by name + extensions)
//!     → resolver.rs (flags, env.rs, cwd, stdin → one SourceInput)
//!     → registry.rs dispatch (extension first, then format hint)
//!     → formats/ (source.rs reads bytes, decode, merge)
//!     → validation.rs (semantic checks)
//!     → Config (owned by the caller, handed to the engine)
//! ```
//!
//! # Design Decisions
//! - The registry is an injected value, not a global
//! - Source discovery never fails; only loading does
//! - Config is immutable once loaded; there is no hot reload

pub mod env;
pub mod error;
pub mod format;
pub mod formats;
pub mod registry;
pub mod resolver;
pub mod schema;
pub mod source;
pub mod validation;

pub use error::{ConfigError, ValidationError};
pub use format::{ConfigLoader, FormatDescriptor};
pub use registry::LoaderRegistry;
pub use resolver::{Resolution, ResolveRequest, SourceOrigin, SourceResolver};
pub use schema::Config;
pub use source::{Document, SourceInput, SourceLocation};
