//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Init logging → Build registry → Resolve sources → Load config → Hand off
//! ```
//!
//! # Design Decisions
//! - Ordered startup: every format is registered before the first resolution
//! - Fail fast: any startup error is fatal
//! - Configuration errors use a dedicated exit status so supervisors do not restart

pub mod startup;
