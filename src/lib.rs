#![forbid(unsafe_code)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Ledmerge — merge custom LED-matrix animations between CYBERBOARD keyboard
//! firmware JSON configurations.
//!
//! This crate organizes the codebase into cohesive modules and exposes a convenient prelude
//! for downstream crates/binaries. Most implementation details live under the internal modules:
//! - `model`: LED document data model (configuration, pages, frames), frame merger, choice enums.
//! - `validate`: structural validation of a loaded document.
//! - `store`: file store over the source/output directory pair (list, load, save).
//! - `settings`: application settings and directory bootstrap.
//! - `workflow`: the interactive three-slot merge session state machine.
//! - `ui`: presentation collaborator trait and the terminal implementation.
//!
//! Use `ledmerge::prelude::*` to bring commonly used items into scope quickly.

/// Public module: LED document data model, merger, and choice enums.
pub mod model;
/// Public module: application settings (directories, frame cap).
pub mod settings;
/// Public module: configuration file store (list, load, save).
pub mod store;
/// Public module: presentation collaborator (trait + terminal impl).
pub mod ui;
/// Public module: structural document validation.
pub mod validate;
/// Public module: merge session state machine.
pub mod workflow;

/// Crate-level constants for consumers that want to inspect package metadata at runtime.
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the crate version (e.g., "0.1.0").
#[inline]
pub const fn version() -> &'static str {
    PKG_VERSION
}

/// Initialize tracing (logging) with a reasonable default.
/// - Honors the `RUST_LOG` environment variable if set.
/// - Falls back to `info` level.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init_tracing() {
    use tracing::Level;
    use tracing_subscriber::fmt;

    // Parse RUST_LOG as a simple level (trace|debug|info|warn|error)
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| match s.to_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        })
        .unwrap_or(Level::INFO);

    // Ignore the error if the global subscriber was already set.
    let _ = fmt().with_max_level(level).try_init();
}

/// A convenient set of exports for most consumers.
///
/// Bring this into scope with:
/// `use ledmerge::prelude::*;`
pub mod prelude {
    // Common result/error handling
    pub use anyhow::{Context, Error, Result, anyhow, bail, ensure};

    // Serialization
    pub use serde::{Deserialize, Serialize};

    // Tracing macros
    pub use tracing::{debug, error, info, instrument, trace, warn};

    // This crate, namespaced, if callers want direct access
    pub use crate as ledmerge;

    // Frequently used internal modules
    pub use crate::{model, settings, store, ui, validate, workflow};
}
