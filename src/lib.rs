//! # mirra - One-way directory mirroring
//!
//! Safety by default: nothing in the destination is overwritten or deleted
//! without a versioned copy landing in the trash root first.
//!
//! The walk reports every decision through a [`Reporter`] before acting on
//! it, and can run as a dry run that only reports.

// Module declarations
pub mod commands;
pub mod config;
pub mod executor;
pub mod planner;
pub mod platform;
pub mod scanner;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use platform::{NativePlatform, Platform};
pub use types::{Action, Entry, EntryKind, MemoryReporter, MirrorError, Report, Reporter, RunStats};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
