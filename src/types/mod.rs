//! Core type definitions for mirra

mod action;
mod entry;
mod error;
mod report;

pub use action::Action;
pub use entry::{Entry, EntryKind};
pub use error::MirrorError;
pub use report::{MemoryReporter, Report, Reporter, RunStats};
