//! Command entry points

pub mod mirror;

pub use mirror::{run, run_reported, run_with_platform};
