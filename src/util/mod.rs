//! Shared utilities

pub mod config;
pub mod diagnostic;
pub mod fs;

pub use config::{OutputConfig, SynthConfig};
pub use diagnostic::Diagnostic;
