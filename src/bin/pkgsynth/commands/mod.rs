//! Command implementations.

pub mod completions;
pub mod externals;
pub mod generate;
