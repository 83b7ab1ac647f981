//! High-level operations.
//!
//! This module contains the synthesis pass itself and the deterministic
//! serializer it feeds.

pub mod serialize;
pub mod synthesize;

pub use serialize::to_json;
pub use synthesize::{Synthesis, Synthesizer};
