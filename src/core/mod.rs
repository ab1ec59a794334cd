//! Core domain models
//!
//! This module defines the pipeline state threaded through every stage,
//! the stage identifiers, and the generator configuration.

pub mod config;
pub mod pipeline;
pub mod stage;
pub mod state;

pub use config::GeneratorConfig;
pub use pipeline::*;
pub use stage::*;
pub use state::*;
