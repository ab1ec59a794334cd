//! Parsing of free-text completions
//!
//! Everything here is pure text processing; stages decide what to record
//! when a parse fails.

pub mod analysis;
pub mod code_blocks;
pub mod dependencies;

pub use analysis::{parse_document_analysis, AnalysisError};
pub use code_blocks::{extract_code_block, parse_component_code, ParseError};
pub use dependencies::{detect_dependencies, Dependencies};
