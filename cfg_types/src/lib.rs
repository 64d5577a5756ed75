//! Configuration Definition Types
//!
//! This crate contains the data model parsed out of a `.cfg` definition
//! file: integer macros, struct definitions and top-level variables.
//! It holds pure data structures without any parsing, resolution or
//! code generation logic.

pub mod types;

// Re-export commonly used types at the crate root
pub use types::*;
