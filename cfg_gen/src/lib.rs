//! Code generator for `.cfg` definition files.
//!
//! A definition file declares C structs, globals and integer macros. From
//! one parsed and resolved model this crate emits a C header, a C source
//! file that persists the globals to a region-based text format, and an
//! editable template of that format.

pub mod codegen;
pub mod diagnostics;
pub mod model;
pub mod parse;
pub mod resolve;

pub use diagnostics::Diagnostic;
pub use model::{Model, ModelBuilder};
pub use parse::{parse_definitions, ParseOutput};
pub use resolve::{resolve, ResolveError};

pub use cfg_types;
