//! Front end: line classification and the definition parser.

pub mod line;
pub mod parser;

pub use line::{classify, Line};
pub use parser::{parse_definitions, ParseOutput};
