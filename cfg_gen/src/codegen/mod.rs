pub mod array;
pub mod c;
pub mod header;
pub mod primitives;
pub mod read;
pub mod runtime;
pub mod template;
pub mod walk;
pub mod write;

use crate::diagnostics::Diagnostic;

/// Text produced by one emitter together with what it reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Emitted {
  pub text: String,
  pub diagnostics: Vec<Diagnostic>,
}

/* Turn a file stem into something usable as a C identifier prefix */
pub fn c_identifier(name: &str) -> String {
  let mut ident: String = name
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
    .collect();
  if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, '_');
  }
  ident
}
