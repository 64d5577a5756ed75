/* Non-fatal findings reported by the parser and the emitters */

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq, Hash)]
pub enum Diagnostic {
  #[error("struct {name}: line {line}, expect }};")]
  UnterminatedStruct { name: String, line: usize },

  #[error("struct {name}: line {line}, invalid member `{text}`")]
  InvalidMember { name: String, line: usize, text: String },

  #[error("struct {name}: line {line}, struct has no members")]
  EmptyStruct { name: String, line: usize },

  #[error("no valid define for array size `{token}` at {path}: {reason}")]
  InvalidArraySize { path: String, token: String, reason: String },

  #[error("no reader/format for primitive type `{type_name}` at {path}")]
  UnsupportedPrimitive { path: String, type_name: String },

  #[error("variable `{name}` clashes with an identifier of the generated code")]
  ReservedName { name: String },
}

impl Diagnostic {
  /* Trace the diagnostic and hand it back, so call sites can push in one go.
   * Reporting to the user is up to whoever receives the collected list. */
  pub fn logged(self) -> Self {
    tracing::debug!("{}", self);
    self
  }
}
