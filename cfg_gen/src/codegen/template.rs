/* Config template: the on-disk region format with placeholder values */

use super::walk::{Emitter, Walker};
use super::Emitted;
use crate::diagnostics::Diagnostic;
use crate::model::Model;
use cfg_types::VarDef;

pub const PLACEHOLDER: &str = "<value>";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemplateOptions {
  /// Prefix every line with `#`, so the file loads as nothing but comments.
  pub commented: bool,
}

struct TemplateEmitter {
  out: String,
  prefix: &'static str,
}

impl Emitter for TemplateEmitter {
  fn begin_variable(&mut self, var: &VarDef) {
    self.out.push_str(&format!("{}CONF_{} = {{\n", self.prefix, var.name));
  }

  fn end_variable(&mut self, _var: &VarDef) {
    self.out.push_str(&format!("{}}};\n\n", self.prefix));
  }

  fn leaf(&mut self, path: &str, _type_name: &str, _diagnostics: &mut Vec<Diagnostic>) {
    self.out.push_str(&format!("{}\t{} = {};\n", self.prefix, path, PLACEHOLDER));
  }
}

pub fn emit_template(model: &Model, options: TemplateOptions) -> Emitted {
  let mut emitter = TemplateEmitter {
    out: String::new(),
    prefix: if options.commented { "#" } else { "" },
  };
  let diagnostics = Walker::new(model).walk_variables(&mut emitter);
  Emitted { text: emitter.out, diagnostics }
}
