/* Write side of the generated source: per-variable writers and `<base>_write` */

use super::primitives::{print_format, UNKNOWN_FORMAT};
use super::walk::{Emitter, Walker};
use super::Emitted;
use crate::diagnostics::Diagnostic;
use crate::model::Model;
use cfg_types::{Member, VarDef};

/// Name of the flag member that marks an array element as populated.
pub const IN_USE_FLAG: &str = "isInUsed";

struct WriteEmitter {
  out: String,
  depth: usize,
}

impl WriteEmitter {
  fn indent(&self) -> String {
    "\t".repeat(self.depth)
  }
}

fn has_in_use_flag(members: &[Member]) -> bool {
  members
    .iter()
    .any(|m| m.name == IN_USE_FLAG && !m.is_struct() && m.array_size.is_none())
}

impl Emitter for WriteEmitter {
  fn begin_variable(&mut self, var: &VarDef) {
    self.out.push_str(&format!("static int config_write_{}(FILE *cfg_file)\n{{\n", var.name));
    self.out.push_str(&format!("\tfprintf(cfg_file, \"CONF_{} = {{\\n\");\n", var.name));
    self.depth = 1;
  }

  fn end_variable(&mut self, _var: &VarDef) {
    self.out.push_str("\tfprintf(cfg_file, \"};\\n\\n\");\n");
    self.out.push_str("\treturn 0;\n}\n\n");
  }

  fn begin_element(&mut self, path: &str, members: &[Member]) {
    if has_in_use_flag(members) {
      self.out.push_str(&format!("{}if ({}.{} != 0) {{\n", self.indent(), path, IN_USE_FLAG));
      self.depth += 1;
    }
  }

  fn end_element(&mut self, _path: &str, members: &[Member]) {
    if has_in_use_flag(members) {
      self.depth -= 1;
      self.out.push_str(&format!("{}}}\n", self.indent()));
    }
  }

  fn leaf(&mut self, path: &str, type_name: &str, diagnostics: &mut Vec<Diagnostic>) {
    let format = print_format(type_name);
    if format == UNKNOWN_FORMAT {
      let diagnostic = Diagnostic::UnsupportedPrimitive {
        path: path.to_string(),
        type_name: type_name.to_string(),
      };
      diagnostics.push(diagnostic.logged());
    }
    self.out.push_str(&format!(
      "{}fprintf(cfg_file, \"\\t{} = {};\\n\", {});\n",
      self.indent(),
      path,
      format,
      path
    ));
  }
}

/// Per-variable writers followed by the exported `<base>_write`.
pub fn emit_write_functions(model: &Model, base: &str) -> Emitted {
  let mut emitter = WriteEmitter { out: String::new(), depth: 1 };
  let diagnostics = Walker::new(model).walk_variables(&mut emitter);

  let mut out = emitter.out;
  out.push_str(&format!("int {}_write(const char* cfg_file_name)\n", base));
  out.push_str(
    r#"{
	FILE *cfg_file = fopen(cfg_file_name, "w");
	if (cfg_file == NULL) {
		printf("%s:Unable to open file %s for writing.\n", __func__, cfg_file_name);
		return -1;
	}

"#,
  );
  for var in model.vars() {
    out.push_str(&format!("\tconfig_write_{}(cfg_file);\n", var.name));
  }
  out.push_str("\tfclose(cfg_file);\n\n");
  out.push_str("\treturn 0;\n");
  out.push_str("}\n");

  Emitted { text: out, diagnostics }
}
