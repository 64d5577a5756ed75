/* Read side of the generated source: per-variable readers and `<base>_read` */

use super::primitives::converter;
use super::runtime;
use super::walk::{Emitter, Walker};
use super::Emitted;
use crate::diagnostics::Diagnostic;
use crate::model::Model;
use cfg_types::VarDef;

struct ReadEmitter {
  out: String,
}

impl Emitter for ReadEmitter {
  fn begin_variable(&mut self, var: &VarDef) {
    self.out.push_str(&format!("static int read_{}(char **cfg_buffs, int cfg_nbuffs)\n{{\n", var.name));
  }

  fn end_variable(&mut self, _var: &VarDef) {
    self.out.push_str("\n\treturn 0;\n}\n\n");
  }

  fn leaf(&mut self, path: &str, type_name: &str, diagnostics: &mut Vec<Diagnostic>) {
    if converter(type_name).is_none() {
      /* Still call the reader by name; no helper is generated for it */
      let diagnostic = Diagnostic::UnsupportedPrimitive {
        path: path.to_string(),
        type_name: type_name.to_string(),
      };
      diagnostics.push(diagnostic.logged());
    }
    self.out.push_str(&format!(
      "\tread_{}(&{}, \"{}\", cfg_buffs, cfg_nbuffs);\n",
      type_name, path, path
    ));
  }
}

/// One `read_<type>` helper per basic type that has a converter.
pub fn emit_parse_helpers(model: &Model) -> String {
  let mut out = String::new();
  for type_name in model.basic_types() {
    if let Some(conv) = converter(type_name) {
      out.push_str(&runtime::parse_helper(type_name, conv));
    }
  }
  out
}

/// Per-variable readers followed by the exported `<base>_read`.
pub fn emit_read_functions(model: &Model, base: &str) -> Emitted {
  let mut emitter = ReadEmitter { out: String::new() };
  let diagnostics = Walker::new(model).walk_variables(&mut emitter);

  let mut out = emitter.out;
  out.push_str(&format!("int {}_read(const char* cfg_file_name)\n", base));
  out.push_str(
    r#"{
	struct config_region *cfg_regions;
	int cfg_nregions;
	FILE *cfg_file;
	int cfg_i;

	cfg_file = fopen(cfg_file_name, "r");
	if (cfg_file == NULL) {
		printf("%s:Unable to open file %s for reading.\n", __func__, cfg_file_name);
		return -1;
	}

	cfg_regions = calloc(NUM_REGIONS_MAX, sizeof(*cfg_regions));
	if (cfg_regions == NULL) {
		printf("%s:unable to malloc\n", __func__);
		fclose(cfg_file);
		return -1;
	}

	cfg_nregions = parse_regions(cfg_file, cfg_regions, NUM_REGIONS_MAX);
	for (cfg_i = 0; cfg_i < cfg_nregions; cfg_i++) {
"#,
  );
  for var in model.vars() {
    out.push_str(&format!("\t\tif (strcmp(cfg_regions[cfg_i].name, \"CONF_{}\") == 0) {{\n", var.name));
    out.push_str(&format!("\t\t\tmemset(&{}, 0, sizeof({}));\n", var.name, var.name));
    out.push_str(&format!(
      "\t\t\tread_{}(cfg_regions[cfg_i].buffs, cfg_regions[cfg_i].nbuffs);\n",
      var.name
    ));
    out.push_str("\t\t}\n");
  }
  out.push_str("\t}\n\n");
  out.push_str("\trelease_regions(cfg_regions, cfg_nregions);\n");
  out.push_str("\tfree(cfg_regions);\n");
  out.push_str("\tfclose(cfg_file);\n\n");
  out.push_str("\treturn 0;\n");
  out.push_str("}\n\n");

  Emitted { text: out, diagnostics }
}
