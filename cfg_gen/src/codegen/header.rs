/* Header emitter: macros, struct declarations, externs and prototypes */

use crate::model::Model;
use cfg_types::{Member, MemberKind, StructDef, VarDef};
use indexmap::IndexSet;

fn array_suffix(array_size: Option<&str>) -> String {
  array_size.map(|size| format!("[{}]", size)).unwrap_or_default()
}

/* Field declaration inside a struct body; sizes keep their macro names */
fn format_member(member: &Member) -> String {
  let type_str = match &member.kind {
    MemberKind::Primitive { type_name } => type_name.clone(),
    MemberKind::Struct { struct_name, .. } => format!("struct {}", struct_name),
  };
  format!("{} {}{}", type_str, member.name, array_suffix(member.array_size.as_deref()))
}

pub fn emit_struct_definition(def: &StructDef) -> String {
  let mut out = format!("struct {} {{\n", def.name);
  for member in &def.members {
    out.push_str(&format!("\t{};\n", format_member(member)));
  }
  out.push_str("};\n\n");
  out
}

/// Declaration of a global, e.g. `struct Point origin` or `int ids[4]`.
pub fn format_variable(var: &VarDef) -> String {
  format!("{} {}{}", var.c_type(), var.name, array_suffix(var.array_size.as_deref()))
}

pub fn include_guard(base: &str) -> String {
  format!("{}_H", base.to_uppercase())
}

/// Everything between the include guard lines.
pub fn emit_header_body(model: &Model, base: &str) -> String {
  let mut out = String::from("#include <stdint.h>\n\n");

  for m in model.macros() {
    out.push_str(&format!("#define {} {}\n", m.name, m.value));
  }
  if !model.macros().is_empty() {
    out.push('\n');
  }

  /* Shadowed duplicates are left out; lookups see the first definition too */
  let mut declared = IndexSet::new();
  for def in model.structs() {
    if declared.insert(def.name.as_str()) {
      out.push_str(&emit_struct_definition(def));
    }
  }

  for var in model.vars() {
    out.push_str(&format!("extern {};\n", format_variable(var)));
  }
  if !model.vars().is_empty() {
    out.push('\n');
  }

  out.push_str(&format!("int {}_read(const char* file_name);\n\n", base));
  out.push_str(&format!("int {}_write(const char* file_name);\n\n", base));
  out
}

pub fn emit_header(model: &Model, base: &str, banner: &str) -> String {
  let guard = include_guard(base);
  let mut out = String::from(banner);
  out.push_str(&format!("#ifndef {}\n#define {}\n\n", guard, guard));
  out.push_str(&emit_header_body(model, base));
  out.push_str(&format!("#endif /* {} */\n", guard));
  out
}
