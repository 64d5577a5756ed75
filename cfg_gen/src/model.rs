/* Two-phase model: a mutable builder filled by the parser, and the
 * immutable resolved view handed to every emitter. */

use cfg_types::{Macro, StructDef, VarDef};
use indexmap::{IndexMap, IndexSet};
use serde_derive::Serialize;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ModelBuilder {
  macros: Vec<Macro>,
  structs: Vec<StructDef>,
  vars: Vec<VarDef>,
}

impl ModelBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_macro(&mut self, m: Macro) {
    self.macros.push(m);
  }

  pub fn add_struct(&mut self, def: StructDef) {
    self.structs.push(def);
  }

  pub fn add_var(&mut self, var: VarDef) {
    self.vars.push(var);
  }

  pub fn macros(&self) -> &[Macro] {
    &self.macros
  }

  pub fn structs(&self) -> &[StructDef] {
    &self.structs
  }

  pub fn vars(&self) -> &[VarDef] {
    &self.vars
  }

  pub(crate) fn into_parts(self) -> (Vec<Macro>, Vec<StructDef>, Vec<VarDef>) {
    (self.macros, self.structs, self.vars)
  }
}

/// Resolved model. Every struct in it is a self-contained tree; nothing
/// can be mutated once resolution produced it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Model {
  macros: Vec<Macro>,
  structs: Vec<StructDef>,
  vars: Vec<VarDef>,
  basic_types: IndexSet<String>,
  #[serde(skip)]
  struct_index: IndexMap<String, usize>,
}

impl Model {
  pub(crate) fn from_parts(
    macros: Vec<Macro>,
    structs: Vec<StructDef>,
    vars: Vec<VarDef>,
    basic_types: IndexSet<String>,
  ) -> Self {
    let struct_index = build_struct_index(&structs);
    Self { macros, structs, vars, basic_types, struct_index }
  }

  pub fn macros(&self) -> &[Macro] {
    &self.macros
  }

  /// Struct definitions in definition order, duplicates included.
  pub fn structs(&self) -> &[StructDef] {
    &self.structs
  }

  pub fn vars(&self) -> &[VarDef] {
    &self.vars
  }

  /// Primitive type names used by the variables, in first-seen order.
  pub fn basic_types(&self) -> &IndexSet<String> {
    &self.basic_types
  }

  /* First definition wins */
  pub fn find_struct(&self, name: &str) -> Option<&StructDef> {
    self.struct_index.get(name).map(|&idx| &self.structs[idx])
  }
}

/* Map each struct name to the position of its first definition */
pub(crate) fn build_struct_index(structs: &[StructDef]) -> IndexMap<String, usize> {
  let mut index = IndexMap::new();
  for (idx, def) in structs.iter().enumerate() {
    if index.contains_key(&def.name) {
      tracing::debug!("struct {} is defined more than once; keeping the first definition", def.name);
      continue;
    }
    index.insert(def.name.clone(), idx);
  }
  index
}
