/* Resolver: materializes struct references into owned member trees and
 * derives the set of primitive types the generated code has to read. */

use crate::model::{build_struct_index, Model, ModelBuilder};
use cfg_types::{Member, MemberKind, StructDef, VarDef, VarKind};
use indexmap::{IndexMap, IndexSet};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
  #[error("circular struct reference: {}", chain.join(" -> "))]
  CircularReference { chain: Vec<String> },
}

/// Consume the parser's tables and produce the immutable resolved model.
pub fn resolve(builder: ModelBuilder) -> Result<Model, ResolveError> {
  let (macros, structs, vars) = builder.into_parts();

  let resolver = Resolver::new(&structs);
  let expanded = structs
    .iter()
    .map(|def| resolver.expand_struct(def))
    .collect::<Result<Vec<_>, _>>()?;

  let index = build_struct_index(&expanded);
  let basic_types = collect_basic_types(&vars, |name| index.get(name).map(|&idx| &expanded[idx]));

  Ok(Model::from_parts(macros, expanded, vars, basic_types))
}

pub struct Resolver<'a> {
  definitions: IndexMap<&'a str, &'a StructDef>,
}

impl<'a> Resolver<'a> {
  pub fn new(structs: &'a [StructDef]) -> Self {
    let mut definitions = IndexMap::new();
    for def in structs {
      definitions.entry(def.name.as_str()).or_insert(def);
    }
    Self { definitions }
  }

  /// Return an owned copy of `def` with every reachable struct member
  /// expanded. Members that already carry their nested members are left
  /// untouched, so expanding an expanded tree is a no-op.
  pub fn expand_struct(&self, def: &StructDef) -> Result<StructDef, ResolveError> {
    let mut expanded = def.clone();
    let mut stack = vec![def.name.clone()];
    self.expand_members(&mut expanded.members, &mut stack)?;
    Ok(expanded)
  }

  fn expand_members(&self, members: &mut [Member], stack: &mut Vec<String>) -> Result<(), ResolveError> {
    for member in members.iter_mut() {
      let MemberKind::Struct { struct_name, members: nested } = &mut member.kind else {
        continue;
      };
      if !nested.is_empty() {
        continue;
      }

      let Some(target) = self.definitions.get(struct_name.as_str()) else {
        /* Unknown struct: left empty, emitters see a struct without fields */
        tracing::debug!("struct {} referenced by member {} is not defined", struct_name, member.name);
        continue;
      };

      if stack.iter().any(|name| name == struct_name) {
        let mut chain = stack.clone();
        chain.push(struct_name.clone());
        return Err(ResolveError::CircularReference { chain });
      }

      stack.push(struct_name.clone());
      let mut target_members = target.members.clone();
      self.expand_members(&mut target_members, stack)?;
      stack.pop();

      *nested = target_members;
    }
    Ok(())
  }
}

/// Collect primitive type names in first-seen order: a primitive variable
/// contributes its own type, a struct variable every leaf of its struct.
pub fn collect_basic_types<'s>(
  vars: &[VarDef],
  lookup: impl Fn(&str) -> Option<&'s StructDef>,
) -> IndexSet<String> {
  let mut basic_types = IndexSet::new();
  for var in vars {
    match &var.kind {
      VarKind::Primitive { type_name, .. } => {
        basic_types.insert(type_name.clone());
      }
      VarKind::Struct { struct_name } => {
        if let Some(def) = lookup(struct_name) {
          collect_member_types(&def.members, &mut basic_types);
        }
      }
    }
  }
  basic_types
}

fn collect_member_types(members: &[Member], basic_types: &mut IndexSet<String>) {
  for member in members {
    match &member.kind {
      MemberKind::Struct { members: nested, .. } => collect_member_types(nested, basic_types),
      MemberKind::Primitive { type_name } => {
        basic_types.insert(type_name.clone());
      }
    }
  }
}
