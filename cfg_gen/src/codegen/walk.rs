/* Shared traversal used by the template, read and write emitters.
 *
 * Each variable is walked as a tree of (name, kind, array size) nodes. A node
 * without an array size extends the qualified path with `.name`; an array
 * node is unrolled into `name[0]` .. `name[N-1]`, every element walked as an
 * independent instance. Emitters only decide what text a leaf (and an array
 * element boundary) turns into. */

use super::array::resolve_array_size;
use crate::diagnostics::Diagnostic;
use crate::model::Model;
use cfg_types::{Member, MemberKind, VarDef, VarKind};

pub trait Emitter {
  fn begin_variable(&mut self, _var: &VarDef) {}

  fn end_variable(&mut self, _var: &VarDef) {}

  /// Called before the members of one unrolled struct array element.
  fn begin_element(&mut self, _path: &str, _members: &[Member]) {}

  fn end_element(&mut self, _path: &str, _members: &[Member]) {}

  /// One primitive value addressed by its qualified path.
  fn leaf(&mut self, path: &str, type_name: &str, diagnostics: &mut Vec<Diagnostic>);
}

#[derive(Debug, Clone, Copy)]
enum NodeKind<'m> {
  Primitive(&'m str),
  Struct(&'m [Member]),
}

#[derive(Debug, Clone, Copy)]
struct Node<'m> {
  name: &'m str,
  kind: NodeKind<'m>,
  array_size: Option<&'m str>,
}

impl<'m> From<&'m Member> for Node<'m> {
  fn from(member: &'m Member) -> Self {
    let kind = match &member.kind {
      MemberKind::Primitive { type_name } => NodeKind::Primitive(type_name),
      MemberKind::Struct { members, .. } => NodeKind::Struct(members),
    };
    Self { name: &member.name, kind, array_size: member.array_size.as_deref() }
  }
}

pub struct Walker<'m> {
  model: &'m Model,
  diagnostics: Vec<Diagnostic>,
}

impl<'m> Walker<'m> {
  pub fn new(model: &'m Model) -> Self {
    Self { model, diagnostics: Vec::new() }
  }

  /// Walk every variable in declaration order.
  pub fn walk_variables<E: Emitter>(mut self, emitter: &mut E) -> Vec<Diagnostic> {
    let model = self.model;
    for var in model.vars() {
      self.walk_variable(var, emitter);
    }
    self.diagnostics
  }

  pub fn walk_variable<E: Emitter>(&mut self, var: &'m VarDef, emitter: &mut E) {
    let model = self.model;
    let kind = match &var.kind {
      VarKind::Primitive { type_name, .. } => NodeKind::Primitive(type_name),
      VarKind::Struct { struct_name } => match model.find_struct(struct_name) {
        Some(def) => NodeKind::Struct(&def.members),
        None => {
          tracing::debug!("variable {} uses undefined struct {}", var.name, struct_name);
          NodeKind::Struct(&[])
        }
      },
    };

    emitter.begin_variable(var);
    let node = Node { name: &var.name, kind, array_size: var.array_size.as_deref() };
    self.walk(node, None, emitter);
    emitter.end_variable(var);
  }

  fn walk<E: Emitter>(&mut self, node: Node<'m>, father: Option<&str>, emitter: &mut E) {
    let path = qualify(father, node.name);

    let Some(token) = node.array_size else {
      match node.kind {
        NodeKind::Struct(members) => self.walk_members(members, &path, emitter),
        NodeKind::Primitive(type_name) => emitter.leaf(&path, type_name, &mut self.diagnostics),
      }
      return;
    };

    let size = match resolve_array_size(token, self.model.macros()) {
      Ok(size) => size,
      Err(err) => {
        let diagnostic = Diagnostic::InvalidArraySize {
          path,
          token: token.to_string(),
          reason: err.to_string(),
        };
        self.diagnostics.push(diagnostic.logged());
        return;
      }
    };

    for index in 0..size {
      let element = format!("{}[{}]", path, index);
      match node.kind {
        NodeKind::Struct(members) => {
          emitter.begin_element(&element, members);
          self.walk_members(members, &element, emitter);
          emitter.end_element(&element, members);
        }
        NodeKind::Primitive(type_name) => emitter.leaf(&element, type_name, &mut self.diagnostics),
      }
    }
  }

  fn walk_members<E: Emitter>(&mut self, members: &'m [Member], father: &str, emitter: &mut E) {
    for member in members {
      self.walk(Node::from(member), Some(father), emitter);
    }
  }
}

/// Join a father path and a field name with `.`, skipping an absent father.
pub fn qualify(father: Option<&str>, name: &str) -> String {
  match father {
    Some(father) if !father.is_empty() => format!("{}.{}", father, name),
    _ => name.to_string(),
  }
}
