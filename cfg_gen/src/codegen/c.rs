use super::header::{emit_header, format_variable};
use super::read::{emit_parse_helpers, emit_read_functions};
use super::template::{emit_template, TemplateOptions};
use super::write::emit_write_functions;
use super::runtime::{self, RegionLimits};
use super::{c_identifier, Emitted};
use crate::diagnostics::Diagnostic;
use crate::model::Model;
use cfg_types::VarKind;
use indexmap::IndexSet;
use std::path::Path;

pub struct CCodeGeneratorOptions {
  /// File name of the generated header; its stem names the guard and the
  /// exported `<base>_read` / `<base>_write` functions.
  pub header_file: String,
  /// Definition file the code was generated from, quoted in the banner.
  pub source_name: Option<String>,
  pub template: TemplateOptions,
}

impl Default for CCodeGeneratorOptions {
  fn default() -> Self {
    Self {
      header_file: "config.h".to_string(),
      source_name: None,
      template: TemplateOptions::default(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedCode {
  pub header: String,
  pub source: String,
  pub template: String,
  /// Deduplicated across emitters, in first-reported order.
  pub diagnostics: Vec<Diagnostic>,
}

pub struct CCodeGenerator<'m> {
  model: &'m Model,
  options: CCodeGeneratorOptions,
}

impl<'m> CCodeGenerator<'m> {
  pub fn new(model: &'m Model, options: CCodeGeneratorOptions) -> Self {
    Self { model, options }
  }

  pub fn base_name(&self) -> String {
    let stem = Path::new(&self.options.header_file)
      .file_stem()
      .map(|s| s.to_string_lossy().to_string())
      .unwrap_or_default();
    c_identifier(&stem)
  }

  fn header_include(&self) -> String {
    Path::new(&self.options.header_file)
      .file_name()
      .map(|s| s.to_string_lossy().to_string())
      .unwrap_or_else(|| self.options.header_file.clone())
  }

  fn banner(&self) -> String {
    match &self.options.source_name {
      Some(source) => format!("/* Generated by cfg-gen from {}. Do not edit. */\n\n", source),
      None => "/* Generated by cfg-gen. Do not edit. */\n\n".to_string(),
    }
  }

  pub fn emit_header(&self) -> String {
    emit_header(self.model, &self.base_name(), &self.banner())
  }

  pub fn emit_source(&self) -> Emitted {
    let base = self.base_name();
    let mut out = self.banner();

    out.push_str("#include <stdint.h>\n");
    out.push_str("#include <stdbool.h>\n");
    out.push_str("#include <string.h>\n");
    out.push_str("#include <stdio.h>\n");
    out.push_str("#include <stdlib.h>\n");
    out.push_str(&format!("#include \"{}\"\n\n", self.header_include()));

    /* Definitions of the globals declared extern in the header */
    for var in self.model.vars() {
      let initializer = match &var.kind {
        VarKind::Primitive { initial_value: Some(value), .. } => format!(" = {}", value),
        _ => String::new(),
      };
      out.push_str(&format!("{}{};\n", format_variable(var), initializer));
    }

    out.push_str(&runtime::prelude(RegionLimits::for_model(self.model)));
    out.push_str(&emit_parse_helpers(self.model));
    out.push_str(runtime::LIBRARY);

    let read = emit_read_functions(self.model, &base);
    let write = emit_write_functions(self.model, &base);
    out.push_str(&read.text);
    out.push_str(&write.text);

    let mut diagnostics = self.reserved_names(&base);
    diagnostics.extend(read.diagnostics);
    diagnostics.extend(write.diagnostics);
    Emitted { text: out, diagnostics }
  }

  /* Globals the generated functions would shadow or redefine */
  fn reserved_names(&self, base: &str) -> Vec<Diagnostic> {
    let mut generated: IndexSet<String> = runtime::RUNTIME_NAMES.iter().map(|n| n.to_string()).collect();
    generated.extend(self.model.basic_types().iter().map(|t| format!("read_{}", t)));
    for var in self.model.vars() {
      generated.insert(format!("read_{}", var.name));
      generated.insert(format!("config_write_{}", var.name));
    }
    generated.insert(format!("{}_read", base));
    generated.insert(format!("{}_write", base));

    self
      .model
      .vars()
      .iter()
      .filter(|var| var.name.starts_with(runtime::LOCAL_PREFIX) || generated.contains(&var.name))
      .map(|var| Diagnostic::ReservedName { name: var.name.clone() }.logged())
      .collect()
  }

  pub fn emit_template(&self) -> Emitted {
    emit_template(self.model, self.options.template)
  }

  pub fn emit_code(&self) -> GeneratedCode {
    let header = self.emit_header();
    let source = self.emit_source();
    let template = self.emit_template();

    let diagnostics: IndexSet<Diagnostic> =
      source.diagnostics.into_iter().chain(template.diagnostics).collect();

    GeneratedCode {
      header,
      source: source.text,
      template: template.text,
      diagnostics: diagnostics.into_iter().collect(),
    }
  }
}
