/* Definition parser: builds the raw macro, type and variable tables */

use super::line::{classify, Line};
use crate::diagnostics::Diagnostic;
use crate::model::ModelBuilder;
use cfg_types::{Macro, Member, StructDef, VarDef};

/// Raw tables plus everything that was reported while building them.
#[derive(Debug, Default)]
pub struct ParseOutput {
    pub builder: ModelBuilder,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn parse_definitions(source: &str) -> ParseOutput {
    let mut parser = DefinitionParser::new(source);
    parser.run();
    ParseOutput {
        builder: parser.builder,
        diagnostics: parser.diagnostics,
    }
}

struct DefinitionParser<'a> {
    lines: Vec<&'a str>,
    /* Index of the next line to read; also the 1-based number of the last one read */
    cursor: usize,
    builder: ModelBuilder,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> DefinitionParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().collect(),
            cursor: 0,
            builder: ModelBuilder::new(),
            diagnostics: Vec::new(),
        }
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        let line = *self.lines.get(self.cursor)?;
        self.cursor += 1;
        Some((self.cursor, line))
    }

    /* Push the last line back so the top level sees it again */
    fn unread_line(&mut self) {
        self.cursor -= 1;
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic.logged());
    }

    fn run(&mut self) {
        while let Some((line_number, text)) = self.next_line() {
            match classify(text) {
                Line::Macro { name, value } => {
                    self.builder.add_macro(Macro::new(name, value));
                }
                Line::StructOpen { name } => self.parse_struct_body(name, line_number),
                Line::StructDecl { struct_name, name, array_size } => {
                    let mut var = VarDef::structure(struct_name, name);
                    if let Some(size) = array_size {
                        var = var.with_array_size(size);
                    }
                    self.builder.add_var(var);
                }
                Line::PrimitiveDecl { type_name, name, array_size, initializer } => {
                    let mut var = VarDef::primitive(type_name, name);
                    if let Some(size) = array_size {
                        var = var.with_array_size(size);
                    }
                    if let Some(value) = initializer {
                        var = var.with_initial_value(value);
                    }
                    self.builder.add_var(var);
                }
                Line::Comment | Line::Blank => {}
                Line::StructEnd | Line::Unrecognized => {
                    /* Unknown top-level constructs are tolerated without a diagnostic */
                    tracing::debug!(line = line_number, "ignoring top-level line: {}", text.trim());
                }
            }
        }
    }

    fn parse_struct_body(&mut self, name: &str, open_line: usize) {
        let mut members = Vec::new();

        loop {
            let Some((line_number, text)) = self.next_line() else {
                let line = self.lines.len();
                self.report(Diagnostic::UnterminatedStruct { name: name.to_string(), line });
                return;
            };

            match classify(text) {
                Line::Comment | Line::Blank => continue,
                Line::StructEnd => break,
                Line::StructDecl { struct_name, name: field, array_size } => {
                    let mut member = Member::structure(struct_name, field);
                    if let Some(size) = array_size {
                        member = member.with_array_size(size);
                    }
                    members.push(member);
                }
                Line::PrimitiveDecl { type_name, name: field, array_size, initializer: None } => {
                    let mut member = Member::primitive(type_name, field);
                    if let Some(size) = array_size {
                        member = member.with_array_size(size);
                    }
                    members.push(member);
                }
                Line::StructOpen { .. } => {
                    /* A new struct starts before this one was closed */
                    self.report(Diagnostic::UnterminatedStruct {
                        name: name.to_string(),
                        line: line_number,
                    });
                    self.unread_line();
                    return;
                }
                Line::Macro { .. } | Line::PrimitiveDecl { .. } | Line::Unrecognized => {
                    self.report(Diagnostic::InvalidMember {
                        name: name.to_string(),
                        line: line_number,
                        text: text.trim().to_string(),
                    });
                    self.skip_struct_body();
                    return;
                }
            }
        }

        if members.is_empty() {
            self.report(Diagnostic::EmptyStruct { name: name.to_string(), line: open_line });
            return;
        }

        self.builder.add_struct(StructDef { name: name.to_string(), members });
    }

    /* Drop the rest of a rejected body: up to its `};`, the next struct, or EOF */
    fn skip_struct_body(&mut self) {
        while let Some((_, text)) = self.next_line() {
            match classify(text) {
                Line::StructEnd => return,
                Line::StructOpen { .. } => {
                    self.unread_line();
                    return;
                }
                _ => {}
            }
        }
    }
}
