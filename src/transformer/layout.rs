//! Source layout of a single exported declaration.
//!
//! Renderers never patch the captured text in place. They re-parse the declaration,
//! rebuild the header from metadata and copy body lines, replacing or dropping whole
//! statements through [`Edit`]s.

use crate::classifier::{first_child_of_kind, is_export_marker};
use crate::error::{Error, Result};
use crate::model::Declaration;
use crate::parser::{node_text, single_line_text, NotebookParser};
use std::path::PathBuf;
use tree_sitter::{Node, Tree};

/// A re-parsed export declaration.
pub struct DeclarationSource {
    source: String,
    tree: Tree,
}

impl DeclarationSource {
    pub fn parse(declaration: &Declaration) -> Result<Self> {
        let tree = NotebookParser::parse_source(&declaration.raw_source).map_err(|message| {
            Error::ParseError {
                file: PathBuf::from(format!("<{}>", declaration.name)),
                message,
            }
        })?;
        Ok(Self {
            source: declaration.raw_source.clone(),
            tree,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The top-level statement (usually a `decorated_definition`)
    fn statement(&self) -> Option<Node<'_>> {
        self.tree.root_node().named_child(0)
    }

    /// The `function_definition` or `class_definition` node.
    pub fn definition(&self) -> Result<Node<'_>> {
        let statement = self.statement().ok_or_else(|| self.malformed())?;
        let definition = match statement.kind() {
            "decorated_definition" => statement
                .child_by_field_name("definition")
                .ok_or_else(|| self.malformed())?,
            _ => statement,
        };
        match definition.kind() {
            "function_definition" | "class_definition" => Ok(definition),
            _ => Err(self.malformed()),
        }
    }

    /// Decorators other than the export markers, in source order.
    pub fn kept_decorators(&self) -> Vec<&str> {
        let Some(statement) = self.statement() else {
            return Vec::new();
        };
        if statement.kind() != "decorated_definition" {
            return Vec::new();
        }
        let mut cursor = statement.walk();
        let decorators: Vec<_> = statement
            .named_children(&mut cursor)
            .filter(|n| n.kind() == "decorator" && !is_export_marker(*n, &self.source))
            .collect();
        decorators
            .into_iter()
            .map(|n| node_text(n, &self.source))
            .collect()
    }

    fn malformed(&self) -> Error {
        Error::ParseError {
            file: PathBuf::from("<declaration>"),
            message: "expected a function or class definition".to_string(),
        }
    }
}

/// Replacement of one body statement, by row range.
#[derive(Debug, Clone)]
pub struct Edit {
    pub start_byte: usize,
    pub start_row: usize,
    pub end_row: usize,
    /// `None` drops the statement
    pub replacement: Option<String>,
}

impl Edit {
    pub fn remove(node: Node<'_>) -> Self {
        Self::new(node, None)
    }

    pub fn replace(node: Node<'_>, text: String) -> Self {
        Self::new(node, Some(text))
    }

    fn new(node: Node<'_>, replacement: Option<String>) -> Self {
        Self {
            start_byte: node.start_byte(),
            start_row: node.start_position().row,
            end_row: node.end_position().row,
            replacement,
        }
    }
}

/// Row of the `:` that closes a definition header.
fn header_end_row(definition: Node<'_>) -> usize {
    first_child_of_kind(definition, ":")
        .map(|colon| colon.start_position().row)
        .unwrap_or_else(|| definition.start_position().row)
}

/// Row of the first statement in a block, skipping comments attached to the header line.
fn first_statement_row(body: Node<'_>) -> usize {
    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|n| n.kind() != "comment")
        .unwrap_or(body);
    first.start_position().row
}

/// Leading whitespace of a row
pub fn indent_of(source: &str, row: usize) -> &str {
    let line = source.lines().nth(row).unwrap_or("");
    &line[..line.len() - line.trim_start().len()]
}

/// Indentation used for the body of `definition`.
///
/// Taken from the first body line; bodies written on the header line get the
/// definition's own indentation plus four spaces.
pub fn body_indent(definition: Node<'_>, source: &str) -> String {
    let own = indent_of(source, definition.start_position().row).to_string();
    match definition.child_by_field_name("body") {
        Some(body) if first_statement_row(body) > header_end_row(definition) => {
            indent_of(source, first_statement_row(body)).to_string()
        }
        _ => format!("{}    ", own),
    }
}

/// Body of `definition` below its header with `edits` applied.
///
/// Lines are copied verbatim, so comments and blank lines inside the body survive.
/// Trailing blank lines are dropped. Returns an empty string when nothing is left.
pub fn body_text(definition: Node<'_>, source: &str, edits: &[Edit]) -> String {
    let Some(body) = definition.child_by_field_name("body") else {
        return String::new();
    };
    let header_row = header_end_row(definition);

    if first_statement_row(body) == header_row {
        return inline_body(definition, body, source, edits);
    }

    let lines: Vec<&str> = source.lines().collect();
    let last_row = definition.end_position().row.min(lines.len().saturating_sub(1));
    let mut out: Vec<String> = Vec::new();
    let mut row = header_row + 1;
    while row <= last_row {
        match edits.iter().find(|edit| edit.start_row == row) {
            Some(edit) => {
                if let Some(text) = &edit.replacement {
                    out.extend(text.lines().map(str::to_string));
                }
                row = edit.end_row + 1;
            }
            None => {
                out.push(lines[row].to_string());
                row += 1;
            }
        }
    }

    while out.last().is_some_and(|line| line.trim().is_empty()) {
        out.pop();
    }
    while out.first().is_some_and(|line| line.trim().is_empty()) {
        out.remove(0);
    }
    out.join("\n")
}

/// `def f(): return 1` style bodies are moved onto their own line.
fn inline_body(definition: Node<'_>, body: Node<'_>, source: &str, edits: &[Edit]) -> String {
    let indent = body_indent(definition, source);
    let mut cursor = body.walk();
    let statements: Vec<_> = body.named_children(&mut cursor).collect();
    let kept: Vec<String> = statements
        .into_iter()
        .filter_map(|stmt| match edits.iter().find(|e| e.start_byte == stmt.start_byte()) {
            Some(edit) => edit.replacement.as_ref().map(|t| t.trim().to_string()),
            None => Some(node_text(stmt, source).to_string()),
        })
        .collect();
    if kept.is_empty() {
        String::new()
    } else {
        format!("{}{}", indent, kept.join("; "))
    }
}

/// `async ` when the function is a coroutine
pub fn async_prefix(definition: Node<'_>) -> &'static str {
    if first_child_of_kind(definition, "async").is_some() {
        "async "
    } else {
        ""
    }
}

/// Text of an optional field on a single line, empty when absent
pub fn field_or_empty(node: Node<'_>, field: &str, source: &str) -> String {
    node.child_by_field_name(field)
        .map(|n| single_line_text(n, source))
        .unwrap_or_default()
}
