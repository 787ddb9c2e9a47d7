//! Declaration classification for notebook top-level statements.
//!
//! A notebook contributes three kinds of declarations to its module:
//!
//! - imports written inside the setup block (`with app.setup:`)
//! - private constants (`__name = <literal>`) written inside the setup block
//! - functions and classes decorated with `@app.function` / `@app.class_definition`
//!
//! Every other top-level statement (the `import marimo` / `app = marimo.App()` preamble,
//! ordinary cells, the `if __name__ == "__main__"` trailer) contributes nothing.

use crate::model::{Declaration, ExportKind};
use crate::parser::node_text;
use log::debug;
use tree_sitter::Node;

/// Decorators that mark a definition for export
pub const EXPORT_MARKERS: [&str; 2] = ["app.function", "app.class_definition"];

/// Context manager that opens the setup block
pub const SETUP_SCOPE: &str = "app.setup";

/// Definitions starting with this prefix are notebook tests and never exported
pub const TEST_PREFIX: &str = "test_";

/// The shapes of top-level statement the classifier cares about.
enum TopLevel<'t> {
    /// `with app.setup:`; holds the block body
    Setup(Node<'t>),
    /// A definition carrying at least one export marker
    Marked {
        first_marker: Node<'t>,
        definition: Node<'t>,
    },
    Other,
}

/// A declaration together with the definition node it came from.
///
/// Exports keep their `function_definition` / `class_definition` node so the signature
/// extractor can work on the same tree with absolute line numbers.
pub struct Classified<'t> {
    pub declaration: Declaration,
    pub definition: Option<Node<'t>>,
}

/// Classifies one top-level statement.
pub fn classify<'t>(node: Node<'t>, source: &str) -> Vec<Classified<'t>> {
    match recognize(node, source) {
        TopLevel::Setup(body) => classify_setup(body, source),
        TopLevel::Marked {
            first_marker,
            definition,
        } => classify_export(first_marker, definition, source)
            .into_iter()
            .collect(),
        TopLevel::Other => Vec::new(),
    }
}

fn recognize<'t>(node: Node<'t>, source: &str) -> TopLevel<'t> {
    match node.kind() {
        "with_statement" => {
            let Some(clause) = first_child_of_kind(node, "with_clause") else {
                return TopLevel::Other;
            };
            let mut cursor = clause.walk();
            let items: Vec<_> = clause
                .named_children(&mut cursor)
                .filter(|n| n.kind() == "with_item")
                .collect();
            let is_setup = items.len() == 1
                && items[0]
                    .child_by_field_name("value")
                    .is_some_and(|value| callee_name(value, source) == SETUP_SCOPE);
            match node.child_by_field_name("body") {
                Some(body) if is_setup => TopLevel::Setup(body),
                _ => TopLevel::Other,
            }
        }
        "decorated_definition" => {
            let Some(definition) = node.child_by_field_name("definition") else {
                return TopLevel::Other;
            };
            let mut cursor = node.walk();
            let first_marker = node
                .named_children(&mut cursor)
                .filter(|n| n.kind() == "decorator")
                .find(|decorator| is_export_marker(*decorator, source));
            match first_marker {
                Some(first_marker) => TopLevel::Marked {
                    first_marker,
                    definition,
                },
                None => TopLevel::Other,
            }
        }
        _ => TopLevel::Other,
    }
}

/// Whether a `decorator` node is one of the export markers, bare or called.
pub fn is_export_marker(decorator: Node<'_>, source: &str) -> bool {
    decorator
        .named_child(0)
        .is_some_and(|expr| EXPORT_MARKERS.contains(&callee_name(expr, source).as_str()))
}

/// Dotted name of an expression with call syntax and whitespace removed:
/// `app.function(hide_code=True)` and `app . function` both give `app.function`.
fn callee_name(expr: Node<'_>, source: &str) -> String {
    let target = if expr.kind() == "call" {
        expr.child_by_field_name("function").unwrap_or(expr)
    } else {
        expr
    };
    node_text(target, source)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

fn classify_setup<'t>(body: Node<'t>, source: &str) -> Vec<Classified<'t>> {
    let mut declarations = Vec::new();
    let mut cursor = body.walk();

    for stmt in body.named_children(&mut cursor) {
        let line = stmt.start_position().row + 1;
        match stmt.kind() {
            "import_statement" | "import_from_statement" | "future_import_statement" => {
                debug!("Setup import at line {}", line);
                declarations.push(Classified {
                    declaration: Declaration::import(node_text(stmt, source).to_string(), line),
                    definition: None,
                });
            }
            "expression_statement" => {
                if let Some(name) = constant_name(stmt, source) {
                    debug!("Setup constant {} at line {}", name, line);
                    declarations.push(Classified {
                        declaration: Declaration::constant(
                            name,
                            node_text(stmt, source).to_string(),
                            line,
                        ),
                        definition: None,
                    });
                }
            }
            _ => {}
        }
    }

    declarations
}

/// Name of a `__private = <literal>` assignment, `None` for anything else.
fn constant_name(stmt: Node<'_>, source: &str) -> Option<String> {
    let assignment = stmt.named_child(0).filter(|n| n.kind() == "assignment")?;
    let left = assignment
        .child_by_field_name("left")
        .filter(|n| n.kind() == "identifier")?;
    let name = node_text(left, source);
    if !name.starts_with("__") || name.ends_with("__") {
        return None;
    }

    let Some(value) = assignment.child_by_field_name("right") else {
        debug!("Constant {} has no value, skipping", name);
        return None;
    };
    if !is_static_literal(value, source) {
        debug!(
            "Constant {} at line {} is not a static literal, skipping",
            name,
            stmt.start_position().row + 1
        );
        return None;
    }
    Some(name.to_string())
}

/// Whether an expression can be evaluated without running code.
pub fn is_static_literal(node: Node<'_>, source: &str) -> bool {
    let mut cursor = node.walk();
    let literal = match node.kind() {
        "integer" | "float" | "true" | "false" | "none" => true,
        "string" => first_child_of_kind(node, "interpolation").is_none(),
        "concatenated_string" => node
            .named_children(&mut cursor)
            .all(|part| part.kind() == "comment" || is_static_literal(part, source)),
        "unary_operator" => node
            .child_by_field_name("argument")
            .is_some_and(|arg| matches!(arg.kind(), "integer" | "float")),
        "list" | "tuple" | "set" | "parenthesized_expression" => node
            .named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .all(|child| is_static_literal(child, source)),
        "dictionary" => node
            .named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .all(|pair| {
                pair.kind() == "pair"
                    && pair
                        .child_by_field_name("key")
                        .is_some_and(|k| is_static_literal(k, source))
                    && pair
                        .child_by_field_name("value")
                        .is_some_and(|v| is_static_literal(v, source))
            }),
        _ => false,
    };
    literal
}

fn classify_export<'t>(
    first_marker: Node<'t>,
    definition: Node<'t>,
    source: &str,
) -> Option<Classified<'t>> {
    let export_kind = match definition.kind() {
        "function_definition" => ExportKind::Function,
        "class_definition" => ExportKind::Class,
        _ => return None,
    };
    let name = node_text(definition.child_by_field_name("name")?, source);
    if name.starts_with(TEST_PREFIX) {
        debug!("Skipping test definition {}", name);
        return None;
    }

    let raw_source = source[first_marker.start_byte()..definition.end_byte()].to_string();
    let line = first_marker.start_position().row + 1;
    debug!("Export {} ({:?}) at line {}", name, export_kind, line);

    Some(Classified {
        declaration: Declaration::export(export_kind, name.to_string(), raw_source, line),
        definition: Some(definition),
    })
}

/// First direct child (named or anonymous) with the given kind
pub fn first_child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}
