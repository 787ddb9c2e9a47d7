//! Signature extraction for exported declarations.
//!
//! Given the definition node of an export, the extractor derives structured parameter
//! lists, return metadata and the docstring. Classes contribute their annotated body
//! attributes as parameters and, separately, the parameters of their `__init__`.
//!
//! Inline documentation is read from trailing comments (see [`inline`]).
//!
//! # Example
//!
//! ```no_run
//! use notepack::extractor::extract_signature;
//! use notepack::parser::NotebookParser;
//!
//! let source = "def add(a: int,  # first\n        b: int = 0,  # second\n        ) -> int:  # sum\n    return a + b\n";
//! let tree = NotebookParser::parse_source(source).unwrap();
//! let function = tree.root_node().named_child(0).unwrap();
//! let signature = extract_signature(function, source);
//! assert_eq!(signature.params[0].inline_doc, "first");
//! ```

pub mod class;
pub mod function;
pub mod inline;

use crate::model::{Declaration, Parameter, ReturnInfo};
use crate::parser::node_text;
use inline::InlineDocs;
use tree_sitter::Node;

/// Everything extracted from one definition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature {
    pub params: Vec<Parameter>,
    pub return_info: Option<ReturnInfo>,
    pub nested_init_params: Option<Vec<Parameter>>,
    pub docstring: String,
}

impl Signature {
    /// Attach this signature to an export declaration.
    pub fn apply(self, mut declaration: Declaration) -> Declaration {
        declaration.params = Some(self.params);
        declaration.return_info = self.return_info;
        declaration.nested_init_params = self.nested_init_params;
        declaration.docstring = self.docstring;
        declaration
    }
}

/// Extracts the signature of a `function_definition` or `class_definition`.
///
/// `source` must be the full module source the node was parsed from, because inline
/// documentation is looked up by absolute line number.
pub fn extract_signature(definition: Node<'_>, source: &str) -> Signature {
    let docs = InlineDocs::new(source);
    let docstring = definition
        .child_by_field_name("body")
        .and_then(docstring_node)
        .map(|node| clean_docstring(node_text(node, source)))
        .unwrap_or_default();

    match definition.kind() {
        "class_definition" => Signature {
            params: class::extract_attributes(definition, source, &docs),
            return_info: None,
            nested_init_params: class::extract_init_params(definition, source, &docs),
            docstring,
        },
        _ => Signature {
            params: function::extract_parameters(definition, source, &docs, false),
            return_info: function::extract_return(definition, source, &docs),
            nested_init_params: None,
            docstring,
        },
    }
}

/// The docstring statement of a block: its first statement when that is a bare string.
pub fn docstring_statement(body: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|n| n.kind() != "comment")?;
    let only = first.named_child(0)?;
    let is_docstring = first.kind() == "expression_statement"
        && first.named_child_count() == 1
        && matches!(only.kind(), "string" | "concatenated_string");
    is_docstring.then_some(first)
}

fn docstring_node(body: Node<'_>) -> Option<Node<'_>> {
    docstring_statement(body).and_then(|stmt| stmt.named_child(0))
}

/// Unquotes a string literal and cleans it the way Python's `inspect.cleandoc` does:
/// first-line whitespace stripped, common indentation of later lines removed, blank lines
/// at both ends dropped.
pub fn clean_docstring(literal: &str) -> String {
    let body = unquote(literal);
    let lines: Vec<&str> = body.lines().collect();
    if lines.is_empty() {
        return String::new();
    }

    let margin = lines[1..]
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| indent_width(line))
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<String> = Vec::with_capacity(lines.len());
    cleaned.push(lines[0].trim().to_string());
    for line in &lines[1..] {
        let trimmed = if indent_width(line) >= margin {
            skip_chars(line, margin)
        } else {
            line.trim_start()
        };
        cleaned.push(trimmed.trim_end().to_string());
    }

    while cleaned.first().is_some_and(|l| l.is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|l| l.is_empty()) {
        cleaned.pop();
    }
    cleaned.join("\n")
}

/// Leading whitespace of `line`, counted in characters
fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn skip_chars(line: &str, count: usize) -> &str {
    match line.char_indices().nth(count) {
        Some((idx, _)) => &line[idx..],
        None => "",
    }
}

fn unquote(literal: &str) -> &str {
    let text = literal.trim_start_matches(|c: char| "rRuUbBfF".contains(c));
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::NotebookParser;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_docstring() {
        assert_eq!(clean_docstring("\"\"\"Add two numbers.\"\"\""), "Add two numbers.");
        assert_eq!(clean_docstring("'single'"), "single");
        assert_eq!(clean_docstring("r'''raw'''"), "raw");
        assert_eq!(
            clean_docstring("\"\"\"\n    Summary line.\n\n    Details\n      indented.\n    \"\"\""),
            "Summary line.\n\nDetails\n  indented."
        );
    }

    #[test]
    fn test_function_signature() {
        let source = "def add(a: int,  # first\n        b: int = 0,  # second\n        ) -> int:  # sum\n    \"\"\"Add.\"\"\"\n    return a + b\n";
        let tree = NotebookParser::parse_source(source).unwrap();
        let function = tree.root_node().named_child(0).unwrap();
        let signature = extract_signature(function, source);

        assert_eq!(signature.params.len(), 2);
        assert_eq!(signature.params[1].inline_doc, "second");
        assert_eq!(signature.return_info.unwrap().doc, "sum");
        assert_eq!(signature.docstring, "Add.");
        assert!(signature.nested_init_params.is_none());
    }

    #[test]
    fn test_class_signature() {
        let source = "class P:\n    x: int  # horizontal\n\n    def __init__(self, x):\n        self.x = x\n";
        let tree = NotebookParser::parse_source(source).unwrap();
        let class = tree.root_node().named_child(0).unwrap();
        let signature = extract_signature(class, source);

        assert_eq!(signature.params.len(), 1);
        assert_eq!(signature.params[0].inline_doc, "horizontal");
        assert_eq!(signature.nested_init_params.unwrap().len(), 1);
        assert!(signature.return_info.is_none());
        assert_eq!(signature.docstring, "");
    }

    #[test]
    fn test_non_string_first_statement_is_not_docstring() {
        let source = "def f():\n    x = 'no'\n";
        let tree = NotebookParser::parse_source(source).unwrap();
        let function = tree.root_node().named_child(0).unwrap();
        assert_eq!(extract_signature(function, source).docstring, "");
    }

    #[test]
    fn test_clean_docstring_with_unicode_indent() {
        let literal = "\"\"\"Summary.\n\n    first\n   \u{a0}second\n      nested\n    \"\"\"";
        assert_eq!(clean_docstring(literal), "Summary.\n\nfirst\nsecond\n  nested");
    }
}
