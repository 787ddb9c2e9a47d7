//! Google-style docstrings synthesized from inline documentation.
//!
//! ```python
//! def add(a: int, b: int = 0) -> int:
//!     """Add two numbers.
//!
//!     Args:
//!         a (int): first
//!         b (int): second
//!
//!     Returns:
//!         int: sum
//!     """
//!     return a + b
//! ```

use super::layout::{body_indent, body_text, indent_of, DeclarationSource, Edit};
use super::signature::{single_line, slots};
use super::{class_head, def_head, return_suffix, with_decorators, Style, StyleRenderer};
use crate::error::Result;
use crate::extractor::class::{attribute_assignment, find_initializer};
use crate::extractor::function::receiver_name;
use crate::extractor::{clean_docstring, docstring_statement};
use crate::model::{Declaration, ExportKind, Parameter, ReturnInfo};
use crate::parser::{node_text, text_without_comments};
use tree_sitter::Node;

/// Placeholder for parameters and returns without inline documentation
pub const MISSING_DOC: &str = "TODO";

const VARARGS_DOC: &str = "Additional positional arguments.";
const KWARGS_DOC: &str = "Additional keyword arguments.";

/// Rebuilds signatures on one line and documents them in a docstring block.
pub struct StructuredRenderer;

impl StyleRenderer for StructuredRenderer {
    fn style(&self) -> Style {
        Style::Structured
    }

    fn render_export(&self, declaration: &Declaration) -> Result<String> {
        let parsed = DeclarationSource::parse(declaration)?;
        let definition = parsed.definition()?;
        let source = parsed.source();

        let rendered = match declaration.export_kind {
            Some(ExportKind::Class) => render_class(declaration, definition, source),
            Some(ExportKind::Function) | None => render_function(
                definition,
                source,
                None,
                declaration.params(),
                &declaration.docstring,
                declaration.return_info.as_ref(),
            ),
        };
        Ok(with_decorators(&parsed.kept_decorators(), rendered))
    }
}

fn render_function(
    definition: Node<'_>,
    source: &str,
    receiver: Option<&str>,
    params: &[Parameter],
    summary: &str,
    return_info: Option<&ReturnInfo>,
) -> String {
    let indent = body_indent(definition, source);
    let mut out = vec![format!(
        "{}({}){}:",
        def_head(definition, source),
        single_line(&slots(receiver, params)),
        return_suffix(definition, source),
    )];
    if let Some(doc) = docstring_block(summary, "Args", params, return_info, &indent) {
        out.push(doc);
    }

    let edits: Vec<Edit> = definition
        .child_by_field_name("body")
        .and_then(docstring_statement)
        .map(Edit::remove)
        .into_iter()
        .collect();
    push_body(&mut out, body_text(definition, source, &edits), &indent);
    out.join("\n")
}

fn render_class(declaration: &Declaration, definition: Node<'_>, source: &str) -> String {
    let indent = body_indent(definition, source);
    let mut out = vec![class_head(definition, source)];
    if let Some(doc) = docstring_block(
        &declaration.docstring,
        "Attributes",
        declaration.params(),
        None,
        &indent,
    ) {
        out.push(doc);
    }

    let mut edits = Vec::new();
    if let Some(body) = definition.child_by_field_name("body") {
        let docstring = docstring_statement(body);
        let mut cursor = body.walk();
        let statements: Vec<_> = body.named_children(&mut cursor).collect();
        for stmt in statements {
            if Some(stmt) == docstring {
                edits.push(Edit::remove(stmt));
            } else if attribute_assignment(stmt).is_some() {
                edits.push(Edit::replace(stmt, strip_statement_comments(stmt, source)));
            }
        }
    }
    if let Some(init) = find_initializer(definition, source) {
        let receiver = receiver_name(init, source).unwrap_or_else(|| "self".to_string());
        let summary = init
            .child_by_field_name("body")
            .and_then(docstring_statement)
            .and_then(|stmt| stmt.named_child(0))
            .map(|literal| clean_docstring(node_text(literal, source)))
            .unwrap_or_default();
        let params = declaration.nested_init_params.as_deref().unwrap_or(&[]);
        let rendered = render_function(init, source, Some(&receiver), params, &summary, None);
        edits.push(Edit::replace(init, rendered));
    }

    push_body(&mut out, body_text(definition, source, &edits), &indent);
    out.join("\n")
}

/// Lines of a statement with trailing comments removed
/// The statement's full rows with its comments removed; string contents are kept.
fn strip_statement_comments(stmt: Node<'_>, source: &str) -> String {
    format!(
        "{}{}",
        indent_of(source, stmt.start_position().row),
        text_without_comments(stmt, source)
    )
}

fn push_body(out: &mut Vec<String>, body: String, indent: &str) {
    if !body.is_empty() {
        out.push(body);
    } else if out.len() == 1 {
        out.push(format!("{}pass", indent));
    }
}

/// Docstring block with summary, parameter section and `Returns:`.
///
/// Returns `None` when there is nothing to document.
pub fn docstring_block(
    summary: &str,
    section: &str,
    params: &[Parameter],
    return_info: Option<&ReturnInfo>,
    indent: &str,
) -> Option<String> {
    let mut sections: Vec<Vec<String>> = Vec::new();
    if !summary.is_empty() {
        sections.push(summary.lines().map(str::to_string).collect());
    }
    if !params.is_empty() {
        let mut lines = vec![format!("{}:", section)];
        lines.extend(params.iter().map(|p| format!("    {}", param_line(p))));
        sections.push(lines);
    }
    if let Some(ret) = return_info {
        sections.push(vec!["Returns:".to_string(), format!("    {}", return_line(ret))]);
    }
    if sections.is_empty() {
        return None;
    }

    let mut content: Vec<String> = Vec::new();
    for (idx, section) in sections.into_iter().enumerate() {
        if idx > 0 {
            content.push(String::new());
        }
        content.extend(section);
    }

    let mut lines = Vec::with_capacity(content.len() + 2);
    if summary.is_empty() {
        lines.push(format!("{}\"\"\"", indent));
    } else {
        lines.push(format!("{}\"\"\"{}", indent, content.remove(0)));
    }
    for line in content {
        if line.is_empty() {
            lines.push(String::new());
        } else {
            lines.push(format!("{}{}", indent, line));
        }
    }
    lines.push(format!("{}\"\"\"", indent));
    Some(lines.join("\n"))
}

/// `name (annotation): doc`
fn param_line(param: &Parameter) -> String {
    let doc = if !param.inline_doc.is_empty() {
        param.inline_doc.as_str()
    } else if param.is_variadic_positional {
        VARARGS_DOC
    } else if param.is_variadic_keyword {
        KWARGS_DOC
    } else {
        MISSING_DOC
    };
    match &param.type_annotation {
        Some(annotation) => format!("{} ({}): {}", param.display_name(), annotation, doc),
        None => format!("{}: {}", param.display_name(), doc),
    }
}

/// `annotation: doc`
fn return_line(ret: &ReturnInfo) -> String {
    let doc = if ret.doc.is_empty() {
        MISSING_DOC
    } else {
        ret.doc.as_str()
    };
    match &ret.annotation {
        Some(annotation) => format!("{}: {}", annotation, doc),
        None => doc.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::extract_signature;
    use crate::parser::NotebookParser;
    use pretty_assertions::assert_eq;

    /// Classifies the first statement of `raw` the way a notebook scan would.
    fn export(raw: &str, kind: ExportKind) -> Declaration {
        let tree = NotebookParser::parse_source(raw).unwrap();
        let definition = tree
            .root_node()
            .named_child(0)
            .unwrap()
            .child_by_field_name("definition")
            .unwrap();
        let name = node_text(definition.child_by_field_name("name").unwrap(), raw);
        let decl = Declaration::export(kind, name.to_string(), raw.to_string(), 1);
        extract_signature(definition, raw).apply(decl)
    }

    #[test]
    fn test_function_docstring_block() {
        let raw = "@app.function\ndef add(a: int,  # first\n        b: int = 0,  # second\n        ) -> int:  # sum\n    \"\"\"Add two numbers.\"\"\"\n    return a + b";
        let rendered = StructuredRenderer
            .render_export(&export(raw, ExportKind::Function))
            .unwrap();

        assert_eq!(
            rendered,
            r#"def add(a: int, b: int = 0) -> int:
    """Add two numbers.

    Args:
        a (int): first
        b (int): second

    Returns:
        int: sum
    """
    return a + b"#
        );
    }

    #[test]
    fn test_missing_docs_render_placeholders() {
        let raw = "@app.function\ndef f(x, *args, **kwargs) -> str:\n    return ''";
        let rendered = StructuredRenderer
            .render_export(&export(raw, ExportKind::Function))
            .unwrap();

        assert_eq!(
            rendered,
            r#"def f(x, *args, **kwargs) -> str:
    """
    Args:
        x: TODO
        *args: Additional positional arguments.
        **kwargs: Additional keyword arguments.

    Returns:
        str: TODO
    """
    return ''"#
        );
    }

    #[test]
    fn test_one_args_line_per_parameter() {
        let raw = "@app.function\ndef f(a,  # one\n      b,\n      c=3,  # three\n      ) -> None:  # nothing\n    pass";
        let rendered = StructuredRenderer
            .render_export(&export(raw, ExportKind::Function))
            .unwrap();

        let args_lines = rendered
            .lines()
            .skip_while(|l| l.trim() != "Args:")
            .skip(1)
            .take_while(|l| !l.trim().is_empty())
            .count();
        assert_eq!(args_lines, 3);
        assert_eq!(rendered.matches("Returns:").count(), 1);
        assert!(rendered.contains("        b: TODO"));
        assert!(rendered.contains("        nothing"));
        assert!(rendered.starts_with("def f(a, b, c=3) -> None:"));
        assert!(!rendered.contains("# one"));
    }

    #[test]
    fn test_multiline_default_renders_on_one_line() {
        let raw = "@app.function\ndef f(x=[\n    1,  # one\n    2,\n]) -> dict[\n    str, int\n]:\n    return {}";
        let rendered = StructuredRenderer
            .render_export(&export(raw, ExportKind::Function))
            .unwrap();

        assert!(rendered.starts_with("def f(x=[1, 2,]) -> dict[str, int]:\n"));
        assert!(!rendered.contains("# one"));
        assert!(rendered.contains("        dict[str, int]: TODO"));
        assert!(NotebookParser::parse_source(&rendered).is_ok());
    }

    #[test]
    fn test_no_docs_no_block() {
        let raw = "@app.function\ndef f():\n    return 1";
        let rendered = StructuredRenderer
            .render_export(&export(raw, ExportKind::Function))
            .unwrap();
        assert_eq!(rendered, "def f():\n    return 1");
    }

    #[test]
    fn test_class_attributes_and_init() {
        let raw = r#"@app.class_definition
@dataclass
class Point(Base):
    """A point."""

    x: int  # horizontal
    y: int = 0

    def __init__(self, x: int,  # start x
                 y=0):
        self.x = x

    def norm(self):  # keep method comments
        return 0"#;
        let rendered = StructuredRenderer
            .render_export(&export(raw, ExportKind::Class))
            .unwrap();

        assert_eq!(
            rendered,
            r#"@dataclass
class Point(Base):
    """A point.

    Attributes:
        x (int): horizontal
        y (int): TODO
    """
    x: int
    y: int = 0

    def __init__(self, x: int, y=0):
        """
        Args:
            x (int): start x
            y: TODO
        """
        self.x = x

    def norm(self):  # keep method comments
        return 0"#
        );
    }

    #[test]
    fn test_attribute_string_keeps_hash_lines() {
        let raw = r#"@app.class_definition
class Config:
    banner: str = """
    # keep this text
    """  # the doc
    level: int = 1  # verbosity"#;
        let rendered = StructuredRenderer
            .render_export(&export(raw, ExportKind::Class))
            .unwrap();

        assert_eq!(
            rendered,
            r#"class Config:
    """
    Attributes:
        banner (str): TODO
        level (int): verbosity
    """
    banner: str = """
    # keep this text
    """
    level: int = 1"#
        );
    }
}
