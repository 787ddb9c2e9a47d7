//! One parameter per line, each carrying its inline comment.
//!
//! ```python
//! def add(
//!     a: int,  # first
//!     b: int = 0,  # second
//! ) -> int:  # sum
//!     return a + b
//! ```

use super::layout::{body_indent, body_text, indent_of, DeclarationSource, Edit};
use super::signature::{one_per_line, slots};
use super::{class_head, def_head, return_suffix, with_decorators, Style, StyleRenderer};
use crate::error::Result;
use crate::extractor::class::find_initializer;
use crate::extractor::function::receiver_name;
use crate::model::{Declaration, ExportKind, Parameter, ReturnInfo};
use tree_sitter::Node;

/// Keeps docstrings as written and moves documentation next to each parameter.
pub struct AnnotatedRenderer;

impl StyleRenderer for AnnotatedRenderer {
    fn style(&self) -> Style {
        Style::Annotated
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
    return_info: Option<&ReturnInfo>,
) -> String {
    let own_indent = indent_of(source, definition.start_position().row);
    let slots = slots(receiver, params);

    let mut out = Vec::with_capacity(slots.len() + 3);
    let closing = if slots.is_empty() {
        format!("{}()", def_head(definition, source))
    } else {
        out.push(format!("{}(", def_head(definition, source)));
        out.extend(one_per_line(&slots, &format!("{}    ", own_indent)));
        format!("{})", own_indent)
    };

    let return_doc = return_info.map(|ret| ret.doc.as_str()).unwrap_or("");
    let mut last = format!("{}{}:", closing, return_suffix(definition, source));
    if !return_doc.is_empty() {
        last.push_str("  # ");
        last.push_str(return_doc);
    }
    out.push(last);

    let body = body_text(definition, source, &[]);
    if body.is_empty() {
        out.push(format!("{}pass", body_indent(definition, source)));
    } else {
        out.push(body);
    }
    out.join("\n")
}

fn render_class(declaration: &Declaration, definition: Node<'_>, source: &str) -> String {
    let mut edits = Vec::new();
    if let Some(init) = find_initializer(definition, source) {
        let receiver = receiver_name(init, source).unwrap_or_else(|| "self".to_string());
        let params = declaration.nested_init_params.as_deref().unwrap_or(&[]);
        edits.push(Edit::replace(
            init,
            render_function(init, source, Some(&receiver), params, None),
        ));
    }

    let body = body_text(definition, source, &edits);
    let body = if body.is_empty() {
        format!("{}pass", body_indent(definition, source))
    } else {
        body
    };
    format!("{}\n{}", class_head(definition, source), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::extract_signature;
    use crate::parser::{node_text, NotebookParser};
    use pretty_assertions::assert_eq;

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
    fn test_parameters_one_per_line() {
        let raw = "@app.function\ndef add(a: int,  # first\n        b=0,  # second\n        ) -> int:  # sum\n    \"\"\"Add two numbers.\"\"\"\n    return a + b";
        let rendered = AnnotatedRenderer
            .render_export(&export(raw, ExportKind::Function))
            .unwrap();

        assert_eq!(
            rendered,
            r#"def add(
    a: int,  # first
    b=0,  # second
) -> int:  # sum
    """Add two numbers."""
    return a + b"#
        );
    }

    #[test]
    fn test_rendered_output_keeps_docs_on_reparse() {
        let raw = "@app.function\ndef add(a: int, b=0) -> int:\n    return a + b";
        let mut decl = export(raw, ExportKind::Function);
        if let Some(params) = decl.params.as_mut() {
            params[0].inline_doc = "first".to_string();
            params[1].inline_doc = "second".to_string();
        }
        let rendered = AnnotatedRenderer.render_export(&decl).unwrap();

        let tree = NotebookParser::parse_source(&rendered).unwrap();
        let function = tree.root_node().named_child(0).unwrap();
        let signature = extract_signature(function, &rendered);
        let docs: Vec<_> = signature
            .params
            .iter()
            .map(|p| (p.name.as_str(), p.inline_doc.as_str()))
            .collect();
        assert_eq!(docs, vec![("a", "first"), ("b", "second")]);
    }

    #[test]
    fn test_no_parameters() {
        let raw = "@app.function\nasync def tick() -> None:  # nothing\n    pass";
        let rendered = AnnotatedRenderer
            .render_export(&export(raw, ExportKind::Function))
            .unwrap();
        assert_eq!(rendered, "async def tick() -> None:  # nothing\n    pass");
    }

    #[test]
    fn test_class_init_reformatted() {
        let raw = r#"@app.class_definition
class Point:
    """A point."""

    x: int  # horizontal

    def __init__(self, x: int, y=0):
        self.x = x"#;
        let mut decl = export(raw, ExportKind::Class);
        if let Some(params) = decl.nested_init_params.as_mut() {
            params[0].inline_doc = "start x".to_string();
        }
        let rendered = AnnotatedRenderer.render_export(&decl).unwrap();

        assert_eq!(
            rendered,
            r#"class Point:
    """A point."""

    x: int  # horizontal

    def __init__(
        self,
        x: int,  # start x
        y=0,
    ):
        self.x = x"#
        );
    }
}
