use super::layout::DeclarationSource;
use super::{with_decorators, Style, StyleRenderer};
use crate::error::Result;
use crate::model::Declaration;
use crate::parser::node_text;

/// Emits declarations as written, with only the export markers removed.
pub struct UnmodifiedRenderer;

impl StyleRenderer for UnmodifiedRenderer {
    fn style(&self) -> Style {
        Style::Unmodified
    }

    fn render_export(&self, declaration: &Declaration) -> Result<String> {
        let parsed = DeclarationSource::parse(declaration)?;
        let definition = parsed.definition()?;
        let text = node_text(definition, parsed.source()).to_string();
        Ok(with_decorators(&parsed.kept_decorators(), text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExportKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strips_markers_only() {
        let raw = "@app.function(hide_code=True)\n@functools.cache\ndef add(a: int,  # first\n        b=0):\n    return a + b";
        let decl = Declaration::export(ExportKind::Function, "add".to_string(), raw.to_string(), 1);
        let rendered = UnmodifiedRenderer.render_export(&decl).unwrap();
        assert_eq!(
            rendered,
            "@functools.cache\ndef add(a: int,  # first\n        b=0):\n    return a + b"
        );
    }

    #[test]
    fn test_class_without_other_decorators() {
        let raw = "@app.class_definition\nclass P:\n    x: int  # doc\n";
        let decl = Declaration::export(ExportKind::Class, "P".to_string(), raw.to_string(), 1);
        let rendered = UnmodifiedRenderer.render_export(&decl).unwrap();
        assert!(rendered.starts_with("class P:\n    x: int"));
        assert!(!rendered.contains("@app"));
    }
}
