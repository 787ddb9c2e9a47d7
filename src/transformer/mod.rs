//! Documentation styles for exported declarations.
//!
//! Each style is a [`StyleRenderer`] that turns one export declaration into the text
//! written to the generated module. Renderers are looked up in an explicit
//! [`StyleRegistry`] passed to the assembler; there is no global registration.
//!
//! # Supported Styles
//!
//! - **unmodified**: See [`unmodified::UnmodifiedRenderer`]
//! - **structured**: See [`structured::StructuredRenderer`]
//! - **annotated**: See [`annotated::AnnotatedRenderer`]
//!
//! # Example
//!
//! ```no_run
//! use notepack::model::{Declaration, ExportKind};
//! use notepack::transformer::{Style, StyleRegistry};
//!
//! let decl = Declaration::export(
//!     ExportKind::Function,
//!     "f".to_string(),
//!     "@app.function\ndef f():\n    pass\n".to_string(),
//!     1,
//! );
//! let registry = StyleRegistry::with_builtin();
//! println!("{}", registry.render(&decl, Style::Unmodified).unwrap());
//! ```

pub mod annotated;
pub mod layout;
pub mod signature;
pub mod structured;
pub mod unmodified;

use crate::error::{Error, Result};
use crate::model::{Declaration, DeclarationKind};
use crate::parser::single_line_text;
use clap::ValueEnum;
use layout::{async_prefix, field_or_empty, indent_of};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tree_sitter::Node;

/// Documentation convention for generated modules.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Source as written, export markers removed
    Unmodified,
    /// Google-style docstrings built from inline comments
    Structured,
    /// One parameter per line with its inline comment
    Annotated,
}

/// Renders export declarations in one style.
pub trait StyleRenderer {
    /// The style this renderer produces
    fn style(&self) -> Style;

    /// Renders one export declaration (marker decorators removed).
    fn render_export(&self, declaration: &Declaration) -> Result<String>;
}

/// Renderers by style.
pub struct StyleRegistry {
    renderers: BTreeMap<Style, Box<dyn StyleRenderer>>,
}

impl StyleRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            renderers: BTreeMap::new(),
        }
    }

    /// A registry holding the three built-in renderers
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(unmodified::UnmodifiedRenderer));
        registry.register(Box::new(structured::StructuredRenderer));
        registry.register(Box::new(annotated::AnnotatedRenderer));
        registry
    }

    /// Adds a renderer, replacing any previous renderer for the same style.
    pub fn register(&mut self, renderer: Box<dyn StyleRenderer>) {
        self.renderers.insert(renderer.style(), renderer);
    }

    pub fn get(&self, style: Style) -> Result<&dyn StyleRenderer> {
        self.renderers
            .get(&style)
            .map(|renderer| renderer.as_ref())
            .ok_or_else(|| Error::config(format!("no renderer registered for style {:?}", style)))
    }

    /// Final text of any declaration. Imports and constants pass through unchanged.
    pub fn render(&self, declaration: &Declaration, style: Style) -> Result<String> {
        match declaration.kind {
            DeclarationKind::Import | DeclarationKind::Constant => {
                Ok(declaration.raw_source.clone())
            }
            DeclarationKind::Export => self.get(style)?.render_export(declaration),
        }
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

/// `[indent][async ]def name[T]` without the parameter list
pub(crate) fn def_head(definition: Node<'_>, source: &str) -> String {
    format!(
        "{}{}def {}{}",
        indent_of(source, definition.start_position().row),
        async_prefix(definition),
        field_or_empty(definition, "name", source),
        field_or_empty(definition, "type_parameters", source),
    )
}

/// ` -> T` as declared, empty without a return annotation
pub(crate) fn return_suffix(definition: Node<'_>, source: &str) -> String {
    match definition.child_by_field_name("return_type") {
        Some(ty) => format!(" -> {}", single_line_text(ty, source)),
        None => String::new(),
    }
}

/// `[indent]class Name[T](Bases):`
pub(crate) fn class_head(definition: Node<'_>, source: &str) -> String {
    format!(
        "{}class {}{}{}:",
        indent_of(source, definition.start_position().row),
        field_or_empty(definition, "name", source),
        field_or_empty(definition, "type_parameters", source),
        field_or_empty(definition, "superclasses", source),
    )
}

/// Prepends kept decorators to a rendered definition.
pub(crate) fn with_decorators(decorators: &[&str], rendered: String) -> String {
    if decorators.is_empty() {
        return rendered;
    }
    format!("{}\n{}", decorators.join("\n"), rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExportKind;

    struct Shouting;

    impl StyleRenderer for Shouting {
        fn style(&self) -> Style {
            Style::Unmodified
        }

        fn render_export(&self, declaration: &Declaration) -> Result<String> {
            Ok(declaration.name.to_uppercase())
        }
    }

    fn export() -> Declaration {
        Declaration::export(
            ExportKind::Function,
            "f".to_string(),
            "@app.function\ndef f():\n    pass\n".to_string(),
            1,
        )
    }

    #[test]
    fn test_registry_has_builtin_styles() {
        let registry = StyleRegistry::with_builtin();
        for style in [Style::Unmodified, Style::Structured, Style::Annotated] {
            assert_eq!(registry.get(style).unwrap().style(), style);
        }
    }

    #[test]
    fn test_empty_registry_reports_configuration_error() {
        let registry = StyleRegistry::new();
        let err = registry.render(&export(), Style::Structured).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_register_replaces_renderer() {
        let mut registry = StyleRegistry::with_builtin();
        registry.register(Box::new(Shouting));
        assert_eq!(registry.render(&export(), Style::Unmodified).unwrap(), "F");
    }

    #[test]
    fn test_imports_and_constants_pass_through() {
        let registry = StyleRegistry::new();
        let import = Declaration::import("import os".to_string(), 1);
        let constant = Declaration::constant("__X".to_string(), "__X = 1".to_string(), 2);
        assert_eq!(registry.render(&import, Style::Structured).unwrap(), "import os");
        assert_eq!(registry.render(&constant, Style::Annotated).unwrap(), "__X = 1");
    }

    #[test]
    fn test_style_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            style: Style,
        }
        let wrapper: Wrapper = toml::from_str("style = \"annotated\"").unwrap();
        assert_eq!(wrapper.style, Style::Annotated);
    }
}
