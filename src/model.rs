//! Records produced by one scan of a notebook directory.
//!
//! Everything here is built fresh on every scan and handed downward through the
//! pipeline by reference. All records serialize with `serde` so a scan can be
//! dumped for external documentation tooling (see [`crate::serializer`]).

use serde::Serialize;

/// The three kinds of declaration a notebook can contribute to a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    /// An import statement from the setup block
    Import,
    /// A private module-level constant from the setup block
    Constant,
    /// A marker-decorated function or class
    Export,
}

/// Whether an export is a function or a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    Function,
    Class,
}

/// One classified top-level declaration.
#[derive(Debug, Clone, Serialize)]
pub struct Declaration {
    pub kind: DeclarationKind,
    /// Declared name; empty for imports
    pub name: String,
    /// Source text of the statement. For exports this spans from the first
    /// marker decorator to the end of the definition.
    pub raw_source: String,
    /// 1-indexed line of the first source line of `raw_source`
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_kind: Option<ExportKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Parameter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_info: Option<ReturnInfo>,
    /// Cleaned docstring, empty when the definition has none
    pub docstring: String,
    /// `__init__` parameters of a class, kept apart from its attributes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested_init_params: Option<Vec<Parameter>>,
}

impl Declaration {
    /// Create an import declaration
    pub fn import(raw_source: String, line: usize) -> Self {
        Self::bare(DeclarationKind::Import, String::new(), raw_source, line)
    }

    /// Create a constant declaration
    pub fn constant(name: String, raw_source: String, line: usize) -> Self {
        Self::bare(DeclarationKind::Constant, name, raw_source, line)
    }

    /// Create an export declaration with no signature metadata yet
    pub fn export(export_kind: ExportKind, name: String, raw_source: String, line: usize) -> Self {
        let mut decl = Self::bare(DeclarationKind::Export, name, raw_source, line);
        decl.export_kind = Some(export_kind);
        decl
    }

    fn bare(kind: DeclarationKind, name: String, raw_source: String, line: usize) -> Self {
        Self {
            kind,
            name,
            raw_source,
            line,
            export_kind: None,
            params: None,
            return_info: None,
            docstring: String::new(),
            nested_init_params: None,
        }
    }

    /// Parameters of this declaration, empty if none were extracted
    pub fn params(&self) -> &[Parameter] {
        self.params.as_deref().unwrap_or(&[])
    }

    pub fn is_class(&self) -> bool {
        self.export_kind == Some(ExportKind::Class)
    }
}

/// A single parameter (or class attribute) with its inline documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Trailing comment text from the parameter's line, empty when absent
    pub inline_doc: String,
    pub is_variadic_positional: bool,
    pub is_variadic_keyword: bool,
    /// Declared before a `/` separator
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_positional_only: bool,
    /// Declared after a bare `*` separator
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_keyword_only: bool,
}

impl Parameter {
    /// Create a plain positional parameter
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_annotation: None,
            default_value: None,
            inline_doc: String::new(),
            is_variadic_positional: false,
            is_variadic_keyword: false,
            is_positional_only: false,
            is_keyword_only: false,
        }
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.type_annotation = Some(annotation.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default_value = Some(default.into());
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.inline_doc = doc.into();
        self
    }

    pub fn is_variadic(&self) -> bool {
        self.is_variadic_positional || self.is_variadic_keyword
    }

    /// Name as written in a signature, with `*` / `**` for variadics
    pub fn display_name(&self) -> String {
        if self.is_variadic_positional {
            format!("*{}", self.name)
        } else if self.is_variadic_keyword {
            format!("**{}", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Return annotation and the trailing comment on the `->` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    pub doc: String,
}

/// Everything extracted from one notebook file.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleExtraction {
    pub module_name: String,
    /// File name of the notebook this module came from
    pub source_file: String,
    pub imports: Vec<Declaration>,
    pub exports: Vec<Declaration>,
    pub export_names: Vec<String>,
    pub constants: Vec<Declaration>,
}

impl ModuleExtraction {
    pub fn new(module_name: String, source_file: String) -> Self {
        Self {
            module_name,
            source_file,
            imports: Vec::new(),
            exports: Vec::new(),
            export_names: Vec::new(),
            constants: Vec::new(),
        }
    }

    /// Export names that do not start with an underscore, in declaration order
    pub fn public_names(&self) -> impl Iterator<Item = &str> {
        self.export_names
            .iter()
            .map(String::as_str)
            .filter(|name| !name.starts_with('_'))
    }
}

/// Package-level metadata read from `pyproject.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageMetadata {
    /// Importable package name (`-` replaced by `_`)
    pub package_name: String,
    pub version: String,
    pub description: String,
    pub license: String,
    pub author: String,
}

/// Complete output of one scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub metadata: PackageMetadata,
    pub modules: Vec<ModuleExtraction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_names_skip_private() {
        let mut module = ModuleExtraction::new("core".to_string(), "01_core.py".to_string());
        module.export_names = vec!["foo".to_string(), "_foo_private".to_string(), "Bar".to_string()];
        let names: Vec<_> = module.public_names().collect();
        assert_eq!(names, vec!["foo", "Bar"]);
    }

    #[test]
    fn test_display_name_variadics() {
        let mut args = Parameter::new("args");
        args.is_variadic_positional = true;
        let mut kwargs = Parameter::new("kwargs");
        kwargs.is_variadic_keyword = true;
        assert_eq!(args.display_name(), "*args");
        assert_eq!(kwargs.display_name(), "**kwargs");
        assert_eq!(Parameter::new("a").display_name(), "a");
    }

    #[test]
    fn test_declaration_serializes_kind() {
        let decl = Declaration::import("import os".to_string(), 3);
        let json = serde_json::to_value(&decl).unwrap();
        assert_eq!(json["kind"], "import");
        assert!(json.get("params").is_none());
    }
}
