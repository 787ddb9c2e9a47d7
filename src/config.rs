//! Project configuration loaded from `pyproject.toml`.
//!
//! Two tables are read: `[project]` supplies the [`PackageMetadata`] written into the
//! generated package, and the optional `[tool.notepack]` table supplies build settings.
//!
//! ```toml
//! [project]
//! name = "demo-tools"
//! version = "0.1.0"
//! description = "Helpers extracted from notebooks"
//! license = "MIT"
//! authors = [{ name = "Ada", email = "ada@example.com" }]
//!
//! [tool.notepack]
//! notebooks = "nbs"
//! output = "src"
//! style = "annotated"
//! ```

use crate::error::{Error, Result};
use crate::model::PackageMetadata;
use crate::transformer::Style;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Manifest file name looked up in the project root
pub const MANIFEST_FILE: &str = "pyproject.toml";

/// Loaded project configuration.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    /// Project root (directory holding `pyproject.toml`)
    pub root: PathBuf,
    pub metadata: PackageMetadata,
    pub settings: BuildSettings,
}

/// Build settings from `[tool.notepack]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSettings {
    /// Notebook directory, relative to the project root
    pub notebooks: PathBuf,
    /// Output directory the package directory is created in, relative to the project root
    pub output: PathBuf,
    /// Documentation style for exported declarations
    pub style: Style,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            notebooks: PathBuf::from("notebooks"),
            output: PathBuf::from("src"),
            style: Style::Structured,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PyProject {
    project: Option<ProjectTable>,
    tool: Option<ToolTable>,
}

#[derive(Debug, Deserialize)]
struct ProjectTable {
    name: Option<String>,
    version: Option<String>,
    description: Option<String>,
    license: Option<LicenseField>,
    #[serde(default)]
    authors: Vec<AuthorField>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LicenseField {
    Expression(String),
    Table {
        text: Option<String>,
        file: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AuthorField {
    Bare(String),
    Table {
        name: Option<String>,
        email: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct ToolTable {
    notepack: Option<BuildSettings>,
}

impl ProjectConfig {
    /// Loads `pyproject.toml` from `root`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the manifest is missing, malformed, or lacks
    /// `name`, `version` or `description`.
    pub fn load(root: &Path) -> Result<Self> {
        let manifest_path = root.join(MANIFEST_FILE);
        debug!("Reading manifest: {}", manifest_path.display());

        if !manifest_path.is_file() {
            return Err(Error::config(format!(
                "no {} found in {}",
                MANIFEST_FILE,
                root.display()
            )));
        }
        let content = fs::read_to_string(&manifest_path)?;
        let (metadata, settings) = parse_manifest(&content)?;

        Ok(Self {
            root: root.to_path_buf(),
            metadata,
            settings,
        })
    }

    /// Absolute notebook directory
    pub fn notebooks_dir(&self) -> PathBuf {
        self.root.join(&self.settings.notebooks)
    }

    /// Absolute output directory (parent of the package directory)
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.settings.output)
    }
}

/// Parses manifest text into package metadata and build settings.
pub fn parse_manifest(content: &str) -> Result<(PackageMetadata, BuildSettings)> {
    let pyproject: PyProject = toml::from_str(content)?;

    let project = pyproject
        .project
        .ok_or_else(|| Error::config("missing [project] table"))?;

    let name = required(project.name, "name")?;
    let version = required(project.version, "version")?;
    let description = required(project.description, "description")?;

    let license = match project.license {
        Some(LicenseField::Expression(expr)) => expr,
        Some(LicenseField::Table { text, file }) => text.or(file).unwrap_or_default(),
        None => String::new(),
    };

    let author = project
        .authors
        .into_iter()
        .filter_map(|author| match author {
            AuthorField::Bare(name) => Some(name),
            AuthorField::Table { name, email } => name.or(email),
        })
        .collect::<Vec<_>>()
        .join(", ");

    let metadata = PackageMetadata {
        package_name: name.trim().replace('-', "_"),
        version,
        description,
        license,
        author,
    };

    let settings = pyproject
        .tool
        .and_then(|tool| tool.notepack)
        .unwrap_or_default();

    Ok((metadata, settings))
}

fn required(value: Option<String>, key: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::config(format!("missing required [project] key `{}`", key))),
    }
}
