//! Package composition: the two top-level operations, `scan` and `build`.
//!
//! `scan` reads the manifest, lists the notebook directory and extracts every retained
//! notebook into a [`ModuleExtraction`]. `build` runs a scan, assembles one module per
//! notebook that exports something and writes the package `__init__.py`.
//!
//! Output depends only on the input bytes: notebooks are processed in file-name order,
//! every collection is ordered, and nothing time- or path-dependent is written.

use crate::assembler::{assemble_module, banner};
use crate::classifier::classify;
use crate::config::ProjectConfig;
use crate::error::Result;
use crate::extractor::extract_signature;
use crate::model::{DeclarationKind, ModuleExtraction, PackageMetadata, ScanResult};
use crate::parser::{NotebookParser, ParsedFile};
use crate::scanner::{NotebookFile, NotebookScanner};
use crate::transformer::{Style, StyleRegistry};
use log::{debug, info, warn};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Module name that is documentation only and never written to the package
pub const INDEX_MODULE: &str = "index";

/// Package initializer file name
pub const INIT_FILE: &str = "__init__.py";

/// Prefix shared by every banner this tool writes
const BANNER_PREFIX: &str = "# Generated by notepack";

/// Overrides for the settings in `[tool.notepack]`.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub style: Option<Style>,
    /// Output directory the package directory is created in
    pub output: Option<PathBuf>,
}

/// Loads the project at `root` and scans its notebooks.
///
/// # Errors
///
/// Configuration errors are reported before any notebook is read. A notebook with
/// invalid syntax aborts the scan.
pub fn scan_project(root: &Path) -> Result<ScanResult> {
    let config = ProjectConfig::load(root)?;
    scan(&config)
}

/// Scans the notebook directory of an already loaded project.
pub fn scan(config: &ProjectConfig) -> Result<ScanResult> {
    let notebooks_dir = config.notebooks_dir();
    info!("Scanning notebooks in {}", notebooks_dir.display());

    let listing = NotebookScanner::new(notebooks_dir).scan()?;
    info!(
        "Found {} notebooks ({} skipped)",
        listing.notebooks.len(),
        listing.skipped.len()
    );

    let mut modules = Vec::with_capacity(listing.notebooks.len());
    for notebook in &listing.notebooks {
        let parsed = NotebookParser::parse_file(&notebook.path)?;
        let module = extract_module(&parsed, notebook);
        info!(
            "Module {}: {} imports, {} constants, {} exports",
            module.module_name,
            module.imports.len(),
            module.constants.len(),
            module.exports.len()
        );
        modules.push(module);
    }

    Ok(ScanResult {
        metadata: config.metadata.clone(),
        modules,
    })
}

/// Classifies every top-level statement of a parsed notebook and extracts export signatures.
///
/// Later exports reusing an earlier export's name are dropped with a warning.
pub fn extract_module(parsed: &ParsedFile, notebook: &NotebookFile) -> ModuleExtraction {
    let mut module = ModuleExtraction::new(notebook.module_name.clone(), notebook.file_name.clone());
    let mut seen: HashSet<String> = HashSet::new();

    let root = parsed.root();
    let mut cursor = root.walk();
    let statements: Vec<_> = root.named_children(&mut cursor).collect();

    for classified in statements
        .into_iter()
        .flat_map(|node| classify(node, &parsed.source))
    {
        let declaration = classified.declaration;
        match declaration.kind {
            DeclarationKind::Import => module.imports.push(declaration),
            DeclarationKind::Constant => module.constants.push(declaration),
            DeclarationKind::Export => {
                if !seen.insert(declaration.name.clone()) {
                    warn!(
                        "{}:{}: duplicate export {}, keeping the first definition",
                        notebook.file_name, declaration.line, declaration.name
                    );
                    continue;
                }
                let declaration = match classified.definition {
                    Some(definition) => {
                        extract_signature(definition, &parsed.source).apply(declaration)
                    }
                    None => declaration,
                };
                debug!(
                    "Extracted {} with {} parameters",
                    declaration.name,
                    declaration.params().len()
                );
                module.export_names.push(declaration.name.clone());
                module.exports.push(declaration);
            }
        }
    }

    module
}

/// Builds the package for the project at `root` and returns the package directory.
///
/// # Errors
///
/// Returns an error when the manifest is invalid, a notebook fails to parse, the chosen
/// style has no renderer, or the package cannot be written.
pub fn build(root: &Path, options: &BuildOptions, registry: &StyleRegistry) -> Result<PathBuf> {
    let config = ProjectConfig::load(root)?;
    let style = options.style.unwrap_or(config.settings.style);
    // fail on a missing renderer before touching the filesystem
    registry.get(style)?;

    let scan_result = scan(&config)?;
    let output_dir = match &options.output {
        Some(output) => root.join(output),
        None => config.output_dir(),
    };
    let package_dir = output_dir.join(&scan_result.metadata.package_name);
    info!(
        "Building package {} in {} ({:?} style)",
        scan_result.metadata.package_name,
        package_dir.display(),
        style
    );
    fs::create_dir_all(&package_dir)?;

    let mut written: Vec<&ModuleExtraction> = Vec::new();
    let mut file_names: BTreeSet<String> = BTreeSet::new();
    for module in &scan_result.modules {
        if module.module_name == INDEX_MODULE {
            debug!("Skipping {} module", INDEX_MODULE);
            continue;
        }
        if module.exports.is_empty() {
            debug!("Module {} has no exports, not written", module.module_name);
            continue;
        }

        let file_name = format!("{}.py", module.module_name);
        if !file_names.insert(file_name.clone()) {
            warn!(
                "Module {} is produced by more than one notebook, keeping the first",
                module.module_name
            );
            continue;
        }
        let text = assemble_module(module, registry, style)?;
        fs::write(package_dir.join(&file_name), text)?;
        debug!("Wrote {}", file_name);
        written.push(module);
    }

    remove_stale_modules(&package_dir, &file_names)?;
    fs::write(
        package_dir.join(INIT_FILE),
        render_init(&scan_result.metadata, &written),
    )?;

    info!(
        "Wrote {} modules and {} to {}",
        written.len(),
        INIT_FILE,
        package_dir.display()
    );
    Ok(package_dir)
}

/// Deletes generated modules left over from notebooks that no longer export anything.
///
/// Only files starting with this tool's banner are touched.
fn remove_stale_modules(package_dir: &Path, keep: &BTreeSet<String>) -> Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(package_dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    entries.sort();

    for path in entries {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name == INIT_FILE || keep.contains(name) || !name.ends_with(".py") {
            continue;
        }
        if has_banner(&path)? {
            info!("Removing stale module {}", path.display());
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Whether the file starts with the generated-file banner.
///
/// Only the banner's length is read, so binary or non-UTF-8 files are fine.
fn has_banner(path: &Path) -> Result<bool> {
    let mut prefix = Vec::with_capacity(BANNER_PREFIX.len());
    fs::File::open(path)?
        .take(BANNER_PREFIX.len() as u64)
        .read_to_end(&mut prefix)?;
    Ok(prefix == BANNER_PREFIX.as_bytes())
}

/// Text of the package `__init__.py`.
///
/// ```python
/// # Generated by notepack from pyproject.toml. Do not edit.
/// """Helpers extracted from notebooks"""
///
/// __version__ = "0.1.0"
///
/// from .core import add, Point
///
/// __all__ = ["Point", "add"]
/// ```
pub fn render_init(metadata: &PackageMetadata, modules: &[&ModuleExtraction]) -> String {
    let mut lines = vec![
        banner(crate::config::MANIFEST_FILE),
        format!("\"\"\"{}\"\"\"", escape_docstring(&metadata.description)),
        String::new(),
        format!("__version__ = {}", py_string(&metadata.version)),
    ];

    let mut all: BTreeSet<&str> = BTreeSet::new();
    let mut imports = Vec::new();
    for module in modules {
        let names: Vec<&str> = module.public_names().collect();
        if names.is_empty() {
            continue;
        }
        for name in &names {
            if !all.insert(*name) {
                warn!(
                    "{} is exported by more than one module; {} wins",
                    name, module.module_name
                );
            }
        }
        imports.push(format!(
            "from .{} import {}",
            module.module_name,
            names.join(", ")
        ));
    }
    if !imports.is_empty() {
        lines.push(String::new());
        lines.extend(imports);
    }

    let quoted: Vec<String> = all.into_iter().map(py_string).collect();
    lines.push(String::new());
    lines.push(format!("__all__ = [{}]", quoted.join(", ")));

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Double-quoted Python string literal
fn py_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn escape_docstring(value: &str) -> String {
    value.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"")
}
