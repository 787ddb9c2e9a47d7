use crate::error::Result;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Notebook file extension
pub const NOTEBOOK_EXTENSION: &str = "py";

/// File name prefix for notebooks that hold tests only
pub const TEST_PREFIX: &str = "test_";

/// File name prefix for scratch notebooks that never ship
pub const DEV_PREFIX: &str = "dev_";

/// Python keywords, which cannot be imported as module names
const KEYWORDS: [&str; 35] = [
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Notebook scanner for a flat notebook directory.
///
/// The `NotebookScanner` lists the notebooks directly inside one directory (no recursion),
/// sorted by file name, and derives the module name each notebook turns into. Ordinal
/// prefixes such as `01_` only control ordering and are stripped from module names.
///
/// # Example
///
/// ```no_run
/// use notepack::scanner::NotebookScanner;
/// use std::path::PathBuf;
///
/// let scanner = NotebookScanner::new(PathBuf::from("./notebooks"));
/// let listing = scanner.scan().unwrap();
/// println!("Found {} notebooks", listing.notebooks.len());
/// ```
pub struct NotebookScanner {
    root_path: PathBuf,
}

/// A notebook that will become a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookFile {
    pub path: PathBuf,
    /// File name without directory, e.g. `01_core.py`
    pub file_name: String,
    /// Module name, e.g. `core`
    pub module_name: String,
}

/// Result of listing a notebook directory.
pub struct DirectoryListing {
    /// Retained notebooks in file-name order
    pub notebooks: Vec<NotebookFile>,
    /// Python files that were excluded (hidden, test or development notebooks)
    pub skipped: Vec<PathBuf>,
}

impl NotebookScanner {
    /// Creates a new `NotebookScanner` for the specified directory.
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Lists notebooks in the directory in file-name order.
    ///
    /// Only regular files with the `.py` extension are considered. Files whose module name
    /// cannot be derived (see [`module_name`]) are reported in `skipped`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory does not exist or cannot be read.
    pub fn scan(&self) -> Result<DirectoryListing> {
        let mut notebooks = Vec::new();
        let mut skipped = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();

            if !entry.file_type().is_file()
                || path.extension().and_then(|s| s.to_str()) != Some(NOTEBOOK_EXTENSION)
            {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().to_string();
            match module_name(&file_name) {
                Some(module_name) => {
                    debug!("Notebook {} -> module {}", file_name, module_name);
                    notebooks.push(NotebookFile {
                        path: path.to_path_buf(),
                        file_name,
                        module_name,
                    });
                }
                None => {
                    debug!("Skipping notebook {}", file_name);
                    skipped.push(path.to_path_buf());
                }
            }
        }

        // walkdir sorts by OsStr; re-sort on the decoded name so order never depends on platform
        notebooks.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        Ok(DirectoryListing { notebooks, skipped })
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

/// Derives the module name for a notebook file name.
///
/// Returns `None` for hidden files, test notebooks (`test_*`), development notebooks
/// (`dev_*`) and anything that is not a `.py` file. A leading numeric ordinal followed by
/// `_` is stripped: `01_core.py` becomes `core`. Dashes become underscores
/// (`01_my-mod.py` becomes `my_mod`); names that still are not importable Python
/// identifiers are rejected with a warning.
pub fn module_name(file_name: &str) -> Option<String> {
    if file_name.starts_with('.') {
        return None;
    }
    let stem = file_name.strip_suffix(".py")?;
    if stem.starts_with(TEST_PREFIX) {
        return None;
    }

    let name = strip_ordinal(stem);
    if name.is_empty() || name.starts_with(TEST_PREFIX) || name.starts_with(DEV_PREFIX) {
        return None;
    }
    let name = name.replace('-', "_");
    if !is_identifier(&name) {
        warn!("{} does not give a valid Python module name, skipping", file_name);
        return None;
    }
    Some(name)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_well = chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic());
    starts_well && chars.all(|c| c == '_' || c.is_alphanumeric()) && !KEYWORDS.contains(&name)
}

fn strip_ordinal(stem: &str) -> &str {
    let digits = stem.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return stem;
    }
    stem[digits..].strip_prefix('_').unwrap_or(stem)
}
