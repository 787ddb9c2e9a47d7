//! Scan report serialization.
//!
//! A scan report is the full [`ScanResult`] (package metadata plus every module's imports,
//! constants and exports with their signatures) rendered as JSON or YAML, for tools that
//! build reference documentation from the notebooks without re-parsing them.

use crate::error::Result;
use crate::model::ScanResult;
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a scan result to YAML.
///
/// # Example
///
/// ```no_run
/// use notepack::composer::scan_project;
/// use notepack::serializer::serialize_yaml;
/// use std::path::Path;
///
/// let result = scan_project(Path::new("./my-project")).unwrap();
/// println!("{}", serialize_yaml(&result).unwrap());
/// ```
pub fn serialize_yaml(result: &ScanResult) -> Result<String> {
    debug!("Serializing scan result to YAML");
    Ok(serde_yaml::to_string(result)?)
}

/// Serializes a scan result to pretty-printed JSON.
pub fn serialize_json(result: &ScanResult) -> Result<String> {
    debug!("Serializing scan result to JSON");
    Ok(serde_json::to_string_pretty(result)?)
}

/// Writes string content to a file, creating parent directories as needed.
///
/// Creates the file if it doesn't exist, or overwrites it if it does.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
