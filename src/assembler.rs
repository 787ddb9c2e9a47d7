//! Module text assembly.
//!
//! A generated module is laid out in three groups, each separated by two blank lines:
//!
//! 1. imports, in declaration order
//! 2. private constants, in declaration order
//! 3. transformed exports, separated from each other by two blank lines
//!
//! Empty groups are left out entirely, and the text always ends with exactly one newline.

use crate::error::Result;
use crate::model::{Declaration, ModuleExtraction};
use crate::transformer::{Style, StyleRegistry};
use log::debug;

/// Separator between groups and between exports
const GROUP_SEPARATOR: &str = "\n\n\n";

/// First line of every generated module, naming the notebook it came from.
pub fn banner(source_file: &str) -> String {
    format!("# Generated by notepack from {}. Do not edit.", source_file)
}

/// Assembles the text of one generated module.
///
/// # Errors
///
/// Returns an error if `style` has no renderer in `registry` or an export cannot be
/// re-parsed.
pub fn assemble_module(
    extraction: &ModuleExtraction,
    registry: &StyleRegistry,
    style: Style,
) -> Result<String> {
    debug!(
        "Assembling module {} ({} imports, {} constants, {} exports)",
        extraction.module_name,
        extraction.imports.len(),
        extraction.constants.len(),
        extraction.exports.len()
    );

    let imports = render_all(&extraction.imports, registry, style)?;
    let constants = render_all(&extraction.constants, registry, style)?;
    let exports = render_all(&extraction.exports, registry, style)?;

    let groups: Vec<String> = [
        imports.join("\n"),
        constants.join("\n"),
        exports.join(GROUP_SEPARATOR),
    ]
    .into_iter()
    .filter(|group| !group.is_empty())
    .collect();

    let mut text = banner(&extraction.source_file);
    text.push('\n');
    if !groups.is_empty() {
        text.push('\n');
        text.push_str(&groups.join(GROUP_SEPARATOR));
        text.push('\n');
    }
    Ok(text)
}

fn render_all(
    declarations: &[Declaration],
    registry: &StyleRegistry,
    style: Style,
) -> Result<Vec<String>> {
    declarations
        .iter()
        .map(|decl| {
            registry
                .render(decl, style)
                .map(|text| text.trim_end().to_string())
        })
        .collect()
}
