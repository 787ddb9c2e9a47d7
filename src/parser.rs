use crate::error::{Error, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser, Tree};

/// Python parser for notebook source files.
///
/// The `NotebookParser` uses tree-sitter's Python grammar to turn notebook source into a
/// concrete syntax tree. Notebooks are plain Python modules, so no notebook-specific grammar
/// is needed; cell structure is recognized later by the classifier.
///
/// # Example
///
/// ```no_run
/// use notepack::parser::NotebookParser;
/// use std::path::Path;
///
/// let parsed = NotebookParser::parse_file(Path::new("notebooks/01_core.py")).unwrap();
/// println!("Parsed {} top-level statements", parsed.root().named_child_count());
/// ```
pub struct NotebookParser;

/// A successfully parsed notebook with its syntax tree.
///
/// The tree borrows nothing; nodes are resolved against `source` on demand.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path to the notebook file
    pub path: PathBuf,
    /// Full source text
    pub source: String,
    /// The parsed syntax tree
    pub tree: Tree,
}

impl ParsedFile {
    /// Root `module` node of the tree
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by `node`
    pub fn text(&self, node: Node<'_>) -> &str {
        node_text(node, &self.source)
    }
}

/// Source text covered by `node`
pub fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    &source[node.byte_range()]
}

/// Source text of `node` with every comment inside it removed.
///
/// Line breaks and string contents are kept as written; only the `comment` nodes and
/// the spaces in front of them are dropped.
pub fn text_without_comments(node: Node<'_>, source: &str) -> String {
    let mut comments = Vec::new();
    collect_comments(node, &mut comments);

    let mut text = String::new();
    let mut pos = node.start_byte();
    for comment in comments {
        text.push_str(source[pos..comment.start_byte()].trim_end_matches([' ', '\t']));
        pos = comment.end_byte();
    }
    text.push_str(&source[pos..node.end_byte()]);
    text
}

/// Source text of an expression on a single line.
///
/// Comments are dropped and line breaks become single spaces, so a default value
/// written over several lines can be placed into a one-line signature. String
/// literals are copied untouched. No space is kept after an opening bracket or
/// before a closing bracket or comma.
pub fn single_line_text(node: Node<'_>, source: &str) -> String {
    let mut tokens = Vec::new();
    collect_tokens(node, &mut tokens);

    let mut text = String::new();
    let mut previous: Option<(usize, &str)> = None;
    for token in tokens {
        let token_text = node_text(token, source);
        if let Some((end, prev_text)) = previous {
            let spaced = token.start_byte() > end;
            let after_open = matches!(prev_text, "(" | "[" | "{");
            let before_close = matches!(token_text, ")" | "]" | "}" | ",");
            if spaced && !after_open && !before_close {
                text.push(' ');
            }
        }
        text.push_str(token_text);
        previous = Some((token.end_byte(), token_text));
    }
    text
}

fn collect_comments<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    for child in children {
        if child.kind() == "comment" {
            out.push(child);
        } else {
            collect_comments(child, out);
        }
    }
}

fn collect_tokens<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    match node.kind() {
        "comment" => {}
        "string" => out.push(node),
        _ if node.child_count() == 0 => out.push(node),
        _ => {
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            for child in children {
                collect_tokens(child, out);
            }
        }
    }
}

impl NotebookParser {
    /// Parses a single notebook file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file contains invalid Python syntax
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let source = fs::read_to_string(path)?;
        let tree = Self::parse_source(&source).map_err(|message| Error::ParseError {
            file: path.to_path_buf(),
            message,
        })?;

        debug!("Successfully parsed file: {}", path.display());

        Ok(ParsedFile {
            path: path.to_path_buf(),
            source,
            tree,
        })
    }

    /// Parses Python source text, reporting the first syntax error position.
    pub fn parse_source(source: &str) -> std::result::Result<Tree, String> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| format!("failed to load Python grammar: {}", e))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| "parser returned no tree".to_string())?;

        if tree.root_node().has_error() {
            let message = match first_error(tree.root_node()) {
                Some(node) => {
                    let start = node.start_position();
                    format!(
                        "invalid Python syntax at {}:{}",
                        start.row + 1,
                        start.column + 1
                    )
                }
                None => "invalid Python syntax".to_string(),
            };
            warn!("{}", message);
            return Err(message);
        }

        Ok(tree)
    }
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error() || child.is_missing())
        .find_map(first_error)
}
