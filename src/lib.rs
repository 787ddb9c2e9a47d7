//! notepack - Package reactive Python notebooks as an installable library.
//!
//! Notebooks mark the definitions they want to ship with `@app.function` and
//! `@app.class_definition`, and put shared imports and private constants in a
//! `with app.setup:` block. This library finds those declarations by static analysis
//! (notebooks are never executed), extracts signature metadata including inline
//! `# comment` documentation, and writes one module per notebook plus a package
//! `__init__.py`.
//!
//! # Architecture
//!
//! 1. [`config`] - Reads package metadata and build settings from `pyproject.toml`
//! 2. [`scanner`] - Lists the notebook directory and derives module names
//! 3. [`parser`] - Parses notebook source into syntax trees
//! 4. [`classifier`] - Sorts top-level statements into imports, constants and exports
//! 5. [`extractor`] - Extracts parameters, returns and docstrings of exports
//! 6. [`transformer`] - Renders exports in a documentation style
//! 7. [`assembler`] - Lays out the text of one generated module
//! 8. [`composer`] - Runs `scan` and `build` over a whole project
//! 9. [`serializer`] - Writes scan reports as JSON or YAML
//!
//! # Example Usage
//!
//! ```no_run
//! use notepack::composer::{build, scan_project, BuildOptions};
//! use notepack::serializer::serialize_json;
//! use notepack::transformer::{Style, StyleRegistry};
//! use std::path::Path;
//!
//! let project = Path::new("./my-project");
//!
//! // Inspect what would be exported
//! let result = scan_project(project).unwrap();
//! println!("{}", serialize_json(&result).unwrap());
//!
//! // Write the package
//! let options = BuildOptions {
//!     style: Some(Style::Annotated),
//!     ..Default::default()
//! };
//! let package = build(project, &options, &StyleRegistry::with_builtin()).unwrap();
//! println!("Wrote {}", package.display());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod assembler;
pub mod classifier;
pub mod cli;
pub mod composer;
pub mod config;
pub mod error;
pub mod extractor;
pub mod model;
pub mod parser;
pub mod scanner;
pub mod serializer;
pub mod transformer;
