//! notepack - Command-line tool for packaging notebook exports.
//!
//! Turns a directory of reactive Python notebooks into an installable package: every
//! `@app.function` / `@app.class_definition` becomes part of a generated module, with
//! documentation rendered in the chosen style.
//!
//! # Usage
//!
//! ```bash
//! notepack [OPTIONS] <COMMAND> [PROJECT]
//! ```
//!
//! # Examples
//!
//! Build the package configured in `./pyproject.toml`:
//! ```bash
//! notepack build
//! ```
//!
//! Build with one-parameter-per-line signatures into `dist/`:
//! ```bash
//! notepack build ./my-project -s annotated -o dist
//! ```
//!
//! Dump the extracted declarations as YAML:
//! ```bash
//! notepack scan ./my-project -f yaml -o scan.yaml -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use notepack::cli;

fn main() -> Result<()> {
    // Parse once to read the verbose flag, then validate after the logger is up
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("notepack starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;
    cli::run(args)?;

    info!("Done");

    Ok(())
}
