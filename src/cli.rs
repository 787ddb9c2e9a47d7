use crate::composer::{self, BuildOptions};
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use crate::transformer::{Style, StyleRegistry};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// notepack - Build an installable Python package from notebook exports
#[derive(Parser, Debug)]
#[command(name = "notepack")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the package modules and __init__.py
    Build {
        /// Project directory holding pyproject.toml
        #[arg(value_name = "PROJECT", default_value = ".")]
        project_path: PathBuf,

        /// Documentation style (overrides [tool.notepack] style)
        #[arg(short = 's', long = "style", value_enum)]
        style: Option<Style>,

        /// Output directory, relative to the project (overrides [tool.notepack] output)
        #[arg(short = 'o', long = "output", value_name = "DIR")]
        output: Option<PathBuf>,
    },
    /// Print the extracted declarations as a report
    Scan {
        /// Project directory holding pyproject.toml
        #[arg(value_name = "PROJECT", default_value = ".")]
        project_path: PathBuf,

        /// Output format (yaml or json)
        #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
        output_format: OutputFormat,

        /// Output file path (if not specified, outputs to stdout)
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output_path: Option<PathBuf>,
    },
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

impl Command {
    pub fn project_path(&self) -> &Path {
        match self {
            Command::Build { project_path, .. } | Command::Scan { project_path, .. } => {
                project_path.as_path()
            }
        }
    }
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    let project_path = args.command.project_path();
    if !project_path.exists() {
        anyhow::bail!("Project path does not exist: {}", project_path.display());
    }
    if !project_path.is_dir() {
        anyhow::bail!("Project path is not a directory: {}", project_path.display());
    }

    info!("Project path: {}", project_path.display());
    Ok(args)
}

/// Run the selected command
pub fn run(args: CliArgs) -> Result<()> {
    match args.command {
        Command::Build {
            project_path,
            style,
            output,
        } => {
            let registry = StyleRegistry::with_builtin();
            let options = BuildOptions { style, output };
            let package = composer::build(&project_path, &options, &registry)
                .with_context(|| format!("Failed to build {}", project_path.display()))?;
            info!("Package written to {}", package.display());
        }
        Command::Scan {
            project_path,
            output_format,
            output_path,
        } => {
            let result = composer::scan_project(&project_path)
                .with_context(|| format!("Failed to scan {}", project_path.display()))?;

            info!("Serializing to {:?} format...", output_format);
            let content = match output_format {
                OutputFormat::Yaml => serialize_yaml(&result)?,
                OutputFormat::Json => serialize_json(&result)?,
            };

            if let Some(output_path) = &output_path {
                info!("Writing output to: {}", output_path.display());
                write_to_file(&content, output_path)?;
            } else {
                println!("{}", content);
            }

            let exports: usize = result.modules.iter().map(|m| m.exports.len()).sum();
            info!("Summary:");
            info!("  - Modules scanned: {}", result.modules.len());
            info!("  - Exports found: {}", exports);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_arguments() {
        let args = CliArgs::try_parse_from(["notepack", "-v", "build", "proj", "-s", "annotated"])
            .unwrap();
        assert!(args.verbose);
        match args.command {
            Command::Build {
                project_path,
                style,
                output,
            } => {
                assert_eq!(project_path, PathBuf::from("proj"));
                assert_eq!(style, Some(Style::Annotated));
                assert!(output.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_scan_defaults() {
        let args = CliArgs::try_parse_from(["notepack", "scan", "--verbose"]).unwrap();
        assert!(args.verbose);
        assert_eq!(args.command.project_path(), Path::new("."));
        assert!(matches!(
            args.command,
            Command::Scan {
                output_format: OutputFormat::Json,
                output_path: None,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_style_rejected() {
        assert!(CliArgs::try_parse_from(["notepack", "build", "-s", "fancy"]).is_err());
    }

    #[test]
    fn test_missing_project_path_rejected() {
        let args = CliArgs::try_parse_from(["notepack", "scan", "/definitely/not/here"]).unwrap();
        assert!(parse_args_from_parsed(args).is_err());
    }
}
