//! Arbor CLI library
//!
//! This module contains the core CLI logic for the Arbor diagram tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, OutputFormat};

use std::{fs, path::Path};

use log::{info, warn};
use thiserror::Error;

use arbor::{ArborError, DiagramBuilder, diagram::Architecture, diff, export};

/// Errors reported by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// The input file is not a valid architecture document.
    #[error("Invalid architecture file {path}: {err}")]
    Input {
        path: String,
        src: String,
        err: toml::de::Error,
    },

    #[error(transparent)]
    Arbor(#[from] ArborError),
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Arbor(ArborError::Io(err))
    }
}

/// Run the Arbor CLI application
///
/// This function reads the architecture file, reports lint warnings and,
/// when a previous version is given, the structural changes against it. It
/// then composes the diagram and writes the rendered output file.
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed input files
/// - Composition errors (duplicate names, dangling connections, missing icons)
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), CliError> {
    let output = args.output_path();
    info!(
        input_path = args.input,
        output_path = output,
        format:% = args.format;
        "Processing diagram"
    );

    // Load configuration
    let mut app_config = config::load_config(args.config.as_ref())?;
    if args.strict {
        app_config = app_config.with_strict_icons(true);
    }

    let architecture = read_architecture(&args.input)?;

    if let Some(old_path) = &args.diff {
        let old = read_architecture(old_path)?;
        let changes = diff::diff(&old, &architecture);
        if changes.is_empty() {
            info!(old_path; "No structural changes");
        }
        for line in changes.to_string().lines() {
            info!(old_path; "{line}");
        }
    }

    let builder = DiagramBuilder::from_config(app_config)?;

    for warning in builder.lint(&architecture)? {
        warn!(rule:% = warning.rule, resource = warning.resource_name; "{}", warning.message);
    }

    let rendered = match args.format {
        OutputFormat::Svg => builder.render_svg(&architecture)?,
        OutputFormat::Mermaid => builder.render_mermaid(&architecture)?,
        OutputFormat::Plantuml => builder.render_plantuml(&architecture)?,
    };

    export::write_document(Path::new(output), &rendered).map_err(ArborError::from)?;

    info!(output_file = output; "Diagram exported successfully");

    Ok(())
}

/// Reads and deserializes one architecture file.
fn read_architecture(path: &str) -> Result<Architecture, CliError> {
    let src = fs::read_to_string(path)?;
    toml::from_str(&src).map_err(|err| CliError::Input {
        path: path.to_string(),
        src: src.clone(),
        err,
    })
}
