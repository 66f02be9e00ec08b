//! Command-line argument definitions for the Arbor CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the output format,
//! configuration file selection, strict icon mode, an optional previous
//! version to diff against and logging verbosity.

use std::fmt;

use clap::{Parser, ValueEnum};

/// Rendering backend selected on the command line.
#[derive(ValueEnum, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Svg,
    Mermaid,
    Plantuml,
}

impl OutputFormat {
    /// File name used when no output path is given.
    pub fn default_output(self) -> &'static str {
        match self {
            Self::Svg => "out.svg",
            Self::Mermaid => "out.mmd",
            Self::Plantuml => "out.puml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Svg => write!(f, "svg"),
            Self::Mermaid => write!(f, "mermaid"),
            Self::Plantuml => write!(f, "plantuml"),
        }
    }
}

/// Command-line arguments for the Arbor diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input architecture file (TOML)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output file; defaults to out.svg, out.mmd or out.puml
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Svg)]
    pub format: OutputFormat,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Fail when a leaf resource has no icon
    #[arg(long)]
    pub strict: bool,

    /// Previous version of the input file to report structural changes against
    #[arg(long, value_name = "OLD")]
    pub diff: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// The output path, falling back to the format's default file name.
    pub fn output_path(&self) -> &str {
        self.output
            .as_deref()
            .unwrap_or_else(|| self.format.default_output())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let args = Args::parse_from(["arbor", "infra.toml"]);
        assert_eq!(args.input, "infra.toml");
        assert_eq!(args.format, OutputFormat::Svg);
        assert_eq!(args.output_path(), "out.svg");
        assert!(!args.strict);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_parse_mermaid_with_options() {
        let args = Args::parse_from([
            "arbor",
            "infra.toml",
            "--format",
            "mermaid",
            "--strict",
            "-c",
            "arbor.toml",
        ]);
        assert_eq!(args.format, OutputFormat::Mermaid);
        assert_eq!(args.output_path(), "out.mmd");
        assert_eq!(args.config.as_deref(), Some("arbor.toml"));
        assert!(args.strict);
        assert!(args.diff.is_none());
    }

    #[test]
    fn test_parse_plantuml_with_diff() {
        let args = Args::parse_from([
            "arbor",
            "infra.toml",
            "-f",
            "plantuml",
            "--diff",
            "infra.old.toml",
        ]);
        assert_eq!(args.format, OutputFormat::Plantuml);
        assert_eq!(args.format.to_string(), "plantuml");
        assert_eq!(args.output_path(), "out.puml");
        assert_eq!(args.diff.as_deref(), Some("infra.old.toml"));
    }
}
