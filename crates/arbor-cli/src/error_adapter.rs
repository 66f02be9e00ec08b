//! Error adapter for converting CLI errors to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Syntax errors in
//! the input file are shown with a labeled snippet of the offending TOML.

use std::{error::Error as StdError, fmt};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use arbor::{ArborError, EndpointField};

use crate::CliError;

/// Adapter for an input file that failed to deserialize.
pub struct InputAdapter<'a> {
    path: &'a str,
    src: &'a str,
    err: &'a toml::de::Error,
}

impl<'a> InputAdapter<'a> {
    pub fn new(path: &'a str, src: &'a str, err: &'a toml::de::Error) -> Self {
        Self { path, src, err }
    }
}

impl fmt::Debug for InputAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputAdapter")
            .field("path", &self.path)
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for InputAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid architecture file {}", self.path)
    }
}

impl StdError for InputAdapter<'_> {}

impl MietteDiagnostic for InputAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("arbor::input"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        None
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.err.span()?;
        let span = SourceSpan::new(span.start.into(), span.len());
        let message = Some(self.err.message().trim().to_string());
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            message, span,
        ))))
    }
}

/// Adapter for [`ArborError`] variants.
///
/// Each variant maps to its own diagnostic code and, where there is one
/// obvious fix, a help line.
pub struct ErrorAdapter<'a>(pub &'a ArborError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            ArborError::Io(_) => "arbor::io",
            ArborError::DuplicateResourceName { .. } => "arbor::duplicate_name",
            ArborError::ConnectionTargetNotFound { .. } => "arbor::connection",
            ArborError::IconNotFound { .. } => "arbor::icon",
            ArborError::Config(_) => "arbor::config",
            ArborError::Export(_) => "arbor::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            ArborError::DuplicateResourceName { .. } => {
                "resource names must be unique across the whole tree".to_string()
            }
            ArborError::ConnectionTargetNotFound { field, .. } => {
                let side = match field {
                    EndpointField::From => "source",
                    EndpointField::To => "target",
                };
                format!("check the spelling of the connection {side}")
            }
            ArborError::IconNotFound { .. } => {
                "add the icon to a configured icon directory or run without --strict".to_string()
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A malformed input file with source location.
    Input(InputAdapter<'a>),
    /// An error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Input(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl StdError for Reportable<'_> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Reportable::Input(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Input(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Input(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Input(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Input(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a [`CliError`] into a reportable error.
pub fn to_reportable(err: &CliError) -> Reportable<'_> {
    match err {
        CliError::Input { path, src, err } => Reportable::Input(InputAdapter::new(path, src, err)),
        CliError::Arbor(err) => Reportable::Error(ErrorAdapter(err)),
    }
}
