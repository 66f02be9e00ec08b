//! Rendering backends for composed diagrams.
//!
//! A backend turns a [`LayoutResult`] and its resolved [`StyleSheet`] into
//! the text of an output document. Writing that text anywhere is left to
//! the caller.

pub mod mermaid;
pub mod plantuml;
pub mod svg;

use std::{fmt, fs, io, path::Path};

use log::{error, info};

use crate::{pipeline::LayoutResult, style::StyleSheet};

pub trait Exporter {
    /// Renders the diagram into the backend's text format.
    fn export(&self, result: &LayoutResult, styles: &StyleSheet) -> Result<String, Error>;
}

/// Writes a rendered document to `path`.
pub fn write_document(path: &Path, content: &str) -> Result<(), Error> {
    info!(path:? = path, bytes = content.len(); "Writing output file");
    fs::write(path, content).map_err(|err| {
        error!(path:? = path, err:err; "Failed to write output file");
        Error::Io(err)
    })
}

#[derive(Debug)]
pub enum Error {
    Render(String),
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
