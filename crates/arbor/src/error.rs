//! Error types for Arbor operations.
//!
//! This module provides the main error type [`ArborError`]. Every failure
//! the composition core can raise is a distinct variant so that callers can
//! map them to exit codes or status codes without inspecting message text.

use std::{fmt, io};

use thiserror::Error;

/// Which endpoint of a connection failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointField {
    /// The `from` (source) side of the connection.
    From,
    /// The `to` (target) side of the connection.
    To,
}

impl fmt::Display for EndpointField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::From => write!(f, "from"),
            Self::To => write!(f, "to"),
        }
    }
}

/// The main error type for Arbor operations.
#[derive(Debug, Error)]
pub enum ArborError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Two resources anywhere in the tree share a name.
    #[error("Duplicate resource name: '{name}'")]
    DuplicateResourceName { name: String },

    /// A connection endpoint does not name any resource.
    #[error("Connection {field} '{name}' does not match any resource name")]
    ConnectionTargetNotFound { name: String, field: EndpointField },

    /// A leaf type has no icon and strict icon mode is enabled.
    #[error("No icon found for resource type: {resource_type}")]
    IconNotFound { resource_type: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for ArborError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}
