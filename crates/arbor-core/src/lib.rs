//! Arbor Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Arbor layout
//! core, its rendering backends and its input collaborators:
//!
//! - **Resources**: The input resource tree and connections ([`resource`] module)
//! - **Diagram**: The architecture document, themes and engines ([`diagram`] module)
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Colors**: CSS color parsing ([`color::Color`])

pub mod color;
pub mod diagram;
pub mod geometry;
pub mod resource;
