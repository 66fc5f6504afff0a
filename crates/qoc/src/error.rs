//! Error types for QOC operations.
//!
//! [`QocError`] is the error returned by the [`Workspace`](crate::Workspace)
//! facade. It wraps the model's [`RelationshipError`] together with the
//! failures of loading, saving, replaying and exporting.

use std::io;

use thiserror::Error;

use qoc_core::RelationshipError;

use crate::document::DocumentError;

/// The main error type for QOC operations.
#[derive(Debug, Error)]
pub enum QocError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Relationship error: {0}")]
    Relationship(#[from] RelationshipError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(#[from] crate::export::Error),

    /// A line of an event script that does not parse.
    #[error("Script line {line}: {message}")]
    Script { line: usize, message: String },

    /// An element index past the end of the diagram.
    #[error("No element at index {index} (the diagram has {count})")]
    ElementIndex { index: usize, count: usize },
}
