//! Export of edited diagrams.
//!
//! An [`Exporter`] turns a [`Diagram`] together with the [`Canvas`] that
//! positions its elements into an output format.
//!
//! # Available Backends
//!
//! - [`svg`]: SVG output via [`svg::Svg`]

pub mod svg;

use thiserror::Error;

use qoc_core::Diagram;

use crate::canvas::Canvas;

/// Abstraction for diagram export backends.
pub trait Exporter {
    /// Renders the diagram to the backend's textual output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the diagram cannot be converted.
    fn render(&self, diagram: &Diagram, canvas: &Canvas) -> Result<String, Error>;
}

/// Errors that can occur during diagram export.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Render error: {0}")]
    Render(String),
}
