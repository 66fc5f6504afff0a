//! The on-disk document format.
//!
//! A QOC document is a TOML file holding the format version, the elements in
//! diagram order and the relationships as index pairs into that list:
//!
//! ```toml
//! version = 1
//!
//! [[elements]]
//! kind = "criterion"          # criterion | option | question
//! description = "Cost"
//! position = { x = 10.0, y = 20.0 }
//!
//! [[elements]]
//! kind = "option"
//! description = "Stay"
//!
//! [[relationships]]
//! source = 1                  # index into `elements`
//! target = 0
//! favors = true
//! ```
//!
//! `position` is optional; elements without one are laid out on a grid when
//! the document is loaded. Loading replays every relationship through
//! [`Diagram::add_relationship`], so a hand-edited file cannot smuggle in a
//! relationship the editor would have refused.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use qoc_core::{Diagram, Element, ElementKind, RelationshipError, geometry::Point};

use crate::{canvas::Canvas, config::CanvasConfig};

/// Version written by this build and the only one it reads.
pub const FORMAT_VERSION: u32 = 1;

/// Errors reading or writing a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to parse document: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unsupported document version {found} (expected {FORMAT_VERSION})")]
    UnsupportedVersion { found: u32 },

    #[error("Relationship {relationship} refers to element {index}, but there are only {count}")]
    ElementIndex {
        relationship: usize,
        index: usize,
        count: usize,
    },

    #[error(transparent)]
    Diagram(#[from] RelationshipError),

    #[error("Relationship {relationship} is invalid: {source}")]
    Relationship {
        relationship: usize,
        source: RelationshipError,
    },
}

/// A serializable snapshot of a diagram and its canvas positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    version: u32,
    #[serde(default)]
    elements: Vec<ElementRecord>,
    #[serde(default)]
    relationships: Vec<RelationshipRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub kind: ElementKind,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    pub source: usize,
    pub target: usize,
    pub favors: bool,
}

impl Document {
    /// Captures `diagram`, with positions taken from `canvas`.
    pub fn capture(diagram: &Diagram, canvas: &Canvas) -> Self {
        let elements = diagram
            .elements()
            .map(|element| ElementRecord {
                kind: element.kind(),
                description: element.description().to_string(),
                position: canvas
                    .position(element.id())
                    .map(|point| PositionRecord {
                        x: point.x(),
                        y: point.y(),
                    }),
            })
            .collect();

        // Every ledger endpoint is a member, so the lookups cannot miss.
        let relationships = diagram
            .relationships()
            .iter()
            .filter_map(|relationship| {
                Some(RelationshipRecord {
                    source: diagram.index_of(relationship.source())?,
                    target: diagram.index_of(relationship.target())?,
                    favors: relationship.favors(),
                })
            })
            .collect();

        Self {
            version: FORMAT_VERSION,
            elements,
            relationships,
        }
    }

    /// Parses a document from TOML text.
    ///
    /// # Errors
    ///
    /// [`DocumentError::Parse`] for malformed TOML or missing fields, and
    /// [`DocumentError::UnsupportedVersion`] for any version other than
    /// [`FORMAT_VERSION`].
    pub fn from_toml(source: &str) -> Result<Self, DocumentError> {
        let document: Document = toml::from_str(source)?;
        if document.version != FORMAT_VERSION {
            return Err(DocumentError::UnsupportedVersion {
                found: document.version,
            });
        }
        debug!(
            elements = document.elements.len(),
            relationships = document.relationships.len();
            "Document parsed"
        );
        Ok(document)
    }

    pub fn to_toml(&self) -> Result<String, DocumentError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn elements(&self) -> &[ElementRecord] {
        &self.elements
    }

    pub fn relationships(&self) -> &[RelationshipRecord] {
        &self.relationships
    }

    /// Rebuilds a fresh diagram and canvas from this document.
    ///
    /// Elements get new identities; relationships are re-added through the
    /// diagram so all of its checks apply.
    ///
    /// # Errors
    ///
    /// [`DocumentError::ElementIndex`] for an index past the element list and
    /// [`DocumentError::Relationship`] for a relationship the diagram rejects.
    pub fn restore(&self, config: CanvasConfig) -> Result<(Diagram, Canvas), DocumentError> {
        let mut diagram = Diagram::new();
        let mut canvas = Canvas::new(config);
        let mut ids = Vec::with_capacity(self.elements.len());
        let mut unplaced = 0;

        for record in &self.elements {
            let element = Element::new(record.kind, record.description.clone());
            let top_left = match record.position {
                Some(position) => Point::new(position.x, position.y),
                None => {
                    unplaced += 1;
                    Canvas::grid_slot(unplaced - 1)
                }
            };
            canvas.place(&element, top_left);
            ids.push(diagram.add_element(element)?);
        }

        for (index, record) in self.relationships.iter().enumerate() {
            let lookup = |element: usize| {
                ids.get(element)
                    .copied()
                    .ok_or(DocumentError::ElementIndex {
                        relationship: index,
                        index: element,
                        count: ids.len(),
                    })
            };
            let source = lookup(record.source)?;
            let target = lookup(record.target)?;

            diagram
                .add_relationship(source, target, record.favors)
                .map_err(|source| DocumentError::Relationship {
                    relationship: index,
                    source,
                })?;
        }

        info!(
            elements = diagram.len(),
            relationships = diagram.relationships().len();
            "Document restored"
        );
        Ok((diagram, canvas))
    }
}
