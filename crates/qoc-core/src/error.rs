//! Errors raised by the relationship model.

use thiserror::Error;

use crate::element::{ElementId, ElementKind};

/// A rejected relationship or diagram operation.
///
/// Every variant describes caller misuse or a legitimate domain rejection;
/// the operation that produced it left all collections unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelationshipError {
    #[error("a {source_kind} cannot relate to a {target_kind}")]
    NotPossible {
        source_kind: ElementKind,
        target_kind: ElementKind,
    },

    #[error("relationship from {from} to {to} already exists")]
    AlreadyExists { from: ElementId, to: ElementId },

    #[error("no relationship from {from} to {to}")]
    NotFound { from: ElementId, to: ElementId },

    #[error("{element} is a {kind}, which cannot originate relationships")]
    NotRelational { element: ElementId, kind: ElementKind },

    #[error("element {0} is not part of the diagram")]
    UnknownElement(ElementId),

    #[error("element {0} is already part of the diagram")]
    DuplicateElement(ElementId),

    #[error("element {element} already has {count} relationship(s) of its own")]
    AlreadyLinked { element: ElementId, count: usize },
}
