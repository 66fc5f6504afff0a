//! The relational capability and the relationships it owns.
//!
//! A [`Relational`] record holds the allow-list of target kinds for its owner
//! and the owner's outgoing [`Relationship`]s in insertion order. It is the
//! single source of truth for "does X relate to Y"; the diagram keeps a
//! parallel ledger for iteration and must update both on every mutation.

use log::trace;

use crate::{
    element::{ElementId, ElementKind, ElementRef},
    error::RelationshipError,
};

/// A directed relationship between two elements.
///
/// `favors` is the polarity: `true` when the source argues for the target,
/// `false` when it argues against it.
///
/// Equality only looks at the endpoints. Two relationships between the same
/// ordered pair are equal whatever their polarity, which is what makes a
/// second edge with flipped polarity a duplicate.
#[derive(Debug, Clone, Copy, Eq)]
pub struct Relationship {
    source: ElementId,
    target: ElementId,
    favors: bool,
}

impl Relationship {
    pub fn new(source: ElementId, target: ElementId, favors: bool) -> Self {
        Self {
            source,
            target,
            favors,
        }
    }

    pub fn source(&self) -> ElementId {
        self.source
    }

    pub fn target(&self) -> ElementId {
        self.target
    }

    pub fn favors(&self) -> bool {
        self.favors
    }

    /// Returns true if `element` is either endpoint.
    pub fn involves(&self, element: ElementId) -> bool {
        self.source == element || self.target == element
    }
}

impl PartialEq for Relationship {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.target == other.target
    }
}

/// Capability of an element kind to originate relationships.
#[derive(Debug, Clone)]
pub struct Relational {
    owner: ElementRef,
    relationships: Vec<Relationship>,
}

impl Relational {
    pub(crate) fn new(owner: ElementRef) -> Self {
        Self {
            owner,
            relationships: Vec::new(),
        }
    }

    /// Returns true iff `kind` is in the owner kind's allow-list.
    pub fn can_relate_to(&self, kind: ElementKind) -> bool {
        self.owner.kind().relates_to().contains(&kind)
    }

    /// Appends a relationship from the owner to `target`.
    ///
    /// # Errors
    ///
    /// - [`RelationshipError::NotPossible`] if the target's kind is not in the
    ///   allow-list.
    /// - [`RelationshipError::AlreadyExists`] if the owner already relates to
    ///   the target, regardless of polarity.
    pub fn add_relationship(
        &mut self,
        target: ElementRef,
        favors: bool,
    ) -> Result<Relationship, RelationshipError> {
        if !self.can_relate_to(target.kind()) {
            return Err(RelationshipError::NotPossible {
                source_kind: self.owner.kind(),
                target_kind: target.kind(),
            });
        }

        if self.has_relationship(target).is_some() {
            return Err(RelationshipError::AlreadyExists {
                from: self.owner.id(),
                to: target.id(),
            });
        }

        let relationship = Relationship::new(self.owner.id(), target.id(), favors);
        self.relationships.push(relationship);
        trace!(source:% = self.owner.id(), target:% = target.id(), favors; "Relationship added");

        Ok(relationship)
    }

    /// Returns the position of the relationship to `target`, or `None`.
    pub fn has_relationship(&self, target: ElementRef) -> Option<usize> {
        self.relationships
            .iter()
            .position(|relationship| relationship.target == target.id())
    }

    /// Removes and returns the relationship to `target`; leaves the list
    /// untouched when there is none.
    pub fn remove_relationship(&mut self, target: ElementRef) -> Option<Relationship> {
        let index = self.has_relationship(target)?;
        Some(self.relationships.remove(index))
    }

    /// Returns the stored polarity of the relationship to `target`.
    ///
    /// # Errors
    ///
    /// [`RelationshipError::NotFound`] if there is no such relationship.
    pub fn favors(&self, target: ElementRef) -> Result<bool, RelationshipError> {
        self.has_relationship(target)
            .map(|index| self.relationships[index].favors)
            .ok_or(RelationshipError::NotFound {
                from: self.owner.id(),
                to: target.id(),
            })
    }

    /// Iterates outgoing relationships in insertion order.
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter()
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }
}
