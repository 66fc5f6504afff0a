//! Diagram elements and their kinds.
//!
//! An [`Element`] is a description plus a fixed [`ElementKind`]. Kinds that may
//! originate relationships carry a [`Relational`] capability, created once
//! from the kind's allow-list and never replaced.

use std::{
    fmt,
    str::FromStr,
    sync::atomic::{AtomicU64, Ordering},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::RelationshipError,
    relational::{Relational, Relationship},
};

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an [`Element`].
///
/// Two elements with the same description are still distinct elements; only
/// the id decides identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    fn next() -> Self {
        Self(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The closed set of element kinds in a QOC diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Criterion,
    Option,
    Question,
}

impl ElementKind {
    pub const ALL: [ElementKind; 3] = [
        ElementKind::Criterion,
        ElementKind::Option,
        ElementKind::Question,
    ];

    /// Kinds an element of this kind may point a relationship at.
    ///
    /// Criteria never originate relationships, so their list is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use qoc_core::ElementKind;
    ///
    /// assert!(ElementKind::Option.relates_to().contains(&ElementKind::Criterion));
    /// assert!(!ElementKind::Option.relates_to().contains(&ElementKind::Option));
    /// assert!(ElementKind::Criterion.relates_to().is_empty());
    /// ```
    pub fn relates_to(self) -> &'static [ElementKind] {
        match self {
            ElementKind::Criterion => &[],
            ElementKind::Option => &[ElementKind::Question, ElementKind::Criterion],
            ElementKind::Question => &[ElementKind::Option, ElementKind::Criterion],
        }
    }

    /// Returns true if elements of this kind carry the relational capability.
    pub fn is_relational(self) -> bool {
        !self.relates_to().is_empty()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Criterion => "criterion",
            ElementKind::Option => "option",
            ElementKind::Question => "question",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "criterion" | "c" => Ok(ElementKind::Criterion),
            "option" | "o" => Ok(ElementKind::Option),
            "question" | "q" => Ok(ElementKind::Question),
            _ => Err(format!(
                "unknown element kind `{s}` (expected criterion, option or question)"
            )),
        }
    }
}

/// A lightweight, copyable reference to an element: its identity and kind.
///
/// Relationship checks only ever need these two facts about the target, so
/// the relational API accepts anything convertible into an `ElementRef`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef {
    id: ElementId,
    kind: ElementKind,
}

impl ElementRef {
    pub fn id(self) -> ElementId {
        self.id
    }

    pub fn kind(self) -> ElementKind {
        self.kind
    }
}

impl From<&Element> for ElementRef {
    fn from(element: &Element) -> Self {
        element.to_ref()
    }
}

/// A QOC diagram element.
///
/// # Examples
///
/// ```
/// use qoc_core::{Element, ElementKind};
///
/// let stay = Element::new(ElementKind::Option, "Stay");
/// let cost = Element::new(ElementKind::Criterion, "Cost");
///
/// let mut stay = stay;
/// stay.add_relationship(&cost, true).unwrap();
/// assert_eq!(stay.favors(&cost), Ok(true));
/// ```
#[derive(Debug, Clone)]
pub struct Element {
    id: ElementId,
    kind: ElementKind,
    description: String,
    relational: Option<Relational>,
}

impl Element {
    /// Creates a standalone element with a fresh identity.
    pub fn new(kind: ElementKind, description: impl Into<String>) -> Self {
        let id = ElementId::next();
        let relational = kind
            .is_relational()
            .then(|| Relational::new(ElementRef { id, kind }));
        Self {
            id,
            kind,
            description: description.into(),
            relational,
        }
    }

    pub fn criterion(description: impl Into<String>) -> Self {
        Self::new(ElementKind::Criterion, description)
    }

    pub fn option(description: impl Into<String>) -> Self {
        Self::new(ElementKind::Option, description)
    }

    pub fn question(description: impl Into<String>) -> Self {
        Self::new(ElementKind::Question, description)
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn to_ref(&self) -> ElementRef {
        ElementRef {
            id: self.id,
            kind: self.kind,
        }
    }

    /// Returns the relational capability, if this kind has one.
    pub fn relational(&self) -> Option<&Relational> {
        self.relational.as_ref()
    }

    /// Returns true if this element may point a relationship at `kind`.
    pub fn can_relate_to(&self, kind: ElementKind) -> bool {
        self.relational
            .as_ref()
            .is_some_and(|relational| relational.can_relate_to(kind))
    }

    /// Adds a relationship from this element to `target`.
    ///
    /// Non-relational elements reject every target with
    /// [`RelationshipError::NotPossible`], since their allow-list is empty.
    pub fn add_relationship(
        &mut self,
        target: impl Into<ElementRef>,
        favors: bool,
    ) -> Result<Relationship, RelationshipError> {
        let target = target.into();
        match self.relational.as_mut() {
            Some(relational) => relational.add_relationship(target, favors),
            None => Err(RelationshipError::NotPossible {
                source_kind: self.kind,
                target_kind: target.kind(),
            }),
        }
    }

    /// Returns the position of the relationship to `target` in this element's
    /// outgoing list.
    pub fn has_relationship(&self, target: impl Into<ElementRef>) -> Option<usize> {
        let target = target.into();
        self.relational
            .as_ref()
            .and_then(|relational| relational.has_relationship(target))
    }

    /// Removes and returns the relationship to `target`, if there is one.
    pub fn remove_relationship(&mut self, target: impl Into<ElementRef>) -> Option<Relationship> {
        let target = target.into();
        self.relational
            .as_mut()
            .and_then(|relational| relational.remove_relationship(target))
    }

    /// Returns whether this element favors `target`.
    pub fn favors(&self, target: impl Into<ElementRef>) -> Result<bool, RelationshipError> {
        let target = target.into();
        match self.relational.as_ref() {
            Some(relational) => relational.favors(target),
            None => Err(RelationshipError::NotFound {
                from: self.id,
                to: target.id(),
            }),
        }
    }

    /// Iterates this element's outgoing relationships in insertion order.
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relational
            .iter()
            .flat_map(|relational| relational.relationships())
    }
}
