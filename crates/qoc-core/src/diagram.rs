//! The diagram: owner of elements and the relationship ledger.
//!
//! [`Diagram`] is a CRUD mediator over two ordered collections. Relationship
//! existence is sourced from the owning element's [`Relational`] capability;
//! the diagram's ledger is a derived index kept in lockstep with it, so every
//! mutation path below updates both sides or neither.
//!
//! [`Relational`]: crate::relational::Relational

use indexmap::IndexMap;
use log::{debug, trace};

use crate::{
    element::{Element, ElementId},
    error::RelationshipError,
    geometry::{Bounds, Point},
    relational::Relationship,
};

/// Supplies the on-screen rectangle of each element.
///
/// Geometry belongs to the presentation layer; the diagram only consults it
/// for hit testing.
pub trait GeometryProvider {
    /// Returns the bounds of `element`, or `None` if it has not been placed.
    fn bounds(&self, element: ElementId) -> Option<Bounds>;
}

/// A QOC diagram.
///
/// # Examples
///
/// ```
/// use qoc_core::{Diagram, Element};
///
/// let mut diagram = Diagram::new();
/// let stay = diagram.add_element(Element::option("Stay")).unwrap();
/// let cost = diagram.add_element(Element::criterion("Cost")).unwrap();
///
/// diagram.add_relationship(stay, cost, true).unwrap();
/// assert_eq!(diagram.relationships().len(), 1);
///
/// diagram.remove_element(cost);
/// assert!(diagram.relationships().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    elements: IndexMap<ElementId, Element>,
    relationships: Vec<Relationship>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits `element` to the diagram, after all previously added elements.
    ///
    /// # Errors
    ///
    /// - [`RelationshipError::DuplicateElement`] if an element with the same
    ///   identity (e.g. a clone) is already a member.
    /// - [`RelationshipError::AlreadyLinked`] if the element already carries
    ///   relationships; those must be added through the diagram.
    pub fn add_element(&mut self, element: Element) -> Result<ElementId, RelationshipError> {
        let id = element.id();
        if self.elements.contains_key(&id) {
            return Err(RelationshipError::DuplicateElement(id));
        }
        let linked = element.relationships().count();
        if linked > 0 {
            return Err(RelationshipError::AlreadyLinked {
                element: id,
                count: linked,
            });
        }

        debug!(element:% = id, kind:% = element.kind(); "Element added");
        self.elements.insert(id, element);
        Ok(id)
    }

    /// Adds a directed relationship from `source` to `target`.
    ///
    /// # Errors
    ///
    /// - [`RelationshipError::UnknownElement`] if either endpoint is not a member.
    /// - [`RelationshipError::NotRelational`] if `source` cannot originate
    ///   relationships.
    /// - [`RelationshipError::NotPossible`] / [`RelationshipError::AlreadyExists`]
    ///   as reported by the source element.
    pub fn add_relationship(
        &mut self,
        source: ElementId,
        target: ElementId,
        favors: bool,
    ) -> Result<Relationship, RelationshipError> {
        let target = self
            .elements
            .get(&target)
            .map(Element::to_ref)
            .ok_or(RelationshipError::UnknownElement(target))?;
        let source_element = self
            .elements
            .get_mut(&source)
            .ok_or(RelationshipError::UnknownElement(source))?;

        if source_element.relational().is_none() {
            return Err(RelationshipError::NotRelational {
                element: source,
                kind: source_element.kind(),
            });
        }

        let relationship = source_element.add_relationship(target, favors)?;
        self.relationships.push(relationship);
        debug!(source:% = source, target:% = target.id(), favors; "Relationship added to diagram");

        Ok(relationship)
    }

    /// Removes `element` and every relationship it takes part in.
    ///
    /// Returns the removed element, or `None` if it was not a member.
    pub fn remove_element(&mut self, element: ElementId) -> Option<Element> {
        let removed = self.elements.get(&element).map(Element::to_ref)?;

        for index in 0..self.elements.len() {
            let Some((&other_id, other)) = self.elements.get_index_mut(index) else {
                continue;
            };
            if other_id == element {
                continue;
            }

            let other_ref = other.to_ref();
            let incoming = other.remove_relationship(removed);
            let outgoing = self
                .elements
                .get_mut(&element)
                .and_then(|el| el.remove_relationship(other_ref));

            for relationship in incoming.into_iter().chain(outgoing) {
                self.unlink(relationship);
            }
        }

        debug!(element:% = element; "Element removed");
        self.elements.shift_remove(&element)
    }

    /// Removes every element, cascading through [`Diagram::remove_element`].
    pub fn clear(&mut self) {
        while let Some(id) = self.elements.first().map(|(id, _)| *id) {
            self.remove_element(id);
        }
    }

    /// Returns the first element, in insertion order, whose bounds contain
    /// `point`.
    pub fn select_element_at(
        &self,
        point: Point,
        geometry: &impl GeometryProvider,
    ) -> Option<ElementId> {
        self.elements.keys().copied().find(|&id| {
            geometry
                .bounds(id)
                .is_some_and(|bounds| bounds.contains_point(point))
        })
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Iterates elements in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Returns the insertion position of `id`.
    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.get_index_of(&id)
    }

    /// Returns the element at insertion position `index`.
    pub fn element_at(&self, index: usize) -> Option<&Element> {
        self.elements.get_index(index).map(|(_, element)| element)
    }

    /// The relationship ledger, in the order relationships were added.
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Iterates relationships in which `id` is the source or the target.
    pub fn relationships_of(&self, id: ElementId) -> impl Iterator<Item = &Relationship> {
        self.relationships
            .iter()
            .filter(move |relationship| relationship.involves(id))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn unlink(&mut self, relationship: Relationship) {
        if let Some(position) = self.relationships.iter().position(|r| *r == relationship) {
            self.relationships.remove(position);
            trace!(
                source:% = relationship.source(),
                target:% = relationship.target();
                "Relationship removed from ledger"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;
    use crate::{element::ElementKind, geometry::Size};

    struct FixedGeometry(HashMap<ElementId, Bounds>);

    impl GeometryProvider for FixedGeometry {
        fn bounds(&self, element: ElementId) -> Option<Bounds> {
            self.0.get(&element).copied()
        }
    }

    fn boxed(x: f32, y: f32, w: f32, h: f32) -> Bounds {
        Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h))
    }

    #[test]
    fn test_add_element_keeps_insertion_order() {
        let mut diagram = Diagram::new();
        let c = diagram.add_element(Element::criterion("C1")).unwrap();
        let o = diagram.add_element(Element::option("O1")).unwrap();
        let q = diagram.add_element(Element::question("Q1")).unwrap();

        let ids: Vec<_> = diagram.elements().map(Element::id).collect();
        assert_eq!(ids, vec![c, o, q]);
        assert_eq!(diagram.index_of(o), Some(1));
        assert_eq!(diagram.element_at(2).map(Element::id), Some(q));
    }

    #[test]
    fn test_add_element_rejects_same_identity() {
        let mut diagram = Diagram::new();
        let option = Element::option("O");
        let copy = option.clone();

        diagram.add_element(option).unwrap();
        let err = diagram.add_element(copy).unwrap_err();
        assert!(matches!(err, RelationshipError::DuplicateElement(_)));
        assert_eq!(diagram.len(), 1);
    }

    fn assert_ledger_matches_elements(diagram: &Diagram) {
        let per_element: Vec<_> = diagram.elements().flat_map(Element::relationships).collect();
        assert_eq!(per_element.len(), diagram.relationships().len());
        for relationship in per_element {
            assert!(diagram.relationships().contains(relationship));
            assert!(diagram.element(relationship.target()).is_some());
        }
    }

    #[test]
    fn test_add_element_rejects_element_with_own_relationships() {
        let mut diagram = Diagram::new();
        let cost = Element::criterion("C");
        let mut option = Element::option("O");
        option.add_relationship(&cost, true).unwrap();
        let option_id = option.id();

        let err = diagram.add_element(option).unwrap_err();
        assert_eq!(
            err,
            RelationshipError::AlreadyLinked {
                element: option_id,
                count: 1,
            }
        );
        assert!(diagram.is_empty());

        let c = diagram.add_element(cost).unwrap();
        let o = diagram.add_element(Element::option("O")).unwrap();
        diagram.add_relationship(o, c, true).unwrap();
        assert_eq!(diagram.relationships().len(), 1);
        assert_ledger_matches_elements(&diagram);
    }

    #[test]
    fn test_add_relationship_updates_both_sides() {
        let mut diagram = Diagram::new();
        let o = diagram.add_element(Element::option("O1")).unwrap();
        let c = diagram.add_element(Element::criterion("C1")).unwrap();

        let relationship = diagram.add_relationship(o, c, false).unwrap();

        assert_eq!(diagram.relationships(), &[relationship]);
        let option = diagram.element(o).unwrap();
        assert_eq!(option.has_relationship(diagram.element(c).unwrap()), Some(0));
        assert_eq!(option.favors(diagram.element(c).unwrap()), Ok(false));
    }

    #[test]
    fn test_add_relationship_from_criterion_is_not_relational() {
        let mut diagram = Diagram::new();
        let c = diagram.add_element(Element::criterion("C1")).unwrap();
        let o = diagram.add_element(Element::option("O1")).unwrap();

        let err = diagram.add_relationship(c, o, true).unwrap_err();
        assert_eq!(
            err,
            RelationshipError::NotRelational {
                element: c,
                kind: ElementKind::Criterion,
            }
        );
        assert!(diagram.relationships().is_empty());
    }

    #[test]
    fn test_add_relationship_propagates_element_errors() {
        let mut diagram = Diagram::new();
        let o1 = diagram.add_element(Element::option("O1")).unwrap();
        let o2 = diagram.add_element(Element::option("O2")).unwrap();
        let c = diagram.add_element(Element::criterion("C")).unwrap();

        assert!(matches!(
            diagram.add_relationship(o1, o2, true),
            Err(RelationshipError::NotPossible { .. })
        ));

        diagram.add_relationship(o1, c, true).unwrap();
        assert!(matches!(
            diagram.add_relationship(o1, c, false),
            Err(RelationshipError::AlreadyExists { .. })
        ));
        assert_eq!(diagram.relationships().len(), 1);
    }

    #[test]
    fn test_add_relationship_requires_membership() {
        let mut diagram = Diagram::new();
        let o = diagram.add_element(Element::option("O")).unwrap();
        let outsider = Element::criterion("outside");
        let outsider_id = outsider.id();

        assert_eq!(
            diagram.add_relationship(o, outsider_id, true),
            Err(RelationshipError::UnknownElement(outsider_id))
        );
        assert_eq!(
            diagram.add_relationship(outsider_id, o, true),
            Err(RelationshipError::UnknownElement(outsider_id))
        );
        assert_eq!(diagram.element(o).unwrap().relationships().count(), 0);
    }

    #[test]
    fn test_both_directions_are_distinct_edges() {
        let mut diagram = Diagram::new();
        let o = diagram.add_element(Element::option("O")).unwrap();
        let q = diagram.add_element(Element::question("Q")).unwrap();

        diagram.add_relationship(o, q, true).unwrap();
        diagram.add_relationship(q, o, false).unwrap();
        assert_eq!(diagram.relationships().len(), 2);
    }

    #[test]
    fn test_remove_element_cascades_incoming_and_outgoing() {
        let mut diagram = Diagram::new();
        let q = diagram.add_element(Element::question("Q")).unwrap();
        let o1 = diagram.add_element(Element::option("O1")).unwrap();
        let o2 = diagram.add_element(Element::option("O2")).unwrap();
        let c = diagram.add_element(Element::criterion("C")).unwrap();

        diagram.add_relationship(q, o1, true).unwrap(); // incoming to o1
        diagram.add_relationship(o1, q, true).unwrap(); // outgoing from o1
        diagram.add_relationship(o1, c, false).unwrap(); // outgoing from o1
        diagram.add_relationship(o2, c, true).unwrap(); // unrelated
        diagram.add_relationship(q, o2, false).unwrap(); // unrelated

        let removed = diagram.remove_element(o1).unwrap();
        assert_eq!(removed.description(), "O1");

        assert_eq!(diagram.len(), 3);
        assert_eq!(diagram.relationships().len(), 2);
        assert!(diagram.relationships_of(o1).next().is_none());
        assert_eq!(diagram.element(q).unwrap().relationships().count(), 1);
        let o2 = diagram.element(o2).unwrap();
        assert!(diagram.element(q).unwrap().has_relationship(o2).is_some());
        assert_ledger_matches_elements(&diagram);
    }

    #[test]
    fn test_remove_unknown_element_is_noop() {
        let mut diagram = Diagram::new();
        let o = diagram.add_element(Element::option("O")).unwrap();
        let c = diagram.add_element(Element::criterion("C")).unwrap();
        diagram.add_relationship(o, c, true).unwrap();

        assert!(diagram.remove_element(Element::option("stranger").id()).is_none());
        assert_eq!(diagram.len(), 2);
        assert_eq!(diagram.relationships().len(), 1);
    }

    #[test]
    fn test_migration_scenario() {
        let mut diagram = Diagram::new();
        let question = diagram
            .add_element(Element::question("Should we migrate?"))
            .unwrap();
        let stay = diagram.add_element(Element::option("Stay")).unwrap();
        let migrate = diagram.add_element(Element::option("Migrate")).unwrap();
        let cost = diagram.add_element(Element::criterion("Cost")).unwrap();

        diagram.add_relationship(migrate, cost, false).unwrap();
        diagram.add_relationship(stay, cost, true).unwrap();

        diagram.remove_element(cost);

        assert!(diagram.relationships().is_empty());
        let remaining: Vec<_> = diagram.elements().map(Element::id).collect();
        assert_eq!(remaining, vec![question, stay, migrate]);
        assert_eq!(diagram.element(stay).unwrap().relationships().count(), 0);
        assert_eq!(diagram.element(migrate).unwrap().relationships().count(), 0);
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut diagram = Diagram::new();
        let o = diagram.add_element(Element::option("O")).unwrap();
        let c = diagram.add_element(Element::criterion("C")).unwrap();
        diagram.add_relationship(o, c, true).unwrap();

        diagram.clear();
        assert!(diagram.is_empty());
        assert!(diagram.relationships().is_empty());
    }

    #[test]
    fn test_select_element_at_first_match_wins() {
        let mut diagram = Diagram::new();
        let a = diagram.add_element(Element::option("A")).unwrap();
        let b = diagram.add_element(Element::criterion("B")).unwrap();
        let unplaced = diagram.add_element(Element::question("C")).unwrap();

        let geometry = FixedGeometry(HashMap::from([
            (a, boxed(0.0, 0.0, 50.0, 50.0)),
            (b, boxed(25.0, 25.0, 50.0, 50.0)),
        ]));

        assert_eq!(diagram.select_element_at(Point::new(30.0, 30.0), &geometry), Some(a));
        assert_eq!(diagram.select_element_at(Point::new(60.0, 60.0), &geometry), Some(b));
        assert_eq!(diagram.select_element_at(Point::new(200.0, 200.0), &geometry), None);
        assert_eq!(diagram.select_element_at(Point::new(0.0, 10.0), &geometry), None);
        assert_ne!(diagram.select_element_at(Point::new(1.0, 1.0), &geometry), Some(unplaced));
    }

    fn kind_strategy() -> impl Strategy<Value = ElementKind> {
        prop_oneof![
            Just(ElementKind::Criterion),
            Just(ElementKind::Option),
            Just(ElementKind::Question),
        ]
    }

    proptest! {
        #[test]
        fn prop_remove_element_drops_exactly_its_relationships(
            kinds in prop::collection::vec(kind_strategy(), 2..10),
            edges in prop::collection::vec((0usize..10, 0usize..10, any::<bool>()), 0..40),
            victim in 0usize..10,
        ) {
            let mut diagram = Diagram::new();
            let ids: Vec<_> = kinds
                .iter()
                .enumerate()
                .map(|(i, kind)| diagram.add_element(Element::new(*kind, format!("e{i}"))).unwrap())
                .collect();

            for (s, t, favors) in edges {
                let _ = diagram.add_relationship(ids[s % ids.len()], ids[t % ids.len()], favors);
            }

            let victim = ids[victim % ids.len()];
            let before = diagram.relationships().len();
            let touching = diagram.relationships_of(victim).count();

            diagram.remove_element(victim);

            prop_assert_eq!(diagram.relationships().len(), before - touching);
            prop_assert!(diagram.relationships_of(victim).next().is_none());
            prop_assert_eq!(diagram.len(), ids.len() - 1);

            // The ledger and the per-element lists agree.
            let from_elements: usize = diagram.elements().map(|e| e.relationships().count()).sum();
            prop_assert_eq!(from_elements, diagram.relationships().len());
        }

        #[test]
        fn prop_ledger_only_holds_allowed_unique_edges(
            kinds in prop::collection::vec(kind_strategy(), 1..8),
            edges in prop::collection::vec((0usize..8, 0usize..8, any::<bool>()), 0..30),
        ) {
            let mut diagram = Diagram::new();
            let ids: Vec<_> = kinds
                .iter()
                .map(|kind| diagram.add_element(Element::new(*kind, "x")).unwrap())
                .collect();

            for (s, t, favors) in edges {
                let _ = diagram.add_relationship(ids[s % ids.len()], ids[t % ids.len()], favors);
            }

            let ledger = diagram.relationships();
            for (i, relationship) in ledger.iter().enumerate() {
                let source = diagram.element(relationship.source()).unwrap();
                let target = diagram.element(relationship.target()).unwrap();
                prop_assert!(source.can_relate_to(target.kind()));
                prop_assert!(!ledger[i + 1..].contains(relationship));
            }
        }
    }
}
