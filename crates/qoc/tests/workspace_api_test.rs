//! Integration tests for the Workspace API
//!
//! These tests drive diagrams through the public API: editing, saving,
//! reopening and rendering.

use tempfile::tempdir;

use qoc::{
    Element, ElementKind, QocError, RelationshipError, Workspace, element_id_at,
    geometry::Point, session::Session,
};

fn id(session: &Session, index: usize) -> qoc::ElementId {
    element_id_at(session.diagram(), index).expect("index in range")
}

#[test]
fn test_save_and_open_round_trip() {
    let workspace = Workspace::default();
    let mut session = workspace.new_session();

    let c1 = session
        .insert(Element::criterion("C1"), Point::new(10.0, 10.0))
        .unwrap();
    let o1 = session
        .insert(Element::option("O1"), Point::new(200.0, 10.0))
        .unwrap();
    session
        .insert(Element::question("Q1"), Point::new(10.0, 200.0))
        .unwrap();
    session.connect(o1, c1, true).unwrap();

    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("decision.toml");
    workspace.save(&session, &path).expect("Failed to save");

    let reopened = workspace.open(&path).expect("Failed to open");
    let diagram = reopened.diagram();

    let elements: Vec<_> = diagram
        .elements()
        .map(|element| (element.kind(), element.description()))
        .collect();
    assert_eq!(
        elements,
        vec![
            (ElementKind::Criterion, "C1"),
            (ElementKind::Option, "O1"),
            (ElementKind::Question, "Q1"),
        ]
    );

    let (c1, o1) = (id(&reopened, 0), id(&reopened, 1));
    assert_eq!(diagram.relationships().len(), 1);
    let relationship = diagram.relationships()[0];
    assert_eq!((relationship.source(), relationship.target()), (o1, c1));
    assert!(relationship.favors());
    assert_eq!(reopened.canvas().position(o1), Some(Point::new(200.0, 10.0)));
}

#[test]
fn test_migration_decision() {
    let workspace = Workspace::default();
    let mut session = workspace.new_session();

    session
        .insert(Element::question("Should we migrate?"), Point::new(10.0, 10.0))
        .unwrap();
    let stay = session
        .insert(Element::option("Stay"), Point::new(10.0, 100.0))
        .unwrap();
    let migrate = session
        .insert(Element::option("Migrate"), Point::new(200.0, 100.0))
        .unwrap();
    let cost = session
        .insert(Element::criterion("Cost"), Point::new(100.0, 200.0))
        .unwrap();

    session.connect(migrate, cost, false).unwrap();
    session.connect(stay, cost, true).unwrap();
    assert_eq!(session.diagram().relationships().len(), 2);

    session.remove(cost).expect("Cost is in the diagram");

    assert!(session.diagram().relationships().is_empty());
    let remaining: Vec<_> = session
        .diagram()
        .elements()
        .map(|element| element.description())
        .collect();
    assert_eq!(remaining, vec!["Should we migrate?", "Stay", "Migrate"]);
    assert_eq!(
        session.diagram().element(stay).unwrap().relational().unwrap().len(),
        0
    );
}

#[test]
fn test_open_missing_file() {
    let dir = tempdir().expect("Failed to create temp directory");
    let result = Workspace::default().open(dir.path().join("missing.toml"));
    assert!(matches!(result, Err(QocError::Io(_))));
}

#[test]
fn test_load_rejects_invalid_relationship() {
    let source = r#"
        version = 1

        [[elements]]
        kind = "option"
        description = "Stay"

        [[elements]]
        kind = "option"
        description = "Migrate"

        [[relationships]]
        source = 0
        target = 1
        favors = true
    "#;

    let err = Workspace::default().load(source).unwrap_err();
    match err {
        QocError::Document(err) => assert!(
            err.to_string().contains("Relationship 0"),
            "unexpected message: {err}"
        ),
        other => panic!("Expected a document error, got {other:?}"),
    }
}

#[test]
fn test_render_svg() {
    let workspace = Workspace::default();
    let session = workspace
        .load(
            r#"
            version = 1

            [[elements]]
            kind = "criterion"
            description = "Cost"

            [[elements]]
            kind = "option"
            description = "Stay"

            [[relationships]]
            source = 1
            target = 0
            favors = true
            "#,
        )
        .expect("Failed to load");

    let svg = workspace.render_svg(&session).expect("Failed to render");
    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    assert_eq!(svg.matches("<rect").count(), 3);
    assert_eq!(svg.matches("<line").count(), 1);
}

#[test]
fn test_rejected_connection_leaves_diagram_unchanged() {
    let workspace = Workspace::default();
    let mut session = workspace.new_session();

    let stay = session
        .insert(Element::option("Stay"), Point::new(10.0, 10.0))
        .unwrap();
    let migrate = session
        .insert(Element::option("Migrate"), Point::new(200.0, 10.0))
        .unwrap();

    assert!(matches!(
        session.connect(stay, migrate, true),
        Err(RelationshipError::NotPossible { .. })
    ));
    assert!(session.diagram().relationships().is_empty());
}
