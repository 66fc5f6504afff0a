//! Error adapter for converting QocError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Each error gets a
//! stable code and, where the fix is predictable, a help line.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;

use qoc::{QocError, RelationshipError, document::DocumentError};

/// Adapter for [`QocError`].
pub struct ErrorAdapter<'a>(pub &'a QocError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            QocError::Io(_) => "qoc::io",
            QocError::Relationship(_) => "qoc::relationship",
            QocError::Document(_) => "qoc::document",
            QocError::Config(_) => "qoc::config",
            QocError::Export(_) => "qoc::export",
            QocError::Script { .. } => "qoc::script",
            QocError::ElementIndex { .. } => "qoc::index",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            QocError::Relationship(err) => relationship_help(err)?,
            QocError::Document(DocumentError::UnsupportedVersion { .. }) => {
                "this build reads version 1 documents only"
            }
            QocError::Document(DocumentError::ElementIndex { .. })
            | QocError::ElementIndex { .. } => "run `qoc show` to list element indexes",
            QocError::Script { .. } => concat!(
                "events are: insert <kind> <description>, connect, ",
                "click <x> <y> [favors|opposes], delete, move <direction>, cancel, new"
            ),
            _ => return None,
        };
        Some(Box::new(help))
    }
}

fn relationship_help(err: &RelationshipError) -> Option<&'static str> {
    match err {
        RelationshipError::NotPossible { .. } => Some(
            "options relate to questions and criteria; questions relate to options and criteria",
        ),
        RelationshipError::NotRelational { .. } => {
            Some("criteria cannot originate relationships; pick an option or question first")
        }
        RelationshipError::AlreadyExists { .. } => {
            Some("remove the existing relationship's element to change its polarity")
        }
        RelationshipError::AlreadyLinked { .. } => {
            Some("add the element first, then connect it through the diagram")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use qoc::{Element, ElementKind};

    use super::*;

    fn code(err: &QocError) -> Option<String> {
        ErrorAdapter(err).code().map(|code| code.to_string())
    }

    #[test]
    fn test_codes() {
        let io = QocError::Io(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(code(&io).as_deref(), Some("qoc::io"));

        let index = QocError::ElementIndex { index: 4, count: 2 };
        assert_eq!(code(&index).as_deref(), Some("qoc::index"));
        assert!(ErrorAdapter(&index).help().is_some());
    }

    #[test]
    fn test_relationship_help() {
        let element = Element::criterion("Cost");
        let err = QocError::Relationship(RelationshipError::NotRelational {
            element: element.id(),
            kind: ElementKind::Criterion,
        });

        let adapter = ErrorAdapter(&err);
        assert_eq!(
            adapter.code().map(|code| code.to_string()).as_deref(),
            Some("qoc::relationship")
        );
        let help = adapter.help().unwrap().to_string();
        assert!(help.contains("criteria"));
        assert_eq!(adapter.to_string(), err.to_string());
    }

    #[test]
    fn test_already_linked_help() {
        let element = Element::option("Stay");
        let err = QocError::Relationship(RelationshipError::AlreadyLinked {
            element: element.id(),
            count: 2,
        });

        let help = ErrorAdapter(&err).help().unwrap().to_string();
        assert!(help.contains("connect"));
        assert!(ErrorAdapter(&err).labels().is_none());
    }

    #[test]
    fn test_config_has_no_help() {
        let err = QocError::Config("bad".to_string());
        assert!(ErrorAdapter(&err).help().is_none());
    }
}
