//! QOC - Editing, persistence and export for QOC design-rationale diagrams.
//!
//! A QOC diagram records a design decision as Questions, the Options that
//! answer them and the Criteria that weigh those options, connected by
//! directed favors/opposes relationships. The model lives in [`qoc_core`];
//! this crate adds the presentation side: a [`canvas::Canvas`] that places
//! and sizes element boxes, an interactive [`session::Session`], a TOML
//! [`document`] format and SVG export.

pub mod canvas;
pub mod config;
pub mod document;
pub mod export;
pub mod session;

mod error;

pub use qoc_core::{
    Diagram, Element, ElementId, ElementKind, Relationship, RelationshipError, color, geometry,
};

pub use error::QocError;

use std::{fs, path::Path};

use log::{debug, info, warn};

use config::AppConfig;
use document::Document;
use export::{Exporter, svg::Svg};
use session::{Event, Session};

/// Facade for opening, saving, replaying and rendering QOC diagrams.
///
/// # Examples
///
/// ```
/// use qoc::{ElementKind, Workspace, geometry::Point};
///
/// let workspace = Workspace::default();
/// let mut session = workspace.new_session();
/// session
///     .insert(qoc::Element::new(ElementKind::Option, "Stay"), Point::new(10.0, 10.0))
///     .unwrap();
///
/// let svg = workspace.render_svg(&session).unwrap();
/// assert!(svg.contains("Stay"));
/// ```
#[derive(Debug, Default)]
pub struct Workspace {
    config: AppConfig,
}

/// What a replayed event script did.
#[derive(Debug, Default)]
pub struct ReplayReport {
    /// Number of events fed to the session.
    pub events: usize,
    /// Events the diagram rejected, by script line number.
    pub rejected: Vec<(usize, RelationshipError)>,
}

impl Workspace {
    /// Create a new workspace with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`QocError::Config`] if the configuration fails validation.
    pub fn new(config: AppConfig) -> Result<Self, QocError> {
        config.validate().map_err(QocError::Config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Starts editing an empty diagram.
    pub fn new_session(&self) -> Session {
        Session::new(self.config.canvas().clone())
    }

    /// Parses a document and resumes editing it.
    ///
    /// # Errors
    ///
    /// Returns [`QocError::Document`] if the text is not a valid document.
    pub fn load(&self, source: &str) -> Result<Session, QocError> {
        let document = Document::from_toml(source)?;
        let (diagram, canvas) = document.restore(self.config.canvas().clone())?;
        Ok(Session::from_parts(diagram, canvas))
    }

    /// Reads the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`QocError::Io`] if the file cannot be read and
    /// [`QocError::Document`] if its content is not a valid document.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<Session, QocError> {
        let path = path.as_ref();
        info!(path:? = path; "Opening document");
        let source = fs::read_to_string(path)?;
        self.load(&source)
    }

    pub fn to_toml(&self, session: &Session) -> Result<String, QocError> {
        let document = Document::capture(session.diagram(), session.canvas());
        Ok(document.to_toml()?)
    }

    /// Writes the session's diagram to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`QocError::Io`] if the file cannot be written.
    pub fn save(&self, session: &Session, path: impl AsRef<Path>) -> Result<(), QocError> {
        let path = path.as_ref();
        let content = self.to_toml(session)?;
        fs::write(path, content)?;
        info!(path:? = path, elements = session.diagram().len(); "Document saved");
        Ok(())
    }

    /// Renders the session's diagram as an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`QocError::Export`] if the configured style cannot be used.
    pub fn render_svg(&self, session: &Session) -> Result<String, QocError> {
        let exporter = Svg::new(self.config.style())?;
        Ok(exporter.render(session.diagram(), session.canvas())?)
    }

    /// Feeds an event script through `session`, one event per line.
    ///
    /// Blank lines and lines starting with `#` are skipped. Events the
    /// diagram rejects are recorded in the report and the script carries on,
    /// the way the editor reports a refused click and returns to idle.
    ///
    /// # Errors
    ///
    /// Returns [`QocError::Script`] for the first line that does not parse.
    /// Events before it have already been applied.
    pub fn replay(&self, session: &mut Session, script: &str) -> Result<ReplayReport, QocError> {
        let mut report = ReplayReport::default();

        for (index, line) in script.lines().enumerate() {
            let line_number = index + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let event: Event = line.parse().map_err(|message| QocError::Script {
                line: line_number,
                message,
            })?;
            report.events += 1;

            match session.handle(event) {
                Ok(outcome) => debug!(line = line_number, outcome:?; "Event applied"),
                Err(err) => {
                    warn!(line = line_number, err:%; "Event rejected");
                    report.rejected.push((line_number, err));
                }
            }
        }

        info!(events = report.events, rejected = report.rejected.len(); "Script replayed");
        Ok(report)
    }
}

/// Resolves a diagram index, as used by the command line, to an element.
///
/// # Errors
///
/// Returns [`QocError::ElementIndex`] if `index` is out of range.
pub fn element_id_at(diagram: &Diagram, index: usize) -> Result<ElementId, QocError> {
    diagram
        .element_at(index)
        .map(Element::id)
        .ok_or(QocError::ElementIndex {
            index,
            count: diagram.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = "
        # build a small decision
        insert question Should we migrate?
        click 10 10
        insert option Migrate
        click 300 10
        insert criterion Cost
        click 300 200

        connect
        click 305 15
        click 305 205 opposes
    ";

    #[test]
    fn test_replay_builds_diagram() {
        let workspace = Workspace::default();
        let mut session = workspace.new_session();

        let report = workspace.replay(&mut session, SCRIPT).unwrap();
        assert_eq!(report.events, 9);
        assert!(report.rejected.is_empty());

        let diagram = session.diagram();
        assert_eq!(diagram.len(), 3);
        assert_eq!(diagram.relationships().len(), 1);
        let relationship = diagram.relationships()[0];
        assert_eq!(relationship.source(), element_id_at(diagram, 1).unwrap());
        assert_eq!(relationship.target(), element_id_at(diagram, 2).unwrap());
        assert!(!relationship.favors());
    }

    #[test]
    fn test_replay_records_rejections_and_continues() {
        let workspace = Workspace::default();
        let mut session = workspace.new_session();

        let script = "
            insert criterion Cost
            click 10 10
            connect
            click 15 15
            insert option Stay
            click 300 10
        ";
        let report = workspace.replay(&mut session, script).unwrap();

        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].0, 5);
        assert!(matches!(
            report.rejected[0].1,
            RelationshipError::NotRelational { .. }
        ));
        assert_eq!(session.diagram().len(), 2);
    }

    #[test]
    fn test_replay_stops_at_bad_line() {
        let workspace = Workspace::default();
        let mut session = workspace.new_session();

        let err = workspace
            .replay(&mut session, "insert option Stay\nclick 10 10\nfly away\n")
            .unwrap_err();
        assert!(matches!(err, QocError::Script { line: 3, .. }));
        assert_eq!(session.diagram().len(), 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config: AppConfig = toml::from_str("[canvas]\nmove_step = -1.0\n").unwrap();
        assert!(matches!(Workspace::new(config), Err(QocError::Config(_))));
    }

    #[test]
    fn test_element_id_at_out_of_range() {
        let diagram = Diagram::new();
        assert!(matches!(
            element_id_at(&diagram, 0),
            Err(QocError::ElementIndex { index: 0, count: 0 })
        ));
    }
}
