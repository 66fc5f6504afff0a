//! CLI logic for the QOC diagram editor.
//!
//! Each subcommand opens a document, applies one editing operation through
//! a [`Session`] and saves it back, so every change goes through the same
//! checks as interactive editing.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use std::{
    io::{self, Write},
    path::Path,
};

use log::{info, warn};

use qoc::{
    Element, QocError, Workspace, canvas::Canvas, element_id_at, session::Session,
};

/// Run the QOC CLI application, writing listings to standard output.
///
/// # Errors
///
/// Returns `QocError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Invalid documents or scripts
/// - Rejected relationships and out-of-range element indexes
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), QocError> {
    let stdout = io::stdout();
    run_with_output(args, &mut stdout.lock())
}

/// Run the QOC CLI application, writing listings to `out`.
///
/// # Errors
///
/// See [`run`].
pub fn run_with_output(args: &Args, out: &mut impl Write) -> Result<(), QocError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let workspace = Workspace::new(app_config)?;

    match &args.command {
        Command::New { file, force } => {
            if !force && Path::new(file).exists() {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{file} already exists (use --force to overwrite)"),
                )
                .into());
            }
            workspace.save(&workspace.new_session(), file)?;
        }
        Command::Add {
            file,
            kind,
            description,
            at,
        } => {
            let mut session = workspace.open(file)?;
            let top_left = at.unwrap_or_else(|| Canvas::grid_slot(session.diagram().len()));
            let id = session.insert(Element::new(*kind, description.as_str()), top_left)?;
            workspace.save(&session, file)?;
            writeln!(out, "Added {kind} {id} at index {}", session.diagram().len() - 1)?;
        }
        Command::Connect {
            file,
            source,
            target,
            opposes,
        } => {
            let mut session = workspace.open(file)?;
            let source_id = element_id_at(session.diagram(), *source)?;
            let target_id = element_id_at(session.diagram(), *target)?;
            session.connect(source_id, target_id, !opposes)?;
            workspace.save(&session, file)?;
        }
        Command::Remove { file, index } => {
            let mut session = workspace.open(file)?;
            let id = element_id_at(session.diagram(), *index)?;
            let relationships = session.diagram().relationships_of(id).count();
            session.remove(id);
            workspace.save(&session, file)?;
            writeln!(
                out,
                "Removed element {index} and {relationships} relationship(s)"
            )?;
        }
        Command::Move {
            file,
            index,
            direction,
            steps,
        } => {
            let mut session = workspace.open(file)?;
            let id = element_id_at(session.diagram(), *index)?;
            for _ in 0..*steps {
                session.move_element(id, *direction);
            }
            workspace.save(&session, file)?;
        }
        Command::Show { file } => {
            let session = workspace.open(file)?;
            write_listing(&session, out)?;
        }
        Command::Render { file, output } => {
            let session = workspace.open(file)?;
            let svg = workspace.render_svg(&session)?;
            std::fs::write(output, svg)?;
            info!(output_file = output; "SVG exported successfully");
        }
        Command::Replay { file, script } => {
            let mut session = if Path::new(file).exists() {
                workspace.open(file)?
            } else {
                warn!(file; "Document not found, replaying onto an empty diagram");
                workspace.new_session()
            };
            let script = std::fs::read_to_string(script)?;
            let report = workspace.replay(&mut session, &script)?;
            workspace.save(&session, file)?;

            writeln!(
                out,
                "Replayed {} event(s), {} rejected",
                report.events,
                report.rejected.len()
            )?;
            for (line, err) in &report.rejected {
                writeln!(out, "  line {line}: {err}")?;
            }
        }
    }

    Ok(())
}

fn write_listing(session: &Session, out: &mut impl Write) -> io::Result<()> {
    let diagram = session.diagram();

    writeln!(out, "Elements:")?;
    for (index, element) in diagram.elements().enumerate() {
        write!(out, "  [{index}] {} {:?}", element.kind(), element.description())?;
        if let Some(position) = session.canvas().position(element.id()) {
            write!(out, " at ({}, {})", position.x(), position.y())?;
        }
        writeln!(out)?;
    }

    writeln!(out, "Relationships:")?;
    for relationship in diagram.relationships() {
        let (Some(source), Some(target)) = (
            diagram.index_of(relationship.source()),
            diagram.index_of(relationship.target()),
        ) else {
            continue;
        };
        let polarity = if relationship.favors() {
            "favors"
        } else {
            "opposes"
        };
        writeln!(out, "  [{source}] {polarity} [{target}]")?;
    }

    Ok(())
}
