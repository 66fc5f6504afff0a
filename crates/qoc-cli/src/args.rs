//! Command-line argument definitions for the QOC CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Every subcommand works on a QOC document file; the global
//! flags select the configuration file and logging verbosity.

use clap::{Parser, Subcommand};

use qoc::{ElementKind, geometry::Point, session::Direction};

/// Command-line arguments for the QOC diagram editor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Editing operations on a document.
///
/// Elements are addressed by their index in the document, as listed by
/// `qoc show`.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty document
    New {
        file: String,

        /// Overwrite the file if it already exists
        #[arg(long)]
        force: bool,
    },

    /// Add an element
    Add {
        file: String,

        /// Element kind (criterion, option or question)
        #[arg(short, long)]
        kind: ElementKind,

        #[arg(short, long)]
        description: String,

        /// Top-left corner as X,Y; defaults to the next free grid slot
        #[arg(long, value_parser = parse_point)]
        at: Option<Point>,
    },

    /// Add a relationship from one element to another
    Connect {
        file: String,
        source: usize,
        target: usize,

        /// Record the relationship as opposing instead of favoring
        #[arg(long)]
        opposes: bool,
    },

    /// Remove an element and every relationship touching it
    Remove { file: String, index: usize },

    /// Move an element by the configured step
    Move {
        file: String,
        index: usize,

        /// up, down, left or right
        direction: Direction,

        #[arg(long, default_value_t = 1)]
        steps: u32,
    },

    /// List elements and relationships
    Show { file: String },

    /// Render the document to SVG
    Render {
        file: String,

        /// Path to the output SVG file
        #[arg(short, long, default_value = "out.svg")]
        output: String,
    },

    /// Feed a script of editing events through an interactive session
    Replay { file: String, script: String },
}

/// Parses an `X,Y` pair.
fn parse_point(value: &str) -> Result<Point, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got `{value}`"))?;
    let coordinate = |text: &str| {
        text.trim()
            .parse::<f32>()
            .map_err(|err| format!("invalid coordinate `{text}`: {err}"))
    };
    Ok(Point::new(coordinate(x)?, coordinate(y)?))
}
