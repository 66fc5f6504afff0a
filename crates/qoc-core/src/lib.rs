//! QOC Core Types and Definitions
//!
//! This crate provides the relationship model for QOC (Questions, Options,
//! Criteria) design-rationale diagrams. It includes:
//!
//! - **Elements**: typed, described diagram boxes ([`element`] module)
//! - **Relational capability**: allow-lists and directed pro/con edges
//!   ([`relational`] module)
//! - **Diagram**: the element set and relationship ledger, with cascading
//!   deletion ([`diagram`] module)
//! - **Geometry**: basic geometric types for hit testing ([`geometry`] module)
//! - **Colors**: color handling with CSS color support ([`color::Color`])

pub mod color;
pub mod diagram;
pub mod element;
pub mod error;
pub mod geometry;
pub mod relational;

pub use diagram::{Diagram, GeometryProvider};
pub use element::{Element, ElementId, ElementKind, ElementRef};
pub use error::RelationshipError;
pub use relational::{Relational, Relationship};
