//! SVG rendering for QOC diagrams.
//!
//! The output keeps the classic editor look: a background rectangle, one
//! filled rectangle per element with its wrapped description, and one
//! centre-to-centre line per relationship, drawn beneath the boxes and
//! colored by polarity.

use log::{debug, info};
use svg::{self, node::Text as SvgText, node::element as svg_element};

use qoc_core::{
    Diagram, Element, ElementKind, GeometryProvider, Relationship,
    color::Color,
    geometry::{Bounds, Size},
};

use super::{Error, Exporter};
use crate::{canvas::Canvas, config::StyleConfig};

/// Space kept between the content and the bottom-right edge of the image.
const MARGIN: f32 = 20.0;

/// Resolved colors for each kind of element.
#[derive(Debug, Clone, Copy)]
struct KindColors {
    criterion: Color,
    option: Color,
    question: Color,
}

/// SVG exporter with its style resolved up front.
#[derive(Debug, Clone)]
pub struct Svg {
    background: Color,
    fills: KindColors,
    favors: Color,
    opposes: Color,
    text: Color,
    font_family: String,
    font_size: f32,
}

impl Svg {
    /// Creates an exporter for `style`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if any configured color does not parse.
    pub fn new(style: &StyleConfig) -> Result<Self, Error> {
        let resolve = |color: Result<Color, String>| color.map_err(Error::Render);

        Ok(Self {
            background: resolve(style.background_color())?,
            fills: KindColors {
                criterion: resolve(style.fill_color(ElementKind::Criterion))?,
                option: resolve(style.fill_color(ElementKind::Option))?,
                question: resolve(style.fill_color(ElementKind::Question))?,
            },
            favors: resolve(style.relationship_color(true))?,
            opposes: resolve(style.relationship_color(false))?,
            text: resolve(style.text_color())?,
            font_family: style.font_family().to_string(),
            font_size: style.font_size(),
        })
    }

    /// Builds the SVG document for a diagram.
    pub fn render_document(&self, diagram: &Diagram, canvas: &Canvas) -> svg::Document {
        let size = self.calculate_svg_dimensions(canvas);

        let doc = svg::Document::new()
            .set("viewBox", format!("0 0 {} {}", size.width(), size.height()))
            .set("width", size.width())
            .set("height", size.height());
        let doc = self.add_background(doc, size);

        let mut relationships = svg_element::Group::new().set("class", "relationships");
        for relationship in diagram.relationships() {
            if let Some(line) = self.render_relationship(relationship, canvas) {
                relationships = relationships.add(line);
            }
        }

        let mut elements = svg_element::Group::new().set("class", "elements");
        for element in diagram.elements() {
            if let Some(group) = self.render_element(element, canvas) {
                elements = elements.add(group);
            }
        }

        doc.add(relationships).add(elements)
    }

    fn calculate_svg_dimensions(&self, canvas: &Canvas) -> Size {
        let config = canvas.config();
        let (content_width, content_height) = canvas
            .content_bounds()
            .map(|bounds| (bounds.max_x() + MARGIN, bounds.max_y() + MARGIN))
            .unwrap_or_default();

        Size::new(
            config.width().max(content_width),
            config.height().max(content_height),
        )
    }

    fn add_background(&self, doc: svg::Document, size: Size) -> svg::Document {
        let background = svg_element::Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", size.width())
            .set("height", size.height())
            .set("fill", self.background.to_string())
            .set("fill-opacity", self.background.alpha());
        doc.add(background)
    }

    fn render_element(&self, element: &Element, canvas: &Canvas) -> Option<svg_element::Group> {
        let Some(bounds) = canvas.bounds(element.id()) else {
            debug!(element:% = element.id(); "Skipping unplaced element");
            return None;
        };
        let fill = match element.kind() {
            ElementKind::Criterion => self.fills.criterion,
            ElementKind::Option => self.fills.option,
            ElementKind::Question => self.fills.question,
        };

        let rect = svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("fill", fill.to_string())
            .set("fill-opacity", fill.alpha())
            .set("stroke", self.text.to_string());

        let group = svg_element::Group::new()
            .set("class", element.kind().as_str())
            .add(rect)
            .add(self.render_description(element.description(), bounds, canvas));
        Some(group)
    }

    fn render_description(
        &self,
        description: &str,
        bounds: Bounds,
        canvas: &Canvas,
    ) -> svg_element::Text {
        let config = canvas.config();
        let x = bounds.min_x() + config.char_width();
        let line_step = config.line_height() + config.line_padding();

        let mut text = svg_element::Text::new("")
            .set("x", x)
            .set("y", bounds.min_y() + config.line_padding())
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size)
            .set("fill", self.text.to_string())
            .set("fill-opacity", self.text.alpha());

        for line in canvas.wrap_lines(description) {
            let tspan = svg_element::TSpan::new("")
                .set("x", x)
                .set("dy", line_step)
                .add(SvgText::new(line));
            text = text.add(tspan);
        }

        text
    }

    fn render_relationship(
        &self,
        relationship: &Relationship,
        canvas: &Canvas,
    ) -> Option<svg_element::Line> {
        let start = canvas.bounds(relationship.source())?.center();
        let end = canvas.bounds(relationship.target())?.center();
        let (color, class) = if relationship.favors() {
            (self.favors, "favors")
        } else {
            (self.opposes, "opposes")
        };

        Some(
            svg_element::Line::new()
                .set("x1", start.x())
                .set("y1", start.y())
                .set("x2", end.x())
                .set("y2", end.y())
                .set("stroke", color.to_string())
                .set("stroke-opacity", color.alpha())
                .set("class", class),
        )
    }
}

impl Exporter for Svg {
    fn render(&self, diagram: &Diagram, canvas: &Canvas) -> Result<String, Error> {
        let document = self.render_document(diagram, canvas);
        info!(
            elements = diagram.len(),
            relationships = diagram.relationships().len();
            "SVG rendered"
        );
        Ok(document.to_string())
    }
}
