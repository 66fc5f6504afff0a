//! Canvas geometry for placed elements.
//!
//! The [`Canvas`] is the presentation-side [`GeometryProvider`]: it records
//! where each element's box sits and sizes the box from its description
//! using fixed monospace metrics from [`CanvasConfig`].

use std::collections::HashMap;

use log::trace;

use qoc_core::{
    Element, ElementId, GeometryProvider,
    geometry::{Bounds, Point, Size},
};

use crate::config::CanvasConfig;

/// Spacing of the fallback grid used for elements that have no position.
const GRID_ORIGIN: f32 = 20.0;
const GRID_COLUMNS: usize = 3;
const GRID_CELL_WIDTH: f32 = 280.0;
const GRID_CELL_HEIGHT: f32 = 90.0;

#[derive(Debug, Clone, Copy)]
struct Placement {
    top_left: Point,
    size: Size,
}

/// Element positions and box sizes.
#[derive(Debug, Clone)]
pub struct Canvas {
    config: CanvasConfig,
    placements: HashMap<ElementId, Placement>,
}

impl Canvas {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            config,
            placements: HashMap::new(),
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Places `element` with its top-left corner at `top_left`, sizing its box
    /// from the description. Placing an element again moves and resizes it.
    pub fn place(&mut self, element: &Element, top_left: Point) {
        let size = self.size_for(element.description());
        trace!(element:% = element.id(), x = top_left.x(), y = top_left.y(); "Element placed");
        self.placements
            .insert(element.id(), Placement { top_left, size });
    }

    /// Moves a placed element by `delta`. Returns false if it is not placed.
    pub fn move_by(&mut self, id: ElementId, delta: Point) -> bool {
        match self.placements.get_mut(&id) {
            Some(placement) => {
                placement.top_left = placement.top_left.add_point(delta);
                true
            }
            None => false,
        }
    }

    /// Returns the top-left corner of a placed element.
    pub fn position(&self, id: ElementId) -> Option<Point> {
        self.placements.get(&id).map(|placement| placement.top_left)
    }

    pub fn forget(&mut self, id: ElementId) {
        self.placements.remove(&id);
    }

    pub fn clear(&mut self) {
        self.placements.clear();
    }

    /// Box size for a description.
    ///
    /// The width fits the longest line plus one character of margin per side;
    /// the height grows by one line for every `line_length` characters.
    ///
    /// # Examples
    ///
    /// ```
    /// # use qoc::{canvas::Canvas, config::CanvasConfig};
    /// let canvas = Canvas::new(CanvasConfig::default());
    ///
    /// let size = canvas.size_for("Cost");
    /// assert_eq!(size.width(), 48.0);  // 2 * 8 + 4 * 8
    /// assert_eq!(size.height(), 25.0); // 1 * (10 + 5) + 2 * 5
    /// ```
    pub fn size_for(&self, description: &str) -> Size {
        let config = &self.config;
        let len = description.chars().count();
        let columns = len.min(config.line_length());
        let lines = len / config.line_length() + 1;

        Size::new(
            config.char_width() * 2.0 + columns as f32 * config.char_width(),
            lines as f32 * (config.line_height() + config.line_padding())
                + config.line_padding() * 2.0,
        )
    }

    /// Splits a description into the lines drawn inside its box.
    pub fn wrap_lines<'a>(&self, description: &'a str) -> Vec<&'a str> {
        let line_length = self.config.line_length();
        let mut lines = Vec::new();
        let mut start = 0;
        let mut count = 0;

        for (offset, _) in description.char_indices() {
            if count == line_length {
                lines.push(&description[start..offset]);
                start = offset;
                count = 0;
            }
            count += 1;
        }
        if start < description.len() {
            lines.push(&description[start..]);
        }

        lines
    }

    /// Returns where the `index`-th unplaced element goes when a document
    /// carries no position for it.
    pub fn grid_slot(index: usize) -> Point {
        let column = index % GRID_COLUMNS;
        let row = index / GRID_COLUMNS;
        Point::new(
            GRID_ORIGIN + column as f32 * GRID_CELL_WIDTH,
            GRID_ORIGIN + row as f32 * GRID_CELL_HEIGHT,
        )
    }

    /// Union of the bounds of every placed element.
    pub fn content_bounds(&self) -> Option<Bounds> {
        self.placements
            .values()
            .map(|placement| Bounds::new_from_top_left(placement.top_left, placement.size))
            .reduce(|acc, bounds| acc.merge(&bounds))
    }
}

impl GeometryProvider for Canvas {
    fn bounds(&self, element: ElementId) -> Option<Bounds> {
        self.placements
            .get(&element)
            .map(|placement| Bounds::new_from_top_left(placement.top_left, placement.size))
    }
}
