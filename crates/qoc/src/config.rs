//! Configuration types for QOC editing and rendering.
//!
//! This module provides configuration structures that control canvas
//! metrics and visual styling. All types implement [`serde::Deserialize`]
//! and fall back to the classic editor look for any field left unset.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration combining canvas and style settings.
//! - [`CanvasConfig`] - Canvas size, keyboard move step and text metrics.
//! - [`StyleConfig`] - Fill, stroke and text colors.
//!
//! # Example
//!
//! ```
//! # use qoc::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.canvas().move_step(), 5.0);
//! ```

use serde::Deserialize;

use qoc_core::{ElementKind, color::Color};

/// Top-level application configuration combining canvas and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Canvas configuration section.
    #[serde(default)]
    canvas: CanvasConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified canvas and style configurations.
    pub fn new(canvas: CanvasConfig, style: StyleConfig) -> Self {
        Self { canvas, style }
    }

    /// Returns the canvas configuration.
    pub fn canvas(&self) -> &CanvasConfig {
        &self.canvas
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Checks that every configured value is usable.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        self.canvas.validate()?;
        self.style.validate()
    }
}

/// Canvas size, movement and monospace text metrics.
///
/// Element boxes are sized from their description using these metrics, so
/// they must be positive.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    width: f32,
    height: f32,
    move_step: f32,
    char_width: f32,
    line_length: usize,
    line_height: f32,
    line_padding: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            move_step: 5.0,
            char_width: 8.0,
            line_length: 30,
            line_height: 10.0,
            line_padding: 5.0,
        }
    }
}

impl CanvasConfig {
    /// Minimum width of the rendered canvas.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Minimum height of the rendered canvas.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Distance a selected element moves per arrow-key press.
    pub fn move_step(&self) -> f32 {
        self.move_step
    }

    pub fn char_width(&self) -> f32 {
        self.char_width
    }

    /// Maximum number of characters on one line of a box.
    pub fn line_length(&self) -> usize {
        self.line_length
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    pub fn line_padding(&self) -> f32 {
        self.line_padding
    }

    fn validate(&self) -> Result<(), String> {
        let positive = [
            ("canvas.width", self.width),
            ("canvas.height", self.height),
            ("canvas.move_step", self.move_step),
            ("canvas.char_width", self.char_width),
            ("canvas.line_height", self.line_height),
        ];
        if let Some((name, value)) = positive.iter().find(|(_, value)| *value <= 0.0) {
            return Err(format!("{name} must be positive, got {value}"));
        }
        if self.line_padding < 0.0 {
            return Err(format!(
                "canvas.line_padding must not be negative, got {}",
                self.line_padding
            ));
        }
        if self.line_length == 0 {
            return Err("canvas.line_length must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Visual styling configuration for rendered diagrams.
///
/// Colors are CSS color strings and are parsed when used.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    background_color: String,
    criterion_color: String,
    option_color: String,
    question_color: String,
    favors_color: String,
    opposes_color: String,
    text_color: String,
    font_family: String,
    font_size: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: "white".to_string(),
            criterion_color: "#ff0000".to_string(),
            option_color: "#00ff00".to_string(),
            question_color: "#0000ff".to_string(),
            favors_color: "#999999".to_string(),
            opposes_color: "#333333".to_string(),
            text_color: "black".to_string(),
            font_family: "monospace".to_string(),
            font_size: 13.0,
        }
    }
}

impl StyleConfig {
    /// Returns the parsed canvas background [`Color`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid color.
    pub fn background_color(&self) -> Result<Color, String> {
        parse_color("style.background_color", &self.background_color)
    }

    /// Returns the fill [`Color`] for boxes of the given kind.
    pub fn fill_color(&self, kind: ElementKind) -> Result<Color, String> {
        match kind {
            ElementKind::Criterion => parse_color("style.criterion_color", &self.criterion_color),
            ElementKind::Option => parse_color("style.option_color", &self.option_color),
            ElementKind::Question => parse_color("style.question_color", &self.question_color),
        }
    }

    /// Returns the stroke [`Color`] for a relationship of the given polarity.
    pub fn relationship_color(&self, favors: bool) -> Result<Color, String> {
        if favors {
            parse_color("style.favors_color", &self.favors_color)
        } else {
            parse_color("style.opposes_color", &self.opposes_color)
        }
    }

    pub fn text_color(&self) -> Result<Color, String> {
        parse_color("style.text_color", &self.text_color)
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    fn validate(&self) -> Result<(), String> {
        self.background_color()?;
        for kind in ElementKind::ALL {
            self.fill_color(kind)?;
        }
        self.relationship_color(true)?;
        self.relationship_color(false)?;
        self.text_color()?;
        if self.font_size <= 0.0 {
            return Err(format!(
                "style.font_size must be positive, got {}",
                self.font_size
            ));
        }
        Ok(())
    }
}

fn parse_color(setting: &str, value: &str) -> Result<Color, String> {
    Color::new(value).map_err(|err| format!("Invalid {setting} in config: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.canvas().width(), 800.0);
        assert_eq!(config.canvas().height(), 600.0);
        assert_eq!(config.canvas().line_length(), 30);
        assert_eq!(config.style().font_size(), 13.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r##"
            [canvas]
            move_step = 10.0

            [style]
            option_color = "#00aa00"
            "##,
        )
        .unwrap();

        assert_eq!(config.canvas().move_step(), 10.0);
        assert_eq!(config.canvas().char_width(), 8.0);
        assert_eq!(config.style().font_family(), "monospace");
        assert!(config.style().fill_color(ElementKind::Option).is_ok());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_color_is_reported() {
        let config: AppConfig = toml::from_str(
            r#"
            [style]
            criterion_color = "reddish"
            "#,
        )
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.contains("style.criterion_color"));
        assert!(err.contains("reddish"));
    }

    #[test]
    fn test_non_positive_metrics_are_reported() {
        let config: AppConfig = toml::from_str("[canvas]\nchar_width = 0.0\n").unwrap();
        assert!(config.validate().unwrap_err().contains("canvas.char_width"));

        let config: AppConfig = toml::from_str("[canvas]\nline_length = 0\n").unwrap();
        assert!(config.validate().unwrap_err().contains("canvas.line_length"));
    }
}
