//! CSS colors for diagram styling.
//!
//! Styles are configured as CSS color strings (`"#ff0000"`, `"rgb(0 128 0)"`,
//! `"white"`) and parsed once into a [`Color`] backed by the `color` crate.

use std::{fmt, str::FromStr};

use color::DynamicColor;

/// A parsed CSS color.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color(DynamicColor);

impl Color {
    /// Parses a CSS color string.
    ///
    /// ```
    /// use qoc_core::color::Color;
    ///
    /// assert!(Color::new("#00ff00").is_ok());
    /// assert!(Color::new("green-ish").is_err());
    /// ```
    pub fn new(css: &str) -> Result<Self, String> {
        css.parse()
    }

    /// Opacity between 0.0 and 1.0, written as the SVG `*-opacity` attribute.
    pub fn alpha(&self) -> f32 {
        self.0.components[3]
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(css: &str) -> Result<Self, Self::Err> {
        DynamicColor::from_str(css)
            .map(Self)
            .map_err(|err| format!("invalid color `{css}`: {err}"))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_parse_css_forms() {
        for css in ["#ff0000", "rgb(51, 51, 51)", "white", "rgba(0, 0, 255, 0.5)"] {
            assert!(Color::new(css).is_ok(), "{css} should parse");
        }

        let err = Color::new("reddish").unwrap_err();
        assert!(err.contains("reddish"));
    }

    #[test]
    fn test_alpha() {
        assert_approx_eq!(f32, Color::new("#999999").unwrap().alpha(), 1.0);
        assert_approx_eq!(
            f32,
            Color::new("rgba(0, 0, 255, 0.5)").unwrap().alpha(),
            0.5
        );
    }

    #[test]
    fn test_display_is_parseable() {
        let color = Color::new("#333333").unwrap();
        assert!(Color::new(&color.to_string()).is_ok());
    }
}
