//! Color handling for Arbor diagrams
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Theme palettes, container overrides and user styles
//! are all written as CSS color strings and parsed through [`Color::new`].

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{DynamicColor, Rgba8, Srgb};

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a CSS color string such as `"#DAE8FC"`,
    /// `"#F5F5F580"`, `"rgb(255, 0, 0)"` or `"white"`.
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending string when it is not a valid
    /// CSS color.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_core::color::Color;
    ///
    /// let vnet_fill = Color::new("#DAE8FC").unwrap();
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns a sanitized, ID-safe string representation of this color.
    ///
    /// The result contains only alphanumeric characters and underscores and
    /// starts with a letter, so it can be embedded in SVG marker ids.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_core::color::Color;
    ///
    /// let color = Color::new("#ff8000").unwrap();
    /// let id_str = color.to_id_safe_string();
    /// assert!(id_str.chars().all(|c| c.is_alphanumeric() || c == '_'));
    /// ```
    pub fn to_id_safe_string(self) -> String {
        let color_str = self.to_string();
        let mut sanitized = color_str
            .replace('#', "hex")
            .replace(['(', ')', ',', ' ', ';', '.', '%', '/'], "_");

        if sanitized.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            sanitized = format!("c_{sanitized}");
        }

        sanitized
    }

    /// Returns the alpha (transparency) component of this color, between
    /// 0.0 (fully transparent) and 1.0 (fully opaque).
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

/// Writes `#rrggbb`, or `#rrggbbaa` for translucent colors, so output is
/// the same whatever notation the color was parsed from.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rgba8 { r, g, b, a } = self.color.to_alpha_color::<Srgb>().to_rgba8();
        if a == u8::MAX {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_new() {
        assert!(Color::new("#ff0000").is_ok());
        assert!(Color::new("white").is_ok());
        assert!(Color::new("not-a-color").is_err());
    }

    #[test]
    fn test_color_with_alpha_hex() {
        let translucent = Color::new("#F5F5F580").unwrap();
        assert!(translucent.alpha() < 1.0);

        let opaque = Color::new("#F5F5F5").unwrap();
        assert!((opaque.alpha() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_color_default() {
        assert_eq!(Color::default().to_string(), "#000000");
    }

    #[test]
    fn test_color_display_is_hex() {
        assert_eq!(Color::new("#2D3436").unwrap().to_string(), "#2d3436");
        assert_eq!(Color::new("rgb(45, 52, 54)").unwrap().to_string(), "#2d3436");
        assert_eq!(Color::new("white").unwrap().to_string(), "#ffffff");
        assert_eq!(Color::new("#F5F5F580").unwrap().to_string(), "#f5f5f580");
    }

    #[test]
    fn test_color_to_id_safe_string() {
        let safe_id = Color::new("rgb(10, 20, 30)").unwrap().to_id_safe_string();
        assert!(safe_id.chars().all(|c| c.is_alphanumeric() || c == '_'));
        assert!(safe_id.chars().next().unwrap().is_ascii_alphabetic());
    }

    #[test]
    fn test_color_eq_hash() {
        use std::collections::HashSet;

        let color1 = Color::new("red").unwrap();
        let color2 = Color::new("red").unwrap();
        let color3 = Color::new("blue").unwrap();

        assert_eq!(color1, color2);
        assert_ne!(color1, color3);

        let mut set = HashSet::new();
        set.insert(color1);
        assert!(set.contains(&color2));
        assert!(!set.contains(&color3));
    }
}
