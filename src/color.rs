use egui::Color32;

use crate::error::{Result, WhiteboardError};

/// Parse a CSS-style hex colour: `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
/// Surrounding whitespace is ignored.
pub fn parse_color(text: &str) -> Result<Color32> {
    Color32::from_hex(text.trim()).map_err(|_| WhiteboardError::InvalidColor(text.to_owned()))
}
