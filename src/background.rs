use egui::Color32;

use crate::color::parse_color;
use crate::config::PaperConfig;
use crate::surface::{CompositeMode, PixelRect, RasterSurface};

/// Paints the ruled-paper look: horizontal rules every `line_spacing`
/// starting at `y = line_spacing`, from the margin to the right edge, and one
/// vertical margin line over the full height.
///
/// The pattern is baked into the surface pixels. Painting leaves the surface
/// in [`CompositeMode::SourceOver`], the starting mode for whatever is drawn
/// next.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundPattern {
    line_spacing: u32,
    margin: u32,
    rule_color: Color32,
    rule_width: u32,
    margin_color: Color32,
    margin_width: u32,
}

impl Default for BackgroundPattern {
    fn default() -> Self {
        Self::from_config(&PaperConfig::default())
    }
}

impl BackgroundPattern {
    pub fn from_config(config: &PaperConfig) -> Self {
        let color = |text: &str, fallback: Color32| {
            parse_color(text).unwrap_or_else(|e| {
                log::warn!("{e}; using fallback paper colour");
                fallback
            })
        };
        Self {
            line_spacing: config.line_spacing.max(1),
            margin: config.margin,
            rule_color: color(&config.rule_color, Color32::from_rgb(0xe5, 0xe7, 0xeb)),
            rule_width: config.rule_width.max(1),
            margin_color: color(&config.margin_color, Color32::from_rgb(0xd1, 0xd5, 0xdb)),
            margin_width: config.margin_width.max(1),
        }
    }

    pub fn rule_color(&self) -> Color32 {
        self.rule_color
    }

    pub fn margin_color(&self) -> Color32 {
        self.margin_color
    }

    /// Rows covered by the rule drawn at `y`
    pub fn is_rule_row(&self, row: u32) -> bool {
        row >= self.line_spacing && (row % self.line_spacing) < self.rule_width
    }

    /// Columns covered by the margin line, centred on `margin`
    pub fn margin_columns(&self) -> std::ops::Range<u32> {
        let start = self.margin.saturating_sub(self.margin_width / 2);
        start..start + self.margin_width
    }

    /// Paint the whole pattern over the surface
    pub fn paint(&self, surface: &mut RasterSurface) {
        let bounds = surface.bounds();
        self.fill(surface, bounds, CompositeMode::SourceOver);
    }

    /// Paint the part of the pattern inside `clip` beneath what is already
    /// there, so only transparent or erased pixels pick it up
    pub fn paint_within(&self, surface: &mut RasterSurface, clip: PixelRect) {
        self.fill(surface, clip, CompositeMode::DestinationOver);
    }

    fn fill(&self, surface: &mut RasterSurface, clip: PixelRect, mode: CompositeMode) {
        let clip = clip.intersect(surface.bounds());
        if clip.is_empty() {
            surface.set_mode(CompositeMode::SourceOver);
            return;
        }
        surface.set_mode(mode);

        // the margin sits on top of the rules; painting beneath means it goes first
        if mode == CompositeMode::DestinationOver {
            self.fill_margin(surface, clip);
            self.fill_rules(surface, clip);
        } else {
            self.fill_rules(surface, clip);
            self.fill_margin(surface, clip);
        }

        surface.set_mode(CompositeMode::SourceOver);
    }

    fn fill_rules(&self, surface: &mut RasterSurface, clip: PixelRect) {
        let first = clip.y0.saturating_sub(self.rule_width).max(self.line_spacing) / self.line_spacing;
        let mut y = first.max(1) * self.line_spacing;
        while y < clip.y1 {
            let rule = PixelRect {
                x0: self.margin,
                y0: y,
                x1: surface.width(),
                y1: y + self.rule_width,
            };
            surface.fill_pixels(rule.intersect(clip), self.rule_color);
            y += self.line_spacing;
        }
    }

    fn fill_margin(&self, surface: &mut RasterSurface, clip: PixelRect) {
        let columns = self.margin_columns();
        let margin = PixelRect {
            x0: columns.start,
            y0: 0,
            x1: columns.end,
            y1: surface.height(),
        };
        surface.fill_pixels(margin.intersect(clip), self.margin_color);
    }
}
