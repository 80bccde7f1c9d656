use egui::Color32;

use crate::color::parse_color;
use crate::config::ToolDefaults;
use crate::error::Result;
use crate::stroke::ToolConfig;

/// Which tool the next stroke is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolKind {
    #[default]
    Pen,
    Eraser,
}

impl ToolKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pen => "Pen",
            Self::Eraser => "Eraser",
        }
    }
}

/// Current pen and eraser settings. Changes apply from the next stroke on.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    active: ToolKind,
    pen_color: String,
    pen_color_value: Color32,
    pen_width: f32,
    eraser_width: f32,
    limits: ToolDefaults,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self::from_defaults(&ToolDefaults::default())
    }
}

impl ToolSettings {
    pub fn from_defaults(defaults: &ToolDefaults) -> Self {
        let mut settings = Self {
            active: ToolKind::Pen,
            pen_color: "#000000".to_owned(),
            pen_color_value: Color32::BLACK,
            pen_width: 0.0,
            eraser_width: 0.0,
            limits: defaults.clone(),
        };
        if let Err(e) = settings.set_pen_color(&defaults.pen_color) {
            log::warn!("{e}; pen defaults to black");
        }
        settings.set_pen_width(defaults.pen_width);
        settings.set_eraser_width(defaults.eraser_width);
        settings
    }

    pub fn active(&self) -> ToolKind {
        self.active
    }

    pub fn select(&mut self, tool: ToolKind) {
        self.active = tool;
    }

    /// The colour string as last set
    pub fn pen_color(&self) -> &str {
        &self.pen_color
    }

    pub fn pen_color_value(&self) -> Color32 {
        self.pen_color_value
    }

    /// Unparseable colours are rejected and the previous colour kept
    pub fn set_pen_color(&mut self, color: &str) -> Result<()> {
        self.pen_color_value = parse_color(color)?;
        self.pen_color = color.trim().to_owned();
        Ok(())
    }

    pub fn pen_width(&self) -> f32 {
        self.pen_width
    }

    pub fn set_pen_width(&mut self, width: f32) {
        let range = self.limits.pen_range();
        self.pen_width = width.clamp(*range.start(), *range.end());
    }

    pub fn eraser_width(&self) -> f32 {
        self.eraser_width
    }

    pub fn set_eraser_width(&mut self, width: f32) {
        let range = self.limits.eraser_range();
        self.eraser_width = width.clamp(*range.start(), *range.end());
    }

    pub fn limits(&self) -> &ToolDefaults {
        &self.limits
    }

    /// Freeze the current settings for a new stroke
    pub fn tool_config(&self) -> ToolConfig {
        match self.active {
            ToolKind::Pen => ToolConfig::Pen {
                color: self.pen_color_value,
                width: self.pen_width,
            },
            ToolKind::Eraser => ToolConfig::Eraser {
                width: self.eraser_width,
            },
        }
    }
}
