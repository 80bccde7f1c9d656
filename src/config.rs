use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::error::{Result, WhiteboardError};

/// Geometry and colours of the ruled-paper background
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperConfig {
    /// Distance between horizontal rules, also the y of the first rule
    pub line_spacing: u32,
    /// x of the vertical margin line; rules start here
    pub margin: u32,
    pub rule_color: String,
    pub rule_width: u32,
    pub margin_color: String,
    pub margin_width: u32,
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            line_spacing: 20,
            margin: 40,
            rule_color: "#e5e7eb".to_owned(),
            rule_width: 1,
            margin_color: "#d1d5db".to_owned(),
            margin_width: 2,
        }
    }
}

/// Defaults and limits for the pen and eraser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolDefaults {
    pub pen_color: String,
    pub pen_width: f32,
    pub pen_width_min: f32,
    pub pen_width_max: f32,
    pub eraser_width: f32,
    pub eraser_width_min: f32,
    pub eraser_width_max: f32,
}

impl Default for ToolDefaults {
    fn default() -> Self {
        Self {
            pen_color: "#000000".to_owned(),
            pen_width: 4.0,
            pen_width_min: 1.0,
            pen_width_max: 20.0,
            eraser_width: 8.0,
            eraser_width_min: 4.0,
            eraser_width_max: 40.0,
        }
    }
}

impl ToolDefaults {
    pub fn pen_range(&self) -> RangeInclusive<f32> {
        self.pen_width_min..=self.pen_width_max
    }

    pub fn eraser_range(&self) -> RangeInclusive<f32> {
        self.eraser_width_min..=self.eraser_width_max
    }
}

/// Top-level configuration for a whiteboard session.
///
/// Every field has a default so a partial JSON file is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhiteboardConfig {
    /// Key under which the document is stored
    pub storage_key: String,
    /// Directory used by the file-backed store
    pub state_dir: PathBuf,
    /// Surface size before the UI shell reports its real size
    pub initial_width: u32,
    pub initial_height: u32,
    /// Resize requests closer together than this are coalesced
    pub resize_debounce_secs: f64,
    pub paper: PaperConfig,
    pub tools: ToolDefaults,
}

impl Default for WhiteboardConfig {
    fn default() -> Self {
        Self {
            storage_key: "whiteboard-data".to_owned(),
            state_dir: PathBuf::from("whiteboard_state"),
            initial_width: 800,
            initial_height: 600,
            resize_debounce_secs: 0.15,
            paper: PaperConfig::default(),
            tools: ToolDefaults::default(),
        }
    }
}

impl WhiteboardConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| WhiteboardError::PersistenceReadFailure(e.to_string()))
    }

    /// Load from a JSON file, falling back to defaults if it is missing or broken
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }
}
