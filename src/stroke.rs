use egui::{Color32, Pos2};

use crate::background::BackgroundPattern;
use crate::surface::{CompositeMode, PixelRect, RasterSurface};

/// Settings a stroke is drawn with. Fixed for the whole stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolConfig {
    Pen { color: Color32, width: f32 },
    Eraser { width: f32 },
}

impl ToolConfig {
    pub fn width(&self) -> f32 {
        match self {
            Self::Pen { width, .. } | Self::Eraser { width } => *width,
        }
    }

    pub fn composite_mode(&self) -> CompositeMode {
        match self {
            Self::Pen { .. } => CompositeMode::SourceOver,
            Self::Eraser { .. } => CompositeMode::DestinationOut,
        }
    }

    fn source_color(&self) -> Color32 {
        match self {
            Self::Pen { color, .. } => *color,
            // only the alpha matters for destination-out
            Self::Eraser { .. } => Color32::BLACK,
        }
    }
}

/// A finished stroke, handed back so the caller can capture the surface
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedStroke {
    pub tool: ToolConfig,
    pub points: Vec<Pos2>,
    /// Pixels that may differ from before the stroke
    pub dirty: Option<PixelRect>,
}

#[derive(Debug, Clone)]
struct ActiveStroke {
    tool: ToolConfig,
    points: Vec<Pos2>,
    dirty: Option<PixelRect>,
}

impl ActiveStroke {
    fn last_point(&self) -> Pos2 {
        // never empty: begin pushes the first point
        self.points[self.points.len() - 1]
    }

    fn mark_dirty(&mut self, rect: Option<PixelRect>) {
        if let Some(rect) = rect {
            self.dirty = Some(match self.dirty {
                Some(existing) => existing.union(rect),
                None => rect,
            });
        }
    }
}

/// Incrementally paints or erases one stroke at a time.
///
/// ```text
/// Idle --begin--> Active --end--> Idle
///                 |    ^
///                 +----+ extend
/// ```
/// `extend` and `end` are ignored while idle, so dropped or reordered pointer
/// events never corrupt the surface.
#[derive(Debug, Default)]
pub struct StrokeRenderer {
    active: Option<ActiveStroke>,
}

impl StrokeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn current_state_name(&self) -> &'static str {
        if self.is_active() { "Active" } else { "Idle" }
    }

    /// Open a new path at `point`. A pen immediately leaves a dot so single
    /// clicks are visible. Beginning while already active discards the old
    /// stroke without capturing it.
    pub fn begin_stroke(&mut self, surface: &mut RasterSurface, tool: ToolConfig, point: Pos2) {
        if self.active.is_some() {
            log::debug!("Stroke restarted before the previous one ended");
        }
        surface.set_mode(tool.composite_mode());

        let mut stroke = ActiveStroke {
            tool,
            points: vec![point],
            dirty: None,
        };
        if let ToolConfig::Pen { color, width } = tool {
            stroke.mark_dirty(surface.stroke_segment(point, point, width, color));
        }
        log::debug!("Stroke began at ({:.1}, {:.1}) with {:?}", point.x, point.y, tool);
        self.active = Some(stroke);
    }

    /// Rasterize a straight segment from the last point to `point`.
    ///
    /// For the eraser, the ruled background is repainted over the erased
    /// region right after the erase has been composited.
    pub fn extend_stroke(&mut self, surface: &mut RasterSurface, background: &BackgroundPattern, point: Pos2) {
        let Some(stroke) = self.active.as_mut() else {
            return;
        };

        let from = stroke.last_point();
        surface.set_mode(stroke.tool.composite_mode());
        let dirty = surface.stroke_segment(from, point, stroke.tool.width(), stroke.tool.source_color());

        if let (ToolConfig::Eraser { .. }, Some(erased)) = (stroke.tool, dirty) {
            background.paint_within(surface, erased);
        }

        stroke.points.push(point);
        stroke.mark_dirty(dirty);
    }

    /// Finish the stroke. Returns `None` if no stroke was active.
    pub fn end_stroke(&mut self, surface: &mut RasterSurface) -> Option<CompletedStroke> {
        let stroke = self.active.take()?;
        surface.set_mode(CompositeMode::SourceOver);
        log::debug!("Stroke ended after {} points", stroke.points.len());
        Some(CompletedStroke {
            tool: stroke.tool,
            points: stroke.points,
            dirty: stroke.dirty,
        })
    }

    /// Drop the active stroke without producing a result
    pub fn cancel(&mut self, surface: &mut RasterSurface) {
        if self.active.take().is_some() {
            surface.set_mode(CompositeMode::SourceOver);
        }
    }
}
