//! The drawing session: owns the current [`Document`], the live raster
//! surface and the per-sheet history, and turns UI intents and pointer
//! events into calls on the pure document operations.
//!
//! # Ordering
//!
//! Restoring a sheet (clear, paint background, composite the stored
//! snapshot) is queued when the active sheet changes and settled either by
//! [`Whiteboard::poll`] or, at the latest, right before the next stroke
//! begins. A newer switch replaces a queued restore, so the last switch
//! wins. Resizes are debounced the same way and are always applied before a
//! stroke starts.

use egui::{Pos2, Rect};

use crate::background::BackgroundPattern;
use crate::config::WhiteboardConfig;
use crate::document::Document;
use crate::error::Result;
use crate::history::HistoryStack;
use crate::input::{InputEvent, map_to_surface};
use crate::persistence::{KeyValueStore, PersistenceGateway};
use crate::snapshot::RasterSnapshot;
use crate::stroke::{CompletedStroke, StrokeRenderer};
use crate::surface::RasterSurface;
use crate::tools::{ToolKind, ToolSettings};

/// Circle drawn under the pointer while erasing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EraserCursor {
    pub center: Pos2,
    pub diameter: f32,
}

#[derive(Debug)]
struct PendingRestore {
    sheet_id: String,
    snapshot: Option<RasterSnapshot>,
}

#[derive(Debug, Clone, Copy)]
struct PendingResize {
    width: u32,
    height: u32,
    requested_at: f64,
}

pub struct Whiteboard {
    config: WhiteboardConfig,
    document: Document,
    gateway: PersistenceGateway,
    store: Box<dyn KeyValueStore>,
    surface: RasterSurface,
    background: BackgroundPattern,
    strokes: StrokeRenderer,
    history: HistoryStack,
    tools: ToolSettings,
    pending_restore: Option<PendingRestore>,
    pending_resize: Option<PendingResize>,
    pointer_pos: Option<Pos2>,
    pointer_over_surface: bool,
}

impl std::fmt::Debug for Whiteboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Whiteboard")
            .field("active_notebook", &self.document.active_notebook_id())
            .field("active_sheet", &self.document.active_sheet_id())
            .field("surface", &(self.surface.width(), self.surface.height()))
            .field("stroke", &self.strokes.current_state_name())
            .field("history_len", &self.history.len())
            .field("tool", &self.tools.active())
            .finish()
    }
}

impl Whiteboard {
    /// Start a session from whatever `store` holds, or a fresh document.
    ///
    /// The active sheet's snapshot is queued for restore; call
    /// [`Self::poll`] (or just start drawing) to settle it.
    pub fn new(config: WhiteboardConfig, store: Box<dyn KeyValueStore>) -> Self {
        let gateway = PersistenceGateway::new(config.storage_key.clone());
        let document = gateway.load(&*store);
        let background = BackgroundPattern::from_config(&config.paper);
        let mut surface = RasterSurface::new(config.initial_width, config.initial_height);
        background.paint(&mut surface);

        let mut whiteboard = Self {
            tools: ToolSettings::from_defaults(&config.tools),
            config,
            document,
            gateway,
            store,
            surface,
            background,
            strokes: StrokeRenderer::new(),
            history: HistoryStack::new(),
            pending_restore: None,
            pending_resize: None,
            pointer_pos: None,
            pointer_over_surface: false,
        };
        whiteboard.schedule_restore();
        whiteboard
    }

    pub fn config(&self) -> &WhiteboardConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    /// Changes whenever the surface pixels change
    pub fn surface_version(&self) -> u64 {
        self.surface.version()
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn tools(&self) -> &ToolSettings {
        &self.tools
    }

    pub fn background(&self) -> &BackgroundPattern {
        &self.background
    }

    pub fn is_drawing(&self) -> bool {
        self.strokes.is_active()
    }

    pub fn is_restore_pending(&self) -> bool {
        self.pending_restore.is_some()
    }

    pub fn is_resize_pending(&self) -> bool {
        self.pending_resize.is_some()
    }

    pub fn eraser_cursor(&self) -> Option<EraserCursor> {
        if self.tools.active() != ToolKind::Eraser || !self.pointer_over_surface {
            return None;
        }
        self.pointer_pos.map(|center| EraserCursor {
            center,
            diameter: self.tools.eraser_width(),
        })
    }

    // ---- tool intents ----

    pub fn select_tool(&mut self, tool: ToolKind) {
        self.tools.select(tool);
    }

    pub fn set_pen_color(&mut self, color: &str) -> Result<()> {
        self.tools.set_pen_color(color)
    }

    pub fn set_pen_width(&mut self, width: f32) {
        self.tools.set_pen_width(width);
    }

    pub fn set_eraser_width(&mut self, width: f32) {
        self.tools.set_eraser_width(width);
    }

    // ---- document intents ----

    pub fn create_notebook(&mut self) -> String {
        self.end_stroke();
        let (document, id) = self.document.create_notebook();
        self.activate(document);
        id
    }

    /// Add a sheet to the active notebook
    pub fn create_sheet(&mut self) -> Result<String> {
        self.end_stroke();
        let (document, id) = self.document.create_sheet(self.document.active_notebook_id())?;
        self.activate(document);
        Ok(id)
    }

    pub fn switch_notebook(&mut self, notebook_id: &str) -> Result<()> {
        self.end_stroke();
        let document = self.document.switch_notebook(notebook_id)?;
        self.activate(document);
        Ok(())
    }

    pub fn switch_sheet(&mut self, sheet_id: &str) -> Result<()> {
        self.end_stroke();
        let document = self.document.switch_sheet(sheet_id)?;
        self.activate(document);
        Ok(())
    }

    /// Wipe the active sheet back to blank ruled paper and record that as a
    /// new snapshot
    pub fn clear_active_sheet(&mut self) {
        self.strokes.cancel(&mut self.surface);
        if let Some(superseded) = self.pending_restore.take() {
            log::debug!("Clear supersedes pending restore of {}", superseded.sheet_id);
        }
        self.surface.clear();
        self.background.paint(&mut self.surface);
        self.capture_active_sheet();
    }

    /// Write the current document to another store, e.g. the eframe app
    /// storage on shutdown
    pub fn save_to(&self, store: &mut dyn KeyValueStore) -> bool {
        self.gateway.save(store, &self.document)
    }

    // ---- pointer input ----

    /// Feed one translated input event. `surface_rect` is where the surface
    /// is shown, in the same coordinates as the event.
    pub fn handle_input(&mut self, event: &InputEvent, surface_rect: Rect) {
        match event {
            InputEvent::PointerDown { source } => {
                if let Some(point) = map_to_surface(source, surface_rect) {
                    self.pointer_pos = Some(point);
                    self.begin_stroke(point);
                }
            }
            InputEvent::PointerMove { source } => {
                if let Some(point) = map_to_surface(source, surface_rect) {
                    self.pointer_pos = Some(point);
                    self.extend_stroke(point);
                }
            }
            InputEvent::PointerUp => {
                self.end_stroke();
            }
            InputEvent::PointerEnter { source } => {
                self.pointer_over_surface = true;
                self.pointer_pos = map_to_surface(source, surface_rect);
            }
            InputEvent::PointerLeave => {
                self.pointer_over_surface = false;
                self.end_stroke();
            }
        }
    }

    /// Start a stroke at a surface-local point with the current tool.
    /// Pending resizes and restores are settled first so nothing they do
    /// can overwrite the new stroke.
    pub fn begin_stroke(&mut self, point: Pos2) {
        self.apply_pending_resize();
        self.settle_restore();
        let tool = self.tools.tool_config();
        self.strokes.begin_stroke(&mut self.surface, tool, point);
    }

    pub fn extend_stroke(&mut self, point: Pos2) {
        self.strokes.extend_stroke(&mut self.surface, &self.background, point);
    }

    /// Finish the stroke and capture the surface into the history and the
    /// active sheet. Returns the finished stroke, or `None` (and does
    /// nothing) when no stroke was active.
    pub fn end_stroke(&mut self) -> Option<CompletedStroke> {
        let stroke = self.strokes.end_stroke(&mut self.surface)?;
        match stroke.dirty {
            Some(r) => log::debug!("Stroke touched pixels {}..{} x {}..{}", r.x0, r.x1, r.y0, r.y1),
            None => log::debug!("Stroke left the surface unchanged"),
        }
        self.capture_active_sheet();
        Some(stroke)
    }

    // ---- lifecycle ----

    /// Ask for a new backing size. Applied by [`Self::poll`] once the
    /// requested size has held for the debounce interval, or before the next
    /// stroke.
    pub fn request_resize(&mut self, width: u32, height: u32, now: f64) {
        if width == self.surface.width() && height == self.surface.height() {
            self.pending_resize = None;
            return;
        }
        // repeating the pending size does not restart the debounce
        if self
            .pending_resize
            .is_some_and(|r| r.width == width && r.height == height)
        {
            return;
        }
        self.pending_resize = Some(PendingResize {
            width,
            height,
            requested_at: now,
        });
    }

    /// Apply due resizes and settle a queued restore. Returns whether the
    /// surface changed.
    pub fn poll(&mut self, now: f64) -> bool {
        let mut changed = false;
        let resize_due = self
            .pending_resize
            .is_some_and(|r| now - r.requested_at >= self.config.resize_debounce_secs);
        if resize_due && !self.strokes.is_active() {
            changed |= self.apply_pending_resize();
        }
        changed |= self.settle_restore();
        changed
    }

    /// Run a queued restore now: clear, paint the background, composite the
    /// stored snapshot. A snapshot that fails to decode leaves a blank ruled
    /// page. Returns whether a restore was pending.
    pub fn settle_restore(&mut self) -> bool {
        let Some(pending) = self.pending_restore.take() else {
            return false;
        };

        self.surface.clear();
        self.background.paint(&mut self.surface);
        if let Some(snapshot) = &pending.snapshot {
            match snapshot.decode() {
                Ok(image) => self.surface.composite(&image),
                Err(e) => log::warn!("Sheet {}: {e}; showing a blank page", pending.sheet_id),
            }
        }
        log::debug!("Restored sheet {}", pending.sheet_id);
        true
    }

    fn apply_pending_resize(&mut self) -> bool {
        let Some(resize) = self.pending_resize.take() else {
            return false;
        };
        if resize.width == self.surface.width() && resize.height == self.surface.height() {
            return false;
        }

        log::debug!("Resizing surface to {}x{}", resize.width, resize.height);
        self.surface.resize(resize.width, resize.height);
        self.background.paint(&mut self.surface);
        // resizing wipes the pixels; bring back what the sheet last stored
        self.schedule_restore();
        true
    }

    fn schedule_restore(&mut self) {
        let pending = PendingRestore {
            sheet_id: self.document.active_sheet_id().to_owned(),
            snapshot: self.document.load_active_snapshot().cloned(),
        };
        if let Some(superseded) = self.pending_restore.replace(pending) {
            log::debug!("Dropped pending restore of {}", superseded.sheet_id);
        }
    }

    /// Replace the document after a switch or creation: persist it, start a
    /// fresh history and queue the new sheet's restore
    fn activate(&mut self, document: Document) {
        self.commit(document);
        self.history.clear();
        self.schedule_restore();
    }

    fn commit(&mut self, document: Document) {
        self.document = document;
        self.gateway.save(&mut *self.store, &self.document);
    }

    fn capture_active_sheet(&mut self) {
        let snapshot = match RasterSnapshot::capture(&self.surface) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("{e}; stroke not recorded");
                return;
            }
        };
        self.history.push(snapshot.clone());

        let stored = self.document.store_snapshot(
            self.document.active_notebook_id(),
            self.document.active_sheet_id(),
            snapshot,
        );
        match stored {
            Ok(document) => self.commit(document),
            Err(e) => log::error!("Active sheet vanished while storing snapshot: {e}"),
        }
    }
}
