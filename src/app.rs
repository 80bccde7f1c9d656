use std::path::{Path, PathBuf};

use crate::config::WhiteboardConfig;
use crate::input::InputHandler;
use crate::panels::{central_panel, notebooks_panel, tools_panel};
use crate::persistence::{EframeStore, FileStore, KeyValueStore, PersistenceGateway};
use crate::renderer::CanvasRenderer;
use crate::whiteboard::Whiteboard;

/// Name the native app registers under; also keys eframe's storage directory
pub const APP_ID: &str = "whiteboard";

fn resolve_state_dir(state_dir: &Path) -> PathBuf {
    if state_dir.is_absolute() {
        return state_dir.to_path_buf();
    }
    match eframe::storage_dir(APP_ID) {
        Some(base) => base.join(state_dir),
        None => {
            log::warn!("No storage directory for {APP_ID}; using {}", state_dir.display());
            state_dir.to_path_buf()
        }
    }
}

/// The eframe application: panels around one [`Whiteboard`] session
pub struct WhiteboardApp {
    pub(crate) whiteboard: Whiteboard,
    pub(crate) renderer: CanvasRenderer,
    pub(crate) input: InputHandler,
    /// Last colour shown in the picker, so edits can be diffed
    pub(crate) picker_color: egui::Color32,
}

impl WhiteboardApp {
    /// Called once before the first frame.
    ///
    /// Documents live in a [`FileStore`]; a relative `state_dir` is placed
    /// under eframe's storage directory for this app. If the file store is
    /// empty, whatever eframe's own storage last held is copied in first.
    pub fn new(cc: &eframe::CreationContext<'_>, config: WhiteboardConfig) -> Self {
        let mut store = FileStore::new(resolve_state_dir(&config.state_dir));
        let fallback = cc.storage.and_then(|storage| storage.get_string(&config.storage_key));
        PersistenceGateway::new(config.storage_key.clone()).seed(&mut store, fallback);
        Self::with_store(config, Box::new(store))
    }

    pub fn with_store(config: WhiteboardConfig, store: Box<dyn KeyValueStore>) -> Self {
        let whiteboard = Whiteboard::new(config, store);
        let picker_color = whiteboard.tools().pen_color_value();
        Self {
            whiteboard,
            renderer: CanvasRenderer::new(),
            input: InputHandler::new(egui::Rect::NOTHING),
            picker_color,
        }
    }

    pub fn whiteboard(&self) -> &Whiteboard {
        &self.whiteboard
    }

    pub fn whiteboard_mut(&mut self) -> &mut Whiteboard {
        &mut self.whiteboard
    }
}

impl eframe::App for WhiteboardApp {
    /// Mirror the document into eframe's own storage as well, which
    /// [`Self::new`] falls back to when the file store is empty
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.whiteboard.save_to(&mut EframeStore(storage));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // a stroke still held down when the window closes is kept
        self.whiteboard.end_stroke();
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        tools_panel(self, ctx);
        notebooks_panel(&mut self.whiteboard, ctx);
        central_panel(self, ctx);
    }
}
