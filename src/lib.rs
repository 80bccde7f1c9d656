#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod background;
pub mod color;
pub mod components;
pub mod config;
pub mod document;
pub mod error;
pub mod history;
pub mod id_generator;
pub mod input;
pub mod panels;
pub mod persistence;
pub mod renderer;
pub mod snapshot;
pub mod stroke;
pub mod surface;
pub mod tools;
pub mod whiteboard;

pub use app::WhiteboardApp;
pub use background::BackgroundPattern;
pub use config::WhiteboardConfig;
pub use document::{Document, Notebook, Sheet};
pub use error::{Result, WhiteboardError};
pub use history::HistoryStack;
pub use input::{InputEvent, InputHandler, PointerSource};
pub use persistence::{FileStore, KeyValueStore, MemoryStore, PersistenceGateway};
pub use renderer::CanvasRenderer;
pub use snapshot::RasterSnapshot;
pub use stroke::{StrokeRenderer, ToolConfig};
pub use surface::{CompositeMode, RasterSurface};
pub use tools::{ToolKind, ToolSettings};
pub use whiteboard::{EraserCursor, Whiteboard};
