//! Notebook → Sheet hierarchy with one raster snapshot per sheet.
//!
//! Every mutating operation takes `&self` and returns a new [`Document`],
//! leaving the original untouched. Snapshots are reference counted, so the
//! copies are shallow where it matters.

mod ordered_map;

pub use ordered_map::{Keyed, OrderedMap};

use serde::{Deserialize, Serialize};

use crate::error::{Result, WhiteboardError};
use crate::id_generator::IdGenerator;
use crate::snapshot::RasterSnapshot;

pub const DEFAULT_NOTEBOOK_ID: &str = "notebook-1";
pub const DEFAULT_NOTEBOOK_NAME: &str = "My Notebook";
pub const DEFAULT_SHEET_ID: &str = "sheet-1";

/// One drawing page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub id: String,
    pub name: String,
    /// Absent until the first stroke or clear completes on this sheet
    #[serde(rename = "canvasData")]
    pub canvas_data: Option<RasterSnapshot>,
}

impl Sheet {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            canvas_data: None,
        }
    }
}

impl Keyed for Sheet {
    fn key(&self) -> &str {
        &self.id
    }
}

/// A named collection of sheets, never empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub id: String,
    pub name: String,
    pub sheets: OrderedMap<Sheet>,
}

impl Notebook {
    fn with_first_sheet(id: String, name: String, sheet_id: String) -> Self {
        let mut sheets = OrderedMap::new();
        sheets.insert(Sheet::new(sheet_id, "Sheet 1"));
        Self { id, name, sheets }
    }

    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }
}

impl Keyed for Notebook {
    fn key(&self) -> &str {
        &self.id
    }
}

/// The whole persisted state: notebooks plus the active notebook and sheet.
///
/// Serialized as
/// `{"notebooks": {...}, "currentNotebook": id, "currentSheet": id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    notebooks: OrderedMap<Notebook>,
    #[serde(rename = "currentNotebook")]
    active_notebook_id: String,
    #[serde(rename = "currentSheet")]
    active_sheet_id: String,
    #[serde(skip)]
    ids: IdGenerator,
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        // the id counter is session state, not content
        self.notebooks == other.notebooks
            && self.active_notebook_id == other.active_notebook_id
            && self.active_sheet_id == other.active_sheet_id
    }
}

impl Default for Document {
    /// One notebook holding one empty sheet, both active
    fn default() -> Self {
        let mut notebooks = OrderedMap::new();
        notebooks.insert(Notebook::with_first_sheet(
            DEFAULT_NOTEBOOK_ID.to_owned(),
            DEFAULT_NOTEBOOK_NAME.to_owned(),
            DEFAULT_SHEET_ID.to_owned(),
        ));
        Self {
            notebooks,
            active_notebook_id: DEFAULT_NOTEBOOK_ID.to_owned(),
            active_sheet_id: DEFAULT_SHEET_ID.to_owned(),
            ids: IdGenerator::new(),
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notebooks(&self) -> &OrderedMap<Notebook> {
        &self.notebooks
    }

    pub fn notebook(&self, id: &str) -> Option<&Notebook> {
        self.notebooks.get(id)
    }

    pub fn active_notebook_id(&self) -> &str {
        &self.active_notebook_id
    }

    pub fn active_sheet_id(&self) -> &str {
        &self.active_sheet_id
    }

    pub fn active_notebook(&self) -> Option<&Notebook> {
        self.notebooks.get(&self.active_notebook_id)
    }

    pub fn active_sheet(&self) -> Option<&Sheet> {
        self.active_notebook()?.sheets.get(&self.active_sheet_id)
    }

    /// Snapshot stored on the active sheet, if any
    pub fn load_active_snapshot(&self) -> Option<&RasterSnapshot> {
        self.active_sheet()?.canvas_data.as_ref()
    }

    fn sheet_id_taken(&self, id: &str) -> bool {
        self.notebooks.iter().any(|n| n.sheets.contains_key(id))
    }

    /// Add a notebook with one sheet named "Sheet 1" and make both active
    pub fn create_notebook(&self) -> (Document, String) {
        let mut next = self.clone();
        let notebook_id = next.ids.generate("notebook", |id| self.notebooks.contains_key(id));
        let sheet_id = next.ids.generate("sheet", |id| self.sheet_id_taken(id));
        let name = format!("Notebook {}", self.notebooks.len() + 1);

        log::info!("Created notebook {notebook_id} ({name})");
        next.notebooks
            .insert(Notebook::with_first_sheet(notebook_id.clone(), name, sheet_id.clone()));
        next.active_notebook_id = notebook_id.clone();
        next.active_sheet_id = sheet_id;
        (next, notebook_id)
    }

    /// Append a sheet named "Sheet N" to `notebook_id` and make it active
    pub fn create_sheet(&self, notebook_id: &str) -> Result<(Document, String)> {
        let notebook = self
            .notebooks
            .get(notebook_id)
            .ok_or_else(|| WhiteboardError::notebook(notebook_id))?;
        let name = format!("Sheet {}", notebook.sheets.len() + 1);

        let mut next = self.clone();
        let sheet_id = next.ids.generate("sheet", |id| self.sheet_id_taken(id));
        let target = next
            .notebooks
            .get_mut(notebook_id)
            .ok_or_else(|| WhiteboardError::notebook(notebook_id))?;
        target.sheets.insert(Sheet::new(sheet_id.clone(), name));

        log::info!("Created sheet {sheet_id} in {notebook_id}");
        next.active_notebook_id = notebook_id.to_owned();
        next.active_sheet_id = sheet_id.clone();
        Ok((next, sheet_id))
    }

    /// Activate a notebook and its first sheet. The sheet that was active in
    /// that notebook before is not remembered.
    pub fn switch_notebook(&self, notebook_id: &str) -> Result<Document> {
        let notebook = self
            .notebooks
            .get(notebook_id)
            .ok_or_else(|| WhiteboardError::notebook(notebook_id))?;
        let first = notebook
            .first_sheet()
            .ok_or_else(|| WhiteboardError::sheet(""))?;

        let mut next = self.clone();
        next.active_notebook_id = notebook_id.to_owned();
        next.active_sheet_id = first.id.clone();
        log::info!("Switched to notebook {notebook_id}, sheet {}", first.id);
        Ok(next)
    }

    /// Activate a sheet of the active notebook
    pub fn switch_sheet(&self, sheet_id: &str) -> Result<Document> {
        let owned = self
            .active_notebook()
            .is_some_and(|n| n.sheets.contains_key(sheet_id));
        if !owned {
            return Err(WhiteboardError::sheet(sheet_id));
        }

        let mut next = self.clone();
        next.active_sheet_id = sheet_id.to_owned();
        log::info!("Switched to sheet {sheet_id}");
        Ok(next)
    }

    /// Overwrite the snapshot of one sheet
    pub fn store_snapshot(&self, notebook_id: &str, sheet_id: &str, snapshot: RasterSnapshot) -> Result<Document> {
        let mut next = self.clone();
        let sheet = next
            .notebooks
            .get_mut(notebook_id)
            .ok_or_else(|| WhiteboardError::notebook(notebook_id))?
            .sheets
            .get_mut(sheet_id)
            .ok_or_else(|| WhiteboardError::sheet(sheet_id))?;
        sheet.canvas_data = Some(snapshot);
        Ok(next)
    }

    /// Check the structural invariants of a document read from storage.
    ///
    /// Empty documents and sheet-less notebooks are rejected. Active ids
    /// that point nowhere are repaired to the first notebook and its first
    /// sheet.
    pub fn validated(mut self) -> Result<Document> {
        if self.notebooks.is_empty() {
            return Err(WhiteboardError::PersistenceReadFailure("document has no notebooks".to_owned()));
        }
        if let Some(empty) = self.notebooks.iter().find(|n| n.sheets.is_empty()) {
            return Err(WhiteboardError::PersistenceReadFailure(format!(
                "notebook {} has no sheets",
                empty.id
            )));
        }

        if self.active_sheet().is_none() {
            let notebook = self
                .active_notebook()
                .or_else(|| self.notebooks.first())
                .ok_or_else(|| WhiteboardError::notebook(&self.active_notebook_id))?;
            let sheet = notebook.first_sheet().ok_or_else(|| WhiteboardError::sheet(""))?;
            log::warn!(
                "Stored active ids {}/{} are dangling; using {}/{}",
                self.active_notebook_id,
                self.active_sheet_id,
                notebook.id,
                sheet.id
            );
            let (notebook_id, sheet_id) = (notebook.id.clone(), sheet.id.clone());
            self.active_notebook_id = notebook_id;
            self.active_sheet_id = sheet_id;
        }
        Ok(self)
    }
}
