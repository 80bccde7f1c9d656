use crate::snapshot::RasterSnapshot;

/// Linear history of full-surface snapshots for the sheet being edited.
///
/// `cursor` points at the snapshot that matches the surface. Pushing while
/// the cursor is not at the end discards everything after it first, so a
/// redo branch never survives a new edit.
#[derive(Debug, Clone, Default)]
pub struct HistoryStack {
    entries: Vec<RasterSnapshot>,
    cursor: Option<usize>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: RasterSnapshot) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);
        self.entries.push(snapshot);
        self.cursor = Some(self.entries.len() - 1);
    }

    pub fn current(&self) -> Option<&RasterSnapshot> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    /// Index of the current entry, `None` when empty
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RasterSnapshot] {
        &self.entries
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    /// Move the cursor one step back and return the snapshot there
    pub fn undo(&mut self) -> Option<&RasterSnapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor = self.cursor.map(|c| c - 1);
        self.current()
    }

    /// Move the cursor one step forward and return the snapshot there
    pub fn redo(&mut self) -> Option<&RasterSnapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor = self.cursor.map(|c| c + 1);
        self.current()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}
