use crate::journal::store::EntryStore;
use anyhow::Result;
use chrono::NaiveDate;

/// One open entry's draft buffer.
///
/// Autosave is write-through: every draft change upserts into the store, so
/// the store lags the buffer only between keystrokes. The session itself
/// holds no persistence state; dropping it is the whole close operation.
#[derive(Debug, Clone)]
pub struct EditorSession {
    date: NaiveDate,
    draft: String,
}

impl EditorSession {
    /// Open `date` for editing, hydrating the draft from the store (empty
    /// if no entry exists yet). Opening never creates a store entry.
    pub fn open(store: &EntryStore, date: NaiveDate) -> Self {
        let draft = store
            .get(date)
            .map(|entry| entry.content.clone())
            .unwrap_or_default();
        Self { date, draft }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replace the draft and write it through. The store treats
    /// whitespace-only content as a no-op, so a never-typed-into editor
    /// leaves the store untouched and a transiently empty buffer never
    /// blanks a stored entry.
    pub fn draft_changed(&mut self, store: &mut EntryStore, text: &str) -> Result<()> {
        self.draft = text.to_string();
        store.upsert(self.date, text)?;
        Ok(())
    }

    /// Explicit save. Returns whether the editor should close: a
    /// whitespace-only draft neither persists nor closes, so an accidental
    /// save of nothing cannot dismiss work the user may still want to type.
    pub fn save(&self, store: &mut EntryStore) -> Result<bool> {
        if self.draft.trim().is_empty() {
            return Ok(false);
        }
        store.upsert(self.date, &self.draft)?;
        Ok(true)
    }
}
