use crate::journal::entry::JournalEntry;
use crate::journal::paths::JournalPaths;
use crate::journal::util::now_epoch_millis;
use crate::journal::warn;
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use fs2::FileExt;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};

/// The authoritative collection of journal entries.
///
/// At most one entry exists per calendar date, and no persisted entry ever
/// has empty trimmed content. Persistence is write-through: every mutation
/// serializes the full collection to the data file before returning, so the
/// file is durable the moment a mutating call completes.
pub struct EntryStore {
    paths: JournalPaths,
    entries: BTreeMap<NaiveDate, JournalEntry>,
    // Exclusive advisory lock held for the store's lifetime. All mutation
    // goes through &mut self, so one process-wide store is the single
    // writer.
    _lock: File,
}

impl EntryStore {
    /// Open (or create) the store under `paths`.
    ///
    /// A missing data file yields an empty store. An unparsable data file
    /// also yields an empty store: corrupt persisted state is reset rather
    /// than surfaced, with a warning line as the only trace. Fails if
    /// another process already holds the store open.
    pub fn open(paths: JournalPaths) -> Result<Self> {
        if let Some(parent) = paths.data_file.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&paths.lock_file)
            .with_context(|| format!("failed to open {}", paths.lock_file.display()))?;
        lock.try_lock_exclusive().with_context(|| {
            format!(
                "journal data file {} is already open in another process",
                paths.data_file.display()
            )
        })?;

        let entries = load_entries(&paths);
        Ok(Self {
            paths,
            entries,
            _lock: lock,
        })
    }

    pub fn paths(&self) -> &JournalPaths {
        &self.paths
    }

    pub fn get(&self, date: NaiveDate) -> Option<&JournalEntry> {
        self.entries.get(&date)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, ascending by date.
    pub fn entries(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.values()
    }

    /// Insert or replace the entry for `date` and persist. Content that
    /// trims to empty is a no-op returning `Ok(false)`: callers may upsert
    /// on every keystroke without ever creating a phantom empty record or
    /// blanking a stored one. A replace keeps the original id; only an
    /// insert mints a fresh one.
    pub fn upsert(&mut self, date: NaiveDate, content: &str) -> Result<bool> {
        if content.trim().is_empty() {
            return Ok(false);
        }

        match self.entries.get_mut(&date) {
            Some(entry) => entry.content = content.to_string(),
            None => {
                let id = self.fresh_id()?;
                self.entries.insert(
                    date,
                    JournalEntry {
                        date,
                        content: content.to_string(),
                        id,
                    },
                );
            }
        }
        self.persist()?;
        Ok(true)
    }

    /// Remove the entry for `date` if present. Absent is not an error;
    /// returns whether anything was removed.
    pub fn delete(&mut self, date: NaiveDate) -> Result<bool> {
        if self.entries.remove(&date).is_none() {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Bulk removal by date predicate, used for the year/month cascade
    /// deletes. Persists once and returns the count removed.
    pub fn delete_where(&mut self, predicate: impl Fn(NaiveDate) -> bool) -> Result<usize> {
        let before = self.entries.len();
        self.entries.retain(|date, _| !predicate(*date));
        let removed = before - self.entries.len();
        if removed > 0 {
            self.persist()?;
        }
        Ok(removed)
    }

    pub fn delete_year(&mut self, year: i32) -> Result<usize> {
        self.delete_where(|date| date.year() == year)
    }

    pub fn delete_month(&mut self, year: i32, month0: u32) -> Result<usize> {
        self.delete_where(move |date| date.year() == year && date.month0() == month0)
    }

    // Ids are epoch millis; a second insert in the same millisecond bumps
    // past the current maximum so an id is never reused.
    fn fresh_id(&self) -> Result<u64> {
        let now = now_epoch_millis()?;
        let max = self.entries.values().map(|e| e.id).max().unwrap_or(0);
        Ok(now.max(max + 1))
    }

    fn persist(&self) -> Result<()> {
        let records: Vec<&JournalEntry> = self.entries.values().collect();
        let data = serde_json::to_string_pretty(&records)?;
        fs::write(&self.paths.data_file, format!("{data}\n"))
            .with_context(|| format!("failed to write {}", self.paths.data_file.display()))?;
        Ok(())
    }
}

fn load_entries(paths: &JournalPaths) -> BTreeMap<NaiveDate, JournalEntry> {
    let file = &paths.data_file;
    if !file.exists() {
        return BTreeMap::new();
    }

    let raw = match fs::read_to_string(file) {
        Ok(raw) => raw,
        Err(err) => {
            warn::emit("data_unreadable", &file.display().to_string(), &err.to_string());
            return BTreeMap::new();
        }
    };
    let records: Vec<JournalEntry> = match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(err) => {
            warn::emit("data_corrupt", &file.display().to_string(), &err.to_string());
            return BTreeMap::new();
        }
    };

    let mut entries = BTreeMap::new();
    for record in records {
        // Re-assert the store invariants on the way in: no empty content,
        // duplicate dates collapse last-record-wins.
        if record.content.trim().is_empty() {
            continue;
        }
        entries.insert(record.date, record);
    }
    entries
}
