use chrono::NaiveDate;

/// A typed user action consumed by [`crate::App::dispatch`].
///
/// UI widgets translate clicks and keystrokes into these; nothing in the
/// core is reachable through shared handler closures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SelectYear(i32),
    SelectMonth(u32),
    Back,
    /// Open the editor for a date, via the picker or a day card. Does not
    /// change the view level and does not create an entry.
    OpenEntry(NaiveDate),
    /// The editor buffer changed; write-through autosave runs immediately.
    DraftChanged(String),
    SaveEntry,
    CloseEditor,
    /// The editor's own delete control, scoped to the open entry.
    DeleteOpenEntry,
    DeleteYear(i32),
    DeleteMonth { year: i32, month0: u32 },
    DeleteDay(NaiveDate),
}

/// Yes/no decision for destructive operations. The dialog widget is a UI
/// concern; the core only needs the answer injected.
pub trait ConfirmPrompt {
    fn confirm(&self, message: &str) -> bool;
}

/// Confirms everything. For embedders without an interactive prompt, and
/// for tests.
pub struct AlwaysConfirm;

impl ConfirmPrompt for AlwaysConfirm {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}
