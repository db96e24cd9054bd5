pub mod command;
pub mod editor;
pub mod view;

use crate::analysis::{AnalysisSurface, AnalysisTicket};
use crate::app::command::{Command, ConfirmPrompt};
use crate::app::editor::EditorSession;
use crate::app::view::{ViewSnapshot, ViewState};
use crate::error::AnalysisError;
use crate::journal::archive;
use crate::journal::audit;
use crate::journal::store::EntryStore;
use anyhow::Result;

/// The owning application controller.
///
/// Holds the entry store, the view state, the optional editor session and
/// the analysis surface; all state reachable from handlers lives here, not
/// in globals. User actions arrive as typed [`Command`]s and every mutation
/// runs to durable completion before the next one can interleave.
pub struct App {
    store: EntryStore,
    view: ViewState,
    editor: Option<EditorSession>,
    analysis: AnalysisSurface,
}

impl App {
    pub fn new(store: EntryStore) -> Self {
        Self {
            store,
            view: ViewState::Home,
            editor: None,
            analysis: AnalysisSurface::new(),
        }
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn editor(&self) -> Option<&EditorSession> {
        self.editor.as_ref()
    }

    pub fn analysis(&self) -> &AnalysisSurface {
        &self.analysis
    }

    /// The current level's projection, recomputed from the store. Callers
    /// re-invoke after any dispatch; nothing is cached to go stale.
    pub fn snapshot(&self) -> ViewSnapshot {
        view::snapshot(&self.view, &self.store)
    }

    pub fn dispatch(&mut self, command: Command, confirm: &dyn ConfirmPrompt) -> Result<()> {
        match command {
            Command::SelectYear(year) => self.view.select_year(year),
            Command::SelectMonth(month0) => self.view.select_month(month0),
            Command::Back => self.view.back(),
            Command::OpenEntry(date) => {
                self.editor = Some(EditorSession::open(&self.store, date));
            }
            Command::DraftChanged(text) => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.draft_changed(&mut self.store, &text)?;
                }
            }
            Command::SaveEntry => {
                if let Some(editor) = &self.editor {
                    let date = editor.date();
                    if editor.save(&mut self.store)? {
                        self.editor = None;
                        self.audit("editor", "saved", &date.to_string());
                    }
                }
            }
            Command::CloseEditor => {
                // Pure state clear: autosave already wrote every change
                // through, so close never re-persists the draft.
                self.editor = None;
            }
            Command::DeleteOpenEntry => {
                if let Some(editor) = &self.editor {
                    let date = editor.date();
                    if !confirm.confirm("Delete this entry?") {
                        return Ok(());
                    }
                    self.store.delete(date)?;
                    self.editor = None;
                    // The day or month being viewed may have just emptied;
                    // the days list is still a safe scope, anything else
                    // falls back to the years list.
                    if !matches!(self.view, ViewState::Days { .. }) {
                        self.view = ViewState::Home;
                    }
                    self.audit("store", "deleted", &date.to_string());
                }
            }
            Command::DeleteYear(year) => {
                if confirm.confirm(&format!("Delete all entries from {year}?")) {
                    let removed = self.store.delete_year(year)?;
                    self.audit(
                        "store",
                        "cascade_deleted",
                        &format!("year={year} removed={removed}"),
                    );
                }
            }
            Command::DeleteMonth { year, month0 } => {
                let label = format!("Delete {} {year}?", archive::month_name(month0));
                if confirm.confirm(&label) {
                    let removed = self.store.delete_month(year, month0)?;
                    self.audit(
                        "store",
                        "cascade_deleted",
                        &format!("year={year} month0={month0} removed={removed}"),
                    );
                }
            }
            Command::DeleteDay(date) => {
                if confirm.confirm("Delete this entry?") && self.store.delete(date)? {
                    self.audit("store", "deleted", &date.to_string());
                }
            }
        }
        Ok(())
    }

    /// Open the analysis surface and, for a non-empty store, hand back the
    /// ticket and prompt for the round-trip. The caller runs
    /// [`crate::analysis::AnalysisClient::analyze`] on its own thread so
    /// navigation and editing stay interactive, then reports back through
    /// [`Self::finish_analysis`].
    pub fn begin_analysis(&mut self) -> Option<(AnalysisTicket, String)> {
        let out = self.analysis.begin(&self.store);
        if out.is_some() {
            self.audit(
                "analysis",
                "requested",
                &format!("entries={}", self.store.len()),
            );
        }
        out
    }

    pub fn finish_analysis(
        &mut self,
        ticket: AnalysisTicket,
        outcome: Result<String, AnalysisError>,
    ) {
        let status = if outcome.is_ok() { "succeeded" } else { "failed" };
        self.audit("analysis", status, "");
        self.analysis.complete(ticket, outcome);
    }

    pub fn dismiss_analysis(&mut self) {
        self.analysis.dismiss();
    }

    // Best-effort: an audit failure never affects the operation it records.
    fn audit(&self, phase: &str, status: &str, message: &str) {
        let _ = audit::append_event(self.store.paths(), phase, status, message);
    }
}
