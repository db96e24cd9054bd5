//! Client for the narrative analysis backend.
//!
//! The backend is an external collaborator: it accepts the serialized entry
//! collection as one prompt block and returns either a markdown narrative or
//! an error payload. This module builds the prompt, performs the single
//! blocking round-trip, and guards the display surface against late
//! responses landing after a dismissal.

use crate::error::AnalysisError;
use crate::journal::config::AnalysisConfig;
use crate::journal::store::EntryStore;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

const PROMPT_HEADER: &str =
    "Analyze the following journal entries chronologically. Return result in Markdown.\n\nDATA:\n";

/// Serialize every entry, oldest first, into the prompt block the backend
/// expects. Chronological order is mandatory; the analysis is defined as a
/// trend analysis over time. `None` when there is nothing to analyze.
pub fn build_prompt(store: &EntryStore) -> Option<String> {
    if store.is_empty() {
        return None;
    }

    let mut prompt = String::from(PROMPT_HEADER);
    for entry in store.entries() {
        prompt.push_str(&format!(
            "[Date: {}] Content: {}\n",
            entry.date, entry.content
        ));
    }
    Some(prompt)
}

#[derive(Debug, Clone)]
pub struct AnalysisClient {
    endpoint: String,
    timeout: Duration,
}

impl AnalysisClient {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    /// One `POST {"journals": prompt}` round-trip. Never retried. A non-2xx
    /// response surfaces the backend's own `error` string verbatim when one
    /// is present; a 2xx response without a `result` field is a failure of
    /// the same severity.
    pub fn analyze(&self, prompt: &str) -> Result<String, AnalysisError> {
        let payload = serde_json::json!({ "journals": prompt });

        let client = Client::builder().timeout(self.timeout).build()?;
        let response = client.post(&self.endpoint).json(&payload).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text()?;
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|json| {
                    json.get("error")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or_else(|| format!("analysis backend returned status {status}"));
            return Err(AnalysisError::Backend(message));
        }

        let json: Value = response.json()?;
        extract_result(&json)
    }
}

fn extract_result(json: &Value) -> Result<String, AnalysisError> {
    json.get("result")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(AnalysisError::MissingResult)
}

/// What the analysis display surface currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisDisplay {
    Closed,
    Pending,
    NothingToAnalyze,
    Narrative(String),
    Failed(String),
}

/// Claim on one in-flight request; stale tickets are inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTicket {
    generation: u64,
}

/// The isolated display surface for analysis results.
///
/// The round-trip may suspend while the rest of the system stays
/// interactive, so the user can dismiss the surface before the response
/// arrives. Each `begin` issues a generation ticket; `complete` applies an
/// outcome only if the surface is still open on that generation, which makes
/// a late response after `dismiss` a discard instead of a write into a
/// closed surface. The surface never touches the entry store or view state.
#[derive(Debug)]
pub struct AnalysisSurface {
    display: AnalysisDisplay,
    generation: u64,
}

impl AnalysisSurface {
    pub fn new() -> Self {
        Self {
            display: AnalysisDisplay::Closed,
            generation: 0,
        }
    }

    pub fn display(&self) -> &AnalysisDisplay {
        &self.display
    }

    /// Open the surface for a new request. With an empty store the surface
    /// shows the empty state and no ticket is issued: no request may be
    /// sent. Otherwise the caller gets the ticket and the prompt to run the
    /// round-trip with, on whatever thread suits it.
    pub fn begin(&mut self, store: &EntryStore) -> Option<(AnalysisTicket, String)> {
        self.generation += 1;
        let Some(prompt) = build_prompt(store) else {
            self.display = AnalysisDisplay::NothingToAnalyze;
            return None;
        };
        self.display = AnalysisDisplay::Pending;
        Some((
            AnalysisTicket {
                generation: self.generation,
            },
            prompt,
        ))
    }

    /// Apply a finished round-trip. Outcomes for a dismissed or superseded
    /// request are discarded.
    pub fn complete(&mut self, ticket: AnalysisTicket, outcome: Result<String, AnalysisError>) {
        if ticket.generation != self.generation || self.display != AnalysisDisplay::Pending {
            return;
        }
        self.display = match outcome {
            Ok(narrative) => AnalysisDisplay::Narrative(narrative),
            Err(err) => AnalysisDisplay::Failed(err.to_string()),
        };
    }

    /// Close the surface and invalidate any outstanding ticket.
    pub fn dismiss(&mut self) {
        self.generation += 1;
        self.display = AnalysisDisplay::Closed;
    }
}

impl Default for AnalysisSurface {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{AnalysisDisplay, AnalysisSurface, build_prompt, extract_result};
    use crate::error::AnalysisError;
    use crate::journal::paths::JournalPaths;
    use crate::journal::store::EntryStore;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid date")
    }

    #[test]
    fn prompt_lists_entries_chronologically() {
        let tmp = tempdir().expect("tempdir");
        let mut store = EntryStore::open(JournalPaths::rooted(tmp.path())).expect("open store");
        store.upsert(date("2024-02-10"), "B").expect("insert");
        store.upsert(date("2024-01-05"), "A").expect("insert");

        let prompt = build_prompt(&store).expect("non-empty store");

        let a = prompt.find("[Date: 2024-01-05] Content: A").expect("A line");
        let b = prompt.find("[Date: 2024-02-10] Content: B").expect("B line");
        assert!(a < b);
        assert!(prompt.starts_with("Analyze the following journal entries"));
    }

    #[test]
    fn empty_store_builds_no_prompt() {
        let tmp = tempdir().expect("tempdir");
        let store = EntryStore::open(JournalPaths::rooted(tmp.path())).expect("open store");
        assert!(build_prompt(&store).is_none());
    }

    #[test]
    fn result_extraction_requires_the_result_field() {
        let ok = serde_json::json!({ "result": "## Trends" });
        assert_eq!(extract_result(&ok).expect("present"), "## Trends");

        let missing = serde_json::json!({ "ok": true });
        assert!(matches!(
            extract_result(&missing),
            Err(AnalysisError::MissingResult)
        ));

        let wrong_type = serde_json::json!({ "result": 7 });
        assert!(extract_result(&wrong_type).is_err());
    }

    #[test]
    fn begin_with_empty_store_issues_no_ticket() {
        let tmp = tempdir().expect("tempdir");
        let store = EntryStore::open(JournalPaths::rooted(tmp.path())).expect("open store");
        let mut surface = AnalysisSurface::new();

        assert!(surface.begin(&store).is_none());
        assert_eq!(surface.display(), &AnalysisDisplay::NothingToAnalyze);
    }

    #[test]
    fn completion_applies_only_to_a_live_ticket() {
        let tmp = tempdir().expect("tempdir");
        let mut store = EntryStore::open(JournalPaths::rooted(tmp.path())).expect("open store");
        store.upsert(date("2024-01-05"), "A").expect("insert");
        let mut surface = AnalysisSurface::new();

        let (ticket, _prompt) = surface.begin(&store).expect("ticket");
        assert_eq!(surface.display(), &AnalysisDisplay::Pending);

        surface.complete(ticket, Ok("## Narrative".to_string()));
        assert_eq!(
            surface.display(),
            &AnalysisDisplay::Narrative("## Narrative".to_string())
        );
    }

    #[test]
    fn late_response_after_dismiss_is_discarded() {
        let tmp = tempdir().expect("tempdir");
        let mut store = EntryStore::open(JournalPaths::rooted(tmp.path())).expect("open store");
        store.upsert(date("2024-01-05"), "A").expect("insert");
        let mut surface = AnalysisSurface::new();

        let (ticket, _prompt) = surface.begin(&store).expect("ticket");
        surface.dismiss();
        surface.complete(ticket, Ok("too late".to_string()));

        assert_eq!(surface.display(), &AnalysisDisplay::Closed);
    }

    #[test]
    fn superseded_ticket_cannot_overwrite_a_newer_request() {
        let tmp = tempdir().expect("tempdir");
        let mut store = EntryStore::open(JournalPaths::rooted(tmp.path())).expect("open store");
        store.upsert(date("2024-01-05"), "A").expect("insert");
        let mut surface = AnalysisSurface::new();

        let (stale, _) = surface.begin(&store).expect("ticket");
        let (_live, _) = surface.begin(&store).expect("ticket");

        surface.complete(stale, Err(AnalysisError::MissingResult));
        assert_eq!(surface.display(), &AnalysisDisplay::Pending);
    }

    #[test]
    fn failure_display_carries_the_message_verbatim() {
        let tmp = tempdir().expect("tempdir");
        let mut store = EntryStore::open(JournalPaths::rooted(tmp.path())).expect("open store");
        store.upsert(date("2024-01-05"), "A").expect("insert");
        let mut surface = AnalysisSurface::new();

        let (ticket, _) = surface.begin(&store).expect("ticket");
        surface.complete(ticket, Err(AnalysisError::Backend("rate limited".to_string())));

        assert_eq!(
            surface.display(),
            &AnalysisDisplay::Failed("rate limited".to_string())
        );
    }
}
