//! Core of a personal journaling client.
//!
//! Users write dated free-text entries, browse them through a
//! year → month → day archive hierarchy, and optionally request an
//! AI-generated narrative analysis of their accumulated entries. This crate
//! owns the entry store and its write-through persistence, the derived
//! archive projections, the navigation state machine, the autosaving editor
//! session, and the analysis backend client. Rendering, dialog widgets and
//! markdown conversion are collaborators that consume the snapshots and
//! traits exposed here.

pub mod analysis;
pub mod app;
pub mod env_loader;
pub mod error;
pub mod journal;

pub use app::App;
pub use app::command::{Command, ConfirmPrompt};
pub use journal::entry::JournalEntry;
pub use journal::store::EntryStore;
