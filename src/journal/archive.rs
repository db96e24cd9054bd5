//! Derived archive projections over the entry store.
//!
//! Everything here is recomputed from the store on every call; nothing is
//! cached across a mutation, so callers simply re-invoke before rendering.

use crate::journal::entry::JournalEntry;
use crate::journal::store::EntryStore;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearSummary {
    pub year: i32,
    pub entry_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSummary {
    /// Zero-based month index, 0 = January.
    pub month0: u32,
    pub entry_count: usize,
}

/// Distinct years with entry counts, most recent year first.
pub fn years(store: &EntryStore) -> Vec<YearSummary> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for entry in store.entries() {
        *counts.entry(entry.date.year()).or_default() += 1;
    }
    counts
        .into_iter()
        .rev()
        .map(|(year, entry_count)| YearSummary { year, entry_count })
        .collect()
}

/// Distinct months of `year` with entry counts, January first.
pub fn months(store: &EntryStore, year: i32) -> Vec<MonthSummary> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for entry in store.entries() {
        if entry.date.year() == year {
            *counts.entry(entry.date.month0()).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(month0, entry_count)| MonthSummary { month0, entry_count })
        .collect()
}

/// All entries in `year`/`month0`, most recent date first.
pub fn days(store: &EntryStore, year: i32, month0: u32) -> Vec<&JournalEntry> {
    let mut out: Vec<&JournalEntry> = store
        .entries()
        .filter(|entry| entry.date.year() == year && entry.date.month0() == month0)
        .collect();
    // the store iterates ascending
    out.reverse();
    out
}

/// Full English month name for a zero-based month index.
pub fn month_name(month0: u32) -> String {
    match NaiveDate::from_ymd_opt(2000, month0 + 1, 1) {
        Some(day) => day.format("%B").to_string(),
        None => format!("Month {month0}"),
    }
}
