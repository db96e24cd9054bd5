use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One journal record keyed by calendar date. This is also the persisted
/// layout: the data file holds a JSON array of these records, `date` encoded
/// as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub date: NaiveDate,
    pub content: String,
    /// Creation timestamp in epoch milliseconds. Assigned once on insert,
    /// never reused. Stable identity only, never a sort key.
    pub id: u64,
}
