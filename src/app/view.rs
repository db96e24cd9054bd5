use crate::journal::archive::{self, MonthSummary, YearSummary};
use crate::journal::store::EntryStore;
use crate::journal::util::truncate_with_ellipsis;
use chrono::NaiveDate;

const DAY_PREVIEW_CHARS: usize = 160;

/// Which level of the archive hierarchy is displayed.
///
/// Transitions move one level at a time: `Home ↔ Months ↔ Days`. Opening an
/// entry does not change the view state; the editor sits on top of whatever
/// level is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Home,
    Months { year: i32 },
    Days { year: i32, month0: u32 },
}

impl ViewState {
    /// Drill into a year's months. Only meaningful from `Home`; commands
    /// from a stale UI are ignored rather than allowed to skip levels.
    pub fn select_year(&mut self, year: i32) {
        if matches!(self, ViewState::Home) {
            *self = ViewState::Months { year };
        }
    }

    /// Drill into a month's days. Only meaningful from `Months`.
    pub fn select_month(&mut self, month0: u32) {
        if month0 > 11 {
            return;
        }
        if let ViewState::Months { year } = *self {
            *self = ViewState::Days { year, month0 };
        }
    }

    /// One level up; no-op on `Home` (the back control is hidden there).
    pub fn back(&mut self) {
        *self = match *self {
            ViewState::Home => ViewState::Home,
            ViewState::Months { .. } => ViewState::Home,
            ViewState::Days { year, .. } => ViewState::Months { year },
        };
    }

    pub fn back_visible(&self) -> bool {
        !matches!(self, ViewState::Home)
    }

    pub fn title(&self) -> String {
        match *self {
            ViewState::Home => "Journal".to_string(),
            ViewState::Months { year } => format!("{year} Archives"),
            ViewState::Days { year, month0 } => {
                format!("{} {year}", archive::month_name(month0))
            }
        }
    }
}

/// One row of the days list: the date plus a single-line content preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCard {
    pub date: NaiveDate,
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewBody {
    Years(Vec<YearSummary>),
    Months(Vec<MonthSummary>),
    Days(Vec<DayCard>),
}

/// Everything the UI needs to draw the current level. Recomputed from the
/// store on every call; stale snapshots cannot exist because none are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub title: String,
    pub back_visible: bool,
    pub body: ViewBody,
}

pub fn snapshot(view: &ViewState, store: &EntryStore) -> ViewSnapshot {
    let body = match *view {
        ViewState::Home => ViewBody::Years(archive::years(store)),
        ViewState::Months { year } => ViewBody::Months(archive::months(store, year)),
        ViewState::Days { year, month0 } => ViewBody::Days(
            archive::days(store, year, month0)
                .into_iter()
                .map(|entry| DayCard {
                    date: entry.date,
                    preview: truncate_with_ellipsis(&entry.content, DAY_PREVIEW_CHARS),
                })
                .collect(),
        ),
    };
    ViewSnapshot {
        title: view.title(),
        back_visible: view.back_visible(),
        body,
    }
}
