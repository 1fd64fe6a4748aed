//! Date-range filtering and the active filtered view.

use crate::error::{Error, ErrorType};
use crate::model::Transaction;
use crate::Result;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// An inclusive range of calendar days. Either end may be open. Days are UTC days.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day to include, from its first instant.
    pub from: Option<NaiveDate>,
    /// Last day to include, through 23:59:59.999.
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// True when neither bound is given.
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    fn start(&self) -> Option<DateTime<Utc>> {
        self.from.map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }

    fn end(&self) -> Option<DateTime<Utc>> {
        self.to.map(|d| end_of_day(d).and_utc())
    }

    /// Tests `date` against both bounds.
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        self.start().map_or(true, |start| date >= start)
            && self.end().map_or(true, |end| date <= end)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "…".into());
        write!(f, "{} to {}", show(self.from), show(self.to))
    }
}

fn end_of_day(day: NaiveDate) -> chrono::NaiveDateTime {
    // 23:59:59.999 is always a valid time.
    day.and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| day.and_time(NaiveTime::MIN))
}

/// Returns the entries whose date falls within `from..=to`, in their original order.
///
/// At least one bound is required; asking for a filter with neither is a `Filter` error.
pub fn filter_by_range(
    entries: &[Transaction],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<Transaction>> {
    let range = DateRange::new(from, to);
    if range.is_unbounded() {
        return Err(Error::msg(
            ErrorType::Filter,
            "Please choose at least one date to filter by",
        ));
    }
    Ok(entries
        .iter()
        .filter(|t| range.contains(t.date()))
        .cloned()
        .collect())
}

/// Whether a date filter is in effect. An active filter that matched nothing is still active.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub enum FilterView {
    #[default]
    Inactive,
    Active {
        range: DateRange,
        entries: Vec<Transaction>,
    },
}

impl FilterView {
    /// Filters `all` by `range` and makes the result the active view. On error the current view
    /// is kept.
    pub fn apply<'a>(
        &'a mut self,
        range: DateRange,
        all: &'a [Transaction],
    ) -> Result<&'a [Transaction]> {
        let entries = filter_by_range(all, range.from, range.to)?;
        *self = FilterView::Active { range, entries };
        Ok(self.visible(all))
    }

    /// Clears the filter.
    pub fn reset(&mut self) {
        *self = FilterView::Inactive;
    }

    pub fn is_active(&self) -> bool {
        matches!(self, FilterView::Active { .. })
    }

    pub fn range(&self) -> Option<DateRange> {
        match self {
            FilterView::Inactive => None,
            FilterView::Active { range, .. } => Some(*range),
        }
    }

    /// The filtered entries when a filter is active, otherwise `all`.
    pub fn visible<'a>(&'a self, all: &'a [Transaction]) -> &'a [Transaction] {
        match self {
            FilterView::Inactive => all,
            FilterView::Active { entries, .. } => entries,
        }
    }

    /// Re-runs the active filter against `all`, e.g. after a new entry was added.
    pub fn refresh(&mut self, all: &[Transaction]) {
        if let FilterView::Active { range, entries } = self {
            *entries = all.iter().filter(|t| range.contains(t.date())).cloned().collect();
        }
    }
}
