//! Text reports over a trailing window of days.

use crate::display::{transaction_line, DAY_FORMAT};
use crate::error::{Error, ErrorType};
use crate::model::{Amount, Transaction};
use crate::summary::{summarize, Summary};
use crate::Result;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// A rendered report along with the numbers that went into it.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// The length of the window in days.
    pub days: u32,
    /// Start of the window, `now - days`.
    pub cutoff: DateTime<Utc>,
    /// End of the window.
    pub now: DateTime<Utc>,
    pub summary: Summary,
    /// The message that is sent.
    pub text: String,
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Builds a report over the entries dated at or after `now - days`.
///
/// The details block lists entries in the order they were added, not by date. A window with no
/// entries is an `EmptyReport` error and a zero-day window is a `Validation` error.
pub fn build_report(
    entries: &[Transaction],
    days: u32,
    now: DateTime<Utc>,
    currency: &str,
) -> Result<Report> {
    if days == 0 {
        return Err(Error::msg(
            ErrorType::Validation,
            "A report must cover at least one day",
        ));
    }
    let cutoff = now
        .checked_sub_signed(Duration::days(i64::from(days)))
        .ok_or_else(|| {
            Error::msg(
                ErrorType::Validation,
                format!("A report cannot cover {days} days"),
            )
        })?;
    let selected: Vec<Transaction> = entries
        .iter()
        .filter(|t| t.date() >= cutoff)
        .cloned()
        .collect();
    if selected.is_empty() {
        return Err(Error::msg(
            ErrorType::EmptyReport,
            format!("There are no transactions in the last {days} days"),
        ));
    }

    let summary = summarize(&selected);
    let money = |a: Amount| format!("{a} {currency}").trim_end().to_string();

    let mut lines = vec![
        format!("Report for the last {days} days:"),
        format!(
            "Period: {} - {}",
            cutoff.format(DAY_FORMAT),
            now.format(DAY_FORMAT)
        ),
        String::new(),
        format!("Income: {}", money(summary.income)),
        format!("Expense: {}", money(summary.expense)),
        format!("Balance: {}", money(summary.balance)),
        String::new(),
        "Details:".to_string(),
    ];
    lines.extend(selected.iter().map(|t| transaction_line(t, currency)));

    Ok(Report {
        days,
        cutoff,
        now,
        summary,
        text: lines.join("\n"),
    })
}
