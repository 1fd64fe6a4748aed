//! Totals over a list of transactions.

use crate::model::{Amount, Transaction};
use serde::Serialize;

/// Income, expense and balance over some set of transactions.
///
/// `income` and `expense` are never negative; `balance` is `income - expense`.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Summary {
    pub income: Amount,
    pub expense: Amount,
    pub balance: Amount,
    pub count: usize,
}

/// Sums `entries`. The caller decides whether that is the whole ledger or a filtered view.
pub fn summarize(entries: &[Transaction]) -> Summary {
    let income: Amount = entries
        .iter()
        .filter(|t| t.is_income())
        .map(Transaction::amount)
        .sum();
    let expense: Amount = entries
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.amount().abs())
        .sum();
    Summary {
        income,
        expense,
        balance: income - expense,
        count: entries.len(),
    }
}
