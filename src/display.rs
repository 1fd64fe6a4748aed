//! Ordering and formatting of the on-screen transaction list.

use crate::model::Transaction;

/// The date format used for transaction lines, e.g. `01.03.2024`.
pub(crate) const DAY_FORMAT: &str = "%d.%m.%Y";

/// Returns the entries most recent first. Entries with the same date keep their insertion order.
pub fn sort_for_display(entries: &[Transaction]) -> Vec<Transaction> {
    let mut sorted = entries.to_vec();
    // `sort_by` is stable.
    sorted.sort_by(|a, b| b.date().cmp(&a.date()));
    sorted
}

/// Renders one transaction as `date | description | signed amount currency`.
pub fn transaction_line(t: &Transaction, currency: &str) -> String {
    format!(
        "{} | {} | {} {}",
        t.date().format(DAY_FORMAT),
        t.description(),
        t.amount().signed(),
        currency
    )
    .trim_end()
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, TransactionType};
    use chrono::{TimeZone, Utc};
    use std::str::FromStr;

    fn txn(id: i64, y: i32, m: u32, d: u32) -> Transaction {
        Transaction::new(
            id,
            Amount::from_str("1").unwrap(),
            TransactionType::Income,
            format!("t{id}"),
            Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_sort_descending() {
        let entries = vec![
            txn(1, 2024, 1, 1),
            txn(2, 2024, 3, 1),
            txn(3, 2024, 2, 1),
        ];
        let sorted = sort_for_display(&entries);
        let ids: Vec<i64> = sorted.iter().map(Transaction::id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        // The input is untouched.
        assert_eq!(entries[0].id(), 1);
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let entries = vec![
            txn(1, 2024, 1, 1),
            txn(2, 2024, 2, 1),
            txn(3, 2024, 1, 1),
            txn(4, 2024, 2, 1),
        ];
        let ids: Vec<i64> = sort_for_display(&entries)
            .iter()
            .map(Transaction::id)
            .collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_transaction_line() {
        let t = Transaction::new(
            1,
            Amount::from_str("40").unwrap(),
            TransactionType::Expense,
            "Groceries",
            Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
        );
        assert_eq!(transaction_line(&t, "UAH"), "01.03.2024 | Groceries | -40.00 UAH");
        assert_eq!(transaction_line(&t, ""), "01.03.2024 | Groceries | -40.00");
    }
}
