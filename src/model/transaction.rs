use crate::model::Amount;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Whether a transaction brings money in or takes it out.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

/// A single income or expense entry.
///
/// The on-disk shape is:
///
/// ```json
/// {
///   "id": 1709288100000,
///   "amount": -40,
///   "type": "expense",
///   "description": "Groceries",
///   "date": "2024-03-01T10:15:00.000Z"
/// }
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Creation time in epoch milliseconds, unique within a ledger.
    pub(crate) id: i64,
    /// Signed amount. Expenses are stored negated.
    pub(crate) amount: Amount,
    #[serde(rename = "type")]
    pub(crate) kind: TransactionType,
    pub(crate) description: String,
    #[serde(serialize_with = "serialize_date")]
    pub(crate) date: DateTime<Utc>,
}

impl Transaction {
    /// Builds a record from a positive `amount`, negating it for expenses.
    pub(crate) fn new(
        id: i64,
        amount: Amount,
        kind: TransactionType,
        description: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        let amount = match kind {
            TransactionType::Income => amount.abs(),
            TransactionType::Expense => -amount.abs(),
        };
        Self {
            id,
            amount,
            kind,
            description: description.into(),
            date,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

/// Writes dates the way a browser's `Date.toISOString` does: UTC with milliseconds and a `Z`.
fn serialize_date<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    #[test]
    fn test_expense_is_negated() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 0).unwrap();
        let t = Transaction::new(
            1,
            Amount::from_str("40").unwrap(),
            TransactionType::Expense,
            "Groceries",
            date,
        );
        assert!(t.amount().is_negative());
        assert!(t.is_expense());
        let t = Transaction::new(
            2,
            Amount::from_str("40").unwrap(),
            TransactionType::Income,
            "Salary",
            date,
        );
        assert!(t.amount().is_positive());
    }

    #[test]
    fn test_json_shape() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 0).unwrap();
        let t = Transaction::new(
            1709288100000,
            Amount::from_str("40").unwrap(),
            TransactionType::Expense,
            "Groceries",
            date,
        );
        let value = serde_json::to_value(&t).unwrap();
        assert_eq!(value["id"], 1709288100000_i64);
        assert_eq!(value["type"], "expense");
        assert_eq!(value["description"], "Groceries");
        assert_eq!(value["date"], "2024-03-01T10:15:00.000Z");
        assert_eq!(value["amount"].as_f64(), Some(-40.0));
    }

    #[test]
    fn test_reads_browser_snapshot() {
        let json = r#"[
            {"id":1709288100000,"amount":1500.5,"type":"income","description":"Salary","date":"2024-03-01T10:15:00.000Z"},
            {"id":1709288200000,"amount":-20,"type":"expense","description":"Taxi","date":"2024-03-01T10:16:40.123Z"}
        ]"#;
        let parsed: Vec<Transaction> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].amount().to_string(), "1500.50");
        assert_eq!(parsed[1].kind(), TransactionType::Expense);
        assert_eq!(parsed[1].date().timestamp_millis(), 1709288200123);
    }

    #[test]
    fn test_transaction_type_plain() {
        assert_eq!(TransactionType::Expense.to_string(), "expense");
        assert_eq!(
            TransactionType::from_str("income").unwrap(),
            TransactionType::Income
        );
    }
}
