//! The entry store: owns the canonical list of transactions and persists it as one snapshot.

use crate::error::{Error, ErrorType, IntoResult, Res};
use crate::model::{Amount, Settings, Transaction, TransactionType};
use crate::store::{Store, TELEGRAM_SETTINGS, TRANSACTIONS};
use crate::Result;
use anyhow::Context;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// The largest amount a single transaction may have. Totals over any realistic number of entries
/// stay far below the range of `Decimal`.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// The ordered collection of transactions along with the store it is persisted to.
///
/// Entries are kept in insertion order. The whole collection is written back to the store on
/// every `add`.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn Store>,
    entries: Vec<Transaction>,
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl Ledger {
    /// Loads the snapshot from `store`. A missing or unreadable snapshot yields an empty ledger.
    pub async fn load(store: Arc<dyn Store>) -> Self {
        let entries = Self::load_all(store.as_ref()).await;
        debug!("Loaded {} transactions", entries.len());
        Self { store, entries }
    }

    /// Reads the persisted snapshot, degrading to an empty list if it is missing or corrupt.
    pub async fn load_all(store: &dyn Store) -> Vec<Transaction> {
        match read_snapshot(store).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Ignoring unreadable transaction snapshot: {e:#}");
                Vec::new()
            }
        }
    }

    /// All transactions in insertion order.
    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Validates and records a new transaction dated now. See `add_at`.
    pub async fn add(
        &mut self,
        amount: &str,
        kind: TransactionType,
        description: &str,
    ) -> Result<Transaction> {
        self.add_at(amount, kind, description, Utc::now()).await
    }

    /// Validates and records a new transaction dated `now`.
    ///
    /// - `amount` must parse as a number greater than zero and no more than `MAX_AMOUNT`. It is
    ///   negated for expenses.
    /// - `description` must contain something other than whitespace.
    ///
    /// The id is `now` in epoch milliseconds, bumped past the largest existing id if needed so
    /// that ids stay unique and increasing. If the snapshot cannot be written, the ledger is left
    /// as it was.
    pub async fn add_at(
        &mut self,
        amount: &str,
        kind: TransactionType,
        description: &str,
        now: DateTime<Utc>,
    ) -> Result<Transaction> {
        let amount = Amount::from_str(amount).pub_result(ErrorType::Validation)?;
        if !amount.is_positive() {
            return Err(Error::msg(
                ErrorType::Validation,
                format!("The amount must be greater than zero, got {amount}"),
            ));
        }
        if amount.value() > Decimal::from(MAX_AMOUNT) {
            return Err(Error::msg(
                ErrorType::Validation,
                format!("The amount must not be more than {MAX_AMOUNT}"),
            ));
        }
        if description.trim().is_empty() {
            return Err(Error::msg(
                ErrorType::Validation,
                "The description must not be blank",
            ));
        }

        let id = self.next_id(now);
        let transaction = Transaction::new(id, amount, kind, description, now);
        self.entries.push(transaction.clone());
        if let Err(e) = self.save().await {
            self.entries.pop();
            return Err(Error::new(ErrorType::Storage, e));
        }
        debug!("Added transaction {id}");
        Ok(transaction)
    }

    /// Removes the snapshot and the settings from the store and empties the ledger.
    pub async fn reset(&mut self) -> Result<()> {
        self.store
            .remove(TRANSACTIONS)
            .await
            .context("Unable to remove the transactions")
            .pub_result(ErrorType::Storage)?;
        self.entries.clear();
        self.store
            .remove(TELEGRAM_SETTINGS)
            .await
            .context("Transactions were removed but the settings could not be")
            .pub_result(ErrorType::Storage)?;
        Ok(())
    }

    /// Reads the notification settings. Missing or unreadable settings yield the defaults.
    pub async fn settings(&self) -> Settings {
        match read_settings(self.store.as_ref()).await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring unreadable settings: {e:#}");
                Settings::default()
            }
        }
    }

    /// Replaces the stored notification settings.
    pub async fn save_settings(&self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_string(settings)
            .context("Unable to serialize settings")
            .pub_result(ErrorType::Internal)?;
        self.store
            .set(TELEGRAM_SETTINGS, &json)
            .await
            .context("Unable to save settings")
            .pub_result(ErrorType::Storage)
    }

    fn next_id(&self, now: DateTime<Utc>) -> i64 {
        let millis = now.timestamp_millis();
        match self.entries.iter().map(Transaction::id).max() {
            Some(max) if max >= millis => max + 1,
            _ => millis,
        }
    }

    async fn save(&self) -> Res<()> {
        let json =
            serde_json::to_string(&self.entries).context("Unable to serialize transactions")?;
        self.store
            .set(TRANSACTIONS, &json)
            .await
            .context("Unable to save transactions")
    }
}

async fn read_snapshot(store: &dyn Store) -> Res<Vec<Transaction>> {
    match store.get(TRANSACTIONS).await? {
        None => Ok(Vec::new()),
        Some(json) => serde_json::from_str(&json).context("Unable to parse the transactions"),
    }
}

async fn read_settings(store: &dyn Store) -> Res<Settings> {
    match store.get(TELEGRAM_SETTINGS).await? {
        None => Ok(Settings::default()),
        Some(json) => serde_json::from_str(&json).context("Unable to parse the settings"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    /// A store whose writes always fail.
    struct ReadOnlyStore;

    #[async_trait::async_trait]
    impl Store for ReadOnlyStore {
        async fn get(&self, _key: &str) -> Res<Option<String>> {
            Ok(None)
        }

        async fn set(&self, key: &str, _value: &str) -> Res<()> {
            anyhow::bail!("cannot write {key}")
        }

        async fn remove(&self, _key: &str) -> Res<()> {
            Ok(())
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    async fn empty() -> Ledger {
        Ledger::load(Arc::new(MemoryStore::new())).await
    }

    #[tokio::test]
    async fn test_add_income_and_expense() {
        let mut ledger = empty().await;
        let income = ledger
            .add_at("100", TransactionType::Income, "Salary", at(1, 9))
            .await
            .unwrap();
        let expense = ledger
            .add_at("40", TransactionType::Expense, "Groceries", at(1, 10))
            .await
            .unwrap();
        assert_eq!(income.amount().to_string(), "100.00");
        assert_eq!(expense.amount().to_string(), "-40.00");
        assert_eq!(expense.id(), at(1, 10).timestamp_millis());
        assert_eq!(ledger.len(), 2);
    }

    #[tokio::test]
    async fn test_add_persists_and_round_trips() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let mut ledger = Ledger::load(store.clone()).await;
        let added = ledger
            .add_at("12.34", TransactionType::Expense, "Coffee", at(2, 8))
            .await
            .unwrap();

        let loaded = Ledger::load_all(store.as_ref()).await;
        assert_eq!(loaded, vec![added]);
    }

    #[tokio::test]
    async fn test_add_rejects_bad_amounts() {
        let mut ledger = empty().await;
        for bad in ["0", "-5", "abc", "", "  "] {
            let err = ledger
                .add_at(bad, TransactionType::Income, "Thing", at(1, 9))
                .await
                .unwrap_err();
            assert_eq!(err.error_type(), ErrorType::Validation, "amount '{bad}'");
        }
        assert!(ledger.is_empty());
        assert!(ledger.store().get(TRANSACTIONS).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_rejects_amounts_over_the_cap() {
        let mut ledger = empty().await;
        for bad in ["1000000000000000.01", "5e28", "79228162514264337593543950335"] {
            let err = ledger
                .add_at(bad, TransactionType::Income, "Too much", at(1, 9))
                .await
                .unwrap_err();
            assert_eq!(err.error_type(), ErrorType::Validation, "amount '{bad}'");
        }
        assert!(ledger.is_empty());

        ledger
            .add_at("1000000000000000", TransactionType::Income, "Max", at(1, 9))
            .await
            .unwrap();
        ledger
            .add_at("1000000000000000", TransactionType::Income, "Max", at(1, 10))
            .await
            .unwrap();
        let summary = crate::summary::summarize(ledger.entries());
        assert_eq!(summary.income.to_string(), "2000000000000000.00");
    }

    #[tokio::test]
    async fn test_precise_amounts_round_trip() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let mut ledger = Ledger::load(store.clone()).await;
        let mut added = vec![ledger
            .add_at("10", TransactionType::Income, "Plain", at(2, 8))
            .await
            .unwrap()];
        for amount in ["999999999999999.99", "0.1234567890123456789", "123456789012345.678"] {
            added.push(
                ledger
                    .add_at(amount, TransactionType::Expense, "Precise", at(2, 9))
                    .await
                    .unwrap(),
            );
        }

        let loaded = Ledger::load_all(store.as_ref()).await;
        assert_eq!(loaded, added);
        assert_eq!(
            loaded[2].amount().value(),
            Decimal::from_str("-0.1234567890123456789").unwrap()
        );
    }

    #[tokio::test]
    async fn test_large_snapshot_amounts_load() {
        // Written as strings by the serializer, so they read back without loss.
        let snapshot = r#"[
            {"id":1,"amount":"79228162514264337593543950335","type":"income","description":"a","date":"2024-03-01T00:00:00.000Z"},
            {"id":2,"amount":10,"type":"income","description":"b","date":"2024-03-01T00:00:00.000Z"}
        ]"#;
        let ledger = Ledger::load(Arc::new(MemoryStore::with_data([(TRANSACTIONS, snapshot)]))).await;
        assert_eq!(ledger.len(), 2);
        // Totals saturate instead of overflowing.
        let summary = crate::summary::summarize(ledger.entries());
        assert_eq!(summary.income.value(), Decimal::MAX);
    }

    #[tokio::test]
    async fn test_add_rejects_blank_description() {
        let mut ledger = empty().await;
        let err = ledger
            .add_at("10", TransactionType::Expense, "   ", at(1, 9))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn test_ids_stay_unique_within_the_same_millisecond() {
        let mut ledger = empty().await;
        let now = at(3, 12);
        let a = ledger
            .add_at("1", TransactionType::Income, "a", now)
            .await
            .unwrap();
        let b = ledger
            .add_at("1", TransactionType::Income, "b", now)
            .await
            .unwrap();
        let c = ledger
            .add_at("1", TransactionType::Income, "c", at(1, 0))
            .await
            .unwrap();
        assert!(a.id() < b.id());
        assert!(b.id() < c.id());
    }

    #[tokio::test]
    async fn test_failed_save_leaves_ledger_unchanged() {
        let mut ledger = Ledger::load(Arc::new(ReadOnlyStore)).await;
        let err = ledger
            .add_at("10", TransactionType::Income, "Salary", at(1, 9))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Storage);
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_loads_empty() {
        let store = MemoryStore::with_data([(TRANSACTIONS, "{not json")]);
        let ledger = Ledger::load(Arc::new(store)).await;
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn test_settings_round_trip_and_reset() {
        let mut ledger = empty().await;
        assert_eq!(ledger.settings().await, Settings::default());

        let settings = Settings {
            token: "123:abc".to_string(),
            chat_id: "42".to_string(),
            send_weekly: true,
            ..Default::default()
        };
        ledger.save_settings(&settings).await.unwrap();
        ledger
            .add_at("5", TransactionType::Income, "Gift", at(4, 9))
            .await
            .unwrap();
        assert_eq!(ledger.settings().await, settings);

        ledger.reset().await.unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.settings().await, Settings::default());
        assert!(ledger.store().get(TRANSACTIONS).await.unwrap().is_none());
        assert!(ledger.store().get(TELEGRAM_SETTINGS).await.unwrap().is_none());
    }
}
