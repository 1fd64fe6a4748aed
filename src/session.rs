//! The state of one running instance: the ledger, the active date filter and the notifier.
//!
//! The CLI opens a `Session` for a single command. The MCP server keeps one open for the life of
//! the connection, so a filter applied by one tool call is seen by the next.

use crate::api::{self, Mode, Notifier};
use crate::display::sort_for_display;
use crate::error::{ErrorType, IntoResult};
use crate::filter::{DateRange, FilterView};
use crate::ledger::Ledger;
use crate::model::{Settings, Transaction, TransactionType};
use crate::report::{build_report, Report};
use crate::store::{FileStore, Store};
use crate::summary::{summarize, Summary};
use crate::{Config, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct Session {
    config: Config,
    ledger: Ledger,
    view: FilterView,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("ledger", &self.ledger)
            .field("filter", &self.view.range())
            .finish()
    }
}

impl Session {
    /// Opens the file store under the config's home directory and loads the ledger from it.
    pub async fn open(config: Config, mode: Mode) -> Result<Self> {
        let store = FileStore::new(config.store_dir())
            .await
            .pub_result(ErrorType::Storage)?;
        let notifier = api::notifier(&config, mode)?;
        Ok(Self::with_parts(config, Arc::new(store), notifier).await)
    }

    pub(crate) async fn with_parts(
        config: Config,
        store: Arc<dyn Store>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let ledger = Ledger::load(store).await;
        Self {
            config,
            ledger,
            view: FilterView::default(),
            notifier,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn filter(&self) -> Option<DateRange> {
        self.view.range()
    }

    /// Records a new transaction. An active filter is re-run so the new entry shows up if it
    /// falls in range.
    pub async fn add(
        &mut self,
        amount: &str,
        kind: TransactionType,
        description: &str,
    ) -> Result<Transaction> {
        let transaction = self.ledger.add(amount, kind, description).await?;
        self.view.refresh(self.ledger.entries());
        Ok(transaction)
    }

    /// Makes `range` the active filter and returns the matching entries in display order. On
    /// error the previous filter stays in effect.
    pub fn apply_filter(&mut self, range: DateRange) -> Result<Vec<Transaction>> {
        let visible = self.view.apply(range, self.ledger.entries())?;
        debug!("Filter {range} matched {} transactions", visible.len());
        Ok(sort_for_display(visible))
    }

    pub fn reset_filter(&mut self) {
        self.view.reset();
    }

    /// The visible entries, most recent first.
    pub fn list(&self) -> Vec<Transaction> {
        sort_for_display(self.visible())
    }

    /// Totals over the visible entries.
    pub fn summary(&self) -> Summary {
        summarize(self.visible())
    }

    fn visible(&self) -> &[Transaction] {
        self.view.visible(self.ledger.entries())
    }

    /// Builds a report over the last `days` days of the whole ledger (the filter does not apply)
    /// and sends it.
    pub async fn send_report(&self, days: u32, now: DateTime<Utc>) -> Result<Report> {
        let report = build_report(self.ledger.entries(), days, now, self.config.currency())?;
        let settings = self.ledger.settings().await;
        self.notifier.send(&report.text, &settings).await?;
        info!("Sent the {days}-day report");
        Ok(report)
    }

    /// Sends the report for each window enabled in the settings. Windows without entries are
    /// skipped. Returns the windows that were sent.
    pub async fn send_scheduled(&self, now: DateTime<Utc>) -> Result<Vec<u32>> {
        let settings = self.ledger.settings().await;
        api::check_credentials(&settings)?;
        let mut sent = Vec::new();
        for days in settings.scheduled_windows() {
            match self.send_report(days, now).await {
                Ok(_) => sent.push(days),
                Err(e) if e.error_type() == ErrorType::EmptyReport => {
                    warn!("Skipping the {days}-day report: {e}");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(sent)
    }

    pub async fn settings(&self) -> Settings {
        self.ledger.settings().await
    }

    pub async fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.ledger.save_settings(settings).await
    }

    /// Deletes all transactions and settings and clears the filter.
    pub async fn reset_all(&mut self) -> Result<()> {
        self.view.reset();
        self.ledger.reset().await
    }
}
