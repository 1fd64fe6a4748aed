//! Adding, filtering, listing and totaling transactions.

use crate::args::{AddArgs, DateRangeArgs};
use crate::commands::Out;
use crate::display::transaction_line;
use crate::model::Transaction;
use crate::session::Session;
use crate::summary::Summary;
use crate::Result;

/// Records a transaction dated now.
pub async fn add(session: &mut Session, args: &AddArgs) -> Result<Out<Transaction>> {
    let transaction = session
        .add(args.amount(), args.kind(), args.description())
        .await?;
    let line = transaction_line(&transaction, session.config().currency());
    Ok(Out::new(format!("Added {line}"), transaction))
}

/// Makes the date range the active filter for `list` and `summary`.
pub fn apply_filter(session: &mut Session, args: &DateRangeArgs) -> Result<Out<Vec<Transaction>>> {
    let range = args.range();
    let entries = session.apply_filter(range)?;
    let message = format!(
        "Filter set to {range}, {} transactions match\n{}",
        entries.len(),
        lines(session, &entries)
    );
    Ok(Out::new(message.trim_end(), entries))
}

/// Clears the active filter.
pub fn reset_filter(session: &mut Session) -> Result<Out<()>> {
    session.reset_filter();
    Ok("Filter cleared, showing all transactions".into())
}

/// Lists the visible transactions, most recent first. When `args` has a bound it is applied as
/// the filter first.
pub fn list(session: &mut Session, args: &DateRangeArgs) -> Result<Out<Vec<Transaction>>> {
    if !args.range().is_unbounded() {
        session.apply_filter(args.range())?;
    }
    let entries = session.list();
    let message = if entries.is_empty() {
        match session.filter() {
            Some(range) => format!("No transactions from {range}"),
            None => "No transactions yet".to_string(),
        }
    } else {
        lines(session, &entries)
    };
    Ok(Out::new(message, entries))
}

/// Totals the visible transactions. When `args` has a bound it is applied as the filter first.
pub fn summary(session: &mut Session, args: &DateRangeArgs) -> Result<Out<Summary>> {
    if !args.range().is_unbounded() {
        session.apply_filter(args.range())?;
    }
    let summary = session.summary();
    let currency = session.config().currency();
    let money = |a: crate::model::Amount| format!("{a} {currency}").trim_end().to_string();
    let mut message = format!(
        "Income: {}\nExpense: {}\nBalance: {}",
        money(summary.income),
        money(summary.expense),
        money(summary.balance)
    );
    if let Some(range) = session.filter() {
        message = format!("Transactions from {range}\n{message}");
    }
    Ok(Out::new(message, summary))
}

fn lines(session: &Session, entries: &[Transaction]) -> String {
    let currency = session.config().currency();
    entries
        .iter()
        .map(|t| transaction_line(t, currency))
        .collect::<Vec<_>>()
        .join("\n")
}
