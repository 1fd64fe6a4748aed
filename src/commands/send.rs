//! Sending reports to the configured chat.

use crate::commands::Out;
use crate::report::Report;
use crate::session::Session;
use crate::Result;
use chrono::Utc;

/// Builds a report for the last `days` days and sends it.
pub async fn report(session: &Session, days: u32) -> Result<Out<Report>> {
    let report = session.send_report(days, Utc::now()).await?;
    Ok(Out::new(
        format!("Sent the report for the last {days} days\n\n{}", report.text),
        report,
    ))
}

/// Sends every report window that is enabled in the settings.
pub async fn report_scheduled(session: &Session) -> Result<Out<Vec<u32>>> {
    let sent = session.send_scheduled(Utc::now()).await?;
    let message = if sent.is_empty() {
        "No scheduled reports were sent".to_string()
    } else {
        let windows: Vec<String> = sent.iter().map(|d| format!("{d}-day")).collect();
        format!("Sent the {} reports", windows.join(", "))
    };
    Ok(Out::new(message, sent))
}
