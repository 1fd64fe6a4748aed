//! The MCP tools. Each one locks the shared session and calls the matching command handler.

use crate::args::{AddArgs, DateRangeArgs, ReportArgs, ResetArgs, SaveSettingsArgs};
use crate::commands;
use crate::mcp::mcp_utils::tool_result;
use crate::mcp::PocketServer;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use rmcp::ErrorData as McpError;
use rmcp::{tool, tool_router};
use tracing::info;

#[tool_router(vis = "pub(super)")]
impl PocketServer {
    #[tool]
    /// Initialize the pocket MCP service for this session and return usage instructions. You
    /// **MUST** call this **ONCE** before using other tools so that you have the full usage
    /// instructions. You **MAY** call it more than once if you have forgotten the usage
    /// instructions.
    async fn initialize_service(&self) -> Result<CallToolResult, McpError> {
        let mut initialized = self.initialized.lock().await;
        *initialized = true;
        Ok(CallToolResult::success(vec![rmcp::model::Content::text(
            include_str!("docs/INSTRUCTIONS.md"),
        )]))
    }

    /// Record an income or an expense dated now.
    ///
    /// - `amount`: a number greater than zero as a string, e.g. "12.50". Never signed; the sign
    ///   comes from `type`.
    /// - `type`: "income" or "expense".
    /// - `description`: what the money was for, must not be blank.
    ///
    /// Returns the stored transaction. Expenses are stored with a negative amount.
    #[tool]
    async fn add_transaction(
        &self,
        Parameters(args): Parameters<AddArgs>,
    ) -> Result<CallToolResult, McpError> {
        require_init!(self);
        info!("MCP: add_transaction called with type={}", args.kind());
        let mut session = self.session.lock().await;
        tool_result(commands::add(&mut session, &args).await)
    }

    /// Restrict `list_transactions` and `summary` to a range of days. Both ends are inclusive,
    /// given as YYYY-MM-DD, and at least one is required. The filter stays in effect until
    /// `reset_date_filter` is called or another filter is applied. A filter that matches nothing
    /// stays active and shows nothing.
    #[tool]
    async fn apply_date_filter(
        &self,
        Parameters(args): Parameters<DateRangeArgs>,
    ) -> Result<CallToolResult, McpError> {
        require_init!(self);
        info!("MCP: apply_date_filter called with {}", args.range());
        let mut session = self.session.lock().await;
        tool_result(commands::apply_filter(&mut session, &args))
    }

    /// Remove the date filter so that all transactions are shown again.
    #[tool]
    async fn reset_date_filter(&self) -> Result<CallToolResult, McpError> {
        require_init!(self);
        info!("MCP: reset_date_filter called");
        let mut session = self.session.lock().await;
        tool_result(commands::reset_filter(&mut session))
    }

    /// List the transactions, most recent first. Only transactions matching the date filter are
    /// listed when one is active.
    #[tool]
    async fn list_transactions(&self) -> Result<CallToolResult, McpError> {
        require_init!(self);
        info!("MCP: list_transactions called");
        let mut session = self.session.lock().await;
        tool_result(commands::list(&mut session, &DateRangeArgs::default()))
    }

    /// Total income, total expense and balance. Only transactions matching the date filter are
    /// counted when one is active.
    #[tool]
    async fn summary(&self) -> Result<CallToolResult, McpError> {
        require_init!(self);
        info!("MCP: summary called");
        let mut session = self.session.lock().await;
        tool_result(commands::summary(&mut session, &DateRangeArgs::default()))
    }

    /// Send a report for the last `days` days to the configured Telegram chat. The date filter
    /// does not apply to reports. Fails if the settings have no bot token or chat id, if there
    /// are no transactions in the window, or if Telegram rejects the message.
    #[tool]
    async fn send_report(
        &self,
        Parameters(args): Parameters<ReportArgs>,
    ) -> Result<CallToolResult, McpError> {
        require_init!(self);
        info!("MCP: send_report called with days={}", args.days());
        let session = self.session.lock().await;
        tool_result(commands::report(&session, args.days()).await)
    }

    /// Replace the Telegram settings: the bot `token`, the `chat_id` and which scheduled reports
    /// (`daily`, `weekly`, `monthly`) are enabled. The token is masked in the result.
    #[tool]
    async fn save_settings(
        &self,
        Parameters(args): Parameters<SaveSettingsArgs>,
    ) -> Result<CallToolResult, McpError> {
        require_init!(self);
        info!("MCP: save_settings called");
        let session = self.session.lock().await;
        tool_result(commands::save_settings(&session, &args).await)
    }

    /// Delete all transactions and settings and clear the filter. This cannot be undone. Only
    /// call this when the user has explicitly asked for it, and pass `yes: true`.
    #[tool]
    async fn reset_all_data(
        &self,
        Parameters(args): Parameters<ResetArgs>,
    ) -> Result<CallToolResult, McpError> {
        require_init!(self);
        info!("MCP: reset_all_data called with yes={}", args.yes());
        let mut session = self.session.lock().await;
        tool_result(commands::reset(&mut session, &args).await)
    }
}
