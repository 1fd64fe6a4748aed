//! These structs provide the CLI interface for the pocket CLI. Several of them double as MCP tool
//! parameters, which is why they also derive `Deserialize` and `JsonSchema`.

use crate::filter::DateRange;
use crate::model::TransactionType;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// pocket: track personal income and expenses and send summaries to Telegram.
///
/// Transactions are kept in a small JSON store under --pocket-home. You can list and total them,
/// optionally for a range of days, and send a report for the last N days to a Telegram chat.
///
/// There is also a mode in which an AI agent can use this program through the mcp subcommand.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and a default config.json.
    ///
    /// This is the first command you should run. By default the data directory is $HOME/pocket;
    /// pass --pocket-home or set POCKET_HOME to put it somewhere else.
    Init,
    /// Record an income or an expense dated now.
    Add(AddArgs),
    /// List transactions, most recent first.
    List(DateRangeArgs),
    /// Show total income, total expense and the balance.
    Summary(DateRangeArgs),
    /// Send a report for the last N days to the configured Telegram chat.
    Report(ReportArgs),
    /// Send the daily, weekly and monthly reports that are enabled in the settings. Meant to be
    /// run from cron or a systemd timer.
    ReportScheduled,
    /// Save or show the Telegram settings.
    Settings(SettingsArgs),
    /// Delete all transactions and settings.
    Reset(ResetArgs),
    /// Run as an MCP server over stdio.
    Mcp(McpArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where pocket data and configuration is held. Defaults to ~/pocket
    #[arg(long, env = "POCKET_HOME", default_value_t = default_pocket_home())]
    pocket_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, pocket_home: PathBuf) -> Self {
        Self {
            log_level,
            pocket_home: pocket_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn pocket_home(&self) -> &DisplayPath {
        &self.pocket_home
    }
}

/// Args for `pocket add` and the `add_transaction` tool.
#[derive(Debug, Parser, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddArgs {
    /// The amount, a number greater than zero, e.g. 12.50. Do not add a sign; use --type.
    #[arg(allow_hyphen_values = true)]
    amount: String,

    /// Whether this is money coming in (income) or going out (expense).
    #[arg(long = "type", short = 't', value_enum, default_value_t = TransactionType::Income)]
    #[serde(rename = "type", default)]
    kind: TransactionType,

    /// What the money was for. Must not be blank.
    #[arg(long, short)]
    description: String,
}

impl AddArgs {
    pub fn new(
        amount: impl Into<String>,
        kind: TransactionType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            kind,
            description: description.into(),
        }
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Args for `pocket list`, `pocket summary` and the `apply_date_filter` tool. Both days are
/// inclusive and given as YYYY-MM-DD.
#[derive(Debug, Default, Parser, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DateRangeArgs {
    /// First day to include, YYYY-MM-DD.
    #[arg(long)]
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    from: Option<NaiveDate>,

    /// Last day to include, YYYY-MM-DD.
    #[arg(long)]
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    to: Option<NaiveDate>,
}

impl DateRangeArgs {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.from, self.to)
    }
}

/// Args for `pocket report` and the `send_report` tool.
#[derive(Debug, Parser, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReportArgs {
    /// The number of days, counting back from now, that the report covers. At least 1.
    days: u32,
}

impl ReportArgs {
    pub fn new(days: u32) -> Self {
        Self { days }
    }

    pub fn days(&self) -> u32 {
        self.days
    }
}

/// Args for `pocket settings`.
#[derive(Debug, Parser, Clone)]
pub struct SettingsArgs {
    #[command(subcommand)]
    action: SettingsAction,
}

impl SettingsArgs {
    pub fn new(action: SettingsAction) -> Self {
        Self { action }
    }

    pub fn action(&self) -> &SettingsAction {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum SettingsAction {
    /// Replace the Telegram settings.
    Save(SaveSettingsArgs),
    /// Print the Telegram settings with the token masked.
    Show,
}

/// Args for `pocket settings save` and the `save_settings` tool.
#[derive(Debug, Default, Parser, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SaveSettingsArgs {
    /// The bot token from @BotFather.
    #[arg(long)]
    token: String,

    /// The chat id that reports are sent to.
    #[arg(long)]
    chat_id: String,

    /// Send a 1-day report from `report-scheduled`.
    #[arg(long)]
    #[serde(default)]
    daily: bool,

    /// Send a 7-day report from `report-scheduled`.
    #[arg(long)]
    #[serde(default)]
    weekly: bool,

    /// Send a 30-day report from `report-scheduled`.
    #[arg(long)]
    #[serde(default)]
    monthly: bool,
}

impl SaveSettingsArgs {
    pub fn new(
        token: impl Into<String>,
        chat_id: impl Into<String>,
        daily: bool,
        weekly: bool,
        monthly: bool,
    ) -> Self {
        Self {
            token: token.into(),
            chat_id: chat_id.into(),
            daily,
            weekly,
            monthly,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    pub fn daily(&self) -> bool {
        self.daily
    }

    pub fn weekly(&self) -> bool {
        self.weekly
    }

    pub fn monthly(&self) -> bool {
        self.monthly
    }
}

/// Args for `pocket reset` and the `reset_all_data` tool.
#[derive(Debug, Default, Parser, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResetArgs {
    /// Confirms that all transactions and settings should be deleted. Nothing happens without it.
    #[arg(long)]
    #[serde(default)]
    yes: bool,
}

impl ResetArgs {
    pub fn new(yes: bool) -> Self {
        Self { yes }
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

/// Args for `pocket mcp`.
#[derive(Debug, Parser, Clone)]
pub struct McpArgs {}

fn default_pocket_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("pocket"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --pocket-home or POCKET_HOME instead of relying on the default \
                pocket home directory.",
            );
            PathBuf::from("pocket")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("pocket").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_add() {
        let args = parse(&[
            "--pocket-home",
            "/tmp/p",
            "add",
            "12.5",
            "--type",
            "expense",
            "--description",
            "Lunch",
        ]);
        assert_eq!(args.common().pocket_home().path(), Path::new("/tmp/p"));
        match args.command() {
            Command::Add(add) => {
                assert_eq!(add.amount(), "12.5");
                assert_eq!(add.kind(), TransactionType::Expense);
                assert_eq!(add.description(), "Lunch");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_negative_amount_reaches_validation() {
        let args = parse(&["add", "-5", "-d", "x"]);
        let Command::Add(add) = args.command() else {
            panic!("expected add");
        };
        assert_eq!(add.amount(), "-5");
        assert_eq!(add.kind(), TransactionType::Income);
    }

    #[test]
    fn test_parse_list_range() {
        let args = parse(&["list", "--from", "2024-03-01"]);
        let Command::List(range) = args.command() else {
            panic!("expected list");
        };
        let range = range.range();
        assert_eq!(range.from, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(range.to, None);
        assert!(Args::try_parse_from(["pocket", "list", "--from", "03/01/2024"]).is_err());
    }

    #[test]
    fn test_parse_settings_and_reset() {
        let args = parse(&[
            "settings", "save", "--token", "1:a", "--chat-id", "42", "--weekly",
        ]);
        let Command::Settings(settings) = args.command() else {
            panic!("expected settings");
        };
        let SettingsAction::Save(save) = settings.action() else {
            panic!("expected save");
        };
        assert_eq!(save.chat_id(), "42");
        assert!(save.weekly() && !save.daily() && !save.monthly());

        let args = parse(&["reset"]);
        let Command::Reset(reset) = args.command() else {
            panic!("expected reset");
        };
        assert!(!reset.yes());
    }

    #[test]
    fn test_build_args_in_code() {
        let save = SaveSettingsArgs::new("1:a", "42", true, false, false);
        let args = Args::new(
            Common::new(LevelFilter::DEBUG, PathBuf::from("/tmp/p")),
            Command::Settings(SettingsArgs::new(SettingsAction::Save(save))),
        );
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        assert_eq!(args.common().pocket_home().to_string(), "/tmp/p");
        let Command::Settings(settings) = args.command() else {
            panic!("expected settings");
        };
        let SettingsAction::Save(save) = settings.action() else {
            panic!("expected save");
        };
        assert_eq!(save.token(), "1:a");
        assert!(save.daily());
    }

    #[test]
    fn test_add_args_from_json() {
        let add: AddArgs = serde_json::from_value(serde_json::json!({
            "amount": "40",
            "type": "expense",
            "description": "Groceries"
        }))
        .unwrap();
        assert_eq!(add.kind(), TransactionType::Expense);

        let range: DateRangeArgs =
            serde_json::from_value(serde_json::json!({"to": "2024-03-01"})).unwrap();
        assert_eq!(range.range().from, None);
        assert_eq!(range.range().to, NaiveDate::from_ymd_opt(2024, 3, 1));
    }
}
