//! Delivery of report text to a chat. The production implementation talks to the Telegram Bot
//! API; the test implementation records messages in memory so the whole app can run without the
//! network.

mod telegram;
mod test_notifier;

use crate::error::{Error, ErrorType, IntoResult};
use crate::model::Settings;
use crate::{Config, Result};
use std::sync::Arc;

pub(crate) use telegram::TelegramNotifier;
pub(crate) use test_notifier::TestNotifier;

/// When this environment variable is set to a non-empty value, `Mode::from_env` selects
/// `Mode::Testing`.
pub const TEST_MODE_ENV: &str = "POCKET_IN_TEST_MODE";

/// Sends a message to the chat described by `settings`.
#[async_trait::async_trait]
pub(crate) trait Notifier: Send + Sync {
    /// Sends `message`. Implementations must call `check_credentials` before doing anything else.
    async fn send(&self, message: &str, settings: &Settings) -> Result<()>;
}

/// Which `Notifier` implementation to use.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    /// Send messages through the Telegram Bot API.
    #[default]
    Telegram,
    /// Record messages in process memory.
    Testing,
}

impl Mode {
    /// Returns `Mode::Testing` if `POCKET_IN_TEST_MODE` is set and non-empty.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Testing,
            _ => Mode::Telegram,
        }
    }
}

/// Creates the notifier for `mode`.
pub(crate) fn notifier(config: &Config, mode: Mode) -> Result<Arc<dyn Notifier>> {
    let notifier: Arc<dyn Notifier> = match mode {
        Mode::Telegram => Arc::new(
            TelegramNotifier::new(config.telegram_api_url(), config.request_timeout())
                .pub_result(ErrorType::Config)?,
        ),
        Mode::Testing => Arc::new(TestNotifier),
    };
    Ok(notifier)
}

/// Fails with a `Config` error when the token or chat id is blank or still a placeholder.
pub(crate) fn check_credentials(settings: &Settings) -> Result<()> {
    if settings.token_missing() {
        return Err(Error::msg(
            ErrorType::Config,
            "The Telegram bot token is not set. Save it with `pocket settings save`",
        ));
    }
    if settings.chat_id_missing() {
        return Err(Error::msg(
            ErrorType::Config,
            "The Telegram chat id is not set. Save it with `pocket settings save`",
        ));
    }
    Ok(())
}
