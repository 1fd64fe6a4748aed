//! A `Notifier` that keeps every message in process memory.
//!
//! Note: this is compiled even in the "production" version of this app so that the whole app can
//! run, top-to-bottom, without the Telegram API.

use crate::api::{check_credentials, Notifier};
use crate::model::Settings;
use crate::Result;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};
use tracing::debug;

/// Messages sent so far, keyed by chat id.
static OUTBOX: OnceLock<Mutex<HashMap<String, Vec<String>>>> = OnceLock::new();

fn outbox() -> &'static Mutex<HashMap<String, Vec<String>>> {
    OUTBOX.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Records messages instead of sending them. Tests use a unique chat id so that they can run in
/// parallel and still read back only their own messages.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TestNotifier;

impl TestNotifier {
    /// Returns the messages sent to `chat_id`, oldest first.
    #[cfg(test)]
    pub(crate) fn sent(chat_id: &str) -> Vec<String> {
        match outbox().lock() {
            Ok(map) => map.get(chat_id).cloned().unwrap_or_default(),
            Err(poisoned) => poisoned
                .into_inner()
                .get(chat_id)
                .cloned()
                .unwrap_or_default(),
        }
    }
}

#[async_trait::async_trait]
impl Notifier for TestNotifier {
    async fn send(&self, message: &str, settings: &Settings) -> Result<()> {
        check_credentials(settings)?;
        let chat_id = settings.chat_id.trim().to_string();
        debug!("Test mode: recording a message for chat {chat_id}");
        let mut map = match outbox().lock() {
            Ok(map) => map,
            Err(poisoned) => poisoned.into_inner(),
        };
        map.entry(chat_id).or_default().push(message.to_string());
        Ok(())
    }
}
