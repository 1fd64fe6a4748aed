use serde::{Deserialize, Serialize};

/// Placeholder that the settings page used to show in place of a real bot token.
pub const TOKEN_PLACEHOLDER: &str = "YOUR_BOT_TOKEN";

/// Placeholder that the settings page used to show in place of a real chat id.
pub const CHAT_ID_PLACEHOLDER: &str = "YOUR_CHAT_ID";

/// Telegram credentials and report schedule, stored under the `telegramSettings` key.
///
/// Example:
/// ```json
/// {
///   "token": "123456:ABC-DEF",
///   "chatId": "-100200300",
///   "sendDaily": false,
///   "sendWeekly": true,
///   "sendMonthly": false
/// }
/// ```
#[derive(
    Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// The Telegram bot token.
    #[serde(alias = "botToken")]
    pub token: String,
    /// The chat that reports are delivered to.
    pub chat_id: String,
    /// Send a report covering the last day when scheduled reports run.
    pub send_daily: bool,
    /// Send a report covering the last 7 days when scheduled reports run.
    pub send_weekly: bool,
    /// Send a report covering the last 30 days when scheduled reports run.
    pub send_monthly: bool,
}

impl Settings {
    /// True if the token is missing, blank or the placeholder.
    pub fn token_missing(&self) -> bool {
        is_unset(&self.token, TOKEN_PLACEHOLDER)
    }

    /// True if the chat id is missing, blank or the placeholder.
    pub fn chat_id_missing(&self) -> bool {
        is_unset(&self.chat_id, CHAT_ID_PLACEHOLDER)
    }

    /// The report windows, in days, that are enabled for scheduled sending.
    pub fn scheduled_windows(&self) -> Vec<u32> {
        [
            (self.send_daily, 1),
            (self.send_weekly, 7),
            (self.send_monthly, 30),
        ]
        .into_iter()
        .filter_map(|(on, days)| on.then_some(days))
        .collect()
    }

    /// A copy that is safe to print, with all but the last four characters of the token masked.
    pub fn redacted(&self) -> Self {
        let token = if self.token.chars().count() <= 4 {
            "*".repeat(self.token.chars().count())
        } else {
            let keep: String = self
                .token
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("****{keep}")
        };
        Self {
            token,
            ..self.clone()
        }
    }
}

fn is_unset(value: &str, placeholder: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v == placeholder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_settings_page_json() {
        let json = r#"{"token":"abc","chatId":"42","sendDaily":true,"sendWeekly":false,"sendMonthly":true}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.token, "abc");
        assert_eq!(s.chat_id, "42");
        assert_eq!(s.scheduled_windows(), vec![1, 30]);
    }

    #[test]
    fn test_accepts_bot_token_alias_and_missing_fields() {
        let s: Settings = serde_json::from_str(r#"{"botToken":"t"}"#).unwrap();
        assert_eq!(s.token, "t");
        assert_eq!(s.chat_id, "");
        assert!(!s.send_weekly);
    }

    #[test]
    fn test_placeholders_count_as_missing() {
        let s = Settings {
            token: TOKEN_PLACEHOLDER.to_string(),
            chat_id: format!(" {CHAT_ID_PLACEHOLDER} "),
            ..Default::default()
        };
        assert!(s.token_missing());
        assert!(s.chat_id_missing());
        assert!(Settings::default().token_missing());
    }

    #[test]
    fn test_redacted() {
        let s = Settings {
            token: "123456:ABCDEF".to_string(),
            ..Default::default()
        };
        assert_eq!(s.redacted().token, "****CDEF");
        let short = Settings {
            token: "abc".to_string(),
            ..Default::default()
        };
        assert_eq!(short.redacted().token, "***");
    }
}
