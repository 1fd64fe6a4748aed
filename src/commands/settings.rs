use crate::args::SaveSettingsArgs;
use crate::commands::Out;
use crate::model::Settings;
use crate::session::Session;
use crate::Result;
use tracing::warn;

/// Replaces the stored Telegram settings. The token is masked in the output.
///
/// Settings are saved even when the token or chat id is missing, since sending is where they are
/// checked, but a warning is logged.
pub async fn save_settings(session: &Session, args: &SaveSettingsArgs) -> Result<Out<Settings>> {
    let settings = Settings {
        token: args.token().trim().to_string(),
        chat_id: args.chat_id().trim().to_string(),
        send_daily: args.daily(),
        send_weekly: args.weekly(),
        send_monthly: args.monthly(),
    };
    if settings.token_missing() || settings.chat_id_missing() {
        warn!("The token or chat id is not set, reports cannot be sent until it is");
    }
    session.save_settings(&settings).await?;
    Ok(Out::new("Settings saved", settings.redacted()))
}

/// Returns the stored Telegram settings with the token masked.
pub async fn show_settings(session: &Session) -> Result<Out<Settings>> {
    let settings = session.settings().await.redacted();
    let on = |b: bool| if b { "on" } else { "off" };
    let message = format!(
        "Token: {}\nChat id: {}\nDaily: {}\nWeekly: {}\nMonthly: {}",
        settings.token,
        settings.chat_id,
        on(settings.send_daily),
        on(settings.send_weekly),
        on(settings.send_monthly)
    );
    Ok(Out::new(message, settings))
}
