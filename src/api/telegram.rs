//! A `Notifier` backed by the Telegram Bot API `sendMessage` method.

use crate::api::{check_credentials, Notifier};
use crate::error::{Error, ErrorType, Res};
use crate::model::Settings;
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// The parts of the Bot API response envelope that we look at.
#[derive(Debug, Deserialize)]
struct Reply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Posts messages to `{api_url}/bot{token}/sendMessage`. Makes exactly one attempt per message.
#[derive(Debug, Clone)]
pub(crate) struct TelegramNotifier {
    client: reqwest::Client,
    api_url: String,
}

impl TelegramNotifier {
    /// Builds the HTTP client. Without a `timeout` the client default applies.
    pub(crate) fn new(api_url: &str, timeout: Option<Duration>) -> Res<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Unable to build the HTTP client")?;
        Ok(Self::with_client(api_url, client))
    }

    pub(crate) fn with_client(api_url: &str, client: reqwest::Client) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, token: &str) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, token)
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str, settings: &Settings) -> Result<()> {
        check_credentials(settings)?;
        let body = SendMessage {
            chat_id: settings.chat_id.trim(),
            text: message,
        };

        // The URL contains the bot token, so it is stripped from transport errors.
        let response = self
            .client
            .post(self.endpoint(settings.token.trim()))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                Error::msg(
                    ErrorType::Network,
                    format!("Unable to reach Telegram: {}", e.without_url()),
                )
            })?;

        let status = response.status();
        let reply: Reply = response.json().await.map_err(|e| {
            Error::msg(
                ErrorType::Network,
                format!(
                    "Unable to read the Telegram response (HTTP {status}): {}",
                    e.without_url()
                ),
            )
        })?;
        debug!("Telegram responded with HTTP {status}: {reply:?}");

        if !reply.ok {
            let description = reply
                .description
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(Error::msg(
                ErrorType::Network,
                format!("Telegram did not accept the message: {description}"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn settings() -> Settings {
        Settings {
            token: "123:abc".to_string(),
            chat_id: "42".to_string(),
            ..Default::default()
        }
    }

    fn notifier(api_url: &str) -> TelegramNotifier {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        TelegramNotifier::with_client(api_url, client)
    }

    /// Reads one HTTP request, headers and body.
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let line = line.to_ascii_lowercase();
                        line.strip_prefix("content-length:")
                            .and_then(|v| v.trim().parse::<usize>().ok())
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Serves one canned response on a local port. The handle yields the request it received.
    async fn respond_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\
                Connection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });
        (format!("http://{addr}"), handle)
    }

    #[tokio::test]
    async fn test_send_posts_chat_id_and_text() {
        let (url, server) = respond_once("200 OK", r#"{"ok":true,"result":{}}"#).await;
        notifier(&url).send("Hello", &settings()).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /bot123:abc/sendMessage "), "{request}");
        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let json: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(json, serde_json::json!({"chat_id": "42", "text": "Hello"}));
    }

    #[tokio::test]
    async fn test_provider_rejection_is_network_error() {
        let (url, server) = respond_once(
            "400 Bad Request",
            r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#,
        )
        .await;
        let err = notifier(&url).send("Hello", &settings()).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Network);
        assert!(err.to_string().contains("chat not found"), "{err}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_network_error() {
        let (url, server) = respond_once("502 Bad Gateway", "<html>oops</html>").await;
        let err = notifier(&url).send("Hello", &settings()).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Network);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let err = notifier(&format!("http://{addr}"))
            .send("Hello", &settings())
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Network);
        assert!(!err.to_string().contains("123:abc"), "{err}");
    }

    #[tokio::test]
    async fn test_missing_token_makes_no_request() {
        // Nothing listens on this address; a request would be a Network error.
        let mut settings = settings();
        settings.token = crate::model::TOKEN_PLACEHOLDER.to_string();
        let err = notifier("http://127.0.0.1:9")
            .send("Hello", &settings)
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let n = notifier("https://api.telegram.org/");
        assert_eq!(
            n.endpoint("1:a"),
            "https://api.telegram.org/bot1:a/sendMessage"
        );
    }
}
