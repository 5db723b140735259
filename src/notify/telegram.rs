use anyhow::{Context, Result};
use reqwest::{Client, Url};
use std::time::Duration;

use super::Notifier;
use crate::config::AppConfig;

/// Sends plain-text messages through a Telegram `sendMessage`-style endpoint:
/// one GET with `chat_id` and `text` query parameters, body ignored.
#[derive(Clone)]
pub struct TelegramNotifier {
    url: Option<String>,
    chat_id: String,
    client: Client,
    timeout: Duration,
}

impl TelegramNotifier {
    pub fn new(url: String, chat_id: String) -> Self {
        Self {
            url: Some(url),
            chat_id,
            client: Client::new(),
            timeout: Duration::from_secs(3),
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            url: cfg.telegram_url.clone(),
            chat_id: cfg.telegram_chat_id.clone().unwrap_or_default(),
            client: Client::new(),
            timeout: cfg.http_timeout,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let Some(url) = &self.url else {
            anyhow::bail!("telegram disabled: TELEGRAM_URL is not set");
        };

        let url = Url::parse_with_params(url, &[("chat_id", self.chat_id.as_str()), ("text", text)])
            .context("telegram url")?;

        self.client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .context("telegram send")?
            .error_for_status()
            .context("telegram non-2xx")?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "telegram"
    }

    /// Disabled when `TELEGRAM_URL` is not configured.
    fn is_enabled(&self) -> bool {
        self.url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_notifier_refuses_direct_sends() {
        let n = TelegramNotifier::from_config(&AppConfig::default());
        assert!(!n.is_enabled());
        assert!(n.send("hello").await.is_err());
    }

    #[tokio::test]
    async fn bad_url_is_reported() {
        let n = TelegramNotifier::new("not a url".into(), "1".into());
        assert!(n.send("hello").await.is_err());
    }
}
