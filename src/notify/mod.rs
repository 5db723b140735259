// src/notify/mod.rs
pub mod telegram;

use anyhow::Result;
use metrics::counter;

use crate::batch::settle_all;
use crate::promo::Promo;

pub use telegram::TelegramNotifier;

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
    fn name(&self) -> &'static str;

    /// A disabled notifier is skipped by `broadcast` instead of being called.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// `"<title> | <price> | <score>\n <link>"`, absent values rendered empty.
pub fn format_message(p: &Promo) -> String {
    format!(
        "{} | {} | {}\n {}",
        p.title.as_deref().unwrap_or_default(),
        p.price.as_deref().unwrap_or_default(),
        p.score.map(|s| s.to_string()).unwrap_or_default(),
        p.link.as_deref().unwrap_or_default()
    )
}

/// One message per promo with a link, all sent at once.
/// A single failed send fails the broadcast. Returns how many were delivered.
pub async fn broadcast(notifier: &dyn Notifier, promos: &[Promo]) -> Result<usize> {
    let messages: Vec<String> = promos
        .iter()
        .filter(|p| p.has_link())
        .map(format_message)
        .collect();

    if !notifier.is_enabled() {
        if !messages.is_empty() {
            tracing::warn!(
                target: "notify",
                notifier = notifier.name(),
                skipped = messages.len(),
                "notifier disabled; new promos stored without a broadcast"
            );
        }
        return Ok(0);
    }

    let outcome = settle_all(messages.iter().map(|m| notifier.send(m))).await;
    if outcome.failed() > 0 {
        tracing::warn!(
            target: "notify",
            notifier = notifier.name(),
            failed = outcome.failed(),
            total = outcome.len(),
            "broadcast incomplete"
        );
    }
    let sent = outcome.into_all_or_nothing()?.len();
    counter!("promobot_notified_total").increment(sent as u64);
    Ok(sent)
}
