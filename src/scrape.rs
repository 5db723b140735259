// src/scrape.rs
//! Page fetcher: download one listing page and pull the live deals out of it.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::counter;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::html::PromoElement;
use crate::promo::{Promo, PromoFields};

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

// Static selectors; parse failures here are programming errors.
static SEL_ACTIVE_DEAL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".thread--deal:not(.thread--expired)").unwrap());
static SEL_TEMP: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".vote-temp--hot, .vote-temp--burn").unwrap());
static SEL_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse(".thread-link").unwrap());
static SEL_PRICE: Lazy<Selector> = Lazy::new(|| Selector::parse(".thread-price").unwrap());

/// Where page bodies come from. The HTTP implementation is the real one;
/// tests plug in canned HTML.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

pub struct HttpPageSource {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpPageSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("building page http client")?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("non-2xx from {url}"))?;
        resp.text()
            .await
            .with_context(|| format!("reading body of {url}"))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Parse a temperature marker such as `"345°"`, `"-12°"` or `"1,024°"`.
pub fn parse_score(raw: &str) -> Option<i64> {
    static RE_NUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?[\d,.]+").unwrap());
    let m = RE_NUM.find(raw)?;
    let digits: String = m
        .as_str()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    digits.parse().ok()
}

/// Extract every non-expired deal from a page body, in document order.
pub fn parse_promos(body: &str, now: DateTime<Utc>) -> Vec<Promo> {
    let doc = Html::parse_document(body);
    doc.select(&SEL_ACTIVE_DEAL)
        .map(|article| {
            let el = PromoElement::new(article);
            let fields = PromoFields {
                id: el.id(),
                score: el.find_first_text(&SEL_TEMP).as_deref().and_then(parse_score),
                title: el.find_first_attr(&SEL_LINK, "title"),
                link: el.find_first_attr(&SEL_LINK, "href"),
                price: el.find_first_text(&SEL_PRICE),
            };
            Promo::from_fields(fields, now)
        })
        .collect()
}

/// Fetch one page and parse it. Fetch failures propagate to the caller.
pub async fn scrape_url(source: &dyn PageSource, url: &str, now: DateTime<Utc>) -> Result<Vec<Promo>> {
    let body = source.fetch_page(url).await?;
    let promos = parse_promos(&body, now);
    tracing::debug!(target: "scrape", %url, found = promos.len(), "page parsed");
    counter!("promobot_scraped_total").increment(promos.len() as u64);
    Ok(promos)
}
