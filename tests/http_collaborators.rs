// tests/http_collaborators.rs
//
// The reqwest-backed page source and Telegram notifier against a local axum
// listener on an ephemeral port.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Query, RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Router,
};
use chrono::Utc;

use promobot::notify::{Notifier, TelegramNotifier};
use promobot::scrape::{scrape_url, HttpPageSource, PageSource};

const FIXTURE: &str = include_str!("fixtures/promos_page.html");

#[derive(Clone, Default)]
struct Seen {
    queries: Arc<Mutex<Vec<(HashMap<String, String>, String)>>>,
    agents: Arc<Mutex<Vec<String>>>,
}

async fn send_message(
    State(seen): State<Seen>,
    Query(q): Query<HashMap<String, String>>,
    RawQuery(raw): RawQuery,
) -> &'static str {
    seen.queries.lock().unwrap().push((q, raw.unwrap_or_default()));
    r#"{"ok":true}"#
}

async fn listing(State(seen): State<Seen>, headers: HeaderMap) -> &'static str {
    let ua = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    seen.agents.lock().unwrap().push(ua);
    FIXTURE
}

async fn spawn_server() -> (String, Seen) {
    let seen = Seen::default();
    let app = Router::new()
        .route("/bot/sendMessage", get(send_message))
        .route("/bot/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route(
            "/bot/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                "late"
            }),
        )
        .route("/hot", get(listing))
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), seen)
}

#[tokio::test]
async fn telegram_send_carries_chat_id_and_encoded_text() {
    let (base, seen) = spawn_server().await;
    let n = TelegramNotifier::new(format!("{base}/bot/sendMessage"), "-100123".into());
    assert!(n.is_enabled());

    let text = "Pantalla 55\" 4K | $7,499 | 1024\n https://deals.test/a?x=1&y=2";
    n.send(text).await.unwrap();

    let queries = seen.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    let (q, raw) = &queries[0];
    assert_eq!(q.get("chat_id").map(String::as_str), Some("-100123"));
    assert_eq!(q.get("text").map(String::as_str), Some(text));
    assert!(raw.contains("%0A"), "newline must be percent-encoded: {raw}");
    assert!(!raw.contains('\n'));
}

#[tokio::test]
async fn telegram_non_2xx_is_an_error() {
    let (base, _seen) = spawn_server().await;
    let n = TelegramNotifier::new(format!("{base}/bot/broken"), "1".into());
    let err = n.send("hello").await.unwrap_err();
    assert!(format!("{err:#}").contains("500"), "unexpected error: {err:#}");
}

#[tokio::test]
async fn telegram_timeout_is_an_error() {
    let (base, _seen) = spawn_server().await;
    let n = TelegramNotifier::new(format!("{base}/bot/slow"), "1".into())
        .with_timeout(Duration::from_millis(100));
    assert!(n.send("hello").await.is_err());
}

#[tokio::test]
async fn page_fetch_parses_live_deals_with_browser_agent() {
    let (base, seen) = spawn_server().await;
    let pages = HttpPageSource::new(Duration::from_secs(3)).unwrap();

    let promos = scrape_url(&pages, &format!("{base}/hot"), Utc::now()).await.unwrap();
    assert_eq!(promos.len(), 3);
    assert_eq!(promos[0].id, "thread_861204");

    let agents = seen.agents.lock().unwrap();
    assert!(agents[0].starts_with("Mozilla/5.0"), "agent was {:?}", agents[0]);
}

#[tokio::test]
async fn page_fetch_404_is_an_error() {
    let (base, _seen) = spawn_server().await;
    let pages = HttpPageSource::new(Duration::from_secs(3)).unwrap();
    let err = pages.fetch_page(&format!("{base}/missing")).await.unwrap_err();
    assert!(format!("{err:#}").contains("404"), "unexpected error: {err:#}");
}
