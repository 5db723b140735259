// src/promo.rs
//! Promo entity: one scraped deal, plus its persisted record shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A deal listing as the pipeline sees it.
///
/// Fields scraped from markup stay `None` when the selector matched nothing;
/// only `link` is checked later (at write and broadcast time).
#[derive(Debug, Clone, PartialEq)]
pub struct Promo {
    pub id: String,
    pub score: Option<i64>, // "temperature" of the deal
    pub title: Option<String>,
    pub link: Option<String>,
    pub price: Option<String>, // display text, currency symbol included
    pub created_at: DateTime<Utc>,
}

impl Default for Promo {
    fn default() -> Self {
        Self {
            id: String::new(),
            score: Some(0),
            title: Some(String::new()),
            link: Some(String::new()),
            price: None,
            created_at: Utc::now(),
        }
    }
}

/// Raw values pulled out of one deal element.
#[derive(Debug, Clone, Default)]
pub struct PromoFields {
    pub id: Option<String>,
    pub score: Option<i64>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub price: Option<String>,
}

/// Record as written to / read from the store.
///
/// `temp` keeps the attribute name used by existing tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPromo {
    pub id: String,
    pub created_at: i64, // epoch millis, sort key
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub temp: Option<i64>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
}

/// Composite primary key of a stored promo.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PromoKey {
    pub id: String,
    pub created_at: i64,
}

impl StoredPromo {
    pub fn key(&self) -> PromoKey {
        PromoKey {
            id: self.id.clone(),
            created_at: self.created_at,
        }
    }
}

impl Promo {
    /// Build a fresh promo from scraped values. No validation happens here.
    pub fn from_fields(fields: PromoFields, now: DateTime<Utc>) -> Self {
        Self {
            id: fields.id.unwrap_or_default(),
            score: fields.score,
            title: fields.title,
            link: fields.link,
            price: fields.price,
            created_at: now,
        }
    }

    pub fn from_stored(raw: StoredPromo) -> Self {
        Self {
            id: raw.id,
            score: raw.temp,
            title: raw.title,
            link: raw.link,
            price: raw.price,
            created_at: DateTime::from_timestamp_millis(raw.created_at).unwrap_or_default(),
        }
    }

    pub fn batch_from_stored(raw: Vec<StoredPromo>) -> Vec<Self> {
        raw.into_iter().map(Self::from_stored).collect()
    }

    pub fn to_stored(&self) -> StoredPromo {
        StoredPromo {
            id: self.id.clone(),
            created_at: self.created_at.timestamp_millis(),
            title: self.title.clone(),
            temp: self.score,
            link: self.link.clone(),
            price: self.price.clone(),
        }
    }

    pub fn key(&self) -> PromoKey {
        PromoKey {
            id: self.id.clone(),
            created_at: self.created_at.timestamp_millis(),
        }
    }

    /// Only promos with a non-empty link are persisted or broadcast.
    pub fn has_link(&self) -> bool {
        self.link.as_deref().is_some_and(|l| !l.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn from_fields_defaults_missing_id_to_empty() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let p = Promo::from_fields(
            PromoFields {
                title: Some("Great Deal".into()),
                ..Default::default()
            },
            now,
        );
        assert_eq!(p.id, "");
        assert_eq!(p.score, None);
        assert_eq!(p.created_at, now);
        assert!(!p.has_link());
    }

    #[test]
    fn default_promo_has_zero_score_and_empty_strings() {
        let p = Promo::default();
        assert_eq!(p.score, Some(0));
        assert_eq!(p.title.as_deref(), Some(""));
        assert!(!p.has_link());
    }

    #[test]
    fn stored_timestamp_is_parsed_from_millis() {
        let raw = StoredPromo {
            id: "thread_1".into(),
            created_at: 1_700_000_000_123,
            title: Some("TV".into()),
            temp: Some(250),
            link: Some("https://x/y".into()),
            price: Some("$10".into()),
        };
        let promos = Promo::batch_from_stored(vec![raw.clone()]);
        assert_eq!(promos[0].created_at.timestamp_millis(), 1_700_000_000_123);
        assert_eq!(promos[0].to_stored(), raw);
    }

    #[test]
    fn whitespace_link_does_not_count() {
        let p = Promo {
            link: Some("   ".into()),
            ..Default::default()
        };
        assert!(!p.has_link());
    }
}
