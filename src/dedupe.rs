// src/dedupe.rs
//! Intra-batch dedupe and the diff against what is already stored.

use std::collections::HashSet;

use crate::promo::Promo;

/// Keep the first occurrence of each id, preserving scrape order.
/// Returns the kept promos and how many were dropped.
pub fn remove_repeated(promos: Vec<Promo>) -> (Vec<Promo>, usize) {
    let mut seen: HashSet<String> = HashSet::with_capacity(promos.len());
    let mut keep = Vec::with_capacity(promos.len());
    let mut dropped = 0usize;

    for p in promos {
        if !seen.insert(p.id.clone()) {
            dropped += 1;
            continue;
        }
        keep.push(p);
    }

    (keep, dropped)
}

/// Keep fresh promos that match no stored promo by id or by title.
///
/// Either key alone is enough to exclude. Titles compare as options, so an
/// untitled promo matches any stored untitled one.
pub fn filter_new(fresh: Vec<Promo>, stored: &[Promo]) -> Vec<Promo> {
    let ids: HashSet<&str> = stored.iter().map(|p| p.id.as_str()).collect();
    let titles: HashSet<Option<&str>> = stored.iter().map(|p| p.title.as_deref()).collect();

    fresh
        .into_iter()
        .filter(|p| {
            let id_hit = ids.contains(p.id.as_str());
            let title_hit = titles.contains(&p.title.as_deref());
            !(id_hit || title_hit)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn promo(id: &str, title: Option<&str>) -> Promo {
        Promo {
            id: id.into(),
            title: title.map(Into::into),
            ..Default::default()
        }
    }

    #[test]
    fn first_occurrence_wins() {
        let (kept, dropped) = remove_repeated(vec![
            promo("a", Some("first")),
            promo("b", Some("b")),
            promo("a", Some("second")),
        ]);
        assert_eq!(dropped, 1);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].title.as_deref(), Some("first"));
        assert_eq!(kept[1].id, "b");
    }

    #[test]
    fn id_match_alone_excludes() {
        let stored = vec![promo("a", Some("old title"))];
        let out = filter_new(vec![promo("a", Some("new title"))], &stored);
        assert!(out.is_empty());
    }

    #[test]
    fn title_match_alone_excludes() {
        let stored = vec![promo("x1", Some("Great Deal"))];
        let out = filter_new(
            vec![promo("x2", Some("Great Deal")), promo("x3", Some("Other"))],
            &stored,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "x3");
    }

    #[test]
    fn missing_titles_match_each_other() {
        let stored = vec![promo("s", None)];
        let out = filter_new(vec![promo("f", None)], &stored);
        assert!(out.is_empty());
    }

    #[test]
    fn missing_title_does_not_match_a_titled_one() {
        let stored = vec![promo("s", Some("Deal"))];
        let out = filter_new(vec![promo("f", None)], &stored);
        assert_eq!(out.len(), 1);

        let stored = vec![promo("s", None)];
        let out = filter_new(vec![promo("f", Some("Deal"))], &stored);
        assert_eq!(out.len(), 1);
    }
}
