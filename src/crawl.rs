// src/crawl.rs
//! Crawl orchestrator: fan the page fetcher out over every site, route and page.

use chrono::{DateTime, Utc};

use crate::batch::settle_all;
use crate::config::SiteCatalog;
use crate::error::JobError;
use crate::promo::Promo;
use crate::scrape::{scrape_url, PageSource};

/// One page to request, with the names used in logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTarget {
    pub site: String,
    pub route: String,
    pub page: u32,
    pub url: String,
}

/// `site_url + route_path + "?page=" + n` for n in 1..=depth, catalog order.
pub fn page_targets(catalog: &SiteCatalog, depth: u32) -> Vec<PageTarget> {
    let mut out = Vec::with_capacity(catalog.route_count() * depth as usize);
    for site in &catalog.sites {
        tracing::info!(target: "crawl", site = %site.name, "scraping site");
        for route in &site.routes {
            tracing::info!(target: "crawl", site = %site.name, route = %route.name, "collecting route");
            for page in 1..=depth {
                out.push(PageTarget {
                    site: site.name.clone(),
                    route: route.name.clone(),
                    page,
                    url: format!("{}{}?page={}", site.url, route.path, page),
                });
            }
        }
    }
    out
}

/// Fetch every target at once and merge the results in issue order.
/// Any failed page fails the whole crawl.
pub async fn crawl_sites(
    source: &dyn PageSource,
    catalog: &SiteCatalog,
    depth: u32,
    now: DateTime<Utc>,
) -> Result<Vec<Promo>, JobError> {
    let targets = page_targets(catalog, depth);
    let outcome = settle_all(targets.iter().map(|t| scrape_url(source, &t.url, now))).await;

    if outcome.failed() > 0 {
        tracing::warn!(
            target: "crawl",
            failed = outcome.failed(),
            pages = outcome.len(),
            "page fetches failed"
        );
    }

    let pages = outcome.into_all_or_nothing().map_err(JobError::Fetch)?;
    Ok(pages.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Route, Site};

    #[test]
    fn targets_cover_every_route_and_page() {
        let cat = SiteCatalog {
            sites: vec![Site {
                name: "S".into(),
                url: "https://s.test".into(),
                routes: vec![
                    Route {
                        name: "Hot".into(),
                        path: "/hot".into(),
                    },
                    Route {
                        name: "New".into(),
                        path: "/new".into(),
                    },
                ],
            }],
        };
        let t = page_targets(&cat, 3);
        assert_eq!(t.len(), 6);
        assert_eq!(t[0].url, "https://s.test/hot?page=1");
        assert_eq!(t[2].url, "https://s.test/hot?page=3");
        assert_eq!(t[5].url, "https://s.test/new?page=3");
    }
}
