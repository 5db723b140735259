// src/config/sites.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_SITES_PATH: &str = "SITES_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// Scrape targets. Pagination depth lives in `AppConfig`, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteCatalog {
    pub sites: Vec<Site>,
}

impl Default for SiteCatalog {
    fn default() -> Self {
        Self {
            sites: vec![Site {
                name: "Promodescuentos".into(),
                url: "https://www.promodescuentos.com".into(),
                routes: vec![
                    Route {
                        name: "Hot".into(),
                        path: "/hot".into(),
                    },
                    Route {
                        name: "Nuevas".into(),
                        path: "/nuevas".into(),
                    },
                ],
            }],
        }
    }
}

impl SiteCatalog {
    /// Load from an explicit path. Supports TOML or JSON formats.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading site catalog from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        parse_catalog(&content, ext.as_str())
    }

    /// Load using env var + fallbacks:
    /// 1) $SITES_PATH
    /// 2) config/sites.toml
    /// 3) config/sites.json
    /// 4) built-in default
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_SITES_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            } else {
                return Err(anyhow!("SITES_PATH points to non-existent path"));
            }
        }
        let toml_p = PathBuf::from("config/sites.toml");
        if toml_p.exists() {
            return Self::load_from(&toml_p);
        }
        let json_p = PathBuf::from("config/sites.json");
        if json_p.exists() {
            return Self::load_from(&json_p);
        }
        Ok(Self::default())
    }

    pub fn route_count(&self) -> usize {
        self.sites.iter().map(|s| s.routes.len()).sum()
    }
}

fn parse_catalog(s: &str, hint_ext: &str) -> Result<SiteCatalog> {
    let parsed = match hint_ext {
        "toml" => toml::from_str::<SiteCatalog>(s).context("parsing toml site catalog")?,
        "json" => serde_json::from_str::<SiteCatalog>(s).context("parsing json site catalog")?,
        _ => toml::from_str::<SiteCatalog>(s)
            .or_else(|_| serde_json::from_str::<SiteCatalog>(s))
            .map_err(|_| anyhow!("unsupported site catalog format"))?,
    };
    Ok(clean_catalog(parsed))
}

fn clean_catalog(cat: SiteCatalog) -> SiteCatalog {
    let sites = cat
        .sites
        .into_iter()
        .filter_map(|mut site| {
            site.url = site.url.trim().trim_end_matches('/').to_string();
            site.routes.retain(|r| !r.path.trim().is_empty());
            if site.url.is_empty() || site.routes.is_empty() {
                tracing::warn!(site = %site.name, "dropping site without url or routes");
                return None;
            }
            Some(site)
        })
        .collect();
    SiteCatalog { sites }
}
