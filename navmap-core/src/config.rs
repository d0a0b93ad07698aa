// Scraper configuration file

use crate::report::OutputConvention;
use navmap_engine::validate::site_domain;
use navmap_engine::{EngineConfig, NavExtractor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "~/.config/navmap/config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub engine: EngineConfig,
    pub fetch: FetchConfig,
    pub output: OutputConfig,
    pub workers: usize,
    /// Retry in footer mode when the primary pass finds no navigation.
    pub footer_fallback: bool,
    /// Per-domain overrides keyed by domain without `www.`.
    pub sites: BTreeMap<String, SiteOverride>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            fetch: FetchConfig::default(),
            output: OutputConfig::default(),
            workers: 10,
            footer_fallback: false,
            sites: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
    /// Pause before each site's fetch, per worker.
    pub rate_limit_ms: u64,
    /// Empty means the fetcher's built-in browser agents.
    pub user_agents: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            retry_attempts: 3,
            retry_delay_ms: 2000,
            rate_limit_ms: 0,
            user_agents: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub convention: OutputConvention,
    /// Skip domains that already have a success document.
    pub resume: bool,
    pub save_failures: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("navigation_data"),
            convention: OutputConvention::Tree,
            resume: true,
            save_failures: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteOverride {
    pub container_selector: Option<String>,
    /// Class pattern marking the site's dropdown triggers.
    pub trigger_pattern: Option<String>,
    /// Class pattern marking the panel next to a trigger.
    pub panel_pattern: Option<String>,
    /// Extra domains counted as internal for this site.
    pub aliases: Vec<String>,
}

impl ScraperConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn site_override(&self, url: &str) -> Option<&SiteOverride> {
        let host = Url::parse(url).ok()?.host_str()?.to_string();
        self.sites
            .get(&site_domain(&host))
            .or_else(|| self.sites.get(&host))
    }

    /// Engine settings for `url` with the site's aliases merged into the
    /// validation alias table.
    pub fn engine_for(&self, url: &str) -> EngineConfig {
        let mut engine = self.engine.clone();
        if let Some(site) = self.site_override(url)
            && !site.aliases.is_empty()
            && let Some(host) = host_domain(url)
        {
            merge_aliases(&mut engine, host, &site.aliases);
        }
        engine
    }

    pub fn extractor_for(&self, url: &str) -> navmap_engine::Result<NavExtractor> {
        self.extractor_for_page(url, url)
    }

    /// Extractor for a page requested as `site_url` and served from
    /// `page_url`. The override is looked up by the requested site, so it
    /// survives a redirect to another domain, where the requested domain and
    /// its aliases stay internal.
    pub fn extractor_for_page(
        &self,
        site_url: &str,
        page_url: &str,
    ) -> navmap_engine::Result<NavExtractor> {
        let mut engine = self.engine_for(site_url);
        if let (Some(site), Some(page)) = (host_domain(site_url), host_domain(page_url))
            && site != page
        {
            let mut inherited = engine
                .validation
                .domain_aliases
                .get(&site)
                .cloned()
                .unwrap_or_default();
            inherited.push(site);
            merge_aliases(&mut engine, page, &inherited);
        }

        let mut extractor = NavExtractor::new(engine);
        let Some(site) = self.site_override(site_url) else {
            return Ok(extractor);
        };
        if let Some(css) = &site.container_selector {
            extractor = extractor.with_container_selector(css)?;
        }
        if let Some(pattern) = &site.trigger_pattern {
            extractor = extractor.with_trigger_pattern(pattern)?;
        }
        if let Some(pattern) = &site.panel_pattern {
            extractor = extractor.with_panel_pattern(pattern)?;
        }
        Ok(extractor)
    }
}

fn host_domain(url: &str) -> Option<String> {
    Url::parse(url).ok()?.host_str().map(site_domain)
}

fn merge_aliases(engine: &mut EngineConfig, host: String, extra: &[String]) {
    let aliases = engine.validation.domain_aliases.entry(host).or_default();
    for alias in extra {
        if !aliases.contains(alias) {
            aliases.push(alias.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navmap_engine::NavError;
    use tempfile::TempDir;

    #[test]
    fn test_empty_object_is_a_valid_config() {
        let config: ScraperConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ScraperConfig::default());
        assert_eq!(config.workers, 10);
        assert!(config.output.resume);
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config: ScraperConfig = serde_json::from_str(
            r#"{"fetch": {"timeout_secs": 30}, "output": {"convention": "menus"}, "engine": {"item_band": {"min": 4, "max": 40}}}"#,
        )
        .unwrap();
        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.fetch.retry_attempts, 3);
        assert_eq!(config.output.convention, OutputConvention::Menus);
        assert_eq!(config.engine.item_band.min, 4);
        assert_eq!(config.engine.validation.min_items, 3);
    }

    #[test]
    fn test_site_override_lookup_ignores_www() {
        let mut config = ScraperConfig::default();
        config.sites.insert(
            "acme.test".to_string(),
            SiteOverride {
                container_selector: Some("#menu".to_string()),
                aliases: vec!["acme-cdn.test".to_string()],
                ..SiteOverride::default()
            },
        );

        assert!(config.site_override("https://www.acme.test/").is_some());
        assert!(config.site_override("https://other.test/").is_none());
        assert!(config.site_override("not a url").is_none());

        let engine = config.engine_for("https://www.acme.test/");
        assert_eq!(
            engine.validation.domain_aliases.get("acme.test"),
            Some(&vec!["acme-cdn.test".to_string()])
        );
        assert!(config.engine_for("https://other.test/").validation.domain_aliases.is_empty());
    }

    #[test]
    fn test_invalid_site_selector_is_reported() {
        let mut config = ScraperConfig::default();
        config.sites.insert(
            "acme.test".to_string(),
            SiteOverride {
                container_selector: Some("[[".to_string()),
                ..SiteOverride::default()
            },
        );
        assert!(config.extractor_for("https://acme.test/").is_err());
        assert!(config.extractor_for("https://other.test/").is_ok());
    }

    #[test]
    fn test_invalid_site_patterns_are_reported() {
        let mut config = ScraperConfig::default();
        config.sites.insert(
            "acme.test".to_string(),
            SiteOverride {
                panel_pattern: Some("(dropdown".to_string()),
                ..SiteOverride::default()
            },
        );
        assert!(matches!(
            config.extractor_for("https://acme.test/"),
            Err(NavError::InvalidPattern(_))
        ));

        let site: SiteOverride =
            serde_json::from_str(r#"{"trigger_pattern": "global-nav-tab"}"#).unwrap();
        config.sites.insert("acme.test".to_string(), site);
        assert!(config.extractor_for("https://acme.test/").is_ok());
    }

    #[test]
    fn test_override_follows_requested_site_across_redirects() {
        let mut config = ScraperConfig::default();
        config.sites.insert(
            "acme.test".to_string(),
            SiteOverride {
                aliases: vec!["acme-cdn.test".to_string()],
                ..SiteOverride::default()
            },
        );

        let extractor = config
            .extractor_for_page("https://acme.test/", "https://acme-global.test/home")
            .unwrap();
        assert_eq!(
            extractor.config().validation.domain_aliases.get("acme-global.test"),
            Some(&vec!["acme-cdn.test".to_string(), "acme.test".to_string()])
        );

        let same = config
            .extractor_for_page("https://acme.test/", "https://www.acme.test/")
            .unwrap();
        assert!(same.config().validation.domain_aliases.get("acme-global.test").is_none());
    }

    #[test]
    fn test_save_and_load() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("nested").join("config.json");

        let mut config = ScraperConfig::default();
        config.workers = 4;
        config.footer_fallback = true;
        config.save(&path)?;

        let loaded = ScraperConfig::load(&path)?;
        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn test_load_errors() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        assert!(matches!(
            ScraperConfig::load(&dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));

        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json")?;
        assert!(matches!(ScraperConfig::load(&path), Err(ConfigError::Parse(_))));
        Ok(())
    }
}
