//! Detects a page's primary navigation and extracts its menu hierarchy.
//!
//! The engine is synchronous and does no I/O: callers hand it a parsed
//! document and the page URL, and get back an [`Extraction`] holding the
//! [`MenuTree`] and a quality [`Verdict`].

pub mod assemble;
pub mod config;
pub mod dom;
pub mod error;
pub mod hierarchy;
pub mod item;
pub mod locate;
pub mod model;
pub mod predicates;
pub mod resolver;
pub mod result;
pub mod scorer;
pub mod validate;
mod vocab;

pub use config::{EngineConfig, ItemBand, ScoreWeights, ValidationConfig};
pub use error::{NavError, Result};
pub use locate::SearchMode;
pub use model::{LinkItem, Menu, MenuTree, NavNode, Section, TreeStats};
pub use resolver::SitePatterns;
pub use result::{Detection, Extraction, Verdict};
pub use scraper::Html;

use crate::dom::{describe, Page};
use crate::item::LinkExtractor;
use crate::predicates::is_visible;
use crate::scorer::count_top_level_items;
use scraper::{ElementRef, Selector};
use tracing::info;
use url::Url;

/// Reusable extractor. Holds only configuration, so one instance can serve
/// any number of documents, sequentially or from several threads.
#[derive(Debug, Clone, Default)]
pub struct NavExtractor {
    config: EngineConfig,
    container_selector: Option<String>,
    patterns: SitePatterns,
}

impl NavExtractor {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            container_selector: None,
            patterns: SitePatterns::default(),
        }
    }

    /// Uses `css` to pick the navigation root when it matches a visible
    /// element, falling back to the scored search otherwise.
    pub fn with_container_selector(mut self, css: &str) -> Result<Self> {
        Selector::parse(css).map_err(|_| NavError::InvalidSelector(css.to_string()))?;
        self.container_selector = Some(css.to_string());
        Ok(self)
    }

    /// Treats `<a>` and `<button>` elements whose class matches `pattern`
    /// as dropdown triggers.
    pub fn with_trigger_pattern(mut self, pattern: &str) -> Result<Self> {
        self.patterns.trigger = Some(SitePatterns::compile(pattern)?);
        Ok(self)
    }

    /// Resolves a trigger's panel by class before any other strategy: the
    /// trigger's siblings first, then the children of its nearest
    /// `div`/`li`/`nav` ancestor.
    pub fn with_panel_pattern(mut self, pattern: &str) -> Result<Self> {
        self.patterns.panel = Some(SitePatterns::compile(pattern)?);
        Ok(self)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parses `html` and runs a primary-mode extraction.
    pub fn extract_html(&self, html: &str, base_url: &str) -> Result<Extraction> {
        let document = Html::parse_document(html);
        self.extract(&document, base_url, SearchMode::Primary)
    }

    pub fn extract(&self, document: &Html, base_url: &str, mode: SearchMode) -> Result<Extraction> {
        let base = Url::parse(base_url)
            .map_err(|e| NavError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        let page = Page::new(document);
        let (root, detection) = self.locate(document, &page, mode)?;

        let mut links = LinkExtractor::new(base.clone(), mode, &self.config).with_scope(root);
        let assembly = assemble::assemble_tree(root, &page, &mut links, &self.config, &self.patterns);
        let tree = MenuTree::new(assembly.nodes);
        let verdict = validate::validate(&tree, &base, &self.config.validation);

        info!(
            "{}: {} ({} via {})",
            base_url,
            verdict.reason,
            if verdict.accepted { "accepted" } else { "rejected" },
            detection.container
        );

        Ok(Extraction {
            base_url: base_url.to_string(),
            tree,
            verdict,
            detection,
            script_rendered: assembly.script_rendered,
        })
    }

    fn locate<'a>(
        &self,
        document: &'a Html,
        page: &Page<'a>,
        mode: SearchMode,
    ) -> Result<(ElementRef<'a>, Detection)> {
        if let Some(css) = &self.container_selector
            && let Ok(selector) = Selector::parse(css)
            && let Some(root) = document.select(&selector).find(|el| is_visible(*el))
        {
            return Ok((
                root,
                Detection {
                    mode,
                    score: None,
                    item_count: count_top_level_items(root),
                    container: describe(root),
                },
            ));
        }

        let candidate = locate::find_navigation(page.root(), mode, &self.config)
            .map_err(|report| NavError::NoNavigation(report.reason()))?;
        Ok((
            candidate.element,
            Detection {
                mode,
                score: Some(candidate.score),
                item_count: candidate.item_count,
                container: describe(candidate.element),
            },
        ))
    }
}
