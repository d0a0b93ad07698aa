use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tunables for every stage of the extraction pipeline.
///
/// All fields have defaults, so a partial JSON object (or `{}`) deserializes
/// into a working configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of `nav`/`header`/`div` elements examined, in document order.
    pub max_candidates: usize,
    /// Allowed range for a container's top-level item count.
    pub item_band: ItemBand,
    /// Minimum score for a primary-mode container.
    pub min_container_score: i32,
    /// Minimum score for a footer-mode container.
    pub min_footer_score: i32,
    pub weights: ScoreWeights,
    /// Elements scanned below the nav root while discovering triggers.
    pub max_trigger_scan: usize,
    pub max_trigger_text_len: usize,
    /// Dropdowns kept per navigation root, in discovery order.
    pub max_menus: usize,
    /// A panel holding fewer usable links than this is not a dropdown.
    pub min_panel_links: usize,
    /// Nor is one holding more than this.
    pub max_panel_links: usize,
    /// Section nesting bound for the hierarchy builder.
    pub max_hierarchy_depth: usize,
    /// Element steps a heading walk may take before it is truncated.
    pub heading_walk_limit: usize,
    /// Ancestor levels inspected by the footer/fence predicates.
    pub fence_depth: usize,
    /// Search the whole document for panels detached from their trigger.
    pub detached_panel_search: bool,
    pub detached_scan_limit: usize,
    /// Share of a trigger's words a detached panel must contain.
    pub min_word_overlap: f32,
    pub max_title_len: usize,
    pub max_section_title_len: usize,
    pub max_description_len: usize,
    pub extra_noise_keywords: Vec<String>,
    pub validation: ValidationConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_candidates: 250,
            item_band: ItemBand::default(),
            min_container_score: 150,
            min_footer_score: 100,
            weights: ScoreWeights::default(),
            max_trigger_scan: 2000,
            max_trigger_text_len: 100,
            max_menus: 15,
            min_panel_links: 2,
            max_panel_links: 60,
            max_hierarchy_depth: 3,
            heading_walk_limit: 200,
            fence_depth: 10,
            detached_panel_search: true,
            detached_scan_limit: 2000,
            min_word_overlap: 0.5,
            max_title_len: 200,
            max_section_title_len: 150,
            max_description_len: 500,
            extra_noise_keywords: Vec::new(),
            validation: ValidationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemBand {
    pub min: usize,
    pub max: usize,
}

impl Default for ItemBand {
    fn default() -> Self {
        Self { min: 3, max: 30 }
    }
}

impl ItemBand {
    pub fn contains(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

/// Container scoring weights. Signal strength is ordered semantic tag >
/// navigation role > position > class keywords > structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub semantic_tag: i32,
    pub navigation_role: i32,
    pub shallow_depth: i32,
    pub mid_depth: i32,
    pub depth_penalty_per_level: i32,
    pub deep_threshold: usize,
    pub deep_penalty: i32,
    pub primary_tokens: i32,
    pub nav_tokens: i32,
    pub nested_lists: i32,
    pub footer_penalty: i32,
    pub breadcrumb_penalty: i32,
    pub sidebar_penalty: i32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            semantic_tag: 200,
            navigation_role: 150,
            shallow_depth: 100,
            mid_depth: 50,
            depth_penalty_per_level: 20,
            deep_threshold: 8,
            deep_penalty: 150,
            primary_tokens: 90,
            nav_tokens: 60,
            nested_lists: 40,
            footer_penalty: 200,
            breadcrumb_penalty: 150,
            sidebar_penalty: 120,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub min_items: usize,
    pub min_internal_ratio: f64,
    pub max_duplicate_ratio: f64,
    /// Site domain -> additional domains treated as internal.
    pub domain_aliases: BTreeMap<String, Vec<String>>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_items: 3,
            min_internal_ratio: 0.25,
            max_duplicate_ratio: 0.2,
            domain_aliases: BTreeMap::new(),
        }
    }
}
