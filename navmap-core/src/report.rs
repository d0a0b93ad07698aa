// Output documents and the end-of-run report

use crate::config::OutputConfig;
use crate::scrape::{OutcomeStatus, SiteOutcome};
use navmap_engine::{Extraction, LinkItem, NavNode, SearchMode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Shape of the navigation in a success document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputConvention {
    /// The nested node tree under `navigation`.
    #[default]
    Tree,
    /// Flattened `menus` of titled sections.
    Menus,
}

impl OutputConvention {
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tree" | "navigation" => Some(OutputConvention::Tree),
            "menus" | "menu" => Some(OutputConvention::Menus),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputConvention::Tree => "tree",
            OutputConvention::Menus => "menus",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteDocument {
    pub website: String,
    pub domain: String,
    pub scraped_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation: Option<Vec<NavNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menus: Option<Vec<MenuEntry>>,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub total_links: usize,
    pub top_level_items: usize,
    pub max_depth: usize,
    pub menus: usize,
    pub internal_ratio: f64,
    pub detection_mode: SearchMode,
    pub detection_score: Option<i32>,
    pub container: String,
    pub verdict: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub script_rendered: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub menu_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub sections: Vec<MenuSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSection {
    pub section_title: String,
    pub items: Vec<LinkItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDocument {
    pub website: String,
    pub domain: String,
    pub failed_at: String,
    pub reason: String,
}

const LOOSE_LINKS_MENU: &str = "Navigation";

pub fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn build_document(
    website: &str,
    domain: &str,
    extraction: &Extraction,
    convention: OutputConvention,
    scraped_at: String,
) -> SiteDocument {
    let tree = &extraction.tree;
    let (navigation, menus) = match convention {
        OutputConvention::Tree => (Some(tree.nodes.clone()), None),
        OutputConvention::Menus => (None, Some(tree_to_menus(&tree.nodes))),
    };

    SiteDocument {
        website: website.to_string(),
        domain: domain.to_string(),
        scraped_at,
        navigation,
        menus,
        metadata: DocumentMetadata {
            total_links: tree.stats.total_links,
            top_level_items: tree.stats.top_level_items,
            max_depth: tree.stats.max_depth,
            menus: tree.stats.menus,
            internal_ratio: extraction.verdict.internal_ratio,
            detection_mode: extraction.detection.mode,
            detection_score: extraction.detection.score,
            container: extraction.detection.container.clone(),
            verdict: extraction.verdict.reason.clone(),
            script_rendered: extraction.script_rendered.clone(),
        },
    }
}

/// Flattens the node tree into named menus of titled sections.
///
/// Every dropdown or mega menu becomes one entry. Links sitting directly in
/// a menu are grouped under a section named after the menu; nested groups
/// become their own sections with every link below them flattened in.
/// Top-level links are collected into a trailing "Navigation" menu.
/// Repeated menu names get a " (2)", " (3)"... suffix.
pub fn tree_to_menus(nodes: &[NavNode]) -> Vec<MenuEntry> {
    let mut entries = Vec::new();
    let mut loose = Vec::new();

    for node in nodes {
        match node {
            NavNode::Link(item) => loose.push(item.clone()),
            NavNode::Dropdown(menu) | NavNode::MegaMenu(menu) => entries.push(MenuEntry {
                menu_name: menu.title.clone(),
                url: menu.url.clone(),
                sections: menu_sections(&menu.title, &menu.children),
            }),
            NavNode::Section(section) => {
                let name = section.title.as_deref().unwrap_or(LOOSE_LINKS_MENU);
                entries.push(MenuEntry {
                    menu_name: name.to_string(),
                    url: None,
                    sections: menu_sections(name, &section.children),
                });
            }
        }
    }

    if !loose.is_empty() {
        entries.push(MenuEntry {
            menu_name: LOOSE_LINKS_MENU.to_string(),
            url: None,
            sections: vec![MenuSection {
                section_title: LOOSE_LINKS_MENU.to_string(),
                items: loose,
            }],
        });
    }

    entries.retain(|e| !e.sections.is_empty());

    let mut seen: HashMap<String, usize> = HashMap::new();
    for entry in &mut entries {
        let count = seen.entry(entry.menu_name.clone()).or_default();
        *count += 1;
        if *count > 1 {
            entry.menu_name = format!("{} ({})", entry.menu_name, count);
        }
    }
    entries
}

fn menu_sections(menu_title: &str, children: &[NavNode]) -> Vec<MenuSection> {
    let mut sections = Vec::new();
    let mut pending = Vec::new();

    for child in children {
        match child {
            NavNode::Link(item) => pending.push(item.clone()),
            group => {
                flush(&mut sections, menu_title, &mut pending);
                let title = group.title().unwrap_or(menu_title).to_string();
                let mut items = Vec::new();
                if let NavNode::Dropdown(menu) | NavNode::MegaMenu(menu) = group
                    && let Some(url) = &menu.url
                {
                    items.push(LinkItem {
                        title: menu.title.clone(),
                        description: None,
                        url: url.clone(),
                    });
                }
                items.extend(group.links().into_iter().cloned());
                if !items.is_empty() {
                    sections.push(MenuSection {
                        section_title: title,
                        items,
                    });
                }
            }
        }
    }
    flush(&mut sections, menu_title, &mut pending);
    sections
}

fn flush(sections: &mut Vec<MenuSection>, title: &str, pending: &mut Vec<LinkItem>) {
    if !pending.is_empty() {
        sections.push(MenuSection {
            section_title: title.to_string(),
            items: std::mem::take(pending),
        });
    }
}

pub fn success_path(dir: &Path, domain: &str) -> PathBuf {
    dir.join(format!("{}_success.json", file_stem(domain)))
}

pub fn failure_path(dir: &Path, domain: &str) -> PathBuf {
    dir.join(format!("{}_failed.json", file_stem(domain)))
}

fn file_stem(domain: &str) -> String {
    domain
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect()
}

pub fn already_scraped(dir: &Path, domain: &str) -> bool {
    success_path(dir, domain).exists()
}

/// Persists one outcome: a success document for accepted sites, a failure
/// document for rejected or failed ones when `save_failures` is set.
/// Returns the path written, if any.
pub fn write_outcome(outcome: &SiteOutcome, output: &OutputConfig) -> io::Result<Option<PathBuf>> {
    match (&outcome.status, &outcome.extraction) {
        (OutcomeStatus::Accepted, Some(extraction)) => {
            let document = build_document(
                &outcome.url,
                &outcome.domain,
                extraction,
                output.convention,
                timestamp(),
            );
            let path = success_path(&output.dir, &outcome.domain);
            save_json(&path, &document)?;

            let stale = failure_path(&output.dir, &outcome.domain);
            if stale.exists() {
                fs::remove_file(stale)?;
            }
            Ok(Some(path))
        }
        (OutcomeStatus::Rejected | OutcomeStatus::Failed, _) if output.save_failures => {
            let document = FailureDocument {
                website: outcome.url.clone(),
                domain: outcome.domain.clone(),
                failed_at: timestamp(),
                reason: outcome.reason.clone(),
            };
            let path = failure_path(&output.dir, &outcome.domain);
            save_json(&path, &document)?;
            Ok(Some(path))
        }
        _ => Ok(None),
    }
}

fn save_json<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    let content = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    fs::write(path, content)
}

/// Generate a scrape report from outcomes
pub fn generate_scrape_report(outcomes: &[SiteOutcome]) -> String {
    let count = |status: OutcomeStatus| outcomes.iter().filter(|o| o.status == status).count();
    let accepted = count(OutcomeStatus::Accepted);
    let rejected = count(OutcomeStatus::Rejected);
    let failed = count(OutcomeStatus::Failed);
    let skipped = count(OutcomeStatus::Skipped);

    let attempted = outcomes.len() - skipped;
    let success_rate = if attempted == 0 {
        0.0
    } else {
        accepted as f64 / attempted as f64 * 100.0
    };

    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Sites: {}\n", outcomes.len()));
    report.push_str(&format!("  Accepted: {}\n", accepted));
    report.push_str(&format!("  Rejected: {}\n", rejected));
    report.push_str(&format!("  Failed: {}\n", failed));
    report.push_str(&format!("  Skipped: {}\n", skipped));
    report.push_str(&format!("  Success rate: {:.1}%\n", success_rate));
    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    for status in [
        OutcomeStatus::Accepted,
        OutcomeStatus::Rejected,
        OutcomeStatus::Failed,
        OutcomeStatus::Skipped,
    ] {
        let group: Vec<&SiteOutcome> = outcomes.iter().filter(|o| o.status == status).collect();
        if group.is_empty() {
            continue;
        }
        report.push_str(&format!("## {} ({})\n", status.as_str(), group.len()));
        for outcome in group {
            report.push_str(&format!(
                "  {} {}  {}",
                status.marker(),
                outcome.domain,
                outcome.reason
            ));
            if let Some(target) = &outcome.redirected_to {
                report.push_str(&format!(" (redirected to {})", target));
            }
            report.push('\n');
        }
        report.push('\n');
    }

    report
}
