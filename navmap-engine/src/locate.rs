use crate::config::EngineConfig;
use crate::dom::{descendants, describe, is_tag};
use crate::predicates::{is_fenced_container, is_footer_scoped, is_visible};
use crate::scorer::{score_container, Candidate, Rejection};
use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use tracing::debug;

const PRIMARY_CONTAINERS: &[&str] = &["nav", "header", "div"];
const FOOTER_CONTAINERS: &[&str] = &["footer", "nav", "div", "section"];

/// Which part of the page a navigation search looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Header/primary navigation; footers are fenced off.
    #[default]
    Primary,
    /// Footer navigation, for callers retrying after the primary pass failed.
    Footer,
}

/// Tally of why candidates were passed over, used when nothing qualifies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocateReport {
    pub examined: usize,
    pub hidden_or_fenced: usize,
    pub too_few_items: usize,
    pub too_many_items: usize,
    pub below_floor: usize,
}

impl LocateReport {
    pub fn reason(&self) -> String {
        if self.examined == 0 {
            return "no candidate containers".to_string();
        }
        let mut parts = Vec::new();
        if self.too_many_items > 0 {
            parts.push(format!(
                "{} too many links / no structure",
                self.too_many_items
            ));
        }
        if self.too_few_items > 0 {
            parts.push(format!("{} too few items", self.too_few_items));
        }
        if self.below_floor > 0 {
            parts.push(format!("{} below score floor", self.below_floor));
        }
        if self.hidden_or_fenced > 0 {
            parts.push(format!("{} hidden or fenced", self.hidden_or_fenced));
        }
        format!("examined {} containers: {}", self.examined, parts.join(", "))
    }
}

/// Picks the single best navigation root.
///
/// Looks at the first `max_candidates` containers in document order, skips
/// hidden and fenced ones, scores the rest and keeps the highest score at or
/// above the floor. Ties go to the container encountered first.
pub fn find_navigation<'a>(
    root: ElementRef<'a>,
    mode: SearchMode,
    cfg: &EngineConfig,
) -> Result<Candidate<'a>, LocateReport> {
    let (containers, floor) = match mode {
        SearchMode::Primary => (PRIMARY_CONTAINERS, cfg.min_container_score),
        SearchMode::Footer => (FOOTER_CONTAINERS, cfg.min_footer_score),
    };

    let pool = descendants(root)
        .filter(|el| is_tag(*el, containers))
        .filter(|el| mode == SearchMode::Primary || is_footer_scoped(*el))
        .take(cfg.max_candidates);

    let mut report = LocateReport::default();
    let mut best: Option<Candidate<'a>> = None;

    for el in pool {
        report.examined += 1;
        if !is_visible(el) || is_fenced_container(el, mode, cfg.fence_depth) {
            report.hidden_or_fenced += 1;
            continue;
        }
        match score_container(el, mode, cfg) {
            Err(Rejection::TooFewItems(_)) => report.too_few_items += 1,
            Err(Rejection::TooManyItems(n)) => {
                debug!("{} rejected: {} items", describe(el), n);
                report.too_many_items += 1;
            }
            Ok(candidate) if candidate.score < floor => report.below_floor += 1,
            Ok(candidate) => {
                if best.is_none_or(|b| candidate.score > b.score) {
                    debug!(
                        "new best container {} (score {}, {} items)",
                        describe(el),
                        candidate.score,
                        candidate.item_count
                    );
                    best = Some(candidate);
                }
            }
        }
    }

    best.ok_or(report)
}
