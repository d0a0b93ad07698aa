use crate::config::EngineConfig;
use crate::dom::{
    attr, children, class_and_id, depth_from_body, descendants, has_usable_clickable, is_clickable,
    is_tag, tag, LISTS,
};
use crate::locate::SearchMode;
use crate::predicates::is_visible;
use crate::vocab::{BREADCRUMB, FOOTER, NAV_TOKENS, PRIMARY_TOKENS, SIDEBAR};
use scraper::ElementRef;
use std::fmt;

const WRAPPER_TAGS: &[&str] = &["div", "nav", "section", "header"];
const LIST_WRAPPER_DEPTH: usize = 2;

/// A container that passed the item-count band, with its score.
#[derive(Clone, Copy)]
pub struct Candidate<'a> {
    pub element: ElementRef<'a>,
    pub score: i32,
    pub item_count: usize,
}

/// Why a container failed the item-count band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    TooFewItems(usize),
    TooManyItems(usize),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::TooFewItems(n) => write!(f, "too few top-level items ({n})"),
            Rejection::TooManyItems(n) => {
                write!(f, "too many links / no structure ({n} items)")
            }
        }
    }
}

/// Structural estimate of a container's top-level menu items.
///
/// Counts `<li>` children of direct child lists (looking through up to two
/// wrapper levels); failing that, direct visible clickables; failing that,
/// direct wrappers that contain a usable clickable.
pub fn count_top_level_items(el: ElementRef<'_>) -> usize {
    let from_lists = list_items_below(el, LIST_WRAPPER_DEPTH);
    if from_lists > 0 {
        return from_lists;
    }

    let clickables = children(el)
        .filter(|c| is_clickable(*c) && is_visible(*c))
        .count();
    if clickables > 0 {
        return clickables;
    }

    children(el)
        .filter(|c| is_tag(*c, &["div", "li", "span"]) && has_usable_clickable(*c))
        .count()
}

fn list_items_below(el: ElementRef<'_>, wrapper_levels: usize) -> usize {
    let direct: usize = children(el)
        .filter(|c| is_tag(*c, LISTS))
        .map(|list| children(list).filter(|li| tag(*li) == "li").count())
        .sum();
    if direct > 0 || wrapper_levels == 0 {
        return direct;
    }
    children(el)
        .filter(|c| is_tag(*c, WRAPPER_TAGS))
        .map(|wrapper| list_items_below(wrapper, wrapper_levels - 1))
        .sum()
}

fn has_nested_list(el: ElementRef<'_>) -> bool {
    descendants(el)
        .filter(|d| tag(*d) == "li")
        .any(|li| descendants(li).any(|d| is_tag(d, LISTS)))
}

/// Scores a container as a primary-navigation candidate.
///
/// The item-count band is a hard gate: a container outside it is rejected
/// whatever its other signals.
pub fn score_container<'a>(
    el: ElementRef<'a>,
    mode: SearchMode,
    cfg: &EngineConfig,
) -> Result<Candidate<'a>, Rejection> {
    let item_count = count_top_level_items(el);
    if item_count < cfg.item_band.min {
        return Err(Rejection::TooFewItems(item_count));
    }
    if item_count > cfg.item_band.max {
        return Err(Rejection::TooManyItems(item_count));
    }

    let w = &cfg.weights;
    let mut score = 0;

    if tag(el) == "nav" {
        score += w.semantic_tag;
    }
    if attr(el, "role").is_some_and(|r| r.eq_ignore_ascii_case("navigation")) {
        score += w.navigation_role;
    }

    let depth = depth_from_body(el);
    score += match depth {
        0..=3 => w.shallow_depth,
        4..=5 => w.mid_depth,
        _ => -(depth as i32 - 5) * w.depth_penalty_per_level,
    };
    if depth > w.deep_threshold {
        score -= w.deep_penalty;
    }

    let mut tokens = class_and_id(el);
    if let Some(label) = attr(el, "aria-label") {
        tokens.push(' ');
        tokens.push_str(&label.to_lowercase());
    }
    if NAV_TOKENS.is_match(&tokens) {
        score += w.nav_tokens;
    }
    if PRIMARY_TOKENS.is_match(&tokens) {
        score += w.primary_tokens;
    }
    if has_nested_list(el) {
        score += w.nested_lists;
    }

    if mode == SearchMode::Primary && FOOTER.is_match(&tokens) {
        score -= w.footer_penalty;
    }
    if BREADCRUMB.is_match(&tokens) {
        score -= w.breadcrumb_penalty;
    }
    if tag(el) == "aside" || SIDEBAR.is_match(&tokens) {
        score -= w.sidebar_penalty;
    }

    Ok(Candidate {
        element: el,
        score,
        item_count,
    })
}
