use crate::config::EngineConfig;
use crate::dom::{
    attr, children, class_string, clean_text, closest, contains, depth_within, descendants,
    describe, destination, is_ancestor_of, is_clickable, is_tag, next_sibling_element,
    parent_element, prev_sibling_element, tag, text_runs, visible_text, Page, PANEL_TAGS,
};
use crate::error::{NavError, Result};
use crate::locate::SearchMode;
use crate::predicates::{is_noise_text, is_visible};
use crate::vocab::{DROPDOWN_CLASS, SIBLING_PANEL_CLASS, TRIGGER_CLASS};
use regex::{Regex, RegexBuilder};
use scraper::ElementRef;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

const TOGGLE_ATTRS: &[&str] = &[
    "aria-expanded",
    "aria-haspopup",
    "aria-controls",
    "data-toggle",
    "data-bs-toggle",
    "data-trigger",
    "data-target",
    "data-bs-target",
];
const DATA_TARGET_ATTRS: &[&str] = &[
    "data-target",
    "data-bs-target",
    "data-dropdown",
    "data-menu",
    "data-submenu",
    "data-controls",
];
const TRIGGER_TAGS: &[&str] = &["a", "button", "div", "span"];
const MARKED_TRIGGER_TAGS: &[&str] = &["a", "button", "span"];
const PATTERN_PARENT_TAGS: &[&str] = &["div", "li", "nav"];
const LIST_ITEM_LEVELS: usize = 3;
const LIST_ITEM_SEARCH_DEPTH: usize = 4;
const MIN_WORD_LEN: usize = 3;

/// How a panel was found for its trigger, in resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanelStrategy {
    SiteOverride,
    AriaControls,
    DataTarget,
    ParentListItem,
    AdjacentSibling,
    DetachedPanel,
}

pub struct TriggerPanelPair<'a> {
    pub trigger_text: String,
    pub trigger: ElementRef<'a>,
    pub panel: ElementRef<'a>,
    pub strategy: PanelStrategy,
}

#[derive(Default)]
pub struct TriggerDiscovery<'a> {
    pub pairs: Vec<TriggerPanelPair<'a>>,
    /// Labels of popup buttons whose panels are not in the static markup.
    pub script_rendered: Vec<String>,
}

/// Class patterns configured for one site, for markup the built-in
/// vocabularies do not recognise. Both match case-insensitively against an
/// element's class attribute.
#[derive(Debug, Clone, Default)]
pub struct SitePatterns {
    /// Marks `<a>` and `<button>` elements as dropdown triggers.
    pub trigger: Option<Regex>,
    /// Marks the panel next to a trigger.
    pub panel: Option<Regex>,
}

impl SitePatterns {
    pub fn compile(pattern: &str) -> Result<Regex> {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| NavError::InvalidPattern(format!("{pattern}: {e}")))
    }

    fn marks_trigger(&self, el: ElementRef<'_>) -> bool {
        is_tag(el, &["a", "button"])
            && self
                .trigger
                .as_ref()
                .is_some_and(|re| re.is_match(&class_string(el)))
    }
}

/// Finds the dropdown panel controlled by a trigger.
pub struct PanelResolver<'p, 'a> {
    page: &'p Page<'a>,
    cfg: &'p EngineConfig,
    patterns: &'p SitePatterns,
}

impl<'p, 'a> PanelResolver<'p, 'a> {
    pub fn new(page: &'p Page<'a>, cfg: &'p EngineConfig, patterns: &'p SitePatterns) -> Self {
        Self { page, cfg, patterns }
    }

    /// Tries, in order: the site's panel pattern, explicit ARIA linkage,
    /// data-attribute targets, the trigger's own list item, an adjacent
    /// sibling, and (for triggers with dropdown semantics) a document-wide
    /// search for a detached panel.
    ///
    /// A panel is never the trigger or one of its ancestors, and holds
    /// between `min_panel_links` and `max_panel_links` usable links.
    pub fn resolve(&self, trigger: ElementRef<'a>) -> Option<(ElementRef<'a>, PanelStrategy)> {
        self.by_site_pattern(trigger)
            .map(|p| (p, PanelStrategy::SiteOverride))
            .or_else(|| self.by_aria(trigger).map(|p| (p, PanelStrategy::AriaControls)))
            .or_else(|| self.by_data_target(trigger).map(|p| (p, PanelStrategy::DataTarget)))
            .or_else(|| self.by_list_item(trigger).map(|p| (p, PanelStrategy::ParentListItem)))
            .or_else(|| self.by_sibling(trigger).map(|p| (p, PanelStrategy::AdjacentSibling)))
            .or_else(|| self.by_detached_search(trigger).map(|p| (p, PanelStrategy::DetachedPanel)))
    }

    fn acceptable(&self, trigger: ElementRef<'a>, candidate: ElementRef<'a>) -> bool {
        if candidate.id() == trigger.id() || is_ancestor_of(candidate, trigger) {
            return false;
        }
        let max = self.cfg.max_panel_links;
        let links = descendants(candidate)
            .filter(|d| is_clickable(*d) && destination(*d).is_some())
            .take(max.saturating_add(1))
            .count();
        links >= self.cfg.min_panel_links.max(1) && links <= max
    }

    fn by_site_pattern(&self, trigger: ElementRef<'a>) -> Option<ElementRef<'a>> {
        let pattern = self.patterns.panel.as_ref()?;
        let matches = |el: &ElementRef<'a>| {
            pattern.is_match(&class_string(*el)) && self.acceptable(trigger, *el)
        };

        next_sibling_element(trigger)
            .filter(matches)
            .or_else(|| prev_sibling_element(trigger).filter(matches))
            .or_else(|| {
                let parent = closest(trigger, PATTERN_PARENT_TAGS, LIST_ITEM_LEVELS)?;
                children(parent).find(matches)
            })
    }

    fn by_aria(&self, trigger: ElementRef<'a>) -> Option<ElementRef<'a>> {
        for name in ["aria-controls", "aria-owns"] {
            let Some(ids) = attr(trigger, name) else {
                continue;
            };
            for id in ids.split_whitespace() {
                if let Some(panel) = self.page.by_id(id)
                    && self.acceptable(trigger, panel)
                {
                    return Some(panel);
                }
            }
        }

        let trigger_id = trigger.value().id()?;
        self.page.elements().find(|el| {
            attr(*el, "aria-labelledby")
                .is_some_and(|ids| ids.split_whitespace().any(|id| id == trigger_id))
                && self.acceptable(trigger, *el)
        })
    }

    fn by_data_target(&self, trigger: ElementRef<'a>) -> Option<ElementRef<'a>> {
        DATA_TARGET_ATTRS.iter().find_map(|name| {
            let id = attr(trigger, name)?.trim().trim_start_matches('#');
            if id.is_empty() || id.contains(|c: char| c.is_whitespace() || c == '.') {
                return None;
            }
            self.page
                .by_id(id)
                .filter(|panel| self.acceptable(trigger, *panel))
        })
    }

    fn by_list_item(&self, trigger: ElementRef<'a>) -> Option<ElementRef<'a>> {
        let li = closest(trigger, &["li"], LIST_ITEM_LEVELS)?;

        if let Some(panel) = children(li)
            .filter(|c| is_tag(*c, PANEL_TAGS))
            .find(|c| self.acceptable(trigger, *c))
        {
            return Some(panel);
        }

        descendants(li)
            .filter(|d| is_tag(*d, PANEL_TAGS))
            .filter(|d| depth_within(*d, li).is_some_and(|depth| depth <= LIST_ITEM_SEARCH_DEPTH))
            .filter(|d| DROPDOWN_CLASS.is_match(&class_string(*d)))
            .find(|d| self.acceptable(trigger, *d))
    }

    fn by_sibling(&self, trigger: ElementRef<'a>) -> Option<ElementRef<'a>> {
        let panel_after = |el: ElementRef<'a>| {
            el.next_siblings()
                .filter_map(ElementRef::wrap)
                .find(|s| is_tag(*s, PANEL_TAGS))
                .filter(|s| {
                    SIBLING_PANEL_CLASS.is_match(&class_string(*s)) && self.acceptable(trigger, *s)
                })
        };

        panel_after(trigger).or_else(|| {
            parent_element(trigger)
                .filter(|p| is_tag(*p, &["li", "div"]))
                .and_then(panel_after)
        })
    }

    fn by_detached_search(&self, trigger: ElementRef<'a>) -> Option<ElementRef<'a>> {
        if !self.cfg.detached_panel_search || !has_dropdown_semantics(trigger) {
            return None;
        }
        let words = significant_words(&visible_text(trigger));
        if words.is_empty() {
            return None;
        }

        let mut best: Option<(f32, ElementRef<'a>)> = None;
        let candidates = self
            .page
            .elements()
            .filter(|el| is_tag(*el, PANEL_TAGS) && DROPDOWN_CLASS.is_match(&class_string(*el)))
            .take(self.cfg.detached_scan_limit);

        for candidate in candidates {
            if !self.acceptable(trigger, candidate) {
                continue;
            }
            let panel_words = significant_words(&visible_text(candidate));
            let shared = words.iter().filter(|w| panel_words.contains(*w)).count();
            if shared == 0 {
                continue;
            }
            let overlap = shared as f32 / words.len() as f32;
            if overlap < self.cfg.min_word_overlap {
                continue;
            }
            let better = match best {
                None => true,
                Some((score, current)) => {
                    overlap > score || (overlap == score && is_ancestor_of(current, candidate))
                }
            };
            if better {
                best = Some((overlap, candidate));
            }
        }

        best.map(|(_, panel)| panel)
    }
}

fn significant_words(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= MIN_WORD_LEN)
        .map(str::to_lowercase)
        .collect()
}

fn has_toggle_attrs(el: ElementRef<'_>) -> bool {
    TOGGLE_ATTRS.iter().any(|name| attr(el, name).is_some())
}

fn has_trigger_class(el: ElementRef<'_>) -> bool {
    el.value().classes().any(|c| TRIGGER_CLASS.is_match(c))
}

/// The trigger an element stands for, if any: the direct clickable of a
/// list item or of a wrapper marked with a trigger class, an element with
/// toggle attributes or a trigger class of its own, or a clickable directly
/// followed by a dropdown-classed panel.
fn trigger_candidate<'a>(el: ElementRef<'a>, patterns: &SitePatterns) -> Option<ElementRef<'a>> {
    if (tag(el) == "li" || (tag(el) == "div" && has_trigger_class(el)))
        && let Some(clickable) = children(el).find(|c| is_clickable(*c))
    {
        return Some(clickable);
    }
    if (is_tag(el, TRIGGER_TAGS) && has_toggle_attrs(el))
        || (is_tag(el, MARKED_TRIGGER_TAGS) && has_trigger_class(el))
        || patterns.marks_trigger(el)
    {
        return Some(el);
    }
    if is_clickable(el)
        && next_sibling_element(el)
            .is_some_and(|s| is_tag(s, PANEL_TAGS) && DROPDOWN_CLASS.is_match(&class_string(s)))
    {
        return Some(el);
    }
    None
}

/// Toggle attributes, a button, or a link that goes nowhere.
fn has_dropdown_semantics(el: ElementRef<'_>) -> bool {
    has_toggle_attrs(el)
        || tag(el) == "button"
        || (tag(el) == "a" && destination(el).is_none())
}

/// A popup button whose panel is rendered by client script.
fn is_script_rendered(el: ElementRef<'_>) -> bool {
    tag(el) == "button"
        && ["aria-expanded", "aria-haspopup", "aria-controls"]
            .iter()
            .any(|name| attr(el, name).is_some())
}

fn trigger_label(el: ElementRef<'_>, max_len: usize) -> Option<String> {
    let fits = |t: &String| (2..=max_len).contains(&t.chars().count());
    Some(clean_text(&visible_text(el)))
        .filter(fits)
        .or_else(|| text_runs(el).map(clean_text).find(fits))
        .or_else(|| attr(el, "aria-label").map(clean_text).filter(fits))
}

/// Walks the nav root once in document order and pairs every dropdown
/// trigger with its panel, stopping after `max_menus` pairs.
///
/// A candidate is skipped if it was seen before, sits inside an already
/// discovered panel, is hidden, has a noise label, or repeats an earlier
/// trigger's label (case-insensitive).
pub fn discover_triggers<'a>(
    nav: ElementRef<'a>,
    page: &Page<'a>,
    mode: SearchMode,
    cfg: &EngineConfig,
    patterns: &SitePatterns,
) -> TriggerDiscovery<'a> {
    let resolver = PanelResolver::new(page, cfg, patterns);
    let mut discovery = TriggerDiscovery::default();
    let mut seen_elements = HashSet::new();
    let mut seen_labels = HashSet::new();

    for el in descendants(nav).take(cfg.max_trigger_scan) {
        if discovery.pairs.len() >= cfg.max_menus {
            debug!("menu limit of {} reached under {}", cfg.max_menus, describe(nav));
            break;
        }
        let Some(trigger) = trigger_candidate(el, patterns) else {
            continue;
        };

        if !seen_elements.insert(trigger.id()) {
            continue;
        }
        if discovery.pairs.iter().any(|p| contains(p.panel, trigger)) {
            continue;
        }
        if !is_visible(trigger) {
            continue;
        }
        let Some(label) = trigger_label(trigger, cfg.max_trigger_text_len) else {
            continue;
        };
        if is_noise_text(&label, trigger, mode, cfg) {
            continue;
        }
        let key = label.to_lowercase();
        if seen_labels.contains(&key) {
            continue;
        }

        match resolver.resolve(trigger) {
            Some((panel, strategy)) => {
                debug!(
                    "trigger '{}' -> panel {} via {:?}",
                    label,
                    describe(panel),
                    strategy
                );
                seen_labels.insert(key);
                discovery.pairs.push(TriggerPanelPair {
                    trigger_text: label,
                    trigger,
                    panel,
                    strategy,
                });
            }
            None if is_script_rendered(trigger) => {
                debug!("trigger '{}' has no static panel (client-rendered)", label);
                discovery.script_rendered.push(label);
            }
            None => {}
        }
    }

    discovery
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn resolve_in(html: &str, trigger_id: &str) -> Option<(String, PanelStrategy)> {
        resolve_with(html, trigger_id, &SitePatterns::default())
    }

    fn resolve_with(
        html: &str,
        trigger_id: &str,
        patterns: &SitePatterns,
    ) -> Option<(String, PanelStrategy)> {
        let document = Html::parse_document(html);
        let page = Page::new(&document);
        let cfg = EngineConfig::default();
        let resolver = PanelResolver::new(&page, &cfg, patterns);
        let trigger = page.by_id(trigger_id)?;
        resolver
            .resolve(trigger)
            .map(|(panel, strategy)| (describe(panel), strategy))
    }

    #[test]
    fn test_aria_controls() {
        let found = resolve_in(
            r#"<nav><button id="t" aria-controls="p">Products</button></nav>
               <div id="p"><a href="/a">A</a><a href="/b">B</a></div>"#,
            "t",
        );
        assert_eq!(found, Some(("div#p".to_string(), PanelStrategy::AriaControls)));
    }

    #[test]
    fn test_empty_aria_target_falls_through() {
        let found = resolve_in(
            r#"<nav><ul><li><button id="t" aria-controls="empty">Products</button>
                 <ul id="sub" class="sub-menu"><li><a href="/a">A</a></li><li><a href="/b">B</a></li></ul></li></ul></nav>
               <div id="empty"><span>nothing</span></div>"#,
            "t",
        );
        assert_eq!(found, Some(("ul#sub.sub-menu".to_string(), PanelStrategy::ParentListItem)));
    }

    #[test]
    fn test_aria_labelledby() {
        let found = resolve_in(
            r#"<nav><button id="t">Docs</button></nav>
               <section id="p" aria-labelledby="t"><a href="/guides">Guides</a><a href="/api">API</a></section>"#,
            "t",
        );
        assert_eq!(found, Some(("section#p".to_string(), PanelStrategy::AriaControls)));
    }

    #[test]
    fn test_data_target_strips_hash() {
        let found = resolve_in(
            r##"<nav><a id="t" href="#" data-bs-target="#solutions">Solutions</a></nav>
                <div id="solutions"><a href="/s">S</a><a href="/t">T</a></div>"##,
            "t",
        );
        assert_eq!(found, Some(("div#solutions".to_string(), PanelStrategy::DataTarget)));
    }

    #[test]
    fn test_sibling_panel() {
        let found = resolve_in(
            r##"<nav><div><a id="t" href="#">Company</a><div id="p" class="dropdown-panel"><a href="/about">About</a><a href="/jobs">Jobs</a></div></div></nav>"##,
            "t",
        );
        assert_eq!(
            found,
            Some(("div#p.dropdown-panel".to_string(), PanelStrategy::AdjacentSibling))
        );
    }

    #[test]
    fn test_detached_panel_by_word_overlap() {
        let found = resolve_in(
            r#"<nav><button id="t" aria-expanded="false">Resources</button></nav>
               <div class="mega-menus">
                 <div id="p1" class="mega-panel"><h3>Company</h3><a href="/about">About</a><a href="/jobs">Jobs</a></div>
                 <div id="p2" class="mega-panel"><h3>Resources</h3><a href="/blog">Blog</a><a href="/guides">Guides</a></div>
               </div>"#,
            "t",
        );
        assert_eq!(
            found,
            Some(("div#p2.mega-panel".to_string(), PanelStrategy::DetachedPanel))
        );
    }

    #[test]
    fn test_panel_is_never_an_ancestor() {
        let found = resolve_in(
            r#"<div id="wrap" class="dropdown"><nav><button id="t" aria-controls="wrap" aria-expanded="false">Wrap</button><a href="/x">X</a></nav></div>"#,
            "t",
        );
        assert_eq!(found, None);
    }

    #[test]
    fn test_discovery_collects_client_rendered_buttons() {
        let document = Html::parse_document(
            r#"<nav id="n"><ul>
                 <li><button aria-expanded="false">Platform</button></li>
                 <li><a href="/pricing">Pricing</a></li>
                 <li><a href="/solutions">Solutions</a><ul><li><a href="/s/a">A</a></li><li><a href="/s/b">B</a></li></ul></li>
               </ul></nav>"#,
        );
        let page = Page::new(&document);
        let cfg = EngineConfig::default();
        let discovery = discover_triggers(
            page.by_id("n").unwrap(),
            &page,
            SearchMode::Primary,
            &cfg,
            &SitePatterns::default(),
        );
        assert_eq!(discovery.pairs.len(), 1);
        assert_eq!(discovery.pairs[0].trigger_text, "Solutions");
        assert_eq!(discovery.script_rendered, vec!["Platform".to_string()]);
    }

    #[test]
    fn test_discovery_dedupes_labels_and_skips_nested_items() {
        let document = Html::parse_document(
            r#"<nav id="n"><ul>
                 <li><a href="/p">Products</a><ul>
                   <li><a href="/p/a">Apps</a><ul><li><a href="/p/a/1">One</a></li></ul></li>
                 </ul></li>
                 <li><a href="/p2">products</a><ul><li><a href="/x">X</a></li></ul></li>
               </ul></nav>"#,
        );
        let page = Page::new(&document);
        let cfg = EngineConfig::default();
        let discovery = discover_triggers(
            page.by_id("n").unwrap(),
            &page,
            SearchMode::Primary,
            &cfg,
            &SitePatterns::default(),
        );
        let labels: Vec<_> = discovery.pairs.iter().map(|p| p.trigger_text.as_str()).collect();
        assert_eq!(labels, vec!["Products"]);
    }

    fn discover_labels(html: &str, cfg: &EngineConfig, patterns: &SitePatterns) -> Vec<String> {
        let document = Html::parse_document(html);
        let page = Page::new(&document);
        let discovery = discover_triggers(
            page.by_id("n").unwrap(),
            &page,
            SearchMode::Primary,
            cfg,
            patterns,
        );
        discovery.pairs.into_iter().map(|p| p.trigger_text).collect()
    }

    #[test]
    fn test_trigger_class_vocabulary() {
        for class in [
            "dropdown-toggle",
            "menu-toggle",
            "submenu-trigger",
            "has-dropdown",
            "menu-item-has-children",
            "with-submenu",
            "parent-item",
            "expandable",
            "mega-menu-trigger",
        ] {
            assert!(TRIGGER_CLASS.is_match(class), "{class}");
        }
        for class in ["nav-item", "menu-item", "dropdown-menu", "mega-panel", "toggled"] {
            assert!(!TRIGGER_CLASS.is_match(class), "{class}");
        }
    }

    #[test]
    fn test_discovery_finds_class_marked_and_structural_triggers() {
        let html = r##"<nav id="n">
            <div class="nav-item has-dropdown"><a href="#">Products</a>
              <div class="mega-panel"><a href="/p/a">A</a><a href="/p/b">B</a></div></div>
            <span class="menu-toggle">Company</span>
            <div class="flyout"><a href="/about">About</a><a href="/jobs">Jobs</a></div>
            <a href="/docs">Docs</a>
            <div class="submenu"><a href="/docs/api">API</a><a href="/docs/sdk">SDK</a></div>
            <a href="#" data-trigger="hover">Partners</a>
            <div class="dropdown"><a href="/partners/a">Agencies</a><a href="/partners/b">Resellers</a></div>
          </nav>"##;
        let labels = discover_labels(html, &EngineConfig::default(), &SitePatterns::default());
        assert_eq!(labels, vec!["Products", "Company", "Docs", "Partners"]);
    }

    #[test]
    fn test_panel_link_count_bounds() {
        let one = r#"<nav><div><button id="t">Company</button><div class="dropdown"><a href="/about">About</a></div></div></nav>"#;
        assert_eq!(resolve_in(one, "t"), None);

        let many: String = (0..61).map(|i| format!(r#"<a href="/p{i}">Page {i}</a>"#)).collect();
        let oversized = format!(
            r#"<nav><div><button id="t">Archive</button><div class="dropdown">{many}</div></div></nav>"#
        );
        assert_eq!(resolve_in(&oversized, "t"), None);

        let sixty: String = (0..60).map(|i| format!(r#"<a href="/p{i}">Page {i}</a>"#)).collect();
        let full = format!(
            r#"<nav><div><button id="t">Archive</button><div id="p" class="dropdown">{sixty}</div></div></nav>"#
        );
        assert_eq!(
            resolve_in(&full, "t"),
            Some(("div#p.dropdown".to_string(), PanelStrategy::AdjacentSibling))
        );
    }

    #[test]
    fn test_discovery_stops_at_menu_limit() {
        let items: String = (0..5)
            .map(|i| {
                format!(
                    r#"<li><a href="/m{i}">Menu {i}</a><ul><li><a href="/m{i}/a">A{i}</a></li><li><a href="/m{i}/b">B{i}</a></li></ul></li>"#
                )
            })
            .collect();
        let html = format!(r#"<nav id="n"><ul>{items}</ul></nav>"#);
        let cfg = EngineConfig {
            max_menus: 3,
            ..EngineConfig::default()
        };
        let labels = discover_labels(&html, &cfg, &SitePatterns::default());
        assert_eq!(labels, vec!["Menu 0", "Menu 1", "Menu 2"]);
    }

    #[test]
    fn test_site_patterns_take_precedence() {
        let html = r#"<nav id="n"><div class="tabs">
            <a id="t" href="/cloud" class="global-nav-tab">Cloud</a>
            <ul class="dropdown"><li><a href="/wrong/a">Wrong</a></li><li><a href="/wrong/b">Wrong</a></li></ul>
            <div class="global-nav-tab-dropdown"><a href="/cloud/a">Compute</a><a href="/cloud/b">Storage</a></div>
          </div></nav>"#;
        let patterns = SitePatterns {
            trigger: Some(SitePatterns::compile("global-nav-tab").unwrap()),
            panel: Some(SitePatterns::compile("GLOBAL-NAV-TAB-DROPDOWN").unwrap()),
        };
        assert_eq!(
            resolve_with(html, "t", &patterns),
            Some(("div.global-nav-tab-dropdown".to_string(), PanelStrategy::SiteOverride))
        );
        assert_eq!(
            resolve_in(html, "t"),
            Some(("ul.dropdown".to_string(), PanelStrategy::AdjacentSibling))
        );

        let labels = discover_labels(html, &EngineConfig::default(), &patterns);
        assert_eq!(labels, vec!["Cloud"]);
        assert!(matches!(
            SitePatterns::compile("(unclosed"),
            Err(NavError::InvalidPattern(_))
        ));
    }
}
