use crate::config::EngineConfig;
use crate::dom::{closest, descendants, destination, is_clickable, Page};
use crate::hierarchy::build_hierarchy;
use crate::item::LinkExtractor;
use crate::model::{Menu, NavNode, Section};
use crate::predicates::is_visible;
use crate::resolver::{discover_triggers, SitePatterns};
use scraper::ElementRef;
use std::collections::HashSet;
use tracing::debug;

const TOP_LEVEL_SCAN_LIMIT: usize = 1000;
const TRIGGER_ITEM_LEVELS: usize = 3;

pub struct Assembly {
    pub nodes: Vec<NavNode>,
    pub script_rendered: Vec<String>,
}

/// Builds the navigation tree under a chosen nav root.
///
/// Dropdowns are built first, in trigger discovery order, so a URL shared by
/// two panels belongs to the first. Top-level links are whatever clickables
/// remain outside triggers, panels and trigger list items. The result keeps
/// document order and is normalized with [`collapse`].
pub fn assemble_tree(
    nav: ElementRef<'_>,
    page: &Page<'_>,
    links: &mut LinkExtractor<'_>,
    cfg: &EngineConfig,
    patterns: &SitePatterns,
) -> Assembly {
    let discovery = discover_triggers(nav, page, links.mode(), cfg, patterns);

    let mut claimed_by_panels = HashSet::new();
    let mut triggers = HashSet::new();
    let mut trigger_items = HashSet::new();
    for pair in &discovery.pairs {
        triggers.insert(pair.trigger.id());
        if let Some(li) = closest(pair.trigger, &["li"], TRIGGER_ITEM_LEVELS) {
            trigger_items.insert(li.id());
        }
        claimed_by_panels.extend(
            descendants(pair.panel)
                .filter(|el| is_clickable(*el))
                .map(|el| el.id()),
        );
    }

    let mut entries: Vec<(usize, NavNode)> = Vec::new();

    for pair in &discovery.pairs {
        let panel = build_hierarchy(pair.panel, links, cfg);
        let position = page.position(pair.trigger);

        if panel.nodes.is_empty() {
            debug!("panel for '{}' yielded no items", pair.trigger_text);
            if let Some(item) = links.extract(pair.trigger) {
                entries.push((position, NavNode::Link(item)));
            }
            continue;
        }

        let mega = panel.is_mega();
        let menu = Menu {
            title: pair.trigger_text.clone(),
            url: links.claim_destination(pair.trigger),
            children: panel.nodes,
        };
        let node = if mega {
            NavNode::MegaMenu(menu)
        } else {
            NavNode::Dropdown(menu)
        };
        entries.push((position, node));
    }

    let top_level: Vec<_> = descendants(nav)
        .filter(|el| is_clickable(*el))
        .take(TOP_LEVEL_SCAN_LIMIT)
        .filter(|el| !triggers.contains(&el.id()) && !claimed_by_panels.contains(&el.id()))
        .filter(|el| {
            closest(*el, &["li"], TRIGGER_ITEM_LEVELS).is_none_or(|li| !trigger_items.contains(&li.id()))
        })
        .filter(|el| destination(*el).is_some() && is_visible(*el))
        .collect();
    for el in top_level {
        if let Some(item) = links.extract(el) {
            entries.push((page.position(el), NavNode::Link(item)));
        }
    }

    entries.sort_by_key(|(position, _)| *position);
    let nodes = collapse(entries.into_iter().map(|(_, node)| node).collect());

    Assembly {
        nodes,
        script_rendered: discovery.script_rendered,
    }
}

/// Removes degenerate nesting: empty sections and menus disappear, a
/// section with a single child is replaced by that child, and a menu whose
/// only child is a section adopts the section's children.
pub fn collapse(nodes: Vec<NavNode>) -> Vec<NavNode> {
    nodes.into_iter().flat_map(collapse_node).collect()
}

fn collapse_node(node: NavNode) -> Vec<NavNode> {
    match node {
        NavNode::Link(_) => vec![node],
        NavNode::Section(section) => {
            let children = collapse(section.children);
            match children.len() {
                0 => Vec::new(),
                1 => children,
                _ => vec![NavNode::Section(Section {
                    title: section.title,
                    children,
                })],
            }
        }
        NavNode::Dropdown(menu) => collapse_menu(menu).map(NavNode::Dropdown).into_iter().collect(),
        NavNode::MegaMenu(menu) => collapse_menu(menu).map(NavNode::MegaMenu).into_iter().collect(),
    }
}

fn collapse_menu(menu: Menu) -> Option<Menu> {
    let mut children = collapse(menu.children);
    if children.len() == 1
        && matches!(&children[0], NavNode::Section(_))
        && let Some(NavNode::Section(only)) = children.pop()
    {
        children = only.children;
    }
    if children.is_empty() {
        return None;
    }
    Some(Menu {
        title: menu.title,
        url: menu.url,
        children,
    })
}
