//! Turns a dropdown panel into sections and links.
//!
//! Strategies run in order (columns, headings, lists, flat) and the first
//! one that yields anything wins. A clickable claimed once inside a panel is
//! never claimed again by a later strategy, and a link whose text repeats its
//! enclosing section title is dropped.

use crate::config::EngineConfig;
use crate::dom::{
    ancestors, children, class_string, clean_text, contains, contains_clickable, descendants,
    inside_clickable, is_clickable, is_tag, next_element_in_document, prev_sibling_element, tag,
    visible_text, HEADINGS, LISTS,
};
use crate::item::LinkExtractor;
use crate::model::{Menu, NavNode, Section};
use crate::predicates::is_noise_text;
use crate::vocab::{COLUMN_PATTERNS, SECTION_TITLE_CLASS};
use ego_tree::NodeId;
use scraper::ElementRef;
use std::collections::HashSet;
use tracing::debug;

const COLUMN_TAGS: &[&str] = &["div", "section", "li", "ul"];
const COLUMN_SCAN_LIMIT: usize = 60;
const TITLE_SCAN_LIMIT: usize = 3;
const LIST_SCAN_LIMIT: usize = 50;
const FLAT_SCAN_LIMIT: usize = 500;
const SUBLIST_WRAPPERS: &[&str] = &["div", "section", "nav"];

/// Result of building one panel.
pub struct PanelTree {
    pub nodes: Vec<NavNode>,
    /// The panel is laid out as two or more columns.
    pub columns: bool,
}

impl PanelTree {
    /// Two or more columns, or two or more titled sections.
    pub fn is_mega(&self) -> bool {
        let titled = self
            .nodes
            .iter()
            .filter(|n| matches!(n, NavNode::Section(s) if s.title.is_some()))
            .count();
        self.columns || titled >= 2
    }
}

pub fn build_hierarchy(
    panel: ElementRef<'_>,
    links: &mut LinkExtractor<'_>,
    cfg: &EngineConfig,
) -> PanelTree {
    let columns = detect_columns(panel).len() >= 2;
    let mut builder = HierarchyBuilder {
        links,
        cfg,
        processed: HashSet::new(),
    };
    let nodes = builder.build(panel, 0, None);
    PanelTree { nodes, columns }
}

/// The largest group (at least two) of sibling blocks matching a column
/// vocabulary; vocabularies are tried in order.
pub fn detect_columns<'a>(container: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    for pattern in COLUMN_PATTERNS.iter() {
        let mut groups: Vec<(NodeId, Vec<ElementRef<'a>>)> = Vec::new();
        let matches = descendants(container)
            .filter(|el| is_tag(*el, COLUMN_TAGS) && pattern.is_match(&class_string(*el)))
            .take(COLUMN_SCAN_LIMIT);
        for el in matches {
            let Some(parent) = el.parent() else {
                continue;
            };
            match groups.iter_mut().find(|(id, _)| *id == parent.id()) {
                Some((_, group)) => group.push(el),
                None => groups.push((parent.id(), vec![el])),
            }
        }

        let mut best: Option<Vec<ElementRef<'a>>> = None;
        for (_, group) in groups {
            if best.as_ref().is_none_or(|b| group.len() > b.len()) {
                best = Some(group);
            }
        }
        if let Some(group) = best
            && group.len() >= 2
        {
            return group;
        }
    }
    Vec::new()
}

struct HierarchyBuilder<'x, 'c> {
    links: &'x mut LinkExtractor<'c>,
    cfg: &'x EngineConfig,
    processed: HashSet<NodeId>,
}

impl HierarchyBuilder<'_, '_> {
    fn build(&mut self, container: ElementRef<'_>, depth: usize, title: Option<&str>) -> Vec<NavNode> {
        if depth < self.cfg.max_hierarchy_depth {
            let nodes = self.column_sections(container, depth);
            if !nodes.is_empty() {
                return splice(nodes);
            }
        }

        let nodes = self.heading_sections(container);
        if !nodes.is_empty() {
            return splice(nodes);
        }

        let nodes = self.list_sections(container, depth, title);
        if !nodes.is_empty() {
            return splice(nodes);
        }

        self.flat(container, title)
    }

    fn column_sections(&mut self, container: ElementRef<'_>, depth: usize) -> Vec<NavNode> {
        let columns = detect_columns(container);
        if columns.len() < 2 {
            return Vec::new();
        }

        let mut nodes = Vec::new();
        for column in columns {
            let title = self.column_title(column);
            let mut children = self.build(column, depth + 1, title.as_deref());
            // the column heading usually reappears as the column's only section
            if children.len() == 1
                && matches!(&children[0], NavNode::Section(s) if s.title == title)
                && let Some(NavNode::Section(inner)) = children.pop()
            {
                children = inner.children;
            }
            if !children.is_empty() {
                nodes.push(section(title, children));
            }
        }
        nodes
    }

    fn column_title(&self, column: ElementRef<'_>) -> Option<String> {
        let headings = descendants(column)
            .filter(|el| is_tag(*el, HEADINGS) || is_tag(*el, &["strong", "b"]))
            .filter(|el| !contains_clickable(*el) && !inside_clickable(*el, column))
            .take(TITLE_SCAN_LIMIT);
        let classed = descendants(column)
            .filter(|el| SECTION_TITLE_CLASS.is_match(&class_string(*el)))
            .filter(|el| {
                !is_clickable(*el) && !contains_clickable(*el) && !inside_clickable(*el, column)
            })
            .take(TITLE_SCAN_LIMIT);

        headings.chain(classed).find_map(|el| self.section_title(el))
    }

    fn section_title(&self, el: ElementRef<'_>) -> Option<String> {
        let text = clean_text(&visible_text(el));
        let len = text.chars().count();
        let usable = (2..=self.cfg.max_section_title_len).contains(&len)
            && !is_noise_text(&text, el, self.links.mode(), self.cfg);
        usable.then_some(text)
    }

    /// Each heading opens a section holding the clickables that follow it in
    /// document order, up to the next heading or the edge of the container.
    fn heading_sections(&mut self, container: ElementRef<'_>) -> Vec<NavNode> {
        let headings: Vec<_> = descendants(container)
            .filter(|el| is_tag(*el, HEADINGS))
            .filter(|el| !contains_clickable(*el) && !inside_clickable(*el, container))
            .collect();

        let mut nodes = Vec::new();
        for (index, heading) in headings.iter().enumerate() {
            let Some(title) = self.section_title(*heading) else {
                continue;
            };
            let next_heading = headings.get(index + 1).copied();

            let mut items = Vec::new();
            let mut steps = 0;
            let mut cursor = next_element_in_document(*heading);
            while let Some(el) = cursor {
                steps += 1;
                if steps > self.cfg.heading_walk_limit {
                    debug!("heading walk under '{}' truncated", title);
                    break;
                }
                if next_heading.is_some_and(|next| contains(next, el)) || !contains(container, el) {
                    break;
                }
                if is_clickable(el)
                    && let Some(node) = self.claim(el, Some(&title))
                {
                    items.push(node);
                }
                cursor = next_element_in_document(el);
            }

            if !items.is_empty() {
                nodes.push(section(Some(title), items));
            }
        }
        nodes
    }

    /// Every top-level list is a section, titled by a heading right before it.
    fn list_sections(
        &mut self,
        container: ElementRef<'_>,
        depth: usize,
        title: Option<&str>,
    ) -> Vec<NavNode> {
        if is_tag(container, LISTS) {
            return self.list_items(container, depth, title);
        }

        let lists: Vec<_> = descendants(container)
            .filter(|el| is_tag(*el, LISTS))
            .filter(|list| {
                !ancestors(*list)
                    .take_while(|a| a.id() != container.id())
                    .any(|a| is_tag(a, LISTS))
            })
            .take(LIST_SCAN_LIMIT)
            .collect();

        let mut nodes = Vec::new();
        for list in lists {
            let list_title = prev_sibling_element(list)
                .filter(|prev| is_tag(*prev, HEADINGS))
                .and_then(|heading| self.section_title(heading));
            let items = self.list_items(list, depth, list_title.as_deref().or(title));
            if !items.is_empty() {
                nodes.push(section(list_title, items));
            }
        }
        nodes
    }

    /// Items of one list. An item with its own sub-list becomes a nested
    /// dropdown headed by the item's link, until the depth bound, after which
    /// the rest of the subtree is flattened.
    fn list_items(&mut self, list: ElementRef<'_>, depth: usize, title: Option<&str>) -> Vec<NavNode> {
        let mut nodes = Vec::new();
        for li in children(list).filter(|c| tag(*c) == "li") {
            let sublist = children(li).find(|c| is_tag(*c, LISTS)).or_else(|| {
                children(li)
                    .filter(|c| is_tag(*c, SUBLIST_WRAPPERS))
                    .find(|c| descendants(*c).any(|d| is_tag(d, LISTS)))
            });

            match sublist {
                Some(sub) if depth < self.cfg.max_hierarchy_depth => {
                    let head = descendants(li)
                        .filter(|d| is_clickable(*d) && !contains(sub, *d))
                        .find_map(|d| self.claim(d, title));
                    let head_title = head.as_ref().and_then(NavNode::title).map(str::to_string);
                    let children = self.build(sub, depth + 1, head_title.as_deref());
                    nodes.extend(nest(head, children, || self.item_label(li, sub)));
                }
                _ => {
                    for clickable in descendants(li).filter(|d| is_clickable(*d)) {
                        if let Some(node) = self.claim(clickable, title) {
                            nodes.push(node);
                        }
                    }
                }
            }
        }
        nodes
    }

    /// Plain label of a list item that heads a sub-list without a link.
    fn item_label(&self, li: ElementRef<'_>, sub: ElementRef<'_>) -> Option<String> {
        children(li)
            .filter(|c| !contains(*c, sub) && !is_clickable(*c) && !is_tag(*c, LISTS))
            .find_map(|c| self.section_title(c))
    }

    fn flat(&mut self, container: ElementRef<'_>, title: Option<&str>) -> Vec<NavNode> {
        let clickables: Vec<_> = descendants(container)
            .filter(|el| is_clickable(*el))
            .take(FLAT_SCAN_LIMIT)
            .collect();
        clickables
            .into_iter()
            .filter_map(|el| self.claim(el, title))
            .collect()
    }

    fn claim(&mut self, el: ElementRef<'_>, section_title: Option<&str>) -> Option<NavNode> {
        if self.processed.contains(&el.id()) {
            return None;
        }
        if let Some(title) = section_title
            && clean_text(&visible_text(el)) == title
        {
            return None;
        }
        let item = self.links.extract(el)?;
        self.processed.insert(el.id());
        Some(NavNode::Link(item))
    }
}

fn section(title: Option<String>, children: Vec<NavNode>) -> NavNode {
    NavNode::Section(Section { title, children })
}

/// A lone untitled section adds no structure; hand its children up instead.
fn splice(mut nodes: Vec<NavNode>) -> Vec<NavNode> {
    if nodes.len() == 1
        && matches!(&nodes[0], NavNode::Section(s) if s.title.is_none())
        && let Some(NavNode::Section(only)) = nodes.pop()
    {
        return only.children;
    }
    nodes
}

fn nest(
    head: Option<NavNode>,
    children: Vec<NavNode>,
    label: impl FnOnce() -> Option<String>,
) -> Vec<NavNode> {
    match (head, children.is_empty()) {
        (Some(NavNode::Link(item)), false) => vec![NavNode::Dropdown(Menu {
            title: item.title,
            url: Some(item.url),
            children,
        })],
        (Some(head), _) => {
            let mut out = vec![head];
            out.extend(children);
            out
        }
        (None, false) => match label() {
            Some(title) => vec![section(Some(title), children)],
            None => children,
        },
        (None, true) => Vec::new(),
    }
}
