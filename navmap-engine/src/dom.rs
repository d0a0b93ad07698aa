//! Read-only helpers over the parsed document tree.
//!
//! Elements are `scraper::ElementRef`s; identity is the arena `NodeId`, so
//! two structurally identical subtrees are still different elements.

use crate::vocab::{
    EDGE_PUNCTUATION, ICON_GLYPHS, ICON_TEXT, SCREEN_READER_TOKENS, WHITESPACE,
};
use ego_tree::{NodeId, NodeRef};
use scraper::{ElementRef, Html, Node};
use std::collections::HashMap;

pub(crate) const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];
pub(crate) const CLICKABLES: &[&str] = &["a", "button"];
pub(crate) const LISTS: &[&str] = &["ul", "ol"];
pub(crate) const PANEL_TAGS: &[&str] = &["ul", "ol", "div", "section", "nav"];

const SILENT_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Index over a parsed document: root element, id lookup and document order.
pub struct Page<'a> {
    root: ElementRef<'a>,
    ids: HashMap<&'a str, ElementRef<'a>>,
    order: HashMap<NodeId, usize>,
}

impl<'a> Page<'a> {
    pub fn new(document: &'a Html) -> Self {
        let root = document.root_element();
        let mut ids = HashMap::new();
        let mut order = HashMap::new();

        for (position, node) in root.descendants().enumerate() {
            order.insert(node.id(), position);
            if let Some(el) = ElementRef::wrap(node)
                && let Some(id) = el.value().id()
            {
                ids.entry(id).or_insert(el);
            }
        }

        Self { root, ids, order }
    }

    pub fn root(&self) -> ElementRef<'a> {
        self.root
    }

    /// First element carrying the given `id` attribute.
    pub fn by_id(&self, id: &str) -> Option<ElementRef<'a>> {
        self.ids.get(id).copied()
    }

    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'a>> + use<'a> {
        descendants(self.root)
    }

    /// Position of a node in document order (pre-order).
    pub fn position(&self, el: ElementRef<'_>) -> usize {
        self.order.get(&el.id()).copied().unwrap_or(usize::MAX)
    }
}

pub(crate) fn tag<'a>(el: ElementRef<'a>) -> &'a str {
    el.value().name()
}

pub(crate) fn is_tag(el: ElementRef<'_>, names: &[&str]) -> bool {
    names.contains(&tag(el))
}

pub(crate) fn is_clickable(el: ElementRef<'_>) -> bool {
    is_tag(el, CLICKABLES)
}

pub(crate) fn attr<'a>(el: ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name)
}

pub(crate) fn class_string(el: ElementRef<'_>) -> String {
    el.value().classes().collect::<Vec<_>>().join(" ").to_lowercase()
}

pub(crate) fn class_tokens(el: ElementRef<'_>) -> Vec<String> {
    el.value().classes().map(str::to_lowercase).collect()
}

/// Lower-cased class list followed by the id, for vocabulary matching.
pub(crate) fn class_and_id(el: ElementRef<'_>) -> String {
    match el.value().id() {
        Some(id) => format!("{} {}", class_string(el), id.to_lowercase()),
        None => class_string(el),
    }
}

pub(crate) fn parent_element<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.parent().and_then(ElementRef::wrap)
}

/// Element ancestors, nearest first.
pub(crate) fn ancestors<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.ancestors().filter_map(ElementRef::wrap)
}

pub(crate) fn children<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.children().filter_map(ElementRef::wrap)
}

/// Element descendants in document order, excluding `el` itself.
pub(crate) fn descendants<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.descendants().skip(1).filter_map(ElementRef::wrap)
}

pub(crate) fn next_sibling_element<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.next_siblings().find_map(ElementRef::wrap)
}

pub(crate) fn prev_sibling_element<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.prev_siblings().find_map(ElementRef::wrap)
}

/// Next element after `el` in document order (first child, else next
/// sibling, else the next sibling of the nearest ancestor that has one).
pub(crate) fn next_element_in_document<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    let mut node = next_node(*el);
    while let Some(current) = node {
        if let Some(found) = ElementRef::wrap(current) {
            return Some(found);
        }
        node = next_node(current);
    }
    None
}

fn next_node<'a>(node: NodeRef<'a, Node>) -> Option<NodeRef<'a, Node>> {
    if let Some(child) = node.first_child() {
        return Some(child);
    }
    let mut current = Some(node);
    while let Some(n) = current {
        if let Some(sibling) = n.next_sibling() {
            return Some(sibling);
        }
        current = n.parent();
    }
    None
}

pub(crate) fn is_ancestor_of(ancestor: ElementRef<'_>, el: ElementRef<'_>) -> bool {
    el.ancestors().any(|node| node.id() == ancestor.id())
}

/// True when `inner` is `outer` or lies inside it.
pub(crate) fn contains(outer: ElementRef<'_>, inner: ElementRef<'_>) -> bool {
    outer.id() == inner.id() || is_ancestor_of(outer, inner)
}

/// Nearest ancestor with one of `names`, looking at most `levels` up.
pub(crate) fn closest<'a>(
    el: ElementRef<'a>,
    names: &[&str],
    levels: usize,
) -> Option<ElementRef<'a>> {
    ancestors(el).take(levels).find(|a| is_tag(*a, names))
}

/// Element levels between `el` and `<body>`; a direct child of body is 0.
pub(crate) fn depth_from_body(el: ElementRef<'_>) -> usize {
    let mut depth = 0;
    for ancestor in ancestors(el) {
        if tag(ancestor) == "body" {
            return depth;
        }
        depth += 1;
    }
    depth
}

/// Levels from `scope` down to `el`, or `None` when `el` is outside `scope`.
pub(crate) fn depth_within(el: ElementRef<'_>, scope: ElementRef<'_>) -> Option<usize> {
    for (depth, ancestor) in el.ancestors().enumerate() {
        if ancestor.id() == scope.id() {
            return Some(depth + 1);
        }
    }
    None
}

pub(crate) fn contains_clickable(el: ElementRef<'_>) -> bool {
    descendants(el).any(is_clickable)
}

/// True when a clickable sits between `el` and `scope` (exclusive).
pub(crate) fn inside_clickable(el: ElementRef<'_>, scope: ElementRef<'_>) -> bool {
    ancestors(el)
        .take_while(|a| a.id() != scope.id())
        .any(is_clickable)
}

/// Raw destination of a clickable: `href`, or `data-href` on buttons.
/// Empty, fragment-only and `javascript:` destinations are not usable.
pub(crate) fn destination<'a>(el: ElementRef<'a>) -> Option<&'a str> {
    let raw = attr(el, "href").or_else(|| {
        if tag(el) == "button" {
            attr(el, "data-href")
        } else {
            None
        }
    })?;
    let href = raw.trim();
    if href.is_empty()
        || href.starts_with('#')
        || href.to_ascii_lowercase().starts_with("javascript:")
    {
        return None;
    }
    Some(href)
}

pub(crate) fn has_usable_clickable(el: ElementRef<'_>) -> bool {
    descendants(el).any(|d| is_clickable(d) && destination(d).is_some())
}

pub(crate) fn is_screen_reader_only(el: ElementRef<'_>) -> bool {
    el.value()
        .classes()
        .any(|c| SCREEN_READER_TOKENS.iter().any(|t| c.eq_ignore_ascii_case(t)))
}

/// Text runs under `el`, skipping script-like and screen-reader-only subtrees.
pub(crate) fn text_runs<'a>(el: ElementRef<'a>) -> impl Iterator<Item = &'a str> {
    el.descendants().filter_map(move |node| match node.value() {
        Node::Text(text) if !is_silenced(node, el) => Some(&**text),
        _ => None,
    })
}

fn is_silenced(node: NodeRef<'_, Node>, scope: ElementRef<'_>) -> bool {
    for ancestor in node.ancestors() {
        if let Some(el) = ElementRef::wrap(ancestor)
            && (is_tag(el, SILENT_TAGS) || is_screen_reader_only(el))
        {
            return true;
        }
        if ancestor.id() == scope.id() {
            break;
        }
    }
    false
}

pub(crate) fn visible_text(el: ElementRef<'_>) -> String {
    text_runs(el).collect::<Vec<_>>().join(" ")
}

/// Strips icon glyphs and icon alt-text, collapses whitespace and trims
/// leading/trailing punctuation.
pub fn clean_text(raw: &str) -> String {
    let text = ICON_GLYPHS.replace_all(raw, " ");
    let text = ICON_TEXT.replace_all(&text, " ");
    let text = WHITESPACE.replace_all(&text, " ");
    EDGE_PUNCTUATION.replace_all(text.trim(), "").into_owned()
}

/// Short `tag#id.class` label for log lines and detection metadata.
pub(crate) fn describe(el: ElementRef<'_>) -> String {
    let mut label = tag(el).to_string();
    if let Some(id) = el.value().id() {
        label.push('#');
        label.push_str(id);
    }
    if let Some(class) = el.value().classes().next() {
        label.push('.');
        label.push_str(class);
    }
    label
}
