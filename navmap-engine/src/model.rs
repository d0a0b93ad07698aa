use serde::{Deserialize, Serialize};

/// A single navigable destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Normalized absolute URL, unique within one extraction.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub children: Vec<NavNode>,
}

/// A trigger-bound grouping: the trigger's label, its own URL if it has one,
/// and the panel contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub children: Vec<NavNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NavNode {
    Link(LinkItem),
    Section(Section),
    Dropdown(Menu),
    MegaMenu(Menu),
}

impl NavNode {
    pub fn title(&self) -> Option<&str> {
        match self {
            NavNode::Link(item) => Some(&item.title),
            NavNode::Section(section) => section.title.as_deref(),
            NavNode::Dropdown(menu) | NavNode::MegaMenu(menu) => Some(&menu.title),
        }
    }

    pub fn children(&self) -> &[NavNode] {
        match self {
            NavNode::Link(_) => &[],
            NavNode::Section(section) => &section.children,
            NavNode::Dropdown(menu) | NavNode::MegaMenu(menu) => &menu.children,
        }
    }

    pub fn is_menu(&self) -> bool {
        matches!(self, NavNode::Dropdown(_) | NavNode::MegaMenu(_))
    }

    /// Leaf levels below and including this node; a link is depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(NavNode::depth).max().unwrap_or(0)
    }

    /// Every link item in this subtree, in tree order.
    pub fn links(&self) -> Vec<&LinkItem> {
        let mut out = Vec::new();
        self.collect_links(&mut out);
        out
    }

    fn collect_links<'n>(&'n self, out: &mut Vec<&'n LinkItem>) {
        if let NavNode::Link(item) = self {
            out.push(item);
        }
        for child in self.children() {
            child.collect_links(out);
        }
    }

    /// Menu-level URLs (dropdown own links) in this subtree.
    pub fn menu_urls(&self) -> Vec<&str> {
        let mut out = Vec::new();
        if let NavNode::Dropdown(menu) | NavNode::MegaMenu(menu) = self
            && let Some(url) = &menu.url
        {
            out.push(url.as_str());
        }
        for child in self.children() {
            out.extend(child.menu_urls());
        }
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    pub total_links: usize,
    pub top_level_items: usize,
    pub max_depth: usize,
    pub menus: usize,
}

/// The extracted navigation hierarchy with its summary counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuTree {
    #[serde(rename = "navigation")]
    pub nodes: Vec<NavNode>,
    #[serde(rename = "metadata")]
    pub stats: TreeStats,
}

impl MenuTree {
    pub fn new(nodes: Vec<NavNode>) -> Self {
        let total_links = nodes.iter().map(|n| n.links().len()).sum();
        let dropdowns = nodes.iter().filter(|n| n.is_menu()).count();
        let has_loose_links = nodes.iter().any(|n| matches!(n, NavNode::Link(_)));
        let stats = TreeStats {
            total_links,
            top_level_items: nodes.len(),
            max_depth: nodes.iter().map(NavNode::depth).max().unwrap_or(0),
            menus: dropdowns + usize::from(has_loose_links),
        };
        Self { nodes, stats }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn links(&self) -> Vec<&LinkItem> {
        self.nodes.iter().flat_map(NavNode::links).collect()
    }
}
