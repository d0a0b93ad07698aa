use crate::config::EngineConfig;
use crate::dom::{
    attr, class_string, clean_text, contains_clickable, descendants, destination, is_tag,
    next_sibling_element, tag, text_runs, visible_text, HEADINGS,
};
use crate::locate::SearchMode;
use crate::model::LinkItem;
use crate::predicates::{is_footer_or_fence, is_noise_text};
use crate::vocab::{DESCRIPTION_CLASS, ITEM_TITLE_CLASS, LABEL_CLASS};
use ego_tree::NodeId;
use scraper::ElementRef;
use std::collections::HashSet;
use tracing::trace;
use url::Url;

const MIN_TITLE_LEN: usize = 2;
const FIRST_RUN_MAX_LEN: usize = 150;
const MIN_DESCRIPTION_LEN: usize = 6;
const DESCRIPTION_TAGS: &[&str] = &["p", "span", "div", "small"];

/// Resolves `href` against `base` and reduces it to its identity form:
/// no fragment, lower-case scheme and host, no default port, no trailing
/// slash. Returns `None` for unusable or non-http(s) destinations.
pub fn normalize_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    let lower = href.to_ascii_lowercase();
    if href.is_empty()
        || href.starts_with('#')
        || ["javascript:", "mailto:", "tel:", "data:"]
            .iter()
            .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.set_fragment(None);

    let mut out = format!("{}://{}", url.scheme(), url.host_str()?);
    if let Some(port) = url.port() {
        out.push_str(&format!(":{port}"));
    }
    out.push_str(url.path().trim_end_matches('/'));
    if let Some(query) = url.query() {
        out.push('?');
        out.push_str(query);
    }
    Some(out)
}

fn title_len_ok(text: &str, max: usize) -> bool {
    (MIN_TITLE_LEN..=max).contains(&text.chars().count())
}

/// Title of a clickable, from the most specific source available: a
/// title-classed descendant, a heading or strong descendant, a label span,
/// the first substantial text run, then `aria-label` and `title`.
pub fn link_title(el: ElementRef<'_>, max_len: usize) -> Option<String> {
    let from_element = |found: Option<ElementRef<'_>>| {
        found
            .map(|e| clean_text(&visible_text(e)))
            .filter(|t| title_len_ok(t, max_len))
    };

    from_element(descendants(el).find(|d| ITEM_TITLE_CLASS.is_match(&class_string(*d))))
        .or_else(|| {
            from_element(descendants(el).find(|d| is_tag(*d, HEADINGS) || is_tag(*d, &["strong", "b"])))
        })
        .or_else(|| {
            from_element(
                descendants(el).find(|d| tag(*d) == "span" && LABEL_CLASS.is_match(&class_string(*d))),
            )
        })
        .or_else(|| {
            text_runs(el)
                .map(clean_text)
                .find(|t| (MIN_TITLE_LEN..=FIRST_RUN_MAX_LEN).contains(&t.chars().count()))
        })
        .or_else(|| {
            ["aria-label", "title"]
                .iter()
                .filter_map(|name| attr(el, name))
                .map(clean_text)
                .find(|t| title_len_ok(t, max_len))
        })
}

/// Optional description: a description-classed descendant, a `p`/`small`
/// inside the link, or a link-free text sibling right after it.
pub fn link_description(el: ElementRef<'_>, title: &str, max_len: usize) -> Option<String> {
    let accept = |candidate: ElementRef<'_>| {
        let text = clean_text(&visible_text(candidate));
        let len = text.chars().count();
        (text != title && (MIN_DESCRIPTION_LEN..max_len).contains(&len)).then_some(text)
    };

    descendants(el)
        .filter(|d| is_tag(*d, DESCRIPTION_TAGS) && DESCRIPTION_CLASS.is_match(&class_string(*d)))
        .find_map(accept)
        .or_else(|| {
            descendants(el)
                .filter(|d| is_tag(*d, &["p", "small"]))
                .find_map(accept)
        })
        .or_else(|| {
            next_sibling_element(el)
                .filter(|s| is_tag(*s, DESCRIPTION_TAGS) && !contains_clickable(*s))
                .and_then(accept)
        })
}

/// Turns clickables into [`LinkItem`]s and owns the extraction-wide set of
/// claimed URLs, so each URL is emitted at most once.
pub struct LinkExtractor<'c> {
    base: Url,
    page_key: Option<String>,
    seen: HashSet<String>,
    scope: Option<NodeId>,
    mode: SearchMode,
    cfg: &'c EngineConfig,
}

impl<'c> LinkExtractor<'c> {
    pub fn new(base: Url, mode: SearchMode, cfg: &'c EngineConfig) -> Self {
        let page_key = normalize_url(&base, base.as_str());
        Self {
            base,
            page_key,
            seen: HashSet::new(),
            scope: None,
            mode,
            cfg,
        }
    }

    /// Limits the fence check to ancestors below `root`.
    pub fn with_scope(mut self, root: ElementRef<'_>) -> Self {
        self.scope = Some(root.id());
        self
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn claimed(&self) -> usize {
        self.seen.len()
    }

    /// Claims a normalized URL for a non-link node (a dropdown's own link).
    /// Returns `None` if it is the page itself or already claimed.
    pub fn claim_destination(&mut self, el: ElementRef<'_>) -> Option<String> {
        let url = normalize_url(&self.base, destination(el)?)?;
        if self.page_key.as_deref() == Some(url.as_str()) || !self.seen.insert(url.clone()) {
            return None;
        }
        Some(url)
    }

    pub fn extract(&mut self, el: ElementRef<'_>) -> Option<LinkItem> {
        let href = destination(el)?;
        let title = link_title(el, self.cfg.max_title_len)?;

        if is_noise_text(&title, el, self.mode, self.cfg) {
            trace!("noise link skipped: {}", title);
            return None;
        }
        if is_footer_or_fence(el, self.scope, self.mode, self.cfg.fence_depth) {
            trace!("fenced link skipped: {}", title);
            return None;
        }

        let url = normalize_url(&self.base, href)?;
        if self.page_key.as_deref() == Some(url.as_str()) {
            return None;
        }
        if !self.seen.insert(url.clone()) {
            trace!("duplicate url skipped: {}", url);
            return None;
        }

        let description = link_description(el, &title, self.cfg.max_description_len);
        Some(LinkItem {
            title,
            description,
            url,
        })
    }
}
