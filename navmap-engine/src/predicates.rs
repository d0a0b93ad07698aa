use crate::config::EngineConfig;
use crate::dom::{ancestors, attr, class_and_id, class_tokens, is_screen_reader_only, tag};
use crate::locate::SearchMode;
use crate::vocab::{CONSENT, FOOTER, HIDDEN_TOKENS, NOISE_KEYWORDS, OFF_CANVAS, SIDE_FENCE};
use ego_tree::NodeId;
use scraper::ElementRef;

const MIN_TEXT_LEN: usize = 2;
const MAX_TEXT_LEN: usize = 300;

/// False when inline style hides the element or its classes mark it hidden,
/// off-canvas or mobile-only.
///
/// A bare `hidden` token next to a responsive utility (`md:flex`) is the
/// "hidden on small screens" idiom and does not count.
pub fn is_visible(el: ElementRef<'_>) -> bool {
    if let Some(style) = attr(el, "style") {
        let style: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        if style.contains("display:none") || style.contains("visibility:hidden") {
            return false;
        }
    }

    let tokens = class_tokens(el);
    let responsive = tokens.iter().any(|t| t.contains(':'));
    let hidden = tokens.iter().any(|t| {
        HIDDEN_TOKENS.contains(&t.as_str()) && !(responsive && t == "hidden")
    });
    if hidden {
        return false;
    }

    !OFF_CANVAS.is_match(&tokens.join(" "))
}

/// True for text that cannot be a menu label: too short or too long, a
/// utility/CTA/legal/social keyword, screen-reader-only, or sitting inside a
/// footer or consent banner (footers are allowed in footer mode).
pub fn is_noise_text(
    text: &str,
    el: ElementRef<'_>,
    mode: SearchMode,
    cfg: &EngineConfig,
) -> bool {
    let trimmed = text.trim();
    let len = trimmed.chars().count();
    if !(MIN_TEXT_LEN..=MAX_TEXT_LEN).contains(&len) {
        return true;
    }

    let lower = trimmed.to_lowercase();
    let keywords = NOISE_KEYWORDS
        .iter()
        .copied()
        .chain(cfg.extra_noise_keywords.iter().map(String::as_str));
    for keyword in keywords {
        if lower == keyword || (keyword.chars().count() > 5 && contains_phrase(&lower, keyword)) {
            return true;
        }
    }

    if is_screen_reader_only(el) {
        return true;
    }

    ancestors(el).take(cfg.fence_depth).any(|a| {
        let tokens = class_and_id(a);
        CONSENT.is_match(&tokens)
            || (mode == SearchMode::Primary && (tag(a) == "footer" || FOOTER.is_match(&tokens)))
    })
}

/// True when `el` or one of its ancestors (at most `depth` levels, stopping
/// before `scope`) is a footer, or matches the cookie/sidebar/search/off-canvas
/// fence vocabulary. Used to drop links that leaked into a chosen nav root.
pub fn is_footer_or_fence(
    el: ElementRef<'_>,
    scope: Option<NodeId>,
    mode: SearchMode,
    depth: usize,
) -> bool {
    let chain = std::iter::once(el).chain(ancestors(el)).take(depth + 1);
    for node in chain {
        if Some(node.id()) == scope {
            break;
        }
        let tokens = class_and_id(node);
        if mode == SearchMode::Primary && (tag(node) == "footer" || FOOTER.is_match(&tokens)) {
            return true;
        }
        if CONSENT.is_match(&tokens) || SIDE_FENCE.is_match(&tokens) {
            return true;
        }
    }
    false
}

/// Container-level fence: the candidate's own classes name a fenced region,
/// or it sits inside a footer or consent banner.
pub fn is_fenced_container(el: ElementRef<'_>, mode: SearchMode, depth: usize) -> bool {
    let own = class_and_id(el);
    if CONSENT.is_match(&own) || SIDE_FENCE.is_match(&own) {
        return true;
    }
    if mode == SearchMode::Footer {
        return ancestors(el)
            .take(depth)
            .any(|a| CONSENT.is_match(&class_and_id(a)));
    }
    if tag(el) == "footer" || FOOTER.is_match(&own) {
        return true;
    }
    if ancestors(el).any(|a| tag(a) == "footer") {
        return true;
    }
    ancestors(el).take(depth).any(|a| {
        let tokens = class_and_id(a);
        FOOTER.is_match(&tokens) || CONSENT.is_match(&tokens)
    })
}

/// True when `el` is a footer or lies inside one.
pub(crate) fn is_footer_scoped(el: ElementRef<'_>) -> bool {
    std::iter::once(el)
        .chain(ancestors(el))
        .any(|a| tag(a) == "footer" || FOOTER.is_match(&class_and_id(a)))
}

/// Whole-phrase containment: `needle` must not be glued to letters or digits.
fn contains_phrase(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Page;
    use scraper::Html;

    fn cfg() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn test_visibility_rules() {
        let document = Html::parse_document(
            r#"<div id="a" style="display: none"></div>
               <div id="b" style="visibility:hidden"></div>
               <div id="c" class="nav hidden"></div>
               <div id="d" class="hidden md:flex"></div>
               <div id="e" class="overflow-hidden"></div>
               <div id="f" class="offcanvas-menu"></div>
               <div id="g" class="main-nav"></div>"#,
        );
        let page = Page::new(&document);
        let visible = |id: &str| is_visible(page.by_id(id).unwrap());
        assert!(!visible("a"));
        assert!(!visible("b"));
        assert!(!visible("c"));
        assert!(visible("d"));
        assert!(visible("e"));
        assert!(!visible("f"));
        assert!(visible("g"));
    }

    #[test]
    fn test_noise_keywords() {
        let document = Html::parse_document(r#"<nav><a id="a" href="/x">x</a></nav>"#);
        let page = Page::new(&document);
        let a = page.by_id("a").unwrap();
        let noise = |t: &str| is_noise_text(t, a, SearchMode::Primary, &cfg());
        assert!(noise("Sign in"));
        assert!(noise("Menu"));
        assert!(noise("Get started for free"));
        assert!(noise("x"));
        assert!(noise(&"a".repeat(301)));
        assert!(!noise("Products"));
        assert!(!noise("Menus and recipes"));
        assert!(!noise("Blog index"));
    }

    #[test]
    fn test_extra_noise_keywords() {
        let document = Html::parse_document(r#"<a id="a" href="/x">x</a>"#);
        let page = Page::new(&document);
        let mut config = cfg();
        config.extra_noise_keywords.push("careers".to_string());
        assert!(is_noise_text(
            "Careers",
            page.by_id("a").unwrap(),
            SearchMode::Primary,
            &config
        ));
    }

    #[test]
    fn test_footer_ancestry_is_noise_only_in_primary_mode() {
        let document =
            Html::parse_document(r#"<footer><ul><li><a id="a" href="/x">About</a></li></ul></footer>"#);
        let page = Page::new(&document);
        let a = page.by_id("a").unwrap();
        assert!(is_noise_text("About", a, SearchMode::Primary, &cfg()));
        assert!(!is_noise_text("About", a, SearchMode::Footer, &cfg()));
        assert!(is_footer_or_fence(a, None, SearchMode::Primary, 10));
        assert!(!is_footer_or_fence(a, None, SearchMode::Footer, 10));
    }

    #[test]
    fn test_fence_stops_at_scope() {
        let document = Html::parse_document(
            r#"<div class="search-enabled"><nav id="n"><a id="a" href="/x">Docs</a></nav></div>"#,
        );
        let page = Page::new(&document);
        let a = page.by_id("a").unwrap();
        let nav = page.by_id("n").unwrap();
        assert!(is_footer_or_fence(a, None, SearchMode::Primary, 10));
        assert!(!is_footer_or_fence(a, Some(nav.id()), SearchMode::Primary, 10));
    }

    #[test]
    fn test_fenced_containers() {
        let document = Html::parse_document(
            r#"<nav id="side" class="sidebar"></nav>
               <footer><nav id="foot"></nav></footer>
               <div class="cookie-banner"><div id="cookie"></div></div>
               <nav id="main" class="main-nav"></nav>"#,
        );
        let page = Page::new(&document);
        let fenced = |id: &str, mode| is_fenced_container(page.by_id(id).unwrap(), mode, 10);
        assert!(fenced("side", SearchMode::Primary));
        assert!(fenced("foot", SearchMode::Primary));
        assert!(!fenced("foot", SearchMode::Footer));
        assert!(fenced("cookie", SearchMode::Primary));
        assert!(!fenced("main", SearchMode::Primary));
    }

    #[test]
    fn test_contains_phrase_respects_word_edges() {
        assert!(contains_phrase("please log in now", "log in"));
        assert!(!contains_phrase("blog index", "log in"));
        assert!(contains_phrase("back to top", "back to"));
    }
}
