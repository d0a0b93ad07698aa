//! Class, id and text vocabularies shared by the predicates, scorer,
//! resolver and hierarchy builder. All patterns are case-insensitive.

use regex::Regex;
use std::sync::LazyLock;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("hardcoded regex pattern is valid")
}

/// Class tokens that hide an element outright (matched as whole tokens so
/// utility classes like `overflow-hidden` do not count).
pub(crate) const HIDDEN_TOKENS: &[&str] = &[
    "hidden",
    "invisible",
    "d-none",
    "is-hidden",
    "hide",
    "mobile-only",
];

pub(crate) const SCREEN_READER_TOKENS: &[&str] =
    &["sr-only", "visually-hidden", "screen-reader-text", "a11y-hidden"];

pub(crate) static OFF_CANVAS: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(off-?canvas|mobile-menu|mobile-nav|mobile-drawer)\b"));

pub(crate) static FOOTER: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(footer|site-footer|page-footer|bottom-nav)\b"));

pub(crate) static CONSENT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(cookies?|consent|gdpr)\b"));

pub(crate) static SIDE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(sidebar|side-bar|search|off-?canvas|mobile-menu|mobile-nav|drawer)\b")
});

pub(crate) static SIDEBAR: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(sidebar|side-bar|sidenav|side-nav|aside)\b"));

pub(crate) static BREADCRUMB: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\bbread-?crumbs?\b"));

pub(crate) static NAV_TOKENS: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(nav|navbar|navigation|menu|menubar|megamenu|header)\b")
});

pub(crate) static PRIMARY_TOKENS: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(main|primary|global|top|topnav|top-level|site-nav)\b"));

/// Panel vocabulary used inside a trigger's list item and by the detached search.
pub(crate) static DROPDOWN_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)(dropdown|drop-down|submenu|sub-menu|subnav|sub-nav|mega|panel|flyout|fly-out|children)")
});

/// Panel vocabulary for siblings adjacent to the trigger.
pub(crate) static SIBLING_PANEL_CLASS: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)(dropdown|submenu|sub-menu|mega|menu|panel|flyout)"));

/// Classes that mark an element (or the item wrapping it) as a dropdown
/// trigger. Matched within single class tokens.
pub(crate) static TRIGGER_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)\b(dropdown[\w-]*(toggle|trigger|button)|(sub-?menu|mega-menu|menu|flyout)[\w-]*(toggle|trigger)|has[\w-]*(dropdown|submenu|children|menu)|with[\w-]*(dropdown|submenu)|parent[\w-]*(item|link)|expandable)\b",
    )
});

/// Column vocabularies, tried in order.
pub(crate) static COLUMN_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        compile(r"(?i)(\bcol-|\bcolumn|\bgrid-item|\bgrid__item|\bmega-col|\bmenu-col)"),
        compile(r"(?i)\bcol\b"),
    ]
});

pub(crate) static SECTION_TITLE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(title|heading|label|head|header)\b"));

pub(crate) static ITEM_TITLE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(title|heading|name|label)\b"));

pub(crate) static LABEL_CLASS: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(label|text|name)\b"));

pub(crate) static DESCRIPTION_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(desc|description|subtitle|caption|summary|excerpt|subtext)\b")
});

pub(crate) static ICON_GLYPHS: LazyLock<Regex> =
    LazyLock::new(|| compile(r"[▾▸▹►▼▲◄◀▶→←↑↓⌄⌃✓✕✗×›‹»«]"));

pub(crate) static ICON_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\ban?\s+icon\s+of\b|\b(chevron|caret)(\s+(down|up|right|left))?\b|\b(right|left)\s+pointing\b")
});

pub(crate) static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"\s+"));

pub(crate) static EDGE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[^\w]+|[^\w]+$"));

/// Link labels that never belong to a navigation menu.
pub(crate) const NOISE_KEYWORDS: &[&str] = &[
    // account and auth
    "sign in",
    "sign up",
    "log in",
    "login",
    "log out",
    "logout",
    "register",
    "my account",
    "create account",
    // calls to action
    "get started",
    "start free",
    "free trial",
    "try free",
    "try for free",
    "book a demo",
    "request a demo",
    "get a demo",
    "contact sales",
    "talk to sales",
    // skip and back links
    "skip to content",
    "skip to main",
    "skip navigation",
    "back to top",
    "back to",
    // catch-all links
    "view all",
    "see all",
    "learn more",
    "read more",
    "show more",
    // legal
    "privacy policy",
    "terms of service",
    "terms of use",
    "cookie policy",
    "cookie settings",
    "cookies",
    "sitemap",
    // social networks
    "facebook",
    "twitter",
    "linkedin",
    "instagram",
    "youtube",
    "tiktok",
    "pinterest",
    // language and region
    "english",
    "deutsch",
    "français",
    "español",
    "language",
    "select language",
    "change region",
    // widget toggles
    "search",
    "menu",
    "close",
    "open",
    "toggle",
    "toggle navigation",
];
