use crate::config::ValidationConfig;
use crate::model::MenuTree;
use crate::result::Verdict;
use std::collections::HashMap;
use url::Url;

/// Registrable form of a host: lower-case, leading `www.` removed.
pub fn site_domain(host: &str) -> String {
    let host = host.to_lowercase();
    host.strip_prefix("www.").map(str::to_string).unwrap_or(host)
}

/// The site's domain plus any configured aliases.
pub fn internal_domains(base: &Url, cfg: &ValidationConfig) -> Vec<String> {
    let Some(host) = base.host_str() else {
        return Vec::new();
    };
    let domain = site_domain(host);
    let mut domains = vec![domain.clone()];
    if let Some(aliases) = cfg.domain_aliases.get(&domain) {
        domains.extend(aliases.iter().map(|a| site_domain(a)));
    }
    domains
}

fn is_internal(url: &str, domains: &[String]) -> bool {
    let Some(host) = Url::parse(url).ok().and_then(|u| u.host_str().map(site_domain)) else {
        return false;
    };
    domains
        .iter()
        .any(|d| host == *d || host.ends_with(&format!(".{d}")))
}

/// Accepts or rejects a tree on overall quality.
///
/// Checks run in order: empty tree, minimum item count, internal-link
/// ratio, duplicate ratio. The first failing check supplies the reason.
pub fn validate(tree: &MenuTree, base: &Url, cfg: &ValidationConfig) -> Verdict {
    let links = tree.links();
    let total = links.len();

    if tree.is_empty() || total == 0 {
        return Verdict::rejected("Empty tree", 0.0);
    }
    if total < cfg.min_items {
        return Verdict::rejected(format!("Too few items: {total}"), 0.0);
    }

    let domains = internal_domains(base, cfg);
    let internal = links.iter().filter(|l| is_internal(&l.url, &domains)).count();
    let ratio = internal as f64 / total as f64;
    let percent = (ratio * 100.0).round();
    if ratio < cfg.min_internal_ratio {
        return Verdict::rejected(format!("Low internal ratio: {percent:.0}%"), ratio);
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for link in &links {
        *counts.entry(link.url.as_str()).or_default() += 1;
    }
    let duplicates: usize = counts.values().map(|c| c - 1).sum();
    if duplicates as f64 > cfg.max_duplicate_ratio * total as f64 {
        return Verdict::rejected(format!("Too many duplicates: {duplicates}"), ratio);
    }

    Verdict::accepted(
        format!(
            "{total} items, {percent:.0}% internal, {} menus",
            tree.stats.menus
        ),
        ratio,
    )
}
