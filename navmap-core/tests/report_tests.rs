// Tests for output documents and report generation

use navmap_core::config::{OutputConfig, ScraperConfig};
use navmap_core::report::{
    already_scraped, build_document, failure_path, generate_scrape_report, success_path,
    tree_to_menus, write_outcome, FailureDocument, OutputConvention, SiteDocument,
};
use navmap_core::scrape::{analyze_html, OutcomeStatus, SiteOutcome};
use navmap_engine::{LinkItem, Menu, NavNode, Section};
use std::fs;
use tempfile::TempDir;

fn link(title: &str) -> NavNode {
    NavNode::Link(LinkItem {
        title: title.to_string(),
        description: None,
        url: format!("https://acme.test/{}", title.to_lowercase()),
    })
}

fn section(title: &str, children: Vec<NavNode>) -> NavNode {
    NavNode::Section(Section {
        title: Some(title.to_string()),
        children,
    })
}

fn menu(title: &str, url: Option<&str>, children: Vec<NavNode>) -> Menu {
    Menu {
        title: title.to_string(),
        url: url.map(str::to_string),
        children,
    }
}

fn item_titles(items: &[LinkItem]) -> Vec<&str> {
    items.iter().map(|i| i.title.as_str()).collect()
}

const NAV_PAGE: &str = r#"<html><body><nav id="main"><ul>
    <li><a href="/products">Products</a><ul>
        <li><a href="/products/analytics">Analytics</a></li>
        <li><a href="/products/billing">Billing</a></li></ul></li>
    <li><a href="/pricing">Pricing</a></li>
    <li><a href="/about">About</a></li>
</ul></nav></body></html>"#;

fn accepted_outcome() -> SiteOutcome {
    let extraction = analyze_html(NAV_PAGE, "https://www.acme.test/", &ScraperConfig::default()).unwrap();
    SiteOutcome {
        url: "https://www.acme.test/".to_string(),
        domain: "acme.test".to_string(),
        status: OutcomeStatus::Accepted,
        reason: extraction.verdict.reason.clone(),
        redirected_to: None,
        extraction: Some(extraction),
    }
}

fn outcome(domain: &str, status: OutcomeStatus, reason: &str) -> SiteOutcome {
    SiteOutcome {
        url: format!("https://{}/", domain),
        domain: domain.to_string(),
        status,
        reason: reason.to_string(),
        redirected_to: None,
        extraction: None,
    }
}

fn output_config(dir: &TempDir) -> OutputConfig {
    OutputConfig {
        dir: dir.path().to_path_buf(),
        ..OutputConfig::default()
    }
}

// ============================================================================
// Output Convention Tests
// ============================================================================

#[test]
fn test_output_convention_from_name() {
    assert_eq!(OutputConvention::from_name("tree"), Some(OutputConvention::Tree));
    assert_eq!(OutputConvention::from_name("MENUS"), Some(OutputConvention::Menus));
    assert_eq!(OutputConvention::from_name("csv"), None);
    assert_eq!(OutputConvention::Menus.as_str(), "menus");
}

// ============================================================================
// Menu Flattening Tests
// ============================================================================

#[test]
fn test_tree_to_menus_groups_sections_and_loose_links() {
    let nodes = vec![
        NavNode::Dropdown(menu(
            "Products",
            Some("https://acme.test/products"),
            vec![link("A"), section("Tools", vec![link("B"), link("C")]), link("D")],
        )),
        link("Pricing"),
        NavNode::MegaMenu(menu(
            "Products",
            None,
            vec![
                section("X", vec![link("E"), link("F")]),
                section("Y", vec![link("G"), link("H")]),
            ],
        )),
    ];

    let menus = tree_to_menus(&nodes);
    let names: Vec<&str> = menus.iter().map(|m| m.menu_name.as_str()).collect();
    assert_eq!(names, vec!["Products", "Products (2)", "Navigation"]);

    let products = &menus[0];
    assert_eq!(products.url.as_deref(), Some("https://acme.test/products"));
    let sections: Vec<&str> = products.sections.iter().map(|s| s.section_title.as_str()).collect();
    assert_eq!(sections, vec!["Products", "Tools", "Products"]);
    assert_eq!(item_titles(&products.sections[1].items), vec!["B", "C"]);

    assert_eq!(menus[1].sections.len(), 2);
    assert_eq!(item_titles(&menus[2].sections[0].items), vec!["Pricing"]);
}

#[test]
fn test_nested_dropdown_becomes_section_with_its_own_link() {
    let nodes = vec![NavNode::Dropdown(menu(
        "Docs",
        None,
        vec![
            NavNode::Dropdown(menu(
                "API",
                Some("https://acme.test/api"),
                vec![link("Auth"), link("Webhooks")],
            )),
            link("Guides"),
        ],
    ))];

    let menus = tree_to_menus(&nodes);
    assert_eq!(menus.len(), 1);
    assert_eq!(menus[0].sections[0].section_title, "API");
    assert_eq!(
        item_titles(&menus[0].sections[0].items),
        vec!["API", "Auth", "Webhooks"]
    );
    assert_eq!(menus[0].sections[1].section_title, "Docs");
}

#[test]
fn test_tree_to_menus_empty() {
    assert!(tree_to_menus(&[]).is_empty());
}

// ============================================================================
// Document Tests
// ============================================================================

#[test]
fn test_build_document_tree_convention() {
    let outcome = accepted_outcome();
    let extraction = outcome.extraction.as_ref().unwrap();
    let document = build_document(
        &outcome.url,
        &outcome.domain,
        extraction,
        OutputConvention::Tree,
        "2024-01-01 00:00:00".to_string(),
    );

    assert!(document.menus.is_none());
    assert_eq!(document.navigation.as_ref().unwrap().len(), 3);
    assert_eq!(document.metadata.total_links, 4);
    assert_eq!(document.metadata.container, "nav#main");

    let json = serde_json::to_value(&document).unwrap();
    assert_eq!(json["website"], "https://www.acme.test/");
    assert_eq!(json["scraped_at"], "2024-01-01 00:00:00");
    assert_eq!(json["navigation"][0]["type"], "dropdown");
    assert_eq!(json["navigation"][1]["type"], "link");
    assert_eq!(json["metadata"]["detection_mode"], "primary");
    assert!(json.get("menus").is_none());
}

#[test]
fn test_build_document_menus_convention() {
    let outcome = accepted_outcome();
    let document = build_document(
        &outcome.url,
        &outcome.domain,
        outcome.extraction.as_ref().unwrap(),
        OutputConvention::Menus,
        "2024-01-01 00:00:00".to_string(),
    );

    let menus = document.menus.unwrap();
    assert!(document.navigation.is_none());
    assert_eq!(menus[0].menu_name, "Products");
    assert_eq!(menus[1].menu_name, "Navigation");
    assert_eq!(item_titles(&menus[1].sections[0].items), vec!["Pricing", "About"]);
}

// ============================================================================
// Persistence Tests
// ============================================================================

#[test]
fn test_write_accepted_outcome() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let output = output_config(&dir);

    fs::write(failure_path(dir.path(), "acme.test"), "{}")?;
    assert!(!already_scraped(dir.path(), "acme.test"));

    let path = write_outcome(&accepted_outcome(), &output)?.unwrap();
    assert_eq!(path, success_path(dir.path(), "acme.test"));
    assert!(already_scraped(dir.path(), "acme.test"));
    assert!(!failure_path(dir.path(), "acme.test").exists());

    let document: SiteDocument = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(document.domain, "acme.test");
    assert_eq!(document.metadata.verdict, "4 items, 100% internal, 2 menus");
    Ok(())
}

#[test]
fn test_write_failed_outcome() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let mut output = output_config(&dir);

    let failed = outcome("broken.test", OutcomeStatus::Failed, "HTTP 503");
    let path = write_outcome(&failed, &output)?.unwrap();
    let document: FailureDocument = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(document.reason, "HTTP 503");
    assert_eq!(document.website, "https://broken.test/");

    output.save_failures = false;
    let rejected = outcome("thin.test", OutcomeStatus::Rejected, "Too few items: 2");
    assert!(write_outcome(&rejected, &output)?.is_none());
    assert!(!failure_path(dir.path(), "thin.test").exists());

    let skipped = outcome("acme.test", OutcomeStatus::Skipped, "already scraped");
    assert!(write_outcome(&skipped, &output)?.is_none());
    Ok(())
}

#[test]
fn test_output_file_names_are_sanitized() {
    let dir = TempDir::new().unwrap();
    let path = success_path(dir.path(), "acme.test:8080");
    assert_eq!(path.file_name().unwrap(), "acme.test_8080_success.json");
}

// ============================================================================
// Scrape Report Tests
// ============================================================================

#[test]
fn test_generate_scrape_report() {
    let outcomes = vec![
        outcome("acme.test", OutcomeStatus::Accepted, "12 items, 90% internal, 3 menus"),
        outcome("thin.test", OutcomeStatus::Rejected, "Too few items: 2"),
        outcome("down.test", OutcomeStatus::Failed, "HTTP 503"),
        outcome("done.test", OutcomeStatus::Skipped, "already scraped"),
    ];

    let report = generate_scrape_report(&outcomes);
    assert!(report.contains("Sites: 4"));
    assert!(report.contains("Accepted: 1"));
    assert!(report.contains("Skipped: 1"));
    assert!(report.contains("Success rate: 33.3%"));
    assert!(report.contains("## rejected (1)"));
    assert!(report.contains("thin.test  Too few items: 2"));
    assert!(report.contains("down.test  HTTP 503"));
}

#[test]
fn test_scrape_report_notes_redirects() {
    let moved = SiteOutcome {
        redirected_to: Some("https://acme-global.test/".to_string()),
        ..outcome("acme.test", OutcomeStatus::Accepted, "12 items, 90% internal, 3 menus")
    };
    let report = generate_scrape_report(&[moved, outcome("thin.test", OutcomeStatus::Rejected, "Too few items: 2")]);
    assert!(report.contains("acme.test  12 items, 90% internal, 3 menus (redirected to https://acme-global.test/)\n"));
    assert!(report.contains("thin.test  Too few items: 2\n"));
    assert!(!report.contains("thin.test  Too few items: 2 (redirected"));
}

#[test]
fn test_generate_scrape_report_empty() {
    let report = generate_scrape_report(&[]);
    assert!(report.contains("Sites: 0"));
    assert!(report.contains("Success rate: 0.0%"));
    assert!(!report.contains("##"));
}
