// SPDX-License-Identifier: PMPL-1.0-or-later
//! Integration tests for a11y-fixer

use a11y_fixer::config::load_config;
use a11y_fixer::position::LineEndings;
use a11y_fixer::report::{generate_report, OutputFormat};
use a11y_fixer::rules::RuleRegistry;
use a11y_fixer::scanner;
use a11y_fixer::{analyze, EditResolver, Position};
use std::collections::BTreeSet;
use std::path::Path;

fn scan(name: &str) -> scanner::FileReport {
    scanner::scan_file(
        &Path::new("tests/fixtures").join(name),
        &RuleRegistry::default(),
    )
    .expect("scan should succeed")
}

#[test]
fn test_scan_accessible_fixture() {
    let report = scan("accessible.html");
    assert!(
        report.issues.is_empty(),
        "Accessible fixture should have no issues, got {:?}",
        report.issues.iter().map(|i| &i.id).collect::<Vec<_>>()
    );
    assert!(report.failures.is_empty());
}

#[test]
fn test_scan_inaccessible_fixture() {
    let report = scan("inaccessible.html");

    assert_eq!(report.issues.len(), 14, "got {:#?}", report.issues);
    assert_eq!(report.fixable(), 12);

    // Every rule fires at least once
    let ids: BTreeSet<&str> = report.issues.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids.len(), RuleRegistry::default().rule_ids().len());
}

#[test]
fn test_scan_partial_fixture() {
    let report = scan("partial.html");
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].id, "image-alt");
    assert_eq!(report.issues[0].start, Position::new(4, 2));
}

#[test]
fn test_fix_all_leaves_only_unfixable_issues() {
    let original = std::fs::read_to_string("tests/fixtures/inaccessible.html").expect("fixture");
    let issues = analyze(&original);

    let mut fixed = original.clone();
    let resolution = EditResolver::default().fix_all(&mut fixed, &issues);

    assert_eq!(resolution.applied, 12);
    // The linked logo gets the same alt insertion from two rules
    assert_eq!(resolution.duplicates, 1);
    assert!(resolution.conflicts.is_empty());

    assert!(fixed.contains(r#"<html lang="en">"#));
    assert!(fixed.contains("<h2>Featured</h2>"));
    assert!(fixed.contains(r#"<img src="/img/logo.png" alt="TODO: describe">"#));
    assert!(fixed.contains(r#"<button class="menu-toggle" aria-label="TODO: describe">"#));
    assert!(fixed.contains(r#"<div id="card" >Card</div>"#));
    assert!(fixed.contains(r#"<div id="card-1">Other card</div>"#));

    let remaining: Vec<_> = analyze(&fixed).into_iter().map(|i| i.id).collect();
    assert_eq!(remaining, vec!["aria-hidden-focus"]);
}

#[test]
fn test_each_fix_resolves_its_own_issue() {
    let original = std::fs::read_to_string("tests/fixtures/inaccessible.html").expect("fixture");

    for issue in analyze(&original).iter().filter(|i| i.is_fixable()) {
        let mut doc = original.clone();
        EditResolver::default().apply_fix(&mut doc, issue.fix.as_ref().expect("fixable"));
        let after = analyze(&doc);
        assert!(
            !after.iter().any(|i| i.id == issue.id && i.start == issue.start),
            "fix '{}' did not resolve {} at {}",
            issue.fix.as_ref().map(|f| f.title.as_str()).unwrap_or_default(),
            issue.id,
            issue.start
        );
    }
}

#[test]
fn test_scan_fixture_directory() {
    let reports = scanner::scan_directory(Path::new("tests/fixtures"), &RuleRegistry::default())
        .expect("scan should succeed");

    let names: Vec<_> = reports
        .iter()
        .filter_map(|r| r.path.file_name().and_then(|n| n.to_str()))
        .collect();
    assert_eq!(names, vec!["accessible.html", "inaccessible.html", "partial.html"]);

    let total: usize = reports.iter().map(|r| r.issues.len()).sum();
    assert_eq!(total, 15);
}

#[test]
fn test_report_formats() {
    let reports = vec![scan("partial.html")];

    let text = generate_report(&reports, OutputFormat::Text);
    assert!(text.contains("Found 1 issue(s) in 1 file(s), 1 automatically fixable"));
    assert!(text.contains("partial.html:5:3"));

    let json = generate_report(&reports, OutputFormat::Json);
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
    assert_eq!(parsed[0]["issues"][0]["id"], "image-alt");

    let sarif = generate_report(&reports, OutputFormat::Sarif);
    let parsed: serde_json::Value = serde_json::from_str(&sarif).expect("valid SARIF JSON");
    let region = &parsed["runs"][0]["results"][0]["locations"][0]["physicalLocation"]["region"];
    assert_eq!(region["startLine"], 5);
    assert_eq!(region["startColumn"], 3);
}

#[test]
fn test_config_file_drives_registry() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(".a11y-fixer.toml");
    std::fs::write(
        &path,
        r#"
[analysis]
labels = "heuristic"
disabled_rules = ["html-lang", "aria-hidden-focus"]
"#,
    )
    .expect("write config");

    let config = load_config(&path).expect("config loads");
    let registry = RuleRegistry::from_config(&config.analysis);
    let report = scanner::scan_file(Path::new("tests/fixtures/inaccessible.html"), &registry)
        .expect("scan should succeed");

    assert!(!report.issues.iter().any(|i| i.id == "html-lang" || i.id == "aria-hidden-focus"));

    let sunset = report
        .issues
        .iter()
        .find(|i| i.id == "image-alt" && i.start.line == 13)
        .and_then(|i| i.fix.as_ref())
        .expect("sunset image fix");
    assert_eq!(sunset.edits[0].new_text, " alt=\"Sunset over lake\"");
}

#[test]
fn test_line_ending_modes() {
    let html = "<p>a</p>\r<img src=\"a.png\">";

    let lf = RuleRegistry::default().analyze(html);
    assert_eq!(lf[0].start, Position::new(0, 9));

    let mut config = a11y_fixer::config::AnalysisConfig::default();
    config.line_endings = LineEndings::Universal;
    let registry = RuleRegistry::from_config(&config);
    let universal = registry.analyze(html);
    assert_eq!(universal[0].start, Position::new(1, 0));

    // Fixes computed in either mode land at the same byte
    let mut a = html.to_string();
    EditResolver::default().fix_all(&mut a, &lf);
    let mut b = html.to_string();
    EditResolver::new(Default::default(), LineEndings::Universal).fix_all(&mut b, &universal);
    assert_eq!(a, b);
    assert!(a.ends_with("alt=\"TODO: describe\">"));
}
