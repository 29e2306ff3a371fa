// SPDX-License-Identifier: PMPL-1.0-or-later
//! Report generation for scan results.
//!
//! Supports multiple output formats:
//! - Text: human-readable issues with WCAG criterion references
//! - JSON: structured per-file results for programmatic consumption
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use crate::scanner::FileReport;
use serde::Serialize;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// SARIF for IDE/CI integration
    Sarif,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Sarif => write!(f, "sarif"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "sarif" => Ok(OutputFormat::Sarif),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Generate a report from per-file results
pub fn generate_report(reports: &[FileReport], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => generate_text_report(reports),
        OutputFormat::Json => generate_json_report(reports),
        OutputFormat::Sarif => generate_sarif_report(reports),
    }
}

/// Generate human-readable text report
fn generate_text_report(reports: &[FileReport]) -> String {
    let mut output = String::new();

    output.push_str("=== a11y-fixer Accessibility Report ===\n\n");

    let total: usize = reports.iter().map(|r| r.issues.len()).sum();
    let failures: usize = reports.iter().map(|r| r.failures.len()).sum();

    if total == 0 && failures == 0 {
        output.push_str("No accessibility issues found. All checks passed.\n");
        return output;
    }

    let fixable: usize = reports.iter().map(FileReport::fixable).sum();
    output.push_str(&format!(
        "Found {} issue(s) in {} file(s), {} automatically fixable\n\n",
        total,
        reports.iter().filter(|r| !r.issues.is_empty()).count(),
        fixable
    ));

    for report in reports {
        if report.issues.is_empty() && report.failures.is_empty() {
            continue;
        }

        output.push_str(&format!("--- {} ({}) ---\n", report.path.display(), report.issues.len()));

        for issue in &report.issues {
            output.push_str(&format!("[{}] {}\n", issue.id, issue.message));
            output.push_str(&format!("  Location: {}:{}\n", report.path.display(), issue.start));

            if let Some(ref criterion) = issue.wcag {
                output.push_str(&format!("  WCAG: {}\n", criterion));
            }

            if let Some(ref fix) = issue.fix {
                output.push_str(&format!("  Fix: {}\n", fix.title));
            }

            output.push('\n');
        }

        for failure in &report.failures {
            output.push_str(&format!("[{}] rule failed: {}\n\n", failure.rule, failure.message));
        }
    }

    if fixable > 0 {
        output.push_str(&format!("Run `a11y-fixer fix <file>` to apply {} fix(es)\n", fixable));
    }

    output
}

/// Generate JSON report
fn generate_json_report(reports: &[FileReport]) -> String {
    serde_json::to_string_pretty(reports).unwrap_or_else(|e| {
        format!("{{\"error\": \"Failed to serialize issues: {}\"}}", e)
    })
}

/// SARIF report structure (simplified)
#[derive(Debug, Serialize)]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: String,
    version: String,
    runs: Vec<SarifRun>,
}

#[derive(Debug, Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Debug, Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Debug, Serialize)]
struct SarifDriver {
    name: String,
    version: String,
    #[serde(rename = "informationUri")]
    information_uri: String,
}

#[derive(Debug, Serialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: String,
    level: String,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Debug, Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Debug, Serialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: SarifPhysicalLocation,
}

#[derive(Debug, Serialize)]
struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: SarifArtifactLocation,
    region: SarifRegion,
}

#[derive(Debug, Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

/// 1-based, as SARIF requires
#[derive(Debug, Serialize)]
struct SarifRegion {
    #[serde(rename = "startLine")]
    start_line: usize,
    #[serde(rename = "startColumn")]
    start_column: usize,
    #[serde(rename = "endLine")]
    end_line: usize,
    #[serde(rename = "endColumn")]
    end_column: usize,
}

/// Generate SARIF report
fn generate_sarif_report(reports: &[FileReport]) -> String {
    let results: Vec<SarifResult> = reports
        .iter()
        .flat_map(|report| {
            let uri = report.path.display().to_string();
            report.issues.iter().map(move |issue| SarifResult {
                rule_id: issue.id.clone(),
                level: "warning".to_string(),
                message: SarifMessage { text: issue.message.clone() },
                locations: vec![SarifLocation {
                    physical_location: SarifPhysicalLocation {
                        artifact_location: SarifArtifactLocation { uri: uri.clone() },
                        region: SarifRegion {
                            start_line: issue.start.line + 1,
                            start_column: issue.start.column + 1,
                            end_line: issue.end.line + 1,
                            end_column: issue.end.column + 1,
                        },
                    },
                }],
            })
        })
        .collect();

    let report = SarifReport {
        schema: "https://json.schemastore.org/sarif-2.1.0.json".to_string(),
        version: "2.1.0".to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: "a11y-fixer".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    information_uri: "https://www.w3.org/WAI/WCAG21/quickref/".to_string(),
                },
            },
            results,
        }],
    };

    serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
        format!("{{\"error\": \"Failed to serialize SARIF report: {}\"}}", e)
    })
}
