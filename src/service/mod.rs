// SPDX-License-Identifier: PMPL-1.0-or-later
//! Suggestion service: turns a markup snippet into a list of edits.
//!
//! The same wire shape is used by the HTTP server in [`server`] and the
//! client in [`client`], so edits produced remotely can be fed straight
//! back into the resolver once revalidated.

pub mod client;
pub mod server;

use crate::config::Config;
use crate::edit::TextEdit;
use crate::resolver::EditResolver;
use crate::rules::labels::LabelMode;
use crate::rules::{RuleRegistry, Syntax};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Warning added when input is cut to `max_chars`
pub const TRUNCATION_WARNING: &str = "Input truncated due to size.";

fn default_mode() -> String {
    "heuristic".to_string()
}

/// Body of `POST /generate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub code: String,
    /// "heuristic" or "placeholder"
    #[serde(default = "default_mode")]
    pub mode: String,
    /// "html" or "jsx"; decides where attributes go in self-closing tags
    #[serde(default)]
    pub syntax: Syntax,
}

impl GenerateRequest {
    pub fn new(code: impl Into<String>, mode: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            mode: mode.into(),
            syntax: Syntax::default(),
        }
    }

    pub fn with_syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = syntax;
        self
    }
}

/// Response of `POST /generate`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Deduplicated edits, sorted descending by start
    pub edits: Vec<TextEdit>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Analyze `request.code` and collect the edits of every applicable fix
pub fn generate(request: &GenerateRequest, config: &Config) -> GenerateResponse {
    let mut warnings = Vec::new();

    let mode = match request.mode.parse::<LabelMode>() {
        Ok(mode) => mode,
        Err(_) => {
            warnings.push(format!("Unknown mode '{}'; using heuristic.", request.mode));
            LabelMode::Heuristic
        }
    };

    let code = match request.code.char_indices().nth(config.server.max_chars) {
        Some((cut, _)) => {
            warn!(max_chars = config.server.max_chars, "truncating oversized input");
            warnings.push(TRUNCATION_WARNING.to_string());
            &request.code[..cut]
        }
        None => request.code.as_str(),
    };

    let mut analysis_config = config.analysis.clone();
    analysis_config.labels = mode;
    let registry = RuleRegistry::from_config(&analysis_config);
    let analysis = registry.run_as(code, request.syntax);

    for issue in &analysis.issues {
        match (issue.id.as_str(), &issue.fix) {
            ("heading-order", Some(fix)) => {
                warnings.push(format!("Heading at {}: {} to fix order.", issue.start, fix.title));
            }
            ("aria-hidden-focus", _) => warnings.push(format!(
                "aria-hidden element at {} contains focusable content; \
                 consider removing aria-hidden or making content non-focusable.",
                issue.start
            )),
            _ => {}
        }
    }
    for failure in &analysis.failures {
        warnings.push(format!("Rule '{}' failed: {}", failure.rule, failure.message));
    }

    let resolver = EditResolver::new(config.resolver.overlap, analysis_config.line_endings);
    let plan = resolver.plan(code, analysis.issues.iter().filter_map(|i| i.fix.as_ref()));
    for conflict in plan.conflicts() {
        warnings.push(format!(
            "Skipped '{}': it overlaps '{}'.",
            conflict.title, conflict.conflicts_with
        ));
    }

    let edits: Vec<TextEdit> = plan.edits().cloned().collect();
    debug!(edits = edits.len(), warnings = warnings.len(), "generated suggestions");
    GenerateResponse { edits, warnings }
}
