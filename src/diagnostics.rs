// SPDX-License-Identifier: PMPL-1.0-or-later
//! Editor-facing records built from issues.
//!
//! A [`Diagnostic`] is what a diagnostics panel shows; a [`CodeAction`] is the
//! single quick fix offered for an issue that has a fix.

use crate::edit::{Range, TextEdit};
use crate::issue::Issue;
use serde::{Deserialize, Serialize};

/// Source tag attached to every diagnostic
pub const DIAGNOSTIC_SOURCE: &str = "a11y";

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Information => write!(f, "information"),
            Severity::Hint => write!(f, "hint"),
        }
    }
}

/// One entry for an editor's diagnostics surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: Severity,
    /// The issue's rule id
    pub code: String,
    pub source: String,
    pub message: String,
}

impl From<&Issue> for Diagnostic {
    fn from(issue: &Issue) -> Self {
        Self {
            range: issue.range(),
            severity: Severity::Warning,
            code: issue.id.clone(),
            source: DIAGNOSTIC_SOURCE.to_string(),
            message: issue.message.clone(),
        }
    }
}

/// A quick fix that applies one issue's edits atomically
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeAction {
    pub title: String,
    /// The rule id of the issue this action repairs
    pub code: String,
    pub edits: Vec<TextEdit>,
    pub is_preferred: bool,
}

/// The quick fix for `issue`, if it has one
pub fn code_action(issue: &Issue) -> Option<CodeAction> {
    let fix = issue.fix.as_ref()?;
    Some(CodeAction {
        title: fix.title.clone(),
        code: issue.id.clone(),
        edits: fix.edits.clone(),
        is_preferred: true,
    })
}

/// Diagnostics for every issue, in issue order
pub fn diagnostics(issues: &[Issue]) -> Vec<Diagnostic> {
    issues.iter().map(Diagnostic::from).collect()
}

/// Quick fixes for the issues whose range contains `range`
pub fn code_actions_at(issues: &[Issue], range: Range) -> Vec<CodeAction> {
    issues
        .iter()
        .filter(|i| i.start <= range.start && range.end <= i.end)
        .filter_map(code_action)
        .collect()
}
