// SPDX-License-Identifier: PMPL-1.0-or-later
//! Issues produced by the rules.

use crate::edit::{Fix, Position, Range};
use serde::{Deserialize, Serialize};

/// One detected accessibility violation in a text snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Stable rule identifier (e.g., "image-alt")
    pub id: String,
    /// Human-readable message
    pub message: String,
    /// Start of the offending construct
    pub start: Position,
    /// End of the offending construct
    pub end: Position,
    /// Automatic repair, present only when one is safe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
    /// WCAG success criterion reference (e.g., "1.1.1")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wcag: Option<String>,
}

impl Issue {
    /// Create a new issue covering `range`
    pub fn new(id: &str, message: impl Into<String>, range: Range) -> Self {
        Self {
            id: id.to_string(),
            message: message.into(),
            start: range.start,
            end: range.end,
            fix: None,
            wcag: None,
        }
    }

    /// Attach a fix
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Set the WCAG criterion
    pub fn with_wcag(mut self, criterion: &str) -> Self {
        self.wcag = Some(criterion.to_string());
        self
    }

    pub fn range(&self) -> Range {
        Range::new(self.start, self.end)
    }

    pub fn is_fixable(&self) -> bool {
        self.fix.is_some()
    }

    /// Location string for display (1-indexed)
    pub fn location_string(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }
}
