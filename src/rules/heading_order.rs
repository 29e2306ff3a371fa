// SPDX-License-Identifier: PMPL-1.0-or-later
//! Heading order rule - WCAG 1.3.1 Info and Relationships (Level A)
//!
//! Heading levels may go down any number of steps but only up by one.
//! A skipped level is repaired by renaming both tags of the heading to the
//! next permitted level. Each heading is compared with the previous heading
//! as written, so one misplaced heading yields one issue.

use super::markup::TAG_BODY;
use super::{Rule, SourceText, PRIORITY_RENAME};
use crate::edit::Fix;
use crate::issue::Issue;
use regex::Regex;
use std::sync::LazyLock;

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?is)<(h[1-6])\b({})>(.*?)</(h[1-6])\s*>", TAG_BODY)).expect("valid regex")
});

/// Flags headings that skip a level
pub struct HeadingOrder;

fn level(name: &str) -> u8 {
    name.as_bytes().get(1).map_or(1, |b| b.saturating_sub(b'0'))
}

impl Rule for HeadingOrder {
    fn id(&self) -> &'static str {
        "heading-order"
    }

    fn description(&self) -> &'static str {
        "Checks that heading levels do not skip (WCAG 1.3.1)"
    }

    fn priority(&self) -> u8 {
        PRIORITY_RENAME
    }

    fn check(&self, source: &SourceText<'_>) -> Vec<Issue> {
        let mut issues = Vec::new();
        let mut last: u8 = 0;

        for caps in HEADING.captures_iter(source.text()) {
            let (Some(whole), Some(open), Some(close)) = (caps.get(0), caps.get(1), caps.get(4)) else {
                continue;
            };
            let current = level(open.as_str());

            if last > 0 && current > last + 1 {
                let target = last + 1;
                let name = format!("h{}", target);
                let fix = Fix::new(
                    format!("Change to <{}>", name),
                    vec![
                        source.replace(open.range(), name.clone()),
                        source.replace(close.range(), name.clone()),
                    ],
                );
                issues.push(
                    Issue::new(
                        self.id(),
                        format!(
                            "Heading level skipped: <{}> follows <h{}>. Use <{}> instead.",
                            open.as_str().to_lowercase(),
                            last,
                            name
                        ),
                        source.range(whole.range()),
                    )
                    .with_wcag("1.3.1")
                    .with_fix(fix),
                );
            }
            last = current;
        }

        issues
    }
}
