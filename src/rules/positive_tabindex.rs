// SPDX-License-Identifier: PMPL-1.0-or-later
//! Positive tabindex rule - WCAG 2.4.3 Focus Order (Level A)

use super::markup;
use super::{Rule, SourceText, PRIORITY_REMOVE};
use crate::edit::{Fix, TextEdit};
use crate::issue::Issue;

/// Flags `tabindex` values greater than zero
pub struct NoPositiveTabindex;

/// Whether a tabindex value is a positive integer. Values too large for
/// `u64` still count as positive.
fn is_positive(value: &str) -> bool {
    let digits = value.trim();
    let digits = digits.strip_prefix('+').unwrap_or(digits);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) && digits.bytes().any(|b| b != b'0')
}

impl Rule for NoPositiveTabindex {
    fn id(&self) -> &'static str {
        "no-positive-tabindex"
    }

    fn description(&self) -> &'static str {
        "Checks for tabindex values above zero (WCAG 2.4.3)"
    }

    fn priority(&self) -> u8 {
        PRIORITY_REMOVE
    }

    fn check(&self, source: &SourceText<'_>) -> Vec<Issue> {
        markup::start_tags(source.text())
            .filter_map(|tag| tag.attr("tabindex"))
            .filter(|attr| attr.value.is_some_and(is_positive))
            .map(|attr| {
                let range = source.range(attr.span.clone());
                Issue::new(
                    self.id(),
                    format!(
                        "tabindex=\"{}\" overrides the natural focus order. Remove it or use 0.",
                        attr.value.unwrap_or_default().trim()
                    ),
                    range,
                )
                .with_wcag("2.4.3")
                .with_fix(Fix::single("Remove positive tabindex", TextEdit::delete(range)))
            })
            .collect()
    }
}
