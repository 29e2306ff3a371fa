// SPDX-License-Identifier: PMPL-1.0-or-later
//! Hidden focusable content rule - WCAG 4.1.2 Name, Role, Value (Level A)
//!
//! `aria-hidden="true"` removes a subtree from the accessibility tree, but
//! keyboard focus can still land inside it. There is no safe automatic
//! repair: removing focusability or unhiding both change behaviour.

use super::markup;
use super::{Rule, SourceText};
use crate::issue::Issue;
use crate::position::floor_char_boundary;

/// How far past an unclosed hidden element to look for focusable content
const UNCLOSED_WINDOW: usize = 400;

/// Flags hidden elements that are or contain focusable content
pub struct AriaHiddenFocus;

impl Rule for AriaHiddenFocus {
    fn id(&self) -> &'static str {
        "aria-hidden-focus"
    }

    fn description(&self) -> &'static str {
        "Checks that aria-hidden content is not focusable (WCAG 4.1.2)"
    }

    fn check(&self, source: &SourceText<'_>) -> Vec<Issue> {
        let text = source.text();
        let mut issues = Vec::new();

        for tag in markup::start_tags(text) {
            if !tag
                .attr_value("aria-hidden")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
            {
                continue;
            }

            let self_focusable = markup::is_focusable(&tag);
            let element = source.element(tag);
            let content = match element.closing {
                Some(_) => element.content.clone(),
                None if element.tag.is_void() => element.content.clone(),
                None => {
                    let start = element.content.start;
                    start..floor_char_boundary(text, (start + UNCLOSED_WINDOW).min(text.len()))
                }
            };

            let focusable_child = markup::start_tags(&text[content]).any(|t| markup::is_focusable(&t));
            if !self_focusable && !focusable_child {
                continue;
            }

            issues.push(
                Issue::new(
                    self.id(),
                    "aria-hidden=\"true\" element is or contains focusable content. Remove it from the tab order or do not hide it.",
                    source.range(element.span()),
                )
                .with_wcag("4.1.2"),
            );
        }

        issues
    }
}
