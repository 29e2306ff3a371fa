// SPDX-License-Identifier: PMPL-1.0-or-later
//! Button name rule - WCAG 4.1.2 Name, Role, Value (Level A)

use super::labels::Labeler;
use super::markup;
use super::{Rule, SourceText};
use crate::edit::Fix;
use crate::issue::Issue;

/// Flags `<button>` elements that announce nothing
pub struct ButtonName {
    labeler: Labeler,
}

impl ButtonName {
    pub fn new(labeler: Labeler) -> Self {
        Self { labeler }
    }
}

impl Rule for ButtonName {
    fn id(&self) -> &'static str {
        "button-name"
    }

    fn description(&self) -> &'static str {
        "Checks buttons for an accessible name (WCAG 4.1.2)"
    }

    fn check(&self, source: &SourceText<'_>) -> Vec<Issue> {
        let text = source.text();
        let mut issues = Vec::new();

        for tag in markup::tags_named(text, "button") {
            if markup::has_name_attribute(&tag) {
                continue;
            }
            let element = source.element(tag);
            if element.closing.is_none() {
                continue;
            }
            let inner = &text[element.content.clone()];
            if !markup::visible_text(inner).is_empty() || markup::has_named_image(inner) {
                continue;
            }

            let label = self.labeler.button(element.tag.attrs_text(), inner);
            let edit = source.insert(source.attribute_point(&element.tag), format!(" aria-label=\"{}\"", label));
            issues.push(
                Issue::new(
                    self.id(),
                    "Button has no accessible name. Add visible text, aria-label, or aria-labelledby.",
                    source.range(element.span()),
                )
                .with_wcag("4.1.2")
                .with_fix(Fix::single("Add aria-label", edit)),
            );
        }

        issues
    }
}
