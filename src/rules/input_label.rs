// SPDX-License-Identifier: PMPL-1.0-or-later
//! Form input label rule - WCAG 3.3.2 Labels or Instructions (Level A)
//!
//! Every `<input>`, `<select>` and `<textarea>` needs a label: a
//! `<label for>` pointing at its id, a wrapping `<label>`, or an
//! `aria-label`, `aria-labelledby` or `title` attribute.

use super::labels::Labeler;
use super::markup::{self, Tag};
use super::{Rule, SourceText};
use crate::edit::Fix;
use crate::issue::Issue;

/// Input types that do not need a visible label
const EXEMPT_INPUT_TYPES: &[&str] = &["hidden", "submit", "reset", "button", "image"];

/// Native form controls checked by this rule
pub(crate) const NATIVE_CONTROLS: &[&str] = &["input", "select", "textarea"];

/// Flags native form controls without a label
pub struct InputLabel {
    labeler: Labeler,
}

impl InputLabel {
    pub fn new(labeler: Labeler) -> Self {
        Self { labeler }
    }
}

fn is_exempt(tag: &Tag<'_>) -> bool {
    tag.is("input")
        && tag
            .attr_value("type")
            .is_some_and(|t| EXEMPT_INPUT_TYPES.contains(&t.trim().to_lowercase().as_str()))
}

impl Rule for InputLabel {
    fn id(&self) -> &'static str {
        "input-label"
    }

    fn description(&self) -> &'static str {
        "Checks form inputs for an associated label (WCAG 3.3.2)"
    }

    fn check(&self, source: &SourceText<'_>) -> Vec<Issue> {
        let text = source.text();
        let targets = markup::label_targets(text);
        let wrappers = markup::label_spans(text, source.elements());
        let mut issues = Vec::new();

        for tag in markup::start_tags(text).filter(|t| t.is_any(NATIVE_CONTROLS)) {
            if is_exempt(&tag) || markup::has_name_attribute(&tag) {
                continue;
            }
            if tag.attr_value("id").is_some_and(|id| targets.contains(id.trim())) {
                continue;
            }
            if markup::is_within(&wrappers, &tag.span) {
                continue;
            }

            let name = tag.name.to_lowercase();
            let label = self.labeler.control(tag.attrs_text());
            let edit = source.insert(source.attribute_point(&tag), format!(" aria-label=\"{}\"", label));
            let element = source.element(tag);
            issues.push(
                Issue::new(
                    self.id(),
                    format!(
                        "<{}> has no associated label. Add a <label for>, aria-label, or aria-labelledby.",
                        name
                    ),
                    source.range(element.span()),
                )
                .with_wcag("3.3.2")
                .with_fix(Fix::single("Add aria-label", edit)),
            );
        }

        issues
    }
}
