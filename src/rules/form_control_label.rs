// SPDX-License-Identifier: PMPL-1.0-or-later
//! Custom form control rule - WCAG 4.1.2 Name, Role, Value (Level A)
//!
//! Elements that take an interactive widget role (`role="checkbox"` on a
//! `<div>`, say) need an accessible name just like native controls do.
//! Native `<input>`, `<select>` and `<textarea>` are left to `input-label`.

use super::input_label::NATIVE_CONTROLS;
use super::labels::Labeler;
use super::markup;
use super::{Rule, SourceText};
use crate::edit::Fix;
use crate::issue::Issue;

/// Widget roles that require a name
const CONTROL_ROLES: &[&str] = &[
    "textbox", "searchbox", "combobox", "listbox", "checkbox", "radio", "switch", "slider", "spinbutton",
];

/// Roles whose name may come from their content
const NAME_FROM_CONTENT: &[&str] = &["checkbox", "radio", "switch"];

/// Flags elements with a form-control role and no accessible name
pub struct FormControlLabel {
    labeler: Labeler,
}

impl FormControlLabel {
    pub fn new(labeler: Labeler) -> Self {
        Self { labeler }
    }
}

impl Rule for FormControlLabel {
    fn id(&self) -> &'static str {
        "form-control-has-label"
    }

    fn description(&self) -> &'static str {
        "Checks elements with form-control roles for an accessible name (WCAG 4.1.2)"
    }

    fn check(&self, source: &SourceText<'_>) -> Vec<Issue> {
        let text = source.text();
        let targets = markup::label_targets(text);
        let mut issues = Vec::new();

        for tag in markup::start_tags(text).filter(|t| !t.is_any(NATIVE_CONTROLS)) {
            let Some(role) = tag.attr_value("role").map(|r| r.trim().to_lowercase()) else {
                continue;
            };
            if !CONTROL_ROLES.contains(&role.as_str()) || markup::has_name_attribute(&tag) {
                continue;
            }
            if tag.attr_value("id").is_some_and(|id| targets.contains(id.trim())) {
                continue;
            }

            let insert_at = source.attribute_point(&tag);
            let label = self.labeler.control(tag.attrs_text());
            let element = source.element(tag);
            if NAME_FROM_CONTENT.contains(&role.as_str())
                && !markup::visible_text(&text[element.content.clone()]).is_empty()
            {
                continue;
            }

            issues.push(
                Issue::new(
                    self.id(),
                    format!("Element with role=\"{}\" has no accessible name. Add aria-label or aria-labelledby.", role),
                    source.range(element.span()),
                )
                .with_wcag("4.1.2")
                .with_fix(Fix::single("Add aria-label", source.insert(insert_at, format!(" aria-label=\"{}\"", label)))),
            );
        }

        issues
    }
}
