// SPDX-License-Identifier: PMPL-1.0-or-later
//! Link name rule - WCAG 2.4.4 Link Purpose, 4.1.2 Name, Role, Value (Level A)
//!
//! A link (`<a href>`) needs an accessible name: visible text, an
//! `aria-label`/`aria-labelledby`/`title`, or an image with alt text.
//! Image-only links are repaired on the image, everything else on the `<a>`.

use super::labels::Labeler;
use super::markup;
use super::{Rule, SourceText};
use crate::edit::Fix;
use crate::issue::Issue;

/// Flags links without an accessible name
pub struct LinkName {
    labeler: Labeler,
}

impl LinkName {
    pub fn new(labeler: Labeler) -> Self {
        Self { labeler }
    }
}

impl Rule for LinkName {
    fn id(&self) -> &'static str {
        "link-name"
    }

    fn description(&self) -> &'static str {
        "Checks links for an accessible name (WCAG 2.4.4, 4.1.2)"
    }

    fn check(&self, source: &SourceText<'_>) -> Vec<Issue> {
        let text = source.text();
        let mut issues = Vec::new();

        for tag in markup::tags_named(text, "a") {
            if !tag.has_attr("href") || tag.has_attr("aria-label") || tag.has_attr("aria-labelledby") || tag.has_attr("title") {
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

            let unnamed_img = markup::tags_named(inner, "img").find(|img| !img.has_attr("alt"));
            let fix = match unnamed_img {
                Some(img) => {
                    let at = element.content.start + img.insertion_point_for(source.syntax());
                    let alt = self.labeler.image(img.attr_value("src"));
                    Fix::single("Add alt text to linked image", source.insert(at, format!(" alt=\"{}\"", alt)))
                }
                None => {
                    let label = self.labeler.link(element.tag.attr_value("href"), inner);
                    Fix::single(
                        "Add aria-label",
                        source.insert(source.attribute_point(&element.tag), format!(" aria-label=\"{}\"", label)),
                    )
                }
            };

            issues.push(
                Issue::new(
                    self.id(),
                    "Link has no accessible name. Add link text, an aria-label, or alt text on its image.",
                    source.range(element.span()),
                )
                .with_wcag("2.4.4")
                .with_fix(fix),
            );
        }

        issues
    }
}
