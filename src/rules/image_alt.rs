// SPDX-License-Identifier: PMPL-1.0-or-later
//! Image alt text rule - WCAG 1.1.1 Non-text Content (Level A)
//!
//! Every `<img>` needs an `alt` attribute. `alt=""` is valid and marks the
//! image as decorative, as does `role="presentation"` or `role="none"`.

use super::labels::Labeler;
use super::markup::{self, Tag};
use super::{Rule, SourceText};
use crate::edit::Fix;
use crate::issue::Issue;

/// Flags images without a text alternative
pub struct ImageAlt {
    labeler: Labeler,
}

impl ImageAlt {
    pub fn new(labeler: Labeler) -> Self {
        Self { labeler }
    }
}

/// Whether the image already provides (or deliberately opts out of) a name
fn has_text_alternative(img: &Tag<'_>) -> bool {
    if ["alt", "aria-label", "aria-labelledby"].iter().any(|a| img.has_attr(a)) {
        return true;
    }
    img.attr_value("role")
        .is_some_and(|role| matches!(role.trim().to_lowercase().as_str(), "presentation" | "none"))
}

impl Rule for ImageAlt {
    fn id(&self) -> &'static str {
        "image-alt"
    }

    fn description(&self) -> &'static str {
        "Checks <img> elements for alt text (WCAG 1.1.1)"
    }

    fn check(&self, source: &SourceText<'_>) -> Vec<Issue> {
        markup::tags_named(source.text(), "img")
            .filter(|img| !has_text_alternative(img))
            .map(|img| {
                let alt = self.labeler.image(img.attr_value("src"));
                let edit = source.insert(source.attribute_point(&img), format!(" alt=\"{}\"", alt));
                Issue::new(
                    self.id(),
                    "Image is missing alt text. Add a description, or alt=\"\" if it is decorative.",
                    source.range(img.span.clone()),
                )
                .with_wcag("1.1.1")
                .with_fix(Fix::single("Add alt text", edit))
            })
            .collect()
    }
}
