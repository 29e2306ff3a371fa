// SPDX-License-Identifier: PMPL-1.0-or-later
//! Document language rule - WCAG 3.1.1 Language of Page (Level A)

use super::markup;
use super::{Rule, SourceText};
use crate::edit::Fix;
use crate::issue::Issue;

/// Flags an `<html>` element without a usable `lang`
pub struct HtmlLang {
    language: String,
}

impl HtmlLang {
    pub fn new(default_language: &str) -> Self {
        let language = default_language.trim();
        let language = if language.is_empty() { "en" } else { language };
        Self {
            language: language.replace('"', ""),
        }
    }
}

impl Rule for HtmlLang {
    fn id(&self) -> &'static str {
        "html-lang"
    }

    fn description(&self) -> &'static str {
        "Checks that the <html> element declares a language (WCAG 3.1.1)"
    }

    fn check(&self, source: &SourceText<'_>) -> Vec<Issue> {
        // Fragments without an <html> element are not documents
        let Some(html) = markup::tags_named(source.text(), "html").next() else {
            return Vec::new();
        };

        let fix = match html.attr("lang") {
            None => Fix::single(
                format!("Add lang=\"{}\"", self.language),
                source.insert(source.attribute_point(&html), format!(" lang=\"{}\"", self.language)),
            ),
            Some(lang) => match (lang.value, lang.value_span) {
                (Some(value), _) if !value.trim().is_empty() => return Vec::new(),
                // lang="" or lang="  "
                (Some(_), Some(span)) => Fix::single(
                    format!("Set lang to \"{}\"", self.language),
                    source.replace(span, self.language.clone()),
                ),
                // bare `lang`
                _ => Fix::single(
                    format!("Set lang to \"{}\"", self.language),
                    source.replace(lang.span, format!("lang=\"{}\"", self.language)),
                ),
            },
        };

        vec![Issue::new(
            self.id(),
            "The <html> element has no lang attribute. Declare the page language.",
            source.range(html.span.clone()),
        )
        .with_wcag("3.1.1")
        .with_fix(fix)]
    }
}
