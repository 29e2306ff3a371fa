// SPDX-License-Identifier: PMPL-1.0-or-later
//! Duplicate id rule - WCAG 4.1.1 Parsing
//!
//! Labels, `aria-labelledby` and fragment links all resolve ids, so a
//! repeated id silently points assistive technology at the wrong element.
//! The first occurrence keeps its id; later ones are renamed `id-1`, `id-2`,
//! ... skipping any suffix the document already uses.

use super::markup;
use super::{Rule, SourceText, PRIORITY_RENAME};
use crate::edit::Fix;
use crate::issue::Issue;
use std::collections::{HashMap, HashSet};
use std::ops::Range as Span;

/// Flags every occurrence of an id used more than once
pub struct DuplicateId;

impl Rule for DuplicateId {
    fn id(&self) -> &'static str {
        "duplicate-id"
    }

    fn description(&self) -> &'static str {
        "Checks that id attribute values are unique"
    }

    fn priority(&self) -> u8 {
        PRIORITY_RENAME
    }

    fn check(&self, source: &SourceText<'_>) -> Vec<Issue> {
        let text = source.text();

        // (value, span of the value) in document order
        let occurrences: Vec<(&str, Span<usize>)> = markup::start_tags(text)
            .filter_map(|tag| tag.attr("id"))
            .filter(|attr| !attr.dynamic)
            .filter_map(|attr| Some((attr.value?, attr.value_span?)))
            .filter(|(value, _)| !value.is_empty())
            .collect();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for (value, _) in &occurrences {
            *counts.entry(*value).or_default() += 1;
        }

        let mut taken: HashSet<String> = occurrences.iter().map(|(v, _)| v.to_string()).collect();
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut issues = Vec::new();

        for (value, span) in occurrences {
            let total = counts[value];
            if total < 2 {
                continue;
            }
            let nth = seen.entry(value).or_default();
            *nth += 1;

            if *nth == 1 {
                issues.push(
                    Issue::new(
                        self.id(),
                        format!("id \"{}\" is used {} times; ids must be unique.", value, total),
                        source.range(span),
                    )
                    .with_wcag("4.1.1"),
                );
                continue;
            }

            let mut suffix = *nth - 1;
            let renamed = loop {
                let candidate = format!("{}-{}", value, suffix);
                if taken.insert(candidate.clone()) {
                    break candidate;
                }
                suffix += 1;
            };

            let edit = source.replace(span.clone(), renamed.clone());
            issues.push(
                Issue::new(
                    self.id(),
                    format!("Duplicate id \"{}\"; rename this occurrence to \"{}\".", value, renamed),
                    source.range(span),
                )
                .with_wcag("4.1.1")
                .with_fix(Fix::single(format!("Rename id to \"{}\"", renamed), edit)),
            );
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{apply_all, check};

    fn ids(text: &str) -> Vec<String> {
        markup::start_tags(text)
            .filter_map(|t| t.attr_value("id").map(String::from))
            .collect()
    }

    #[test]
    fn test_three_occurrences() {
        let html = r#"<div id="x"></div><p id="x"></p><span id="x"></span>"#;
        let issues = check(&DuplicateId, html);
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(|i| i.id == "duplicate-id"));
        assert!(issues[0].fix.is_none());
        assert_eq!(issues[1].fix.as_ref().expect("fixable").edits[0].new_text, "x-1");
        assert_eq!(issues[2].fix.as_ref().expect("fixable").edits[0].new_text, "x-2");

        // The reported range is the id value token
        assert_eq!(issues[0].start.column, 9);
        assert_eq!(issues[0].end.column, 10);

        let fixed = apply_all(html, &issues);
        assert_eq!(ids(&fixed), vec!["x", "x-1", "x-2"]);
        assert!(check(&DuplicateId, &fixed).is_empty());
    }

    #[test]
    fn test_expression_ids_are_ignored() {
        let html = r#"<div id={`row-${i}`}></div><div id={`row-${i}`}></div><p id="a" data-x="b > c"></p><p id="a"></p>"#;
        let issues = check(&DuplicateId, html);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[1].fix.as_ref().expect("fixable").edits[0].new_text, "a-1");
    }

    #[test]
    fn test_unique_ids_pass() {
        let html = r#"<div id="a"></div><div id="b"></div><div data-id="a"></div>"#;
        assert!(check(&DuplicateId, html).is_empty());
    }

    #[test]
    fn test_ids_are_case_sensitive() {
        let html = r#"<div id="Main"></div><div id="main"></div>"#;
        assert!(check(&DuplicateId, html).is_empty());
    }

    #[test]
    fn test_rename_skips_existing_suffix() {
        let html = r#"<i id="x"></i><i id="x-1"></i><i id="x"></i>"#;
        let issues = check(&DuplicateId, html);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[1].fix.as_ref().expect("fixable").edits[0].new_text, "x-2");
        let fixed = apply_all(html, &issues);
        assert_eq!(ids(&fixed), vec!["x", "x-1", "x-2"]);
    }

    #[test]
    fn test_groups_are_independent() {
        let html = "<a id='a'></a><b id='b'></b><a id='a'></a><b id='b'></b>";
        let issues = check(&DuplicateId, html);
        assert_eq!(issues.len(), 4);
        let renames: Vec<_> = issues
            .iter()
            .filter_map(|i| i.fix.as_ref())
            .map(|f| f.edits[0].new_text.clone())
            .collect();
        assert_eq!(renames, vec!["a-1", "b-1"]);
    }
}
