// SPDX-License-Identifier: PMPL-1.0-or-later
//! Applies batches of edits to a document without offset drift.
//!
//! Every edit is clamped to the snapshot it is applied to, then the batch is
//! applied back to front: descending by start, so text before an edit point
//! is never touched by an edit already applied.
//!
//! Intersecting edits are settled by an [`OverlapPolicy`]. The default,
//! `Priority`, accepts whole fixes greedily by priority and rejects any fix
//! that would intersect one already accepted. `LastWins` applies everything
//! and lets the sort order decide the content of an intersection.

use crate::edit::{Fix, Range, TextEdit};
use crate::issue::Issue;
use crate::position::{floor_char_boundary, LineEndings, LineIndex};
use serde::{Deserialize, Serialize};
use std::ops::Range as Span;
use tracing::debug;

/// A mutable text buffer edits can be applied to
pub trait Document {
    fn text(&self) -> &str;

    /// Replace the bytes in `span` with `new_text`
    fn replace(&mut self, span: Span<usize>, new_text: &str);
}

impl Document for String {
    fn text(&self) -> &str {
        self.as_str()
    }

    fn replace(&mut self, span: Span<usize>, new_text: &str) {
        self.replace_range(span, new_text);
    }
}

/// How intersecting edits in one batch are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapPolicy {
    /// Higher-priority fixes win; a losing fix is dropped as a whole
    #[default]
    Priority,
    /// Apply everything in sort order; the last edit applied wins
    LastWins,
}

impl std::str::FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "priority" => Ok(OverlapPolicy::Priority),
            "last-wins" | "lastwins" => Ok(OverlapPolicy::LastWins),
            other => Err(format!("Unknown overlap policy: {}", other)),
        }
    }
}

/// A fix that was dropped because it intersects an accepted one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Title of the rejected fix
    pub title: String,
    /// Title of the accepted fix it intersects
    pub conflicts_with: String,
}

/// Outcome of applying a batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Number of edits written to the document
    pub applied: usize,
    /// Identical edits dropped because an equal edit was already accepted
    pub duplicates: usize,
    pub conflicts: Vec<Conflict>,
}

#[derive(Debug, Clone)]
struct PlannedEdit {
    /// Clamped, normalized edit
    edit: TextEdit,
    span: Span<usize>,
    /// Position of the owning fix in acceptance order
    accepted: usize,
    fix: usize,
}

/// A batch of edits, clamped, filtered and sorted, ready to apply
#[derive(Debug, Clone, Default)]
pub struct Plan {
    edits: Vec<PlannedEdit>,
    titles: Vec<String>,
    duplicates: usize,
    conflicts: Vec<Conflict>,
}

impl Plan {
    /// Edits in application order (back to front)
    pub fn edits(&self) -> impl Iterator<Item = &TextEdit> {
        self.edits.iter().map(|p| &p.edit)
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Titles of the fixes that will be applied, in batch order
    pub fn accepted_titles(&self) -> Vec<&str> {
        let mut fixes: Vec<usize> = self.edits.iter().map(|p| p.fix).collect();
        fixes.sort_unstable();
        fixes.dedup();
        fixes.into_iter().map(|i| self.titles[i].as_str()).collect()
    }

    /// Apply to `doc`, which must hold the snapshot this plan was built from
    pub fn apply_to<D: Document + ?Sized>(&self, doc: &mut D) -> Resolution {
        for planned in &self.edits {
            // Re-clamp: under LastWins an earlier edit may have shortened the text
            let text = doc.text();
            let start = floor_char_boundary(text, planned.span.start);
            let end = floor_char_boundary(text, planned.span.end).max(start);
            doc.replace(start..end, &planned.edit.new_text);
        }
        Resolution {
            applied: self.edits.len(),
            duplicates: self.duplicates,
            conflicts: self.conflicts.clone(),
        }
    }

    /// Render the result of applying this plan to `text` without mutating it
    pub fn preview(&self, text: &str) -> String {
        let mut doc = text.to_string();
        self.apply_to(&mut doc);
        doc
    }
}

fn intersects(a: &Span<usize>, b: &Span<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Applies fixes and loose edits to documents
#[derive(Debug, Clone, Copy, Default)]
pub struct EditResolver {
    pub policy: OverlapPolicy,
    pub line_endings: LineEndings,
}

impl EditResolver {
    pub fn new(policy: OverlapPolicy, line_endings: LineEndings) -> Self {
        Self { policy, line_endings }
    }

    /// Build an application plan for `fixes` against `text`
    pub fn plan<'f>(&self, text: &str, fixes: impl IntoIterator<Item = &'f Fix>) -> Plan {
        let index = LineIndex::new(text, self.line_endings);
        let fixes: Vec<&Fix> = fixes.into_iter().collect();

        let mut order: Vec<usize> = (0..fixes.len()).collect();
        if self.policy == OverlapPolicy::Priority {
            // Stable sort keeps batch order among equal priorities
            order.sort_by_key(|&i| std::cmp::Reverse(fixes[i].priority));
        }

        let mut plan = Plan {
            titles: fixes.iter().map(|f| f.title.clone()).collect(),
            ..Plan::default()
        };

        for (accepted, &fix_index) in order.iter().enumerate() {
            let fix = fixes[fix_index];
            let mut candidates: Vec<PlannedEdit> = Vec::with_capacity(fix.edits.len());
            let mut duplicates = 0;

            for edit in &fix.edits {
                let range = edit.range.normalized();
                let span = index.position_to_offset(range.start)..index.position_to_offset(range.end);
                let clamped = TextEdit::replace(
                    Range::new(index.offset_to_position(span.start), index.offset_to_position(span.end)),
                    edit.new_text.clone(),
                );
                let duplicate = plan
                    .edits
                    .iter()
                    .chain(candidates.iter())
                    .any(|p| p.span == span && p.edit.new_text == clamped.new_text);
                if duplicate {
                    duplicates += 1;
                    continue;
                }
                candidates.push(PlannedEdit { edit: clamped, span, accepted, fix: fix_index });
            }

            if self.policy == OverlapPolicy::Priority {
                let blocker = candidates
                    .iter()
                    .find_map(|c| plan.edits.iter().find(|p| intersects(&p.span, &c.span)));
                if let Some(blocker) = blocker {
                    debug!(fix = %fix.title, blocked_by = %fixes[blocker.fix].title, "fix rejected");
                    plan.conflicts.push(Conflict {
                        title: fix.title.clone(),
                        conflicts_with: fixes[blocker.fix].title.clone(),
                    });
                    continue;
                }
            }

            plan.duplicates += duplicates;
            plan.edits.extend(candidates);
        }

        // Back to front; at the same point, later-accepted edits go first so
        // earlier-accepted text ends up first in the document
        plan.edits.sort_by(|a, b| {
            b.span
                .start
                .cmp(&a.span.start)
                .then(b.span.end.cmp(&a.span.end))
                .then(b.accepted.cmp(&a.accepted))
        });

        debug!(
            edits = plan.edits.len(),
            duplicates = plan.duplicates,
            conflicts = plan.conflicts.len(),
            "edit plan built"
        );
        plan
    }

    /// Apply one fix atomically
    pub fn apply_fix<D: Document + ?Sized>(&self, doc: &mut D, fix: &Fix) -> Resolution {
        self.apply_fixes(doc, [fix])
    }

    /// Apply a batch of fixes in one pass
    pub fn apply_fixes<'f, D: Document + ?Sized>(
        &self,
        doc: &mut D,
        fixes: impl IntoIterator<Item = &'f Fix>,
    ) -> Resolution {
        let plan = self.plan(doc.text(), fixes);
        plan.apply_to(doc)
    }

    /// Apply loose edits, each treated as its own single-edit fix
    pub fn apply_edits<D: Document + ?Sized>(&self, doc: &mut D, edits: &[TextEdit]) -> Resolution {
        let fixes: Vec<Fix> = edits
            .iter()
            .enumerate()
            .map(|(i, edit)| Fix::single(format!("Edit {}", i + 1), edit.clone()))
            .collect();
        self.apply_fixes(doc, &fixes)
    }

    /// Apply the fix of every fixable issue
    pub fn fix_all<D: Document + ?Sized>(&self, doc: &mut D, issues: &[Issue]) -> Resolution {
        self.apply_fixes(doc, issues.iter().filter_map(|i| i.fix.as_ref()))
    }
}

/// Clamp edits produced against an older snapshot (or by another process)
/// to the bounds of `text`
pub fn revalidate(text: &str, edits: &[TextEdit], endings: LineEndings) -> Vec<TextEdit> {
    let index = LineIndex::new(text, endings);
    edits
        .iter()
        .map(|edit| {
            let range = edit.range.normalized();
            TextEdit::replace(
                Range::new(index.clamp(range.start), index.clamp(range.end)),
                edit.new_text.clone(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::Position;

    fn at(column: usize) -> Position {
        Position::new(0, column)
    }

    fn replace(start: usize, end: usize, text: &str) -> TextEdit {
        TextEdit::replace(Range::new(at(start), at(end)), text)
    }

    #[test]
    fn test_applies_bottom_up() {
        let text = "l0\nl1\nline two\nl3\nl4\nline five here\n";
        let edits = vec![
            TextEdit::insert(Position::new(5, 10), "<5>"),
            TextEdit::insert(Position::new(2, 3), "<2>"),
        ];
        let fixes: Vec<Fix> = edits.iter().map(|e| Fix::single("e", e.clone())).collect();

        let resolver = EditResolver::default();
        let plan = resolver.plan(text, &fixes);
        let lines: Vec<usize> = plan.edits().map(|e| e.range.start.line).collect();
        assert_eq!(lines, vec![5, 2]);

        let mut doc = text.to_string();
        let resolution = resolver.apply_edits(&mut doc, &edits);
        assert_eq!(resolution.applied, 2);
        assert_eq!(doc, "l0\nl1\nlin<2>e two\nl3\nl4\nline five <5>here\n");
    }

    #[test]
    fn test_stale_positions_are_clamped() {
        let mut doc = String::from("ab\ncd");
        EditResolver::default().apply_edits(
            &mut doc,
            &[
                TextEdit::insert(Position::new(99, 0), "!"),
                TextEdit::insert(Position::new(0, 50), "?"),
            ],
        );
        assert_eq!(doc, "ab?\ncd!");
    }

    #[test]
    fn test_reversed_range_is_normalized() {
        let mut doc = String::from("0123456789");
        EditResolver::default().apply_edits(&mut doc, &[replace(6, 2, "-")]);
        assert_eq!(doc, "01-6789");
    }

    #[test]
    fn test_identical_edits_are_applied_once() {
        let mut doc = String::from(r#"<a href="/"><img src="a.png"></a>"#);
        let edit = TextEdit::insert(at(28), " alt=\"x\"");
        let fixes = vec![Fix::single("Add alt text", edit.clone()), Fix::single("Add alt text to linked image", edit)];
        let resolution = EditResolver::default().apply_fixes(&mut doc, &fixes);
        assert_eq!(resolution.applied, 1);
        assert_eq!(resolution.duplicates, 1);
        assert!(resolution.conflicts.is_empty());
        assert_eq!(doc, r#"<a href="/"><img src="a.png" alt="x"></a>"#);
    }

    #[test]
    fn test_same_point_insertions_keep_batch_order() {
        let mut doc = String::from("ab");
        let resolution = EditResolver::default().apply_edits(
            &mut doc,
            &[TextEdit::insert(at(1), "X"), TextEdit::insert(at(1), "Y")],
        );
        assert!(resolution.conflicts.is_empty());
        assert_eq!(doc, "aXYb");
    }

    #[test]
    fn test_priority_beats_batch_order() {
        let text = "0123456789";
        let low = Fix::single("insert", TextEdit::insert(at(3), "I")).with_priority(10);
        let high = Fix::single("rename", replace(2, 5, "R")).with_priority(30);

        let mut doc = text.to_string();
        let resolution = EditResolver::default().apply_fixes(&mut doc, [&low, &high]);
        assert_eq!(doc, "01R56789");
        assert_eq!(
            resolution.conflicts,
            vec![Conflict { title: "insert".into(), conflicts_with: "rename".into() }]
        );
    }

    #[test]
    fn test_conflicting_fix_is_rejected_whole() {
        let text = "0123456789";
        let first = Fix::single("first", replace(4, 6, "A"));
        let second = Fix::new("second", vec![replace(0, 1, "B"), replace(5, 8, "C")]);

        let resolver = EditResolver::default();
        let plan = resolver.plan(text, [&first, &second]);
        assert_eq!(plan.accepted_titles(), vec!["first"]);
        assert_eq!(plan.preview(text), "0123A6789");
        assert_eq!(plan.conflicts().len(), 1);
    }

    #[test]
    fn test_last_wins_applies_everything() {
        let text = "0123456789";
        let a = Fix::single("a", replace(2, 6, ""));
        let b = Fix::single("b", replace(4, 8, "X"));

        let priority = EditResolver::default().plan(text, [&a, &b]);
        assert_eq!(priority.preview(text), "016789");

        let resolver = EditResolver::new(OverlapPolicy::LastWins, LineEndings::Lf);
        let mut doc = text.to_string();
        let resolution = resolver.apply_fixes(&mut doc, [&a, &b]);
        assert_eq!(resolution.applied, 2);
        assert!(resolution.conflicts.is_empty());
        assert_eq!(doc, "019");
    }

    #[test]
    fn test_adjacent_edits_do_not_conflict() {
        let mut doc = String::from("abcdef");
        let resolution = EditResolver::default().apply_edits(
            &mut doc,
            &[replace(0, 2, "X"), replace(2, 4, "Y"), TextEdit::insert(at(4), "!")],
        );
        assert!(resolution.conflicts.is_empty());
        assert_eq!(doc, "XY!ef");
    }

    #[test]
    fn test_preview_does_not_mutate() {
        let text = String::from("<img>");
        let fix = Fix::single("Add alt text", TextEdit::insert(at(4), " alt=\"\""));
        let plan = EditResolver::default().plan(&text, [&fix]);
        assert_eq!(plan.preview(&text), "<img alt=\"\">");
        assert_eq!(text, "<img>");
    }

    #[test]
    fn test_multibyte_columns() {
        let mut doc = String::from("é<img>");
        EditResolver::default().apply_edits(&mut doc, &[TextEdit::insert(at(5), " alt=\"\"")]);
        assert_eq!(doc, "é<img alt=\"\">");
    }

    #[test]
    fn test_revalidate_clamps() {
        let edits = revalidate(
            "ab\ncd",
            &[replace(9, 1, "x"), TextEdit::insert(Position::new(7, 7), "y")],
            LineEndings::Lf,
        );
        assert_eq!(edits[0].range, Range::new(at(1), at(2)));
        assert_eq!(edits[1].range, Range::point(Position::new(1, 2)));
    }

    #[test]
    fn test_crlf_with_universal_endings() {
        let mut doc = String::from("<p>\r\n<img>");
        let resolver = EditResolver::new(OverlapPolicy::Priority, LineEndings::Universal);
        resolver.apply_edits(&mut doc, &[TextEdit::insert(Position::new(1, 4), " alt=\"\"")]);
        assert_eq!(doc, "<p>\r\n<img alt=\"\">");
    }
}
