// SPDX-License-Identifier: PMPL-1.0-or-later
//! Edit model shared by the rules and the resolver.
//!
//! All values here are plain data tied to one text snapshot. The JSON shape
//! matches what the suggestion service sends and receives:
//! `{"start": {"line": 0, "column": 4}, "end": {...}, "newText": "..."}`.

use serde::{Deserialize, Serialize};

/// Zero-based line/column location in a text snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: usize,
    /// Column (0-indexed, in characters from the start of the line)
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Span between two positions; `start` is never after `end` once normalized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Zero-width range at `position`
    pub fn point(position: Position) -> Self {
        Self { start: position, end: position }
    }

    /// Swap the endpoints if they are in reverse document order
    pub fn normalized(self) -> Self {
        if self.end < self.start {
            Self { start: self.end, end: self.start }
        } else {
            self
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Replace `range` with `new_text`; an insertion uses a zero-width range
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextEdit {
    #[serde(flatten)]
    pub range: Range,
    #[serde(rename = "newText")]
    pub new_text: String,
}

impl TextEdit {
    pub fn replace(range: Range, new_text: impl Into<String>) -> Self {
        Self { range, new_text: new_text.into() }
    }

    pub fn insert(at: Position, new_text: impl Into<String>) -> Self {
        Self::replace(Range::point(at), new_text)
    }

    pub fn delete(range: Range) -> Self {
        Self::replace(range, String::new())
    }
}

/// A named group of edits that must be applied together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    /// Short action title, e.g. "Add alt text"
    pub title: String,
    /// Mutually non-overlapping edits
    pub edits: Vec<TextEdit>,
    /// Conflict priority; higher wins when fixes in a batch intersect.
    /// Stamped by the rule runner from the producing rule.
    #[serde(default)]
    pub priority: u8,
}

impl Fix {
    pub fn new(title: impl Into<String>, edits: Vec<TextEdit>) -> Self {
        Self { title: title.into(), edits, priority: 0 }
    }

    /// Fix consisting of a single edit
    pub fn single(title: impl Into<String>, edit: TextEdit) -> Self {
        Self::new(title, vec![edit])
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_document_order() {
        assert!(Position::new(0, 9) < Position::new(1, 0));
        assert!(Position::new(2, 3) < Position::new(2, 4));
        assert_eq!(Position::new(4, 1).to_string(), "5:2");
    }

    #[test]
    fn test_range_normalized() {
        let reversed = Range::new(Position::new(3, 0), Position::new(1, 5));
        let range = reversed.normalized();
        assert_eq!(range.start, Position::new(1, 5));
        assert_eq!(range.end, Position::new(3, 0));
        assert_eq!(range.normalized(), range);
    }

    #[test]
    fn test_edit_wire_shape() {
        let edit = TextEdit::insert(Position::new(0, 20), " alt=\"TODO: describe\"");
        let json = serde_json::to_value(&edit).expect("serializes");
        assert_eq!(json["start"]["line"], 0);
        assert_eq!(json["start"]["column"], 20);
        assert_eq!(json["end"]["column"], 20);
        assert_eq!(json["newText"], " alt=\"TODO: describe\"");

        let back: TextEdit = serde_json::from_value(json).expect("deserializes");
        assert_eq!(back, edit);
    }

    #[test]
    fn test_fix_priority_defaults_on_wire() {
        let fix: Fix = serde_json::from_str(r#"{"title": "Rename", "edits": []}"#).expect("valid fix");
        assert_eq!(fix.priority, 0);
        assert!(fix.edits.is_empty());
    }
}
