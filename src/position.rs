// SPDX-License-Identifier: PMPL-1.0-or-later
//! Offset <-> line/column mapping.
//!
//! Offsets are byte offsets into a `&str`; columns count characters from the
//! start of the line. A [`LineIndex`] is built once per snapshot so every
//! lookup after that is a binary search plus a walk over a single line.

use crate::edit::Position;
use serde::{Deserialize, Serialize};

/// Which characters end a line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEndings {
    /// Only `\n` ends a line; a `\r` is counted as an ordinary column
    #[default]
    Lf,
    /// `\n`, `\r\n` and a lone `\r` all end a line
    Universal,
}

/// Precomputed line table for one text snapshot
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    /// Byte offset where each line starts
    starts: Vec<usize>,
    /// Byte offset where each line's content ends (before its line break)
    ends: Vec<usize>,
    /// Lines holding only ASCII, where columns equal byte distances
    ascii: Vec<bool>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str, endings: LineEndings) -> Self {
        let bytes = text.as_bytes();
        let mut starts = vec![0];
        let mut ends = Vec::new();
        let mut ascii = Vec::new();
        let mut line_ascii = true;
        let mut i = 0;

        while i < bytes.len() {
            match (bytes[i], endings) {
                (b'\n', _) => {
                    ends.push(i);
                    ascii.push(line_ascii);
                    line_ascii = true;
                    starts.push(i + 1);
                }
                (b'\r', LineEndings::Universal) => {
                    ends.push(i);
                    ascii.push(line_ascii);
                    line_ascii = true;
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    starts.push(i + 1);
                }
                (byte, _) => line_ascii &= byte.is_ascii(),
            }
            i += 1;
        }
        ends.push(text.len());
        ascii.push(line_ascii);

        Self {
            text,
            starts,
            ends,
            ascii,
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Number of characters on `line` (excluding its line break)
    pub fn line_len(&self, line: usize) -> usize {
        let line = line.min(self.line_count() - 1);
        self.column_at(line, self.ends[line])
    }

    fn column_at(&self, line: usize, offset: usize) -> usize {
        let start = self.starts[line];
        if self.ascii[line] {
            offset - start
        } else {
            self.text[start..offset].chars().count()
        }
    }

    /// Map a byte offset to a position; out-of-range offsets clamp
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let offset = floor_char_boundary(self.text, offset);
        let line = self.starts.partition_point(|&start| start <= offset) - 1;
        // An offset inside a CRLF pair maps to the end of the line's content
        let upto = offset.min(self.ends[line]);
        let column = self.column_at(line, upto);
        Position { line, column }
    }

    /// Map a position back to a byte offset. A column past the end of its
    /// line clamps to the line end; a line past the last clamps to the end
    /// of the text.
    pub fn position_to_offset(&self, position: Position) -> usize {
        if position.line >= self.line_count() {
            return self.text.len();
        }
        let line = position.line;
        let start = self.starts[line];
        if self.ascii[line] {
            return (start + position.column).min(self.ends[line]);
        }
        let content = &self.text[start..self.ends[line]];
        match content.char_indices().nth(position.column) {
            Some((idx, _)) => start + idx,
            None => self.ends[line],
        }
    }

    /// Clamp a position to the bounds of this snapshot
    pub fn clamp(&self, position: Position) -> Position {
        self.offset_to_position(self.position_to_offset(position))
    }

    /// Position just past the last character
    pub fn end_position(&self) -> Position {
        self.offset_to_position(self.text.len())
    }
}

/// Convert an offset using `\n`-only line counting
pub fn offset_to_position(text: &str, offset: usize) -> Position {
    LineIndex::new(text, LineEndings::Lf).offset_to_position(offset)
}

/// Convert a position using `\n`-only line counting
pub fn position_to_offset(text: &str, position: Position) -> usize {
    LineIndex::new(text, LineEndings::Lf).position_to_offset(position)
}

/// Largest char boundary at or below `offset`, clamped to the text length
pub(crate) fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_and_end_of_text() {
        let text = "<p>\n  hello\n</p>";
        assert_eq!(offset_to_position(text, 0), Position::new(0, 0));
        assert_eq!(offset_to_position(text, text.len()), Position::new(2, 4));
        assert_eq!(LineIndex::new(text, LineEndings::Lf).end_position(), Position::new(2, 4));
    }

    #[test]
    fn test_offset_after_newline() {
        let text = "Hello\nWorld";
        assert_eq!(offset_to_position(text, 5), Position::new(0, 5));
        assert_eq!(offset_to_position(text, 6), Position::new(1, 0));
        assert_eq!(offset_to_position(text, 8), Position::new(1, 2));
    }

    #[test]
    fn test_offset_clamps() {
        let text = "abc";
        assert_eq!(offset_to_position(text, 999), Position::new(0, 3));
        assert_eq!(offset_to_position("", 5), Position::new(0, 0));
    }

    #[test]
    fn test_lines_are_monotonic() {
        let text = "a\n\nbb\r\nccc\n";
        let index = LineIndex::new(text, LineEndings::Lf);
        let mut last = 0;
        for offset in 0..=text.len() {
            let line = index.offset_to_position(offset).line;
            assert!(line >= last, "line went backwards at offset {}", offset);
            last = line;
        }
    }

    #[test]
    fn test_carriage_return_is_a_column_by_default() {
        let text = "ab\r\ncd";
        assert_eq!(offset_to_position(text, 3), Position::new(0, 3));
        assert_eq!(offset_to_position(text, 4), Position::new(1, 0));
    }

    #[test]
    fn test_universal_line_endings() {
        let text = "ab\r\ncd\ref";
        let index = LineIndex::new(text, LineEndings::Universal);
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.offset_to_position(3), Position::new(0, 2));
        assert_eq!(index.offset_to_position(4), Position::new(1, 0));
        assert_eq!(index.offset_to_position(7), Position::new(2, 0));
        assert_eq!(index.line_len(0), 2);
        assert_eq!(index.position_to_offset(Position::new(0, 10)), 2);
    }

    #[test]
    fn test_columns_count_characters() {
        let text = "é<img>";
        assert_eq!(offset_to_position(text, 2), Position::new(0, 1));
        // Inside the two-byte 'é' snaps back to its start
        assert_eq!(offset_to_position(text, 1), Position::new(0, 0));
        assert_eq!(position_to_offset(text, Position::new(0, 1)), 2);
    }

    #[test]
    fn test_mixed_ascii_and_multibyte_lines() {
        let text = "plain\ncafé <img>\nend";
        let index = LineIndex::new(text, LineEndings::Lf);
        assert_eq!(index.offset_to_position(3), Position::new(0, 3));
        // 'é' is two bytes, so "<img>" starts at byte 12, column 5
        assert_eq!(index.offset_to_position(12), Position::new(1, 5));
        assert_eq!(index.position_to_offset(Position::new(1, 5)), 12);
        assert_eq!(index.line_len(1), 10);
        assert_eq!(index.position_to_offset(Position::new(2, 9)), text.len());
    }

    #[test]
    fn test_position_to_offset_round_trip_and_clamp() {
        let text = "one\ntwo\nthree";
        let index = LineIndex::new(text, LineEndings::Lf);
        for offset in 0..=text.len() {
            assert_eq!(index.position_to_offset(index.offset_to_position(offset)), offset);
        }
        assert_eq!(index.position_to_offset(Position::new(1, 99)), 7);
        assert_eq!(index.position_to_offset(Position::new(42, 0)), text.len());
        assert_eq!(index.clamp(Position::new(42, 42)), Position::new(2, 5));
    }
}
