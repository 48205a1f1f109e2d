//
// ranges.rs
//
// Source positions and ranges for diagnostics and lookup queries
//

use serde::{Deserialize, Serialize};

/// A zero-based position in a source document (line, character).
/// Uses lexicographic ordering: line first, then character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: i32,
    pub character: i32,
}

impl Position {
    pub fn new(line: i32, character: i32) -> Self {
        Self { line, character }
    }
}

/// A half-open region of a source document, anchored by start and end
/// positions. The `interpolated` sentinel (all components -1) marks nodes
/// that were synthesized programmatically rather than parsed from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Sentinel range for programmatically synthesized nodes.
    pub const INTERPOLATED: Range = Range {
        start: Position { line: -1, character: -1 },
        end: Position { line: -1, character: -1 },
    };

    pub fn new(start_line: i32, start_character: i32, end_line: i32, end_character: i32) -> Self {
        Self {
            start: Position::new(start_line, start_character),
            end: Position::new(end_line, end_character),
        }
    }

    pub fn is_interpolated(&self) -> bool {
        *self == Self::INTERPOLATED
    }

    /// Whether the range includes the given position (inclusive of both ends).
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// Whether this range is strictly inside `other` (used to pick the
    /// innermost function scope at a call site).
    pub fn is_within(&self, other: &Range) -> bool {
        other.start <= self.start && self.end <= other.end
    }
}
