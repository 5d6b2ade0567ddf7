//! Position tracking for CSDL nodes
//!
//! Stores the source location (line/column) of parsed nodes so semantic
//! errors can point back at the declaring element.

use super::DocumentId;

/// A position in source code (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize))]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Where a node was declared: the document plus the start position of its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize))]
pub struct Location {
    pub document: DocumentId,
    pub position: Position,
}

impl Location {
    pub fn new(document: DocumentId, position: Position) -> Self {
        Self { document, position }
    }

    /// Same position, re-homed to another document.
    ///
    /// Readers produce locations for a document before the model assigns it an id.
    pub fn in_document(self, document: DocumentId) -> Self {
        Self { document, ..self }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 1-indexed for humans
        write!(
            f,
            "{}:{}:{}",
            self.document,
            self.position.line + 1,
            self.position.column + 1
        )
    }
}

/// Converts byte offsets into line/column positions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset at which each line starts.
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    /// Line/column of a byte offset. Offsets past the end clamp to the last line.
    pub fn position(&self, offset: usize) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        Position::new(line, offset - self.line_starts[line])
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
