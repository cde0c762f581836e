//!
//! Things that help trace errors and tokens: [Position] and [Location].
//!

use std::{fmt::Formatter, ops::Range, rc::Rc};

///
/// A snapshot of the cursor in the original input.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    ///
    /// Byte offset into the original input.
    ///
    pub index: usize,

    ///
    /// 1-based column, counted in characters.
    ///
    pub column: usize,

    ///
    /// 1-based line.
    ///
    pub line: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            index: 0,
            column: 1,
            line: 1,
        }
    }
}

impl Position {
    ///
    /// Returns the position reached after `value` was consumed
    /// from this position, `len` being the number of input bytes
    /// it stood for.
    ///
    pub fn advanced(self, value: &str, len: usize) -> Position {
        let lines = value.matches('\n').count();

        let column = match value.rfind('\n') {
            // Everything after the last newline, plus one.
            Some(last) => value[last + 1..].chars().count() + 1,
            None => self.column + value.chars().count(),
        };

        Position {
            index: self.index + len,
            column,
            line: self.line + lines,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

///
/// Represents where a token came from in the input.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    ///
    /// Position before the token was consumed.
    ///
    pub start: Position,

    ///
    /// Position after the token was consumed.
    ///
    pub end: Position,

    ///
    /// Where the input came from (a file path, for example).
    ///
    pub source: Option<Rc<str>>,
}

impl Location {
    pub fn new(start: Position, end: Position, source: Option<Rc<str>>) -> Self {
        Self { start, end, source }
    }

    ///
    /// Return the start and end bounds as a Rust [Range].
    ///
    pub fn range(&self) -> Range<usize> {
        self.start.index..self.end.index
    }

    ///
    /// Returns the length of this location in bytes,
    /// zero if `end` comes before `start`.
    ///
    pub fn len(&self) -> usize {
        self.end.index.saturating_sub(self.start.index)
    }

    ///
    /// Returns whether this [Location] covers nothing.
    ///
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    ///
    /// Use this [Location] as a start, taking the range between its
    /// start and the end of the last of the passed in locations.
    ///
    pub fn combine(self, others: impl IntoIterator<Item = Location>) -> Location {
        match others.into_iter().last() {
            Some(Location { end, .. }) => Location { end, ..self },
            None => self,
        }
    }
}

///
/// Shown as `${SOURCE}:${LINE}:${COLUMN}`, the source
/// being omitted when unknown.
///
impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{source}:{}", self.start),
            None => write!(f, "{}", self.start),
        }
    }
}

///
/// Returns the location attached to this object, if any.
///
pub trait Located {
    fn loc(&self) -> Option<&Location>;
}
