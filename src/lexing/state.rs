//!
//! The cursor: everything a lex pass mutates.
//!

use std::{collections::VecDeque, rc::Rc};

use crate::common::Position;

use super::Token;

///
/// Mutable scanning state of one lex pass.
///
/// `consumed` followed by [State::string] always spells out
/// `input`, unless a caller consumed with a replacement value.
///
#[derive(Debug, Clone)]
pub struct State {
    input: Rc<str>,

    ///
    /// Byte offset of the remaining input.
    ///
    offset: usize,

    pub(crate) consumed: String,

    ///
    /// Tokens emitted so far.
    ///
    pub tokens: Vec<Token>,

    ///
    /// Tokens produced ahead of consumption.
    ///
    pub queue: VecDeque<Token>,

    ///
    /// Currently open nested constructs, innermost last.
    ///
    pub stack: Vec<Token>,

    ///
    /// Scratch strings for handlers building output.
    ///
    pub stash: Vec<String>,

    ///
    /// Output being built by handlers, one entry per level.
    ///
    pub output: Vec<String>,

    ///
    /// Indentation strings, innermost last.
    ///
    pub indent: Vec<String>,

    pub(crate) loc: Position,
}

impl State {
    pub fn new(input: impl Into<Rc<str>>) -> Self {
        Self {
            input: input.into(),
            offset: 0,
            consumed: String::new(),
            tokens: vec![],
            queue: VecDeque::new(),
            stack: vec![],
            stash: vec![String::new()],
            output: vec![String::new()],
            indent: vec![String::new()],
            loc: Position::default(),
        }
    }

    ///
    /// The unmodified input.
    ///
    pub fn input(&self) -> &str {
        &self.input
    }

    pub(crate) fn shared_input(&self) -> Rc<str> {
        self.input.clone()
    }

    ///
    /// The input yet to be consumed.
    ///
    pub fn string(&self) -> &str {
        &self.input[self.offset..]
    }

    ///
    /// The input already consumed.
    ///
    pub fn consumed(&self) -> &str {
        &self.consumed
    }

    ///
    /// Current position of the cursor.
    ///
    pub fn loc(&self) -> Position {
        self.loc
    }

    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    ///
    /// Moves the cursor `len` bytes forward, returning what was
    /// skipped over, or `None` if `len` does not land on a character
    /// boundary of the remaining input.
    ///
    pub(crate) fn take(&mut self, len: usize) -> Option<&str> {
        let start = self.offset;
        let end = start.checked_add(len)?;
        self.input.get(start..end)?;

        self.offset = end;
        Some(&self.input[start..end])
    }
}

#[cfg(test)]
mod tests {
    use super::State;

    #[test]
    fn take() {
        let mut state = State::new("abcdefghi");
        assert_eq!(state.take(1), Some("a"));
        assert_eq!(state.string(), "bcdefghi");
        assert_eq!(state.take(3), Some("bcd"));
        assert_eq!(state.string(), "efghi");

        assert_eq!(state.take(10), None);
        assert_eq!(state.string(), "efghi");
    }

    #[test]
    fn take_respects_char_boundaries() {
        let mut state = State::new("é!");
        assert_eq!(state.take(1), None);
        assert_eq!(state.take(2), Some("é"));
        assert_eq!(state.string(), "!");
    }

    #[test]
    fn fresh_state() {
        let state = State::new("foo");
        assert_eq!(state.input(), "foo");
        assert_eq!(state.string(), "foo");
        assert_eq!(state.consumed(), "");
        assert_eq!(state.stash, [""]);
        assert_eq!(state.output, [""]);
        assert_eq!(state.indent, [""]);
        assert!(state.tokens.is_empty() && state.queue.is_empty() && state.stack.is_empty());
        assert_eq!(state.loc().line, 1);
    }
}
