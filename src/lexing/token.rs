//!
//! Lexical tokens.
//!

use crate::common::{Located, Location};

use super::Captures;

///
/// The unit of recognised input: a type tag
/// plus the text it stands for.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    ///
    /// The type of this token, e.g. `"text"` or `"brace.open"`.
    ///
    /// Left empty by handlers who want the engine to fill in
    /// the name they were registered under.
    ///
    pub kind: String,

    pub value: Option<String>,

    ///
    /// The raw match this token was built from, if any.
    ///
    pub captures: Option<Captures>,

    pub loc: Option<Location>,
}

impl Token {
    pub fn new(kind: impl Into<String>, value: impl Into<Option<String>>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
            captures: None,
            loc: None,
        }
    }

    ///
    /// A token of no particular type, which will be named
    /// after the handler that returns it.
    ///
    pub fn untyped(value: impl Into<Option<String>>) -> Self {
        Self::new(String::new(), value)
    }

    ///
    /// Builds a token from a pattern match.
    ///
    pub fn from_captures(kind: impl Into<String>, captures: Captures) -> Self {
        Self {
            kind: kind.into(),
            value: Some(captures.value().to_string()),
            captures: Some(captures),
            loc: None,
        }
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    ///
    /// Text used to point at this token in diagnostics:
    /// its full match, else its value, else its type.
    ///
    pub fn describe(&self) -> &str {
        self.captures
            .as_ref()
            .map(Captures::full)
            .or(self.value.as_deref())
            .unwrap_or(self.kind.as_str())
    }

    pub(crate) fn with_loc(mut self, loc: Location) -> Self {
        self.loc = Some(loc);
        self
    }
}

impl Located for Token {
    fn loc(&self) -> Option<&Location> {
        self.loc.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::lexing::{Captures, Pattern};

    use super::Token;

    #[test]
    fn describe() {
        let star = Token::new("star", "*".to_string());
        assert_eq!(star.describe(), "*");

        let bare = Token::new("eos", None::<String>);
        assert_eq!(bare.describe(), "eos");

        let pattern = Pattern::new(r"^\{(a)").unwrap();
        let input: Rc<str> = "{a".into();
        let caps = Captures::read(pattern.regex(), &input, 0, input.clone()).unwrap();
        let open = Token::from_captures("brace.open", caps);
        assert_eq!(open.value(), Some("a"));
        assert_eq!(open.describe(), "{a");
    }

    #[test]
    fn untyped() {
        let token = Token::untyped("x".to_string());
        assert!(token.kind.is_empty());
        assert!(!token.is("x"));
    }
}
