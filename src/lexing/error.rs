//!
//! Errors that can occur whilst lexing.
//!

use thiserror::Error;

use crate::common::Position;

///
/// Errors that can occur during lexing.
///
#[derive(Debug, Error)]
pub enum LexError {
    ///
    /// A pattern which is not anchored to the start
    /// of the input with `^`.
    ///
    #[error("expected regex to start with \"^\": `{pattern}`")]
    Configuration { pattern: String },

    ///
    /// A pattern which matched nothing, which would
    /// loop forever if allowed.
    ///
    #[error("regex should not match an empty string: `{pattern}`")]
    EmptyMatch { pattern: String },

    ///
    /// No handler registered under this type.
    ///
    #[error("no handler registered for type \"{kind}\"")]
    Lookup { kind: String },

    ///
    /// None of the handlers recognised the input.
    ///
    #[error("unmatched input: \"{remaining}\"\n\tat {position}")]
    UnmatchedInput {
        remaining: String,
        position: Position,
    },

    ///
    /// An open construct (brace, bracket...) was
    /// never closed before the end of input.
    ///
    #[error("unclosed: \"{token}\"\n\tat {position}")]
    Unclosed { token: String, position: Position },

    ///
    /// Attempted to consume past the end of the input,
    /// or through the middle of a character.
    ///
    #[error("cannot consume {len} bytes from \"{remaining}\"")]
    OutOfBounds { len: usize, remaining: String },

    #[error("invalid regex: {0}")]
    Regex(#[from] regex::Error),

    #[error("expected lookahead to be at least 1")]
    Lookahead,

    #[error("expected lookbehind to be at least 1")]
    Lookbehind,

    ///
    /// Raised by user handlers and transforms.
    ///
    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

///
/// Convenience type for lexer results.
///
pub type LexResult<T> = Result<T, LexError>;

///
/// Shortens the input shown in [LexError::UnmatchedInput]
/// to something readable.
///
pub(crate) fn excerpt(remaining: &str) -> String {
    const MAX: usize = 40;

    match remaining.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &remaining[..cut]),
        None => remaining.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use crate::common::Position;

    use super::{excerpt, LexError};

    #[test]
    fn short_excerpts_are_untouched() {
        assert_eq!(excerpt("foo/*"), "foo/*");
        assert_eq!(excerpt(""), "");
    }

    #[test]
    fn long_excerpts_are_cut() {
        let long = "x".repeat(100);
        let cut = excerpt(&long);
        assert_eq!(cut.len(), 43);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn messages() {
        let err = LexError::UnmatchedInput {
            remaining: "foo".to_string(),
            position: Position::default(),
        };
        assert_eq!(err.to_string(), "unmatched input: \"foo\"\n\tat 1:1");

        let err = LexError::Unclosed {
            token: "{".to_string(),
            position: Position::default(),
        };
        assert!(err.to_string().starts_with("unclosed: \"{\""));

        let err: LexError = anyhow::anyhow!("expected token.value to be \"foo\"").into();
        assert_eq!(err.to_string(), "expected token.value to be \"foo\"");
    }
}
