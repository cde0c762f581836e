//!
//! ## Snaplex
//!
//! A pluggable lexer: callers register a handler for each type
//! of token, usually an anchored regular expression, and the
//! lexer tries them in order against the remaining input.
//!
//! ```
//! use snaplex::Lexer;
//!
//! let mut lexer = Lexer::new("");
//! lexer
//!     .capture("slash", r"^/")?
//!     .capture("text", r"^\w+")?;
//!
//! let tokens = lexer.tokenize("a/b/c")?;
//! let values: Vec<_> = tokens.iter().filter_map(|t| t.value()).collect();
//! assert_eq!(values, ["a", "/", "b", "/", "c"]);
//! # Ok::<(), snaplex::LexError>(())
//! ```
//!

pub mod common;
pub mod lexing;

pub use common::{Located, Location, Position};
pub use lexing::{
    Captures, Handler, Hooks, LexError, LexResult, Lexer, Mode, Options, Pattern, Registry, State,
    ToPattern, Token,
};
