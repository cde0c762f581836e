//!
//! The process of lexing involves converting [char]s
//! from an input string into lexical tokens, using
//! handlers registered by the caller.
//!

mod error;
mod lexer;
mod options;
mod pattern;
mod registry;
mod state;
mod token;

pub use error::*;
pub use lexer::*;
pub use options::*;
pub use pattern::*;
pub use registry::*;
pub use state::*;
pub use token::*;
