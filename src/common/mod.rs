//!
//! Common utilities shared by the lexing machinery.
//!

pub mod location;

pub use location::*;
