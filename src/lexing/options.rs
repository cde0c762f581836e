//!
//! Lexer configuration, and the hooks observers can install.
//!

use std::rc::Rc;

use super::{LexError, Token};

///
/// How [crate::lexing::Lexer::advance] produces tokens.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    ///
    /// Run the registered handlers.
    ///
    #[default]
    Token,

    ///
    /// Emit every character as its own `"char"` token.
    ///
    Character,
}

type Callback<T> = Box<dyn FnMut(&T)>;

///
/// Optional callbacks notified as the lexer works.
///
/// None of them change what the lexer produces, with one
/// exception: when `on_error` is installed, errors are
/// handed to it instead of being returned.
///
#[derive(Default)]
pub struct Hooks {
    pub(crate) on_token: Option<Callback<Token>>,
    pub(crate) on_scan: Option<Callback<Token>>,
    pub(crate) on_push: Option<Callback<Token>>,
    pub(crate) on_error: Option<Callback<LexError>>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Called for every token the lexer creates.
    ///
    pub fn on_token(mut self, f: impl FnMut(&Token) + 'static) -> Self {
        self.on_token = Some(Box::new(f));
        self
    }

    ///
    /// Called for every token recognised by a pattern.
    ///
    pub fn on_scan(mut self, f: impl FnMut(&Token) + 'static) -> Self {
        self.on_scan = Some(Box::new(f));
        self
    }

    ///
    /// Called for every token pushed onto the token list.
    ///
    pub fn on_push(mut self, f: impl FnMut(&Token) + 'static) -> Self {
        self.on_push = Some(Box::new(f));
        self
    }

    ///
    /// Receives errors instead of them being returned.
    ///
    pub fn on_error(mut self, f: impl FnMut(&LexError) + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub(crate) fn token(&mut self, token: &Token) {
        if let Some(f) = self.on_token.as_mut() {
            f(token);
        }
    }

    pub(crate) fn scan(&mut self, token: &Token) {
        if let Some(f) = self.on_scan.as_mut() {
            f(token);
        }
    }

    pub(crate) fn push(&mut self, token: &Token) {
        if let Some(f) = self.on_push.as_mut() {
            f(token);
        }
    }

    ///
    /// Hands `err` to `on_error`, giving it back if
    /// nobody is listening.
    ///
    pub(crate) fn error(&mut self, err: LexError) -> Result<(), LexError> {
        match self.on_error.as_mut() {
            Some(f) => {
                log::warn!("lex error reported to observer: {err}");
                f(&err);
                Ok(())
            }
            None => Err(err),
        }
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("on_token", &self.on_token.is_some())
            .field("on_scan", &self.on_scan.is_some())
            .field("on_push", &self.on_push.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

///
/// Options given to a [crate::lexing::Lexer] when it is made.
///
#[derive(Debug, Default)]
pub struct Options {
    pub mode: Mode,

    ///
    /// Attached to every emitted location.
    ///
    pub source: Option<Rc<str>>,

    pub hooks: Hooks,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn source(mut self, source: impl Into<Rc<str>>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    ///
    /// The same mode and source, without any hooks.
    ///
    pub(crate) fn fork(&self) -> Self {
        Self {
            mode: self.mode,
            source: self.source.clone(),
            hooks: Hooks::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use crate::lexing::LexError;

    use super::{Hooks, Mode, Options};

    #[test]
    fn unobserved_errors_are_returned() {
        let mut hooks = Hooks::new();
        assert!(hooks.error(LexError::Lookahead).is_err());
    }

    #[test]
    fn observed_errors_are_swallowed() {
        let seen = Rc::new(RefCell::new(vec![]));
        let sink = seen.clone();
        let mut hooks = Hooks::new().on_error(move |err| sink.borrow_mut().push(err.to_string()));

        assert!(hooks.error(LexError::Lookbehind).is_ok());
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn forking_drops_hooks() {
        let options = Options::new()
            .mode(Mode::Character)
            .source("a.txt")
            .hooks(Hooks::new().on_push(|_| {}));

        let forked = options.fork();
        assert_eq!(forked.mode, Mode::Character);
        assert_eq!(forked.source.as_deref(), Some("a.txt"));
        assert!(forked.hooks.on_push.is_none());
    }
}
