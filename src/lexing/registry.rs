//!
//! The handler registry: which function recognises which token type.
//!

use std::rc::Rc;

use indexmap::IndexMap;

use super::{LexError, LexResult, Lexer, Token};

///
/// A function recognising one type of token at the
/// start of the lexer's remaining input.
///
/// Returns `Ok(None)` when its token is not present.
///
pub type Handler = Rc<dyn Fn(&mut Lexer) -> LexResult<Option<Token>>>;

///
/// Handlers, keyed by token type.
///
/// Registration order is kept, and is the order in which
/// [Lexer::advance] tries them. Cloning is cheap: only the
/// reference counts of the handlers are bumped.
///
#[derive(Clone, Default)]
pub struct Registry {
    handlers: IndexMap<String, Handler>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Registers `handler` under `kind`.
    ///
    /// Re-registering a type replaces its handler but keeps
    /// the position it was first given.
    ///
    pub fn set(&mut self, kind: impl Into<String>, handler: Handler) {
        let kind = kind.into();
        log::debug!("registering handler for \"{kind}\"");
        self.handlers.insert(kind, handler);
    }

    pub fn get(&self, kind: &str) -> LexResult<Handler> {
        self.handlers
            .get(kind)
            .cloned()
            .ok_or_else(|| LexError::Lookup {
                kind: kind.to_string(),
            })
    }

    pub fn has(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }

    ///
    /// The `i`-th registered type, with its handler.
    ///
    pub(crate) fn get_index(&self, i: usize) -> Option<(String, Handler)> {
        self.handlers
            .get_index(i)
            .map(|(kind, handler)| (kind.clone(), handler.clone()))
    }

    ///
    /// Registered types, in trial order.
    ///
    pub fn kinds(&self) -> impl Iterator<Item = &str> + '_ {
        self.handlers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.handlers.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::lexing::{LexError, LexResult, Lexer, Token};

    use super::{Handler, Registry};

    fn constant(value: &'static str) -> Handler {
        Rc::new(move |_: &mut Lexer| -> LexResult<Option<Token>> {
            Ok(Some(Token::untyped(value.to_string())))
        })
    }

    #[test]
    fn keeps_registration_order() {
        let mut registry = Registry::new();
        registry.set("slash", constant("/"));
        registry.set("text", constant("a"));
        registry.set("star", constant("*"));

        assert_eq!(
            registry.kinds().collect::<Vec<_>>(),
            ["slash", "text", "star"]
        );
    }

    #[test]
    fn re_registering_keeps_position() {
        let mut registry = Registry::new();
        registry.set("slash", constant("/"));
        registry.set("text", constant("a"));
        registry.set("slash", constant("//"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.kinds().collect::<Vec<_>>(), ["slash", "text"]);

        let mut lexer = Lexer::new("");
        let handler = registry.get("slash").unwrap();
        let token = handler(&mut lexer).unwrap().unwrap();
        assert_eq!(token.value(), Some("//"));
    }

    #[test]
    fn lookup() {
        let mut registry = Registry::new();
        registry.set("text", constant("a"));

        assert!(registry.has("text"));
        assert!(!registry.has("star"));
        assert!(matches!(
            registry.get("star"),
            Err(LexError::Lookup { kind }) if kind == "star"
        ));
    }

    #[test]
    fn clones_share_handlers() {
        let mut registry = Registry::new();
        registry.set("text", constant("a"));

        let cloned = registry.clone();
        registry.set("star", constant("*"));

        assert!(cloned.has("text"));
        assert!(!cloned.has("star"));
        assert!(Rc::ptr_eq(
            &registry.get("text").unwrap(),
            &cloned.get("text").unwrap()
        ));
    }
}
