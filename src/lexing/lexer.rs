//!
//! The lexer engine: runs registered handlers against the
//! remaining input, one token at a time.
//!

use std::rc::Rc;

use lazy_static::lazy_static;

use crate::common::{Location, Position};

use super::{
    error::excerpt, Captures, Handler, LexError, LexResult, Mode, Options, Pattern, Registry,
    State, ToPattern, Token,
};

lazy_static! {
    static ref SPACES: Pattern = Pattern::new(r"^[ \t]+").expect("spaces pattern");
}

///
/// A pluggable lexer.
///
/// Token types are registered with [Lexer::capture] (for a pattern)
/// or [Lexer::set] (for an arbitrary function), then tried in
/// registration order by [Lexer::advance].
///
/// ```
/// use snaplex::lexing::Lexer;
///
/// let mut lexer = Lexer::new("foo/*");
/// lexer
///     .capture("slash", r"^/")?
///     .capture("text", r"^\w+")?
///     .capture("star", r"^\*")?;
///
/// let kinds: Vec<_> = lexer.lex()?.iter().map(|t| t.kind.clone()).collect();
/// assert_eq!(kinds, ["text", "slash", "star"]);
/// # Ok::<(), snaplex::lexing::LexError>(())
/// ```
///
#[derive(Debug)]
pub struct Lexer {
    state: State,
    registry: Registry,
    options: Options,
}

impl Lexer {
    pub fn new(input: impl Into<Rc<str>>) -> Self {
        Self::with_options(input, Options::default())
    }

    pub fn with_options(input: impl Into<Rc<str>>, options: Options) -> Self {
        Self {
            state: State::new(input),
            registry: Registry::new(),
            options,
        }
    }

    ///
    /// A fresh lexer with the same handlers, mode and source,
    /// but none of this lexer's state or hooks.
    ///
    pub fn fork(&self) -> Self {
        self.fork_with("")
    }

    ///
    /// Like [Lexer::fork], starting on `input`.
    ///
    pub fn fork_with(&self, input: impl Into<Rc<str>>) -> Self {
        Self {
            state: State::new(input),
            registry: self.registry.clone(),
            options: self.options.fork(),
        }
    }

    ///
    /// Starts over on a new input, keeping handlers and options.
    ///
    pub fn init(&mut self, input: impl Into<Rc<str>>) {
        self.state = State::new(input);
        log::debug!("lexer reset: {} bytes of input", self.state.input().len());
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    ///
    /// The input yet to be consumed.
    ///
    pub fn string(&self) -> &str {
        self.state.string()
    }

    pub fn consumed(&self) -> &str {
        self.state.consumed()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.state.tokens
    }

    ///
    /// Current position of the cursor.
    ///
    pub fn position(&self) -> Position {
        self.state.loc
    }

    ///
    /// The location spanning from `start` to the cursor.
    ///
    pub fn location(&self, start: Position) -> Location {
        Location::new(start, self.state.loc, self.options.source.clone())
    }

    // --- Registration ---

    ///
    /// Registers a handler for `kind`.
    ///
    /// ```
    /// use snaplex::lexing::{Lexer, Pattern};
    ///
    /// let star = Pattern::new(r"^\*").unwrap();
    /// let mut lexer = Lexer::new("*");
    /// lexer.set("star", move |lexer| lexer.scan(&star, "star"));
    ///
    /// assert_eq!(lexer.advance()?.unwrap().value(), Some("*"));
    /// # Ok::<(), snaplex::lexing::LexError>(())
    /// ```
    ///
    /// A token returned without a location is given one ending
    /// wherever the cursor is once the handler returns. A handler
    /// which consumes and then peeks ahead should attach its own,
    /// with [Lexer::location], before peeking: tokens built by
    /// [Lexer::scan] already do.
    ///
    pub fn set(
        &mut self,
        kind: impl Into<String>,
        handler: impl Fn(&mut Lexer) -> LexResult<Option<Token>> + 'static,
    ) -> &mut Self {
        self.registry.set(kind, Rc::new(handler));
        self
    }

    ///
    /// Registers a handler creating a `kind` token whenever `pattern`
    /// matches.
    ///
    pub fn capture(&mut self, kind: &str, pattern: impl ToPattern) -> LexResult<&mut Self> {
        let pattern = pattern.to_pattern()?;
        let name = kind.to_string();

        Ok(self.set(kind, move |lexer| lexer.scan(&pattern, &name)))
    }

    ///
    /// Like [Lexer::capture], passing captured tokens through
    /// `transform` first.
    ///
    /// Transforms can reshape tokens, drop them (by returning `None`),
    /// or maintain the nesting stack.
    ///
    pub fn capture_with(
        &mut self,
        kind: &str,
        pattern: impl ToPattern,
        transform: impl Fn(&mut Lexer, Token) -> LexResult<Option<Token>> + 'static,
    ) -> LexResult<&mut Self> {
        let pattern = pattern.to_pattern()?;
        let name = kind.to_string();

        Ok(self.set(kind, move |lexer| match lexer.scan(&pattern, &name)? {
            Some(token) => transform(lexer, token),
            None => Ok(None),
        }))
    }

    pub fn get(&self, kind: &str) -> LexResult<Handler> {
        self.registry.get(kind)
    }

    pub fn has(&self, kind: &str) -> bool {
        self.registry.has(kind)
    }

    ///
    /// Registered token types, in the order they are tried.
    ///
    pub fn kinds(&self) -> impl Iterator<Item = &str> + '_ {
        self.registry.kinds()
    }

    ///
    /// Runs `plugin` against this lexer, typically to register
    /// a set of related handlers in one go.
    ///
    /// ```
    /// use snaplex::lexing::{LexResult, Lexer};
    ///
    /// fn slashes(lexer: &mut Lexer) -> LexResult<()> {
    ///     lexer.capture("slash", r"^/")?.capture("backslash", r"^\\")?;
    ///     Ok(())
    /// }
    ///
    /// let mut lexer = Lexer::new("/\\");
    /// lexer.plugin(slashes)?;
    /// assert_eq!(lexer.lex()?.len(), 2);
    /// # Ok::<(), snaplex::lexing::LexError>(())
    /// ```
    ///
    pub fn plugin(
        &mut self,
        plugin: impl FnOnce(&mut Lexer) -> LexResult<()>,
    ) -> LexResult<&mut Self> {
        plugin(self)?;
        Ok(self)
    }

    // --- Matching ---

    ///
    /// Creates a token, notifying `on_token`.
    ///
    pub fn token(&mut self, kind: impl Into<String>, value: impl Into<Option<String>>) -> Token {
        let token = Token::new(kind, value);
        self.options.hooks.token(&token);
        token
    }

    ///
    /// Creates a token from a pattern match, notifying `on_token`.
    ///
    pub fn token_from(&mut self, kind: impl Into<String>, captures: Captures) -> Token {
        let token = Token::from_captures(kind, captures);
        self.options.hooks.token(&token);
        token
    }

    ///
    /// Applies `pattern` to the start of the remaining input,
    /// consuming what it matched.
    ///
    /// Returns `Ok(None)` if nothing matched. Fails if the pattern
    /// is not anchored with `^`, or if it matched an empty string:
    /// in both cases nothing is consumed.
    ///
    pub fn match_pattern(&mut self, pattern: &Pattern) -> LexResult<Option<Captures>> {
        pattern.validate()?;

        let Some(captures) = Captures::read(
            pattern.regex(),
            self.state.string(),
            self.state.offset(),
            self.state.shared_input(),
        ) else {
            return Ok(None);
        };

        if captures.is_empty() {
            return Err(LexError::EmptyMatch {
                pattern: pattern.as_str().to_string(),
            });
        }

        self.consume(captures.full().len())?;
        Ok(Some(captures))
    }

    ///
    /// Matches `pattern`, and makes a `kind` token out of the match.
    ///
    pub fn scan(&mut self, pattern: &Pattern, kind: &str) -> LexResult<Option<Token>> {
        let start = self.position();
        let Some(captures) = self.match_pattern(pattern)? else {
            return Ok(None);
        };

        let token = self.token_from(kind, captures).with_loc(self.location(start));
        self.options.hooks.scan(&token);
        Ok(Some(token))
    }

    ///
    /// Moves `len` bytes from the remaining input onto the consumed
    /// input, updating the cursor's position. Returns the moved text.
    ///
    pub fn consume(&mut self, len: usize) -> LexResult<String> {
        let value = self.take(len)?;
        self.update_location(&value, len);
        self.state.consumed.push_str(&value);
        Ok(value)
    }

    ///
    /// Like [Lexer::consume], but records `value` as what was consumed.
    ///
    /// Unless `value` is the text being skipped, the consumed input
    /// will no longer spell out the original input.
    ///
    pub fn consume_with(&mut self, len: usize, value: &str) -> LexResult<()> {
        self.take(len)?;
        self.update_location(value, len);
        self.state.consumed.push_str(value);
        Ok(())
    }

    ///
    /// Moves the cursor's position past `value`, which stood
    /// for `len` bytes of input.
    ///
    pub fn update_location(&mut self, value: &str, len: usize) {
        self.state.loc = self.state.loc.advanced(value, len);
    }

    fn take(&mut self, len: usize) -> LexResult<String> {
        let Some(value) = self.state.take(len).map(str::to_string) else {
            return Err(LexError::OutOfBounds {
                len,
                remaining: excerpt(self.state.string()),
            });
        };

        Ok(value)
    }

    // --- Producing tokens ---

    ///
    /// Runs the handler registered for `kind`, once.
    ///
    pub fn handle(&mut self, kind: &str) -> LexResult<Option<Token>> {
        let handler = self.registry.get(kind)?;
        self.run(kind, &handler)
    }

    fn run(&mut self, kind: &str, handler: &Handler) -> LexResult<Option<Token>> {
        let start = self.position();
        let Some(mut token) = handler(self)? else {
            return Ok(None);
        };

        if token.kind.is_empty() {
            token.kind = kind.to_string();
        }

        if token.loc.is_none() {
            token.loc = Some(self.location(start));
        }

        Ok(Some(token))
    }

    ///
    /// Produces the next token from the remaining input.
    ///
    /// Handlers are tried in registration order, and the first token
    /// produced is returned. Returns `Ok(None)` at the end of input,
    /// and fails with [LexError::UnmatchedInput] if no handler
    /// recognised the input.
    ///
    /// Errors are reported to the `on_error` hook instead,
    /// if installed, in which case `Ok(None)` is returned.
    ///
    pub fn advance(&mut self) -> LexResult<Option<Token>> {
        match self.try_advance() {
            Ok(token) => Ok(token),
            Err(err) => self.error(err).map(|()| None),
        }
    }

    fn try_advance(&mut self) -> LexResult<Option<Token>> {
        if self.state.string().is_empty() {
            return Ok(None);
        }

        if self.options.mode == Mode::Character {
            return self.advance_char().map(Some);
        }

        for i in 0..self.registry.len() {
            let Some((kind, handler)) = self.registry.get_index(i) else {
                break;
            };

            if let Some(token) = self.run(&kind, &handler)? {
                log::trace!("{} {:?} at {}", token.kind, token.describe(), self.position());
                return Ok(Some(token));
            }
        }

        // A handler may have consumed the rest of the input without
        // producing a token.
        if self.state.string().is_empty() {
            return Ok(None);
        }

        Err(self.unmatched())
    }

    fn advance_char(&mut self) -> LexResult<Token> {
        let start = self.position();
        let len = self.state.string().chars().next().map_or(0, char::len_utf8);
        let value = self.consume(len)?;

        Ok(self.token("char", value).with_loc(self.location(start)))
    }

    fn unmatched(&self) -> LexError {
        LexError::UnmatchedInput {
            remaining: excerpt(self.state.string()),
            position: self.position(),
        }
    }

    ///
    /// Lexes all of the remaining input, pushing every token onto
    /// the token list, which is returned.
    ///
    /// Fails if any input is left unmatched, or if the nesting stack
    /// is not empty at the end.
    ///
    pub fn lex(&mut self) -> LexResult<&[Token]> {
        while let Some(token) = self.next()? {
            self.push(token);
        }

        // Left-over input was already reported by `advance`.
        if self.state.string().is_empty() {
            self.fail()?;
        }

        Ok(&self.state.tokens)
    }

    ///
    /// Starts over on `input`, and lexes all of it.
    ///
    pub fn tokenize(&mut self, input: impl Into<Rc<str>>) -> LexResult<&[Token]> {
        self.init(input);
        self.lex()
    }

    // --- Queue ---

    pub fn enqueue(&mut self, token: Token) {
        self.state.queue.push_back(token);
    }

    pub fn dequeue(&mut self) -> Option<Token> {
        self.state.queue.pop_front()
    }

    ///
    /// The next token: from the queue if some were looked ahead,
    /// otherwise by [Lexer::advance].
    ///
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> LexResult<Option<Token>> {
        match self.dequeue() {
            Some(token) => Ok(Some(token)),
            None => self.advance(),
        }
    }

    ///
    /// Looks at the next token without consuming it.
    ///
    pub fn peek(&mut self) -> LexResult<Option<&Token>> {
        self.lookahead(1)
    }

    ///
    /// Looks at the `n`-th upcoming token (counting from 1),
    /// queueing the tokens up to it.
    ///
    /// Returns `Ok(None)` if the input runs out first.
    ///
    pub fn lookahead(&mut self, n: usize) -> LexResult<Option<&Token>> {
        if n == 0 {
            return Err(LexError::Lookahead);
        }

        while self.state.queue.len() < n {
            // Handlers peeking from here must only see what follows
            // their own token, and their lookahead goes after it.
            let queued = std::mem::take(&mut self.state.queue);
            let produced = self.advance();
            let peeked = std::mem::replace(&mut self.state.queue, queued);

            let token = match produced {
                Ok(token) => token,
                Err(err) => {
                    self.state.queue.extend(peeked);
                    return Err(err);
                }
            };

            let done = token.is_none();
            self.state.queue.extend(token);
            self.state.queue.extend(peeked);

            if done {
                break;
            }
        }

        Ok(self.state.queue.get(n - 1))
    }

    // --- Skipping ---

    ///
    /// Skips up to `n` tokens, returning them.
    ///
    pub fn skip(&mut self, n: usize) -> LexResult<Vec<Token>> {
        let mut skipped = vec![];

        for _ in 0..n {
            match self.next()? {
                Some(token) => skipped.push(token),
                None => break,
            }
        }

        Ok(skipped)
    }

    ///
    /// Skips tokens for as long as they satisfy `pred`.
    ///
    pub fn skip_while(&mut self, mut pred: impl FnMut(&Token) -> bool) -> LexResult<Vec<Token>> {
        let mut skipped = vec![];

        loop {
            let satisfied = match self.peek()? {
                Some(token) => pred(token),
                None => false,
            };

            if !satisfied {
                break;
            }

            skipped.extend(self.next()?);
        }

        Ok(skipped)
    }

    ///
    /// Skips tokens for as long as they are of one of the given types.
    ///
    pub fn skip_type(&mut self, kinds: &[&str]) -> LexResult<Vec<Token>> {
        self.skip_while(|token| kinds.contains(&token.kind.as_str()))
    }

    ///
    /// Skips up to and including the next token of type `kind`.
    ///
    pub fn skip_to(&mut self, kind: &str) -> LexResult<Vec<Token>> {
        let mut skipped = self.skip_while(|token| !token.is(kind))?;
        skipped.extend(self.next()?);
        Ok(skipped)
    }

    ///
    /// Consumes spaces and tabs at the start of the remaining input,
    /// without making a token of them.
    ///
    /// Already queued tokens are left alone.
    ///
    pub fn skip_spaces(&mut self) -> LexResult<Option<String>> {
        Ok(self
            .match_pattern(&SPACES)?
            .map(|captures| captures.full().to_string()))
    }

    // --- Token list ---

    ///
    /// Appends `token` to the token list, notifying `on_push`.
    ///
    pub fn push(&mut self, token: Token) {
        self.options.hooks.push(&token);
        self.state.tokens.push(token);
    }

    ///
    /// The `n`-th token from the end of the token list (counting from 1).
    ///
    pub fn lookbehind(&self, n: usize) -> LexResult<Option<&Token>> {
        if n == 0 {
            return Err(LexError::Lookbehind);
        }

        Ok(self
            .state
            .tokens
            .len()
            .checked_sub(n)
            .and_then(|i| self.state.tokens.get(i)))
    }

    ///
    /// The most recently pushed token.
    ///
    pub fn current(&self) -> Option<&Token> {
        self.state.tokens.last()
    }

    ///
    /// The token pushed before [Lexer::current].
    ///
    pub fn prev(&self) -> Option<&Token> {
        self.lookbehind(2).ok().flatten()
    }

    ///
    /// Same as [Lexer::current].
    ///
    pub fn last(&self) -> Option<&Token> {
        self.current()
    }

    // --- Nesting ---

    ///
    /// Whether the innermost open construct is of type `kind`.
    ///
    pub fn is_inside(&self, kind: &str) -> bool {
        self.state.stack.last().is_some_and(|token| token.is(kind))
    }

    ///
    /// Marks `token` as an open construct.
    ///
    pub fn push_stack(&mut self, token: Token) {
        self.state.stack.push(token);
    }

    ///
    /// Closes the innermost open construct.
    ///
    pub fn pop_stack(&mut self) -> Option<Token> {
        self.state.stack.pop()
    }

    pub fn stack(&self) -> &[Token] {
        &self.state.stack
    }

    ///
    /// Adds `value` to the stash: an empty last entry is replaced,
    /// otherwise a new entry is added. Empty values are ignored.
    ///
    pub fn append(&mut self, value: &str) {
        if value.is_empty() {
            return;
        }

        match self.state.stash.last_mut() {
            Some(last) if last.is_empty() => last.push_str(value),
            _ => self.state.stash.push(value.to_string()),
        }
    }

    // --- End of input ---

    ///
    /// Whether the input and the queue are both exhausted.
    ///
    pub fn eos(&self) -> bool {
        self.state.string().is_empty() && self.state.queue.is_empty()
    }

    ///
    /// Whether nothing was consumed yet.
    ///
    pub fn bos(&self) -> bool {
        self.state.offset() == 0
    }

    ///
    /// Checks that lexing can end here: nothing may be left
    /// open on the stack, nor left in the input.
    ///
    pub fn fail(&mut self) -> LexResult<()> {
        if let Some(open) = self.state.stack.last() {
            let err = LexError::Unclosed {
                token: open.describe().to_string(),
                position: open.loc.as_ref().map_or(self.position(), |loc| loc.start),
            };
            return self.error(err);
        }

        if !self.state.string().is_empty() {
            let err = self.unmatched();
            return self.error(err);
        }

        Ok(())
    }

    ///
    /// Reports `err` to the `on_error` hook, or returns
    /// it if none is installed.
    ///
    pub fn error(&mut self, err: impl Into<LexError>) -> LexResult<()> {
        self.options.hooks.error(err.into())
    }
}
