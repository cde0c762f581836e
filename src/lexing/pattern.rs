//!
//! Anchored patterns, and what they capture.
//!

use std::{rc::Rc, sync::OnceLock};

use regex::Regex;

use super::{LexError, LexResult};

///
/// A regular expression which is applied to the start
/// of the remaining input.
///
/// Its source must begin with `^`: this is checked the first time
/// the pattern is used, and remembered for later uses.
///
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    anchored: OnceLock<bool>,
}

impl Pattern {
    ///
    /// Compiles a new pattern.
    ///
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Self::from)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    ///
    /// Whether the source starts with `^`.
    ///
    pub fn is_anchored(&self) -> bool {
        *self
            .anchored
            .get_or_init(|| self.regex.as_str().starts_with('^'))
    }

    ///
    /// Fails with [LexError::Configuration] if this
    /// pattern is not anchored.
    ///
    pub fn validate(&self) -> LexResult<()> {
        if self.is_anchored() {
            return Ok(());
        }

        Err(LexError::Configuration {
            pattern: self.as_str().to_string(),
        })
    }

    ///
    /// Returns whether the anchoring check has already run.
    ///
    #[cfg(test)]
    pub(crate) fn is_validated(&self) -> bool {
        self.anchored.get().is_some()
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Self {
            regex,
            anchored: OnceLock::new(),
        }
    }
}

///
/// Conversion into a [Pattern], compiling it if needed.
///
pub trait ToPattern {
    fn to_pattern(self) -> LexResult<Pattern>;
}

impl ToPattern for Pattern {
    fn to_pattern(self) -> LexResult<Pattern> {
        Ok(self)
    }
}

impl ToPattern for Regex {
    fn to_pattern(self) -> LexResult<Pattern> {
        Ok(Pattern::from(self))
    }
}

impl ToPattern for &str {
    fn to_pattern(self) -> LexResult<Pattern> {
        Ok(Pattern::new(self)?)
    }
}

impl ToPattern for String {
    fn to_pattern(self) -> LexResult<Pattern> {
        self.as_str().to_pattern()
    }
}

///
/// The raw result of a successful [Pattern] match:
/// the matched text plus its capture groups.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captures {
    groups: Vec<Option<String>>,
    index: usize,
    input: Rc<str>,
}

impl Captures {
    pub(crate) fn new(groups: Vec<Option<String>>, index: usize, input: Rc<str>) -> Self {
        debug_assert!(!groups.is_empty());
        Self {
            groups,
            index,
            input,
        }
    }

    ///
    /// Reads the capture groups of `regex` against `target`, `index`
    /// being the offset of `target` within `input`.
    ///
    pub(crate) fn read(regex: &Regex, target: &str, index: usize, input: Rc<str>) -> Option<Self> {
        let caps = regex.captures(target)?;
        if caps.get(0)?.start() != 0 {
            // Multi-line `^` can match after a newline.
            return None;
        }

        let groups = caps
            .iter()
            .map(|group| group.map(|m| m.as_str().to_string()))
            .collect();

        Some(Self::new(groups, index, input))
    }

    ///
    /// The full matched text (group 0).
    ///
    pub fn full(&self) -> &str {
        self.groups[0].as_deref().unwrap_or_default()
    }

    ///
    /// The `i`-th capture group, if it took part in the match.
    ///
    pub fn get(&self, i: usize) -> Option<&str> {
        self.groups.get(i)?.as_deref()
    }

    ///
    /// Number of groups, including the full match.
    ///
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.full().is_empty()
    }

    ///
    /// Byte offset of the match in the original input.
    ///
    pub fn index(&self) -> usize {
        self.index
    }

    ///
    /// The string the pattern was searched against.
    ///
    pub fn target(&self) -> &str {
        &self.input[self.index..]
    }

    ///
    /// The preferred value of a token built from this match:
    /// the first group if it caught something, otherwise the full match.
    ///
    pub fn value(&self) -> &str {
        match self.get(1) {
            Some(group) if !group.is_empty() => group,
            _ => self.full(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::{Captures, Pattern, ToPattern};

    #[test]
    fn anchoring() {
        let anchored = Pattern::new(r"^\w+").unwrap();
        let floating = Pattern::new(r"\w+").unwrap();

        assert!(!anchored.is_validated());
        assert!(anchored.validate().is_ok());
        assert!(anchored.is_validated());

        assert!(floating.validate().is_err());
        assert!(floating.is_validated());
    }

    #[test]
    fn read_groups() {
        let pattern = Pattern::new(r"^\.([a-z])\.").unwrap();
        let input: Rc<str> = "x.a.".into();

        let caps = Captures::read(pattern.regex(), &input[1..], 1, input.clone()).unwrap();
        assert_eq!(caps.full(), ".a.");
        assert_eq!(caps.get(1), Some("a"));
        assert_eq!(caps.get(2), None);
        assert_eq!(caps.value(), "a");
        assert_eq!(caps.index(), 1);
        assert_eq!(caps.target(), ".a.");
    }

    #[test]
    fn value_falls_back_to_full_match() {
        let pattern = Pattern::new(r"^(x?)\*").unwrap();
        let input: Rc<str> = "*".into();

        let caps = Captures::read(pattern.regex(), &input, 0, input.clone()).unwrap();
        assert_eq!(caps.value(), "*");
        assert_eq!(caps.len(), 2);
    }

    #[test]
    fn multi_line_anchor_only_matches_at_start() {
        let pattern = Pattern::new(r"^(?m)^b").unwrap();
        let input: Rc<str> = "a\nb".into();
        assert!(Captures::read(pattern.regex(), &input, 0, input.clone()).is_none());
    }

    #[test]
    fn conversions() {
        assert!(r"^\w+".to_pattern().is_ok());
        assert!(String::from(r"^\d").to_pattern().is_ok());
        assert!(matches!(
            "^(".to_pattern(),
            Err(crate::lexing::LexError::Regex(_))
        ));
    }
}
