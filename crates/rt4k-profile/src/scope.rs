//! Name filters used to select a subset of settings.

use std::fmt;

use regex::Regex;

/// Selects settings by name.
///
/// A list of scopes matches a name when any scope does; an empty list
/// matches everything.
pub enum Scope {
    /// Names starting with the given text, e.g. `"output.transmitter"`.
    Prefix(String),
    /// Names the regular expression finds a match in.
    Pattern(Regex),
    /// Names the predicate accepts.
    Predicate(Box<dyn Fn(&str) -> bool + Send + Sync>),
}

impl Scope {
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::Prefix(prefix.into())
    }

    /// Compile `pattern` into a [`Scope::Pattern`].
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self::Pattern)
    }

    pub fn predicate(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Box::new(predicate))
    }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Prefix(prefix) => name.starts_with(prefix.as_str()),
            Self::Pattern(regex) => regex.is_match(name),
            Self::Predicate(predicate) => predicate(name),
        }
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefix(prefix) => f.debug_tuple("Prefix").field(prefix).finish(),
            Self::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<&str> for Scope {
    fn from(prefix: &str) -> Self {
        Self::prefix(prefix)
    }
}

impl From<String> for Scope {
    fn from(prefix: String) -> Self {
        Self::Prefix(prefix)
    }
}

impl From<Regex> for Scope {
    fn from(regex: Regex) -> Self {
        Self::Pattern(regex)
    }
}

/// Whether `name` is selected by `scopes`.
#[must_use]
pub fn matches_any(scopes: &[Scope], name: &str) -> bool {
    scopes.is_empty() || scopes.iter().any(|scope| scope.matches(name))
}
