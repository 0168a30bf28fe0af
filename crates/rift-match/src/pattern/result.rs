//! Outcome of evaluating a pattern against one request.

use std::ops::Not;

/// Named sub-values captured by regex lookups, in the order the groups were
/// first captured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    entries: Vec<(String, String)>,
}

impl Captures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`, keeping its original position when already present.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Captures {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Captures {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut captures = Captures::new();
        captures.extend(iter);
        captures
    }
}

impl IntoIterator for Captures {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Verdict plus captures of a single evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    matched: bool,
    captures: Captures,
}

impl MatchResult {
    pub fn new(matched: bool) -> Self {
        Self {
            matched,
            captures: Captures::new(),
        }
    }

    pub fn with_captures(matched: bool, captures: Captures) -> Self {
        Self { matched, captures }
    }

    pub fn no_match() -> Self {
        Self::new(false)
    }

    #[inline]
    pub fn is_match(&self) -> bool {
        self.matched
    }

    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.captures.get(name)
    }

    pub fn into_captures(self) -> Captures {
        self.captures
    }

    /// Conjunction of two successful results; `other` wins on key collision.
    pub(crate) fn merge(mut self, other: MatchResult) -> MatchResult {
        if !(self.matched && other.matched) {
            return MatchResult::no_match();
        }
        self.captures.extend(other.captures);
        self
    }
}

impl From<MatchResult> for bool {
    fn from(result: MatchResult) -> bool {
        result.matched
    }
}

impl Not for MatchResult {
    type Output = MatchResult;

    /// Inverts the verdict. Captures are dropped either way.
    fn not(self) -> MatchResult {
        MatchResult::new(!self.matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captures(pairs: &[(&str, &str)]) -> Captures {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_merge_right_overrides() {
        let left = MatchResult::with_captures(true, captures(&[("id", "1"), ("slug", "a")]));
        let right = MatchResult::with_captures(true, captures(&[("id", "2")]));
        let merged = left.merge(right);
        assert!(merged.is_match());
        assert_eq!(merged.get("id"), Some("2"));
        assert_eq!(merged.get("slug"), Some("a"));
        assert_eq!(merged.captures().names().collect::<Vec<_>>(), ["id", "slug"]);
    }

    #[test]
    fn test_captures_keep_first_seen_order() {
        let mut captures = captures(&[("z", "1"), ("a", "2")]);
        captures.insert("m", "3");
        captures.insert("z", "4");
        assert_eq!(
            captures.iter().collect::<Vec<_>>(),
            [("z", "4"), ("a", "2"), ("m", "3")]
        );
    }

    #[test]
    fn test_merge_failure_drops_captures() {
        let left = MatchResult::with_captures(true, captures(&[("id", "1")]));
        let merged = left.merge(MatchResult::no_match());
        assert!(!merged.is_match());
        assert!(merged.captures().is_empty());
    }

    #[test]
    fn test_not_drops_captures() {
        let result = MatchResult::with_captures(true, captures(&[("id", "1")]));
        let inverted = !result;
        assert!(!inverted.is_match());
        assert!(inverted.captures().is_empty());
        assert!(bool::from(!inverted));
    }
}
