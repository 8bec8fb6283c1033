/// Compiled route matchers
///
/// A [`CompiledPattern`] is an ordered list of segment matchers; a
/// [`CompiledMatcher`] pairs one with the action to run when it matches.

use std::fmt;

use regex::Regex;

use crate::params::{CaptureKey, Params};
use crate::path::decode_component;
use crate::{Handler, RedirectTarget};

/// What a matched segment contributes to the [`Params`]
#[derive(Debug, Clone, PartialEq)]
pub enum Capture {
    /// Literal segment, nothing is captured
    Literal,
    /// Captured under its placeholder name
    Named(String),
    /// Captured under the next unused positional index
    Positional,
}

/// Matcher for a single path segment
#[derive(Debug, Clone)]
pub struct SegmentMatcher {
    capture: Capture,
    regex: Regex,
}

impl SegmentMatcher {
    pub fn new(capture: Capture, regex: Regex) -> Self {
        Self { capture, regex }
    }

    /// Segment captured positionally, for hand-built patterns
    pub fn positional(regex: Regex) -> Self {
        Self::new(Capture::Positional, regex)
    }

    pub fn capture(&self) -> &Capture {
        &self.capture
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// Ordered segment matchers of one route
///
/// The number of matchers equals the number of template segments, not
/// counting the trailing empty segment of an open-ended template.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    segments: Vec<SegmentMatcher>,
    open_ended: bool,
}

impl CompiledPattern {
    pub fn new(segments: Vec<SegmentMatcher>, open_ended: bool) -> Self {
        Self {
            segments,
            open_ended,
        }
    }

    pub fn segments(&self) -> &[SegmentMatcher] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_open_ended(&self) -> bool {
        self.open_ended
    }

    /// Matches the path segments and returns the decoded captures
    ///
    /// Walks the segments in order and stops at the first one that fails.
    /// Trailing path segments of an open-ended pattern are stored under their
    /// absolute index in `parts`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashmux::route::pattern::compile;
    ///
    /// let pattern = compile("/user/{id}", false).unwrap();
    /// let params = pattern.matches(&["user", "42"]).unwrap();
    /// assert_eq!(params.get("id"), Some("42"));
    ///
    /// assert!(pattern.matches(&["user"]).is_none());
    /// assert!(pattern.matches(&["user", "42", "extra"]).is_none());
    /// ```
    pub fn matches(&self, parts: &[&str]) -> Option<Params> {
        if self.segments.len() > parts.len() {
            return None;
        }
        if self.segments.len() < parts.len() && !self.open_ended {
            return None;
        }

        let mut params = Params::new();
        let mut positional = 0;

        for (matcher, part) in self.segments.iter().zip(parts) {
            let found = matcher.regex.find(part)?;
            let value = decode_component(found.as_str());

            match &matcher.capture {
                Capture::Literal => {}
                Capture::Named(name) => params.insert(CaptureKey::Named(name.clone()), value),
                Capture::Positional => {
                    params.insert(CaptureKey::Index(positional), value);
                    positional += 1;
                }
            }
        }

        if self.open_ended {
            for (index, part) in parts.iter().enumerate().skip(self.segments.len()) {
                params.insert(CaptureKey::Index(index), decode_component(part));
            }
        }

        Some(params)
    }
}

/// Action run when a route matches
pub enum Action {
    /// User handler receiving the params and query
    Call(Handler),
    /// Replace the current fragment with another one
    Redirect(RedirectTarget),
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Call(_) => f.write_str("Call(..)"),
            Action::Redirect(target) => f.debug_tuple("Redirect").field(target).finish(),
        }
    }
}

/// A registered route: compiled pattern plus its action
#[derive(Debug)]
pub struct CompiledMatcher {
    pattern: CompiledPattern,
    action: Action,
}

impl CompiledMatcher {
    pub fn new(pattern: CompiledPattern, handler: Handler) -> Self {
        Self {
            pattern,
            action: Action::Call(handler),
        }
    }

    pub fn redirect(pattern: CompiledPattern, target: RedirectTarget) -> Self {
        Self {
            pattern,
            action: Action::Redirect(target),
        }
    }

    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Tests the path segments against this route
    pub fn handle(&self, parts: &[&str]) -> Option<Params> {
        self.pattern.matches(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::pattern::{anchored, compile};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_literal_only_has_empty_params() {
        let pattern = compile("/about/team", false).unwrap();
        let params = pattern.matches(&["about", "team"]).unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_root_matches_only_root() {
        let pattern = compile("/", false).unwrap();
        assert!(pattern.matches(&[""]).is_some());
        assert!(pattern.matches(&["about"]).is_none());
    }

    #[test]
    fn test_case_insensitive_by_flag() {
        let insensitive = compile("/About", false).unwrap();
        assert!(insensitive.matches(&["about"]).is_some());

        let sensitive = compile("/About", true).unwrap();
        assert!(sensitive.matches(&["about"]).is_none());
        assert!(sensitive.matches(&["About"]).is_some());
    }

    #[test]
    fn test_inline_pattern() {
        let pattern = compile("/search/{q:[a-z]+}", true).unwrap();
        assert!(pattern.matches(&["search", "123"]).is_none());

        let params = pattern.matches(&["search", "abc"]).unwrap();
        assert_eq!(params.get("q"), Some("abc"));
    }

    #[test]
    fn test_empty_segment_does_not_satisfy_capture() {
        let pattern = compile("/user/{id}", false).unwrap();
        assert!(pattern.matches(&["user", ""]).is_none());
    }

    #[test]
    fn test_open_ended_absolute_indices() {
        let pattern = compile("/files/", false).unwrap();
        let params = pattern.matches(&["files", "a", "b", "c"]).unwrap();

        let entries: Vec<(CaptureKey, &str)> =
            params.iter().map(|(k, v)| (k.clone(), v)).collect();
        assert_eq!(
            entries,
            vec![
                (CaptureKey::Index(1), "a"),
                (CaptureKey::Index(2), "b"),
                (CaptureKey::Index(3), "c"),
            ]
        );
    }

    #[test]
    fn test_open_ended_requires_prefix() {
        let pattern = compile("/files/", false).unwrap();
        assert!(pattern.matches(&["files"]).is_some());
        assert!(pattern.matches(&["docs", "a"]).is_none());
    }

    #[test]
    fn test_values_are_decoded() {
        let pattern = compile("/user/{name}/", false).unwrap();
        let params = pattern.matches(&["user", "John%20Doe", "a%2Fb"]).unwrap();
        assert_eq!(params.get("name"), Some("John Doe"));
        assert_eq!(params.index(2), Some("a/b"));
    }

    #[test]
    fn test_positional_captures_count_from_zero() {
        let pattern = CompiledPattern::new(
            vec![
                SegmentMatcher::new(Capture::Literal, anchored("api", true).unwrap()),
                SegmentMatcher::positional(anchored("[0-9]+", true).unwrap()),
                SegmentMatcher::new(Capture::Named("kind".into()), anchored("[a-z]+", true).unwrap()),
                SegmentMatcher::positional(anchored(".+", true).unwrap()),
            ],
            true,
        );

        let params = pattern.matches(&["api", "7", "post", "x", "tail"]).unwrap();
        assert_eq!(params.index(0), Some("7"));
        assert_eq!(params.get("kind"), Some("post"));
        assert_eq!(params.index(1), Some("x"));
        assert_eq!(params.index(4), Some("tail"));
    }
}
