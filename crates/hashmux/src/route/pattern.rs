/// Pattern compilation for route templates
///
/// Turns a template such as `/user/{id}/{role:admin|guest}/` into an ordered
/// list of per-segment matchers. Parsing is pure: same input → same output.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use super::matcher::{Capture, CompiledPattern, SegmentMatcher};
use crate::error::{Result, RouterError};

/// `{name}` or `{name:pattern}` spanning a whole segment
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\{([A-Za-z][A-Za-z0-9_]*)(?::([^}]*))?\}$").expect("placeholder grammar is valid")
});

/// Matches one or more characters of a single segment
const ANY_SEGMENT: &str = "[^/]+";

/// Represents the two kinds of template segments
///
/// # Examples
///
/// ```
/// use hashmux::route::pattern::{classify_segment, PatternSegmentType};
///
/// let seg = classify_segment("about");
/// assert_eq!(seg, PatternSegmentType::Static("about".to_string()));
///
/// let seg = classify_segment("{id}");
/// assert_eq!(seg, PatternSegmentType::Capture("id".to_string(), None));
///
/// let seg = classify_segment("{role:admin|guest}");
/// assert_eq!(
///     seg,
///     PatternSegmentType::Capture("role".to_string(), Some("admin|guest".to_string()))
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum PatternSegmentType {
    /// Named placeholder with an optional inline pattern
    Capture(String, Option<String>),
    /// Literal text matched verbatim
    Static(String),
}

/// Classifies a template segment (pure function)
///
/// An empty inline pattern (`{id:}`) is treated as no pattern.
pub fn classify_segment(segment: &str) -> PatternSegmentType {
    match PLACEHOLDER.captures(segment) {
        Some(caps) => {
            let name = caps[1].to_string();
            let pattern = caps
                .get(2)
                .map(|m| m.as_str())
                .filter(|p| !p.is_empty())
                .map(str::to_string);
            PatternSegmentType::Capture(name, pattern)
        }
        None => PatternSegmentType::Static(segment.to_string()),
    }
}

/// Compiles a route template into a [`CompiledPattern`]
///
/// # Rules
///
/// - An empty template is the root template `/`
/// - A template ending in `/` with more than one segment is **open-ended**:
///   the trailing empty segment is dropped and extra path segments are
///   captured positionally
/// - Literal segments are regex-escaped and anchored
/// - `{name}` matches one or more non-`/` characters
/// - `{name:pattern}` matches exactly `pattern`
///
/// # Errors
///
/// Returns [`RouterError::InvalidPattern`] when an inline pattern is not a
/// valid regular expression.
///
/// # Examples
///
/// ```
/// use hashmux::route::pattern::compile;
///
/// let pattern = compile("/user/{id}", false).unwrap();
/// assert_eq!(pattern.len(), 2);
/// assert!(!pattern.is_open_ended());
///
/// let pattern = compile("/files/", false).unwrap();
/// assert_eq!(pattern.len(), 1);
/// assert!(pattern.is_open_ended());
/// ```
pub fn compile(template: &str, case_sensitive: bool) -> Result<CompiledPattern> {
    let template = normalize_template(template);

    let mut pieces: Vec<&str> = template.split('/').skip(1).collect();
    let open_ended = pieces.len() > 1 && pieces.last().is_some_and(|p| p.is_empty());
    if open_ended {
        pieces.pop();
    }

    let segments = pieces
        .iter()
        .map(|piece| compile_segment(&template, piece, case_sensitive))
        .collect::<Result<Vec<_>>>()?;

    Ok(CompiledPattern::new(segments, open_ended))
}

/// Templates are rooted at `/`; a missing leading slash is added
fn normalize_template(template: &str) -> String {
    if template.is_empty() {
        "/".to_string()
    } else if template.starts_with('/') {
        template.to_string()
    } else {
        format!("/{}", template)
    }
}

fn compile_segment(template: &str, piece: &str, case_sensitive: bool) -> Result<SegmentMatcher> {
    let (capture, body) = match classify_segment(piece) {
        PatternSegmentType::Capture(name, Some(pattern)) => (Capture::Named(name), pattern),
        PatternSegmentType::Capture(name, None) => (Capture::Named(name), ANY_SEGMENT.to_string()),
        PatternSegmentType::Static(text) => (Capture::Literal, regex::escape(&text)),
    };

    let regex = anchored(&body, case_sensitive).map_err(|source| RouterError::InvalidPattern {
        template: template.to_string(),
        segment: piece.to_string(),
        source,
    })?;

    Ok(SegmentMatcher::new(capture, regex))
}

/// Builds a regex that must match the whole segment
pub(crate) fn anchored(body: &str, case_sensitive: bool) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(&format!("^(?:{})$", body))
        .case_insensitive(!case_sensitive)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_static() {
        assert_eq!(
            classify_segment("about"),
            PatternSegmentType::Static("about".to_string())
        );
    }

    #[test]
    fn test_classify_capture() {
        assert_eq!(
            classify_segment("{id}"),
            PatternSegmentType::Capture("id".to_string(), None)
        );
    }

    #[test]
    fn test_classify_capture_with_pattern() {
        assert_eq!(
            classify_segment("{q:[a-z]+}"),
            PatternSegmentType::Capture("q".to_string(), Some("[a-z]+".to_string()))
        );
    }

    #[test]
    fn test_classify_empty_pattern_is_no_pattern() {
        assert_eq!(
            classify_segment("{id:}"),
            PatternSegmentType::Capture("id".to_string(), None)
        );
    }

    #[test]
    fn test_classify_rejects_partial_placeholder() {
        assert!(matches!(classify_segment("x{id}"), PatternSegmentType::Static(_)));
        assert!(matches!(classify_segment("{1d}"), PatternSegmentType::Static(_)));
        assert!(matches!(classify_segment("{}"), PatternSegmentType::Static(_)));
    }

    #[test]
    fn test_classify_allows_digits_and_underscore_after_letter() {
        assert_eq!(
            classify_segment("{user_id2}"),
            PatternSegmentType::Capture("user_id2".to_string(), None)
        );
    }

    #[test]
    fn test_compile_root() {
        let root = compile("/", false).unwrap();
        assert_eq!(root.len(), 1);
        assert!(!root.is_open_ended());

        let empty = compile("", false).unwrap();
        assert_eq!(empty.len(), 1);
        assert!(!empty.is_open_ended());
    }

    #[test]
    fn test_compile_open_ended() {
        let pattern = compile("/files/", false).unwrap();
        assert_eq!(pattern.len(), 1);
        assert!(pattern.is_open_ended());

        let pattern = compile("/a/{b}/", false).unwrap();
        assert_eq!(pattern.len(), 2);
        assert!(pattern.is_open_ended());
    }

    #[test]
    fn test_compile_missing_leading_slash() {
        let pattern = compile("about", false).unwrap();
        assert_eq!(pattern.len(), 1);
        assert!(pattern.matches(&["about"]).is_some());
    }

    #[test]
    fn test_compile_invalid_inline_pattern() {
        let err = compile("/x/{id:[a-}", false).unwrap_err();
        assert!(matches!(err, RouterError::InvalidPattern { .. }));
        assert!(err.to_string().contains("{id:[a-}"));
    }

    #[test]
    fn test_literal_metacharacters_are_escaped() {
        let pattern = compile("/a.b/(c)", true).unwrap();
        assert!(pattern.matches(&["a.b", "(c)"]).is_some());
        assert!(pattern.matches(&["axb", "(c)"]).is_none());
    }

    #[test]
    fn test_anchored_alternation() {
        let regex = anchored("admin|guest", true).unwrap();
        assert!(regex.is_match("admin"));
        assert!(regex.is_match("guest"));
        assert!(!regex.is_match("administrator"));
        assert!(!regex.is_match("xguest"));
    }
}
