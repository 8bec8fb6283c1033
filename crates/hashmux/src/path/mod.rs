/// Fragment utilities for splitting and decoding URL hashes
///
/// All functions are **pure**: given same input, always produce same output with no side effects.

use std::borrow::Cow;

/// Normalizes a raw location hash into a routable fragment
///
/// # Rules
///
/// - A leading `#` is stripped
/// - An empty fragment is the root `/`
///
/// # Examples
///
/// ```
/// use hashmux::path::normalize_fragment;
///
/// assert_eq!(normalize_fragment("#/users/42"), "/users/42");
/// assert_eq!(normalize_fragment("/users/42"), "/users/42");
/// assert_eq!(normalize_fragment(""), "/");
/// assert_eq!(normalize_fragment("#"), "/");
/// ```
pub fn normalize_fragment(raw: &str) -> &str {
    match raw.strip_prefix('#').unwrap_or(raw) {
        "" => "/",
        fragment => fragment,
    }
}

/// Splits a fragment into its path and query portions at the first `?`
///
/// # Examples
///
/// ```
/// use hashmux::path::split_query;
///
/// assert_eq!(split_query("/search?q=rust&page=2"), ("/search", Some("q=rust&page=2")));
/// assert_eq!(split_query("/search"), ("/search", None));
/// ```
pub fn split_query(fragment: &str) -> (&str, Option<&str>) {
    match fragment.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (fragment, None),
    }
}

/// Splits a path into its `/`-delimited segments, dropping the element before
/// the leading slash
///
/// # Examples
///
/// ```
/// use hashmux::path::segments;
///
/// assert_eq!(segments("/user/42"), vec!["user", "42"]);
/// assert_eq!(segments("/"), vec![""]);
/// assert_eq!(segments("/files/"), vec!["files", ""]);
/// ```
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').skip(1).collect()
}

/// Page name reported to error handlers: the path without its leading slash
///
/// # Examples
///
/// ```
/// use hashmux::path::page_name;
///
/// assert_eq!(page_name("/unknown"), "unknown");
/// assert_eq!(page_name("/"), "");
/// ```
pub fn page_name(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Formats a fragment as a location hash with a leading `#`
pub fn to_hash(fragment: &str) -> String {
    if fragment.starts_with('#') {
        fragment.to_string()
    } else {
        format!("#{}", fragment)
    }
}

/// Percent-decodes one component, returning the raw text when it does not
/// decode to valid UTF-8
pub fn decode_component(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

/// Percent-encodes one component
pub fn encode_component(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_fragment() {
        assert_eq!(normalize_fragment("#/about"), "/about");
        assert_eq!(normalize_fragment("#"), "/");
        assert_eq!(normalize_fragment(""), "/");
        assert_eq!(normalize_fragment("#/a?x=1"), "/a?x=1");
    }

    #[test]
    fn test_split_query_first_question_mark() {
        assert_eq!(split_query("/a?b=1?c=2"), ("/a", Some("b=1?c=2")));
        assert_eq!(split_query("/a?"), ("/a", Some("")));
    }

    #[test]
    fn test_segments() {
        assert_eq!(segments("/a/b/c"), vec!["a", "b", "c"]);
        assert_eq!(segments("/"), vec![""]);
        assert!(segments("").is_empty());
    }

    #[test]
    fn test_to_hash() {
        assert_eq!(to_hash("/a"), "#/a");
        assert_eq!(to_hash("#/a"), "#/a");
    }

    #[test]
    fn test_decode_component() {
        assert_eq!(decode_component("hello%20world"), "hello world");
        assert_eq!(decode_component("plain"), "plain");
        // Invalid UTF-8 after decoding keeps the raw text
        assert_eq!(decode_component("%FF"), "%FF");
    }

    #[test]
    fn test_encode_component() {
        assert_eq!(encode_component("a b&c"), "a%20b%26c");
    }
}
