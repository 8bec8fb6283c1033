// File: src/query.rs
// Purpose: Multi-valued query parameters of a hash URL

use std::fmt;

use crate::location::Location;
use crate::path::{decode_component, encode_component, normalize_fragment, split_query, to_hash};

/// Query parameters of a hash URL
///
/// Keys keep their first-insertion order and each key holds an ordered list
/// of values. Values are percent-decoded on parse and percent-encoded by
/// [`Display`](fmt::Display).
///
/// # Examples
///
/// ```
/// use hashmux::Query;
///
/// let query = Query::parse("#/search?tag=a&tag=b&page=2");
/// assert_eq!(query.get("page", 0), Some("2"));
/// assert_eq!(query.get_all("tag"), &["a".to_string(), "b".to_string()]);
/// assert_eq!(query.to_string(), "tag=a&tag=b&page=2");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    values: Vec<(String, Vec<String>)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a hash URL or a bare query string
    ///
    /// Everything after the first `?` is parsed; without a `?` the whole
    /// input is treated as the query string.
    pub fn parse(raw: &str) -> Self {
        let query = raw.split_once('?').map_or(raw, |(_, query)| query);
        Self::from_query_string(query)
    }

    /// Parses `key=value` pairs separated by `&`
    ///
    /// Pairs without a non-empty key before the first `=` are skipped.
    pub fn from_query_string(query: &str) -> Self {
        let mut parsed = Self::new();
        for part in query.split('&') {
            match part.split_once('=') {
                Some((key, value)) if !key.is_empty() => {
                    parsed.add(key, decode_component(value));
                }
                _ => continue,
            }
        }
        parsed
    }

    /// Appends a value under `key`
    pub fn add(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entry_mut(key) {
            Some(values) => values.push(value),
            None => self.values.push((key.to_string(), vec![value])),
        }
    }

    /// Replaces all values under `key` with a single value
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.set_all(key, vec![value.into()]);
    }

    /// Replaces all values under `key`
    pub fn set_all<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        match self.entry_mut(key) {
            Some(existing) => *existing = values,
            None => self.values.push((key.to_string(), values)),
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.entry(key).is_some()
    }

    /// Value at `index` under `key`
    pub fn get(&self, key: &str, index: usize) -> Option<&str> {
        self.entry(key)
            .and_then(|values| values.get(index))
            .map(String::as_str)
    }

    /// Value at `index` under `key`, or `default` when absent
    pub fn get_or<'a>(&'a self, key: &str, index: usize, default: &'a str) -> &'a str {
        self.get(key, index).unwrap_or(default)
    }

    /// All values under `key`, empty when absent
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entry(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All values under `key`, or `default` when absent
    pub fn get_all_or<'a>(&'a self, key: &str, default: &'a [String]) -> &'a [String] {
        self.entry(key).map(Vec::as_slice).unwrap_or(default)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(key, _)| key.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn entry(&self, key: &str) -> Option<&Vec<String>> {
        self.values.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn entry_mut(&mut self, key: &str) -> Option<&mut Vec<String>> {
        self.values.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    // ========================================================================
    // Write-back to the current location
    // ========================================================================

    /// Replaces the query of the current fragment with this query
    ///
    /// With `replace` the history entry is replaced and no navigation event
    /// is raised; otherwise the fragment is assigned like a navigation.
    pub fn apply<L: Location + ?Sized>(&self, location: &L, replace: bool) {
        let current = location.current();
        let (path, _) = split_query(normalize_fragment(&current));
        let hash = to_hash(&format!("{}?{}", path, self));
        if replace {
            location.replace(&hash);
        } else {
            location.assign(&hash);
        }
    }

    /// Adds a value to the query of the current fragment and writes it back
    pub fn add_current<L: Location + ?Sized>(
        location: &L,
        key: &str,
        value: impl Into<String>,
        replace: bool,
    ) -> Self {
        let mut query = Self::parse(&location.current());
        query.add(key, value);
        query.apply(location, replace);
        query
    }

    /// Replaces a key in the query of the current fragment and writes it back
    pub fn set_current<L: Location + ?Sized>(
        location: &L,
        key: &str,
        value: impl Into<String>,
        replace: bool,
    ) -> Self {
        let mut query = Self::parse(&location.current());
        query.set(key, value);
        query.apply(location, replace);
        query
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, values) in &self.values {
            for value in values {
                if !first {
                    f.write_str("&")?;
                }
                first = false;
                write!(f, "{}={}", key, encode_component(value))?;
            }
        }
        Ok(())
    }
}
