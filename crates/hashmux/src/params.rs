// File: src/params.rs
// Purpose: Captured path parameters keyed by name or position

use std::fmt;

/// Key of a captured path value
///
/// Named placeholders (`{id}`) are stored under [`CaptureKey::Named`].
/// Captures without a name and the trailing segments of an open-ended route
/// are stored under [`CaptureKey::Index`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CaptureKey {
    Named(String),
    Index(usize),
}

impl fmt::Display for CaptureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureKey::Named(name) => f.write_str(name),
            CaptureKey::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for CaptureKey {
    fn from(name: &str) -> Self {
        CaptureKey::Named(name.to_string())
    }
}

impl From<usize> for CaptureKey {
    fn from(index: usize) -> Self {
        CaptureKey::Index(index)
    }
}

/// Decoded values captured from a matched path, in capture order
///
/// # Examples
///
/// ```
/// use hashmux::{CaptureKey, Params};
///
/// let mut params = Params::new();
/// params.insert(CaptureKey::from("id"), "42");
/// params.insert(CaptureKey::Index(2), "extra");
///
/// assert_eq!(params.get("id"), Some("42"));
/// assert_eq!(params.index(2), Some("extra"));
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(CaptureKey, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value, replacing any earlier value under the same key in place
    pub fn insert(&mut self, key: CaptureKey, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Value captured by the placeholder `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find_map(|(key, value)| match key {
            CaptureKey::Named(n) if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// Value stored under a positional index
    pub fn index(&self, index: usize) -> Option<&str> {
        self.get_key(&CaptureKey::Index(index))
    }

    pub fn get_key(&self, key: &CaptureKey) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CaptureKey, &str)> {
        self.entries.iter().map(|(key, value)| (key, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JSON object view of the parameters, positional keys rendered as strings
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(key, value)| (key.to_string(), serde_json::Value::from(value.as_str())))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut params = Params::new();
        params.insert("a".into(), "1");
        params.insert(CaptureKey::Index(0), "x");
        params.insert("a".into(), "2");

        let keys: Vec<String> = params.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["a", "0"]);
        assert_eq!(params.get("a"), Some("2"));
    }

    #[test]
    fn test_named_and_positional_do_not_collide() {
        let mut params = Params::new();
        params.insert("0".into(), "named");
        params.insert(CaptureKey::Index(0), "positional");

        assert_eq!(params.get("0"), Some("named"));
        assert_eq!(params.index(0), Some("positional"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_to_json() {
        let mut params = Params::new();
        params.insert("id".into(), "42");
        params.insert(CaptureKey::Index(3), "c");

        assert_eq!(
            params.to_json(),
            serde_json::json!({ "id": "42", "3": "c" })
        );
    }
}
