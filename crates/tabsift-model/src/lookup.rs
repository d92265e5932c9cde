//! Case-insensitive name resolution.
//!
//! Spreadsheet headers and rule fields are written by hand, so `comment`,
//! `COMMENT` and ` Comment ` must all resolve to the same column.

use std::collections::HashMap;

fn normalize_key(name: &str) -> String {
    name.trim().to_uppercase()
}

/// A map keyed by names compared case-insensitively, ignoring surrounding
/// whitespace.
#[derive(Debug, Clone)]
pub struct CaseInsensitiveMap<V> {
    inner: HashMap<String, V>,
}

impl<V> Default for CaseInsensitiveMap<V> {
    fn default() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }
}

impl<V> CaseInsensitiveMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any entry whose key normalizes the same way.
    pub fn insert(&mut self, key: impl AsRef<str>, value: V) {
        self.inner.insert(normalize_key(key.as_ref()), value);
    }

    pub fn get(&self, key: impl AsRef<str>) -> Option<&V> {
        self.inner.get(&normalize_key(key.as_ref()))
    }

    pub fn contains(&self, key: impl AsRef<str>) -> bool {
        self.inner.contains_key(&normalize_key(key.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Resolves a name to the original spelling of a column.
///
/// The first spelling wins when several names normalize to the same key.
pub type CaseInsensitiveLookup = CaseInsensitiveMap<String>;

impl CaseInsensitiveMap<String> {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut inner = HashMap::new();
        for name in names {
            let name = name.as_ref();
            inner
                .entry(normalize_key(name))
                .or_insert_with(|| name.to_string());
        }
        Self { inner }
    }

    /// Original column name for `name`, if any.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}
