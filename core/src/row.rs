//! Flat result rows.

use compact_str::CompactString;
use sleet_types::Value;

/// A flat row: column label to value, in the order the engine returned them.
///
/// Select results are labelled `<alias>_<column>`. Rows are also used as the
/// value map of insert and update statements, keyed by plain column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(CompactString, Value)>,
}

impl Row {
    #[inline]
    pub const fn new() -> Self {
        Self { cells: Vec::new() }
    }

    /// Sets `name`, replacing an existing cell of the same name.
    pub fn set(&mut self, name: impl Into<CompactString>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.cells.push((name, value)),
        }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, name: impl Into<CompactString>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.cells.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Like [`get`](Self::get), treating a missing cell as `NULL`.
    #[inline]
    pub fn get_or_null(&self, name: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.get(name).unwrap_or(&NULL)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<K: Into<CompactString>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.set(k, v);
        }
        row
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Row {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_in_place() {
        let mut row = Row::new().with("a", 1).with("b", 2);
        row.set("a", 3);
        assert_eq!(row.iter().map(|(n, _)| n).collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(row.get("a"), Some(&Value::Int64(3)));
        assert_eq!(row.get_or_null("missing"), &Value::Null);
    }
}
