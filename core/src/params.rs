//! Parameter naming and bindings.

use compact_str::{CompactString, format_compact};
use sleet_types::Value;

/// Hands out synthetic parameter names (`param0`, `param1`, ...).
///
/// One counter is threaded through every fragment of a statement, so names
/// are unique within the statement no matter how many subtrees contribute
/// parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParamCounter {
    next: usize,
}

impl ParamCounter {
    /// Starts at `param0`.
    #[inline]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Starts at `param{n}`.
    #[inline]
    pub const fn starting_at(n: usize) -> Self {
        Self { next: n }
    }

    /// The index the next parameter will receive.
    #[inline]
    pub const fn position(&self) -> usize {
        self.next
    }

    /// Returns a fresh parameter name and advances the counter.
    pub fn next_name(&mut self) -> CompactString {
        let name = format_compact!("param{}", self.next);
        self.next += 1;
        name
    }
}

/// Ordered mapping from parameter name to bound value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(CompactString, Value)>,
}

impl Params {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Adds a binding. Names come from a [`ParamCounter`] and never repeat.
    #[inline]
    pub fn insert(&mut self, name: CompactString, value: Value) {
        debug_assert!(self.get(&name).is_none(), "duplicate parameter {name}");
        self.entries.push((name, value));
    }

    /// Looks up a binding by name (without the `@`).
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, v)| v)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates bindings in placeholder order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Parameter names in placeholder order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a (CompactString, Value);
    type IntoIter = core::slice::Iter<'a, (CompactString, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// SQL text plus the values bound to its named parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledStatement {
    pub sql: String,
    pub params: Params,
}

impl core::fmt::Display for CompiledStatement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_names_are_sequential() {
        let mut counter = ParamCounter::new();
        assert_eq!(counter.next_name(), "param0");
        assert_eq!(counter.next_name(), "param1");
        assert_eq!(counter.position(), 2);

        let mut resumed = ParamCounter::starting_at(7);
        assert_eq!(resumed.next_name(), "param7");
    }
}
