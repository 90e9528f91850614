use compact_str::CompactString;
use serde::ser::{Serialize, SerializeMap, Serializer};
use sleet_types::Value;

/// One field of a reconstructed object.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// A column value
    Value(Value),
    /// A singleton association; `None` when no related row matched
    One(Option<Box<Record>>),
    /// A collection association, in first-seen order
    Many(Vec<Record>),
}

/// A reconstructed object: fields in projection order, then includes in
/// request order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(CompactString, Field)>,
}

impl Record {
    #[inline]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: impl Into<CompactString>, field: Field) {
        self.fields.push((name.into(), field));
    }

    pub(crate) fn field_at_mut(&mut self, index: usize) -> Option<&mut Field> {
        self.fields.get_mut(index).map(|(_, f)| f)
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    /// Column value of `name`.
    pub fn value(&self, name: &str) -> Option<&Value> {
        match self.get(name)? {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Singleton association `name`, `None` when absent or unmatched.
    pub fn one(&self, name: &str) -> Option<&Record> {
        match self.get(name)? {
            Field::One(r) => r.as_deref(),
            _ => None,
        }
    }

    /// Collection association `name`, empty when absent.
    pub fn many(&self, name: &str) -> &[Record] {
        match self.get(name) {
            Some(Field::Many(records)) => records,
            _ => &[],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(n, f)| (n.as_str(), f))
    }

    /// JSON object with fields in record order.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .fields
            .iter()
            .map(|(name, field)| {
                let value = match field {
                    Field::Value(v) => v.to_json(),
                    Field::One(None) => serde_json::Value::Null,
                    Field::One(Some(r)) => r.to_json(),
                    Field::Many(records) => {
                        serde_json::Value::Array(records.iter().map(Record::to_json).collect())
                    }
                };
                (name.to_string(), value)
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Value(v) => v.serialize(serializer),
            Field::One(r) => r.serialize(serializer),
            Field::Many(records) => records.serialize(serializer),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, field) in &self.fields {
            map.serialize_entry(name.as_str(), field)?;
        }
        map.end()
    }
}
