//! Result-graph reconstruction.
//!
//! A select with includes returns one flat row per combination of matched
//! related rows. [`reconstruct`] folds those rows back into one [`Record`] per
//! distinct root primary key, with singleton includes as nested objects and
//! collection includes as de-duplicated lists.

mod record;
mod shape;

use std::hash::{Hash, Hasher};

use hashbrown::{HashMap, HashSet};
use sleet_types::Value;

pub use record::{Field, Record};
pub use shape::{IncludeShape, ResultShape, TableShape};

use crate::row::Row;

/// Folds flat `rows` into objects according to `shape`.
///
/// Without includes every row maps to one record. With includes, rows are
/// grouped by the root primary key in first-seen order; rows whose root key
/// is null are dropped. Collection members are de-duplicated by their own
/// primary key. A singleton include takes the value of the last row in which
/// it is non-null.
pub fn reconstruct(rows: &[Row], shape: &ResultShape) -> Vec<Record> {
    if shape.includes.is_empty() {
        return rows.iter().map(|row| project(row, &shape.root)).collect();
    }

    let root_key = shape.root.primary_key_label();
    let include_keys: Vec<_> = shape
        .includes
        .iter()
        .map(|include| include.table.primary_key_label())
        .collect();
    let offset = shape.root.columns.len();

    let mut index: HashMap<Key, usize> = HashMap::with_capacity(rows.len());
    let mut groups: Vec<Group> = Vec::new();

    for row in rows {
        let pk = row.get_or_null(&root_key);
        if pk.is_null() {
            continue;
        }

        let slot = *index.entry(Key(pk.clone())).or_insert_with(|| {
            groups.push(Group::new(row, shape));
            groups.len() - 1
        });
        let group = &mut groups[slot];

        for (i, include) in shape.includes.iter().enumerate() {
            let pk = row.get_or_null(&include_keys[i]);
            if pk.is_null() {
                continue;
            }
            let Some(field) = group.record.field_at_mut(offset + i) else {
                continue;
            };
            match field {
                Field::Many(members) => {
                    if group.seen[i].insert(Key(pk.clone())) {
                        members.push(project(row, &include.table));
                    }
                }
                Field::One(current) => {
                    *current = Some(Box::new(project(row, &include.table)));
                }
                Field::Value(_) => {}
            }
        }
    }

    groups.into_iter().map(|g| g.record).collect()
}

/// A root object under construction and the member keys seen per include.
struct Group {
    record: Record,
    seen: Vec<HashSet<Key>>,
}

impl Group {
    fn new(row: &Row, shape: &ResultShape) -> Self {
        let mut record = project(row, &shape.root);
        for include in &shape.includes {
            let empty = if include.is_many() {
                Field::Many(Vec::new())
            } else {
                Field::One(None)
            };
            record.push(include.field(), empty);
        }
        Self {
            record,
            seen: vec![HashSet::new(); shape.includes.len()],
        }
    }
}

/// Reads the columns of one table out of a flat row. Missing cells are null.
fn project(row: &Row, table: &TableShape) -> Record {
    let mut record = Record::with_capacity(table.columns.len());
    for column in &table.columns {
        let value = row.get_or_null(&table.label(column)).clone();
        record.push(column.clone(), Field::Value(value));
    }
    record
}

/// Primary key wrapper usable as a hash key. Floats compare by bit pattern.
#[derive(Debug, Clone)]
struct Key(Value);

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        same_value(&self.0, &other.0)
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_value(&self.0, state);
    }
}

fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Float64(x), Value::Float64(y)) => x.to_bits() == y.to_bits(),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| same_value(a, b))
        }
        _ => a == b,
    }
}

fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    std::mem::discriminant(value).hash(state);
    match value {
        Value::Null => {}
        Value::Bool(b) => b.hash(state),
        Value::Int64(i) => i.hash(state),
        Value::Float64(f) => f.to_bits().hash(state),
        Value::String(s) => s.hash(state),
        Value::Bytes(b) => b.hash(state),
        Value::Array(items) => {
            items.len().hash(state);
            for item in items {
                hash_value(item, state);
            }
        }
    }
}
