use compact_str::CompactString;
use sleet_types::DataType;

use super::Association;

/// Default primary-key column.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// A declared column of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: CompactString,
    pub data_type: DataType,
}

/// Immutable description of an entity: its table, primary key, attributes in
/// declaration order, and the associations wired onto it.
///
/// ```
/// use sleet_core::schema::Entity;
/// use sleet_types::DataType;
///
/// let user = Entity::builder("User")
///     .table("users")
///     .attribute("name", DataType::String)
///     .build();
/// assert_eq!(user.primary_key(), "id");
/// assert_eq!(user.column_names().collect::<Vec<_>>(), ["id", "name"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    name: CompactString,
    table: CompactString,
    primary_key: CompactString,
    attributes: Vec<Attribute>,
    pub(super) associations: Vec<Association>,
}

impl Entity {
    pub fn builder(name: impl Into<CompactString>) -> EntityBuilder {
        EntityBuilder {
            name: name.into(),
            table: None,
            primary_key: CompactString::const_new(DEFAULT_PRIMARY_KEY),
            attributes: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[inline]
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    #[inline]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    #[inline]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    #[inline]
    pub fn associations(&self) -> &[Association] {
        &self.associations
    }

    /// Association registered under `alias`.
    pub fn association(&self, alias: &str) -> Option<&Association> {
        self.associations.iter().find(|a| a.alias() == alias)
    }
}

/// Builder for [`Entity`].
#[derive(Debug, Clone)]
pub struct EntityBuilder {
    name: CompactString,
    table: Option<CompactString>,
    primary_key: CompactString,
    attributes: Vec<Attribute>,
}

impl EntityBuilder {
    /// Table name. Defaults to the entity name.
    pub fn table(mut self, table: impl Into<CompactString>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Primary-key column. Defaults to `id`.
    pub fn primary_key(mut self, column: impl Into<CompactString>) -> Self {
        self.primary_key = column.into();
        self
    }

    /// Declares a column. Redeclaring a column replaces its type in place.
    pub fn attribute(mut self, name: impl Into<CompactString>, data_type: DataType) -> Self {
        let name = name.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.data_type = data_type,
            None => self.attributes.push(Attribute { name, data_type }),
        }
        self
    }

    /// Finishes the entity. An undeclared primary key is added as the first
    /// column with type `INT64`.
    pub fn build(self) -> Entity {
        let mut attributes = self.attributes;
        if !attributes.iter().any(|a| a.name == self.primary_key) {
            attributes.insert(
                0,
                Attribute {
                    name: self.primary_key.clone(),
                    data_type: DataType::Int64,
                },
            );
        }
        Entity {
            table: self.table.unwrap_or_else(|| self.name.clone()),
            name: self.name,
            primary_key: self.primary_key,
            attributes,
            associations: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_primary_key_keeps_its_position() {
        let tag = Entity::builder("Tag")
            .primary_key("slug")
            .attribute("label", DataType::String)
            .attribute("slug", DataType::String)
            .build();
        assert_eq!(tag.table(), "Tag");
        assert_eq!(tag.column_names().collect::<Vec<_>>(), ["label", "slug"]);
        assert_eq!(tag.attribute("slug").unwrap().data_type, DataType::String);
    }

    #[test]
    fn redeclared_attribute_replaces_type() {
        let e = Entity::builder("E")
            .attribute("n", DataType::String)
            .attribute("n", DataType::Int64)
            .build();
        assert_eq!(e.attributes().len(), 2);
        assert_eq!(e.attribute("n").unwrap().data_type, DataType::Int64);
    }
}
