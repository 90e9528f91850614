use compact_str::{CompactString, format_compact};
use hashbrown::HashSet;

use crate::error::{Result, SleetError};
use crate::join::{find_association, through_alias};
use crate::schema::{AssociationKind, Entity, Registry};
use crate::select::{FindOptions, Include};

/// Projected columns of one table in a select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableShape {
    pub alias: CompactString,
    pub primary_key: CompactString,
    /// Projected columns; always contains the primary key
    pub columns: Vec<CompactString>,
}

impl TableShape {
    /// Result label of `column`: `<alias>_<column>`.
    #[inline]
    pub fn label(&self, column: &str) -> CompactString {
        format_compact!("{}_{}", self.alias, column)
    }

    /// Result label of the primary key.
    #[inline]
    pub fn primary_key_label(&self) -> CompactString {
        self.label(&self.primary_key)
    }
}

/// An included association as it appears in the result graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeShape {
    pub kind: AssociationKind,
    pub table: TableShape,
}

impl IncludeShape {
    /// Field name on the parent object.
    #[inline]
    pub fn field(&self) -> &str {
        &self.table.alias
    }

    #[inline]
    pub fn is_many(&self) -> bool {
        self.kind.is_many()
    }
}

/// How flat rows of a select map back onto objects.
///
/// Shared by the select builder, which projects exactly these columns, and by
/// [`reconstruct`](super::reconstruct).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultShape {
    pub root: TableShape,
    pub includes: Vec<IncludeShape>,
}

impl ResultShape {
    /// Shape of a find on `entity` with `options`.
    pub fn resolve(registry: &Registry, entity: &Entity, options: &FindOptions) -> Result<Self> {
        Self::build(registry, entity, options.attributes.as_deref(), &options.include)
    }

    /// Shape with every root column and the given includes.
    pub fn for_includes(registry: &Registry, entity: &Entity, includes: &[Include]) -> Result<Self> {
        Self::build(registry, entity, None, includes)
    }

    fn build(
        registry: &Registry,
        entity: &Entity,
        attributes: Option<&[CompactString]>,
        includes: &[Include],
    ) -> Result<Self> {
        let root = TableShape {
            alias: entity.table().into(),
            primary_key: entity.primary_key().into(),
            columns: project(entity, attributes)?,
        };

        let mut aliases: HashSet<CompactString> = HashSet::with_capacity(includes.len() * 2 + 1);
        aliases.insert(root.alias.clone());
        let mut shapes = Vec::with_capacity(includes.len());

        for include in includes {
            let (association, target) = find_association(registry, entity, include)?;
            let alias = CompactString::from(association.alias());
            if association.kind() == AssociationKind::BelongsToMany
                && !aliases.insert(through_alias(&alias))
            {
                return Err(SleetError::AmbiguousAlias(through_alias(&alias).into()));
            }
            if !aliases.insert(alias.clone()) {
                return Err(SleetError::AmbiguousAlias(alias.into()));
            }
            shapes.push(IncludeShape {
                kind: association.kind(),
                table: TableShape {
                    alias,
                    primary_key: target.primary_key().into(),
                    columns: project(target, include.attributes.as_deref())?,
                },
            });
        }

        Ok(Self {
            root,
            includes: shapes,
        })
    }
}

/// Columns to project: the requested subset (primary key prepended when
/// absent) or every declared column.
fn project(entity: &Entity, attributes: Option<&[CompactString]>) -> Result<Vec<CompactString>> {
    let Some(attributes) = attributes else {
        return Ok(entity.column_names().map(CompactString::from).collect());
    };
    let mut columns = Vec::with_capacity(attributes.len() + 1);
    if !attributes.iter().any(|a| a == entity.primary_key()) {
        columns.push(CompactString::from(entity.primary_key()));
    }
    for attribute in attributes {
        if !entity.has_attribute(attribute) {
            return Err(SleetError::UnknownAttribute {
                entity: entity.name().to_string(),
                attribute: attribute.to_string(),
            });
        }
        if !columns.contains(attribute) {
            columns.push(attribute.clone());
        }
    }
    Ok(columns)
}
