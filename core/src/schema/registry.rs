use compact_str::CompactString;
use hashbrown::HashMap;

use super::{Association, AssociationKind, Entity, Namespace};
use crate::error::{Result, SleetError};

/// Entity and association definitions for one session.
///
/// Populated once by [`define`](Self::define) and
/// [`associate`](Self::associate), then shared immutably by every compile
/// call.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entities: HashMap<CompactString, Entity>,
    namespace: Namespace,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose tables are qualified by `namespace`.
    pub fn with_namespace(namespace: Namespace) -> Self {
        Self {
            entities: HashMap::new(),
            namespace,
        }
    }

    #[inline]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Registers an entity under its name.
    pub fn define(&mut self, entity: Entity) -> Result<&Entity> {
        let name = CompactString::from(entity.name());
        if self.entities.contains_key(&name) {
            return Err(SleetError::DuplicateEntity(name.into()));
        }
        Ok(self.entities.entry(name).or_insert(entity))
    }

    /// Wires `association` onto `owner`.
    ///
    /// Validates that the target (and through entity) exist, that every key
    /// column is declared where it must live, and that the alias is free: not
    /// taken by another association nor by one of the owner's columns. An
    /// unset alias defaults to the target's table name.
    pub fn associate(&mut self, owner: &str, mut association: Association) -> Result<&Association> {
        let host = self.entity(owner)?;
        let target = self.entity(association.target())?;
        association.set_default_alias(target.table());

        match association.kind() {
            AssociationKind::BelongsTo => {
                require_column(host, association.foreign_key())?;
            }
            AssociationKind::HasOne | AssociationKind::HasMany => {
                require_column(target, association.foreign_key())?;
            }
            AssociationKind::BelongsToMany => {
                let (through, other_key) = self.through_parts(owner, &association)?;
                require_column(through, association.foreign_key())?;
                require_column(through, other_key)?;
            }
        }

        // Records carry columns and includes side by side
        if host.association(association.alias()).is_some() || host.has_attribute(association.alias()) {
            return Err(SleetError::DuplicateAlias {
                entity: owner.to_string(),
                alias: association.alias().to_string(),
            });
        }

        let host = self
            .entities
            .get_mut(owner)
            .ok_or_else(|| SleetError::UnknownEntity(owner.to_string()))?;
        let index = host.associations.len();
        host.associations.push(association);
        Ok(&host.associations[index])
    }

    /// Looks up an entity by name.
    pub fn entity(&self, name: &str) -> Result<&Entity> {
        self.entities
            .get(name)
            .ok_or_else(|| SleetError::UnknownEntity(name.to_string()))
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    /// All entities, in no particular order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Resolves the through entity and other key of a belongsToMany
    /// association.
    pub fn through_parts<'r, 'a>(
        &'r self,
        owner: &str,
        association: &'a Association,
    ) -> Result<(&'r Entity, &'a str)> {
        let missing = |missing| SleetError::MissingThroughModel {
            host: owner.to_string(),
            alias: association.alias().to_string(),
            missing,
        };
        let through = association.through_entity().ok_or_else(|| missing("through entity"))?;
        let other_key = association.other_key_column().ok_or_else(|| missing("other key"))?;
        Ok((self.entity(through)?, other_key))
    }
}

fn require_column(entity: &Entity, column: &str) -> Result<()> {
    if entity.has_attribute(column) {
        Ok(())
    } else {
        Err(SleetError::UnknownAttribute {
            entity: entity.name().to_string(),
            attribute: column.to_string(),
        })
    }
}
