use compact_str::CompactString;

/// The kind of relationship between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociationKind {
    /// The host holds the foreign key: `host.fk = target.pk`
    BelongsTo,
    /// The target holds the foreign key, at most one target row
    HasOne,
    /// The target holds the foreign key, any number of target rows
    HasMany,
    /// Rows are linked through a join entity
    BelongsToMany,
}

impl AssociationKind {
    /// `true` when the association yields a sequence rather than one object.
    #[inline]
    pub const fn is_many(&self) -> bool {
        matches!(self, AssociationKind::HasMany | AssociationKind::BelongsToMany)
    }
}

/// A declared relationship from an owning entity to a target entity.
///
/// Targets and through entities are referenced by entity name and resolved
/// through the [`Registry`](super::Registry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    kind: AssociationKind,
    target: CompactString,
    foreign_key: CompactString,
    other_key: Option<CompactString>,
    through: Option<CompactString>,
    alias: Option<CompactString>,
}

impl Association {
    fn new(kind: AssociationKind, target: CompactString, foreign_key: CompactString) -> Self {
        Self {
            kind,
            target,
            foreign_key,
            other_key: None,
            through: None,
            alias: None,
        }
    }

    /// `foreign_key` is a column of the owning entity.
    pub fn belongs_to(target: impl Into<CompactString>, foreign_key: impl Into<CompactString>) -> Self {
        Self::new(AssociationKind::BelongsTo, target.into(), foreign_key.into())
    }

    /// `foreign_key` is a column of the target entity.
    pub fn has_one(target: impl Into<CompactString>, foreign_key: impl Into<CompactString>) -> Self {
        Self::new(AssociationKind::HasOne, target.into(), foreign_key.into())
    }

    /// `foreign_key` is a column of the target entity.
    pub fn has_many(target: impl Into<CompactString>, foreign_key: impl Into<CompactString>) -> Self {
        Self::new(AssociationKind::HasMany, target.into(), foreign_key.into())
    }

    /// `foreign_key` is the through entity's column pointing at the owner.
    /// Requires [`through`](Self::through) and [`other_key`](Self::other_key).
    pub fn belongs_to_many(
        target: impl Into<CompactString>,
        foreign_key: impl Into<CompactString>,
    ) -> Self {
        Self::new(AssociationKind::BelongsToMany, target.into(), foreign_key.into())
    }

    /// Join entity for belongsToMany.
    pub fn through(mut self, entity: impl Into<CompactString>) -> Self {
        self.through = Some(entity.into());
        self
    }

    /// The through entity's column pointing at the target.
    pub fn other_key(mut self, column: impl Into<CompactString>) -> Self {
        self.other_key = Some(column.into());
        self
    }

    /// Name of the association within the owner. Defaults to the target's
    /// table name when registered.
    pub fn with_alias(mut self, alias: impl Into<CompactString>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[inline]
    pub const fn kind(&self) -> AssociationKind {
        self.kind
    }

    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[inline]
    pub fn foreign_key(&self) -> &str {
        &self.foreign_key
    }

    #[inline]
    pub fn other_key_column(&self) -> Option<&str> {
        self.other_key.as_deref()
    }

    #[inline]
    pub fn through_entity(&self) -> Option<&str> {
        self.through.as_deref()
    }

    /// The alias. Empty only before registration assigns the default.
    #[inline]
    pub fn alias(&self) -> &str {
        self.alias.as_deref().unwrap_or_default()
    }

    pub(crate) fn set_default_alias(&mut self, alias: &str) {
        if self.alias.is_none() {
            self.alias = Some(alias.into());
        }
    }
}
