use thiserror::Error;

#[derive(Debug, Error)]
pub enum SleetError {
    /// A filter tree node has a shape the compiler cannot interpret
    #[error("Invalid filter shape at '{path}': {reason}")]
    InvalidFilterShape { path: String, reason: String },

    /// An operator key is not in the operator table
    #[error("Invalid operator '{operator}' on column '{column}'")]
    InvalidOperator { column: String, operator: String },

    /// An include names an alias/target pair with no registered association
    #[error("No association '{alias}' from '{host}' to '{target}'")]
    AssociationNotFound {
        host: String,
        target: String,
        alias: String,
    },

    /// A belongsToMany association lacks its through entity or other key
    #[error("Association '{alias}' on '{host}' is belongsToMany but has no {missing}")]
    MissingThroughModel {
        host: String,
        alias: String,
        missing: &'static str,
    },

    /// An entity name is not defined in the registry
    #[error("Unknown entity '{0}'")]
    UnknownEntity(String),

    /// An entity with the same name is already defined
    #[error("Entity '{0}' is already defined")]
    DuplicateEntity(String),

    /// An association alias is already taken on the owning entity, by another
    /// association or by a column
    #[error("Alias '{alias}' is already used by an association or attribute on '{entity}'")]
    DuplicateAlias { entity: String, alias: String },

    /// A referenced column is not a declared attribute
    #[error("Unknown attribute '{attribute}' on '{entity}'")]
    UnknownAttribute { entity: String, attribute: String },

    /// Insert or update called without any values
    #[error("Statement on '{0}' has no values")]
    NoValues(String),

    /// Two tables in one statement share an alias
    #[error("Alias '{0}' is used by more than one table in the statement")]
    AmbiguousAlias(String),

    /// A row is missing a column the result shape expects
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Failure reported by the execution collaborator
    #[error("{message}")]
    EngineExecution {
        message: String,
        /// The target rows are still in the streaming buffer and not yet
        /// available to DML
        streaming_buffer: bool,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SleetError {
    /// Returns `true` for errors that may succeed when retried later.
    ///
    /// Only the streaming-buffer condition qualifies. Compilation errors are
    /// programming errors and never retryable.
    #[inline]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            SleetError::EngineExecution {
                streaming_buffer: true,
                ..
            }
        )
    }

    pub(crate) fn shape(path: impl Into<String>, reason: impl Into<String>) -> Self {
        SleetError::InvalidFilterShape {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for compilation and execution
pub type Result<T> = std::result::Result<T, SleetError>;
