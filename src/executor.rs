//! Execution and schema collaborators.
//!
//! sleet compiles statements and reconstructs results; running statements
//! against the warehouse and creating tables is left to implementations of
//! [`Executor`] and [`SchemaManager`].

use std::future::Future;

use sleet_core::schema::{Entity, Namespace};
use sleet_core::{CompiledStatement, Row, SleetError};

/// Phrase the warehouse uses when DML targets rows that are still in the
/// streaming buffer.
const STREAMING_BUFFER: &str = "streaming buffer";

/// Runs compiled statements.
///
/// Implementations bind every entry of [`CompiledStatement::params`] as a
/// named `@param` and return result rows keyed by column label. DML returns
/// no rows.
pub trait Executor {
    fn execute(
        &self,
        statement: &CompiledStatement,
    ) -> impl Future<Output = Result<Vec<Row>, ExecutionError>>;
}

/// Creates or verifies the backing table of an entity.
pub trait SchemaManager {
    fn ensure_table(
        &self,
        entity: &Entity,
        namespace: &Namespace,
    ) -> impl Future<Output = Result<(), ExecutionError>>;
}

/// Failure reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ExecutionError {
    pub message: String,
    /// Engine error reason code, when one is reported
    pub reason: Option<String>,
}

impl ExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Returns `true` when the statement touched rows that are still in the
    /// streaming buffer.
    pub fn is_streaming_buffer(&self) -> bool {
        self.message.to_ascii_lowercase().contains(STREAMING_BUFFER)
    }
}

impl From<ExecutionError> for SleetError {
    fn from(error: ExecutionError) -> Self {
        if error.is_streaming_buffer() {
            SleetError::EngineExecution {
                message: format!(
                    "{}: recently streamed rows cannot be modified yet, retry after the streaming buffer flushes",
                    error.message
                ),
                streaming_buffer: true,
            }
        } else {
            SleetError::EngineExecution {
                message: error.message,
                streaming_buffer: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streaming_buffer_is_retryable() {
        let error: SleetError = ExecutionError::new(
            "UPDATE or DELETE statement over table blog.users would affect rows in the streaming buffer, which is not supported",
        )
        .with_reason("invalidQuery")
        .into();
        assert!(error.is_retryable());
        assert!(error.to_string().contains("retry"));

        let error: SleetError = ExecutionError::new("Syntax error").into();
        assert!(!error.is_retryable());
        assert_eq!(error.to_string(), "Syntax error");
    }
}
