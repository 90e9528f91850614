//! Tracing utilities for statement compilation and execution observability.
//!
//! Enable the `tracing` feature to emit spans and events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]` boilerplate
//! at every call site.

/// Emit a debug-level tracing event with the SQL text and parameter count.
///
/// ```ignore
/// sleet_trace_query!("select", &statement.sql, statement.params.len());
/// ```
#[macro_export]
macro_rules! sleet_trace_query {
    ($kind:expr, $sql:expr, $param_count:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(kind = $kind, sql = %$sql, params = $param_count, "sleet.compile");
    };
}

/// Emit a tracing event for the outcome of an executed statement.
///
/// ```ignore
/// sleet_trace_exec!(ok, "select", rows.len());
/// sleet_trace_exec!(err, "update", &error);
/// ```
#[macro_export]
macro_rules! sleet_trace_exec {
    (ok, $kind:expr, $rows:expr) => {
        #[cfg(feature = "tracing")]
        tracing::info!(kind = $kind, rows = $rows, "sleet.execute");
    };
    (err, $kind:expr, $error:expr) => {
        #[cfg(feature = "tracing")]
        tracing::warn!(kind = $kind, error = %$error, "sleet.execute");
    };
}
