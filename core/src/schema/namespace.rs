use compact_str::{CompactString, format_compact};

/// Project and dataset that table names are qualified with.
///
/// ```
/// use sleet_core::schema::Namespace;
///
/// let ns = Namespace::new().project("acme-prod").dataset("sales");
/// assert_eq!(ns.qualify("orders"), "acme-prod.sales.orders");
/// assert_eq!(Namespace::new().qualify("orders"), "orders");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace {
    project: Option<CompactString>,
    dataset: Option<CompactString>,
}

impl Namespace {
    pub const fn new() -> Self {
        Self {
            project: None,
            dataset: None,
        }
    }

    pub fn project(mut self, project: impl Into<CompactString>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn dataset(mut self, dataset: impl Into<CompactString>) -> Self {
        self.dataset = Some(dataset.into());
        self
    }

    /// Path of `table`, rendered later as a single quoted identifier.
    /// A project without a dataset is ignored.
    pub fn qualify(&self, table: &str) -> CompactString {
        match (&self.project, &self.dataset) {
            (Some(project), Some(dataset)) => format_compact!("{project}.{dataset}.{table}"),
            (None, Some(dataset)) => format_compact!("{dataset}.{table}"),
            _ => CompactString::from(table),
        }
    }
}
