//! Extraction options configuration.

/// Name prefixes kept by default: the naming convention used for KPI,
/// helper, parameter, filter, date, auxiliary, format and variable fields.
pub const DEFAULT_PREFIXES: [&str; 8] = [
    "kpi_", "hp_", "prmt_", "filter_", "dt_", "aux_", "fmt_", "var_",
];

/// Options for extracting calculated fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Keep only fields whose display name starts with one of these.
    ///
    /// `None` or an empty list keeps every field.
    pub prefixes: Option<Vec<String>>,
}

impl ExtractOptions {
    /// Create options that keep every calculated field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only fields starting with one of `prefixes`.
    pub fn with_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes = Some(prefixes.into_iter().map(Into::into).collect());
        self
    }

    /// Keep only fields starting with one of [`DEFAULT_PREFIXES`].
    pub fn with_default_prefixes(self) -> Self {
        self.with_prefixes(DEFAULT_PREFIXES)
    }

    /// Drop any prefix filter.
    pub fn without_filter(mut self) -> Self {
        self.prefixes = None;
        self
    }

    /// Whether a prefix filter is active.
    pub fn is_filtered(&self) -> bool {
        self.prefixes.as_ref().is_some_and(|p| !p.is_empty())
    }

    /// Whether a resolved display name passes the prefix filter.
    pub fn matches(&self, field_name: &str) -> bool {
        match &self.prefixes {
            Some(prefixes) if !prefixes.is_empty() => {
                prefixes.iter().any(|p| field_name.starts_with(p.as_str()))
            }
            _ => true,
        }
    }
}
