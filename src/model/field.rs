//! Field record model structures.

use serde::{Deserialize, Serialize};

/// Data type reported for a column without a `datatype` attribute.
pub const UNKNOWN_DATATYPE: &str = "unknown";

/// Metadata of one calculated field.
///
/// Field order matches the CSV header: `field_name,formula,datasource`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRecord {
    /// Display name with enclosing brackets stripped
    pub field_name: String,

    /// Formula with calculation tokens replaced by captions
    pub formula: String,

    /// Column data type (`datatype` attribute), or `"unknown"`
    pub datasource: String,
}

impl FieldRecord {
    /// Create a new field record.
    pub fn new(
        field_name: impl Into<String>,
        formula: impl Into<String>,
        datasource: impl Into<String>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            formula: formula.into(),
            datasource: datasource.into(),
        }
    }
}
