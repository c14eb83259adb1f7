//! JSON renderer implementation.

use crate::error::{Error, Result};
use crate::model::FieldRecord;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Convert field records to a JSON array.
pub fn to_json(records: &[FieldRecord], format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Compact => serde_json::to_string(records),
        JsonFormat::Pretty => serde_json::to_string_pretty(records),
    };
    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
