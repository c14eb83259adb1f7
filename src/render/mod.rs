//! Output rendering for field records.
//!
//! # Example
//!
//! ```
//! use twbfields::model::FieldRecord;
//! use twbfields::render::{to_csv, to_json, JsonFormat};
//!
//! let records = vec![FieldRecord::new("kpi_Revenue", "[Base Cost]*2", "real")];
//!
//! let csv = to_csv(&records)?;
//! assert!(csv.starts_with("field_name,formula,datasource\n"));
//!
//! let json = to_json(&records, JsonFormat::Compact)?;
//! assert!(json.starts_with('['));
//! # Ok::<(), twbfields::Error>(())
//! ```

mod csv;
mod json;

pub use self::csv::{to_csv, write_csv, CSV_HEADER};
pub use self::json::{to_json, JsonFormat};

/// File format of an exported field list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated values with a header row
    #[default]
    Csv,
    /// JSON array of records
    Json,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}
