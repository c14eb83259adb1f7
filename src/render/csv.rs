//! CSV renderer implementation.

use crate::error::{Error, Result};
use crate::model::FieldRecord;
use std::io::Write;

/// Header row written before the records.
pub const CSV_HEADER: [&str; 3] = ["field_name", "formula", "datasource"];

/// Write field records as UTF-8 CSV with a header row.
///
/// The header is written even when there are no records.
pub fn write_csv<W: Write>(records: &[FieldRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(CSV_HEADER)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Convert field records to a CSV string.
pub fn to_csv(records: &[FieldRecord]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| Error::Render(format!("CSV is not UTF-8: {}", e)))
}
