//! # twbfields
//!
//! Calculated-field metadata extraction from Tableau workbooks.
//!
//! This library reads `.twb` workbooks (or `.twbx` packaged workbooks,
//! unpacked on the fly), lists their calculated fields with name, formula
//! and data type, rewrites internal `Calculation_<digits>` references in
//! formulas to display captions, and renders the result as CSV or JSON.
//!
//! ## Quick Start
//!
//! ```no_run
//! use twbfields::{export_csv, extract_file, ExtractOptions};
//!
//! // Every calculated field of a packaged workbook
//! let fields = extract_file("dashboard.twbx", &ExtractOptions::new())?;
//! for field in &fields {
//!     println!("{}: {}", field.field_name, field.formula);
//! }
//!
//! // Full batch export with the default name prefixes
//! let options = ExtractOptions::new().with_default_prefixes();
//! export_csv("dashboard.twbx", &options, "data/output/calculated_fields.csv")?;
//! # Ok::<(), twbfields::Error>(())
//! ```
//!
//! ## Step by Step
//!
//! ```no_run
//! use twbfields::{resolve, extract::extract_fields, render::to_csv, ExtractOptions};
//!
//! let xml_path = resolve("dashboard.twbx")?; // writes dashboard.twb next to it
//! let fields = extract_fields(&xml_path, &ExtractOptions::new())?;
//! let csv = to_csv(&fields)?;
//! # Ok::<(), twbfields::Error>(())
//! ```
//!
//! ## Features
//!
//! - `sniff` (default): content-based MIME sniffing of packaged workbooks
//!   before structural ZIP validation

pub mod container;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod render;
pub mod resolve;

// Re-exports
pub use container::TwbxContainer;
pub use detect::{is_zip_archive, WorkbookFormat};
pub use error::{Error, Result};
pub use extract::{extract_fields, ExtractOptions, FieldExtractor, DEFAULT_PREFIXES};
pub use model::FieldRecord;
pub use render::OutputFormat;
pub use resolve::resolve;

use std::fs;
use std::path::Path;

/// Resolve a workbook (`.twb` or `.twbx`) and extract its calculated fields.
///
/// # Example
///
/// ```no_run
/// use twbfields::{extract_file, ExtractOptions};
///
/// let fields = extract_file("dashboard.twbx", &ExtractOptions::new().with_default_prefixes())?;
/// println!("{} calculated fields", fields.len());
/// # Ok::<(), twbfields::Error>(())
/// ```
pub fn extract_file(path: impl AsRef<Path>, options: &ExtractOptions) -> Result<Vec<FieldRecord>> {
    let xml_path = resolve(path)?;
    extract_fields(xml_path, options)
}

/// Extract a workbook's calculated fields and write them to a CSV file.
///
/// The output file's parent directory is created when absent. Returns the
/// records written.
///
/// # Example
///
/// ```no_run
/// use twbfields::{export_csv, ExtractOptions};
///
/// let options = ExtractOptions::new().with_default_prefixes();
/// let fields = export_csv("dashboard.twbx", &options, "out/fields.csv")?;
/// # Ok::<(), twbfields::Error>(())
/// ```
pub fn export_csv(
    path: impl AsRef<Path>,
    options: &ExtractOptions,
    output_file: impl AsRef<Path>,
) -> Result<Vec<FieldRecord>> {
    let records = extract_file(path, options)?;
    export_records(&records, OutputFormat::Csv, output_file)?;
    Ok(records)
}

/// Write field records to a file in the given format.
///
/// The output file's parent directory is created when absent.
pub fn export_records(
    records: &[FieldRecord],
    format: OutputFormat,
    output_file: impl AsRef<Path>,
) -> Result<()> {
    let output_file = output_file.as_ref();
    if let Some(parent) = output_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = match format {
        OutputFormat::Csv => render::to_csv(records)?,
        OutputFormat::Json => render::to_json(records, render::JsonFormat::Pretty)?,
    };
    fs::write(output_file, content)?;
    Ok(())
}
