//! Calculated field extraction from workbook XML.
//!
//! Extraction runs in two passes over every `<column>` element, matched by
//! local tag name whatever the namespace prefix:
//!
//! 1. every column whose `name` holds a `Calculation_<digits>` token and
//!    that has a caption contributes `token -> caption` to a [`TokenMap`];
//! 2. every column with a `<calculation>` child becomes a [`FieldRecord`]
//!    named by its caption (or resolved token) with formula references
//!    rewritten to captions.
//!
//! # Example
//!
//! ```
//! use twbfields::extract::{extract_fields_from_str, ExtractOptions};
//!
//! let xml = r#"<workbook>
//!   <column name="[Calculation_1]" caption="kpi_Revenue">
//!     <calculation formula="[Calculation_2]*2"/>
//!   </column>
//!   <column name="[Calculation_2]" caption="Base Cost">
//!     <calculation formula="100"/>
//!   </column>
//! </workbook>"#;
//!
//! let options = ExtractOptions::new().with_prefixes(["kpi_"]);
//! let fields = extract_fields_from_str(xml, &options)?;
//! assert_eq!(fields.len(), 1);
//! assert_eq!(fields[0].formula, "[Base Cost]*2");
//! # Ok::<(), twbfields::Error>(())
//! ```
//!
//! [`FieldRecord`]: crate::model::FieldRecord

mod extractor;
mod options;
mod tokens;
mod xml;

pub use extractor::{build_token_map, extract_fields, extract_fields_from_str, FieldExtractor};
pub use options::{ExtractOptions, DEFAULT_PREFIXES};
pub use tokens::{extract_token, strip_brackets, TokenMap, TOKEN_PREFIX};
pub use xml::{local_name, scan_columns, ColumnElement};
