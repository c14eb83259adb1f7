//! Calculated field extraction.

use crate::container::decode_xml_bytes;
use crate::error::Result;
use crate::model::{FieldRecord, UNKNOWN_DATATYPE};
use std::fs;
use std::path::Path;
use tracing::debug;

use super::options::ExtractOptions;
use super::tokens::{extract_token, strip_brackets, TokenMap};
use super::xml::{scan_columns, ColumnElement};

/// Extractor over the columns of one parsed workbook document.
///
/// The token map is built from every column before any record is emitted,
/// so formulas may reference calculations defined later in the document.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    columns: Vec<ColumnElement>,
    tokens: TokenMap,
}

impl FieldExtractor {
    /// Parse a plain XML workbook file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        let xml = decode_xml_bytes(&bytes)?;
        Self::from_str(&xml)
    }

    /// Parse workbook XML text.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(xml: &str) -> Result<Self> {
        let columns = scan_columns(xml)?;
        let tokens = build_token_map(&columns);
        debug!(
            "Scanned {} columns, {} calculation tokens captioned",
            columns.len(),
            tokens.len()
        );
        Ok(Self { columns, tokens })
    }

    /// All column elements, in document order.
    pub fn columns(&self) -> &[ColumnElement] {
        &self.columns
    }

    /// Token to caption mapping for the whole document.
    pub fn token_map(&self) -> &TokenMap {
        &self.tokens
    }

    /// Emit field records for calculated columns passing the prefix filter.
    pub fn extract(&self, options: &ExtractOptions) -> Vec<FieldRecord> {
        let records: Vec<FieldRecord> = self
            .columns
            .iter()
            .filter_map(|column| self.field_record(column, options))
            .collect();
        debug!("Kept {} calculated fields", records.len());
        records
    }

    fn field_record(&self, column: &ColumnElement, options: &ExtractOptions) -> Option<FieldRecord> {
        let formula = column.formula.as_deref()?;
        let raw_name = column.display_name()?;

        let field_name = self.tokens.resolve_name(strip_brackets(raw_name));
        if !options.matches(field_name) {
            return None;
        }

        Some(FieldRecord::new(
            field_name,
            self.tokens.rewrite_formula(formula),
            column.datatype.as_deref().unwrap_or(UNKNOWN_DATATYPE),
        ))
    }
}

/// Map every captioned column carrying a calculation token.
///
/// Calculated or not, filtered or not: any column may be referenced from a
/// kept formula.
pub fn build_token_map(columns: &[ColumnElement]) -> TokenMap {
    let mut map = TokenMap::new();
    for column in columns {
        let token = column.name.as_deref().and_then(extract_token);
        if let (Some(token), Some(caption)) = (token, column.caption()) {
            map.insert(token, caption);
        }
    }
    map
}

/// Extract calculated fields from a plain XML workbook file.
///
/// # Example
///
/// ```no_run
/// use twbfields::extract::{extract_fields, ExtractOptions};
///
/// let options = ExtractOptions::new().with_prefixes(["kpi_", "prmt_"]);
/// for field in extract_fields("dashboard.twb", &options)? {
///     println!("{} = {}", field.field_name, field.formula);
/// }
/// # Ok::<(), twbfields::Error>(())
/// ```
pub fn extract_fields(
    xml_path: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<Vec<FieldRecord>> {
    Ok(FieldExtractor::open(xml_path)?.extract(options))
}

/// Extract calculated fields from workbook XML text.
pub fn extract_fields_from_str(xml: &str, options: &ExtractOptions) -> Result<Vec<FieldRecord>> {
    Ok(FieldExtractor::from_str(xml)?.extract(options))
}
