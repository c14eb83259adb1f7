//! Namespace-agnostic scan of workbook column elements.

use crate::error::{Error, Result};
use quick_xml::escape::unescape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;

const COLUMN_TAG: &[u8] = b"column";
const CALCULATION_TAG: &[u8] = b"calculation";

/// Strip any namespace qualifier from a tag name.
///
/// Handles both prefixed names (`t:column`) and Clark notation
/// (`{http://...}column`).
pub fn local_name(qualified: &[u8]) -> &[u8] {
    let start = qualified
        .iter()
        .rposition(|&b| b == b':' || b == b'}')
        .map_or(0, |pos| pos + 1);
    &qualified[start..]
}

/// A `<column>` element as found in the workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnElement {
    /// `name` attribute (internal identifier)
    pub name: Option<String>,
    /// `caption` attribute (display name)
    pub caption: Option<String>,
    /// `datatype` attribute
    pub datatype: Option<String>,
    /// `formula` of the first direct `<calculation>` child.
    ///
    /// `None` when there is no such child, `Some("")` when the child has no
    /// `formula` attribute.
    pub formula: Option<String>,
}

impl ColumnElement {
    /// Whether the column is a calculated field.
    pub fn is_calculated(&self) -> bool {
        self.formula.is_some()
    }

    /// Non-empty caption.
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref().filter(|c| !c.is_empty())
    }

    /// Caption if non-empty, else non-empty name.
    pub fn display_name(&self) -> Option<&str> {
        self.caption()
            .or_else(|| self.name.as_deref().filter(|n| !n.is_empty()))
    }
}

/// Scan every `<column>` element in document order.
///
/// Columns nested at any depth are returned, in the order their start tags
/// appear. The whole document is validated as well-formed while scanning.
pub fn scan_columns(xml: &str) -> Result<Vec<ColumnElement>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut columns = Vec::new();
    // One frame per open element; column frames carry their index
    let mut open: Vec<Option<usize>> = Vec::new();
    let mut seen_root = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                check_root(&open, &mut seen_root)?;
                let frame = visit_element(&e, open.last().copied().flatten(), &mut columns)?;
                open.push(frame);
            }
            Ok(Event::Empty(e)) => {
                check_root(&open, &mut seen_root)?;
                visit_element(&e, open.last().copied().flatten(), &mut columns)?;
            }
            Ok(Event::End(_)) => {
                open.pop();
            }
            Ok(Event::Text(e)) if open.is_empty() => {
                return Err(Error::MalformedInput(format!(
                    "text outside the root element at position {}: {:?}",
                    reader.buffer_position(),
                    String::from_utf8_lossy(&e)
                )));
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::MalformedInput(format!(
                    "error at position {}: {}",
                    reader.error_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    if !seen_root {
        return Err(Error::MalformedInput("document has no root element".to_string()));
    }
    if !open.is_empty() {
        return Err(Error::MalformedInput(format!(
            "unexpected end of document: {} element(s) left open",
            open.len()
        )));
    }

    Ok(columns)
}

fn check_root(open: &[Option<usize>], seen_root: &mut bool) -> Result<()> {
    if open.is_empty() {
        if *seen_root {
            return Err(Error::MalformedInput(
                "more than one root element".to_string(),
            ));
        }
        *seen_root = true;
    }
    Ok(())
}

/// Handle one element start. Returns the column index when it opens a column.
fn visit_element(
    e: &BytesStart<'_>,
    parent_column: Option<usize>,
    columns: &mut Vec<ColumnElement>,
) -> Result<Option<usize>> {
    let name = e.name();
    let tag = local_name(name.as_ref());

    if tag == CALCULATION_TAG {
        if let Some(index) = parent_column {
            if columns[index].formula.is_none() {
                let formula = attribute(e, b"formula")?.unwrap_or_default();
                columns[index].formula = Some(formula);
            }
        }
        return Ok(None);
    }

    if tag == COLUMN_TAG {
        let mut column = ColumnElement::default();
        for attr in e.attributes() {
            let attr = attr?;
            match attr.key.as_ref() {
                b"name" => column.name = Some(attribute_value(&attr)?),
                b"caption" => column.caption = Some(attribute_value(&attr)?),
                b"datatype" => column.datatype = Some(attribute_value(&attr)?),
                _ => {}
            }
        }
        columns.push(column);
        return Ok(Some(columns.len() - 1));
    }

    Ok(None)
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attribute_value(&attr)?));
        }
    }
    Ok(None)
}

/// Decode an attribute value as an XML processor reports it.
///
/// Literal line breaks and tabs become single spaces before entities are
/// expanded, so `&#10;` still yields a newline while a raw newline does not.
fn attribute_value(attr: &Attribute<'_>) -> Result<String> {
    let raw = std::str::from_utf8(&attr.value)
        .map_err(|e| Error::MalformedInput(format!("attribute value: {}", e)))?;
    let normalized = normalize_whitespace(raw);
    let value = unescape(&normalized).map_err(|e| Error::MalformedInput(e.to_string()))?;
    Ok(value.into_owned())
}

fn normalize_whitespace(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['\t', '\n', '\r']) {
        return Cow::Borrowed(raw);
    }
    Cow::Owned(raw.replace("\r\n", " ").replace(['\t', '\n', '\r'], " "))
}
