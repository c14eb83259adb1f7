//! ZIP container abstraction for packaged Tableau workbooks.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;

/// Extension of the workbook document inside a packaged workbook.
pub const WORKBOOK_ENTRY_EXTENSION: &str = ".twb";

/// Rewrite a UTF-16 encoding declaration to UTF-8.
///
/// Once UTF-16 bytes are decoded into a Rust `String`, the declaration no
/// longer describes the text and quick-xml would misread it.
fn fix_xml_encoding_declaration(content: &str) -> String {
    if content.starts_with("<?xml") {
        if let Some(end_decl) = content.find("?>") {
            let decl = &content[..end_decl + 2];
            let rest = &content[end_decl + 2..];

            let fixed_decl = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");

            return format!("{}{}", fixed_decl, rest);
        }
    }
    content.to_string()
}

/// Decode XML bytes handling different encodings (UTF-8, UTF-16 LE/BE).
///
/// Tableau writes UTF-8, but re-saved or hand-edited workbooks may carry a
/// BOM or be UTF-16 encoded.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if bytes.len() >= 3 && bytes[0] == 0xEF && bytes[1] == 0xBB && bytes[2] == 0xBF {
        return String::from_utf8(bytes[3..].to_vec())
            .map_err(|e| Error::MalformedInput(e.to_string()));
    }

    if bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] == 0xFE {
        let content = decode_utf16_le(&bytes[2..])?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let content = decode_utf16_be(&bytes[2..])?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        Err(_) => {
            // ASCII markup in UTF-16 leaves a zero in every other byte
            if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 {
                decode_utf16_le(bytes).map(|s| fix_xml_encoding_declaration(&s))
            } else if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 {
                decode_utf16_be(bytes).map(|s| fix_xml_encoding_declaration(&s))
            } else {
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

fn decode_utf16_le(bytes: &[u8]) -> Result<String> {
    let len = bytes.len() & !1;

    let u16_iter = (0..len)
        .step_by(2)
        .map(|i| u16::from_le_bytes([bytes[i], bytes[i + 1]]));

    char::decode_utf16(u16_iter)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::MalformedInput(e.to_string()))
}

fn decode_utf16_be(bytes: &[u8]) -> Result<String> {
    let len = bytes.len() & !1;

    let u16_iter = (0..len)
        .step_by(2)
        .map(|i| u16::from_be_bytes([bytes[i], bytes[i + 1]]));

    char::decode_utf16(u16_iter)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::MalformedInput(e.to_string()))
}

/// Check whether an archive entry name is a workbook document.
fn is_workbook_entry(name: &str) -> bool {
    !name.ends_with('/') && name.to_lowercase().ends_with(WORKBOOK_ENTRY_EXTENSION)
}

/// Packaged workbook (.twbx) container over a ZIP archive.
///
/// A packaged workbook bundles the `.twb` document with extracts, images
/// and other assets. Entries are read from the underlying reader on demand,
/// so bundled extracts are never loaded.
pub struct TwbxContainer<R: Read + Seek = BufReader<File>> {
    archive: RefCell<zip::ZipArchive<R>>,
}

impl TwbxContainer {
    /// Open a packaged workbook from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use twbfields::container::TwbxContainer;
    ///
    /// let container = TwbxContainer::open("dashboard.twbx")?;
    /// println!("{:?}", container.first_workbook_entry());
    /// # Ok::<(), twbfields::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::new(BufReader::new(file))
    }
}

impl TwbxContainer<Cursor<Vec<u8>>> {
    /// Create a container from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::new(Cursor::new(data))
    }
}

impl<R: Read + Seek> TwbxContainer<R> {
    fn new(reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader)?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// List all entries in central directory order.
    pub fn list_files(&self) -> Result<Vec<String>> {
        let mut archive = self.archive.borrow_mut();
        let mut names = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let entry = archive.by_index_raw(index)?;
            names.push(entry.name().to_string());
        }
        Ok(names)
    }

    /// List entries whose name ends in `.twb` (case-insensitive).
    pub fn workbook_entries(&self) -> Result<Vec<String>> {
        Ok(self
            .list_files()?
            .into_iter()
            .filter(|n| is_workbook_entry(n))
            .collect())
    }

    /// The entry used as the workbook document: the first `.twb` entry.
    pub fn first_workbook_entry(&self) -> Result<Option<String>> {
        Ok(self.workbook_entries()?.into_iter().next())
    }

    /// Stream an entry's decompressed bytes into `writer`.
    ///
    /// Returns the number of bytes written.
    pub fn copy_entry<W: Write>(&self, name: &str, writer: &mut W) -> Result<u64> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(name)
            .map_err(|_| Error::ExtractionFailed(format!("entry not found: {}", name)))?;
        Ok(io::copy(&mut file, writer)?)
    }

    /// Write an entry to `dest`, replacing any existing file.
    pub fn extract_entry(&self, name: &str, dest: impl AsRef<Path>) -> Result<u64> {
        let mut out = BufWriter::new(File::create(dest.as_ref())?);
        let written = self.copy_entry(name, &mut out)?;
        out.flush()?;
        Ok(written)
    }
}

impl<R: Read + Seek> std::fmt::Debug for TwbxContainer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwbxContainer")
            .field("files", &self.archive.borrow().len())
            .finish()
    }
}
