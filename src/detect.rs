//! Format detection for Tableau workbook files.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// MIME type reported by content sniffing for ZIP archives.
pub const ZIP_MIME_TYPE: &str = "application/zip";

/// Tableau workbook file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    /// Plain XML workbook (.twb)
    Twb,
    /// Packaged workbook, a ZIP container (.twbx)
    Twbx,
}

impl WorkbookFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            WorkbookFormat::Twb => "twb",
            WorkbookFormat::Twbx => "twbx",
        }
    }

    /// Returns a human-readable name for this format.
    pub fn name(&self) -> &'static str {
        match self {
            WorkbookFormat::Twb => "Tableau Workbook",
            WorkbookFormat::Twbx => "Tableau Packaged Workbook",
        }
    }

    /// Determine the format from a path's extension (case-insensitive).
    ///
    /// No I/O is performed.
    ///
    /// # Example
    ///
    /// ```
    /// use twbfields::detect::WorkbookFormat;
    ///
    /// let format = WorkbookFormat::from_path("Sales.TWBX")?;
    /// assert_eq!(format, WorkbookFormat::Twbx);
    /// # Ok::<(), twbfields::Error>(())
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("twb") => Ok(WorkbookFormat::Twb),
            Some("twbx") => Ok(WorkbookFormat::Twbx),
            _ => Err(Error::InvalidInput(format!(
                "extension must be .twb or .twbx: {}",
                path.display()
            ))),
        }
    }
}

impl std::fmt::Display for WorkbookFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Sniff the MIME type of a file from its content.
///
/// Returns `None` when the content is not recognized, or when the crate
/// was built without the `sniff` feature.
#[cfg(feature = "sniff")]
pub fn sniff_mime(path: impl AsRef<Path>) -> Result<Option<String>> {
    let kind = infer::get_from_path(path.as_ref())?;
    Ok(kind.map(|k| k.mime_type().to_string()))
}

/// Sniff the MIME type of a file from its content.
///
/// Built without the `sniff` feature: no sniffing facility is available.
#[cfg(not(feature = "sniff"))]
pub fn sniff_mime(_path: impl AsRef<Path>) -> Result<Option<String>> {
    Ok(None)
}

/// Check whether a file looks like a ZIP archive.
///
/// Content sniffing is tried first. Anything it does not report as
/// `application/zip` is validated structurally by opening it as an archive.
/// A positive sniff only reads the file header: the archive itself is
/// validated when the container is opened.
pub fn is_zip_archive(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();

    if sniff_mime(path)?.as_deref() == Some(ZIP_MIME_TYPE) {
        return Ok(true);
    }

    let file = File::open(path)?;
    Ok(zip::ZipArchive::new(BufReader::new(file)).is_ok())
}
