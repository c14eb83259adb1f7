//! Archive resolution: turn any workbook path into a plain `.twb` path.

use crate::container::TwbxContainer;
use crate::detect::{is_zip_archive, WorkbookFormat};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Sibling path a packaged workbook is extracted to.
///
/// Same directory and base name as the input, with the `.twb` extension.
pub fn extracted_path(path: impl AsRef<Path>) -> PathBuf {
    path.as_ref().with_extension(WorkbookFormat::Twb.extension())
}

/// Resolve a workbook path to a plain XML workbook path.
///
/// A `.twb` path is returned unchanged. A `.twbx` path is validated as a
/// ZIP archive, its first `.twb` entry is written next to it and the path
/// of that file is returned. Repeated calls overwrite the same file.
///
/// # Example
///
/// ```no_run
/// use twbfields::resolve;
///
/// let xml_path = resolve("dashboard.twbx")?;
/// println!("{}", xml_path.display()); // .../dashboard.twb
/// # Ok::<(), twbfields::Error>(())
/// ```
pub fn resolve(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    match WorkbookFormat::from_path(path)? {
        WorkbookFormat::Twb => Ok(path.to_path_buf()),
        WorkbookFormat::Twbx => extract_workbook(path),
    }
}

fn extract_workbook(path: &Path) -> Result<PathBuf> {
    if !is_zip_archive(path)? {
        return Err(invalid_container(path));
    }

    // A sniffed signature says nothing about the central directory
    let container = TwbxContainer::open(path).map_err(|e| match e {
        Error::ZipArchive(_) => invalid_container(path),
        other => other,
    })?;
    let entry = container.first_workbook_entry()?.ok_or_else(|| {
        Error::ExtractionFailed(format!("no .twb entry found in {}", path.display()))
    })?;

    let out_path = extracted_path(path);
    info!("Extracting {} to {}", entry, out_path.display());
    container.extract_entry(&entry, &out_path)?;

    Ok(out_path)
}

fn invalid_container(path: &Path) -> Error {
    Error::InvalidInput(format!(
        "not a valid packaged workbook: {}",
        path.display()
    ))
}
