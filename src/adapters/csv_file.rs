//! Whole-file CSV replacement shared by the CSV-backed adapters.
//!
//! Rows go to a hidden sibling temp file first, which is then renamed over
//! the target, so readers see either the old file or the new one.

use crate::domain::error::LedgerError;
use std::fs;
use std::path::{Path, PathBuf};

pub(crate) fn write_atomically<R>(
    path: &Path,
    header: &[&str],
    rows: impl IntoIterator<Item = R>,
) -> Result<(), LedgerError>
where
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| LedgerError::storage(parent, e))?;
    }

    let tmp_path = temp_path(path);
    if let Err(e) = write_rows(&tmp_path, header, rows) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        LedgerError::storage(path, e)
    })
}

fn write_rows<R>(
    tmp_path: &Path,
    header: &[&str],
    rows: impl IntoIterator<Item = R>,
) -> Result<(), LedgerError>
where
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut wtr =
        csv::Writer::from_path(tmp_path).map_err(|e| LedgerError::storage(tmp_path, e))?;
    wtr.write_record(header)
        .map_err(|e| LedgerError::storage(tmp_path, e))?;
    for row in rows {
        wtr.write_record(row)
            .map_err(|e| LedgerError::storage(tmp_path, e))?;
    }
    wtr.flush().map_err(|e| LedgerError::storage(tmp_path, e))
}

pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "data.csv".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}
