//! ZIP packaging for split output

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn write_entries<W: Write + Seek>(zip: &mut ZipWriter<W>, files: &[PathBuf]) -> Result<()> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for file in files {
        zip.start_file(entry_name(file), options)?;
        let mut src = File::open(file)?;
        std::io::copy(&mut src, zip)?;
    }
    Ok(())
}

/// True when `zip_path` already names one of `files`.
fn overwrites_input(zip_path: &Path, files: &[PathBuf]) -> bool {
    let Ok(target) = std::fs::canonicalize(zip_path) else {
        return false;
    };
    files.iter().any(|file| {
        std::fs::canonicalize(file)
            .map(|file| file == target)
            .unwrap_or(false)
    })
}

/// Write `files` into a deflated archive at `zip_path`, one entry per file
/// named by its base name. A partially written archive is removed on error.
///
/// `zip_path` must not be one of `files`.
pub fn zip_files(zip_path: &Path, files: &[PathBuf]) -> Result<()> {
    if overwrites_input(zip_path, files) {
        return Err(Error::ArchiveNameConflict {
            name: entry_name(zip_path),
        });
    }

    if let Some(parent) = zip_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let result = write_archive(zip_path, files);
    if result.is_err() {
        let _ = std::fs::remove_file(zip_path);
    }
    result
}

fn write_archive(zip_path: &Path, files: &[PathBuf]) -> Result<()> {
    let mut zip = ZipWriter::new(File::create(zip_path)?);
    write_entries(&mut zip, files)?;
    zip.finish()?;
    Ok(())
}

/// Build the same archive as [`zip_files`] in memory.
pub fn zip_to_vec(files: &[PathBuf]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    write_entries(&mut zip, files)?;
    Ok(zip.finish()?.into_inner())
}
