//! qpdf-backed engine
//!
//! Page deletion, splitting and optimization using the qpdf crate (vendored
//! FFI). Documents are read fully into memory and written back with
//! `std::fs::write`.

use super::engine::PdfEngine;
use super::split_part_name;
use crate::config::{ObjectStreams, ValidationMode};
use crate::error::{Error, Result};
use crate::pages::RangeToken;
use qpdf::{ObjectStreamMode, QPdf};
use std::path::{Path, PathBuf};

/// How far into the file a `%PDF-` header may appear
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Production engine backed by qpdf
#[derive(Debug, Clone, Copy, Default)]
pub struct QpdfEngine;

impl QpdfEngine {
    pub fn new() -> Self {
        Self
    }
}

/// Map qpdf crate errors to our error types
fn map_qpdf_error(e: qpdf::QPdfError) -> Error {
    Error::Engine {
        reason: e.to_string(),
    }
}

fn has_pdf_header(data: &[u8]) -> bool {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    window.windows(5).any(|w| w == b"%PDF-")
}

/// Serialize a document without re-encrypting it.
fn write_plain(doc: &QPdf) -> std::result::Result<Vec<u8>, qpdf::QPdfError> {
    let mut writer = doc.writer();
    writer.preserve_encryption(false);
    writer.write_to_memory()
}

/// Re-open freshly written bytes and confirm the page count.
fn verify_output(data: &[u8], expected_pages: u32) -> Result<()> {
    let reopened = QPdf::read_from_memory(data).map_err(map_qpdf_error)?;
    let pages = reopened.get_num_pages().map_err(map_qpdf_error)?;
    if pages != expected_pages {
        return Err(Error::Engine {
            reason: format!(
                "output has {} pages, expected {}",
                pages, expected_pages
            ),
        });
    }
    Ok(())
}

impl PdfEngine for QpdfEngine {
    type Document = QPdf;

    fn open(&self, path: &Path, validation: ValidationMode) -> Result<QPdf> {
        let unreadable = |reason: String| Error::DocumentUnreadable {
            path: path.display().to_string(),
            reason,
        };

        let data = std::fs::read(path).map_err(|e| unreadable(e.to_string()))?;
        if !has_pdf_header(&data) {
            return Err(unreadable("missing %PDF header".to_string()));
        }

        let doc = QPdf::read_from_memory(&data).map_err(|e| unreadable(e.to_string()))?;
        let pages = doc.get_num_pages().map_err(|e| unreadable(e.to_string()))?;

        if validation == ValidationMode::Strict {
            if pages == 0 {
                return Err(unreadable("document has no pages".to_string()));
            }
            write_plain(&doc).map_err(|e| unreadable(e.to_string()))?;
        }

        tracing::debug!(path = %path.display(), pages, ?validation, "opened PDF");
        Ok(doc)
    }

    fn page_count(&self, doc: &QPdf) -> Result<u32> {
        doc.get_num_pages().map_err(map_qpdf_error)
    }

    fn delete_pages(
        &self,
        doc: &QPdf,
        output: &Path,
        ranges: &[RangeToken],
        validation: ValidationMode,
    ) -> Result<()> {
        let removal_failed = |reason: String| Error::RemovalFailed { reason };

        let total = doc
            .get_num_pages()
            .map_err(|e| removal_failed(e.to_string()))?;

        // Resolve every page handle before touching the page tree
        let mut doomed = Vec::new();
        for page in ranges.iter().flat_map(RangeToken::pages) {
            let handle = page
                .checked_sub(1)
                .and_then(|idx| doc.get_page(idx))
                .ok_or_else(|| {
                    removal_failed(format!("page {} not found (PDF has {} pages)", page, total))
                })?;
            doomed.push(handle);
        }

        for handle in &doomed {
            doc.remove_page(handle)
                .map_err(|e| removal_failed(e.to_string()))?;
        }

        let data = write_plain(doc).map_err(|e| removal_failed(e.to_string()))?;

        if validation == ValidationMode::Strict {
            let expected = total - doomed.len() as u32;
            verify_output(&data, expected).map_err(|e| removal_failed(e.to_string()))?;
        }

        std::fs::write(output, &data)?;

        tracing::debug!(
            output = %output.display(),
            removed = doomed.len(),
            bytes = data.len(),
            "wrote PDF without removed pages"
        );
        Ok(())
    }

    fn split_pages(&self, doc: &QPdf, output_dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
        let pages = doc.get_pages().map_err(map_qpdf_error)?;
        let mut files = Vec::with_capacity(pages.len());

        for (idx, page) in pages.iter().enumerate() {
            let dest = QPdf::empty();
            let copied = dest.copy_from_foreign(page);
            dest.add_page(&copied, false).map_err(map_qpdf_error)?;

            let data = write_plain(&dest).map_err(map_qpdf_error)?;
            let path = output_dir.join(split_part_name(stem, idx as u32 + 1));
            std::fs::write(&path, data)?;
            files.push(path);
        }

        tracing::debug!(dir = %output_dir.display(), parts = files.len(), "split PDF");
        Ok(files)
    }

    fn optimize(&self, doc: &QPdf, output: &Path, object_streams: ObjectStreams) -> Result<()> {
        let os_mode = match object_streams {
            ObjectStreams::Generate => ObjectStreamMode::Generate,
            ObjectStreams::Preserve => ObjectStreamMode::Preserve,
            ObjectStreams::Disable => ObjectStreamMode::Disable,
        };

        let mut writer = doc.writer();
        writer
            .object_stream_mode(os_mode)
            .compress_streams(true)
            .normalize_content(true)
            .preserve_unreferenced_objects(false)
            .preserve_encryption(false);
        let data = writer.write_to_memory().map_err(map_qpdf_error)?;

        std::fs::write(output, data)?;
        Ok(())
    }
}
