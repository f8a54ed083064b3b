use crate::config::{ObjectStreams, ValidationMode};
use crate::error::Result;
use crate::pages::RangeToken;
use std::path::{Path, PathBuf};

/// Operations the orchestrator needs from a PDF engine.
///
/// Implementations own all document parsing and rewriting. A `Document` is
/// only ever used on the thread that opened it.
pub trait PdfEngine: Send + Sync {
    /// An opened, validated document
    type Document;

    /// Open and validate the document at `path`.
    ///
    /// Fails with [`Error::DocumentUnreadable`](crate::Error::DocumentUnreadable)
    /// when the file is missing, not a PDF, or does not pass `validation`.
    fn open(&self, path: &Path, validation: ValidationMode) -> Result<Self::Document>;

    /// Number of pages in the document
    fn page_count(&self, doc: &Self::Document) -> Result<u32>;

    /// Write `doc` to `output` without the pages covered by `ranges`.
    fn delete_pages(
        &self,
        doc: &Self::Document,
        output: &Path,
        ranges: &[RangeToken],
        validation: ValidationMode,
    ) -> Result<()>;

    /// Write one single-page PDF per page into `output_dir`, named
    /// `<stem>_<n>.pdf`, and return their paths in page order.
    fn split_pages(&self, doc: &Self::Document, output_dir: &Path, stem: &str)
        -> Result<Vec<PathBuf>>;

    /// Rewrite `doc` to `output` with stream and object-stream optimization.
    fn optimize(&self, doc: &Self::Document, output: &Path, object_streams: ObjectStreams)
        -> Result<()>;
}
