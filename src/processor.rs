//! Operation orchestrator
//!
//! [`Processor`] sequences every operation: open the document through the
//! engine, run the page-selection logic, hand the result back to the engine
//! and assemble a typed result. It is the only component that touches both
//! the engine and the filesystem. Front ends (CLI, HTTP, MCP) only translate
//! their input into these calls.

use crate::config::PdfConfig;
use crate::error::{Error, Result};
use crate::pages::{Mode, RemovalPlan};
use crate::pdf::{PdfEngine, QpdfEngine};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::TempDir;

/// A page-removal request, already normalized by a front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovePagesRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Raw selection, trimmed
    pub pages: String,
    pub mode: Mode,
}

impl RemovePagesRequest {
    /// Normalize boundary input.
    ///
    /// An absent selection is a `MissingField`; a blank one is kept and
    /// rejected later as `EmptySelection`. Absent or blank mode means
    /// `remove`.
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        pages: Option<&str>,
        mode: Option<&str>,
    ) -> Result<Self> {
        let pages = pages.ok_or(Error::MissingField { field: "pages" })?;
        let mode = Mode::parse_or_default(mode)?;

        Ok(Self {
            input: input.into(),
            output: output.into(),
            pages: pages.trim().to_string(),
            mode,
        })
    }
}

/// Outcome of a page removal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovePagesResult {
    pub output_path: String,
    pub original_pages: u32,
    /// Physically removed pages, ascending
    pub removed_pages: Vec<u32>,
    pub removed_count: u32,
    pub remaining_pages: u32,
    pub mode: Mode,
    pub selection: String,
    pub output_file: String,
}

/// Outcome of a split
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitResult {
    /// Absolute paths of the single-page files, in page order
    pub files: Vec<String>,
    pub total_pages: u32,
    pub output_dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_b64: Option<String>,
}

impl SplitResult {
    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(PathBuf::from).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdfInfo {
    pub total_pages: u32,
    pub size_bytes: u64,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressResult {
    pub output_path: String,
    pub original_size: u64,
    pub compressed_size: u64,
    /// Negative when the rewrite grew the file
    pub reduction_bytes: i64,
    /// `(original - compressed) / original`, 0.0 for an empty original
    pub compression_ratio: f64,
    pub reduction_percent: f64,
}

impl CompressResult {
    fn new(output_path: String, original_size: u64, compressed_size: u64) -> Self {
        let reduction_bytes = original_size as i64 - compressed_size as i64;
        let compression_ratio = if original_size == 0 {
            0.0
        } else {
            reduction_bytes as f64 / original_size as f64
        };

        Self {
            output_path,
            original_size,
            compressed_size,
            reduction_bytes,
            compression_ratio,
            reduction_percent: (compression_ratio * 10_000.0).round() / 100.0,
        }
    }
}

/// Runs PDF operations against an engine.
#[derive(Debug, Clone)]
pub struct Processor<E = QpdfEngine> {
    engine: E,
    config: PdfConfig,
}

impl Processor<QpdfEngine> {
    /// Processor backed by qpdf
    pub fn with_config(config: PdfConfig) -> Self {
        Self::new(QpdfEngine::new(), config)
    }
}

impl<E: PdfEngine> Processor<E> {
    pub fn new(engine: E, config: PdfConfig) -> Self {
        Self { engine, config }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &PdfConfig {
        &self.config
    }

    /// Open `path` under the configured validation mode and return its
    /// page count.
    pub fn validate_file(&self, path: &Path) -> Result<u32> {
        log_outcome("validate", path, || {
            let doc = self.open(path)?;
            self.engine.page_count(&doc)
        })
    }

    /// Remove (or keep only) the selected pages and write the result.
    ///
    /// Selection errors are reported before the engine is asked to rewrite
    /// anything.
    pub fn remove_pages(&self, request: &RemovePagesRequest) -> Result<RemovePagesResult> {
        log_outcome("remove_pages", &request.input, || {
            let validation = self.config.validation_mode;
            let doc = self.open(&request.input)?;
            let total = self.engine.page_count(&doc)?;

            if request.pages.trim().is_empty() {
                return Err(Error::EmptySelection);
            }

            let plan = RemovalPlan::build(&request.pages, total, request.mode)?;
            tracing::debug!(
                mode = %plan.mode,
                total,
                ranges = %plan.ranges_string(),
                "resolved removal set"
            );

            ensure_parent_dir(&request.output)?;
            self.engine
                .delete_pages(&doc, &request.output, &plan.ranges, validation)
                .map_err(|e| match e {
                    Error::RemovalFailed { .. } => e,
                    other => Error::RemovalFailed {
                        reason: other.to_string(),
                    },
                })?;

            Ok(RemovePagesResult {
                output_path: request.output.display().to_string(),
                original_pages: plan.original_pages,
                removed_pages: plan.removed_pages(),
                removed_count: plan.removed_count(),
                remaining_pages: plan.remaining_pages(),
                mode: plan.mode,
                selection: request.pages.trim().to_string(),
                output_file: file_name(&request.output),
            })
        })
    }

    /// Split into one PDF per page.
    ///
    /// Without `output_dir` the parts land in a fresh scratch directory that
    /// is left in place for the caller.
    pub fn split(&self, input: &Path, output_dir: Option<&Path>) -> Result<SplitResult> {
        log_outcome("split", input, || {
            let doc = self.open(input)?;
            let total = self.engine.page_count(&doc)?;

            let dir = match output_dir {
                Some(dir) => {
                    std::fs::create_dir_all(dir)?;
                    dir.to_path_buf()
                }
                None => self.scratch_dir("pdf-split-")?.keep(),
            };
            let dir = std::fs::canonicalize(&dir)?;

            let files = self.engine.split_pages(&doc, &dir, &file_stem(input))?;

            Ok(SplitResult {
                files: files.iter().map(|p| p.display().to_string()).collect(),
                total_pages: total,
                output_dir: dir.display().to_string(),
                zip_path: None,
                zip_b64: None,
            })
        })
    }

    pub fn info(&self, input: &Path) -> Result<PdfInfo> {
        log_outcome("info", input, || {
            let doc = self.open(input)?;
            let total_pages = self.engine.page_count(&doc)?;
            let size_bytes = std::fs::metadata(input)?.len();

            Ok(PdfInfo {
                total_pages,
                size_bytes,
                filename: file_name(input),
            })
        })
    }

    /// Rewrite with compressed streams and report the size change.
    pub fn compress(&self, input: &Path, output: &Path) -> Result<CompressResult> {
        log_outcome("compress", input, || {
            let doc = self.open(input)?;
            let original_size = std::fs::metadata(input)?.len();

            ensure_parent_dir(output)?;
            self.engine
                .optimize(&doc, output, self.config.object_streams)?;
            let compressed_size = std::fs::metadata(output)?.len();

            Ok(CompressResult::new(
                output.display().to_string(),
                original_size,
                compressed_size,
            ))
        })
    }

    /// Create a scratch directory under the configured temp dir.
    pub fn scratch_dir(&self, prefix: &str) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix);
        let dir = match &self.config.temp_dir {
            Some(parent) => {
                std::fs::create_dir_all(parent)?;
                builder.tempdir_in(parent)?
            }
            None => builder.tempdir()?,
        };
        Ok(dir)
    }

    fn open(&self, path: &Path) -> Result<E::Document> {
        self.engine
            .open(path, self.config.validation_mode)
            .map_err(|e| match e {
                Error::DocumentUnreadable { .. } => e,
                other => Error::DocumentUnreadable {
                    path: path.display().to_string(),
                    reason: other.to_string(),
                },
            })
    }
}

fn log_outcome<T>(op: &'static str, input: &Path, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let started = Instant::now();
    tracing::debug!(op, input = %input.display(), "operation started");

    let result = f();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match &result {
        Ok(_) => tracing::debug!(op, elapsed_ms, "operation finished"),
        Err(e) if e.is_client_error() => {
            tracing::warn!(op, kind = e.kind(), error = %e, "operation rejected")
        }
        Err(e) => tracing::error!(op, kind = e.kind(), error = %e, "operation failed"),
    }
    result
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Base name of `path`, or the whole path when it has none
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// File stem of `path`, `"document"` when it has none
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "document".to_string())
}
