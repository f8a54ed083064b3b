//! Request handlers
//!
//! Every PDF endpoint takes a multipart upload with a `file` part, stores it
//! in a request-owned scratch directory and runs the operation on the
//! blocking pool. The scratch directory is removed when the handler returns.
//!
//! Scratch layout: `upload/<client name>` for the input, `parts/` for split
//! output and `<stem><suffix>.pdf` for rewritten documents. The client name
//! only ever lands inside `upload/`.

use super::error::ApiError;
use super::AppState;
use crate::archive;
use crate::error::Error;
use crate::processor::{file_stem, PdfInfo, RemovePagesRequest};
use axum::{
    extract::{Multipart, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;

const X_REMOVED_PAGES: HeaderName = HeaderName::from_static("x-removed-pages");
const X_REMAINING_PAGES: HeaderName = HeaderName::from_static("x-remaining-pages");
const X_MODE: HeaderName = HeaderName::from_static("x-mode");
const X_ORIGINAL_SIZE: HeaderName = HeaderName::from_static("x-original-size");
const X_COMPRESSED_SIZE: HeaderName = HeaderName::from_static("x-compressed-size");
const X_COMPRESSION_RATIO: HeaderName = HeaderName::from_static("x-compression-ratio");

const UPLOAD_DIR: &str = "upload";
const PARTS_DIR: &str = "parts";

/// A stored upload plus the text fields that came with it
struct Upload {
    dir: TempDir,
    path: PathBuf,
    fields: HashMap<String, String>,
}

impl Upload {
    fn stem(&self) -> String {
        file_stem(&self.path)
    }

    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn output_path(&self, suffix: &str) -> PathBuf {
        self.dir.path().join(format!("{}{}", self.stem(), suffix))
    }
}

/// Keep only the final component of a client-supplied file name.
fn upload_file_name(raw: Option<&str>) -> String {
    raw.and_then(|name| Path::new(name.trim()).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "document.pdf".to_string())
}

async fn read_upload(state: &AppState, mut multipart: Multipart) -> Result<Upload, ApiError> {
    let dir = state.processor.scratch_dir("pdf-upload-")?;
    let upload_dir = dir.path().join(UPLOAD_DIR);
    tokio::fs::create_dir(&upload_dir).await?;
    let mut path = None;
    let mut fields = HashMap::new();

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            let target = upload_dir.join(upload_file_name(field.file_name()));
            let mut file = tokio::fs::File::create(&target).await?;
            let mut written = 0usize;
            while let Some(chunk) = field.chunk().await? {
                written += chunk.len();
                file.write_all(&chunk).await?;
            }
            file.flush().await?;
            tracing::debug!(bytes = written, "stored upload");
            path = Some(target);
        } else if !name.is_empty() {
            fields.insert(name, field.text().await?);
        }
    }

    let path = path.ok_or(Error::MissingField { field: "file" })?;
    Ok(Upload { dir, path, fields })
}

fn join_error(e: tokio::task::JoinError) -> Error {
    Error::Engine {
        reason: format!("Task join error: {}", e),
    }
}

fn attachment(file_name: &str) -> String {
    format!("attachment; filename=\"{}\"", file_name.replace('"', ""))
}

/// Handler: GET /health
pub async fn health() -> &'static str {
    "ok"
}

/// Handler: POST /api/v1/pdf/split
pub async fn split(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let upload = read_upload(&state, multipart).await?;
    let input = upload.path.clone();
    let parts_dir = upload.dir.path().join(PARTS_DIR);
    let processor = state.processor.clone();

    let (total, zip) = tokio::task::spawn_blocking(move || {
        let result = processor.split(&input, Some(&parts_dir))?;
        let zip = archive::zip_to_vec(&result.file_paths())?;
        Ok::<_, Error>((result.total_pages, zip))
    })
    .await
    .map_err(join_error)??;

    tracing::info!(pages = total, zip_bytes = zip.len(), "split upload");

    let file_name = format!("{}-split.zip", upload.stem());
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, attachment(&file_name)),
        ],
        zip,
    )
        .into_response())
}

/// Handler: POST /api/v1/pdf/info
pub async fn info(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<PdfInfo>, ApiError> {
    let upload = read_upload(&state, multipart).await?;
    let input = upload.path.clone();
    let processor = state.processor.clone();

    let info = tokio::task::spawn_blocking(move || processor.info(&input))
        .await
        .map_err(join_error)??;

    Ok(Json(info))
}

/// Handler: POST /api/v1/pdf/compress
pub async fn compress(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let upload = read_upload(&state, multipart).await?;
    let input = upload.path.clone();
    let output = upload.output_path("-compressed.pdf");
    let processor = state.processor.clone();

    let result = {
        let output = output.clone();
        tokio::task::spawn_blocking(move || processor.compress(&input, &output))
            .await
            .map_err(join_error)??
    };
    let body = tokio::fs::read(&output).await?;

    tracing::info!(
        original = result.original_size,
        compressed = result.compressed_size,
        "compressed upload"
    );

    let file_name = format!("{}-compressed.pdf", upload.stem());
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, attachment(&file_name)),
            (X_ORIGINAL_SIZE, result.original_size.to_string()),
            (X_COMPRESSED_SIZE, result.compressed_size.to_string()),
            (X_COMPRESSION_RATIO, format!("{:.4}", result.compression_ratio)),
        ],
        body,
    )
        .into_response())
}

/// Handler: POST /api/v1/pdf/remove-pages
///
/// Form fields: `file`, `pages` (required), `mode` (`remove` | `keep`).
pub async fn remove_pages(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let upload = read_upload(&state, multipart).await?;
    let request = RemovePagesRequest::new(
        upload.path.clone(),
        upload.output_path("-pages-removed.pdf"),
        upload.field("pages"),
        upload.field("mode"),
    )?;
    let output = request.output.clone();
    let processor = state.processor.clone();

    let result = tokio::task::spawn_blocking(move || processor.remove_pages(&request))
        .await
        .map_err(join_error)??;
    let body = tokio::fs::read(&output).await?;

    tracing::info!(
        mode = %result.mode,
        removed = result.removed_count,
        remaining = result.remaining_pages,
        "removed pages from upload"
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, attachment(&result.output_file)),
            (X_REMOVED_PAGES, result.removed_count.to_string()),
            (X_REMAINING_PAGES, result.remaining_pages.to_string()),
            (X_MODE, result.mode.to_string()),
        ],
        body,
    )
        .into_response())
}
