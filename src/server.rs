//! MCP server implementation using rmcp
//!
//! Exposes the page operations as tools over stdio. Results come back as
//! pretty-printed JSON text; failures are JSON-RPC errors whose `data.kind`
//! carries the stable error code.

use crate::archive;
use crate::config::{McpConfig, PdfConfig};
use crate::error::Error;
use crate::processor::{file_stem, PdfInfo, Processor, RemovePagesRequest, RemovePagesResult};
use crate::processor::{CompressResult, SplitResult};
use anyhow::Result;
use base64::Engine as _;
use rmcp::{
    handler::server::tool::ToolRouter, handler::server::wrapper::Parameters, model::*,
    schemars::JsonSchema, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ============================================================================
// Tool parameters
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SplitParams {
    /// Absolute path to the input PDF
    pub pdf_path: String,
    /// Directory for the single-page files (default: a fresh temporary directory)
    #[serde(default)]
    pub output_dir: Option<String>,
    /// Also package the parts into a ZIP archive (default: false)
    #[serde(default)]
    pub zip: bool,
    /// ZIP file name, placed next to the parts (default: "<input>-split.zip")
    #[serde(default)]
    pub zip_name: Option<String>,
    /// Return the ZIP content base64-encoded in the response (requires zip)
    #[serde(default)]
    pub zip_b64: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct InfoParams {
    /// Absolute path to the input PDF
    pub pdf_path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CompressParams {
    /// Absolute path to the input PDF
    pub pdf_path: String,
    /// Where the compressed PDF is written
    pub output_path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RemovePagesParams {
    /// Absolute path to the input PDF
    pub pdf_path: String,
    /// Where the resulting PDF is written
    pub output_path: String,
    /// Pages to select, 1-based: "5", "2-4", "1,3,7-9". Duplicates are ignored.
    pub pages: String,
    /// "remove" deletes the selected pages, "keep" deletes every other page
    /// (default: "remove")
    #[serde(default)]
    pub mode: Option<String>,
}

// ============================================================================
// Server
// ============================================================================

/// PDF page tools MCP server
#[derive(Clone)]
pub struct PdfToolsServer {
    processor: Arc<Processor>,
    tool_router: ToolRouter<Self>,
    config: Arc<McpConfig>,
}

/// Map an error to a JSON-RPC error object.
///
/// Caller mistakes become `invalid_params`, everything else
/// `internal_error`; the message is the sanitized client message.
pub fn error_data(e: &Error) -> ErrorData {
    let data = Some(serde_json::json!({ "kind": e.kind() }));
    if e.is_client_error() {
        ErrorData::invalid_params(e.client_message(), data)
    } else {
        ErrorData::internal_error(e.client_message(), data)
    }
}

fn tool_result<T: Serialize>(
    tool: &'static str,
    result: crate::error::Result<T>,
) -> Result<CallToolResult, ErrorData> {
    match result {
        Ok(value) => {
            let json = serde_json::to_string_pretty(&value)
                .map_err(|e| error_data(&Error::Serialization(e)))?;
            Ok(CallToolResult::success(vec![Content::text(json)]))
        }
        Err(e) => {
            tracing::warn!(tool, kind = e.kind(), error = %e, "tool call failed");
            Err(error_data(&e))
        }
    }
}

fn join_error(e: tokio::task::JoinError) -> Error {
    Error::Engine {
        reason: format!("Task join error: {}", e),
    }
}

/// Reject blank required string arguments.
fn require<'a>(field: &'static str, value: &'a str) -> crate::error::Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::MissingField { field });
    }
    Ok(value)
}

/// Archive name for a split: the requested base name, or `<stem>-split.zip`.
fn zip_file_name(requested: Option<&str>, input: &Path) -> String {
    requested
        .map(str::trim)
        .and_then(|name| Path::new(name).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{}-split.zip", file_stem(input)))
}

#[tool_router]
impl PdfToolsServer {
    pub fn new() -> Self {
        Self::with_config(PdfConfig::default(), McpConfig::default())
    }

    /// Create a server restricted to the given directories
    pub fn with_allowed_dirs(dirs: Vec<String>) -> Self {
        Self::with_config(PdfConfig::default(), McpConfig { allowed_dirs: dirs })
    }

    pub fn with_config(pdf: PdfConfig, mcp: McpConfig) -> Self {
        Self {
            processor: Arc::new(Processor::with_config(pdf)),
            tool_router: Self::tool_router(),
            config: Arc::new(mcp),
        }
    }

    /// Split a PDF into single-page files
    #[tool(
        description = "Split a PDF into one PDF per page. Parts are named <input>_<n>.pdf. Optionally packages the parts into a ZIP archive and returns it base64-encoded."
    )]
    pub async fn pdf_split(
        &self,
        Parameters(params): Parameters<SplitParams>,
    ) -> Result<CallToolResult, ErrorData> {
        tool_result("pdf_split", self.process_split(&params).await)
    }

    /// Report basic document information
    #[tool(description = "Get the page count, file size and file name of a PDF.")]
    pub async fn pdf_info(
        &self,
        Parameters(params): Parameters<InfoParams>,
    ) -> Result<CallToolResult, ErrorData> {
        tool_result("pdf_info", self.process_info(&params).await)
    }

    /// Rewrite a PDF with compressed streams
    #[tool(
        description = "Compress a PDF by compressing streams, generating object streams and dropping unreferenced objects. Reports sizes before and after."
    )]
    pub async fn pdf_compress(
        &self,
        Parameters(params): Parameters<CompressParams>,
    ) -> Result<CallToolResult, ErrorData> {
        tool_result("pdf_compress", self.process_compress(&params).await)
    }

    /// Remove pages, or keep only the selected pages
    #[tool(
        description = "Remove pages from a PDF. With mode \"remove\" (default) the selected pages are deleted; with mode \"keep\" only the selected pages are kept. Selection examples: \"5\", \"2-4\", \"1,3,7-9\". Removing every page is rejected."
    )]
    pub async fn pdf_remove_pages(
        &self,
        Parameters(params): Parameters<RemovePagesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        tool_result("pdf_remove_pages", self.process_remove_pages(&params).await)
    }

    /// Validate that a path is within allowed directories.
    /// If no directories are configured, all paths are allowed.
    fn validate_path_access(&self, path: &str) -> crate::error::Result<PathBuf> {
        if self.config.allowed_dirs.is_empty() {
            return Ok(PathBuf::from(path));
        }

        let canonical = std::fs::canonicalize(path).map_err(|_| Error::PathAccessDenied {
            path: path.to_string(),
        })?;

        if self.is_allowed(&canonical) {
            Ok(canonical)
        } else {
            Err(Error::PathAccessDenied {
                path: path.to_string(),
            })
        }
    }

    /// Validate a path that may not exist yet.
    /// Canonicalizes the parent directory instead.
    fn validate_output_path_access(&self, path: &str) -> crate::error::Result<PathBuf> {
        if self.config.allowed_dirs.is_empty() {
            return Ok(PathBuf::from(path));
        }

        let path_obj = Path::new(path);
        let (Some(parent), Some(name)) = (path_obj.parent(), path_obj.file_name()) else {
            return Err(Error::PathAccessDenied {
                path: path.to_string(),
            });
        };
        let parent = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };

        let canonical_parent =
            std::fs::canonicalize(parent).map_err(|_| Error::PathAccessDenied {
                path: path.to_string(),
            })?;
        let canonical_target = canonical_parent.join(name);

        if self.is_allowed(&canonical_target) {
            Ok(canonical_target)
        } else {
            Err(Error::PathAccessDenied {
                path: path.to_string(),
            })
        }
    }

    fn is_allowed(&self, canonical: &Path) -> bool {
        self.config.allowed_dirs.iter().any(|dir| {
            std::fs::canonicalize(dir)
                .map(|cd| canonical.starts_with(&cd))
                .unwrap_or(false)
        })
    }

    async fn process_split(&self, params: &SplitParams) -> crate::error::Result<SplitResult> {
        let input = self.validate_path_access(require("pdf_path", &params.pdf_path)?)?;
        let output_dir = match params.output_dir.as_deref().map(str::trim) {
            Some(dir) if !dir.is_empty() => Some(self.validate_output_path_access(dir)?),
            _ => None,
        };

        let processor = self.processor.clone();
        let want_zip = params.zip;
        let want_b64 = params.zip_b64;
        let zip_name = params.zip_name.clone();

        tokio::task::spawn_blocking(move || {
            let mut result = processor.split(&input, output_dir.as_deref())?;

            if want_zip {
                let zip_path =
                    Path::new(&result.output_dir).join(zip_file_name(zip_name.as_deref(), &input));
                archive::zip_files(&zip_path, &result.file_paths())?;

                if want_b64 {
                    let data = std::fs::read(&zip_path)?;
                    result.zip_b64 = Some(base64::engine::general_purpose::STANDARD.encode(data));
                }
                result.zip_path = Some(zip_path.display().to_string());
            }

            Ok::<_, Error>(result)
        })
        .await
        .map_err(join_error)?
    }

    async fn process_info(&self, params: &InfoParams) -> crate::error::Result<PdfInfo> {
        let input = self.validate_path_access(require("pdf_path", &params.pdf_path)?)?;
        let processor = self.processor.clone();

        tokio::task::spawn_blocking(move || processor.info(&input))
            .await
            .map_err(join_error)?
    }

    async fn process_compress(
        &self,
        params: &CompressParams,
    ) -> crate::error::Result<CompressResult> {
        let input = self.validate_path_access(require("pdf_path", &params.pdf_path)?)?;
        let output =
            self.validate_output_path_access(require("output_path", &params.output_path)?)?;
        let processor = self.processor.clone();

        tokio::task::spawn_blocking(move || processor.compress(&input, &output))
            .await
            .map_err(join_error)?
    }

    async fn process_remove_pages(
        &self,
        params: &RemovePagesParams,
    ) -> crate::error::Result<RemovePagesResult> {
        let input = self.validate_path_access(require("pdf_path", &params.pdf_path)?)?;
        let output =
            self.validate_output_path_access(require("output_path", &params.output_path)?)?;
        let request =
            RemovePagesRequest::new(input, output, Some(&params.pages), params.mode.as_deref())?;
        let processor = self.processor.clone();

        tokio::task::spawn_blocking(move || processor.remove_pages(&request))
            .await
            .map_err(join_error)?
    }
}

impl Default for PdfToolsServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_handler]
impl ServerHandler for PdfToolsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "PDF page tools: split a PDF into pages, inspect it, compress it, \
                 or remove/keep a selection of pages. Page numbers are 1-based."
                    .into(),
            ),
        }
    }
}

/// Run the MCP server over stdio
pub async fn run_server(pdf: PdfConfig, mcp: McpConfig) -> Result<()> {
    if !mcp.allowed_dirs.is_empty() {
        tracing::info!(dirs = ?mcp.allowed_dirs, "restricting tool paths");
    }
    let server = PdfToolsServer::with_config(pdf, mcp);

    tracing::info!("PDF tools MCP server ready, waiting for connections...");

    let service = server.serve(rmcp::transport::io::stdio()).await?;
    service.waiting().await?;

    Ok(())
}
