//! PDF page tools
//!
//! Page-level PDF operations behind three front ends sharing one library:
//! - `split`: one PDF per page, optionally zipped
//! - `info`: page count and file size
//! - `compress`: stream and object-stream optimization
//! - `remove_pages`: delete a page selection, or keep only it
//!
//! The CLI lives in [`cli`], the HTTP API in [`http`] and the MCP server in
//! [`server`]. PDF parsing and rewriting is delegated to qpdf through
//! [`pdf::PdfEngine`]; [`pages`] holds the page-selection logic.

pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod pages;
pub mod pdf;
pub mod processor;
pub mod server;

pub use config::Config;
pub use error::{Error, Result};
pub use pages::{Mode, PageSet, RangeToken, RemovalPlan};
pub use processor::{
    CompressResult, PdfInfo, Processor, RemovePagesRequest, RemovePagesResult, SplitResult,
};
pub use server::{run_server, PdfToolsServer};
