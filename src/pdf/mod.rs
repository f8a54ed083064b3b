//! PDF engine layer
//!
//! The crate never parses PDF structure itself. Everything that touches the
//! document goes through [`PdfEngine`]; [`QpdfEngine`] is the production
//! implementation backed by the qpdf crate (vendored FFI).

mod engine;
mod qpdf;

pub use self::qpdf::QpdfEngine;
pub use engine::PdfEngine;

/// File name of the `n`-th (1-based) split part of `stem`.
pub fn split_part_name(stem: &str, page: u32) -> String {
    format!("{}_{}.pdf", stem, page)
}
