//! Shared fixtures: small generated PDFs with one marker per page.
#![allow(dead_code)]

use pdf_page_tools::config::ValidationMode;
use pdf_page_tools::pdf::{PdfEngine, QpdfEngine};
use std::path::{Path, PathBuf};

/// Build an uncompressed PDF with `pages` pages. Each page dictionary
/// carries a `/Marker (page-N)` entry so tests can tell pages apart.
pub fn minimal_pdf(pages: u32) -> Vec<u8> {
    let mut out: Vec<u8> = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::new();

    let kids = (0..pages)
        .map(|i| format!("{} 0 R", 3 + i))
        .collect::<Vec<_>>()
        .join(" ");

    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, pages),
    ];
    for i in 0..pages {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents {} 0 R /Marker (page-{}) >>",
            3 + pages + i,
            i + 1
        ));
    }
    for i in 0..pages {
        let content = format!("% page {}\n0 0 m {} {} l S\n", i + 1, 10 + i, 10 + i);
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}endstream",
            content.len(),
            content
        ));
    }

    for (idx, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", idx + 1, body).as_bytes());
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    out
}

/// Write a generated PDF into `dir`.
pub fn write_pdf(dir: &Path, name: &str, pages: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, minimal_pdf(pages)).unwrap();
    path
}

/// Page count as seen by qpdf.
pub fn page_count(path: &Path) -> u32 {
    let engine = QpdfEngine::new();
    let doc = engine.open(path, ValidationMode::Strict).unwrap();
    engine.page_count(&doc).unwrap()
}

/// Whether the page carrying marker `page` is still in `bytes`.
pub fn has_page(bytes: &[u8], page: u32) -> bool {
    let marker = format!("(page-{})", page);
    bytes
        .windows(marker.len())
        .any(|w| w == marker.as_bytes())
}

/// Original page numbers present in the PDF at `path`, ascending.
pub fn surviving_pages(path: &Path, original_total: u32) -> Vec<u32> {
    let bytes = std::fs::read(path).unwrap();
    (1..=original_total).filter(|p| has_page(&bytes, *p)).collect()
}
