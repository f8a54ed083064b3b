//! Error types for PDF page tools

use thiserror::Error;

/// Result type alias for PDF page tools
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for PDF page tools
#[derive(Error, Debug)]
pub enum Error {
    /// Selection string is empty or resolves to zero tokens
    #[error("page selection cannot be empty")]
    EmptySelection,

    /// A single-page token is not an integer
    #[error("invalid page number {token:?}")]
    MalformedNumber { token: String },

    /// A range token has a bound that is not an integer
    #[error("invalid page range {token:?}")]
    MalformedRange { token: String },

    /// Range start exceeds range end
    #[error("invalid range {start}-{end}: start > end")]
    InvertedRange { start: i64, end: i64 },

    /// A page or range bound falls outside `[1, total]`
    #[error("{what} out of bounds (PDF has {total} pages)")]
    OutOfBounds { what: String, total: u32 },

    /// Keep mode selected every page, nothing is left to remove
    #[error("no pages to remove (selection matches all pages)")]
    NoPagesSelected,

    /// The removal set covers the whole document
    #[error("cannot remove all {total} pages from the PDF")]
    CannotRemoveAllPages { total: u32 },

    /// Mode string is neither `remove` nor `keep`
    #[error("invalid mode {mode:?}: must be 'remove' or 'keep'")]
    InvalidMode { mode: String },

    /// A required request field is missing or blank
    #[error("missing or invalid {field}")]
    MissingField { field: &'static str },

    /// The document does not exist, is not a PDF, or fails validation
    #[error("failed to read PDF {path}: {reason}")]
    DocumentUnreadable { path: String, reason: String },

    /// The engine failed while rewriting the document without the removed pages
    #[error("failed to remove pages: {reason}")]
    RemovalFailed { reason: String },

    /// Any other engine failure (split, optimize, write)
    #[error("qpdf error: {reason}")]
    Engine { reason: String },

    /// Path access denied (outside allowed directories)
    #[error("Path access denied: {path}")]
    PathAccessDenied { path: String },

    /// The requested archive would overwrite one of the files it packages
    #[error("ZIP name {name:?} collides with a split part")]
    ArchiveNameConflict { name: String },

    /// ZIP archive assembly failed
    #[error("failed to create ZIP: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Stable machine-readable code for this error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::EmptySelection => "EMPTY_SELECTION",
            Error::MalformedNumber { .. } => "MALFORMED_NUMBER",
            Error::MalformedRange { .. } => "MALFORMED_RANGE",
            Error::InvertedRange { .. } => "INVERTED_RANGE",
            Error::OutOfBounds { .. } => "OUT_OF_BOUNDS",
            Error::NoPagesSelected => "NO_PAGES_SELECTED",
            Error::CannotRemoveAllPages { .. } => "CANNOT_REMOVE_ALL_PAGES",
            Error::InvalidMode { .. } => "INVALID_MODE",
            Error::MissingField { .. } => "MISSING_FIELD",
            Error::DocumentUnreadable { .. } => "DOCUMENT_UNREADABLE",
            Error::RemovalFailed { .. } => "REMOVAL_FAILED",
            Error::Engine { .. } => "ENGINE_ERROR",
            Error::PathAccessDenied { .. } => "PATH_ACCESS_DENIED",
            Error::ArchiveNameConflict { .. } => "ARCHIVE_NAME_CONFLICT",
            Error::Archive(_) => "ARCHIVE_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// True when the caller's input caused the failure (bad selection, bad
    /// mode, unreadable upload, denied path) rather than an internal fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::EmptySelection
                | Error::MalformedNumber { .. }
                | Error::MalformedRange { .. }
                | Error::InvertedRange { .. }
                | Error::OutOfBounds { .. }
                | Error::NoPagesSelected
                | Error::CannotRemoveAllPages { .. }
                | Error::InvalidMode { .. }
                | Error::MissingField { .. }
                | Error::DocumentUnreadable { .. }
                | Error::PathAccessDenied { .. }
                | Error::ArchiveNameConflict { .. }
        )
    }

    /// Return a sanitized error message safe to send to clients.
    /// Selection errors are passed through verbatim; internal details (paths,
    /// library errors) are omitted and should be logged via tracing instead.
    pub fn client_message(&self) -> String {
        match self {
            Error::DocumentUnreadable { .. } => "Invalid or unreadable PDF file".to_string(),
            Error::RemovalFailed { .. } => "failed to remove pages".to_string(),
            Error::Engine { .. } => "PDF processing error".to_string(),
            Error::PathAccessDenied { .. } => "Access denied".to_string(),
            Error::Archive(_) => "failed to create ZIP".to_string(),
            Error::Io(_) => "I/O error".to_string(),
            Error::Serialization(_) => "Serialization error".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_messages_pass_through() {
        let err = Error::OutOfBounds {
            what: "page 11".to_string(),
            total: 10,
        };
        assert_eq!(err.client_message(), "page 11 out of bounds (PDF has 10 pages)");
        assert_eq!(err.kind(), "OUT_OF_BOUNDS");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_internal_messages_are_sanitized() {
        let err = Error::RemovalFailed {
            reason: "/tmp/upload-123.pdf: xref stream broken".to_string(),
        };
        assert_eq!(err.client_message(), "failed to remove pages");
        assert!(!err.is_client_error());

        let err = Error::DocumentUnreadable {
            path: "/secret/in.pdf".to_string(),
            reason: "not a PDF".to_string(),
        };
        assert!(!err.client_message().contains("/secret"));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_inverted_range_message() {
        let err = Error::InvertedRange { start: 5, end: 3 };
        assert_eq!(err.to_string(), "invalid range 5-3: start > end");
    }
}
