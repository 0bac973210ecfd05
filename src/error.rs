//! Error types for the pdf2scorm library.
//!
//! Packaging is all-or-nothing: there is no useful notion of a SCORM package
//! with a missing page, so every stage failure is fatal for the request and
//! surfaces as a single [`Pdf2ScormError`] from the top-level `package*`
//! functions. The variants are grouped by the pipeline stage that raises
//! them, so callers can map each group to an appropriate rejection response
//! (bad upload vs. conversion problem vs. internal invariant violation)
//! without string matching.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2scorm library.
#[derive(Debug, Error)]
pub enum Pdf2ScormError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The input bytes were read, but they are not a PDF.
    #[error("Input is not a valid PDF\nFirst bytes: {magic:?}")]
    NotAPdf { magic: [u8; 4] },

    // ── Conversion errors ─────────────────────────────────────────────────
    /// The document could not be parsed or the rasterizer rejected it.
    #[error("PDF conversion failed: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    ConversionFailed { detail: String },

    /// The document parsed but contains no pages.
    #[error("PDF contains no pages — nothing to package")]
    EmptyDocument,

    /// The rasterizer returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    PageRenderFailed { page: usize, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired,

    /// A password was provided but it is wrong.
    #[error("Wrong password for encrypted PDF")]
    WrongPassword,

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install pdfium (https://github.com/bblanchon/pdfium-binaries) and either\n\
place libpdfium next to the executable or set PDFIUM_LIB_PATH to its location."
    )]
    PdfiumBindingFailed(String),

    // ── Compression errors ────────────────────────────────────────────────
    /// JPEG quality is outside the accepted 1–100 range.
    #[error("JPEG quality must be 1-100, got {quality}")]
    InvalidQuality { quality: u8 },

    /// Re-encoding a rendered page failed.
    #[error("JPEG encoding failed for page {page}: {detail}")]
    EncodingFailed { page: usize, detail: String },

    // ── Assembly errors ───────────────────────────────────────────────────
    /// Two package entries were handed to the assembler at the same path.
    #[error("Duplicate path in package tree: '{path}'")]
    DuplicatePath { path: String },

    /// The zip container could not be serialized.
    #[error("Archive assembly failed: {detail}")]
    AssemblyFailed { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output archive file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_a_pdf_display() {
        let e = Pdf2ScormError::NotAPdf { magic: *b"<htm" };
        let msg = e.to_string();
        assert!(msg.contains("not a valid PDF"), "got: {msg}");
    }

    #[test]
    fn invalid_quality_display() {
        let e = Pdf2ScormError::InvalidQuality { quality: 101 };
        assert!(e.to_string().contains("101"));
        assert!(e.to_string().contains("1-100"));
    }

    #[test]
    fn duplicate_path_display() {
        let e = Pdf2ScormError::DuplicatePath {
            path: "page1.jpg".into(),
        };
        assert!(e.to_string().contains("page1.jpg"));
    }

    #[test]
    fn page_render_failed_display() {
        let e = Pdf2ScormError::PageRenderFailed {
            page: 3,
            detail: "bitmap allocation failed".into(),
        };
        assert!(e.to_string().contains("page 3"));
        assert!(e.to_string().contains("bitmap allocation failed"));
    }

    #[test]
    fn output_write_failed_carries_source() {
        use std::error::Error as _;
        let e = Pdf2ScormError::OutputWriteFailed {
            path: PathBuf::from("/tmp/out.zip"),
            source: std::io::Error::other("disk full"),
        };
        assert!(e.source().is_some());
    }
}
