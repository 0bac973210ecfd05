//! Progress-callback trait for per-page packaging events.
//!
//! Inject an [`Arc<dyn PackagingProgressCallback>`] via
//! [`crate::config::PackagingConfigBuilder::progress_callback`] to receive
//! real-time events as the pipeline compresses each page.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a channel, a WebSocket, a database record, or a terminal
//! progress bar — without the library knowing anything about how the host
//! application communicates. The trait is `Send + Sync` because pages are
//! compressed concurrently.

use std::sync::Arc;

/// Called by the packaging pipeline as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
///
/// # Thread safety
///
/// `on_page_start`, `on_page_complete`, and `on_page_error` may be called
/// concurrently from different threads. Implementations must protect shared
/// mutable state with appropriate synchronisation primitives (e.g. `Mutex`,
/// `AtomicUsize`).
pub trait PackagingProgressCallback: Send + Sync {
    /// Called once after rasterisation, before any page is compressed.
    ///
    /// # Arguments
    /// * `total_pages` — number of pages that will be packaged
    fn on_packaging_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before a page is compressed.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages in the document
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called when a page has been compressed.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages
    /// * `jpeg_bytes`  — byte size of the compressed page image
    fn on_page_complete(&self, page_num: usize, total_pages: usize, jpeg_bytes: usize) {
        let _ = (page_num, total_pages, jpeg_bytes);
    }

    /// Called when compressing a page fails (the run aborts afterwards).
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages
    /// * `error`       — human-readable error description
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Called once after the archive has been assembled.
    ///
    /// # Arguments
    /// * `total_pages`   — pages packaged
    /// * `archive_bytes` — size of the finished archive
    fn on_packaging_complete(&self, total_pages: usize, archive_bytes: usize) {
        let _ = (total_pages, archive_bytes);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl PackagingProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::PackagingConfig`].
pub type ProgressCallback = Arc<dyn PackagingProgressCallback>;
