//! # pdf2scorm
//!
//! Package PDF documents as SCORM 1.2 content packages.
//!
//! ## Why this crate?
//!
//! Most LMS platforms cannot display a raw PDF as a tracked course: there is
//! no bookmark, no completion status, no manifest. This crate rasterises
//! each page into a JPEG and wraps the result in a standards-shaped zip —
//! manifest, paginated viewer, and a SCORM runtime bridge — so any PDF
//! becomes a course the LMS can launch, resume, and mark complete.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     resolve local file or download from URL, check %PDF magic
//!  ├─ 2. Render    rasterise all pages via pdfium (CPU-bound, spawn_blocking)
//!  ├─ 3. Compress  JPEG-encode each page concurrently, reorder by ordinal
//!  ├─ 4. Assets    synthesize imsmanifest.xml / index.html / scorm.js
//!  └─ 5. Assemble  deterministic zip: assets first, then page1.jpg … pageN.jpg
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2scorm::{package, PackagingConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PackagingConfig::default();
//!     let output = package("document.pdf", &config).await?;
//!     std::fs::write("course.zip", &output.archive)?;
//!     for step in &output.summary {
//!         eprintln!("{step}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Archive layout
//!
//! | Entry | Purpose |
//! |-------|---------|
//! | `imsmanifest.xml` | SCORM 1.2 manifest referencing every page |
//! | `index.html`      | paginated viewer with the page count baked in |
//! | `scorm.js`        | runtime bridge (bookmarking + completion) |
//! | `page1.jpg` … `pageN.jpg` | page images, 1-based and contiguous |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2scorm` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdf2scorm = { version = "0.3", default-features = false }
//! ```
//!
//! ## PDFium
//!
//! The default rasterizer binds pdfium at runtime: a platform library next
//! to the executable, the system loader paths, or an explicit
//! `PDFIUM_LIB_PATH`. Any other backend can be injected through
//! [`PackagingConfig::rasterizer`] — the rest of the pipeline only sees the
//! [`PageRasterizer`] contract.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod assets;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PackagingConfig, PackagingConfigBuilder};
pub use convert::{inspect, package, package_from_bytes, package_sync, package_to_file};
pub use error::Pdf2ScormError;
pub use output::{DocumentMetadata, PackageOutput, PackagingStats};
pub use pipeline::render::{PageRasterizer, PdfiumRasterizer, RasterOptions};
pub use progress::{NoopProgressCallback, PackagingProgressCallback, ProgressCallback};
