//! Pipeline stages for PDF-to-SCORM packaging.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch rendering backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ encode ──▶ archive
//! (URL/path) (pdfium)  (jpeg)    (zip)
//! ```
//!
//! 1. [`input`]   — canonicalise the user-supplied path or URL to in-memory
//!    document bytes and validate the PDF magic
//! 2. [`render`]  — rasterise every page in order; runs in `spawn_blocking`
//!    because pdfium is not async-safe
//! 3. [`encode`]  — re-encode each rendered page as a bounded-quality JPEG
//! 4. [`archive`] — serialize the package tree (generated assets + page
//!    images) into a single deterministic zip blob
//!
//! Asset synthesis ([`crate::assets`]) sits outside the stage chain: it only
//! needs the page count and the package identifier, not the images.

pub mod archive;
pub mod encode;
pub mod input;
pub mod render;
