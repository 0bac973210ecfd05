//! PDF rasterisation: render every page to a `DynamicImage`.
//!
//! ## Why a trait?
//!
//! The pipeline needs exactly one thing from its rendering backend: ordered,
//! fully decoded page images for a byte buffer. [`PageRasterizer`] captures
//! that contract so the backend can be swapped — a different PDF engine, or
//! a synthetic source in tests — via
//! [`crate::config::PackagingConfig::rasterizer`] without touching the
//! compression or assembly stages. [`PdfiumRasterizer`] is the default.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. [`render_pages`] moves the work onto the blocking thread pool
//! so Tokio worker threads never stall during CPU-heavy rendering.
//!
//! ## Why cap pixels, not just DPI?
//!
//! Page sizes vary wildly: an A0 poster at 150 DPI would produce a
//! 12,000 × 17,000 px image. `max_pixels` caps the longest edge regardless
//! of physical page size, keeping memory bounded.

use crate::error::Pdf2ScormError;
use crate::output::DocumentMetadata;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::sync::Arc;
use tracing::{debug, info};

/// Options handed to the rasterizer for one run.
#[derive(Debug, Clone)]
pub struct RasterOptions {
    /// Sampling density in dots per inch.
    pub dpi: u32,
    /// Longest-edge cap in pixels.
    pub max_pixels: u32,
    /// User password for encrypted documents.
    pub password: Option<String>,
}

/// A pluggable page-rendering capability.
///
/// # Contract
///
/// * The output length equals the document's page count, in natural page
///   order, each image fully decoded.
/// * A document that cannot be parsed is an error, never an empty result;
///   a parseable document with zero pages is [`Pdf2ScormError::EmptyDocument`].
/// * No retries: a failure is final for this run.
pub trait PageRasterizer: Send + Sync {
    fn rasterize(
        &self,
        document: &[u8],
        options: &RasterOptions,
    ) -> Result<Vec<DynamicImage>, Pdf2ScormError>;
}

/// The default rasterizer, backed by pdfium.
pub struct PdfiumRasterizer;

impl PageRasterizer for PdfiumRasterizer {
    fn rasterize(
        &self,
        document: &[u8],
        options: &RasterOptions,
    ) -> Result<Vec<DynamicImage>, Pdf2ScormError> {
        let pdfium = bind_pdfium()?;

        let document = pdfium
            .load_pdf_from_byte_slice(document, options.password.as_deref())
            .map_err(|e| map_load_error(e, options.password.is_some()))?;

        let pages = document.pages();
        let total_pages = pages.len() as usize;
        info!("PDF loaded: {} pages", total_pages);

        if total_pages == 0 {
            return Err(Pdf2ScormError::EmptyDocument);
        }

        let mut images = Vec::with_capacity(total_pages);

        for (index, page) in pages.iter().enumerate() {
            let page_num = index + 1;

            // Scale the page's physical width (points, 1/72 in) by the DPI,
            // clamped to the pixel cap; height follows proportionally.
            let width_px = (page.width().value * options.dpi as f32 / 72.0).round() as i32;
            let width_px = width_px.clamp(1, options.max_pixels as i32);

            let render_config = PdfRenderConfig::new()
                .set_target_width(width_px)
                .set_maximum_height(options.max_pixels as i32);

            let bitmap = page.render_with_config(&render_config).map_err(|e| {
                Pdf2ScormError::PageRenderFailed {
                    page: page_num,
                    detail: format!("{e:?}"),
                }
            })?;

            let image = bitmap.as_image();
            debug!(
                "Rendered page {} -> {}x{} px",
                page_num,
                image.width(),
                image.height()
            );

            images.push(image);
        }

        Ok(images)
    }
}

/// Rasterise a document on the blocking thread pool.
///
/// Takes ownership of the document bytes; nothing downstream needs them
/// once the pages are rendered.
pub async fn render_pages(
    document: Vec<u8>,
    rasterizer: Arc<dyn PageRasterizer>,
    options: RasterOptions,
) -> Result<Vec<DynamicImage>, Pdf2ScormError> {
    tokio::task::spawn_blocking(move || rasterizer.rasterize(&document, &options))
        .await
        .map_err(|e| Pdf2ScormError::Internal(format!("Render task panicked: {e}")))?
}

/// Extract document metadata without rendering pages.
pub async fn extract_metadata(
    document: Vec<u8>,
    password: Option<String>,
) -> Result<DocumentMetadata, Pdf2ScormError> {
    tokio::task::spawn_blocking(move || extract_metadata_blocking(&document, password.as_deref()))
        .await
        .map_err(|e| Pdf2ScormError::Internal(format!("Metadata task panicked: {e}")))?
}

/// Blocking implementation of metadata extraction.
fn extract_metadata_blocking(
    document: &[u8],
    password: Option<&str>,
) -> Result<DocumentMetadata, Pdf2ScormError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_byte_slice(document, password)
        .map_err(|e| map_load_error(e, password.is_some()))?;

    let metadata = document.metadata();
    let pages = document.pages();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    Ok(DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
        modification_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
        page_count: pages.len() as usize,
        pdf_version: format!("{:?}", document.version()),
    })
}

/// Bind to a pdfium library.
///
/// `PDFIUM_LIB_PATH` wins when set; otherwise a platform library in the
/// working directory, then the system loader paths.
fn bind_pdfium() -> Result<Pdfium, Pdf2ScormError> {
    let bindings = match std::env::var("PDFIUM_LIB_PATH") {
        Ok(path) => Pdfium::bind_to_library(&path),
        Err(_) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    };
    bindings
        .map(Pdfium::new)
        .map_err(|e| Pdf2ScormError::PdfiumBindingFailed(format!("{e:?}")))
}

/// Map a pdfium load error to the matching input/conversion error.
fn map_load_error(error: PdfiumError, password_supplied: bool) -> Pdf2ScormError {
    let detail = format!("{error:?}");
    if detail.contains("Password") || detail.contains("password") {
        if password_supplied {
            Pdf2ScormError::WrongPassword
        } else {
            Pdf2ScormError::PasswordRequired
        }
    } else {
        Pdf2ScormError::ConversionFailed { detail }
    }
}
