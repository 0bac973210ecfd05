//! Packaging entry points: the pipeline orchestrator.
//!
//! ## Stage order
//!
//! Accept → rasterize → compress → synthesize assets → assemble. Each stage
//! consumes the previous one's output, with one exception: asset synthesis
//! only needs the page *count*, so it is free to run any time after
//! rasterization and sits after compression here.
//!
//! ## No partial output
//!
//! Every stage failure propagates immediately and the in-flight artifacts
//! are dropped. A caller either receives a complete archive or an error,
//! never a package missing pages.

use crate::assets;
use crate::config::PackagingConfig;
use crate::error::Pdf2ScormError;
use crate::output::{DocumentMetadata, PackageOutput, PackagingStats};
use crate::pipeline::render::{PageRasterizer, PdfiumRasterizer, RasterOptions};
use crate::pipeline::{archive, encode, input, render};
use futures::stream::{self, StreamExt};
use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

/// Package a PDF file or URL as a SCORM archive.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input` — Local file path or HTTP/HTTPS URL to a PDF
/// * `config` — Packaging configuration
///
/// # Errors
/// Any stage failure aborts the run: unreadable or non-PDF input,
/// rasterization failure, page compression failure, or archive assembly
/// failure. No partial archive is ever returned.
pub async fn package(
    input: impl AsRef<str>,
    config: &PackagingConfig,
) -> Result<PackageOutput, Pdf2ScormError> {
    let input = input.as_ref();
    info!("Starting packaging: {}", input);

    let document = input::resolve_input(input, config.download_timeout_secs).await?;
    package_from_bytes(document, config).await
}

/// Package in-memory PDF bytes as a SCORM archive.
///
/// The recommended API when the document comes from an upload buffer,
/// database, or network stream rather than a file on disk.
pub async fn package_from_bytes(
    document: impl Into<Vec<u8>>,
    config: &PackagingConfig,
) -> Result<PackageOutput, Pdf2ScormError> {
    let total_start = Instant::now();
    let document = document.into();

    // ── Step 1: Accept ───────────────────────────────────────────────────
    input::validate_pdf_magic(&document)?;
    let mut summary = vec!["document accepted".to_string()];

    let package_id = config
        .package_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
    debug!("Package identifier: {}", package_id);

    // ── Step 2: Rasterize ────────────────────────────────────────────────
    let rasterizer: Arc<dyn PageRasterizer> = config
        .rasterizer
        .clone()
        .unwrap_or_else(|| Arc::new(PdfiumRasterizer));
    let options = RasterOptions {
        dpi: config.dpi,
        max_pixels: config.max_rendered_pixels,
        password: config.password.clone(),
    };

    let render_start = Instant::now();
    let images = render::render_pages(document, rasterizer, options).await?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;

    let page_count = images.len();
    if page_count == 0 {
        return Err(Pdf2ScormError::EmptyDocument);
    }
    info!("Rendered {} pages in {}ms", page_count, render_duration_ms);
    summary.push(format!("converted {page_count} pages"));

    if let Some(ref cb) = config.progress_callback {
        cb.on_packaging_start(page_count);
    }

    // ── Step 3: Compress ─────────────────────────────────────────────────
    let encode_start = Instant::now();
    let pages = compress_pages(images, config).await?;
    let encode_duration_ms = encode_start.elapsed().as_millis() as u64;
    let image_bytes: u64 = pages.iter().map(|(_, bytes)| bytes.len() as u64).sum();
    info!(
        "Compressed {} pages ({} bytes) in {}ms",
        page_count, image_bytes, encode_duration_ms
    );
    summary.push("pages compressed".to_string());

    // ── Step 4: Synthesize assets ────────────────────────────────────────
    let manifest = assets::build_manifest(&package_id, &config.title, page_count);
    let viewer = assets::build_viewer(&config.title, page_count);
    let bridge = assets::build_runtime_bridge();
    summary.push("manifest generated".to_string());

    // ── Step 5: Assemble ─────────────────────────────────────────────────
    // Fixed entry order: the three generated assets, then pages ascending.
    let mut entries: Vec<(String, Vec<u8>)> = Vec::with_capacity(page_count + 3);
    entries.push((assets::MANIFEST_FILE.to_string(), manifest.into_bytes()));
    entries.push((assets::VIEWER_FILE.to_string(), viewer.into_bytes()));
    entries.push((assets::BRIDGE_FILE.to_string(), bridge.as_bytes().to_vec()));
    for (page, bytes) in pages {
        entries.push((assets::page_file_name(page), bytes));
    }

    let archive = archive::assemble(&entries)?;
    summary.push("package assembled".to_string());

    if let Some(ref cb) = config.progress_callback {
        cb.on_packaging_complete(page_count, archive.len());
    }

    let stats = PackagingStats {
        page_count,
        image_bytes,
        archive_bytes: archive.len() as u64,
        render_duration_ms,
        encode_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Packaging complete: {} pages, {} bytes, {}ms total",
        page_count, stats.archive_bytes, stats.total_duration_ms
    );

    Ok(PackageOutput {
        archive,
        summary,
        stats,
    })
}

/// Package a PDF and write the archive directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn package_to_file(
    input: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &PackagingConfig,
) -> Result<PackagingStats, Pdf2ScormError> {
    let output = package(input, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Pdf2ScormError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                }
            })?;
        }
    }

    let tmp_path = path.with_extension("zip.tmp");
    tokio::fs::write(&tmp_path, &output.archive)
        .await
        .map_err(|e| Pdf2ScormError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Pdf2ScormError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output.stats)
}

/// Synchronous wrapper around [`package`].
///
/// Creates a temporary tokio runtime internally.
pub fn package_sync(
    input: impl AsRef<str>,
    config: &PackagingConfig,
) -> Result<PackageOutput, Pdf2ScormError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2ScormError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(package(input, config))
}

/// Extract PDF metadata without packaging anything.
pub async fn inspect(input_str: impl AsRef<str>) -> Result<DocumentMetadata, Pdf2ScormError> {
    let document = input::resolve_input(input_str.as_ref(), 120).await?;
    render::extract_metadata(document, None).await
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Compress rendered pages concurrently, bounded by `config.concurrency`.
///
/// Pages complete in whatever order the encoder threads finish; the result
/// is re-sorted by page ordinal so the archive layout never depends on
/// scheduling. The first failure aborts the run.
async fn compress_pages(
    images: Vec<DynamicImage>,
    config: &PackagingConfig,
) -> Result<Vec<(usize, Vec<u8>)>, Pdf2ScormError> {
    let total_pages = images.len();
    let quality = config.jpeg_quality;

    let results: Vec<Result<(usize, Vec<u8>), Pdf2ScormError>> =
        stream::iter(images.into_iter().enumerate().map(|(index, image)| {
            let callback = config.progress_callback.clone();
            async move {
                let page = index + 1;
                if let Some(ref cb) = callback {
                    cb.on_page_start(page, total_pages);
                }

                let result =
                    tokio::task::spawn_blocking(move || encode::encode_page(&image, page, quality))
                        .await
                        .map_err(|e| {
                            Pdf2ScormError::Internal(format!("Encode task panicked: {e}"))
                        })?;

                match result {
                    Ok(bytes) => {
                        if let Some(ref cb) = callback {
                            cb.on_page_complete(page, total_pages, bytes.len());
                        }
                        Ok((page, bytes))
                    }
                    Err(e) => {
                        if let Some(ref cb) = callback {
                            cb.on_page_error(page, total_pages, &e.to_string());
                        }
                        Err(e)
                    }
                }
            }
        }))
        .buffer_unordered(config.concurrency)
        .collect()
        .await;

    let mut pages = results
        .into_iter()
        .collect::<Result<Vec<(usize, Vec<u8>)>, Pdf2ScormError>>()?;

    // Completion order is nondeterministic; archive order must not be.
    pages.sort_by_key(|(page, _)| *page);

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn page_image(seed: usize) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(
            48,
            64,
            Rgb([(seed * 37 % 256) as u8, 90, 180]),
        ))
    }

    #[tokio::test]
    async fn compressed_pages_come_back_in_ordinal_order() {
        let config = PackagingConfig::builder()
            .concurrency(8)
            .build()
            .unwrap();
        let images: Vec<DynamicImage> = (0..12).map(page_image).collect();

        let pages = compress_pages(images, &config).await.unwrap();
        let ordinals: Vec<usize> = pages.iter().map(|(page, _)| *page).collect();
        assert_eq!(ordinals, (1..=12).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn compression_failure_aborts_the_batch() {
        // Quality validation is the one encoder failure reachable without a
        // corrupt bitmap; bypass the builder to reach it.
        let config = PackagingConfig {
            jpeg_quality: 0,
            ..PackagingConfig::default()
        };
        let images = vec![page_image(1), page_image(2)];

        let err = compress_pages(images, &config).await.unwrap_err();
        assert!(matches!(err, Pdf2ScormError::InvalidQuality { quality: 0 }));
    }
}
