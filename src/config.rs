//! Configuration types for PDF-to-SCORM packaging.
//!
//! All packaging behaviour is controlled through [`PackagingConfig`], built
//! via its [`PackagingConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across threads and to diff two runs to
//! understand why their outputs differ.

use crate::error::Pdf2ScormError;
use crate::pipeline::render::PageRasterizer;
use crate::progress::ProgressCallback;
use std::fmt;
use std::sync::Arc;

/// Configuration for a PDF-to-SCORM packaging run.
///
/// Built via [`PackagingConfig::builder()`] or using
/// [`PackagingConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2scorm::PackagingConfig;
///
/// let config = PackagingConfig::builder()
///     .dpi(150)
///     .jpeg_quality(60)
///     .title("Induction Handbook")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct PackagingConfig {
    /// Rendering DPI used when rasterising each PDF page. Range: 72–400. Default: 150.
    ///
    /// 150 DPI keeps body text readable on a typical LMS viewport while the
    /// per-page JPEG stays well under 1 MB. Increase for small-font
    /// documents; decrease to 96 when package size matters more than
    /// sharpness.
    pub dpi: u32,

    /// Maximum rendered image dimension (width or height) in pixels. Default: 2000.
    ///
    /// A safety cap independent of DPI. A 200-DPI render of an A0 poster
    /// could produce a 13 000 × 18 000 px image and exhaust memory. This
    /// field caps either dimension, scaling the other proportionally.
    pub max_rendered_pixels: u32,

    /// JPEG quality for page images. Range: 1–100. Default: 60.
    ///
    /// 60 is the sweet spot for rendered document pages: text stays crisp
    /// at a fraction of the lossless size, which matters because an LMS
    /// re-downloads the package per learner.
    pub jpeg_quality: u8,

    /// Number of pages compressed concurrently. Default: 4.
    ///
    /// JPEG encoding is CPU-bound, so there is no point going far past the
    /// core count; each in-flight page also holds its raster bitmap in
    /// memory.
    pub concurrency: usize,

    /// Course title embedded in the manifest and viewer. Default: "PDF Content".
    pub title: String,

    /// Package identifier override.
    ///
    /// If `None`, a fresh UUID is minted per run. Injecting a fixed
    /// identifier makes the whole archive byte-reproducible for identical
    /// input — useful for caching and for tests.
    pub package_id: Option<String>,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Page rasterizer override. Takes precedence over the built-in
    /// pdfium-backed rasterizer.
    ///
    /// The pipeline only cares about the [`PageRasterizer`] contract, so a
    /// caller can swap in a different rendering backend — or a synthetic one
    /// in tests — without touching any other stage.
    pub rasterizer: Option<Arc<dyn PageRasterizer>>,

    /// Optional progress callback receiving per-page events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for PackagingConfig {
    fn default() -> Self {
        Self {
            dpi: 150,
            max_rendered_pixels: 2000,
            jpeg_quality: 60,
            concurrency: 4,
            title: "PDF Content".to_string(),
            package_id: None,
            password: None,
            download_timeout_secs: 120,
            rasterizer: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for PackagingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackagingConfig")
            .field("dpi", &self.dpi)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("concurrency", &self.concurrency)
            .field("title", &self.title)
            .field("package_id", &self.package_id)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "rasterizer",
                &self.rasterizer.as_ref().map(|_| "<dyn PageRasterizer>"),
            )
            .finish()
    }
}

impl PackagingConfig {
    /// Create a new builder for `PackagingConfig`.
    pub fn builder() -> PackagingConfigBuilder {
        PackagingConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`PackagingConfig`].
#[derive(Debug)]
pub struct PackagingConfigBuilder {
    config: PackagingConfig,
}

impl PackagingConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px;
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn package_id(mut self, id: impl Into<String>) -> Self {
        self.config.package_id = Some(id.into());
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn rasterizer(mut self, rasterizer: Arc<dyn PageRasterizer>) -> Self {
        self.config.rasterizer = Some(rasterizer);
        self
    }

    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.config.progress_callback = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PackagingConfig, Pdf2ScormError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 400 {
            return Err(Pdf2ScormError::InvalidConfig(format!(
                "DPI must be 72-400, got {}",
                c.dpi
            )));
        }
        if c.jpeg_quality < 1 || c.jpeg_quality > 100 {
            return Err(Pdf2ScormError::InvalidConfig(format!(
                "JPEG quality must be 1-100, got {}",
                c.jpeg_quality
            )));
        }
        if c.concurrency == 0 {
            return Err(Pdf2ScormError::InvalidConfig(
                "Concurrency must be >= 1".into(),
            ));
        }
        if c.max_rendered_pixels < 100 {
            return Err(Pdf2ScormError::InvalidConfig(format!(
                "max_rendered_pixels must be >= 100, got {}",
                c.max_rendered_pixels
            )));
        }
        Ok(self.config)
    }
}
