//! Output types returned by the packaging pipeline.

use serde::{Deserialize, Serialize};

/// The result of a successful packaging run.
///
/// The archive is owned by the caller from here on: the library keeps no
/// copy, writes nothing to a shared location, and a second call with the
/// same input produces a fresh, independent blob.
#[derive(Debug, Clone, Serialize)]
pub struct PackageOutput {
    /// The assembled SCORM zip archive.
    ///
    /// Skipped in JSON output — serialising megabytes of zip bytes into a
    /// JSON string helps nobody; use [`crate::package_to_file`] instead.
    #[serde(skip)]
    pub archive: Vec<u8>,

    /// Ordered, human-readable record of the steps completed, e.g.
    /// `["document accepted", "converted 3 pages", "pages compressed",
    /// "manifest generated", "package assembled"]`.
    pub summary: Vec<String>,

    /// Timing and size statistics for the run.
    pub stats: PackagingStats,
}

/// Statistics describing a packaging run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagingStats {
    /// Number of pages rasterised and packaged.
    pub page_count: usize,

    /// Total size of the compressed page images in bytes.
    pub image_bytes: u64,

    /// Size of the final archive in bytes.
    pub archive_bytes: u64,

    /// Wall-clock time spent rasterising, in milliseconds.
    pub render_duration_ms: u64,

    /// Wall-clock time spent compressing pages, in milliseconds.
    pub encode_duration_ms: u64,

    /// Total wall-clock time for the whole run, in milliseconds.
    pub total_duration_ms: u64,
}

/// Document metadata extracted without packaging.
///
/// Returned by [`crate::inspect`]; all fields come straight from the PDF's
/// information dictionary and may be absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_output_json_skips_archive() {
        let output = PackageOutput {
            archive: vec![0x50, 0x4b, 0x05, 0x06],
            summary: vec!["document accepted".into()],
            stats: PackagingStats {
                page_count: 1,
                image_bytes: 10,
                archive_bytes: 4,
                render_duration_ms: 1,
                encode_duration_ms: 1,
                total_duration_ms: 2,
            },
        };

        let json = serde_json::to_string(&output).expect("serialisable");
        assert!(json.contains("document accepted"));
        assert!(json.contains("\"page_count\":1"));
        assert!(!json.contains("archive\":"));
    }

    #[test]
    fn stats_round_trip() {
        let stats = PackagingStats {
            page_count: 3,
            image_bytes: 300,
            archive_bytes: 450,
            render_duration_ms: 12,
            encode_duration_ms: 8,
            total_duration_ms: 25,
        };
        let json = serde_json::to_string(&stats).unwrap();
        let back: PackagingStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back.page_count, 3);
        assert_eq!(back.archive_bytes, 450);
    }
}
