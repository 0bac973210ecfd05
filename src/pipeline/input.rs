//! Input resolution: normalise a user-supplied path or URL to document bytes.
//!
//! ## Why bytes rather than paths?
//!
//! The rasterizer loads documents from a byte slice, so the pipeline never
//! needs the input on disk: local files are read once, URL inputs download
//! straight into memory, and there is no working directory to clean up on
//! any exit path. We validate the PDF magic bytes (`%PDF`) before handing
//! anything to the rasterizer so callers get a meaningful rejection rather
//! than a parser crash deep inside pdfium.

use crate::error::Pdf2ScormError;
use std::path::PathBuf;
use tracing::{debug, info};

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Validate the `%PDF` magic at the start of the document.
///
/// Anything shorter than four bytes cannot be a PDF either way.
pub fn validate_pdf_magic(bytes: &[u8]) -> Result<(), Pdf2ScormError> {
    if bytes.len() < 4 {
        return Err(Pdf2ScormError::InvalidInput {
            input: format!("{} bytes of input", bytes.len()),
        });
    }
    if &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(Pdf2ScormError::NotAPdf { magic });
    }
    Ok(())
}

/// Resolve the input string to in-memory document bytes.
///
/// If the input is a URL, download it with the given timeout.
/// If the input is a local file, read it, mapping I/O errors to the
/// appropriate input error. The magic check happens in both branches so no
/// caller can skip it by accident.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<Vec<u8>, Pdf2ScormError> {
    let bytes = if is_url(input) {
        download_url(input, timeout_secs).await?
    } else {
        read_local(input).await?
    };
    validate_pdf_magic(&bytes)?;
    Ok(bytes)
}

/// Read a local file, mapping I/O errors to input errors.
async fn read_local(path_str: &str) -> Result<Vec<u8>, Pdf2ScormError> {
    let path = PathBuf::from(path_str);

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            debug!("Read local PDF: {} ({} bytes)", path.display(), bytes.len());
            Ok(bytes)
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(Pdf2ScormError::PermissionDenied { path })
        }
        Err(_) => Err(Pdf2ScormError::FileNotFound { path }),
    }
}

/// Download a URL and return its bytes.
async fn download_url(url: &str, timeout_secs: u64) -> Result<Vec<u8>, Pdf2ScormError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Pdf2ScormError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            Pdf2ScormError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            Pdf2ScormError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(Pdf2ScormError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Pdf2ScormError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    info!("Downloaded {} bytes", bytes.len());
    Ok(bytes.to_vec())
}
