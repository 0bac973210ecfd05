//! Archive assembly: serialize the package tree into a single zip blob.
//!
//! The assembler knows nothing about SCORM, pages, or manifests — it takes
//! `(relative path, bytes)` pairs and writes them into a deflate zip held in
//! memory, in the order given. Entry order and timestamps are pinned so
//! identical input trees always serialize to identical archive bytes.

use crate::error::Pdf2ScormError;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Serialize a package tree into zip archive bytes.
///
/// Every entry appears at exactly its given relative path. Paths must be
/// unique: the page/asset namespaces are disjoint by construction upstream,
/// but that invariant is re-checked here rather than trusted.
///
/// An empty tree yields a valid, openable empty archive.
pub fn assemble(entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>, Pdf2ScormError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for (path, _) in entries {
        if !seen.insert(path.as_str()) {
            return Err(Pdf2ScormError::DuplicatePath { path: path.clone() });
        }
    }

    // A fixed timestamp keeps archive bytes identical across runs on the
    // same input tree.
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for (path, bytes) in entries {
        writer
            .start_file(path.as_str(), options)
            .map_err(|e| Pdf2ScormError::AssemblyFailed {
                detail: format!("'{path}': {e}"),
            })?;
        writer
            .write_all(bytes)
            .map_err(|e| Pdf2ScormError::AssemblyFailed {
                detail: format!("'{path}': {e}"),
            })?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| Pdf2ScormError::AssemblyFailed {
            detail: e.to_string(),
        })?;

    Ok(cursor.into_inner())
}
