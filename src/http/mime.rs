//! File extension to MIME type table.

use std::path::Path;

/// Content type for a file, from its extension.
///
/// Only the small fixed table below is supported; everything else is
/// served as `application/octet-stream`.
pub fn mime_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("txt") => "text/plain",
        Some("html") => "text/html",
        Some("gif") => "image/gif",
        Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("pdf") => "application/pdf",
        Some("x-gzip") => "application/x-gzip",
        Some("zip") => "application/zip",
        _ => "application/octet-stream",
    }
}
