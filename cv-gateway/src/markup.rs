//! Gateway replacement in markup files
//!
//! Accepts a single file or a folder; folders are walked recursively and
//! only markup-like files are touched.

use crate::{GatewayError, GatewayResult, ReplaceReport};
use std::path::Path;
use walkdir::WalkDir;

/// Extensions treated as markup when walking a folder
pub const MARKUP_EXTENSIONS: &[&str] = &["html", "htm", "md", "markdown", "xml", "txt"];

/// Replace `old_gateway` with `new_gateway` in the file or folder at `path`
///
/// Files are rewritten only when their content changes. Files that cannot
/// be read as UTF-8 text are logged and skipped.
pub fn replace_gateway_in_markup(
    path: &Path,
    old_gateway: &str,
    new_gateway: &str,
) -> GatewayResult<ReplaceReport> {
    if !path.exists() {
        return Err(GatewayError::NotFound(path.to_path_buf()));
    }

    let mut report = ReplaceReport::default();

    if path.is_file() {
        replace_in_file(path, old_gateway, new_gateway, &mut report);
        return Ok(report);
    }

    for entry in WalkDir::new(path).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_file() && is_markup(entry.path()) {
            replace_in_file(entry.path(), old_gateway, new_gateway, &mut report);
        }
    }

    Ok(report)
}

fn is_markup(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            MARKUP_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

fn replace_in_file(path: &Path, old: &str, new: &str, report: &mut ReplaceReport) {
    report.scanned += 1;

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(file = %path.display(), "Skipping unreadable file: {}", e);
            return;
        }
    };

    let hits = content.matches(old).count();
    if hits == 0 {
        return;
    }

    if let Err(e) = std::fs::write(path, content.replace(old, new)) {
        tracing::warn!(file = %path.display(), "Failed to write file: {}", e);
        return;
    }

    tracing::debug!(file = %path.display(), replacements = hits, "Updated file");
    report.modified += 1;
    report.replacements += hits;
}
