//! cv-gateway - Swap one Arweave gateway for another in stored documents
//!
//! Two variants share one literal find-replace contract:
//! - spreadsheet: every string cell of an `.xlsx` workbook
//! - markup: HTML, Markdown and similar text files, singly or per folder

pub mod error;
pub mod markup;
pub mod spreadsheet;

pub use error::{GatewayError, GatewayResult};
pub use markup::replace_gateway_in_markup;
pub use spreadsheet::replace_gateway_in_xlsx;

use std::path::Path;

/// Outcome of a replacement run
///
/// For spreadsheets `scanned`/`modified` count workbook parts (shared
/// strings, sheets); for markup they count files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceReport {
    pub scanned: usize,
    pub modified: usize,
    pub replacements: usize,
}

/// Document family selected from the target path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Spreadsheet,
    Markup,
}

impl Variant {
    pub fn for_path(path: &Path) -> Self {
        let is_xlsx = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("xlsx"))
            .unwrap_or(false);

        if is_xlsx {
            Variant::Spreadsheet
        } else {
            Variant::Markup
        }
    }
}

/// Replace `old_gateway` with `new_gateway` in the document(s) at `path`
pub fn replace_gateway(
    path: &Path,
    old_gateway: &str,
    new_gateway: &str,
) -> GatewayResult<ReplaceReport> {
    if old_gateway.is_empty() {
        return Err(GatewayError::EmptyPattern);
    }

    match Variant::for_path(path) {
        Variant::Spreadsheet => replace_gateway_in_xlsx(path, old_gateway, new_gateway),
        Variant::Markup => replace_gateway_in_markup(path, old_gateway, new_gateway),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_selection() {
        assert_eq!(Variant::for_path(Path::new("catalog.xlsx")), Variant::Spreadsheet);
        assert_eq!(Variant::for_path(Path::new("CATALOG.XLSX")), Variant::Spreadsheet);
        assert_eq!(Variant::for_path(Path::new("posts/post_01.html")), Variant::Markup);
        assert_eq!(Variant::for_path(Path::new("posts")), Variant::Markup);
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let result = replace_gateway(Path::new("catalog.xlsx"), "", "arweave.net");
        assert!(matches!(result, Err(GatewayError::EmptyPattern)));
    }
}
