//! Workbook replacement tests
//!
//! Fixtures are minimal `.xlsx` zips: content types, a shared strings table
//! and one sheet with an inline string and a HYPERLINK formula.

use cv_gateway::{replace_gateway, replace_gateway_in_xlsx, GatewayError, ReplaceReport};
use std::io::{Read, Write};
use std::path::Path;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#;
const SHARED_STRINGS: &str = r#"<sst count="2" uniqueCount="2"><si><t>https://permagate.io/tx1</t></si><si><t>Vilnius</t></si></sst>"#;
const SHEET: &str = r#"<worksheet><sheetData><row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="inlineStr"><is><t>permagate.io/tx2</t></is></c><c r="C1" t="str"><f>HYPERLINK("https://permagate.io/tx3")</f><v>https://permagate.io/tx3</v></c></row></sheetData></worksheet>"#;
const STYLES: &str = "<styleSheet><!-- permagate.io --></styleSheet>";

fn write_parts(path: &Path, parts: &[(&str, &str)]) {
    let file = std::fs::File::create(path).unwrap();
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, body) in parts {
        writer.start_file(*name, options).unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

fn write_workbook(path: &Path) {
    write_parts(
        path,
        &[
            ("[Content_Types].xml", CONTENT_TYPES),
            ("xl/sharedStrings.xml", SHARED_STRINGS),
            ("xl/worksheets/sheet1.xml", SHEET),
            ("xl/styles.xml", STYLES),
        ],
    );
}

fn read_part(path: &Path, name: &str) -> String {
    let mut archive = ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
    let mut content = String::new();
    archive.by_name(name).unwrap().read_to_string(&mut content).unwrap();
    content
}

#[test]
fn test_replaces_shared_inline_and_formula_strings() {
    let dir = TempDir::new().unwrap();
    let workbook = dir.path().join("catalog.xlsx");
    write_workbook(&workbook);

    let report = replace_gateway_in_xlsx(&workbook, "permagate.io", "arweave.net").unwrap();

    assert_eq!(
        report,
        ReplaceReport {
            scanned: 2,
            modified: 2,
            replacements: 4
        }
    );

    let shared = read_part(&workbook, "xl/sharedStrings.xml");
    assert!(shared.contains("<t>https://arweave.net/tx1</t>"));
    assert!(shared.contains("<t>Vilnius</t>"));

    let sheet = read_part(&workbook, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains("<t>arweave.net/tx2</t>"));
    assert!(sheet.contains(r#"<f>HYPERLINK("https://arweave.net/tx3")</f>"#));
    assert!(sheet.contains("<v>https://arweave.net/tx3</v>"));
    assert!(!sheet.contains("permagate.io"));

    // Parts without cell text are copied byte for byte
    assert_eq!(read_part(&workbook, "xl/styles.xml"), STYLES);
    assert_eq!(read_part(&workbook, "[Content_Types].xml"), CONTENT_TYPES);
}

#[test]
fn test_namespace_prefixed_workbook() {
    let dir = TempDir::new().unwrap();
    let workbook = dir.path().join("prefixed.xlsx");
    write_parts(
        &workbook,
        &[(
            "xl/sharedStrings.xml",
            r#"<x:sst xmlns:x="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><x:si><x:t>https://permagate.io/tx1</x:t></x:si></x:sst>"#,
        )],
    );

    let report = replace_gateway_in_xlsx(&workbook, "permagate.io", "arweave.net").unwrap();

    assert_eq!(
        report,
        ReplaceReport {
            scanned: 1,
            modified: 1,
            replacements: 1
        }
    );
    assert!(read_part(&workbook, "xl/sharedStrings.xml")
        .contains("<x:t>https://arweave.net/tx1</x:t>"));
}

#[test]
fn test_second_pass_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let workbook = dir.path().join("catalog.xlsx");
    write_workbook(&workbook);

    replace_gateway(&workbook, "permagate.io", "arweave.net").unwrap();
    let after_first = std::fs::read(&workbook).unwrap();

    let report = replace_gateway(&workbook, "permagate.io", "arweave.net").unwrap();

    assert_eq!(report.replacements, 0);
    assert_eq!(report.modified, 0);
    assert_eq!(std::fs::read(&workbook).unwrap(), after_first);
}

#[test]
fn test_unmatched_gateway_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let workbook = dir.path().join("catalog.xlsx");
    write_workbook(&workbook);
    let before = std::fs::read(&workbook).unwrap();

    let report = replace_gateway_in_xlsx(&workbook, "ar-io.dev", "arweave.net").unwrap();

    assert_eq!(report.replacements, 0);
    assert_eq!(std::fs::read(&workbook).unwrap(), before);
}

#[test]
fn test_missing_workbook() {
    let dir = TempDir::new().unwrap();
    let result = replace_gateway_in_xlsx(&dir.path().join("missing.xlsx"), "a", "b");

    match result {
        Err(GatewayError::NotFound(path)) => assert!(path.ends_with("missing.xlsx")),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_not_a_zip_is_error() {
    let dir = TempDir::new().unwrap();
    let workbook = dir.path().join("broken.xlsx");
    std::fs::write(&workbook, "not a workbook").unwrap();

    let result = replace_gateway_in_xlsx(&workbook, "permagate.io", "arweave.net");
    assert!(matches!(result, Err(GatewayError::Zip(_))));
}
