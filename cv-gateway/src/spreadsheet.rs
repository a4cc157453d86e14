//! Gateway replacement inside `.xlsx` workbooks
//!
//! A workbook is a zip of XML parts. String cells live in the shared
//! strings table (`<si><t>`), as inline strings inside sheets (`<is><t>`),
//! or as formula text (`<f>`, e.g. `HYPERLINK("https://…")`). A formula
//! cell of type `str` also caches its result in `<v>`, which is rewritten
//! with it. Element names may carry a namespace prefix (`<x:t>`). Only the
//! text of those elements is rewritten; markup and all other parts are
//! copied through untouched. Text split across rich-text runs is matched
//! per run.

use crate::{GatewayError, GatewayResult, ReplaceReport};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
const WORKSHEETS_PREFIX: &str = "xl/worksheets/";

/// `<t>`/`<f>` element with plain text content, optionally prefixed
static TEXT_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(<([\w.-]+:)?([tf])(?:\s[^>]*[^/>])?>)([^<]*)</([\w.-]+:)?([tf])>")
        .expect("static regex")
});

/// Cached `<v>` result, same group layout as `TEXT_ELEMENT`
static CACHED_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(<([\w.-]+:)?(v)(?:\s[^>]*[^/>])?>)([^<]*)</([\w.-]+:)?(v)>")
        .expect("static regex")
});

/// Cell holding a string-valued formula (`t="str"`), not self-closing
static STRING_FORMULA_CELL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<(?:[\w.-]+:)?c\s[^>]*\bt="str"(?:[^>]*[^/>])?>.*?</(?:[\w.-]+:)?c>"#)
        .expect("static regex")
});

/// Replace `old_gateway` with `new_gateway` in every string cell
///
/// The workbook is rewritten in place (temp file + rename) only when at
/// least one replacement was made.
pub fn replace_gateway_in_xlsx(
    path: &Path,
    old_gateway: &str,
    new_gateway: &str,
) -> GatewayResult<ReplaceReport> {
    if !path.exists() {
        return Err(GatewayError::NotFound(path.to_path_buf()));
    }

    let mut archive = ZipArchive::new(File::open(path)?)?;
    let old_escaped = escape_xml_text(old_gateway);
    let new_escaped = escape_xml_text(new_gateway);

    let part_names: Vec<String> = archive
        .file_names()
        .filter(|name| is_string_part(name))
        .map(str::to_string)
        .collect();

    let mut report = ReplaceReport::default();
    let mut rewritten = BTreeMap::new();

    for name in part_names {
        let xml = read_part(&mut archive, &name)?;
        report.scanned += 1;

        let (updated, count) = replace_in_text_elements(&xml, &old_escaped, &new_escaped);
        if count > 0 {
            tracing::debug!(part = %name, replacements = count, "Rewrote workbook part");
            report.modified += 1;
            report.replacements += count;
            rewritten.insert(name, updated);
        }
    }

    if rewritten.is_empty() {
        return Ok(report);
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;

    {
        let mut writer = ZipWriter::new(temp.as_file_mut());

        for index in 0..archive.len() {
            let entry = archive.by_index_raw(index)?;
            match rewritten.get(entry.name()) {
                Some(updated) => {
                    let name = entry.name().to_string();
                    let options = SimpleFileOptions::default()
                        .compression_method(entry.compression());
                    drop(entry);
                    writer.start_file(name, options)?;
                    writer.write_all(updated.as_bytes())?;
                }
                None => writer.raw_copy_file(entry)?,
            }
        }

        writer.finish()?;
    }

    std::fs::set_permissions(temp.path(), std::fs::metadata(path)?.permissions())?;
    temp.persist(path).map_err(|e| GatewayError::Io(e.error))?;

    Ok(report)
}

fn is_string_part(name: &str) -> bool {
    name == SHARED_STRINGS_PART
        || (name.starts_with(WORKSHEETS_PREFIX)
            && name.ends_with(".xml")
            && !name[WORKSHEETS_PREFIX.len()..].contains('/'))
}

fn read_part(archive: &mut ZipArchive<File>, name: &str) -> GatewayResult<String> {
    let mut entry = archive.by_name(name)?;
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    String::from_utf8(bytes).map_err(|_| GatewayError::InvalidPart(name.to_string()))
}

/// Replace inside element text only; returns the new XML and the count
fn replace_in_text_elements(xml: &str, old: &str, new: &str) -> (String, usize) {
    let mut count = 0;

    let updated = replace_element_text(&TEXT_ELEMENT, xml, old, new, &mut count);
    let updated = STRING_FORMULA_CELL.replace_all(&updated, |cell: &Captures| {
        replace_element_text(&CACHED_VALUE, &cell[0], old, new, &mut count)
    });

    (updated.into_owned(), count)
}

/// Replace in the text of every element matched by `element`
///
/// Matches whose closing tag differs from the opening one are left as is.
fn replace_element_text(
    element: &Regex,
    xml: &str,
    old: &str,
    new: &str,
    count: &mut usize,
) -> String {
    element
        .replace_all(xml, |caps: &Captures| {
            let open_name = (caps.get(2).map_or("", |m| m.as_str()), &caps[3]);
            let close_name = (caps.get(5).map_or("", |m| m.as_str()), &caps[6]);
            let text = &caps[4];
            let hits = text.matches(old).count();
            if hits == 0 || open_name != close_name {
                return caps[0].to_string();
            }
            *count += hits;
            format!(
                "{}{}</{}{}>",
                &caps[1],
                text.replace(old, new),
                open_name.0,
                open_name.1
            )
        })
        .into_owned()
}

/// Escape text the way it is stored inside an XML element
fn escape_xml_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
