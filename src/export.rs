//! Spreadsheet export.
//!
//! Writes a single-sheet `.xlsx` workbook by hand: the package is a zip of a
//! few fixed SpreadsheetML parts plus one generated worksheet. Cell text is
//! written as inline strings, so no shared-string table is needed. Output is
//! byte-for-byte reproducible: parts are written in a fixed order with a
//! fixed timestamp.

use std::fmt::Write as _;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use quick_xml::escape::escape;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::config::ExportConfig;
use crate::constants::MAX_SHEET_NAME_LEN;
use crate::error::Result;
use crate::types::Table;

const FALLBACK_SHEET_NAME: &str = "Sheet1";

// Style indices into cellXfs in STYLES_XML
const HEADER_STYLE: usize = 1;
const BODY_STYLE: usize = 2;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

// cellXfs: 0 default, 1 header (bold, grey fill, thin border, centered),
// 2 body (thin border, top aligned, wrapped)
const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/><family val="2"/></font><font><b/><sz val="11"/><color rgb="FF000000"/><name val="Calibri"/><family val="2"/></font></fonts><fills count="3"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill><fill><patternFill patternType="solid"><fgColor rgb="FFDDDDDD"/><bgColor rgb="FFDDDDDD"/></patternFill></fill></fills><borders count="2"><border><left/><right/><top/><bottom/><diagonal/></border><border><left style="thin"><color rgb="FF000000"/></left><right style="thin"><color rgb="FF000000"/></right><top style="thin"><color rgb="FF000000"/></top><bottom style="thin"><color rgb="FF000000"/></bottom><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="3"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="2" borderId="1" xfId="0" applyFont="1" applyFill="1" applyBorder="1" applyAlignment="1"><alignment horizontal="center" vertical="center" wrapText="1"/></xf><xf numFmtId="0" fontId="0" fillId="0" borderId="1" xfId="0" applyBorder="1" applyAlignment="1"><alignment vertical="top" wrapText="1"/></xf></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#;

/// Renders `table` as `.xlsx` bytes.
pub fn export_xlsx(table: &Table, config: &ExportConfig) -> Result<Vec<u8>> {
    let sheet_name = sanitize_sheet_name(&config.sheet_name);
    let widths = column_widths(table, config);

    let parts: [(&str, String); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
        ("_rels/.rels", ROOT_RELS_XML.to_string()),
        ("xl/workbook.xml", workbook_xml(&sheet_name)),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML.to_string()),
        ("xl/styles.xml", STYLES_XML.to_string()),
        ("xl/worksheets/sheet1.xml", worksheet_xml(table, &widths, config)),
    ];

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in parts {
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
    }
    Ok(zip.finish()?.into_inner())
}

/// Exports and writes the workbook to `path`.
pub fn write_xlsx(table: &Table, config: &ExportConfig, path: &Path) -> Result<()> {
    let bytes = export_xlsx(table, config)?;
    fs::write(path, &bytes)?;
    info!("Wrote {} rows ({} bytes) to {}", table.len(), bytes.len(), path.display());
    Ok(())
}

/// Width per column: longest of header and values, plus padding, capped.
/// Lengths count characters, not bytes.
pub fn column_widths(table: &Table, config: &ExportConfig) -> Vec<usize> {
    let mut widths: Vec<usize> = table.columns().iter().map(|h| h.chars().count()).collect();
    for record in table.rows() {
        for (width, cell) in widths.iter_mut().zip(record.cells()) {
            if let Some(value) = cell {
                *width = (*width).max(value.chars().count());
            }
        }
    }
    widths
        .into_iter()
        .map(|w| (w + config.column_padding).min(config.max_column_width))
        .collect()
}

/// Replaces characters Excel forbids in sheet names and truncates to the
/// format's limit.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    if cleaned.trim().is_empty() {
        FALLBACK_SHEET_NAME.to_string()
    } else {
        cleaned
    }
}

fn workbook_xml(sheet_name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        xml_text(sheet_name)
    )
}

fn worksheet_xml(table: &Table, widths: &[usize], config: &ExportConfig) -> String {
    let columns = table.columns();
    let last_cell = format!("{}{}", column_letter(columns.len() - 1), table.len() + 1);

    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );
    // Writing into a String cannot fail
    let _ = write!(
        xml,
        r#"<dimension ref="A1:{}"/><sheetViews><sheetView tabSelected="1" workbookViewId="0"/></sheetViews><sheetFormatPr defaultRowHeight="15"/><cols>"#,
        last_cell
    );
    for (idx, width) in widths.iter().enumerate() {
        let _ = write!(
            xml,
            r#"<col min="{n}" max="{n}" width="{w}" customWidth="1"/>"#,
            n = idx + 1,
            w = width
        );
    }
    xml.push_str("</cols><sheetData>");

    let _ = write!(
        xml,
        r#"<row r="1" ht="{}" customHeight="1">"#,
        config.header_row_height
    );
    for (idx, header) in columns.iter().enumerate() {
        push_text_cell(&mut xml, idx, 1, HEADER_STYLE, header);
    }
    xml.push_str("</row>");

    for (offset, record) in table.rows().iter().enumerate() {
        let row = offset + 2;
        let _ = write!(xml, r#"<row r="{}">"#, row);
        let [title, year, rating, votes] = record.cells();
        match title {
            Some(text) => push_text_cell(&mut xml, 0, row, BODY_STYLE, &text),
            None => push_empty_cell(&mut xml, 0, row),
        }
        for (idx, value) in [(1, year), (2, rating), (3, votes)] {
            match value {
                Some(number) => push_number_cell(&mut xml, idx, row, &number),
                None => push_empty_cell(&mut xml, idx, row),
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str(
        r#"</sheetData><pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/></worksheet>"#,
    );
    xml
}

fn push_text_cell(xml: &mut String, col: usize, row: usize, style: usize, text: &str) {
    let _ = write!(
        xml,
        r#"<c r="{}{}" s="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
        column_letter(col),
        row,
        style,
        xml_text(text)
    );
}

fn push_number_cell(xml: &mut String, col: usize, row: usize, number: &str) {
    let _ = write!(
        xml,
        r#"<c r="{}{}" s="{}"><v>{}</v></c>"#,
        column_letter(col),
        row,
        BODY_STYLE,
        number
    );
}

// Styled but valueless, so borders still render around blanks
fn push_empty_cell(xml: &mut String, col: usize, row: usize) {
    let _ = write!(xml, r#"<c r="{}{}" s="{}"/>"#, column_letter(col), row, BODY_STYLE);
}

/// Zero-based column index to spreadsheet letters (0 -> A, 26 -> AA).
fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Escapes markup and drops control characters XML 1.0 cannot carry.
fn xml_text(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect();
    escape(cleaned.as_str()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Record;

    #[test]
    fn widths_use_longest_value_plus_padding() {
        let table = Table::from_records(vec![
            Record::new("The Lord of the Rings: The Return of the King")
                .with_year(Some(2003))
                .with_rating(Some(9.0))
                .with_votes(Some(1_900_000)),
            Record::new("Up"),
        ]);
        let widths = column_widths(&table, &ExportConfig::default());
        // Title: 45 chars + 2; Year: 4 + 2; Rating: "Rating" 6 + 2; Votes: "1900000" 7 + 2
        assert_eq!(widths, vec![47, 6, 8, 9]);
    }

    #[test]
    fn widths_are_capped() {
        let table = Table::from_records(vec![Record::new("x".repeat(120))]);
        let widths = column_widths(&table, &ExportConfig::default());
        assert_eq!(widths[0], 50);
    }

    #[test]
    fn widths_count_characters() {
        let table = Table::from_records(vec![Record::new("Amélie")]);
        let widths = column_widths(&table, &ExportConfig::default());
        assert_eq!(widths[0], 8);
    }

    #[test]
    fn sheet_names_are_sanitized_and_truncated() {
        assert_eq!(sanitize_sheet_name("IMDb List"), "IMDb List");
        assert_eq!(sanitize_sheet_name("Top [250]: a/b"), "Top _250__ a_b");
        assert_eq!(sanitize_sheet_name(&"n".repeat(40)).chars().count(), 31);
        assert_eq!(sanitize_sheet_name(""), "Sheet1");
    }

    #[test]
    fn column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(3), "D");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(xml_text("Tom & Jerry <1>"), "Tom &amp; Jerry &lt;1&gt;");
        assert_eq!(xml_text("a\u{1}b"), "ab");
    }

    #[test]
    fn export_is_deterministic() {
        let table = Table::from_records(vec![Record::new("Heat").with_year(Some(1995))]);
        let config = ExportConfig::default();
        assert_eq!(
            export_xlsx(&table, &config).unwrap(),
            export_xlsx(&table, &config).unwrap()
        );
    }
}
