//! Minimal xlsx writer for fixtures: inline strings, numbers, date-styled
//! serials and ISO date cells, nothing else.

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use reqstat::sheet::CellValue;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, Clone)]
pub enum XlsxCell {
    Text(String),
    Number(f64),
    /// Serial day number rendered with the built-in date-time format.
    Date(f64),
    /// ISO 8601 value stored in a `t="d"` cell.
    IsoDate(String),
}

/// Cells are addressed zero-based as `(row, column)`.
#[derive(Debug, Clone)]
pub struct XlsxSheet {
    pub name: String,
    pub cells: Vec<(u32, u32, XlsxCell)>,
}

impl XlsxSheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, row: u32, col: u32, value: XlsxCell) -> Self {
        self.cells.push((row, col, value));
        self
    }

    /// Places `rows` with their top-left corner at `(top, left)`. Empty cells are not written.
    pub fn with_rows(mut self, top: u32, left: u32, rows: &[Vec<CellValue>]) -> Self {
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                let cell = match value {
                    CellValue::Empty => continue,
                    CellValue::Text(s) if s.is_empty() => continue,
                    CellValue::Text(s) => XlsxCell::Text(s.clone()),
                    CellValue::Number(n) => XlsxCell::Number(*n),
                    CellValue::Bool(b) => XlsxCell::Text(b.to_string()),
                    CellValue::DateTime(dt) => XlsxCell::Date(excel_serial(*dt)),
                };
                self.cells.push((top + r as u32, left + c as u32, cell));
            }
        }
        self
    }
}

pub fn excel_serial(dt: NaiveDateTime) -> f64 {
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (dt - base).num_seconds() as f64 / 86_400.0
}

fn column_name(mut col: u32) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    name.reverse();
    String::from_utf8(name).unwrap()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn sheet_xml(sheet: &XlsxSheet) -> String {
    let mut cells = sheet.cells.clone();
    cells.sort_by_key(|(row, col, _)| (*row, *col));

    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    let mut current_row = None;
    for (row, col, value) in &cells {
        if current_row != Some(*row) {
            if current_row.is_some() {
                xml.push_str("</row>");
            }
            xml.push_str(&format!(r#"<row r="{}">"#, row + 1));
            current_row = Some(*row);
        }
        let reference = format!("{}{}", column_name(*col), row + 1);
        match value {
            XlsxCell::Text(s) => xml.push_str(&format!(
                r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                reference,
                escape(s)
            )),
            XlsxCell::Number(n) => xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, n)),
            XlsxCell::Date(serial) => {
                xml.push_str(&format!(r#"<c r="{}" s="1"><v>{}</v></c>"#, reference, serial))
            }
            XlsxCell::IsoDate(s) => xml.push_str(&format!(
                r#"<c r="{}" t="d"><v>{}</v></c>"#,
                reference,
                escape(s)
            )),
        }
    }
    if current_row.is_some() {
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="22" applyNumberFormat="1"/></cellXfs></styleSheet>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

/// Writes `sheets`, in order, as an xlsx workbook at `path`.
pub fn write_xlsx(path: &Path, sheets: &[XlsxSheet]) -> Result<()> {
    let mut zip = ZipWriter::new(File::create(path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    let mut content_types = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
    );
    let mut workbook = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    let mut workbook_rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );

    for (index, sheet) in sheets.iter().enumerate() {
        let n = index + 1;
        content_types.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
        workbook.push_str(&format!(
            r#"<sheet name="{}" sheetId="{n}" r:id="rId{n}"/>"#,
            escape(&sheet.name)
        ));
        workbook_rels.push_str(&format!(
            r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{n}.xml"/>"#
        ));

        zip.start_file(format!("xl/worksheets/sheet{n}.xml"), options)?;
        zip.write_all(sheet_xml(sheet).as_bytes())?;
    }
    let styles_id = sheets.len() + 1;
    workbook_rels.push_str(&format!(
        r#"<Relationship Id="rId{styles_id}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#
    ));
    content_types.push_str("</Types>");
    workbook.push_str("</sheets></workbook>");
    workbook_rels.push_str("</Relationships>");

    for (name, body) in [
        ("[Content_Types].xml", content_types.as_str()),
        ("_rels/.rels", ROOT_RELS_XML),
        ("xl/workbook.xml", workbook.as_str()),
        ("xl/_rels/workbook.xml.rels", workbook_rels.as_str()),
        ("xl/styles.xml", STYLES_XML),
    ] {
        zip.start_file(name, options)?;
        zip.write_all(body.as_bytes())?;
    }
    zip.finish()?;
    Ok(())
}

