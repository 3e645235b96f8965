//! Text rendering of document attachments.
//!
//! Chat-completion endpoints take text only, so attached documents are
//! converted before sending: PDFs through `pdf-extract`, spreadsheets
//! through `calamine`, and anything else as lossy UTF-8.

use std::fmt::Write;
use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};

use super::message::DocumentAttachment;
use crate::error::{AgentError, Result};

/// Renders an attachment as a delimited text block.
///
/// # Errors
///
/// Returns [`AgentError::InvalidRequest`] if the document cannot be read.
pub fn render_attachment(doc: &DocumentAttachment) -> Result<String> {
    let body = match doc.format.as_str() {
        "pdf" => pdf_text(&doc.bytes)?,
        "xlsx" | "xlsm" | "xls" | "ods" => workbook_text(&doc.bytes)?,
        _ => String::from_utf8_lossy(&doc.bytes).into_owned(),
    };

    Ok(format!(
        "<document name=\"{}\" format=\"{}\">\n{}\n</document>",
        doc.name,
        doc.format,
        body.trim()
    ))
}

fn pdf_text(bytes: &[u8]) -> Result<String> {
    // pdf-extract panics on some malformed inputs instead of erroring.
    let extracted = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| AgentError::InvalidRequest("PDF text extraction panicked".to_string()))?;
    extracted
        .map_err(|e| AgentError::InvalidRequest(format!("PDF text extraction failed: {e}")).into())
}

fn workbook_text(bytes: &[u8]) -> Result<String> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| AgentError::InvalidRequest(format!("cannot open workbook: {e}")))?;

    let mut out = String::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| AgentError::InvalidRequest(format!("cannot read sheet {name}: {e}")))?;

        let _ = writeln!(out, "=== Sheet: {name} ===");
        for row in range.rows() {
            let cells: Vec<String> = row.iter().map(cell_text).collect();
            if cells.iter().any(|c| !c.is_empty()) {
                out.push_str(&cells.join(" | "));
                out.push('\n');
            }
        }
        out.push('\n');
    }
    Ok(out)
}

/// Renders one cell, spelling dates out instead of their serial number.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::DateTime(v) if v.is_datetime() => {
            let (year, month, day, hour, min, sec, milli) = v.to_ymd_hms_milli();
            // Serials carry float noise; round to the nearest second within the day.
            let mut seconds = u32::from(hour) * 3600 + u32::from(min) * 60 + u32::from(sec);
            if milli >= 500 && seconds < 86_399 {
                seconds += 1;
            }
            let (hour, min, sec) = (seconds / 3600, seconds / 60 % 60, seconds % 60);
            if seconds == 0 {
                format!("{year:04}-{month:02}-{day:02}")
            } else {
                format!("{year:04}-{month:02}-{day:02} {hour:02}:{min:02}:{sec:02}")
            }
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    fn attachment(format: &str, bytes: Vec<u8>) -> DocumentAttachment {
        DocumentAttachment {
            format: format.to_string(),
            name: "sample".to_string(),
            bytes,
        }
    }

    #[test]
    fn test_plain_text_passthrough() {
        let text = render_attachment(&attachment("txt", b"hello world".to_vec())).unwrap();
        assert_eq!(
            text,
            "<document name=\"sample\" format=\"txt\">\nhello world\n</document>"
        );
    }

    #[test]
    fn test_workbook_rows_rendered() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Sales").unwrap();
        sheet.write_string(0, 0, "Region").unwrap();
        sheet.write_string(0, 1, "Total").unwrap();
        sheet.write_string(1, 0, "North").unwrap();
        sheet.write_number(1, 1, 42.5).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let text = render_attachment(&attachment("xlsx", bytes)).unwrap();
        assert!(text.contains("=== Sheet: Sales ==="));
        assert!(text.contains("Region | Total"));
        assert!(text.contains("North | 42.5"));
    }

    #[test]
    fn test_workbook_dates_rendered_as_calendar_dates() {
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Closed").unwrap();
        let closed = ExcelDateTime::from_ymd(2023, 7, 15).unwrap();
        sheet.write_datetime_with_format(0, 1, closed, &date_format).unwrap();
        let opened = ExcelDateTime::from_ymd(2023, 7, 1)
            .unwrap()
            .and_hms(9, 30, 0)
            .unwrap();
        sheet.write_datetime_with_format(1, 1, opened, &date_format).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let text = render_attachment(&attachment("xlsx", bytes)).unwrap();
        assert!(text.contains("Closed | 2023-07-15"));
        assert!(text.contains(" | 2023-07-01 09:30:00"));
        assert!(!text.contains("45122"));
    }

    #[test]
    fn test_corrupt_workbook_is_error() {
        let result = render_attachment(&attachment("xlsx", b"garbage".to_vec()));
        assert!(matches!(
            result,
            Err(crate::error::Error::Agent(AgentError::InvalidRequest(_)))
        ));
    }
}
