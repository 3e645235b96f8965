//! XLSX splitting by groups of whole sheets.
//!
//! Workbooks are read with `calamine` and regrouped into fresh workbooks
//! written with `rust_xlsxwriter`. Cell values keep their coordinates and
//! dates keep a date number format; other styles and formulas are not
//! carried over (formula cells keep their cached values).

use crate::error::{Result, SplitError};
use crate::splitting::sheeted::{SheetSource, pack_sheets};
use crate::splitting::traits::{SplitLimits, Splitter};
use calamine::{Data, Range, Reader, Xlsx, open_workbook_from_rs};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};
use std::io::Cursor;
use tracing::info;

/// Number format applied to regrouped date and time cells.
pub const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Number format applied to regrouped duration cells.
pub const DURATION_FORMAT: &str = "[h]:mm:ss";

/// Splits workbooks into standalone workbooks of whole sheets.
///
/// The workbook is always opened first, so corrupt input is rejected even
/// when it is small enough to pass through unsplit.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxSplitter {
    limits: SplitLimits,
}

impl XlsxSplitter {
    /// Creates an XLSX splitter with the default 4 MiB limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an XLSX splitter with custom limits.
    #[must_use]
    pub const fn with_limits(limits: SplitLimits) -> Self {
        Self { limits }
    }
}

impl Splitter for XlsxSplitter {
    fn split(&self, input: &[u8]) -> Result<Vec<Vec<u8>>> {
        let mut workbook: Xlsx<Cursor<&[u8]>> =
            open_workbook_from_rs(Cursor::new(input)).map_err(SplitError::from)?;
        let names = workbook.sheet_names();

        if names.is_empty() {
            return Ok(Vec::new());
        }
        if input.len() < self.limits.hard_limit() {
            return Ok(vec![input.to_vec()]);
        }

        info!(
            sheets = names.len(),
            size = input.len(),
            "splitting workbook by sheet groups"
        );
        let sheets = WorkbookSheets::read(&mut workbook, names)?;
        let blobs = pack_sheets(&sheets, self.limits)?;
        info!(fragments = blobs.len(), "workbook split complete");
        Ok(blobs)
    }

    fn format(&self) -> &str {
        "xlsx"
    }

    fn description(&self) -> &'static str {
        "Whole sheets greedily packed under the soft target"
    }
}

/// Cell data of every sheet, loaded once.
struct WorkbookSheets {
    names: Vec<String>,
    ranges: Vec<Range<Data>>,
}

impl WorkbookSheets {
    fn read(workbook: &mut Xlsx<Cursor<&[u8]>>, names: Vec<String>) -> Result<Self> {
        let ranges = names
            .iter()
            .map(|name| workbook.worksheet_range(name).map_err(SplitError::from))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { names, ranges })
    }
}

impl SheetSource for WorkbookSheets {
    fn sheet_names(&self) -> &[String] {
        &self.names
    }

    fn render(&self, sheets: &[usize]) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        for &index in sheets {
            let worksheet = workbook.add_worksheet();
            worksheet
                .set_name(self.names[index].as_str())
                .map_err(SplitError::from)?;
            write_cells(worksheet, &self.ranges[index])?;
        }
        workbook
            .save_to_buffer()
            .map_err(|e| SplitError::from(e).into())
    }
}

#[allow(clippy::cast_precision_loss)]
fn write_cells(worksheet: &mut Worksheet, range: &Range<Data>) -> std::result::Result<(), SplitError> {
    let Some((first_row, first_col)) = range.start() else {
        return Ok(());
    };
    let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);
    let duration_format = Format::new().set_num_format(DURATION_FORMAT);

    for (r, cells) in range.rows().enumerate() {
        let row = u32::try_from(r)
            .ok()
            .and_then(|r| first_row.checked_add(r))
            .ok_or_else(|| SplitError::Xlsx {
                reason: format!("row {r} out of range"),
            })?;

        for (c, cell) in cells.iter().enumerate() {
            let col = u32::try_from(c)
                .ok()
                .and_then(|c| first_col.checked_add(c))
                .and_then(|c| u16::try_from(c).ok())
                .ok_or_else(|| SplitError::Xlsx {
                    reason: format!("column {c} out of range"),
                })?;

            match cell {
                Data::Empty => {}
                Data::Int(v) => {
                    worksheet.write_number(row, col, *v as f64)?;
                }
                Data::Float(v) => {
                    worksheet.write_number(row, col, *v)?;
                }
                Data::Bool(v) => {
                    worksheet.write_boolean(row, col, *v)?;
                }
                Data::DateTime(v) if v.is_duration() => {
                    worksheet.write_number_with_format(row, col, v.as_f64(), &duration_format)?;
                }
                Data::DateTime(v) => match to_xlsx_datetime(v) {
                    Some(datetime) => {
                        worksheet.write_datetime_with_format(row, col, datetime, &datetime_format)?;
                    }
                    // Time-only and pre-1900 serials have no calendar date.
                    None => {
                        worksheet.write_number_with_format(row, col, v.as_f64(), &datetime_format)?;
                    }
                },
                Data::String(v) => {
                    worksheet.write_string(row, col, v.as_str())?;
                }
                other => {
                    worksheet.write_string(row, col, other.to_string())?;
                }
            }
        }
    }
    Ok(())
}

/// Rebuilds a calendar datetime, normalizing 1904-epoch serials.
fn to_xlsx_datetime(value: &calamine::ExcelDateTime) -> Option<ExcelDateTime> {
    let (year, month, day, hour, min, sec, milli) = value.to_ymd_hms_milli();
    ExcelDateTime::from_ymd(year, month, day)
        .and_then(|date| date.and_hms_milli(u16::from(hour), min, sec, milli))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a workbook of `sheets` sheets, each `rows` x 10 cells.
    fn build_xlsx(sheets: usize, rows: u32) -> Vec<u8> {
        let mut workbook = Workbook::new();
        for s in 0..sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(format!("Sheet_{s}")).unwrap();
            for row in 0..rows {
                for col in 0..10u16 {
                    worksheet
                        .write_string(row, col, format!("Data_{s}_{row}_{col}"))
                        .unwrap();
                }
                worksheet.write_number(row, 10, f64::from(row) * 1.5).unwrap();
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    fn sheets_of(blob: &[u8]) -> Vec<String> {
        let workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(blob)).unwrap();
        workbook.sheet_names()
    }

    #[test]
    fn test_small_workbook_fast_path() {
        let xlsx = build_xlsx(2, 10);
        let blobs = XlsxSplitter::new().split(&xlsx).unwrap();
        assert_eq!(blobs, vec![xlsx]);
    }

    #[test]
    fn test_corrupt_small_input_rejected() {
        let result = XlsxSplitter::new().split(b"this is not a zip archive");
        assert!(matches!(
            result,
            Err(crate::error::Error::Split(SplitError::Xlsx { .. }))
        ));
    }

    #[test]
    fn test_large_workbook_groups_sheets_in_order() {
        let xlsx = build_xlsx(5, 400);
        let hard = xlsx.len() / 2;
        let splitter = XlsxSplitter::with_limits(SplitLimits::new(hard));
        let blobs = splitter.split(&xlsx).unwrap();

        assert!(blobs.len() > 1);
        let names: Vec<String> = blobs.iter().flat_map(|b| sheets_of(b)).collect();
        let expected: Vec<String> = (0..5).map(|s| format!("Sheet_{s}")).collect();
        assert_eq!(names, expected);

        for blob in &blobs {
            assert!(blob.len() <= hard || sheets_of(blob).len() == 1);
        }
    }

    #[test]
    fn test_cell_values_survive_regrouping() {
        let xlsx = build_xlsx(3, 200);
        let splitter = XlsxSplitter::with_limits(SplitLimits::new(xlsx.len() / 2));
        let blobs = splitter.split(&xlsx).unwrap();

        let last = blobs.last().unwrap();
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(last.as_slice())).unwrap();
        let range = workbook.worksheet_range("Sheet_2").unwrap();
        assert_eq!(
            range.get_value((5, 3)),
            Some(&Data::String("Data_2_5_3".to_string()))
        );
        assert_eq!(range.get_value((5, 10)), Some(&Data::Float(7.5)));
    }

    #[test]
    fn test_dates_survive_regrouping() {
        let datetime_format = Format::new().set_num_format("yyyy-mm-dd");
        let duration_format = Format::new().set_num_format("[h]:mm:ss");
        let mut workbook = Workbook::new();
        for s in 0..3 {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(format!("Month_{s}")).unwrap();
            let date = ExcelDateTime::from_ymd(2023, 7, 15).unwrap();
            worksheet
                .write_datetime_with_format(0, 0, date, &datetime_format)
                .unwrap();
            worksheet
                .write_number_with_format(0, 1, 1.25, &duration_format)
                .unwrap();
            for row in 1..300 {
                for col in 0..8u16 {
                    worksheet
                        .write_string(row, col, format!("v_{s}_{row}_{col}"))
                        .unwrap();
                }
            }
        }
        let xlsx = workbook.save_to_buffer().unwrap();

        let splitter = XlsxSplitter::with_limits(SplitLimits::new(xlsx.len() / 2));
        let blobs = splitter.split(&xlsx).unwrap();
        assert!(blobs.len() > 1);

        let mut fragment: Xlsx<_> =
            open_workbook_from_rs(Cursor::new(blobs[0].as_slice())).unwrap();
        let range = fragment.worksheet_range("Month_0").unwrap();

        assert!(
            matches!(
                range.get_value((0, 0)),
                Some(Data::DateTime(date))
                    if date.is_datetime() && date.to_ymd_hms_milli() == (2023, 7, 15, 0, 0, 0, 0)
            ),
            "date cell: {:?}",
            range.get_value((0, 0))
        );
        assert!(
            matches!(
                range.get_value((0, 1)),
                Some(Data::DateTime(duration))
                    if duration.is_duration() && (duration.as_f64() - 1.25).abs() < f64::EPSILON
            ),
            "duration cell: {:?}",
            range.get_value((0, 1))
        );
    }

    #[test]
    fn test_format() {
        assert_eq!(XlsxSplitter::new().format(), "xlsx");
    }
}
