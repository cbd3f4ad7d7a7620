//! Leave breakdown export to Excel.
//!
//! Writes [`DailyLeaveRecord`]s to a single `Leave Breakdown` worksheet in
//! the column layout the time-tracking import expects.

use std::path::Path;

use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::info;

use crate::error::{ConverterError, ConverterResult};
use crate::models::DailyLeaveRecord;

/// Name of the exported worksheet.
pub const BREAKDOWN_SHEET_NAME: &str = "Leave Breakdown";

/// Header labels of the exported worksheet, in column order.
pub const BREAKDOWN_HEADERS: [&str; 8] = [
    "Employee Number",
    "Employee Name",
    "Initials",
    "Leave Description",
    "Leave Type Description",
    "Date",
    "Day of Week",
    "Daily Hours",
];

/// MIME type of the exported workbook.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Returns the download file name for an export created at `now`.
///
/// # Example
///
/// ```
/// use leave_converter::export::export_file_name;
/// use chrono::NaiveDate;
///
/// let now = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap().and_hms_opt(14, 5, 9).unwrap();
/// assert_eq!(export_file_name(now), "Leave_Breakdown_20250602_140509.xlsx");
/// ```
pub fn export_file_name(now: NaiveDateTime) -> String {
    format!("Leave_Breakdown_{}.xlsx", now.format("%Y%m%d_%H%M%S"))
}

/// Writes the breakdown to an .xlsx file.
pub fn write_breakdown_workbook<P: AsRef<Path>>(
    records: &[DailyLeaveRecord],
    path: P,
) -> ConverterResult<()> {
    let path = path.as_ref();
    let mut workbook = build_workbook(records)?;
    workbook.save(path).map_err(|e| ConverterError::Export {
        message: format!("Failed to save '{}': {}", path.display(), e),
    })?;

    info!(path = %path.display(), records = records.len(), "Wrote leave breakdown");
    Ok(())
}

/// Renders the breakdown to .xlsx bytes.
pub fn breakdown_workbook_bytes(records: &[DailyLeaveRecord]) -> ConverterResult<Vec<u8>> {
    let mut workbook = build_workbook(records)?;
    workbook.save_to_buffer().map_err(|e| ConverterError::Export {
        message: format!("Failed to render workbook: {}", e),
    })
}

fn build_workbook(records: &[DailyLeaveRecord]) -> ConverterResult<Workbook> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(BREAKDOWN_SHEET_NAME).map_err(export_error)?;

    write_headers(worksheet)?;
    for (index, record) in records.iter().enumerate() {
        write_record(worksheet, index as u32 + 1, record)?;
    }
    worksheet.autofit();

    Ok(workbook)
}

fn write_headers(worksheet: &mut Worksheet) -> ConverterResult<()> {
    let bold = Format::new().set_bold();
    for (col, header) in BREAKDOWN_HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(export_error)?;
    }
    Ok(())
}

fn write_record(worksheet: &mut Worksheet, row: u32, record: &DailyLeaveRecord) -> ConverterResult<()> {
    let text_cells = [
        record.employee_id.as_str(),
        record.employee_name.as_str(),
        record.initials.as_str(),
        record.leave_description.as_str(),
        record.leave_type_description.as_str(),
    ];
    for (col, value) in text_cells.into_iter().enumerate() {
        worksheet
            .write_string(row, col as u16, value)
            .map_err(export_error)?;
    }

    worksheet
        .write_string(row, 5, &record.date.format("%Y-%m-%d").to_string())
        .map_err(export_error)?;
    worksheet
        .write_string(row, 6, record.day_name())
        .map_err(export_error)?;
    worksheet
        .write_number(row, 7, record.daily_hours.to_f64().unwrap_or_default())
        .map_err(export_error)?;

    Ok(())
}

fn export_error(error: rust_xlsxwriter::XlsxError) -> ConverterError {
    ConverterError::Export {
        message: error.to_string(),
    }
}
