//! Leave upload import for the Leave Converter.
//!
//! This module reads payroll leave exports into [`LeaveTransaction`]s ready
//! for the breakdown: it locates the header row, canonicalizes column names,
//! filters group-header and invalid rows, and parses dates and day counts.
//!
//! [`LeaveTransaction`]: crate::models::LeaveTransaction

mod columns;
mod table;
mod workbook;

pub use columns::{ColumnMap, LeaveColumn, normalize_label};
pub use table::{Cell, ImportResult, RawTable, excel_serial_to_date, normalize_table};
pub use workbook::{read_leave_workbook, read_leave_workbook_bytes};
