use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet, XlsxError};

use super::sink::{SinkError, TableSink};
use super::table::Table;
use super::value::CellValue;

/// File name used when the caller only names an output directory.
pub const DEFAULT_WORKBOOK_NAME: &str = "output.xlsx";

const TIMESTAMP_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Collects every table as a worksheet of one `.xlsx` file, saved on `finish`.
pub struct WorkbookSink {
    path: PathBuf,
    workbook: Workbook,
    timestamp_format: Format,
}

impl WorkbookSink {
    /// Prepares a workbook at `path`, creating missing parent directories.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| SinkError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        Ok(Self {
            path,
            workbook: Workbook::new(),
            timestamp_format: Format::new().set_num_format(TIMESTAMP_FORMAT),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableSink for WorkbookSink {
    fn write_table(&mut self, table: &Table) -> Result<(), SinkError> {
        let sheet = table.sheet_name();
        let worksheet = self.workbook.add_worksheet();

        fill_sheet(worksheet, table, &self.timestamp_format)
            .map_err(|source| SinkError::Sheet { sheet, source })
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.workbook
            .save(&self.path)
            .map_err(|source| SinkError::Workbook {
                path: self.path.clone(),
                source,
            })
    }
}

fn fill_sheet(worksheet: &mut Worksheet, table: &Table, timestamp: &Format) -> Result<(), XlsxError> {
    worksheet.set_name(table.sheet_name())?;

    for (col, name) in table.header.iter().enumerate() {
        worksheet.write_string(0, column_index(col)?, name)?;
    }

    for (offset, row) in table.rows.iter().enumerate() {
        let row_index = row_index(offset + 1)?;
        for (col, cell) in row.iter().enumerate() {
            write_cell(worksheet, row_index, column_index(col)?, cell, timestamp)?;
        }
    }

    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    timestamp: &Format,
) -> Result<(), XlsxError> {
    match cell {
        CellValue::Text(value) => worksheet.write_string(row, col, value)?,
        CellValue::Integer(value) => worksheet.write_number(row, col, *value as f64)?,
        CellValue::Number(value) => worksheet.write_number(row, col, *value)?,
        CellValue::Boolean(value) => worksheet.write_boolean(row, col, *value)?,
        CellValue::Timestamp(value) => {
            let datetime = ExcelDateTime::from_timestamp(value.timestamp())?;
            worksheet.write_datetime_with_format(row, col, &datetime, timestamp)?
        }
    };
    Ok(())
}

fn row_index(index: usize) -> Result<u32, XlsxError> {
    u32::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}

fn column_index(index: usize) -> Result<u16, XlsxError> {
    u16::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}
