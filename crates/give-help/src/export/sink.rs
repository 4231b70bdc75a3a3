use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use super::table::Table;

/// Persists built tables, one named sheet per table.
pub trait TableSink {
    fn write_table(&mut self, table: &Table) -> Result<(), SinkError>;

    /// Called once after the last table; sinks that buffer flush here.
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode sheet {sheet}: {source}")]
    Csv {
        sheet: &'static str,
        #[source]
        source: csv::Error,
    },
    #[error("failed to fill sheet {sheet}: {source}")]
    Sheet {
        sheet: &'static str,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
    #[error("failed to save workbook {}: {source}", .path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
}

/// Writes the header followed by every row of `table`.
pub fn write_csv<W: Write>(writer: W, table: &Table) -> Result<(), SinkError> {
    let sheet = table.sheet_name();
    let encode = |source| SinkError::Csv { sheet, source };

    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(&table.header).map_err(encode)?;
    for row in &table.rows {
        csv_writer
            .write_record(row.iter().map(|cell| cell.to_string()))
            .map_err(encode)?;
    }

    csv_writer
        .flush()
        .map_err(|source| encode(csv::Error::from(source)))
}

/// Writes each table to `<dir>/<sheet>.csv`.
#[derive(Debug)]
pub struct CsvDirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl CsvDirectorySink {
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| SinkError::Io {
            path: dir.clone(),
            source,
        })?;

        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    /// Files written so far, in sheet order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl TableSink for CsvDirectorySink {
    fn write_table(&mut self, table: &Table) -> Result<(), SinkError> {
        let path = self.dir.join(format!("{}.csv", table.sheet_name()));
        let file = File::create(&path).map_err(|source| SinkError::Io {
            path: path.clone(),
            source,
        })?;

        write_csv(file, table)?;
        self.written.push(path);
        Ok(())
    }
}
