//! Spreadsheet export of users, proposals and tags.
//!
//! Records are flattened by per-type resolvers, ordered by compiled column
//! layouts and assembled into tables that a sink persists as named sheets.

pub mod domain;
mod job;
pub mod layout;
pub mod resolver;
mod sink;
mod source;
pub mod table;
mod value;
mod workbook;

pub use domain::{
    Contact, DataToShare, Location, Phone, Proposal, ProposalType, Side, Tag, TargetArea, User,
};
pub use job::{ExportError, ExportJob, ExportSummary};
pub use layout::{ColumnLayout, RecordKind};
pub use resolver::{
    select_default_phone, ExportRecord, ResolveError, ResolvedFields, FALLBACK_PHONE_COUNTRY,
    FALLBACK_PHONE_REGION,
};
pub use sink::{write_csv, CsvDirectorySink, SinkError, TableSink};
pub use source::{InMemorySource, JsonSnapshotSource, RecordSource, SourceError};
pub use table::{build_table, Table, TableBuildError};
pub use value::CellValue;
pub use workbook::{WorkbookSink, DEFAULT_WORKBOOK_NAME};
