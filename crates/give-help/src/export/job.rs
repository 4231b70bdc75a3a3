use std::time::Instant;

use serde::Serialize;
use tracing::{error, info};

use super::layout::RecordKind;
use super::resolver::ExportRecord;
use super::sink::{SinkError, TableSink};
use super::source::{RecordSource, SourceError};
use super::table::{build_table, TableBuildError};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("could not load {}: {source}", .kind.label())]
    Source {
        kind: RecordKind,
        #[source]
        source: SourceError,
    },
    #[error(transparent)]
    Table(#[from] TableBuildError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Row counts per sheet for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub users: usize,
    pub proposals: usize,
    pub tags: usize,
}

impl ExportSummary {
    pub fn total_rows(&self) -> usize {
        self.users + self.proposals + self.tags
    }
}

/// Dumps users, proposals and tags into a sink, one sheet each, in that order.
pub struct ExportJob<S> {
    source: S,
    proposal_limit: usize,
}

impl<S: RecordSource> ExportJob<S> {
    pub fn new(source: S, proposal_limit: usize) -> Self {
        Self {
            source,
            proposal_limit,
        }
    }

    pub fn run<K: TableSink>(&self, sink: &mut K) -> Result<ExportSummary, ExportError> {
        let users = export_sheet(self.source.load_users(), sink)?;
        let proposals = export_sheet(self.source.load_proposals(self.proposal_limit), sink)?;
        let tags = export_sheet(self.source.load_tags(), sink)?;

        sink.finish().map_err(|err| {
            error!(error = %err, "sink could not be finalised");
            err
        })?;

        Ok(ExportSummary {
            users,
            proposals,
            tags,
        })
    }
}

fn export_sheet<R, K>(loaded: Result<Vec<R>, SourceError>, sink: &mut K) -> Result<usize, ExportError>
where
    R: ExportRecord,
    K: TableSink,
{
    let kind = R::KIND;
    let started = Instant::now();

    let records = loaded.map_err(|source| {
        error!(sheet = kind.sheet_name(), error = %source, "record source failed");
        ExportError::Source { kind, source }
    })?;

    let table = build_table(&records).map_err(|err| {
        error!(
            sheet = kind.sheet_name(),
            rows_completed = err.rows_completed(),
            error = %err,
            "table build aborted"
        );
        err
    })?;

    sink.write_table(&table)?;

    let rows = table.row_count();
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    metrics::counter!("export_rows_total", "sheet" => kind.sheet_name()).increment(rows as u64);
    metrics::histogram!("export_table_elapsed_ms", "sheet" => kind.sheet_name()).record(elapsed_ms);
    info!(sheet = kind.sheet_name(), rows, elapsed_ms, "exported {} {}", rows, kind.label());

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::domain::{Proposal, Tag, User};
    use crate::export::source::InMemorySource;
    use crate::export::table::Table;

    #[derive(Default)]
    struct RecordingSink {
        tables: Vec<Table>,
        finished: bool,
    }

    impl TableSink for RecordingSink {
        fn write_table(&mut self, table: &Table) -> Result<(), SinkError> {
            self.tables.push(table.clone());
            Ok(())
        }

        fn finish(&mut self) -> Result<(), SinkError> {
            self.finished = true;
            Ok(())
        }
    }

    struct BrokenSource;

    impl RecordSource for BrokenSource {
        fn load_users(&self) -> Result<Vec<User>, SourceError> {
            Err(SourceError::Unavailable("database offline".to_string()))
        }

        fn load_proposals(&self, _limit: usize) -> Result<Vec<Proposal>, SourceError> {
            Ok(Vec::new())
        }

        fn load_tags(&self) -> Result<Vec<Tag>, SourceError> {
            Ok(Vec::new())
        }
    }

    fn ranked(id: &str) -> Proposal {
        Proposal {
            proposal_id: id.to_string(),
            ranking: Some(1.0),
            ..Proposal::default()
        }
    }

    #[test]
    fn writes_sheets_in_order_and_counts_rows() {
        let source = InMemorySource {
            users: vec![User::default()],
            proposals: vec![ranked("p1"), ranked("p2"), ranked("p3")],
            tags: vec![Tag::new("food"), Tag::new("help")],
        };
        let mut sink = RecordingSink::default();

        let summary = ExportJob::new(source, 2).run(&mut sink).expect("export runs");

        assert_eq!(
            summary,
            ExportSummary {
                users: 1,
                proposals: 2,
                tags: 2,
            }
        );
        assert_eq!(summary.total_rows(), 5);
        let sheets: Vec<&str> = sink.tables.iter().map(Table::sheet_name).collect();
        assert_eq!(sheets, vec!["Users", "Proposals", "Tags"]);
        assert!(sink.finished);
    }

    #[test]
    fn source_failure_stops_before_any_sheet() {
        let mut sink = RecordingSink::default();

        match ExportJob::new(BrokenSource, 10).run(&mut sink) {
            Err(ExportError::Source { kind, .. }) => assert_eq!(kind, RecordKind::User),
            other => panic!("expected source failure, got {other:?}"),
        }
        assert!(sink.tables.is_empty());
        assert!(!sink.finished);
    }
}
