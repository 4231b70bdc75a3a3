use serde::Serialize;

use super::layout::{ColumnLayout, RecordKind};
use super::resolver::{ExportRecord, ResolveError, ResolvedFields};
use super::value::CellValue;

/// Rectangular output for one record type: a header row and aligned data rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub kind: RecordKind,
    pub header: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn sheet_name(&self) -> &'static str {
        self.kind.sheet_name()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableBuildError {
    /// A record could not be resolved; nothing after it was processed.
    #[error(
        "{} export stopped at record {index} after {rows_completed} rows: {source}",
        .kind.label()
    )]
    Record {
        kind: RecordKind,
        index: usize,
        record: String,
        rows_completed: usize,
        #[source]
        source: ResolveError,
    },
    /// The resolver did not produce a value for a declared column.
    #[error("{} resolver produced no value for column {column}", .kind.label())]
    UnresolvedColumn {
        kind: RecordKind,
        column: &'static str,
    },
}

impl TableBuildError {
    /// Rows that had been built before the failure; they are not returned.
    pub fn rows_completed(&self) -> usize {
        match self {
            Self::Record { rows_completed, .. } => *rows_completed,
            Self::UnresolvedColumn { .. } => 0,
        }
    }
}

/// Builds the table for one record type, stopping at the first record that fails.
pub fn build_table<R: ExportRecord>(records: &[R]) -> Result<Table, TableBuildError> {
    let layout = R::KIND.layout();
    let mut rows: Vec<Vec<CellValue>> = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let fields = record
            .resolve()
            .map_err(|source| TableBuildError::Record {
                kind: R::KIND,
                index,
                record: record.record_id().to_string(),
                rows_completed: rows.len(),
                source,
            })?;
        rows.push(project(layout, fields)?);
    }

    Ok(Table {
        kind: R::KIND,
        header: layout.header(),
        rows,
    })
}

/// Orders resolved fields by the layout; extra fields are dropped.
pub fn project(
    layout: &ColumnLayout,
    mut fields: ResolvedFields,
) -> Result<Vec<CellValue>, TableBuildError> {
    layout
        .columns()
        .iter()
        .map(|column| {
            fields
                .take(column)
                .ok_or(TableBuildError::UnresolvedColumn {
                    kind: layout.kind(),
                    column: *column,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::domain::{Proposal, Tag, User};
    use crate::export::layout::{TAG_LAYOUT, USER_LAYOUT};

    fn proposal(id: &str, ranking: Option<f64>) -> Proposal {
        Proposal {
            proposal_id: id.to_string(),
            ranking,
            ..Proposal::default()
        }
    }

    #[test]
    fn empty_input_still_has_a_header() {
        let table = build_table::<User>(&[]).expect("empty table builds");
        assert_eq!(table.header.len(), 25);
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.sheet_name(), "Users");
    }

    #[test]
    fn stops_at_first_failing_record() {
        let records = vec![
            proposal("p1", Some(1.0)),
            proposal("p2", None),
            proposal("p3", None),
        ];

        match build_table(&records) {
            Err(TableBuildError::Record {
                kind,
                index,
                record,
                rows_completed,
                source: ResolveError::MissingRequiredField { field, .. },
            }) => {
                assert_eq!(kind, RecordKind::Proposal);
                assert_eq!(index, 1);
                assert_eq!(record, "p2");
                assert_eq!(rows_completed, 1);
                assert_eq!(field, "Ranking");
            }
            other => panic!("expected record failure, got {other:?}"),
        }
    }

    #[test]
    fn project_reports_missing_columns() {
        let mut fields = ResolvedFields::default();
        fields.set("UserID", "u1");

        let error = project(&USER_LAYOUT, fields).expect_err("columns missing");
        assert_eq!(
            error,
            TableBuildError::UnresolvedColumn {
                kind: RecordKind::User,
                column: "Name",
            }
        );
    }

    #[test]
    fn project_ignores_columns_outside_the_layout() {
        let mut fields = ResolvedFields::default();
        fields.set("Tag", "food");
        fields.set("Color", "green");

        let row = project(&TAG_LAYOUT, fields).expect("projects");
        assert_eq!(row, vec![CellValue::text("food")]);
    }

    #[test]
    fn rows_follow_input_order() {
        let tags = vec![Tag::new("b"), Tag::new("a"), Tag::new("c")];
        let table = build_table(&tags).expect("tags build");
        let values: Vec<String> = table.rows.iter().map(|row| row[0].to_string()).collect();
        assert_eq!(values, vec!["b", "a", "c"]);
    }
}
