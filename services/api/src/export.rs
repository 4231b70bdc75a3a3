use clap::{Args, ValueEnum};
use give_help::config::AppConfig;
use give_help::error::AppError;
use give_help::export::{
    CsvDirectorySink, ExportError, ExportJob, ExportSummary, JsonSnapshotSource, WorkbookSink,
    DEFAULT_WORKBOOK_NAME,
};
use give_help::telemetry;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct ExportArgs {
    /// Directory holding users.json, proposals.json and tags.json
    #[arg(long)]
    pub(crate) input_dir: Option<PathBuf>,
    /// Directory receiving the workbook (or one CSV file per sheet)
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
    /// Maximum number of proposals to export
    #[arg(long, value_parser = parse_limit)]
    pub(crate) proposal_limit: Option<usize>,
    /// Output format
    #[arg(long, value_enum, default_value_t = SheetFormat::Xlsx)]
    pub(crate) format: SheetFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum SheetFormat {
    /// One workbook with a worksheet per record type
    #[default]
    Xlsx,
    /// One CSV file per record type
    Csv,
}

/// Row counts plus the files the run produced.
#[derive(Debug)]
pub(crate) struct ExportOutcome {
    pub(crate) summary: ExportSummary,
    pub(crate) files: Vec<PathBuf>,
}

fn parse_limit(raw: &str) -> Result<usize, String> {
    raw.parse::<NonZeroUsize>()
        .map(NonZeroUsize::get)
        .map_err(|_| format!("'{raw}' is not a positive integer"))
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(dir) = args.input_dir {
        config.export.input_dir = dir;
    }
    if let Some(dir) = args.output_dir {
        config.export.output_dir = dir;
    }
    if let Some(limit) = args.proposal_limit {
        config.export.proposal_limit = limit;
    }

    telemetry::init(&config.telemetry)?;

    let outcome = export_snapshots(&config, args.format)?;
    render_outcome(&outcome);
    Ok(())
}

pub(crate) fn export_snapshots(
    config: &AppConfig,
    format: SheetFormat,
) -> Result<ExportOutcome, AppError> {
    let job = ExportJob::new(
        JsonSnapshotSource::new(&config.export.input_dir),
        config.export.proposal_limit,
    );

    info!(
        input = %config.export.input_dir.display(),
        output = %config.export.output_dir.display(),
        proposal_limit = config.export.proposal_limit,
        ?format,
        "starting export"
    );

    match format {
        SheetFormat::Xlsx => {
            let path = config.export.output_dir.join(DEFAULT_WORKBOOK_NAME);
            let mut sink = WorkbookSink::create(path).map_err(ExportError::from)?;
            let summary = job.run(&mut sink)?;
            Ok(ExportOutcome {
                summary,
                files: vec![sink.path().to_path_buf()],
            })
        }
        SheetFormat::Csv => {
            let mut sink =
                CsvDirectorySink::create(&config.export.output_dir).map_err(ExportError::from)?;
            let summary = job.run(&mut sink)?;
            Ok(ExportOutcome {
                summary,
                files: sink.written().to_vec(),
            })
        }
    }
}

fn render_outcome(outcome: &ExportOutcome) {
    let summary = &outcome.summary;
    println!("Export complete");
    for file in &outcome.files {
        println!("  wrote {}", file.display());
    }
    println!("  Users:     {:>6}", summary.users);
    println!("  Proposals: {:>6}", summary.proposals);
    println!("  Tags:      {:>6}", summary.tags);
    println!("  Total:     {:>6}", summary.total_rows());
}
