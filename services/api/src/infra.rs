use give_help::error::AppError;
use give_help::terms::{InMemoryTermsRepository, Term};
use metrics_exporter_prometheus::PrometheusHandle;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Builds the terms store, seeded from a JSON array of terms when a file is configured.
pub(crate) fn terms_repository(seed_file: Option<&Path>) -> Result<InMemoryTermsRepository, AppError> {
    let Some(path) = seed_file else {
        return Ok(InMemoryTermsRepository::default());
    };

    let reader = BufReader::new(File::open(path)?);
    let terms: Vec<Term> = serde_json::from_reader(reader)?;
    Ok(InMemoryTermsRepository::with_terms(terms))
}
