use thiserror::Error;
use tracing::{error, info};

use crate::backend::{Backend, BackendError};
use crate::config::{RunConfig, StatusEntry};
use crate::diagnostics::ScreenshotSink;
use crate::flow::{self, FlowError};
use crate::report::{RunReport, StatusOutcome, StatusReport};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Login failed: {0}")]
    Login(#[source] FlowError),

    #[error("Processing status '{label}' failed: {source}")]
    Status { label: String, source: FlowError },

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Run the full verification pass: launch, login, then
/// filter -> search -> paginate for each worklist entry in order.
///
/// The backend is closed exactly once, on every exit path, before the
/// result is returned. A close failure is logged and does not overwrite
/// the run's result.
pub async fn run<B: Backend + ?Sized>(
    backend: &mut B,
    config: &RunConfig,
) -> Result<RunReport, RunError> {
    let result = run_inner(backend, config).await;

    info!("Closing the browser session");
    if let Err(e) = backend.close().await {
        error!("Failed to close the browser session: {}", e);
    }

    result
}

async fn run_inner<B: Backend + ?Sized>(
    backend: &mut B,
    config: &RunConfig,
) -> Result<RunReport, RunError> {
    let sink = ScreenshotSink::new(&config.screenshot_dir);

    backend.launch().await?;

    flow::login(backend, config, &sink)
        .await
        .map_err(RunError::Login)?;

    let mut report = RunReport::default();
    for entry in &config.worklist {
        info!("Starting process for status '{}'", entry.label);

        // A filter/search failure aborts the remaining worklist; a
        // mismatch only halts this status and the run continues.
        let outcome = process_status(backend, config, &sink, entry)
            .await
            .map_err(|source| RunError::Status {
                label: entry.label.clone(),
                source,
            })?;

        info!("Status '{}': {}", entry.label, outcome);
        report.push(StatusReport {
            label: entry.label.clone(),
            outcome,
        });
    }

    info!("Process completed for all statuses");
    Ok(report)
}

async fn process_status<B: Backend + ?Sized>(
    backend: &mut B,
    config: &RunConfig,
    sink: &ScreenshotSink,
    entry: &StatusEntry,
) -> Result<StatusOutcome, FlowError> {
    flow::select_status(backend, config, sink, entry).await?;
    flow::trigger_search(backend, config, sink).await?;
    flow::process_all_pages(backend, config, sink, &entry.label).await
}
