use tracing::info;

use super::FlowError;
use crate::backend::Backend;
use crate::config::{RunConfig, StatusEntry};
use crate::diagnostics::ScreenshotSink;
use crate::locator::keys;

/// Open the status dropdown and select the option for this status. A
/// timeout or lookup failure captures a screenshot named for the status
/// and propagates to the caller.
pub async fn select_status<B: Backend + ?Sized>(
    backend: &mut B,
    config: &RunConfig,
    sink: &ScreenshotSink,
    entry: &StatusEntry,
) -> Result<(), FlowError> {
    match select_steps(backend, config, entry).await {
        Ok(()) => Ok(()),
        Err(e) => {
            sink.capture(backend, &format!("select_status_{}", entry.label))
                .await;
            Err(e)
        }
    }
}

async fn select_steps<B: Backend + ?Sized>(
    backend: &mut B,
    config: &RunConfig,
    entry: &StatusEntry,
) -> Result<(), FlowError> {
    info!("Opening the status dropdown for '{}'", entry.label);
    let dropdown = config.locators.get(keys::STATUS_DROPDOWN)?;
    backend
        .wait_clickable(dropdown, config.waits.dropdown())
        .await?;
    backend.click(dropdown).await?;

    info!("Selecting the '{}' status", entry.label);
    let option = config.locators.get(&entry.locator)?;
    backend.wait_clickable(option, config.waits.option()).await?;
    backend.click(option).await?;

    Ok(())
}
