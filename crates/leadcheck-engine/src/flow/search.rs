use tracing::info;

use super::FlowError;
use crate::backend::Backend;
use crate::config::RunConfig;
use crate::diagnostics::ScreenshotSink;
use crate::locator::keys;

/// Scroll the search control into the viewport, pause for layout
/// settling, and click it. Failure captures a screenshot and propagates.
pub async fn trigger_search<B: Backend + ?Sized>(
    backend: &mut B,
    config: &RunConfig,
    sink: &ScreenshotSink,
) -> Result<(), FlowError> {
    match search_steps(backend, config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            sink.capture(backend, "search_button").await;
            Err(e)
        }
    }
}

async fn search_steps<B: Backend + ?Sized>(
    backend: &mut B,
    config: &RunConfig,
) -> Result<(), FlowError> {
    info!("Scrolling to and clicking the search button");
    let search = config.locators.get(keys::SEARCH_BUTTON)?;
    backend.wait_clickable(search, config.waits.search()).await?;
    backend.scroll_into_view(search).await?;
    tokio::time::sleep(config.pagination.settle_pause()).await;
    backend.click(search).await?;
    Ok(())
}
