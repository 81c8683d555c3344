use tracing::{info, warn};

use super::FlowError;
use crate::backend::{Backend, BackendError};
use crate::config::RunConfig;
use crate::diagnostics::ScreenshotSink;
use crate::locator::{Locator, keys};
use crate::report::{Section, SectionCheck, StatusOutcome};

/// Walk every result page for the active filter, verifying the status
/// column at the top and the bottom of each page.
///
/// Terminates when the page cap is reached, a cell fails verification, or
/// no further next-page control can be activated. The last case is the
/// expected end of the list, not an error.
pub async fn process_all_pages<B: Backend + ?Sized>(
    backend: &mut B,
    config: &RunConfig,
    sink: &ScreenshotSink,
    expected: &str,
) -> Result<StatusOutcome, FlowError> {
    let max_pages = config.pagination.max_pages;
    let mut page = 1u32;

    while page <= max_pages {
        info!(
            "Processing page {}/{} for status '{}'",
            page, max_pages, expected
        );

        for section in [Section::Top, Section::Bottom] {
            match section {
                Section::Top => backend.scroll_to_top().await?,
                Section::Bottom => backend.scroll_to_bottom().await?,
            }

            match check_status_column(backend, config, sink, expected).await? {
                SectionCheck::AllMatched { rows } => {
                    info!(
                        "{} of page {} checked: {} row(s) are '{}'",
                        section, page, rows, expected
                    );
                }
                SectionCheck::Mismatch { found } => {
                    warn!(
                        "Found a non-{} status '{}' in the {} section of page {}",
                        expected, found, section, page
                    );
                    return Ok(StatusOutcome::Mismatch {
                        page,
                        section,
                        found,
                    });
                }
                SectionCheck::Unreadable { error } => {
                    warn!(
                        "Could not read the status column in the {} section of page {}: {}",
                        section, page, error
                    );
                    return Ok(StatusOutcome::CheckFailed {
                        page,
                        section,
                        error,
                    });
                }
            }
        }

        if !advance(backend, config).await? {
            info!("No more pages for status '{}'", expected);
            return Ok(StatusOutcome::Verified { pages: page });
        }
        page += 1;
    }

    info!("Page cap of {} reached for status '{}'", max_pages, expected);
    Ok(StatusOutcome::Verified { pages: max_pages })
}

/// Compare every status-column cell against the expected label. A read
/// failure is reported as `Unreadable` so the caller can halt this status
/// without aborting the rest of the worklist.
async fn check_status_column<B: Backend + ?Sized>(
    backend: &mut B,
    config: &RunConfig,
    sink: &ScreenshotSink,
    expected: &str,
) -> Result<SectionCheck, FlowError> {
    let column = config.locators.get(keys::STATUS_COLUMN)?;

    match backend.read_texts(column).await {
        Ok(texts) => {
            for text in &texts {
                if text != expected {
                    return Ok(SectionCheck::Mismatch { found: text.clone() });
                }
            }
            Ok(SectionCheck::AllMatched { rows: texts.len() })
        }
        Err(e) => {
            sink.capture(backend, &format!("check_status_{}", expected))
                .await;
            Ok(SectionCheck::Unreadable {
                error: e.to_string(),
            })
        }
    }
}

/// Try to advance to the next page. Returns Ok(false) when there is no
/// next-page control (normal end of the list) or when the stale-element
/// retry budget is exhausted.
async fn advance<B: Backend + ?Sized>(
    backend: &mut B,
    config: &RunConfig,
) -> Result<bool, FlowError> {
    let next = config.locators.get(keys::NEXT_PAGE)?;
    let retries = config.pagination.next_retries;
    let mut attempt = 0u32;

    while attempt < retries {
        match try_advance(backend, config, next).await {
            Ok(()) => {
                info!("Next page control clicked");
                return Ok(true);
            }
            Err(BackendError::StaleElement) => {
                attempt += 1;
                warn!(
                    "Stale next-page control, retrying ({}/{})",
                    attempt, retries
                );
                tokio::time::sleep(config.pagination.retry_pause()).await;
            }
            Err(e) => {
                info!("Next page control not available, assuming last page: {}", e);
                return Ok(false);
            }
        }
    }

    warn!(
        "Next-page control still stale after {} attempt(s), treating as last page",
        retries
    );
    Ok(false)
}

async fn try_advance<B: Backend + ?Sized>(
    backend: &mut B,
    config: &RunConfig,
    next: &Locator,
) -> Result<(), BackendError> {
    backend
        .wait_clickable(next, config.waits.next_page())
        .await?;
    backend.scroll_into_view(next).await?;
    tokio::time::sleep(config.pagination.advance_pause()).await;
    backend.move_and_click(next).await
}
