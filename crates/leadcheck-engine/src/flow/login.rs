use tracing::info;

use super::FlowError;
use crate::backend::Backend;
use crate::config::RunConfig;
use crate::diagnostics::ScreenshotSink;
use crate::locator::keys;

/// Navigate to the CRM and complete the identity-provider login sequence:
/// OAuth entry point, email, password. Any failure captures a diagnostic
/// screenshot and propagates — login failure is fatal for the whole run
/// and is never retried.
pub async fn login<B: Backend + ?Sized>(
    backend: &mut B,
    config: &RunConfig,
    sink: &ScreenshotSink,
) -> Result<(), FlowError> {
    match login_steps(backend, config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            sink.capture(backend, "login").await;
            Err(e)
        }
    }
}

async fn login_steps<B: Backend + ?Sized>(
    backend: &mut B,
    config: &RunConfig,
) -> Result<(), FlowError> {
    let locators = &config.locators;
    let waits = &config.waits;

    info!("Navigating to {}", config.base_url);
    backend.navigate(&config.base_url).await?;

    info!("Opening the identity-provider login");
    let oauth = locators.get(keys::OAUTH_BUTTON)?;
    backend.wait_clickable(oauth, waits.oauth()).await?;
    backend.click(oauth).await?;

    info!("Entering email address");
    let email_input = locators.get(keys::EMAIL_INPUT)?;
    backend.wait_clickable(email_input, waits.email()).await?;
    backend
        .type_text(email_input, &config.credentials.email)
        .await?;
    backend.click(locators.get(keys::NEXT_BUTTON)?).await?;

    info!("Entering password");
    let password_input = locators.get(keys::PASSWORD_INPUT)?;
    backend
        .wait_clickable(password_input, waits.password())
        .await?;
    backend
        .type_text(password_input, &config.credentials.password)
        .await?;
    backend
        .click(locators.get(keys::PASSWORD_NEXT_BUTTON)?)
        .await?;

    Ok(())
}
