use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::locator::Locator;

/// Result of a page navigation.
#[derive(Debug, Clone)]
pub struct NavigationResult {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend not ready")]
    NotReady,

    #[error("Timed out after {timeout:?} waiting for '{what}'")]
    Timeout { what: String, timeout: Duration },

    /// The element reference went stale before the operation completed,
    /// typically because the page re-rendered. The pagination retry
    /// depends on this being its own variant.
    #[error("Stale element reference")]
    StaleElement,

    #[error("Element not found: {0}")]
    NotFound(String),

    #[error("Navigation error: {0}")]
    Navigation(String),

    #[error("Screenshot failed: {0}")]
    Screenshot(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Backend error: {0}")]
    Other(String),
}

/// The Backend trait is the seam between the verification flows and the
/// browser. The WebDriver implementation lives in leadcheck-wd; tests
/// drive the flows with scripted fakes.
///
/// Every wait a backend performs must be an explicit bounded poll.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Launch the backend (start driver process, connect, etc.)
    async fn launch(&mut self) -> Result<(), BackendError>;

    /// Close the backend and clean up resources.
    async fn close(&mut self) -> Result<(), BackendError>;

    /// Check if the backend is ready to accept commands.
    async fn is_ready(&self) -> bool;

    /// Navigate to a specific URL.
    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError>;

    /// Wait until the element is displayed and enabled, polling up to
    /// `timeout`.
    async fn wait_clickable(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<(), BackendError>;

    /// Click the first element matching the locator.
    async fn click(&mut self, locator: &Locator) -> Result<(), BackendError>;

    /// Click via an explicit pointer move-and-click gesture. Used on
    /// controls that re-render under a plain click, like the pagination
    /// arrow.
    async fn move_and_click(&mut self, locator: &Locator) -> Result<(), BackendError> {
        self.click(locator).await
    }

    /// Type text into the first element matching the locator.
    async fn type_text(&mut self, locator: &Locator, text: &str) -> Result<(), BackendError>;

    /// Visible text of every element matching the locator, in document
    /// order.
    async fn read_texts(&mut self, locator: &Locator) -> Result<Vec<String>, BackendError>;

    /// Scroll the viewport to the top of the page.
    async fn scroll_to_top(&mut self) -> Result<(), BackendError>;

    /// Scroll the viewport to the bottom of the page.
    async fn scroll_to_bottom(&mut self) -> Result<(), BackendError>;

    /// Scroll the first element matching the locator into the viewport.
    async fn scroll_into_view(&mut self, locator: &Locator) -> Result<(), BackendError>;

    /// Capture a screenshot of the current viewport as PNG bytes.
    async fn screenshot(&mut self) -> Result<Vec<u8>, BackendError>;
}
