use async_trait::async_trait;
use fantoccini::actions::{InputSource, MOUSE_BUTTON_LEFT, MouseActions, PointerAction};
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{info, warn};

use leadcheck_engine::backend::{Backend, BackendError, NavigationResult};
use leadcheck_engine::locator::{Locator, Strategy};

use crate::driver::{self, DriverProcess};

/// Poll interval for the bounded clickability wait.
const CLICKABLE_POLL: Duration = Duration::from_millis(250);

/// WebDriver-backed browser session. Auto-launches chromedriver when no
/// external WebDriver URL is supplied.
pub struct WebDriverBackend {
    client: Option<Client>,
    webdriver_url: Option<String>,
    driver_process: Option<DriverProcess>,
    force_visible: bool,
    port: u16,
}

impl WebDriverBackend {
    /// Auto-launch chromedriver on the default port, headless.
    pub fn new() -> Self {
        Self {
            client: None,
            webdriver_url: None,
            driver_process: None,
            force_visible: false,
            port: driver::DEFAULT_DRIVER_PORT,
        }
    }

    /// Auto-launch chromedriver on a specific port.
    pub fn new_on_port(port: u16) -> Self {
        Self {
            port,
            ..Self::new()
        }
    }

    /// Connect to an existing WebDriver server.
    pub fn with_url(webdriver_url: String) -> Self {
        Self {
            webdriver_url: Some(webdriver_url),
            ..Self::new()
        }
    }

    /// Run the browser visibly instead of headless. Ignored when no
    /// display is available.
    pub fn set_visible(&mut self, visible: bool) {
        self.force_visible = visible;
    }

    fn client(&self) -> Result<&Client, BackendError> {
        self.client.as_ref().ok_or(BackendError::NotReady)
    }

    fn headless(&self) -> bool {
        if self.force_visible {
            if driver::is_headless_environment() {
                warn!("No display detected, staying headless");
                true
            } else {
                false
            }
        } else {
            true
        }
    }

    async fn find(&self, locator: &Locator) -> Result<Element, BackendError> {
        self.client()?
            .find(to_fantoccini(locator))
            .await
            .map_err(map_cmd_error)
    }

    /// Resolves the locator inside the page and scrolls it to the
    /// viewport center. Returns whether the element was found.
    async fn scroll_locator_into_view(&self, locator: &Locator) -> Result<bool, BackendError> {
        let script = r#"
            const strategy = arguments[0];
            const value = arguments[1];
            let el = null;
            if (strategy === 'xpath') {
                el = document.evaluate(
                    value, document, null,
                    XPathResult.FIRST_ORDERED_NODE_TYPE, null
                ).singleNodeValue;
            } else if (strategy === 'id') {
                el = document.getElementById(value);
            } else {
                el = document.querySelector(value);
            }
            if (el) { el.scrollIntoView({block: 'center', inline: 'center'}); }
            return el !== null;
        "#;

        let strategy = match locator.strategy {
            Strategy::Css => "css",
            Strategy::XPath => "xpath",
            Strategy::Id => "id",
        };
        let found = self
            .client()?
            .execute(script, vec![json!(strategy), json!(locator.value)])
            .await
            .map_err(map_cmd_error)?;
        Ok(found.as_bool().unwrap_or(false))
    }

    async fn run_script(&self, script: &str) -> Result<(), BackendError> {
        self.client()?
            .execute(script, vec![])
            .await
            .map_err(map_cmd_error)?;
        Ok(())
    }
}

impl Default for WebDriverBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for WebDriverBackend {
    async fn launch(&mut self) -> Result<(), BackendError> {
        let url = if let Some(url) = &self.webdriver_url {
            info!("Connecting to external WebDriver at {}...", url);
            url.clone()
        } else {
            info!("Launching chromedriver on port {}...", self.port);
            let process = driver::launch_chromedriver(self.port)
                .await
                .map_err(BackendError::Other)?;
            let url = process.url();
            self.driver_process = Some(process);
            url
        };

        let caps = driver::chrome_capabilities(self.headless());
        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&url)
            .await
            .map_err(|e| {
                BackendError::Other(format!("Failed to connect to WebDriver at {}: {}", url, e))
            })?;

        if let Err(e) = client.set_window_size(1920, 1080).await {
            warn!("Failed to size the browser window: {}", e);
        }

        self.client = Some(client);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        if let Some(client) = self.client.take() {
            client
                .close()
                .await
                .map_err(|e| BackendError::Other(format!("Failed to close session: {}", e)))?;
        }
        // Dropping the driver process kills and reaps it.
        self.driver_process = None;
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        self.client.is_some()
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
        info!("Navigating to: {}", url);
        let client = self.client()?;
        client
            .goto(url)
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?;

        let url = client
            .current_url()
            .await
            .map(|u| u.to_string())
            .unwrap_or_default();
        let title = client.title().await.unwrap_or_default();
        Ok(NavigationResult { url, title })
    }

    async fn wait_clickable(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<(), BackendError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Ok(element) = self.find(locator).await {
                let displayed = element.is_displayed().await.unwrap_or(false);
                let enabled = element.is_enabled().await.unwrap_or(false);
                if displayed && enabled {
                    return Ok(());
                }
            }
            if Instant::now() >= deadline {
                return Err(BackendError::Timeout {
                    what: locator.value.clone(),
                    timeout,
                });
            }
            sleep(CLICKABLE_POLL).await;
        }
    }

    async fn click(&mut self, locator: &Locator) -> Result<(), BackendError> {
        let element = self.find(locator).await?;
        element.click().await.map_err(map_cmd_error)
    }

    async fn move_and_click(&mut self, locator: &Locator) -> Result<(), BackendError> {
        let element = self.find(locator).await?;
        let actions = MouseActions::new("mouse".to_string())
            .then(PointerAction::MoveToElement {
                element,
                duration: None,
                x: 0,
                y: 0,
            })
            .then(PointerAction::Down {
                button: MOUSE_BUTTON_LEFT,
            })
            .then(PointerAction::Up {
                button: MOUSE_BUTTON_LEFT,
            });
        self.client()?
            .perform_actions(actions)
            .await
            .map_err(map_cmd_error)
    }

    async fn type_text(&mut self, locator: &Locator, text: &str) -> Result<(), BackendError> {
        let element = self.find(locator).await?;
        element.send_keys(text).await.map_err(map_cmd_error)
    }

    async fn read_texts(&mut self, locator: &Locator) -> Result<Vec<String>, BackendError> {
        let elements = self
            .client()?
            .find_all(to_fantoccini(locator))
            .await
            .map_err(map_cmd_error)?;

        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            texts.push(element.text().await.map_err(map_cmd_error)?);
        }
        Ok(texts)
    }

    async fn scroll_to_top(&mut self) -> Result<(), BackendError> {
        self.run_script("window.scrollTo(0, 0);").await
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), BackendError> {
        self.run_script("window.scrollTo(0, document.body.scrollHeight);")
            .await
    }

    async fn scroll_into_view(&mut self, locator: &Locator) -> Result<(), BackendError> {
        if self.scroll_locator_into_view(locator).await? {
            Ok(())
        } else {
            Err(BackendError::NotFound(locator.value.clone()))
        }
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, BackendError> {
        self.client()?
            .screenshot()
            .await
            .map_err(|e| BackendError::Screenshot(e.to_string()))
    }
}

fn to_fantoccini(locator: &Locator) -> fantoccini::Locator<'_> {
    match locator.strategy {
        Strategy::Css => fantoccini::Locator::Css(&locator.value),
        Strategy::XPath => fantoccini::Locator::XPath(&locator.value),
        Strategy::Id => fantoccini::Locator::Id(&locator.value),
    }
}

fn map_cmd_error(e: CmdError) -> BackendError {
    if e.is_no_such_element() {
        return BackendError::NotFound(e.to_string());
    }
    let msg = e.to_string();
    if msg.contains("stale element reference") {
        BackendError::StaleElement
    } else {
        BackendError::Other(msg)
    }
}
