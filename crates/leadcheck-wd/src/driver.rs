use serde_json::json;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Standard port for chromedriver
pub const DEFAULT_DRIVER_PORT: u16 = 9515;

/// Common paths where chromedriver might be installed
const CHROMEDRIVER_PATHS: &[&str] = &[
    "/usr/bin/chromedriver",
    "/usr/local/bin/chromedriver",
    "/usr/lib/chromium-browser/chromedriver",
    "/usr/lib/chromium/chromedriver",
    "/snap/bin/chromium.chromedriver",
];

/// Returns the default WebDriver URL for a locally launched chromedriver
pub fn default_driver_url() -> String {
    format!("http://localhost:{}", DEFAULT_DRIVER_PORT)
}

/// Detect if we're in a headless environment (no display server)
pub fn is_headless_environment() -> bool {
    std::env::var("DISPLAY").is_err() && std::env::var("WAYLAND_DISPLAY").is_err()
}

/// Find the chromedriver binary on the system
pub fn find_chromedriver_binary() -> Option<String> {
    // First check PATH
    if let Ok(output) = Command::new("which").arg("chromedriver").output()
        && output.status.success()
        && let Ok(path) = String::from_utf8(output.stdout)
    {
        let path = path.trim();
        if !path.is_empty() {
            return Some(path.to_string());
        }
    }

    // Check common paths
    for path in CHROMEDRIVER_PATHS {
        if std::path::Path::new(path).exists() {
            return Some(path.to_string());
        }
    }

    None
}

/// Handle to a running chromedriver process
pub struct DriverProcess {
    child: Child,
    port: u16,
}

impl DriverProcess {
    /// Get the WebDriver URL for this instance
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}

impl Drop for DriverProcess {
    fn drop(&mut self) {
        info!("Shutting down chromedriver process...");
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Launch chromedriver on the given port and wait for its /status
/// endpoint to report ready.
pub async fn launch_chromedriver(port: u16) -> Result<DriverProcess, String> {
    let driver_path = find_chromedriver_binary().ok_or_else(|| {
        "chromedriver not found. Install it with your package manager or put it on PATH."
            .to_string()
    })?;

    info!("Launching chromedriver from: {}", driver_path);

    let child = Command::new(&driver_path)
        .arg(format!("--port={}", port))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| format!("Failed to launch chromedriver: {}", e))?;

    info!("chromedriver launched with PID: {}", child.id());

    let url = format!("http://localhost:{}/status", port);
    let client = reqwest::Client::new();

    for attempt in 1..=30 {
        sleep(Duration::from_millis(200)).await;

        match client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("chromedriver ready after {} attempt(s)", attempt);
                return Ok(DriverProcess { child, port });
            }
            Ok(_) => {
                warn!("chromedriver responded but not ready yet (attempt {})", attempt);
            }
            Err(_) => {
                if attempt % 5 == 0 {
                    info!("Waiting for chromedriver... (attempt {})", attempt);
                }
            }
        }
    }

    Err("chromedriver did not become ready within timeout".to_string())
}

/// W3C capabilities for a Chrome session, optionally headless.
pub fn chrome_capabilities(headless: bool) -> serde_json::Map<String, serde_json::Value> {
    let mut args = vec![
        "--disable-gpu".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--window-size=1920,1080".to_string(),
    ];
    if headless {
        args.push("--headless=new".to_string());
        args.push("--no-sandbox".to_string());
    }

    let mut caps = serde_json::Map::new();
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url() {
        assert_eq!(default_driver_url(), "http://localhost:9515");
    }

    #[test]
    fn test_chrome_capabilities() {
        let caps = chrome_capabilities(true);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.iter().any(|a| a == "--headless=new"));

        let caps = chrome_capabilities(false);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!args.iter().any(|a| a == "--headless=new"));
    }

    #[test]
    fn test_find_binary() {
        // Just verify the lookup doesn't panic; availability depends on
        // the system.
        let _ = find_chromedriver_binary();
    }
}
