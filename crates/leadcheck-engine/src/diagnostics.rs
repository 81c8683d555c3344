use std::path::PathBuf;
use tracing::{info, warn};

use crate::backend::Backend;

/// Writes diagnostic screenshots on designated failure paths, named by
/// failure context (`error_<context>.png`).
pub struct ScreenshotSink {
    dir: PathBuf,
}

impl ScreenshotSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Best effort: a failed capture is logged and never masks the error
    /// that triggered it.
    pub async fn capture<B: Backend + ?Sized>(&self, backend: &mut B, context: &str) {
        let name = format!("error_{}.png", sanitize(context));
        let path = self.dir.join(&name);

        match backend.screenshot().await {
            Ok(bytes) => match tokio::fs::write(&path, &bytes).await {
                Ok(()) => info!("Diagnostic screenshot saved: {}", path.display()),
                Err(e) => warn!("Failed to write screenshot {}: {}", path.display(), e),
            },
            Err(e) => warn!("Failed to capture screenshot for '{}': {}", context, e),
        }
    }
}

/// Keep filenames portable: anything outside [A-Za-z0-9_-] becomes '_'.
fn sanitize(context: &str) -> String {
    context
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
