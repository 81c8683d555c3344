use async_trait::async_trait;
use leadcheck_engine::backend::{Backend, BackendError, NavigationResult};
use leadcheck_engine::config::{Credentials, RunConfig, StatusEntry};
use leadcheck_engine::locator::{Locator, LocatorTable, keys};
use leadcheck_engine::report::{Section, StatusOutcome};
use leadcheck_engine::runner::{self, RunError};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
struct Page {
    top: Vec<String>,
    bottom: Vec<String>,
}

fn rows(statuses: &[&str]) -> Vec<String> {
    statuses.iter().map(|s| s.to_string()).collect()
}

/// In-memory CRM double: a login page, a status dropdown, and one fixed
/// page sequence per status. Locator values are `#<symbolic-name>` so the
/// fake can dispatch on the name alone.
struct FakeCrm {
    /// Option locator key -> status label it filters by.
    options: HashMap<String, String>,
    /// Status label -> result pages.
    pages: HashMap<String, Vec<Page>>,
    active: Option<String>,
    current: usize,
    at_bottom: bool,
    /// Symbolic names whose clickable-wait should time out.
    fail_waits: Vec<String>,
    events: Vec<String>,
    launched: bool,
    closed: bool,
}

impl FakeCrm {
    fn new() -> Self {
        Self {
            options: HashMap::new(),
            pages: HashMap::new(),
            active: None,
            current: 0,
            at_bottom: false,
            fail_waits: Vec::new(),
            events: Vec::new(),
            launched: false,
            closed: false,
        }
    }

    fn with_status(mut self, label: &str, option_key: &str, pages: Vec<Page>) -> Self {
        self.options.insert(option_key.to_string(), label.to_string());
        self.pages.insert(label.to_string(), pages);
        self
    }

    fn active_pages(&self) -> &[Page] {
        self.active
            .as_ref()
            .and_then(|label| self.pages.get(label))
            .map(|pages| pages.as_slice())
            .unwrap_or(&[])
    }
}

fn name_of(locator: &Locator) -> &str {
    locator.value.trim_start_matches('#')
}

#[async_trait]
impl Backend for FakeCrm {
    async fn launch(&mut self) -> Result<(), BackendError> {
        self.launched = true;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        self.closed = true;
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        self.launched && !self.closed
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
        self.events.push(format!("navigate {}", url));
        Ok(NavigationResult {
            url: url.to_string(),
            title: "CRM".to_string(),
        })
    }

    async fn wait_clickable(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<(), BackendError> {
        let name = name_of(locator).to_string();
        if self.fail_waits.contains(&name) {
            return Err(BackendError::Timeout {
                what: name,
                timeout,
            });
        }
        if name == keys::NEXT_PAGE && self.current + 1 >= self.active_pages().len() {
            return Err(BackendError::Timeout {
                what: name,
                timeout,
            });
        }
        Ok(())
    }

    async fn click(&mut self, locator: &Locator) -> Result<(), BackendError> {
        let name = name_of(locator).to_string();
        self.events.push(format!("click {}", name));

        if let Some(label) = self.options.get(&name) {
            self.active = Some(label.clone());
        } else if name == keys::SEARCH_BUTTON {
            self.current = 0;
            self.at_bottom = false;
        }
        Ok(())
    }

    async fn move_and_click(&mut self, locator: &Locator) -> Result<(), BackendError> {
        let name = name_of(locator).to_string();
        self.events.push(format!("gesture {}", name));
        if name == keys::NEXT_PAGE {
            self.current += 1;
            self.at_bottom = false;
        }
        Ok(())
    }

    async fn type_text(&mut self, locator: &Locator, text: &str) -> Result<(), BackendError> {
        self.events
            .push(format!("type {} {}", name_of(locator), text));
        Ok(())
    }

    async fn read_texts(&mut self, locator: &Locator) -> Result<Vec<String>, BackendError> {
        assert_eq!(name_of(locator), keys::STATUS_COLUMN);
        let at_bottom = self.at_bottom;
        let current = self.current;
        let pages = self.active_pages();
        let page = pages
            .get(current)
            .ok_or_else(|| BackendError::NotFound("no active result page".into()))?;
        Ok(if at_bottom {
            page.bottom.clone()
        } else {
            page.top.clone()
        })
    }

    async fn scroll_to_top(&mut self) -> Result<(), BackendError> {
        self.at_bottom = false;
        Ok(())
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), BackendError> {
        self.at_bottom = true;
        Ok(())
    }

    async fn scroll_into_view(&mut self, _locator: &Locator) -> Result<(), BackendError> {
        Ok(())
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, BackendError> {
        Err(BackendError::NotSupported("screenshot".into()))
    }
}

/// Config whose locator values are `#<symbolic-name>`, with a two-status
/// worklist and no pauses.
fn test_config() -> RunConfig {
    let mut locators = LocatorTable::new();
    for key in [
        keys::OAUTH_BUTTON,
        keys::EMAIL_INPUT,
        keys::NEXT_BUTTON,
        keys::PASSWORD_INPUT,
        keys::PASSWORD_NEXT_BUTTON,
        keys::STATUS_DROPDOWN,
        keys::SEARCH_BUTTON,
        keys::STATUS_COLUMN,
        keys::NEXT_PAGE,
    ] {
        locators.insert(key, Locator::css(format!("#{}", key)));
    }
    locators.insert("new_option", Locator::css("#new_option"));
    locators.insert("contacted_option", Locator::css("#contacted_option"));

    RunConfig {
        base_url: "https://crm.example.test".into(),
        credentials: Credentials {
            email: "operator@example.test".into(),
            password: "hunter2".into(),
        },
        screenshot_dir: std::env::temp_dir(),
        worklist: vec![
            StatusEntry::new("New", "new_option"),
            StatusEntry::new("Contacted", "contacted_option"),
        ],
        locators,
        ..RunConfig::default()
    }
}

fn fast(mut config: RunConfig) -> RunConfig {
    config.pagination.retry_pause_ms = 0;
    config.pagination.advance_pause_ms = 0;
    config.pagination.settle_pause_ms = 0;
    config
}

#[tokio::test]
async fn full_run_reports_per_status_outcomes() {
    let config = fast(test_config());
    let mut backend = FakeCrm::new()
        .with_status(
            "New",
            "new_option",
            vec![Page {
                top: rows(&["New", "New", "New"]),
                bottom: rows(&["New", "New"]),
            }],
        )
        .with_status(
            "Contacted",
            "contacted_option",
            vec![Page {
                top: rows(&["Contacted", "Contacted"]),
                bottom: rows(&["Contacted", "New"]),
            }],
        );

    let report = runner::run(&mut backend, &config).await.unwrap();

    assert_eq!(report.statuses.len(), 2);
    assert_eq!(report.statuses[0].label, "New");
    assert_eq!(
        report.statuses[0].outcome,
        StatusOutcome::Verified { pages: 1 }
    );
    assert_eq!(report.statuses[1].label, "Contacted");
    assert_eq!(
        report.statuses[1].outcome,
        StatusOutcome::Mismatch {
            page: 1,
            section: Section::Bottom,
            found: "New".into(),
        }
    );
    assert!(!report.all_verified());
    assert!(backend.closed);
}

#[tokio::test]
async fn login_drives_the_oauth_sequence_in_order() {
    let config = fast(test_config());
    let mut backend = FakeCrm::new().with_status(
        "New",
        "new_option",
        vec![Page {
            top: rows(&["New"]),
            bottom: rows(&["New"]),
        }],
    );

    // Only run the first status; the second has no pages and would halt
    // with a read failure, which is irrelevant here.
    let mut config = config;
    config.worklist.truncate(1);

    runner::run(&mut backend, &config).await.unwrap();

    let login_events: Vec<&str> = backend
        .events
        .iter()
        .map(|s| s.as_str())
        .take_while(|e| !e.starts_with("click status_dropdown"))
        .collect();
    assert_eq!(
        login_events,
        vec![
            "navigate https://crm.example.test",
            "click oauth_button",
            "type email_input operator@example.test",
            "click next_button",
            "type password_input hunter2",
            "click password_next_button",
        ]
    );
}

#[tokio::test]
async fn login_failure_is_fatal_and_still_closes_the_session() {
    let config = fast(test_config());
    let mut backend = FakeCrm::new();
    backend.fail_waits.push(keys::OAUTH_BUTTON.to_string());

    let err = runner::run(&mut backend, &config).await.unwrap_err();

    assert!(matches!(err, RunError::Login(_)));
    assert!(backend.closed);
}

#[tokio::test]
async fn filter_failure_aborts_the_remaining_worklist() {
    let config = fast(test_config());
    let mut backend = FakeCrm::new()
        .with_status(
            "New",
            "new_option",
            vec![Page {
                top: rows(&["New"]),
                bottom: rows(&["New"]),
            }],
        )
        .with_status("Contacted", "contacted_option", vec![]);
    backend.fail_waits.push("contacted_option".to_string());

    let err = runner::run(&mut backend, &config).await.unwrap_err();

    match err {
        RunError::Status { label, .. } => assert_eq!(label, "Contacted"),
        other => panic!("expected status failure, got {:?}", other),
    }
    assert!(backend.closed);
}

#[tokio::test]
async fn mismatch_does_not_stop_the_next_status() {
    let config = fast(test_config());
    let mut backend = FakeCrm::new()
        .with_status(
            "New",
            "new_option",
            vec![Page {
                top: rows(&["Contacted"]),
                bottom: rows(&[]),
            }],
        )
        .with_status(
            "Contacted",
            "contacted_option",
            vec![Page {
                top: rows(&["Contacted"]),
                bottom: rows(&["Contacted"]),
            }],
        );

    let report = runner::run(&mut backend, &config).await.unwrap();

    assert!(!report.statuses[0].outcome.is_verified());
    assert_eq!(
        report.statuses[1].outcome,
        StatusOutcome::Verified { pages: 1 }
    );
}
