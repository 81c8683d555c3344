use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::locator::{Locator, LocatorTable, keys};

/// Login credentials for the identity-provider flow. Consumed once during
/// login; overridable via LEADCHECK_EMAIL / LEADCHECK_PASSWORD.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn apply_env(&mut self) {
        if let Ok(email) = std::env::var("LEADCHECK_EMAIL") {
            self.email = email;
        }
        if let Ok(password) = std::env::var("LEADCHECK_PASSWORD") {
            self.password = password;
        }
    }
}

/// Per-operation wait bounds, in seconds. Defaults match the operator
/// workflow this automates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    pub oauth_secs: u64,
    pub email_secs: u64,
    pub password_secs: u64,
    pub dropdown_secs: u64,
    pub option_secs: u64,
    pub search_secs: u64,
    pub next_page_secs: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            oauth_secs: 15,
            email_secs: 15,
            password_secs: 15,
            dropdown_secs: 30,
            option_secs: 20,
            search_secs: 20,
            next_page_secs: 10,
        }
    }
}

impl WaitConfig {
    pub fn oauth(&self) -> Duration {
        Duration::from_secs(self.oauth_secs)
    }

    pub fn email(&self) -> Duration {
        Duration::from_secs(self.email_secs)
    }

    pub fn password(&self) -> Duration {
        Duration::from_secs(self.password_secs)
    }

    pub fn dropdown(&self) -> Duration {
        Duration::from_secs(self.dropdown_secs)
    }

    pub fn option(&self) -> Duration {
        Duration::from_secs(self.option_secs)
    }

    pub fn search(&self) -> Duration {
        Duration::from_secs(self.search_secs)
    }

    pub fn next_page(&self) -> Duration {
        Duration::from_secs(self.next_page_secs)
    }
}

/// Bounds for the pagination walk. `max_pages` guards against a
/// misbehaving next control; `next_retries` is the stale-element budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub max_pages: u32,
    pub next_retries: u32,
    pub retry_pause_ms: u64,
    pub advance_pause_ms: u64,
    pub settle_pause_ms: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_pages: 20,
            next_retries: 3,
            retry_pause_ms: 1000,
            advance_pause_ms: 1000,
            settle_pause_ms: 2000,
        }
    }
}

impl PaginationConfig {
    pub fn retry_pause(&self) -> Duration {
        Duration::from_millis(self.retry_pause_ms)
    }

    pub fn advance_pause(&self) -> Duration {
        Duration::from_millis(self.advance_pause_ms)
    }

    pub fn settle_pause(&self) -> Duration {
        Duration::from_millis(self.settle_pause_ms)
    }
}

/// One worklist entry: the status label expected in the status column and
/// the locator key of the dropdown option that filters by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub label: String,
    pub locator: String,
}

impl StatusEntry {
    pub fn new(label: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            locator: locator.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub base_url: String,
    pub credentials: Credentials,
    pub screenshot_dir: PathBuf,
    pub waits: WaitConfig,
    pub pagination: PaginationConfig,
    pub worklist: Vec<StatusEntry>,
    pub locators: LocatorTable,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            credentials: Credentials::default(),
            screenshot_dir: PathBuf::from("."),
            waits: WaitConfig::default(),
            pagination: PaginationConfig::default(),
            worklist: default_worklist(),
            locators: default_locators(),
        }
    }
}

/// The fixed record-status categories, in operator log order.
pub fn default_worklist() -> Vec<StatusEntry> {
    vec![
        StatusEntry::new("New", "new_option"),
        StatusEntry::new("Contacted", "contacted_option"),
        StatusEntry::new("Pending Credit App", "pending_credit_option"),
        StatusEntry::new("App Completed", "app_completed_option"),
        StatusEntry::new("Rejected", "rejected_option"),
    ]
}

fn default_locators() -> LocatorTable {
    let mut table = LocatorTable::new();
    table.insert(
        keys::OAUTH_BUTTON,
        Locator::xpath("//button[contains(., 'Sign in with Google')]"),
    );
    table.insert(keys::EMAIL_INPUT, Locator::css("input[type='email']"));
    table.insert(
        keys::NEXT_BUTTON,
        Locator::xpath("//span[text()='Next']/ancestor::button"),
    );
    table.insert(keys::PASSWORD_INPUT, Locator::css("input[type='password']"));
    table.insert(
        keys::PASSWORD_NEXT_BUTTON,
        Locator::xpath("//span[text()='Next']/ancestor::button"),
    );
    table.insert(keys::STATUS_DROPDOWN, Locator::id("status-filter"));
    table.insert(
        keys::SEARCH_BUTTON,
        Locator::xpath("//button[normalize-space(.)='Search']"),
    );
    table.insert(keys::STATUS_COLUMN, Locator::css("td[data-column='status']"));
    table.insert(keys::NEXT_PAGE, Locator::xpath("//a[@aria-label='Next']"));

    for entry in default_worklist() {
        table.insert(
            entry.locator,
            Locator::xpath(format!("//li[normalize-space(.)='{}']", entry.label)),
        );
    }
    table
}
