use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("Unknown locator key: {0}")]
    UnknownKey(String),
}

/// Element lookup strategy. Mirrors the WebDriver location strategies the
/// CRM selectors are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    #[serde(rename = "css")]
    Css,
    #[serde(rename = "xpath")]
    XPath,
    #[serde(rename = "id")]
    Id,
}

/// A (strategy, selector-value) pair identifying a page element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    pub strategy: Strategy,
    pub value: String,
}

impl Locator {
    pub fn css(value: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Css,
            value: value.into(),
        }
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::XPath,
            value: value.into(),
        }
    }

    pub fn id(value: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Id,
            value: value.into(),
        }
    }
}

/// Symbolic names for the fixed page controls the flows drive. Worklist
/// entries reference their per-status option keys on top of these.
pub mod keys {
    pub const OAUTH_BUTTON: &str = "oauth_button";
    pub const EMAIL_INPUT: &str = "email_input";
    pub const NEXT_BUTTON: &str = "next_button";
    pub const PASSWORD_INPUT: &str = "password_input";
    pub const PASSWORD_NEXT_BUTTON: &str = "password_next_button";
    pub const STATUS_DROPDOWN: &str = "status_dropdown";
    pub const SEARCH_BUTTON: &str = "search_button";
    pub const STATUS_COLUMN: &str = "status_column";
    pub const NEXT_PAGE: &str = "next_page";
}

/// Mapping from symbolic name to locator, supplied by configuration.
/// Static and read-only for the duration of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocatorTable(HashMap<String, Locator>);

impl LocatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, locator: Locator) {
        self.0.insert(key.into(), locator);
    }

    pub fn get(&self, key: &str) -> Result<&Locator, LocatorError> {
        self.0
            .get(key)
            .ok_or_else(|| LocatorError::UnknownKey(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
