use leadcheck_engine::config::{ConfigLoader, RunConfig, default_worklist};
use leadcheck_engine::locator::{Strategy, keys};
use serial_test::serial;
use std::io::Write;

#[test]
fn defaults_cover_the_fixed_worklist() {
    let config = RunConfig::default();

    let labels: Vec<&str> = config
        .worklist
        .iter()
        .map(|entry| entry.label.as_str())
        .collect();
    assert_eq!(
        labels,
        vec![
            "New",
            "Contacted",
            "Pending Credit App",
            "App Completed",
            "Rejected"
        ]
    );

    // Every fixed control and every worklist option must resolve.
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
        assert!(config.locators.contains(key), "missing locator '{}'", key);
    }
    for entry in &config.worklist {
        assert!(
            config.locators.contains(&entry.locator),
            "missing option locator '{}'",
            entry.locator
        );
    }
}

#[test]
fn default_bounds_match_the_reference_workflow() {
    let config = RunConfig::default();
    assert_eq!(config.pagination.max_pages, 20);
    assert_eq!(config.pagination.next_retries, 3);
    assert_eq!(config.waits.dropdown_secs, 30);
    assert_eq!(config.waits.next_page_secs, 10);
}

#[tokio::test]
async fn loads_partial_yaml_over_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
base_url: "https://crm.example.test"
credentials:
  email: "operator@example.test"
pagination:
  max_pages: 5
locators:
  search_button:
    strategy: css
    value: "button.search"
"#
    )
    .unwrap();

    let config = ConfigLoader::load_from(file.path()).await.unwrap();

    assert_eq!(config.base_url, "https://crm.example.test");
    assert_eq!(config.credentials.email, "operator@example.test");
    assert_eq!(config.pagination.max_pages, 5);
    // Untouched sections keep their defaults.
    assert_eq!(config.pagination.next_retries, 3);
    assert_eq!(config.worklist, default_worklist());

    // A locators section replaces the whole table.
    let search = config.locators.get(keys::SEARCH_BUTTON).unwrap();
    assert_eq!(search.strategy, Strategy::Css);
    assert_eq!(search.value, "button.search");
    assert!(config.locators.get(keys::NEXT_PAGE).is_err());
}

#[tokio::test]
async fn load_from_missing_file_is_an_io_error() {
    let err = ConfigLoader::load_from(std::path::Path::new("/nonexistent/leadcheck.yaml"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        leadcheck_engine::config::ConfigError::Io(_)
    ));
}

#[test]
#[serial]
fn env_credentials_override_config() {
    let mut config = RunConfig::default();
    config.credentials.email = "from-file@example.test".into();

    unsafe {
        std::env::set_var("LEADCHECK_EMAIL", "from-env@example.test");
        std::env::set_var("LEADCHECK_PASSWORD", "env-secret");
    }
    config.credentials.apply_env();
    unsafe {
        std::env::remove_var("LEADCHECK_EMAIL");
        std::env::remove_var("LEADCHECK_PASSWORD");
    }

    assert_eq!(config.credentials.email, "from-env@example.test");
    assert_eq!(config.credentials.password, "env-secret");
}
