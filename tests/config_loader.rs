use listpager::config::{Config, ConfigError, ListConfig, PagingConfig};
use listpager::paging::Size;
use tempfile::TempDir;

/// Test that Config::default() produces the documented values.
#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(config.paging.footer_inset, Size::new(0.0, 0.0));
    assert!(config.paging.refresh_control);
    assert!(config.paging.auto_load_more);
    assert_eq!(config.paging.event_capacity, 64);
    assert!(config.list.animate);
}

/// Test that Config::config_path() returns a path ending with the expected filename.
#[test]
fn test_config_path_ends_with_expected() {
    let path = Config::config_path();
    assert!(path.ends_with("listpager/config.toml"));
}

/// Test that a missing file yields the defaults.
#[test]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

/// Test that a partial file fills the rest from defaults.
#[test]
fn test_partial_file_fills_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[paging]
refresh_control = false

[paging.footer_inset]
width = 0.0
height = 120.0
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert!(!config.paging.refresh_control);
    assert_eq!(config.paging.footer_inset, Size::new(0.0, 120.0));
    assert!(config.paging.auto_load_more);
    assert_eq!(config.list, ListConfig::default());
}

/// Test that malformed TOML is a parse error.
#[test]
fn test_malformed_file_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[paging\nrefresh_control = ").unwrap();

    match Config::load_from(&path) {
        Err(ConfigError::ParseError { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("Expected ParseError, got {other:?}"),
    }
}

/// Test that a loaded file is validated.
#[test]
fn test_loaded_file_is_validated() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[paging]\nevent_capacity = 0\n").unwrap();

    assert!(matches!(
        Config::load_from(&path),
        Err(ConfigError::ValidationError { .. })
    ));
}

/// Test validation rejects negative insets.
#[test]
fn test_validation_fails_negative_inset() {
    let config = Config {
        paging: PagingConfig {
            footer_inset: Size::new(0.0, -10.0),
            ..PagingConfig::default()
        },
        ..Config::default()
    };

    match config.validate().unwrap_err() {
        ConfigError::ValidationError { message } => {
            assert!(message.contains("non-negative"));
        }
        _ => panic!("Expected ValidationError"),
    }
}

/// Test validation rejects non-finite insets.
#[test]
fn test_validation_fails_infinite_inset() {
    let config = Config {
        paging: PagingConfig {
            footer_inset: Size::new(f64::INFINITY, 0.0),
            ..PagingConfig::default()
        },
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

/// Test validation passes for the defaults.
#[test]
fn test_validation_passes_for_default() {
    assert!(Config::default().validate().is_ok());
}
