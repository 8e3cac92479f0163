//! Integration tests for layered configuration
//!
//! Precedence: CLI arguments > Environment variables > Config file > Defaults

use geoshape_core::config::{CliConfigOverrides, ConfigSource, LayeredConfig};
use geoshape_core::{GeoshapeError, OverridePolicy};
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn clear_env() {
    env::remove_var("GEOSHAPE_DEFAULT_CRS");
    env::remove_var("GEOSHAPE_ALLOW_OVERRIDE");
    env::remove_var("GEOSHAPE_PRECISION");
}

#[test]
fn test_partial_file_configuration() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
default_crs = "urn:ogc:def:crs:EPSG::3857"
# Only the CRS, everything else stays default
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    assert_eq!(config.default_crs.value.as_deref(), Some("EPSG:3857"));
    assert_eq!(config.default_crs.source, ConfigSource::File);
    assert_eq!(config.override_policy.value, OverridePolicy::Reject);
    assert_eq!(config.override_policy.source, ConfigSource::Default);
    assert_eq!(config.precision.source, ConfigSource::Default);
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    env::set_var("GEOSHAPE_DEFAULT_CRS", "epsg:32748");
    env::set_var("GEOSHAPE_ALLOW_OVERRIDE", "true");
    env::set_var("GEOSHAPE_PRECISION", "2");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
default_crs = "EPSG:3857"
allow_override = false
precision = 9
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.default_crs.value.as_deref(), Some("EPSG:32748"));
    assert_eq!(config.default_crs.source, ConfigSource::Environment);
    assert_eq!(config.override_policy.value, OverridePolicy::Allow);
    assert_eq!(config.precision.value, 2);
    assert_eq!(config.precision.source, ConfigSource::Environment);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_values_are_ignored() {
    clear_env();
    env::set_var("GEOSHAPE_DEFAULT_CRS", "   ");
    env::set_var("GEOSHAPE_ALLOW_OVERRIDE", "sometimes");
    env::set_var("GEOSHAPE_PRECISION", "many");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.default_crs.source, ConfigSource::Default);
    assert_eq!(config.override_policy.source, ConfigSource::Default);
    assert_eq!(config.precision.source, ConfigSource::Default);

    clear_env();
}

#[test]
#[serial]
fn test_configuration_precedence_order() {
    clear_env();
    env::set_var("GEOSHAPE_DEFAULT_CRS", "EPSG:32748");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "default_crs = \"EPSG:3857\"").unwrap();

    let mut config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.default_crs.value.as_deref(), Some("EPSG:32748"));
    assert_eq!(config.default_crs.source, ConfigSource::Environment);

    config.update_from_cli(CliConfigOverrides {
        default_crs: Some("EPSG:4326".to_string()),
        ..Default::default()
    });

    assert_eq!(config.default_crs.value.as_deref(), Some("EPSG:4326"));
    assert_eq!(config.default_crs.source, ConfigSource::Cli);

    assert!(ConfigSource::Cli.precedence() > ConfigSource::Environment.precedence());
    assert!(ConfigSource::Environment.precedence() > ConfigSource::File.precedence());
    assert!(ConfigSource::File.precedence() > ConfigSource::Default.precedence());

    clear_env();
}

#[test]
fn test_configuration_source_tracking() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "default_crs = \"epsg:3857\"\nprecision = 4").unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();
    let inspection_map = config.to_inspection_map();

    let (crs_value, crs_source) = &inspection_map["default_crs"];
    assert_eq!(crs_value, "EPSG:3857");
    assert_eq!(*crs_source, ConfigSource::File);

    let (policy_value, policy_source) = &inspection_map["override_policy"];
    assert_eq!(policy_value, "Reject");
    assert_eq!(*policy_source, ConfigSource::Default);
}

#[test]
fn test_invalid_default_crs_in_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "default_crs = \"\"").unwrap();

    let result = LayeredConfig::with_defaults().load_from_file(file.path());

    assert!(matches!(result, Err(GeoshapeError::ConfigInvalid { .. })));
}

#[test]
fn test_invalid_toml_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "invalid toml content [[[").unwrap();

    let result = LayeredConfig::with_defaults().load_from_file(file.path());

    assert!(result.is_err());
}

#[test]
fn test_missing_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let non_existent = temp_dir.path().join("does_not_exist.toml");

    let result = LayeredConfig::with_defaults().load_from_file(&non_existent);

    match result {
        Err(GeoshapeError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected an IO error, got {:?}", other.map(|_| ())),
    }
}

#[test]
#[serial]
fn test_full_configuration_workflow() {
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("geoshape.toml");
    fs::write(
        &config_path,
        r#"
default_crs = "EPSG:3857"
allow_override = true
precision = 8
"#,
    )
    .unwrap();

    env::set_var("GEOSHAPE_PRECISION", "3");

    let mut config = LayeredConfig::with_defaults()
        .load_from_file(&config_path)
        .unwrap()
        .load_from_env();

    assert_eq!(config.default_crs.source, ConfigSource::File);
    assert_eq!(config.override_policy.value, OverridePolicy::Allow);
    assert_eq!(config.precision.value, 3);
    assert_eq!(config.precision.source, ConfigSource::Environment);

    config.update_from_cli(CliConfigOverrides {
        override_policy: Some(OverridePolicy::Reject),
        ..Default::default()
    });

    assert_eq!(config.override_policy.value, OverridePolicy::Reject);
    assert_eq!(config.override_policy.source, ConfigSource::Cli);
    assert_eq!(config.precision.value, 3);
    assert_eq!(
        config.default_crs().unwrap().and_then(|crs| crs.epsg()),
        Some(3857)
    );

    clear_env();
}
