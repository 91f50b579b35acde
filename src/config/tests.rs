use super::*;
use super::core::camel_case;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn load_file_only(cwd: &Path, custom: Option<&Path>) -> Result<ProbitasConfig, ConfigError> {
    let figment = ProbitasConfig::figment(cwd, custom)?;
    ProbitasConfig::extract(&figment)
}

#[test]
fn test_defaults_without_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = load_file_only(temp_dir.path(), None).unwrap();
    assert_eq!(config, ProbitasConfig::default());
    assert_eq!(config.includes, vec![DEFAULT_INCLUDE.to_string()]);
}

#[test]
fn test_reads_camel_case_keys() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(CONFIG_FILE),
        r#"{
            "includes": ["api/**/*.probitas.ts"],
            "excludes": ["api/legacy/**"],
            "reporter": "json",
            "maxConcurrency": 4,
            "maxFailures": "2",
            "timeout": "1m"
        }"#,
    )
    .unwrap();

    let config = load_file_only(temp_dir.path(), None).unwrap();
    assert_eq!(config.includes, vec!["api/**/*.probitas.ts".to_string()]);
    assert_eq!(config.excludes, vec!["api/legacy/**".to_string()]);
    assert_eq!(config.reporter.as_deref(), Some("json"));
    assert_eq!(config.max_concurrency, Some(OptionValue::Number(4.0)));
    assert_eq!(config.max_failures, Some(OptionValue::Text("2".to_string())));
    assert_eq!(config.timeout, Some(OptionValue::Text("1m".to_string())));
}

#[test]
fn test_snake_case_aliases() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(CONFIG_FILE),
        r#"{"max_concurrency": 2, "max_failures": 1}"#,
    )
    .unwrap();

    let config = load_file_only(temp_dir.path(), None).unwrap();
    assert_eq!(config.max_concurrency, Some(OptionValue::Number(2.0)));
    assert_eq!(config.max_failures, Some(OptionValue::Number(1.0)));
}

#[test]
fn test_custom_config_relative_to_cwd() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("ci")).unwrap();
    fs::write(
        temp_dir.path().join("ci/probitas.ci.json"),
        r#"{"reporter": "json"}"#,
    )
    .unwrap();

    let config = load_file_only(temp_dir.path(), Some(Path::new("ci/probitas.ci.json"))).unwrap();
    assert_eq!(config.reporter.as_deref(), Some("json"));
    // Keys the file leaves out keep their defaults
    assert_eq!(config.includes, vec![DEFAULT_INCLUDE.to_string()]);
}

#[test]
fn test_missing_custom_config_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = ProbitasConfig::load(temp_dir.path(), Some(Path::new("nope.json"))).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }));
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn test_malformed_config_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(CONFIG_FILE), r#"{"includes": 5}"#).unwrap();

    let err = load_file_only(temp_dir.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_snake_and_camel_keys_merge_without_conflict() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(CONFIG_FILE),
        r#"{"max_failures": 1, "maxConcurrency": 2}"#,
    )
    .unwrap();

    let config = load_file_only(temp_dir.path(), None).unwrap();
    assert_eq!(config.max_failures, Some(OptionValue::Number(1.0)));
    assert_eq!(config.max_concurrency, Some(OptionValue::Number(2.0)));
}

#[test]
fn test_camel_case() {
    assert_eq!(camel_case("max_concurrency"), "maxConcurrency");
    assert_eq!(camel_case("maxFailures"), "maxFailures");
    assert_eq!(camel_case("timeout"), "timeout");
    assert_eq!(camel_case("_leading"), "leading");
}

// A private prefix keeps these variables away from tests that load the real one
const TEST_PREFIX: &str = "PROBITAS_CONFIG_TEST_";

#[test]
fn test_environment_overrides_file() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            CONFIG_FILE,
            r#"{"maxConcurrency": 8, "max_failures": 5, "reporter": "list", "timeout": "30s"}"#,
        )?;
        jail.set_env("PROBITAS_CONFIG_TEST_MAX_CONCURRENCY", 3);
        jail.set_env("PROBITAS_CONFIG_TEST_MAX_FAILURES", 2);
        jail.set_env("PROBITAS_CONFIG_TEST_REPORTER", "json");
        jail.set_env("PROBITAS_CONFIG_TEST_TIMEOUT", "1m");

        let config = ProbitasConfig::load_with_prefix(jail.directory(), None, TEST_PREFIX)
            .map_err(|err| err.to_string())?;

        assert_eq!(config.max_concurrency, Some(OptionValue::Number(3.0)));
        assert_eq!(config.max_failures, Some(OptionValue::Number(2.0)));
        assert_eq!(config.reporter.as_deref(), Some("json"));
        assert_eq!(config.timeout, Some(OptionValue::Text("1m".to_string())));
        Ok(())
    });
}

#[test]
fn test_environment_without_file() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("PROBITAS_CONFIG_TEST_MAX_CONCURRENCY", 6);

        let config = ProbitasConfig::load_with_prefix(jail.directory(), None, TEST_PREFIX)
            .map_err(|err| err.to_string())?;

        assert_eq!(config.max_concurrency, Some(OptionValue::Number(6.0)));
        assert_eq!(config.includes, vec![DEFAULT_INCLUDE.to_string()]);
        Ok(())
    });
}

#[test]
fn test_flags_beat_environment() {
    use crate::cli::commands::run::{RunArgs, build_plan};
    use clap::Parser;
    use std::time::Duration;

    figment::Jail::expect_with(|jail| {
        jail.create_file(CONFIG_FILE, r#"{"maxConcurrency": 8, "timeout": "30s"}"#)?;
        jail.set_env("PROBITAS_CONFIG_TEST_MAX_CONCURRENCY", 3);
        jail.set_env("PROBITAS_CONFIG_TEST_TIMEOUT", "1m");

        let config = ProbitasConfig::load_with_prefix(jail.directory(), None, TEST_PREFIX)
            .map_err(|err| err.to_string())?;

        let args = RunArgs::try_parse_from(["run", "--max-concurrency", "2"]).unwrap();
        let plan = build_plan(args, &config).map_err(|err| err.to_string())?;
        assert_eq!(plan.max_concurrency, Some(2));
        assert_eq!(plan.timeout, Some(Duration::from_secs(60)));
        Ok(())
    });
}
