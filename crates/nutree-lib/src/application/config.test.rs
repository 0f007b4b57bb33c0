use super::*;

#[test]
fn test_defaults_point_at_nuget_org() {
    let config = AppConfig::default();
    assert_eq!(config.feeds, vec!["https://api.nuget.org/v3/index.json"]);
    assert_eq!(config.cpu_jobs, 8);
    assert_eq!(config.net_retries, 3);
}

#[test]
fn test_feeds_are_comma_separated() {
    let config = AppConfig::try_parse_from([
        "nutree",
        "--feed",
        "https://example.test/v3/index.json,./packages",
    ])
    .unwrap();

    assert_eq!(
        config.feeds,
        vec!["https://example.test/v3/index.json", "./packages"]
    );
}

#[test]
fn test_merge_keeps_base_feeds_when_other_is_default() {
    let base = AppConfig {
        feeds: vec!["./local".to_string()],
        ..AppConfig::default()
    };

    let merged = base.merge_with(AppConfig::default());
    assert_eq!(merged.feeds, vec!["./local"]);

    let overridden = merged.merge_with(AppConfig {
        feeds: vec!["./other".to_string()],
        net_retries: 0,
        ..AppConfig::default()
    });
    assert_eq!(overridden.feeds, vec!["./other"]);
    assert_eq!(overridden.net_retries, 0);
}

#[test]
fn test_validate_trims_and_rejects_empty_feeds() {
    let mut config = AppConfig {
        feeds: vec![" ./a ".to_string(), "".to_string()],
        ..AppConfig::default()
    };
    config.validate().unwrap();
    assert_eq!(config.feeds, vec!["./a"]);

    let mut empty = AppConfig {
        feeds: vec!["  ".to_string()],
        ..AppConfig::default()
    };
    assert!(matches!(
        empty.validate(),
        Err(ConfigError::ValidationFailed { .. })
    ));
}

#[test]
fn test_validate_rejects_zero_jobs() {
    let mut config = AppConfig {
        cpu_jobs: 0,
        ..AppConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_derived_component_configs() {
    let config = AppConfig {
        cpu_jobs: 3,
        net_timeout: 5,
        net_retries: 1,
        log_level: 3,
        color: ColorChoice::Never,
        ..AppConfig::default()
    };

    assert_eq!(config.networking_config().max_concurrent_requests, 3);
    assert_eq!(config.networking_config().timeout_seconds, 5);
    assert_eq!(config.retry_policy().max_retries, 1);
    assert_eq!(config.walker_config().max_concurrent, 3);

    let logger = config.to_logger_config();
    assert_eq!(logger.level, LogLevel::Debug);
    assert!(!logger.color);
}
