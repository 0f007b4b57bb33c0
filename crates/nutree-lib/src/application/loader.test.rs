use super::*;
use crate::primitives::ColorChoice;

#[test]
fn test_config_loading_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.log_level, 0);
    assert_eq!(config.net_timeout, 30);
    assert_eq!(config.color, ColorChoice::Auto);
}

#[test]
fn test_config_merging() {
    let base = AppConfig::default();
    let override_config = AppConfig {
        log_level: 4,
        color: ColorChoice::Always,
        cpu_jobs: 16,
        ..AppConfig::default()
    };

    let merged = base.merge_with(override_config);
    assert_eq!(merged.log_level, 4);
    assert_eq!(merged.color, ColorChoice::Always);
    assert_eq!(merged.cpu_jobs, 16);
    assert_eq!(merged.net_timeout, 30);
}

#[test]
fn test_standard_env_applies_below_cli() {
    let no_color = EnvironmentConfig {
        no_color: Some("1".to_string()),
        ..EnvironmentConfig::default()
    };

    let from_env = AppConfig::layered_with(AppConfig::default(), &no_color).unwrap();
    assert_eq!(from_env.color, ColorChoice::Never);

    let cli = AppConfig {
        color: ColorChoice::Always,
        ..AppConfig::default()
    };
    let from_cli = AppConfig::layered_with(cli, &no_color).unwrap();
    assert_eq!(from_cli.color, ColorChoice::Always);
}

#[test]
fn test_layering_validates() {
    let cli = AppConfig {
        feeds: vec![String::new()],
        ..AppConfig::default()
    };

    assert!(AppConfig::layered_with(cli, &EnvironmentConfig::default()).is_err());
}
