use nutree_lib::application::cli::{Cli, CliConfig, Commands, PackageSelection};
use nutree_lib::application::config::AppConfig;
use nutree_lib::application::env::EnvironmentConfig;
use nutree_lib::primitives::{ColorChoice, ConfigError};
use clap::Parser;

#[test]
fn test_config_default_creation() {
    let config = AppConfig::default();

    assert!(config.log_level <= 4);
    assert!(config.net_timeout > 0);
    assert_eq!(config.color, ColorChoice::Auto);
    assert_eq!(config.feeds.len(), 1);
}

#[test]
fn test_config_merging_integration() {
    let base_config = AppConfig::default();
    let override_config = AppConfig {
        log_level: 3,
        cpu_jobs: 2,
        color: ColorChoice::Never,
        ..AppConfig::default()
    };

    let merged = base_config.merge_with(override_config);

    assert_eq!(merged.log_level, 3);
    assert_eq!(merged.cpu_jobs, 2);
    assert_eq!(merged.color, ColorChoice::Never);
    assert_eq!(merged.net_timeout, 30);
}

#[test]
fn test_cli_to_layered_config() {
    let cli = Cli::try_parse_from([
        "nutree",
        "--feed",
        "./packages, https://api.nuget.org/v3/index.json",
        "--net-retries",
        "1",
        "tree",
        "--id",
        "MailKit",
        "--version",
        "2.15.0",
        "--framework",
        "net5.0",
    ])
    .unwrap();

    let config = CliConfig::from_cli(cli).unwrap();

    assert_eq!(
        config.app_config.feeds,
        vec!["./packages", "https://api.nuget.org/v3/index.json"]
    );
    assert_eq!(config.app_config.net_retries, 1);

    let Some(Commands::Tree(args)) = config.command else {
        panic!("expected the tree command");
    };
    assert!(matches!(
        args.selection().unwrap(),
        PackageSelection::Identity(ref identity) if identity.to_string() == "MailKit.2.15.0"
    ));
}

#[test]
fn test_validation_errors_surface() {
    let config = AppConfig {
        net_timeout: 0,
        ..AppConfig::default()
    };

    let result = AppConfig::layered_with(config, &EnvironmentConfig::default());

    assert!(matches!(result, Err(ConfigError::ValidationFailed { .. })));
}
