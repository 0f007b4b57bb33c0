use super::*;

#[test]
fn test_every_value_name_parses_back() {
    fn check<T: ValueEnum + FromStr + PartialEq + std::fmt::Debug>() {
        for variant in T::value_variants() {
            let name = variant.to_possible_value().unwrap().get_name().to_string();
            let parsed = name.parse::<T>().ok();
            assert_eq!(parsed.as_ref(), Some(variant), "{}", name);
        }
    }

    check::<LogFormat>();
    check::<LogOutput>();
    check::<ColorChoice>();
}

#[test]
fn test_aliases_and_case() {
    assert_eq!("TXT".parse::<LogFormat>().unwrap(), LogFormat::Text);
    assert_eq!("plain".parse::<LogFormat>().unwrap(), LogFormat::Text);
    assert_eq!("yml".parse::<LogFormat>().unwrap(), LogFormat::Yaml);
    assert_eq!(" out ".parse::<LogOutput>().unwrap(), LogOutput::Stdout);
    assert_eq!("force".parse::<ColorChoice>().unwrap(), ColorChoice::Always);
    assert_eq!("None".parse::<ColorChoice>().unwrap(), ColorChoice::Never);
}

#[test]
fn test_invalid_value_reports_parse_error() {
    let err = "purple".parse::<ColorChoice>().unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
    assert_eq!(
        err.to_string(),
        "Failed to parse configuration value 'purple': invalid color choice"
    );
}

#[test]
fn test_log_level_from_verbosity() {
    let levels: Vec<LogLevel> = (0..=6).map(LogLevel::from_verbosity).collect();
    assert_eq!(
        levels,
        vec![
            LogLevel::Error,
            LogLevel::Warning,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
            LogLevel::Trace,
            LogLevel::Trace,
        ]
    );
    assert_eq!(LogLevel::from_verbosity(u8::MAX), LogLevel::Trace);
    assert!(LogLevel::Error < LogLevel::Trace);
}

#[test]
fn test_log_level_filter_strings() {
    assert_eq!(LogLevel::Error.as_filter_str(), "error");
    assert_eq!(LogLevel::Warning.as_filter_str(), "warn");
    assert_eq!(LogLevel::Trace.as_filter_str(), "trace");
}

#[test]
fn test_color_choice_explicit_values() {
    assert!(ColorChoice::Always.enabled());
    assert!(!ColorChoice::Never.enabled());
}

#[test]
fn test_serde_accepts_aliases() {
    #[derive(Deserialize)]
    struct Settings {
        format: LogFormat,
        color: ColorChoice,
    }

    let settings: Settings = serde_json::from_str(r#"{"format": "yml", "color": "never"}"#).unwrap();
    assert_eq!(settings.format, LogFormat::Yaml);
    assert_eq!(settings.color, ColorChoice::Never);
}

#[test]
fn test_config_error_display() {
    let error = ConfigError::ValidationFailed {
        reason: "at least one feed is required".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Configuration validation failed: at least one feed is required"
    );
}
