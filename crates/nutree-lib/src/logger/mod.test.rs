use super::*;

#[test]
fn test_default_filter_caps_dependencies() {
    let filter = default_filter(LogLevel::Debug);
    assert!(filter.starts_with("nutree=debug,"));
    assert!(filter.contains("reqwest=warn"));
    assert!(filter.contains("hyper_util=warn"));
    assert!(filter.ends_with(",debug"));
}

#[test]
fn test_default_filter_parses() {
    for level in [
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ] {
        assert!(EnvFilter::try_new(default_filter(level)).is_ok());
    }
}

#[test]
fn test_logger_global_matches_initialized_state() {
    assert_eq!(Logger::is_initialized(), Logger::global().is_some());
}

#[test]
fn test_progress_span_macro_builds_span() {
    let span = crate::progress_span!("discovering", total = 3);
    // No subscriber is installed in unit tests, so the span is disabled
    assert!(span.is_disabled() || span.metadata().is_some());
}
