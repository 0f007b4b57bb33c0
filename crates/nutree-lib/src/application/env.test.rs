use super::*;

fn env_config(vars: &[(&str, &str)]) -> EnvironmentConfig {
    EnvironmentConfig::from_pairs(
        vars.iter()
            .map(|(name, value)| (name.to_string(), value.to_string())),
    )
    .unwrap()
}

#[test]
fn test_no_color_environment_variable() {
    let color = env_config(&[("NO_COLOR", "1")]).apply_color_config(ColorChoice::Auto);
    assert_eq!(color, ColorChoice::Never);
}

#[test]
fn test_force_color_environment_variable() {
    let color = env_config(&[("FORCE_COLOR", "1")]).apply_color_config(ColorChoice::Auto);
    assert_eq!(color, ColorChoice::Always);
}

#[test]
fn test_environment_variable_precedence() {
    let color = env_config(&[("CLICOLOR", "0"), ("NO_COLOR", "1"), ("FORCE_COLOR", "1")])
        .apply_color_config(ColorChoice::Auto);

    // FORCE_COLOR=1 should win, enabling color despite NO_COLOR and CLICOLOR
    assert_eq!(color, ColorChoice::Always);
}

#[test]
fn test_ci_environment_variable() {
    let color = env_config(&[("CI", "true"), ("FORCE_COLOR", "1")])
        .apply_color_config(ColorChoice::Always);
    assert_eq!(color, ColorChoice::Never);
}

#[test]
fn test_empty_no_color_is_ignored() {
    let color = env_config(&[("NO_COLOR", "")]).apply_color_config(ColorChoice::Auto);
    assert_eq!(color, ColorChoice::Auto);
}

#[test]
fn test_invalid_force_color_values_ignored() {
    let color = env_config(&[("FORCE_COLOR", "invalid")]).apply_color_config(ColorChoice::Auto);
    assert_eq!(color, ColorChoice::Auto);
}

#[test]
fn test_unrelated_variables_are_ignored() {
    let config = env_config(&[("PATH", "/usr/bin"), ("HOME", "/root")]);
    assert!(config.no_color.is_none());
    assert!(config.ci.is_none());
}

#[test]
fn test_force_color_off_overrides_flag() {
    let color = env_config(&[("FORCE_COLOR", "false")]).apply_color_config(ColorChoice::Always);
    assert_eq!(color, ColorChoice::Never);

    let color = env_config(&[("CLICOLOR", "0"), ("FORCE_COLOR", "maybe")])
        .apply_color_config(ColorChoice::Always);
    assert_eq!(color, ColorChoice::Never);
}
