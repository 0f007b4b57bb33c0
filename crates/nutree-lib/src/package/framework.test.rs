use super::*;

fn fw(text: &str) -> Framework {
    text.parse().unwrap()
}

#[test]
fn test_parse_short_names() {
    assert_eq!(fw("net5.0"), Framework::new(FrameworkFamily::Net, 5, 0));
    assert_eq!(
        fw("netstandard2.0"),
        Framework::new(FrameworkFamily::NetStandard, 2, 0)
    );
    assert_eq!(
        fw("netcoreapp3.1"),
        Framework::new(FrameworkFamily::NetCoreApp, 3, 1)
    );
    assert_eq!(
        fw("net461"),
        Framework::new(FrameworkFamily::NetFramework, 4, 6).with_patch(1)
    );
    assert_eq!(fw("net45"), Framework::new(FrameworkFamily::NetFramework, 4, 5));
}

#[test]
fn test_parse_long_names() {
    assert_eq!(fw(".NETStandard2.0"), fw("netstandard2.0"));
    assert_eq!(fw(".NETStandard,Version=v1.3"), fw("netstandard1.3"));
    assert_eq!(fw(".NETFramework4.6.1"), fw("net461"));
    assert_eq!(fw(".NETCoreApp,Version=v3.1"), fw("netcoreapp3.1"));
}

#[test]
fn test_parse_platform_suffix() {
    let windows = fw("net6.0-Windows");
    assert_eq!(windows.family(), FrameworkFamily::Net);
    assert_eq!(windows.platform(), Some("windows"));
    assert_eq!(windows.to_string(), "net6.0-windows");
}

#[test]
fn test_parse_any_and_unsupported() {
    assert!(fw("").is_any());
    assert!(fw("any").is_any());
    assert!("monoandroid10".parse::<Framework>().is_err());
    assert!("netfoo".parse::<Framework>().is_err());
}

#[test]
fn test_display_round_trips_short_names() {
    for name in ["net5.0", "netstandard2.1", "netcoreapp2.0", "net461", "net48"] {
        assert_eq!(fw(name).to_string(), name);
    }
    assert_eq!(Framework::any().to_string(), "any");
}

#[test]
fn test_compatibility_rules() {
    let net5 = fw("net5.0");
    assert!(fw("netstandard2.1").is_compatible_with(&net5));
    assert!(fw("netstandard2.0").is_compatible_with(&net5));
    assert!(fw("netcoreapp3.1").is_compatible_with(&net5));
    assert!(fw("net5.0").is_compatible_with(&net5));
    assert!(!fw("net6.0").is_compatible_with(&net5));
    assert!(!fw("net461").is_compatible_with(&net5));
    assert!(Framework::any().is_compatible_with(&net5));

    let net461 = fw("net461");
    assert!(fw("netstandard2.0").is_compatible_with(&net461));
    assert!(!fw("netstandard2.1").is_compatible_with(&net461));
    assert!(fw("net45").is_compatible_with(&net461));

    let net45 = fw("net45");
    assert!(fw("netstandard1.1").is_compatible_with(&net45));
    assert!(!fw("netstandard1.3").is_compatible_with(&net45));
}

#[test]
fn test_platform_specific_groups_need_matching_target() {
    let windows_group = fw("net5.0-windows");
    assert!(!windows_group.is_compatible_with(&fw("net5.0")));
    assert!(windows_group.is_compatible_with(&fw("net6.0-windows")));
    assert!(fw("net5.0").is_compatible_with(&fw("net6.0-windows")));
}

#[test]
fn test_nearest_prefers_same_family_then_highest_version() {
    let groups = vec![
        fw("net461"),
        fw("netstandard1.3"),
        fw("netstandard2.0"),
        fw("net5.0"),
    ];
    assert_eq!(fw("net5.0").nearest(&groups), Some(&groups[3]));
    assert_eq!(fw("netcoreapp3.1").nearest(&groups), Some(&groups[2]));
    assert_eq!(fw("net472").nearest(&groups), Some(&groups[0]));
    assert_eq!(fw("net6.0").nearest(&groups[..3]), Some(&groups[2]));
}

#[test]
fn test_nearest_falls_back_to_any_or_none() {
    let groups = vec![Framework::any(), fw("net6.0")];
    assert_eq!(fw("net5.0").nearest(&groups), Some(&groups[0]));

    let only_modern = vec![fw("net6.0")];
    assert_eq!(fw("net5.0").nearest(&only_modern), None);
}
