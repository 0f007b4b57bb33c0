use super::*;
use crate::package::FrameworkFamily;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("nutree").chain(args.iter().copied())).unwrap()
}

#[test]
fn test_tree_command_with_identity() {
    let cli = parse(&["tree", "--id", "MailKit", "--version", "2.15.0", "--framework", "net5.0"]);

    let command = cli.command.unwrap();
    assert!(command.requires_resolution());
    assert_eq!(
        command.package().selection().unwrap(),
        PackageSelection::Identity(PackageIdentity::new(
            "MailKit",
            PackageVersion::new(2, 15, 0)
        ))
    );
    assert_eq!(
        command.package().target_framework().unwrap(),
        Framework::new(FrameworkFamily::Net, 5, 0)
    );
}

#[test]
fn test_retrieve_does_not_resolve() {
    let cli = parse(&["retrieve", "--id", "MailKit", "--version", "2.15.0", "-f", "net5.0"]);
    assert!(!cli.command.unwrap().requires_resolution());
}

#[test]
fn test_nupkg_selection() {
    let cli = parse(&["transitive", "--nupkg", "./my.1.0.0.nupkg", "-f", "net5.0"]);

    assert_eq!(
        cli.command.unwrap().package().selection().unwrap(),
        PackageSelection::Artifact(PathBuf::from("./my.1.0.0.nupkg"))
    );
}

#[test]
fn test_selection_requires_exactly_one_form() {
    let both = parse(&[
        "tree", "--id", "MailKit", "--version", "2.15.0", "--nupkg", "x.nupkg", "-f", "net5.0",
    ]);
    let neither = parse(&["tree", "-f", "net5.0"]);
    let no_version = parse(&["tree", "--id", "MailKit", "-f", "net5.0"]);

    for cli in [both, neither, no_version] {
        assert!(matches!(
            cli.command.unwrap().package().selection(),
            Err(ConfigError::ValidationFailed { .. })
        ));
    }
}

#[test]
fn test_invalid_version_and_framework() {
    let cli = parse(&["tree", "--id", "MailKit", "--version", "two", "-f", "windows98"]);
    let command = cli.command.unwrap();

    assert!(matches!(
        command.package().selection(),
        Err(ConfigError::ParseError { .. })
    ));
    assert!(matches!(
        command.package().target_framework(),
        Err(ConfigError::ParseError { .. })
    ));
}

#[test]
fn test_framework_is_required() {
    let result = Cli::try_parse_from(["nutree", "tree", "--id", "MailKit", "--version", "2.15.0"]);
    assert!(result.is_err());
}

#[test]
fn test_global_options_before_command() {
    let cli = parse(&["-j", "2", "--feed", "./packages", "tree", "--nupkg", "a.nupkg", "-f", "net5.0"]);

    assert_eq!(cli.config.cpu_jobs, 2);
    assert_eq!(cli.config.feeds, vec!["./packages"]);
}
