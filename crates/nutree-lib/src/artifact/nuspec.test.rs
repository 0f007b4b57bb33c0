use super::*;

const GROUPED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://schemas.microsoft.com/packaging/2013/05/nuspec.xsd">
  <metadata>
    <id>MailKit</id>
    <version>2.15.0</version>
    <authors>Jeffrey Stedfast</authors>
    <dependencies>
      <group targetFramework=".NETFramework4.5">
        <dependency id="MimeKit" version="2.15.0" exclude="Build,Analyzers" />
        <dependency id="System.Net.Http" version="4.3.4" />
      </group>
      <group targetFramework=".NETStandard2.0">
        <dependency id="MimeKit" version="2.15.0" />
      </group>
      <group targetFramework="net5.0">
        <dependency id="MimeKit" version="[2.15.0, 3.0.0)" />
      </group>
    </dependencies>
  </metadata>
</package>"#;

fn origin() -> &'static Path {
    Path::new("MailKit.nuspec")
}

#[test]
fn test_parse_grouped_dependencies() {
    let metadata = NuspecMetadata::parse(GROUPED, origin()).unwrap();

    assert_eq!(metadata.identity.to_string(), "MailKit.2.15.0");
    assert_eq!(metadata.groups.len(), 3);
    assert_eq!(metadata.groups[0].target.to_string(), "net45");
    assert_eq!(metadata.groups[0].dependencies.len(), 2);
    assert_eq!(metadata.groups[2].target.to_string(), "net5.0");
}

#[test]
fn test_descriptor_uses_nearest_group() {
    let metadata = NuspecMetadata::parse(GROUPED, origin()).unwrap();

    let net5 = metadata.clone().into_descriptor(&"net5.0".parse().unwrap());
    assert_eq!(net5.platform().to_string(), "net5.0");
    let deps: Vec<_> = net5.dependencies().iter().map(ToString::to_string).collect();
    assert_eq!(deps, vec!["MimeKit [2.15.0, 3.0.0)"]);

    let core = metadata.into_descriptor(&"netcoreapp3.1".parse().unwrap());
    let deps: Vec<_> = core.dependencies().iter().map(ToString::to_string).collect();
    assert_eq!(deps, vec!["MimeKit [2.15.0, )"]);
}

#[test]
fn test_parse_flat_dependency_list() {
    let xml = r#"<package>
  <metadata>
    <id>Legacy.Lib</id>
    <version>1.0</version>
    <dependencies>
      <dependency id="Newtonsoft.Json" version="9.0.1" />
      <dependency id="Anything" />
    </dependencies>
  </metadata>
</package>"#;

    let metadata = NuspecMetadata::parse(xml, origin()).unwrap();
    assert_eq!(metadata.groups.len(), 1);
    assert!(metadata.groups[0].target.is_any());

    let descriptor = metadata.into_descriptor(&"net5.0".parse().unwrap());
    let deps: Vec<_> = descriptor
        .dependencies()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(deps, vec!["Newtonsoft.Json [9.0.1, )", "Anything (, )"]);
}

#[test]
fn test_parse_without_dependencies() {
    let xml = r#"<package><metadata><id>Leaf</id><version>4.5.1</version></metadata></package>"#;
    let metadata = NuspecMetadata::parse(xml, origin()).unwrap();
    assert!(metadata.groups.is_empty());
    assert!(
        metadata
            .into_descriptor(&"net5.0".parse().unwrap())
            .dependencies()
            .is_empty()
    );
}

#[test]
fn test_parse_rejects_bad_version() {
    let xml = r#"<package><metadata><id>Broken</id><version>not-a-version</version></metadata></package>"#;
    let error = NuspecMetadata::parse(xml, origin()).unwrap_err();
    assert!(matches!(error, ArtifactError::InvalidMetadata { .. }));
}

#[test]
fn test_parse_rejects_malformed_xml() {
    let error = NuspecMetadata::parse("<package><metadata>", origin()).unwrap_err();
    assert!(matches!(error, ArtifactError::Xml { .. }));
}
