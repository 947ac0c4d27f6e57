#![allow(non_snake_case)]

use super::*;
use tempfile::TempDir;

#[test]
fn ProjectConfig___from_str___parses_full_file() {
    let yaml = r#"
build:
  version: 1.4.2
  outputs: [js, php]
  endpoints:
    production: https://api.example.com
    sandbox: https://sandbox.example.com
    local: http://localhost:8000
  config:
    js:
      outputPath: dist/js/[version]
      name: example-sdk
    php:
      output_path: dist/php
      namespace: Example\Sdk
"#;

    let config = ProjectConfig::from_str(yaml).unwrap();

    assert_eq!(config.version(), "1.4.2");
    assert_eq!(config.build.outputs, vec!["js", "php"]);
    assert_eq!(config.build.endpoints.sandbox, "https://sandbox.example.com");
    assert_eq!(config.backend("js").name.as_deref(), Some("example-sdk"));
    assert_eq!(config.backend("php").namespace.as_deref(), Some("Example\\Sdk"));
    assert_eq!(config.backend("php").output_path.as_deref(), Some("dist/php"));
}

#[test]
fn ProjectConfig___from_str___applies_defaults() {
    let config = ProjectConfig::from_str("build: {}\n").unwrap();

    assert_eq!(config.version(), "0.0.0");
    assert_eq!(config.build.outputs, vec!["js"]);
    assert_eq!(config.build.endpoints.production, "");
    assert!(config.backend("js").output_path.is_none());
}

#[test]
fn ProjectConfig___from_str___invalid_yaml___is_configuration_error() {
    let err = ProjectConfig::from_str("build: [").unwrap_err();

    assert!(matches!(err, GenError::Configuration(_)));
}

#[test]
fn ProjectConfig___from_project_dir___missing_file___is_configuration_error() {
    let dir = TempDir::new().unwrap();

    let err = ProjectConfig::from_project_dir(dir.path()).unwrap_err();

    assert!(matches!(err, GenError::Configuration(msg) if msg.contains("build.yml")));
}

#[test]
fn ProjectConfig___output_dir___substitutes_tokens_relative_to_project() {
    let config = ProjectConfig::from_str(
        "build:\n  version: 2.0.0\n  config:\n    js:\n      outputPath: out/[backend]-[version]\n",
    )
    .unwrap();

    let dir = config.output_dir(Path::new("/project"), "js").unwrap();

    assert_eq!(dir, Path::new("/project/out/js-2.0.0"));
}

#[test]
fn ProjectConfig___output_dir___missing_path___is_configuration_error() {
    let config = ProjectConfig::from_str("build:\n  version: 2.0.0\n").unwrap();

    let err = config.output_dir(Path::new("/project"), "php").unwrap_err();

    assert!(err.to_string().contains("build.config.php.outputPath"));
}

#[test]
fn BackendConfig___option_or___falls_back() {
    let backend = BackendConfig {
        keyword: Some("acme".into()),
        ..BackendConfig::default()
    };

    assert_eq!(backend.option_or(&backend.keyword, "netforce"), "acme");
    assert_eq!(backend.option_or(&backend.name, "nws-sdk"), "nws-sdk");
}

#[test]
fn ProjectConfig___from_str___numeric_version___kept_as_text() {
    let config = ProjectConfig::from_str("build:\n  version: 3\n").unwrap();

    assert_eq!(config.version(), "3");
}
