//! End-to-end builds against the bundled templates
//!
//! Each test writes a small project into a temp directory, runs the
//! orchestrator and inspects the generated package trees.

#![allow(non_snake_case)]

use sdkgen_core::{BuildOrchestrator, GenError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const BUILD_YML: &str = r#"
build:
  version: 1.4.0
  outputs: [js, php]
  endpoints:
    production: https://api.example.com
    sandbox: https://sandbox.example.com
    local: http://localhost:8000
  config:
    js:
      outputPath: dist/[backend]/[version]
      name: example-sdk
    php:
      outputPath: dist/[backend]/[version]
      name: example/sdk-php
      namespace: Acme\Sdk
"#;

const USER_MODEL: &str = "model: user\ndesc: A registered user\n";

const INVOICE_RESOURCE: &str = r#"
resource: invoice
actions:
  find:
    uri: invoices/{id}
    args:
      id: param
    return: { type: model, resource: user }
"#;

const AUTH_SERVICE: &str = r#"
service: auth
desc: Authentication
resources:
  invoices: invoice
actions:
  login:
    method: POST
    uri: auth/login
    args:
      email: data
      password: data
    return: { type: model, resource: user }
    events:
      after:
        token: accessToken
  logout:
    method: post
    uri: auth/logout
    events:
      after:
        accessToken: ~
  check:
    uri: auth/check/{session}
    args:
      session: param
      verbose: { type: query, default: false }
    return: { type: boolean, value: ret.data.valid }
"#;

fn templates_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates")
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "build.yml", BUILD_YML);
    write(dir.path(), "models/user.yml", USER_MODEL);
    write(dir.path(), "resources/invoice.yml", INVOICE_RESOURCE);
    write(dir.path(), "services/auth.yml", AUTH_SERVICE);
    dir
}

fn build(project: &Path) {
    BuildOrchestrator::load(project, templates_dir())
        .unwrap()
        .run()
        .unwrap();
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap_or_else(|e| panic!("{rel}: {e}"))
}

/// Relative path → content for every file under `root`
fn snapshot(root: &Path) -> BTreeMap<PathBuf, String> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, String>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path.strip_prefix(root).unwrap().to_path_buf();
                out.insert(rel, fs::read_to_string(&path).unwrap());
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}

// js

#[test]
fn build___js___writes_package_layout() {
    let dir = project();
    build(dir.path());
    let out = dir.path().join("dist/js/1.4.0");

    for rel in [
        ".babelrc",
        ".npmrc",
        "package.json",
        "webpack.config.js",
        "browser.js",
        "index.js",
        "src/ApiClient.js",
        "src/Base/Client.js",
        "src/Base/Global.js",
        "src/Base/Consts.js",
        "src/Base/Model.js",
        "src/Base/Resource.js",
        "src/Models/User.js",
        "src/Resources/Invoice.js",
        "src/AuthClient.js",
    ] {
        assert!(out.join(rel).is_file(), "missing {rel}");
    }
}

#[test]
fn build___js___renders_static_parameters() {
    let dir = project();
    build(dir.path());
    let out = dir.path().join("dist/js/1.4.0");

    let package = read(&out, "package.json");
    assert!(package.contains("\"name\": \"example-sdk\""));
    assert!(package.contains("\"version\": \"1.4.0\""));
    assert!(read(&out, "src/Base/Consts.js").contains("https://sandbox.example.com"));
    assert!(
        read(&out, "index.js").contains("    'AuthClient': require('./src/AuthClient')")
    );
}

#[test]
fn build___js___service_methods_compiled() {
    let dir = project();
    build(dir.path());
    let service = read(&dir.path().join("dist/js/1.4.0"), "src/AuthClient.js");

    assert!(service.contains("const UserModel = require('./Models/User');"));
    assert!(service.contains("const Invoice = require('./Resources/Invoice');"));
    assert!(service.contains(" * @property {Invoice} invoices"));
    assert!(service.contains("this.invoices = new Invoice(this);"));
    assert!(service.contains("class AuthClient extends Client"));
    assert!(service.contains("async login(email, password)"));
    assert!(service.contains(
        "this.client.post(`auth/login`, {'email': email,'password': password,});"
    ));
    assert!(service.contains("this.client.setParam('accessToken', Arr.get(ret, 'token'));"));
    assert!(service.contains("return new UserModel(ret);"));
    assert!(service.contains("this.client.setParam('accessToken', null);"));
    assert!(service.contains("async check(session, verbose = false)"));
    assert!(service.contains("this.client.get(`auth/check/${session}`, {}, {'verbose': verbose,});"));
    assert!(service.contains("return (Arr.get(ret, 'data.valid') == true);"));
}

#[test]
fn build___js___resource_imports_models_from_parent() {
    let dir = project();
    build(dir.path());
    let resource = read(&dir.path().join("dist/js/1.4.0"), "src/Resources/Invoice.js");

    assert!(resource.contains("const UserModel = require('../Models/User');"));
    assert!(resource.contains("async find(id)"));
    assert!(resource.contains("`invoices/${id}`"));
}

// php

#[test]
fn build___php___service_uses_namespace() {
    let dir = project();
    build(dir.path());
    let out = dir.path().join("dist/php/1.4.0");
    let service = read(&out, "src/AuthClient.php");

    assert!(service.starts_with("<?php namespace Acme\\Sdk;"));
    assert!(service.contains("use Acme\\Sdk\\Models\\User as UserModel;"));
    assert!(service.contains("use Acme\\Sdk\\Resources\\Invoice as Invoice;"));
    assert!(service.contains("public $invoices;"));
    assert!(service.contains("$this->invoices = new Invoice($this);"));
    assert!(service.contains("public function login($email, $password)"));
    assert!(service.contains(
        "$this->client->post(\"auth/login\", ['email' => $email,'password' => $password,]);"
    ));
    assert!(service.contains("$this->client->get(\"auth/check/{$session}\", [], ['verbose' => $verbose,]);"));
    assert!(service.contains("return (Arr::get($ret, 'data.valid') == true);"));
    assert!(service.contains("return new UserModel($ret);"));
}

#[test]
fn build___php___index_and_manifest() {
    let dir = project();
    build(dir.path());
    let out = dir.path().join("dist/php/1.4.0");

    assert!(read(&out, "src/Services.php").contains("        'AuthClient' => AuthClient::class,"));
    let composer = read(&out, "composer.json");
    assert!(composer.contains("\"Acme\\\\Sdk\\\\\": \"src/\""));
    assert!(composer.contains("\"name\": \"example/sdk-php\""));
    assert!(out.join("src/Base/Response.php").is_file());
    assert!(out.join("src/Models/User.php").is_file());
    assert!(out.join("src/Resources/Invoice.php").is_file());
}

// cross-backend

#[test]
fn build___both_backends___share_class_names() {
    let dir = project();
    build(dir.path());

    let js: Vec<_> = snapshot(&dir.path().join("dist/js/1.4.0/src"))
        .into_keys()
        .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .filter(|name| name.ends_with("Client") && name != "Client" && name != "ApiClient")
        .collect();
    let php: Vec<_> = snapshot(&dir.path().join("dist/php/1.4.0/src"))
        .into_keys()
        .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .filter(|name| name.ends_with("Client") && name != "Client")
        .collect();

    assert_eq!(js, ["AuthClient"]);
    assert_eq!(php, ["AuthClient"]);
}

#[test]
fn build___run_twice___byte_identical_output() {
    let dir = project();
    build(dir.path());
    let first = snapshot(&dir.path().join("dist"));

    build(dir.path());
    let second = snapshot(&dir.path().join("dist"));

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn build___stale_output___removed_on_rebuild() {
    let dir = project();
    build(dir.path());
    write(dir.path(), "dist/js/1.4.0/src/Stale.js", "old");
    fs::remove_file(dir.path().join("services/auth.yml")).unwrap();

    build(dir.path());
    let out = dir.path().join("dist/js/1.4.0");

    assert!(!out.join("src/Stale.js").exists());
    assert!(!out.join("src/AuthClient.js").exists());
    assert!(!read(&out, "index.js").contains("AuthClient"));
}

#[test]
fn build___output_has_no_runs_of_blank_lines() {
    let dir = project();
    build(dir.path());

    for (path, content) in snapshot(&dir.path().join("dist")) {
        assert!(
            !content.contains("\n\n\n"),
            "{} has consecutive blank lines",
            path.display()
        );
    }
}

// failures

#[test]
fn build___malformed_definition___is_definition_load_error() {
    let dir = project();
    write(dir.path(), "models/broken.yml", "model: [unterminated\n");

    let err = BuildOrchestrator::load(dir.path(), templates_dir())
        .unwrap()
        .run()
        .unwrap_err();

    assert!(matches!(err, GenError::DefinitionLoad { path, .. } if path.ends_with("broken.yml")));
    assert!(!dir.path().join("dist").exists());
}

#[test]
fn build___definition_without_name___skipped() {
    let dir = project();
    write(dir.path(), "models/anonymous.yml", "desc: nothing to see\n");

    build(dir.path());

    let models = snapshot(&dir.path().join("dist/js/1.4.0/src/Models"));
    assert_eq!(models.len(), 1);
}

#[test]
fn build___missing_stub___is_stub_not_found() {
    let dir = project();
    let templates = TempDir::new().unwrap();
    write(templates.path(), "js/.babelrc", "{}");

    let err = BuildOrchestrator::load(dir.path(), templates.path())
        .unwrap()
        .run()
        .unwrap_err();

    assert!(matches!(err, GenError::StubNotFound(_)));
}
