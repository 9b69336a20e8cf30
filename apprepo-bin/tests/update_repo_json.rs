// Copyright (c) The apprepo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use apprepo_bin::{RepoJsonApp, UpdateError, UpdateOutcome};
use apprepo_metadata::VersionChange;
use camino::Utf8PathBuf;
use clap::Parser;
use serde_json::{json, Value};
use tempfile::TempDir;

const SAMPLE: &str = r#"{"apps":[{"version":"1.0","downloadURL":"old","size":10,"versions":[{"version":"1.0","size":10,"downloadURL":"old","buildVersion":"1","date":"2024-01-01T00:00:00+00:00","localizedDescription":"old desc"}]}]}"#;

fn setup(contents: Option<&str>) -> (TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().join("repo.json")).unwrap();
    if let Some(contents) = contents {
        std::fs::write(&path, contents).unwrap();
    }
    (dir, path)
}

fn run(path: &Utf8PathBuf, args: &[&str]) -> color_eyre::Result<UpdateOutcome> {
    let mut argv = vec!["update-repo-json", "--json", path.as_str()];
    argv.extend_from_slice(args);
    RepoJsonApp::try_parse_from(argv).unwrap().exec()
}

fn read(path: &Utf8PathBuf) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn new_release_is_recorded() {
    let (_dir, path) = setup(Some(SAMPLE));

    let outcome = run(&path, &["-t", "1.1", "-u", "https://x/y", "-s", "999"]).unwrap();
    assert_eq!(
        outcome,
        UpdateOutcome::Updated {
            path: path.clone(),
            change: VersionChange::Prepended,
        }
    );

    let manifest = read(&path);
    let app = &manifest["apps"][0];
    assert_eq!(app["version"], "1.1");
    assert_eq!(app["downloadURL"], "https://x/y");
    assert_eq!(app["size"], 999);
    assert!(app["versionDate"].as_str().unwrap().ends_with("+00:00"));

    let versions = app["versions"].as_array().unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0]["version"], "1.1");
    assert_eq!(versions[0]["buildVersion"], "1");
    assert_eq!(versions[0]["date"], app["versionDate"]);
    assert!(versions[0].get("minOSVersion").is_none());

    let original: Value = serde_json::from_str(SAMPLE).unwrap();
    assert_eq!(versions[1], original["apps"][0]["versions"][0]);
}

#[test]
fn rerunning_same_release_converges() {
    let (_dir, path) = setup(Some(SAMPLE));
    let args = ["-t", "1.1", "-u", "https://x/y", "-s", "999", "-n", "line one\nline two"];

    run(&path, &args).unwrap();
    let outcome = run(&path, &args).unwrap();
    assert_eq!(
        outcome,
        UpdateOutcome::Updated {
            path: path.clone(),
            change: VersionChange::Replaced,
        }
    );

    let manifest = read(&path);
    let versions = manifest["apps"][0]["versions"].as_array().unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0]["version"], "1.1");
    assert_eq!(versions[1]["version"], "1.0");
    assert!(versions[0]["localizedDescription"]
        .as_str()
        .unwrap()
        .ends_with("1.1 patched with Liquid Glass support.\n\nline one\nline two"));
}

#[test]
fn missing_release_tag_is_a_no_op() {
    let (_dir, path) = setup(Some(SAMPLE));

    let outcome = run(&path, &["-s", "999"]).unwrap();
    assert_eq!(outcome, UpdateOutcome::NoReleaseTag);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), SAMPLE);
}

#[test]
fn missing_size_fails_without_writing() {
    let (_dir, path) = setup(Some(SAMPLE));

    let report = run(&path, &["-t", "1.1", "-u", "https://x/y"]).unwrap_err();
    assert_eq!(
        report.downcast_ref::<UpdateError>(),
        Some(&UpdateError::SizeNotProvided)
    );
    assert_eq!(std::fs::read_to_string(&path).unwrap(), SAMPLE);
}

#[test]
fn missing_manifest_fails() {
    let (_dir, path) = setup(None);

    let report = run(&path, &["-t", "1.1", "-s", "1"]).unwrap_err();
    assert_eq!(
        report.downcast_ref::<UpdateError>(),
        Some(&UpdateError::ManifestNotFound { path: path.clone() })
    );
    assert!(!path.exists());
}

#[test]
fn empty_apps_fails_without_writing() {
    let contents = r#"{"name":"empty","apps":[]}"#;
    let (_dir, path) = setup(Some(contents));

    let report = run(&path, &["-t", "1.1", "-s", "1"]).unwrap_err();
    assert_eq!(report.downcast_ref::<UpdateError>(), Some(&UpdateError::NoApps));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), contents);
}

#[test]
fn malformed_manifest_is_not_a_configuration_error() {
    let (_dir, path) = setup(Some("{\"apps\": ["));

    let report = run(&path, &["-t", "1.1", "-s", "1"]).unwrap_err();
    assert!(report.downcast_ref::<UpdateError>().is_none());
}

#[test]
fn unrelated_fields_are_preserved() {
    let input = json!({
        "name": "Apollo Source",
        "identifier": "com.example.source",
        "apps": [{
            "name": "Apollo",
            "bundleIdentifier": "com.christianselig.Apollo",
            "developerName": "Zoë",
            "version": "1.0",
            "versions": [{ "version": "1.0", "minOSVersion": "15.0" }]
        }],
        "news": []
    });
    let (_dir, path) = setup(Some(&serde_json::to_string_pretty(&input).unwrap()));

    run(&path, &["-t", "1.1", "-s", "42"]).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("Zoë"));

    let manifest: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(manifest["name"], "Apollo Source");
    assert_eq!(manifest["identifier"], "com.example.source");
    assert_eq!(manifest["news"], json!([]));
    let app = &manifest["apps"][0];
    assert_eq!(app["bundleIdentifier"], "com.christianselig.Apollo");
    assert_eq!(app["downloadURL"], "");
    assert_eq!(app["versions"][0]["minOSVersion"], "15.0");
    assert_eq!(app["versions"][1]["minOSVersion"], "15.0");
}

#[test]
fn rewrite_keeps_existing_key_order() {
    let (_dir, path) = setup(Some(
        r#"{"name":"Src","apps":[{"name":"Apollo","bundleIdentifier":"x","version":"1.0","size":10,"iconURL":"i","versions":[{"version":"1.0","absoluteVersion":"a","size":10}]}]}"#,
    ));

    run(&path, &["-t", "1.1", "-s", "5"]).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    let date = read(&path)["apps"][0]["versionDate"]
        .as_str()
        .unwrap()
        .to_owned();
    let expected = format!(
        r#"{{
  "name": "Src",
  "apps": [
    {{
      "name": "Apollo",
      "bundleIdentifier": "x",
      "version": "1.1",
      "size": 5,
      "iconURL": "i",
      "versions": [
        {{
          "downloadURL": "",
          "size": 5,
          "version": "1.1",
          "buildVersion": "1",
          "date": "{date}",
          "localizedDescription": "This version includes the ApolloICA tweak version: 1.1 patched with Liquid Glass support."
        }},
        {{
          "version": "1.0",
          "absoluteVersion": "a",
          "size": 10
        }}
      ],
      "versionDate": "{date}",
      "downloadURL": ""
    }}
  ]
}}"#,
        date = date,
    );
    assert_eq!(written, expected);
}
