// Copyright (c) The apprepo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read, update and write repo.json.

use crate::errors::UpdateError;
use apprepo_metadata::{ManifestError, RepoApp, RepoManifest, VersionChange, VersionEntry};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use camino::Utf8Path;
use chrono::{DateTime, SecondsFormat, Utc};
use color_eyre::eyre::{Result, WrapErr};
use serde_json::Value;
use std::io::{BufWriter, Write};
use tracing::{debug, info};

/// A release to record in the manifest.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ReleaseInfo<'a> {
    pub(crate) tag: &'a str,
    pub(crate) download_url: Option<&'a str>,
    pub(crate) notes: Option<&'a str>,
    pub(crate) size: Option<u64>,
}

/// Read the repo.json file.
pub(crate) fn read_repo_json(path: &Utf8Path) -> Result<RepoManifest> {
    if !path.exists() {
        return Err(UpdateError::ManifestNotFound {
            path: path.to_owned(),
        }
        .into());
    }

    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read repo JSON file at {}", path))?;
    let manifest = serde_json::from_str(&json)
        .wrap_err_with(|| format!("failed to deserialize repo JSON at {}", path))?;

    Ok(manifest)
}

/// Records `release` on the first app in the manifest.
///
/// Every successful call rewrites the top of the version history, so the manifest
/// always needs to be written back afterwards.
pub(crate) fn update_repo_json(
    manifest: &mut RepoManifest,
    release: &ReleaseInfo<'_>,
    now: DateTime<Utc>,
) -> Result<VersionChange> {
    let mut app = match manifest.primary_app_mut() {
        Ok(app) => app,
        Err(ManifestError::NoApps) => return Err(UpdateError::NoApps.into()),
        Err(error) => return Err(error.into()),
    };

    let download_url = release
        .download_url
        .or_else(|| app.download_url())
        .unwrap_or_default()
        .to_owned();
    let size = release.size.ok_or(UpdateError::SizeNotProvided)?;
    let date = now.to_rfc3339_opts(SecondsFormat::Micros, false);
    let description = compose_description(release.tag, release.notes);

    let mut entry = VersionEntry::new(
        release.tag,
        download_url.as_str(),
        size,
        date.as_str(),
        description,
    );
    entry.min_os_version = app
        .top_version()
        .and_then(|prev| prev.get("minOSVersion"))
        .and_then(Value::as_str)
        .filter(|min_os| !min_os.is_empty())
        .map(str::to_owned);

    assign_if_changed(&mut app, "version", release.tag.into());
    assign_if_changed(&mut app, "versionDate", date.into());
    assign_if_changed(&mut app, "downloadURL", download_url.into());
    assign_if_changed(&mut app, "size", size.into());

    let change = app
        .record_version(entry)
        .wrap_err("failed to update version history")?;
    info!(version = release.tag, %change, "updated version history");

    Ok(change)
}

fn assign_if_changed(app: &mut RepoApp<'_>, field: &str, value: Value) {
    if app.set_field(field, value) {
        debug!(field, "updated app field");
    } else {
        debug!(field, "app field already up to date");
    }
}

/// Builds the `localizedDescription` for a release: a header naming the tag,
/// then the release notes verbatim after a blank line.
pub(crate) fn compose_description(tag: &str, notes: Option<&str>) -> String {
    let mut parts = vec![format!(
        "This version includes the ApolloICA tweak version: {} patched with Liquid Glass support.",
        tag
    )];
    if let Some(notes) = notes.filter(|notes| !notes.is_empty()) {
        parts.push(notes.to_owned());
    }

    parts.join("\n\n").trim().to_owned()
}

pub(crate) fn write_repo_json(manifest: &RepoManifest, path: &Utf8Path) -> Result<()> {
    let file = AtomicFile::new(path, OverwriteBehavior::AllowOverwrite);
    file.write(|f| {
        let mut writer = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut writer, manifest)?;
        writer.flush().map_err(serde_json::Error::io)
    })
    .wrap_err_with(|| format!("failed to serialize repo JSON to {}", path))?;

    Ok(())
}
