// Copyright (c) The apprepo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::repo_json::{read_repo_json, update_repo_json, write_repo_json, ReleaseInfo};
use apprepo_metadata::VersionChange;
use camino::Utf8PathBuf;
use chrono::Utc;
use clap::Parser;
use color_eyre::Result;
use std::fmt;
use tracing::debug;

/// Record a new release in repo.json.
///
/// Each of the release options falls back to an environment variable when not
/// passed on the command line, or when passed as an empty string.
#[doc(hidden)]
#[derive(Debug, Parser)]
#[clap(version)]
pub struct RepoJsonApp {
    /// Release tag / version string
    #[clap(short = 't', long, env = "RELEASE_TAG")]
    release_tag: Option<String>,

    /// Download URL for the release
    #[clap(short = 'u', long, env = "CATBOX_URL")]
    catbox_url: Option<String>,

    /// Release notes to include in the localized description
    #[clap(short = 'n', long, env = "RELEASE_NOTES", hide_env_values = true)]
    release_notes: Option<String>,

    /// Size of the download in bytes (required to update)
    #[clap(short = 's', long)]
    size: Option<u64>,

    /// JSON file to edit
    #[clap(long, default_value = "repo.json")]
    json: Utf8PathBuf,
}

impl RepoJsonApp {
    pub fn exec(self) -> Result<UpdateOutcome> {
        let mut manifest = read_repo_json(&self.json)?;

        let tag = match resolve_input(self.release_tag, "RELEASE_TAG") {
            Some(tag) => tag,
            None => return Ok(UpdateOutcome::NoReleaseTag),
        };
        let download_url = resolve_input(self.catbox_url, "CATBOX_URL");
        let notes = resolve_input(self.release_notes, "RELEASE_NOTES");

        let release = ReleaseInfo {
            tag: &tag,
            download_url: download_url.as_deref(),
            notes: notes.as_deref(),
            size: self.size,
        };
        debug!(path = %self.json, ?release, "resolved release inputs");

        let change = update_repo_json(&mut manifest, &release, Utc::now())?;
        write_repo_json(&manifest, &self.json)?;

        Ok(UpdateOutcome::Updated {
            path: self.json,
            change,
        })
    }
}

/// Returns the flag value, or the environment variable `var` if the flag is
/// missing or empty. Empty values count as absent.
fn resolve_input(value: Option<String>, var: &str) -> Option<String> {
    match value {
        Some(value) if !value.is_empty() => Some(value),
        _ => std::env::var(var).ok().filter(|value| !value.is_empty()),
    }
}

/// What a successful run did.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum UpdateOutcome {
    /// The manifest was rewritten.
    Updated {
        path: Utf8PathBuf,
        change: VersionChange,
    },

    /// No release tag was given; nothing to do.
    NoReleaseTag,
}

impl fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Updated { path, change } => write!(f, "{} updated ({})", path, change),
            Self::NoReleaseTag => write!(f, "RELEASE_TAG not provided; nothing to do"),
        }
    }
}
