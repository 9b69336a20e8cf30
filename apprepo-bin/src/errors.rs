// Copyright (c) The apprepo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8PathBuf;
use std::{error, fmt};

/// A configuration problem that stops the update before anything is written.
///
/// These are reported on stdout and cause a non-zero exit status. Parse and
/// I/O failures are not represented here; they propagate as reports.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum UpdateError {
    /// The manifest file does not exist.
    ManifestNotFound { path: Utf8PathBuf },

    /// The manifest has no app entries to update.
    NoApps,

    /// No size was passed on the command line.
    SizeNotProvided,
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ManifestNotFound { path } => write!(f, "repo JSON not found at {}", path),
            Self::NoApps => write!(f, "no apps array found in repo JSON"),
            Self::SizeNotProvided => write!(f, "size not provided, failed to update repo JSON"),
        }
    }
}

impl error::Error for UpdateError {}
