// Copyright (c) The apprepo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// The manifest does not have the shape the updater needs.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum ManifestError {
    /// The `apps` array is missing or empty.
    #[error("no apps array found in repo JSON")]
    NoApps,

    /// A value the updater reads or writes has the wrong JSON type.
    #[error("expected {location} in repo JSON to be {expected}")]
    UnexpectedShape {
        location: &'static str,
        expected: &'static str,
    },
}
