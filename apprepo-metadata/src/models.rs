// Copyright (c) The apprepo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::ManifestError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A JSON object whose keys keep their original order.
pub type JsonObject = Map<String, Value>;

/// A repo.json document.
///
/// The document is kept as an ordered JSON object, so rewriting it leaves every
/// key the updater does not touch exactly where it was. Keys that are assigned
/// keep their position; new keys go to the end of their object.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct RepoManifest {
    root: JsonObject,
}

impl RepoManifest {
    /// Returns the app that releases are published to: the first entry in `apps`.
    pub fn primary_app_mut(&mut self) -> Result<RepoApp<'_>, ManifestError> {
        let app = self
            .root
            .get_mut("apps")
            .and_then(Value::as_array_mut)
            .and_then(|apps| apps.first_mut())
            .ok_or(ManifestError::NoApps)?;
        let fields = app.as_object_mut().ok_or(ManifestError::UnexpectedShape {
            location: "apps[0]",
            expected: "an object",
        })?;

        Ok(RepoApp { fields })
    }
}

/// A mutable view of one app object within a [`RepoManifest`].
#[derive(Debug)]
pub struct RepoApp<'a> {
    fields: &'a mut JsonObject,
}

impl RepoApp<'_> {
    /// The current version string
    pub fn version(&self) -> Option<&str> {
        self.fields.get("version").and_then(Value::as_str)
    }

    /// Where the current version can be downloaded
    pub fn download_url(&self) -> Option<&str> {
        self.fields.get("downloadURL").and_then(Value::as_str)
    }

    /// The most recent entry in the version history, if there is one.
    pub fn top_version(&self) -> Option<&JsonObject> {
        self.fields
            .get("versions")
            .and_then(Value::as_array)
            .and_then(|versions| versions.first())
            .and_then(Value::as_object)
    }

    /// Sets a top-level app field. Returns true if the stored value changed.
    pub fn set_field(&mut self, key: &str, value: impl Into<Value>) -> bool {
        let value = value.into();
        if self.fields.get(key) == Some(&value) {
            return false;
        }
        self.fields.insert(key.to_owned(), value);
        true
    }

    /// Puts `entry` at the top of the version history.
    ///
    /// If the topmost entry already has the same version it is replaced wholesale,
    /// otherwise the new entry is prepended. Older entries are left untouched.
    pub fn record_version(&mut self, entry: VersionEntry) -> Result<VersionChange, ManifestError> {
        if matches!(self.fields.get("versions"), None | Some(Value::Null)) {
            self.fields
                .insert("versions".to_owned(), Value::Array(vec![entry.into()]));
            return Ok(VersionChange::Created);
        }

        let versions = self
            .fields
            .get_mut("versions")
            .and_then(Value::as_array_mut)
            .ok_or(ManifestError::UnexpectedShape {
                location: "apps[0].versions",
                expected: "an array",
            })?;
        let top_version = versions
            .first()
            .and_then(|top| top.get("version"))
            .and_then(Value::as_str);

        if top_version == Some(entry.version.as_str()) {
            versions[0] = entry.into();
            Ok(VersionChange::Replaced)
        } else {
            versions.insert(0, entry.into());
            Ok(VersionChange::Prepended)
        }
    }
}

/// How [`RepoApp::record_version`] changed the version history.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VersionChange {
    /// There was no history; it now holds just the new entry.
    Created,

    /// The new entry was added in front of the existing ones.
    Prepended,

    /// The topmost entry had the same version and was replaced.
    Replaced,
}

impl fmt::Display for VersionChange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Created => write!(f, "started version history"),
            Self::Prepended => write!(f, "added new version entry"),
            Self::Replaced => write!(f, "replaced topmost version entry"),
        }
    }
}

/// A release entry created by the updater.
#[derive(Clone, Debug, PartialEq)]
pub struct VersionEntry {
    pub download_url: String,
    pub size: u64,
    pub version: String,
    pub build_version: String,
    pub date: String,
    pub localized_description: String,
    /// Carried over from the previous topmost entry.
    pub min_os_version: Option<String>,
}

impl VersionEntry {
    /// Build version stamped on every entry this crate creates. Never incremented.
    pub const BUILD_VERSION: &'static str = "1";

    pub fn new(
        version: impl Into<String>,
        download_url: impl Into<String>,
        size: u64,
        date: impl Into<String>,
        localized_description: impl Into<String>,
    ) -> Self {
        Self {
            download_url: download_url.into(),
            size,
            version: version.into(),
            build_version: Self::BUILD_VERSION.to_owned(),
            date: date.into(),
            localized_description: localized_description.into(),
            min_os_version: None,
        }
    }
}

impl From<VersionEntry> for Value {
    fn from(entry: VersionEntry) -> Self {
        let mut object = JsonObject::new();
        object.insert("downloadURL".to_owned(), entry.download_url.into());
        object.insert("size".to_owned(), entry.size.into());
        object.insert("version".to_owned(), entry.version.into());
        object.insert("buildVersion".to_owned(), entry.build_version.into());
        object.insert("date".to_owned(), entry.date.into());
        object.insert(
            "localizedDescription".to_owned(),
            entry.localized_description.into(),
        );
        if let Some(min_os_version) = entry.min_os_version {
            object.insert("minOSVersion".to_owned(), min_os_version.into());
        }
        Value::Object(object)
    }
}
