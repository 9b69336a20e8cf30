// Copyright (c) The apprepo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

mod command;
mod errors;
mod repo_json;

pub use command::{RepoJsonApp, UpdateOutcome};
pub use errors::UpdateError;
