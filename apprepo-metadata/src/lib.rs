// Copyright (c) The apprepo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data model for `repo.json` app repository manifests.

mod errors;
mod models;

pub use errors::*;
pub use models::*;
