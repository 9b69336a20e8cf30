// Copyright (c) The apprepo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record a new release in an app repository's repo.json.

use apprepo_bin::{RepoJsonApp, UpdateError};
use clap::Parser;
use color_eyre::Result;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let app = RepoJsonApp::parse();
    match app.exec() {
        Ok(outcome) => {
            println!("{}", outcome);
            Ok(ExitCode::SUCCESS)
        }
        Err(report) => match report.downcast_ref::<UpdateError>() {
            Some(error) => {
                println!("{}", error);
                Ok(ExitCode::FAILURE)
            }
            None => Err(report),
        },
    }
}
