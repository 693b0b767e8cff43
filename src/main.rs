// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.
mod args;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

use args::{Args, Command};
use upgrade_checks::checks::{collect_reports, CheckInputs};
use upgrade_checks::firewalld::FirewalldFacts;
use upgrade_checks::package::InstalledPackages;
use upgrade_checks::report::{summarize_reports, validate_reports};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    match args.command {
        Command::Check {
            report,
            installed,
            firewalld_dir,
        } => {
            let packages = load_installed_packages(installed.as_deref())?;
            let firewalld = collect_firewalld_facts(&firewalld_dir)?;
            let reports = collect_reports(&CheckInputs {
                packages: &packages,
                firewalld: &firewalld,
            });
            write_json_to_file(&reports, &report)?;
            summarize_reports(&reports);
            validate_reports(&reports)
        }
        Command::FirewalldFacts {
            firewalld_dir,
            output,
        } => {
            let facts = collect_firewalld_facts(&firewalld_dir)?;
            match output {
                Some(dest) => write_json_to_file(&facts, &dest),
                None => serde_json::to_writer_pretty(io::stdout().lock(), &facts)
                    .context("Failed to serialize firewalld facts to JSON"),
            }
        }
    }
}

/// Log to stderr, preferring `RUST_LOG` over the command line filter.
fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Load the installed packages from a file, or from the RPM database if no file is given.
///
/// # Errors
/// Returns an error if the file cannot be parsed or the RPM database cannot be queried.
fn load_installed_packages(path: Option<&Path>) -> Result<InstalledPackages> {
    let packages = match path {
        Some(path) => {
            info!("Reading installed packages: file={}", path.display());
            InstalledPackages::from_file(path)
                .with_context(|| format!("Failed to read installed packages: {}", path.display()))?
        }
        None => {
            info!("Querying RPM database for installed packages");
            InstalledPackages::from_rpm_database()
                .context("Failed to query installed packages")?
        }
    };
    info!("Installed packages loaded: packages={}", packages.len());
    Ok(packages)
}

fn collect_firewalld_facts(config_dir: &Path) -> Result<FirewalldFacts> {
    info!("Collecting firewalld facts: dir={}", config_dir.display());
    FirewalldFacts::collect(config_dir).with_context(|| {
        format!(
            "Failed to collect firewalld facts: {}",
            config_dir.display()
        )
    })
}

/// Write a value as pretty JSON to a file.
///
/// # Errors
/// Returns an error if the value cannot be serialized to JSON or if the file cannot be created.
fn write_json_to_file<T: Serialize>(value: &T, dest: &Path) -> Result<()> {
    info!("Writing JSON to file: file={}", dest.display());
    let file = File::create(dest)
        .with_context(|| format!("Failed to create JSON output file: {}", dest.display()))?;
    serde_json::to_writer_pretty(file, value)
        .with_context(|| format!("Failed to serialize JSON: {}", dest.display()))?;
    Ok(())
}
