// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use upgrade_checks::firewalld::DEFAULT_CONFIG_DIR;

#[derive(Parser)]
#[command(name = "upgrade_checks")]
#[command(version)]
#[command(about = "Runs pre-upgrade checks against installed packages and firewalld configuration")]
pub(crate) struct Args {
    /// Log filter used when RUST_LOG is not set (e.g. "debug" or "upgrade_checks=trace").
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run all checks and write the reports in JSON format.
    Check {
        /// Path to the file to write the reports to.
        report: PathBuf,

        #[arg(
            long,
            long_help = "Path to a text file of installed packages.\n\
                    Each line contains a package name and architecture separated by whitespace.\n\
                    Empty lines and lines starting with # are ignored.\n\
                    If omitted, the RPM database of the running system is queried."
        )]
        installed: Option<PathBuf>,

        /// Firewalld configuration directory.
        #[arg(long, default_value = DEFAULT_CONFIG_DIR)]
        firewalld_dir: PathBuf,
    },
    /// Collect firewalld facts and print them in JSON format.
    FirewalldFacts {
        /// Firewalld configuration directory.
        #[arg(long, default_value = DEFAULT_CONFIG_DIR)]
        firewalld_dir: PathBuf,

        /// Write the facts to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}
