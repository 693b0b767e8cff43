// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Pre-upgrade checks for an el7 to el8 system upgrade.
//!
//! This crate provides functionality to:
//! - Detect known problematic 32bit packages installed next to their 64bit version
//! - Extract firewalld facts (ebtables tables, lockdown whitelist, ipset types) from its XML configuration
//! - Report conditions that inhibit the upgrade

pub mod checks;
pub mod firewalld;
pub mod package;
pub mod report;

// Re-export key types for convenience
pub use checks::{check_conflicts, collect_reports, run_checks, CheckInputs};
pub use firewalld::FirewalldFacts;
pub use package::{InstalledPackages, PackageLookup, ProblemPackage};
pub use report::{Report, ReportSink, Reports};
