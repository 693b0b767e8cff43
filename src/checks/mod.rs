// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Pre-upgrade checks. Each check consumes collected facts and emits reports.

mod firewalld;
mod multiple_package_versions;

pub use multiple_package_versions::check_conflicts;

use tracing::debug;

use crate::firewalld::FirewalldFacts;
use crate::package::PackageLookup;
use crate::report::{ReportSink, Reports};
use firewalld::FirewalldConfig;
use multiple_package_versions::MultiplePackageVersions;

/// Facts the checks consume.
pub struct CheckInputs<'a> {
    pub packages: &'a dyn PackageLookup,
    pub firewalld: &'a FirewalldFacts,
}

/// A single check. Checks are stateless and are identified by name.
pub(crate) trait Check {
    const NAME: &'static str;

    /// Inspect the inputs and emit zero or more reports into `sink`.
    fn process(inputs: &CheckInputs<'_>, sink: &mut dyn ReportSink);
}

/// Run every check against the inputs, emitting reports into `sink`.
pub fn run_checks(inputs: &CheckInputs<'_>, sink: &mut dyn ReportSink) {
    run::<MultiplePackageVersions>(inputs, sink);
    run::<FirewalldConfig>(inputs, sink);
}

/// Run every check and collect the reports.
#[must_use]
pub fn collect_reports(inputs: &CheckInputs<'_>) -> Reports {
    let mut reports = Reports::new();
    run_checks(inputs, &mut reports);
    reports
}

fn run<C: Check>(inputs: &CheckInputs<'_>, sink: &mut dyn ReportSink) {
    debug!("Running check: check={}", C::NAME);
    C::process(inputs, sink);
}
