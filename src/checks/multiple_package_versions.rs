// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Inhibits the upgrade when a known problematic 32bit package is installed together with
//! its 64bit counterpart.

use tracing::{debug, warn};

use super::{Check, CheckInputs};
use crate::package::{PackageLookup, ProblemPackage, ARCH_X86_64, PROBLEM_PACKAGES};
use crate::report::{Flag, RelatedResource, Report, ReportSink, Severity};

const TITLE: &str =
    "Some packages have both 32bit and 64bit version installed which are known to be incompatible";
const SUMMARY: &str = "The following packages have both 32bit and 64bit version installed which \
                       are known to be incompatible in RHEL8:";
const REMOVE_COMMAND: [&str; 3] = ["yum", "remove", "-y"];

pub(crate) struct MultiplePackageVersions;

impl Check for MultiplePackageVersions {
    const NAME: &'static str = "multiple_package_versions";

    fn process(inputs: &CheckInputs<'_>, sink: &mut dyn ReportSink) {
        if let Some(report) = check_conflicts(PROBLEM_PACKAGES, inputs.packages) {
            sink.create_report(report);
        }
    }
}

/// Find problem packages installed in both their listed and the 64bit architecture.
///
/// Returns a single inhibiting report covering every conflict, or `None` if there are
/// no conflicts.
pub fn check_conflicts<L>(problem_packages: &[ProblemPackage], lookup: &L) -> Option<Report>
where
    L: PackageLookup + ?Sized,
{
    let actual_problems: Vec<&ProblemPackage> = problem_packages
        .iter()
        .filter(|problem| is_installed_with_x86_64(problem, lookup))
        .collect();
    if actual_problems.is_empty() {
        return None;
    }
    debug!(
        "Found conflicting package versions: packages={:?}",
        actual_problems.iter().map(|p| p.package).collect::<Vec<_>>()
    );

    let summary = actual_problems
        .iter()
        .fold(SUMMARY.to_string(), |summary, problem| {
            format!("{summary}\n-{}", problem.package)
        });
    let remediation = REMOVE_COMMAND
        .iter()
        .copied()
        .chain(actual_problems.iter().map(|problem| problem.package));

    let report = Report::new(TITLE, summary, Severity::High)
        .with_flag(Flag::Inhibitor)
        .with_remediation_command(remediation);
    Some(
        actual_problems
            .iter()
            .fold(report, |report, problem| {
                let report = report.with_related_resource(RelatedResource::package(problem.package));
                match problem.bugzilla {
                    Some(url) => report.with_related_resource(RelatedResource::bugzilla(url)),
                    None => report,
                }
            }),
    )
}

fn is_installed_with_x86_64<L>(problem: &ProblemPackage, lookup: &L) -> bool
where
    L: PackageLookup + ?Sized,
{
    let Some((name, arch)) = problem.name_and_arch() else {
        warn!(
            "Skipping problem package without architecture: package={}",
            problem.package
        );
        return false;
    };
    lookup.has_package(name, arch) && lookup.has_package(name, ARCH_X86_64)
}
