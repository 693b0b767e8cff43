// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Report entries produced by the checks and the sink that collects them.

mod console;
mod validate;

pub use console::summarize_reports;
pub use validate::validate_reports;

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Flag {
    /// The upgrade must not proceed while this report stands.
    Inhibitor,
}

/// A pointer to something the report is about (a package, a bug, a file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedResource {
    pub kind: String,
    pub value: String,
}

impl RelatedResource {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }

    pub fn package(value: impl Into<String>) -> Self {
        Self::new("package", value)
    }

    pub fn bugzilla(value: impl Into<String>) -> Self {
        Self::new("bugzilla", value)
    }

    pub fn file(value: impl Into<String>) -> Self {
        Self::new("file", value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Remediation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<Vec<String>>,
}

/// A single diagnostic entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    title: String,
    summary: String,
    severity: Severity,
    flags: Vec<Flag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remediation: Option<Remediation>,
    related_resources: Vec<RelatedResource>,
}

impl Report {
    pub fn new(title: impl Into<String>, summary: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            severity,
            flags: Vec::new(),
            remediation: None,
            related_resources: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_flag(mut self, flag: Flag) -> Self {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
        self
    }

    #[must_use]
    pub fn with_remediation_command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.remediation
            .get_or_insert_with(Remediation::default)
            .commands
            .push(command.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_remediation_hint(mut self, hint: impl Into<String>) -> Self {
        self.remediation
            .get_or_insert_with(Remediation::default)
            .hint = Some(hint.into());
        self
    }

    #[must_use]
    pub fn with_related_resource(mut self, resource: RelatedResource) -> Self {
        self.related_resources.push(resource);
        self
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    #[must_use]
    pub fn inhibits_upgrade(&self) -> bool {
        self.flags.contains(&Flag::Inhibitor)
    }

    #[must_use]
    pub fn remediation(&self) -> Option<&Remediation> {
        self.remediation.as_ref()
    }

    #[must_use]
    pub fn related_resources(&self) -> &[RelatedResource] {
        &self.related_resources
    }
}

/// Receives the reports emitted by checks.
pub trait ReportSink {
    fn create_report(&mut self, report: Report);
}

/// In-memory report sink, serialized as the run's output.
#[derive(Debug, Default, Serialize)]
pub struct Reports {
    reports: Vec<Report>,
}

impl Reports {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Report> {
        self.reports.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Reports that block the upgrade.
    pub fn inhibitors(&self) -> impl Iterator<Item = &Report> {
        self.reports.iter().filter(|report| report.inhibits_upgrade())
    }
}

impl ReportSink for Reports {
    fn create_report(&mut self, report: Report) {
        self.reports.push(report);
    }
}

impl<'a> IntoIterator for &'a Reports {
    type Item = &'a Report;
    type IntoIter = std::slice::Iter<'a, Report>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
