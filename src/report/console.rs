// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Formats and prints report summaries to the console.

use comfy_table::{Cell, Table};

use super::{Report, Reports};

/// Summarize the reports to the console.
///
/// Prints an overview table of all reports followed by the remediation and related
/// resources of each one.
pub fn summarize_reports(reports: &Reports) {
    println!("Total reports: {}", reports.len());
    println!("Inhibitors: {}\n", reports.inhibitors().count());

    if reports.is_empty() {
        return;
    }
    println!("{}\n", overview_table(reports));

    for report in reports {
        println!("{}\n{}\n", report.title(), report.summary());
        if let Some(table) = details_table(report) {
            println!("{table}\n");
        }
    }
}

/// Create a table with the default preset styling.
fn default_table_preset() -> Table {
    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::UTF8_FULL_CONDENSED)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
    table
}

/// Create a table listing every report with its severity and inhibitor status.
fn overview_table(reports: &Reports) -> Table {
    let mut table = default_table_preset();
    table.set_header(vec![
        Cell::new("Severity").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Inhibitor").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Title").add_attribute(comfy_table::Attribute::Bold),
    ]);
    for report in reports {
        table.add_row(vec![
            Cell::new(report.severity()),
            Cell::new(if report.inhibits_upgrade() { "yes" } else { "no" }),
            Cell::new(report.title()),
        ]);
    }
    table
}

/// Create a table with the remediation and related resources of a report.
///
/// Returns `None` if the report has neither.
fn details_table(report: &Report) -> Option<Table> {
    let mut rows: Vec<(String, String)> = Vec::new();
    if let Some(remediation) = report.remediation() {
        if let Some(hint) = &remediation.hint {
            rows.push(("hint".to_string(), hint.clone()));
        }
        rows.extend(
            remediation
                .commands
                .iter()
                .map(|command| ("command".to_string(), command.join(" "))),
        );
    }
    rows.extend(
        report
            .related_resources()
            .iter()
            .map(|resource| (resource.kind.clone(), resource.value.clone())),
    );
    if rows.is_empty() {
        return None;
    }

    let mut table = default_table_preset();
    table.set_header(vec![
        Cell::new("Kind").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Value").add_attribute(comfy_table::Attribute::Bold),
    ]);
    for (kind, value) in rows {
        table.add_row(vec![Cell::new(kind), Cell::new(value)]);
    }
    Some(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Flag, RelatedResource, ReportSink, Severity};

    #[test]
    fn test_details_table_lists_remediation_and_resources() {
        let report = Report::new("Broken", "Something is broken", Severity::High)
            .with_flag(Flag::Inhibitor)
            .with_remediation_command(["yum", "remove", "-y", "brlapi.i686"])
            .with_related_resource(RelatedResource::package("brlapi.i686"));
        let rendered = details_table(&report).unwrap().to_string();
        assert!(rendered.contains("yum remove -y brlapi.i686"));
        assert!(rendered.contains("package"));
    }

    #[test]
    fn test_details_table_empty_report() {
        let report = Report::new("Note", "Nothing to do", Severity::Low);
        assert!(details_table(&report).is_none());
    }

    #[test]
    fn test_overview_table_marks_inhibitors() {
        let mut reports = Reports::new();
        reports.create_report(Report::new("Blocking", "b", Severity::High).with_flag(Flag::Inhibitor));
        let rendered = overview_table(&reports).to_string();
        assert!(rendered.contains("Blocking"));
        assert!(rendered.contains("high"));
        assert!(rendered.contains("yes"));
    }
}
