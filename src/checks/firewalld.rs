// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Inhibits the upgrade when firewalld uses features the el8 backends cannot express.

use super::{Check, CheckInputs};
use crate::firewalld::{FirewalldFacts, DIRECT_FILE, IPSETS_DIR};
use crate::report::{Flag, RelatedResource, Report, ReportSink, Severity};

/// Ebtables tables missing from el8 ebtables.
const UNSUPPORTED_EBTABLES_TABLES: &[&str] = &["broute"];

/// Ipset types the el8 nftables backend supports.
const NFTABLES_IPSET_TYPES: &[&str] = &[
    "hash:ip",
    "hash:ip,mark",
    "hash:ip,port",
    "hash:ip,port,ip",
    "hash:ip,port,net",
    "hash:mac",
    "hash:net",
    "hash:net,iface",
    "hash:net,net",
    "hash:net,port",
    "hash:net,port,net",
];

pub(crate) struct FirewalldConfig;

impl Check for FirewalldConfig {
    const NAME: &'static str = "check_firewalld_config";

    fn process(inputs: &CheckInputs<'_>, sink: &mut dyn ReportSink) {
        if let Some(report) = unsupported_ebtables_report(inputs.firewalld) {
            sink.create_report(report);
        }
        if let Some(report) = unsupported_ipset_report(inputs.firewalld) {
            sink.create_report(report);
        }
    }
}

fn unsupported_ebtables_report(facts: &FirewalldFacts) -> Option<Report> {
    let tables = unique(
        facts
            .ebtables_tables_in_use
            .iter()
            .filter(|table| UNSUPPORTED_EBTABLES_TABLES.contains(&table.as_str())),
    );
    if tables.is_empty() {
        return None;
    }
    let tables = tables.join(", ");
    Some(
        Report::new(
            "Firewalld is using an unsupported ebtables table.",
            format!("ebtables in RHEL8 does not support these tables: {tables}"),
            Severity::High,
        )
        .with_flag(Flag::Inhibitor)
        .with_remediation_hint(format!(
            "Remove firewalld direct rules that use these ebtables tables: {tables}"
        ))
        .with_related_resource(RelatedResource::file(
            facts.config_dir.join(DIRECT_FILE).display().to_string(),
        )),
    )
}

fn unsupported_ipset_report(facts: &FirewalldFacts) -> Option<Report> {
    let types = unique(
        facts
            .ipset_types_in_use
            .iter()
            .filter(|ipset_type| !NFTABLES_IPSET_TYPES.contains(&ipset_type.as_str())),
    );
    if types.is_empty() {
        return None;
    }
    let types = types.join(", ");
    Some(
        Report::new(
            "Firewalld is using an unsupported ipset type.",
            format!("These ipset types are not supported by firewalld's nftables backend: {types}"),
            Severity::High,
        )
        .with_flag(Flag::Inhibitor)
        .with_remediation_hint(format!("Remove ipsets of these types from firewalld: {types}"))
        .with_related_resource(RelatedResource::file(
            facts.config_dir.join(IPSETS_DIR).display().to_string(),
        )),
    )
}

/// Deduplicate while keeping first-seen order.
fn unique<'a>(values: impl Iterator<Item = &'a String>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for value in values {
        if !seen.contains(&value.as_str()) {
            seen.push(value);
        }
    }
    seen
}
