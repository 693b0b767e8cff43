// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Extracts the ebtables tables referenced by firewalld direct rules (`direct.xml`).

use roxmltree::Node;
use tracing::warn;

const IPV_EBTABLES: &str = "eb";
const TABLE_OPTION: &str = "-t";

/// Collect the ebtables tables used by `<rule>` and `<passthrough>` entries of a
/// `<direct>` document.
///
/// Only entries with `ipv="eb"` are considered. Tables are returned in document order
/// and duplicates are kept. Entries that do not name a table are skipped.
#[must_use]
pub fn extract_ebtables_tables(direct: Node<'_, '_>) -> Vec<String> {
    direct
        .children()
        .filter(|node| node.is_element() && node.attribute("ipv") == Some(IPV_EBTABLES))
        .filter_map(|node| match node.tag_name().name() {
            "rule" => rule_table(node).map(str::to_string),
            "passthrough" => passthrough_table(node),
            _ => None,
        })
        .collect()
}

fn rule_table<'a>(rule: Node<'a, '_>) -> Option<&'a str> {
    let table = rule.attribute("table");
    if table.is_none() {
        warn!(
            "Skipping ebtables rule without table attribute: chain={:?}",
            rule.attribute("chain")
        );
    }
    table
}

fn passthrough_table(passthrough: Node<'_, '_>) -> Option<String> {
    // Comments may split the arguments into several text nodes.
    let args: String = passthrough
        .children()
        .filter(|node| node.is_text())
        .filter_map(|node| node.text())
        .collect();
    let table = table_argument(&args);
    if table.is_none() {
        warn!("Skipping ebtables passthrough without table argument: args={args:?}");
    }
    table.map(str::to_string)
}

/// Return the token following the first `-t` of a whitespace separated argument list.
fn table_argument(args: &str) -> Option<&str> {
    let mut tokens = args.split_whitespace();
    tokens.find(|token| *token == TABLE_OPTION)?;
    tokens.next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;
    use std::collections::HashSet;

    fn tables(xml: &str) -> Vec<String> {
        let doc = Document::parse(xml).unwrap();
        extract_ebtables_tables(doc.root_element())
    }

    #[test]
    fn test_passthrough() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
           <direct>
             <passthrough ipv="eb">-t broute -I BROUTING 1 -j ACCEPT</passthrough>
           </direct>"#;
        assert_eq!(tables(xml), vec!["broute"]);
    }

    #[test]
    fn test_rule() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
           <direct>
             <rule priority="1" table="broute" ipv="eb" chain="BROUTING">-j ACCEPT</rule>
           </direct>"#;
        assert_eq!(tables(xml), vec!["broute"]);
    }

    #[test]
    fn test_mixed_entries_ignore_other_families() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
           <direct>
             <rule priority="1" table="broute" ipv="eb" chain="BROUTING">-j ACCEPT</rule>
             <rule priority="1" table="filter" ipv="ipv4" chain="INPUT">-j ACCEPT</rule>
             <passthrough ipv="eb">-t nat -I PREROUTING 1 -j ACCEPT</passthrough>
           </direct>"#;
        let found: HashSet<String> = tables(xml).into_iter().collect();
        assert_eq!(found, HashSet::from(["broute".to_string(), "nat".to_string()]));
    }

    #[test]
    fn test_document_order_and_duplicates() {
        let xml = r#"<direct>
             <passthrough ipv="eb">-t nat -A POSTROUTING -j ACCEPT</passthrough>
             <rule priority="0" table="broute" ipv="eb" chain="BROUTING">-j ACCEPT</rule>
             <rule priority="1" table="nat" ipv="eb" chain="PREROUTING">-j ACCEPT</rule>
           </direct>"#;
        assert_eq!(tables(xml), vec!["nat", "broute", "nat"]);
    }

    #[test]
    fn test_ipv6_passthrough_ignored() {
        let xml = r#"<direct>
             <passthrough ipv="ipv6">-t mangle -I PREROUTING -j ACCEPT</passthrough>
           </direct>"#;
        assert!(tables(xml).is_empty());
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let xml = r#"<direct>
             <rule priority="0" ipv="eb" chain="BROUTING">-j ACCEPT</rule>
             <passthrough ipv="eb">-I FORWARD -j ACCEPT</passthrough>
             <passthrough ipv="eb">-I FORWARD -j ACCEPT -t</passthrough>
             <passthrough ipv="eb"/>
             <passthrough ipv="eb">-t filter -I FORWARD -j DROP</passthrough>
           </direct>"#;
        assert_eq!(tables(xml), vec!["filter"]);
    }

    #[test]
    fn test_passthrough_with_comments() {
        let xml = r#"<direct>
             <passthrough ipv="eb"><!-- bridge bypass -->-t broute -I BROUTING 1 -j ACCEPT</passthrough>
             <passthrough ipv="eb">-t<!-- table --> nat -I PREROUTING -j ACCEPT</passthrough>
           </direct>"#;
        assert_eq!(tables(xml), vec!["broute", "nat"]);
    }

    #[test]
    fn test_first_table_option_wins() {
        let xml = r#"<direct>
             <passthrough ipv="eb">-t nat -t broute -I PREROUTING -j ACCEPT</passthrough>
           </direct>"#;
        assert_eq!(tables(xml), vec!["nat"]);
    }

    #[test]
    fn test_table_argument() {
        assert_eq!(table_argument("  -t\tbroute\n-I BROUTING"), Some("broute"));
        assert_eq!(table_argument("-I BROUTING"), None);
        assert_eq!(table_argument(""), None);
        assert_eq!(table_argument("--table broute"), None);
    }
}
