// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Finds the `firewall-config` entry in the firewalld lockdown whitelist
//! (`lockdown-whitelist.xml`).

use roxmltree::Node;
use std::path::Path;
use tracing::warn;

const FIREWALL_CONFIG: &str = "firewall-config";

/// Return the first whitelisted command line that runs `firewall-config`.
///
/// A command matches when the file name of its last argument is `firewall-config`, so
/// the interpreter in front of it does not matter. Returns an empty string if no
/// command matches.
#[must_use]
pub fn extract_lockdown_command(whitelist: Node<'_, '_>) -> String {
    whitelist
        .children()
        .filter(|node| node.has_tag_name("command"))
        .filter_map(|command| {
            let name = command.attribute("name");
            if name.is_none() {
                warn!("Skipping lockdown whitelist command without name attribute");
            }
            name
        })
        .find(|name| runs_firewall_config(name))
        .map(str::to_string)
        .unwrap_or_default()
}

fn runs_firewall_config(command_line: &str) -> bool {
    command_line
        .split_whitespace()
        .last()
        .and_then(|program| Path::new(program).file_name())
        .is_some_and(|file_name| file_name == FIREWALL_CONFIG)
}
