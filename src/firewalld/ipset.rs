// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Reads ipset types from firewalld ipset definitions (`ipsets/*.xml`).

use roxmltree::Node;
use tracing::warn;

/// Return the `type` of every `<ipset>` element in document order, starting with the
/// given node itself.
#[must_use]
pub fn extract_ipset_types(ipset: Node<'_, '_>) -> Vec<String> {
    ipset
        .descendants()
        .filter(|node| node.has_tag_name("ipset"))
        .filter_map(|node| {
            let ipset_type = node.attribute("type");
            if ipset_type.is_none() {
                warn!("Skipping ipset without type attribute");
            }
            ipset_type
        })
        .map(str::to_string)
        .collect()
}
