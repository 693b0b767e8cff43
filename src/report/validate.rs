// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Fails the run when any report inhibits the upgrade.

use super::Reports;
use anyhow::Result;
use tracing::error;

/// Validate the reports.
///
/// # Errors
/// Returns an error if at least one report carries the inhibitor flag.
pub fn validate_reports(reports: &Reports) -> Result<()> {
    let mut inhibitors = 0;
    for report in reports.inhibitors() {
        error!("Upgrade inhibited: title={:?}", report.title());
        inhibitors += 1;
    }
    if inhibitors > 0 {
        return Err(anyhow::anyhow!(
            "Upgrade inhibited by {inhibitors} report(s)"
        ));
    }
    Ok(())
}
