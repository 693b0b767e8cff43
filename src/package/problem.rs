// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Catalog of 32-bit packages known to break the upgrade when installed next to their
//! 64-bit counterpart.

/// A known problematic package and its remediation metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProblemPackage {
    /// Package in `name.arch` form.
    pub package: &'static str,
    /// Bug tracker entry describing the incompatibility, if one exists.
    pub bugzilla: Option<&'static str>,
}

impl ProblemPackage {
    /// Split `name.arch` on the last dot.
    ///
    /// Returns `None` if the entry has no architecture suffix.
    #[must_use]
    pub fn name_and_arch(&self) -> Option<(&'static str, &'static str)> {
        self.package
            .rsplit_once('.')
            .filter(|(name, arch)| !name.is_empty() && !arch.is_empty())
    }
}

pub const PROBLEM_PACKAGES: &[ProblemPackage] = &[
    ProblemPackage {
        package: "brlapi.i686",
        bugzilla: None,
    },
    ProblemPackage {
        package: "gnome-online-accounts-devel.i686",
        bugzilla: Some("https://bugzilla.redhat.com/show_bug.cgi?id=1765627"),
    },
    ProblemPackage {
        package: "geocode-glib-devel.i686",
        bugzilla: Some("https://bugzilla.redhat.com/show_bug.cgi?id=1765629"),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_entries_are_well_formed() {
        for entry in PROBLEM_PACKAGES {
            let (name, arch) = entry
                .name_and_arch()
                .unwrap_or_else(|| panic!("{} has no arch suffix", entry.package));
            assert!(!name.contains(char::is_whitespace));
            assert_eq!(arch, "i686", "{} is not a 32bit package", entry.package);
        }
    }

    #[test]
    fn test_name_and_arch_splits_on_last_dot() {
        let entry = ProblemPackage {
            package: "python3.6-devel.i686",
            bugzilla: None,
        };
        assert_eq!(entry.name_and_arch(), Some(("python3.6-devel", "i686")));
    }

    #[test]
    fn test_name_and_arch_rejects_missing_arch() {
        for package in ["brlapi", "brlapi.", ".i686"] {
            let entry = ProblemPackage {
                package,
                bugzilla: None,
            };
            assert_eq!(entry.name_and_arch(), None, "{package}");
        }
    }
}
