// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Installed package inventory and the lookup capability the checks consume.

mod problem;
mod query;

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub use problem::{ProblemPackage, PROBLEM_PACKAGES};
pub use query::{PackageError, PackageResult};
use query::{query_rpm_database, DEFAULT_QUERY_TIMEOUT};

/// The 64-bit architecture every multilib conflict is checked against.
pub const ARCH_X86_64: &str = "x86_64";

/// Answers whether a package is installed in a given architecture.
pub trait PackageLookup {
    fn has_package(&self, name: &str, arch: &str) -> bool;
}

impl<F> PackageLookup for F
where
    F: Fn(&str, &str) -> bool,
{
    fn has_package(&self, name: &str, arch: &str) -> bool {
        self(name, arch)
    }
}

/// A single installed package, identified by name and architecture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstalledPackage {
    pub name: String,
    pub arch: String,
}

impl InstalledPackage {
    pub fn new(name: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arch: arch.into(),
        }
    }
}

/// Set of installed packages, indexed by name.
#[derive(Debug, Default)]
pub struct InstalledPackages {
    packages: HashMap<String, HashSet<String>>,
}

impl InstalledPackages {
    /// Create an empty inventory.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read the inventory from a file with one `name arch` pair per line.
    ///
    /// Lines are trimmed. Empty lines and lines starting with `#` are ignored.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or a line is not a `name arch` pair.
    pub fn from_file<P: AsRef<Path>>(path: P) -> PackageResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| PackageError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content, path)
    }

    /// Query the RPM database of the running system.
    ///
    /// # Errors
    /// Returns an error if `rpm` cannot be run or its output cannot be parsed.
    pub fn from_rpm_database() -> PackageResult<Self> {
        Self::from_rpm_database_with_timeout(DEFAULT_QUERY_TIMEOUT)
    }

    /// Same as [`Self::from_rpm_database`] with an explicit timeout.
    ///
    /// # Errors
    /// Returns an error if `rpm` cannot be run, times out, or its output cannot be parsed.
    pub fn from_rpm_database_with_timeout(timeout: Duration) -> PackageResult<Self> {
        let output = query_rpm_database(timeout)?;
        Self::parse(&output, Path::new("rpm -qa"))
    }

    fn parse(content: &str, source: &Path) -> PackageResult<Self> {
        let mut packages = Self::default();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next(), fields.next()) {
                (Some(name), Some(arch), None) => {
                    packages.insert(InstalledPackage::new(name, arch));
                }
                _ => {
                    return Err(PackageError::MalformedEntry {
                        path: source.to_path_buf(),
                        line: index + 1,
                        content: line.to_string(),
                    })
                }
            }
        }
        debug!(
            "Loaded installed packages: source={}, packages={}",
            source.display(),
            packages.len()
        );
        Ok(packages)
    }

    pub fn insert(&mut self, package: InstalledPackage) {
        self.packages
            .entry(package.name)
            .or_default()
            .insert(package.arch);
    }

    /// Number of installed name/architecture pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.values().map(HashSet::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl FromIterator<InstalledPackage> for InstalledPackages {
    fn from_iter<I: IntoIterator<Item = InstalledPackage>>(iter: I) -> Self {
        let mut packages = Self::default();
        for package in iter {
            packages.insert(package);
        }
        packages
    }
}

impl PackageLookup for InstalledPackages {
    fn has_package(&self, name: &str, arch: &str) -> bool {
        self.packages
            .get(name)
            .is_some_and(|arches| arches.contains(arch))
    }
}
