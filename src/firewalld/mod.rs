// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Collects facts about the firewalld configuration from its XML files.

mod direct;
mod ipset;
mod whitelist;

pub use direct::extract_ebtables_tables;
pub use ipset::extract_ipset_types;
pub use whitelist::extract_lockdown_command;

use roxmltree::{Document, Node, ParsingOptions};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Default firewalld configuration directory.
pub const DEFAULT_CONFIG_DIR: &str = "/etc/firewalld";

pub(crate) const DIRECT_FILE: &str = "direct.xml";
pub(crate) const LOCKDOWN_WHITELIST_FILE: &str = "lockdown-whitelist.xml";
pub(crate) const IPSETS_DIR: &str = "ipsets";

/// Result type for firewalld fact collection.
pub type FirewalldResult<T> = std::result::Result<T, FirewalldError>;

/// Errors that can occur while reading the firewalld configuration.
#[derive(Debug, Error)]
pub enum FirewalldError {
    #[error("Failed to read firewalld configuration: {path:?}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse firewalld configuration: {path:?}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },
    #[error("Failed to walk firewalld ipsets directory: {path:?}")]
    WalkDirFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Facts about the firewalld configuration relevant to the upgrade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirewalldFacts {
    /// Directory the facts were collected from.
    #[serde(skip)]
    pub config_dir: PathBuf,
    /// Lockdown whitelist command line running `firewall-config`, empty if none.
    pub firewall_config_command: String,
    /// Ebtables tables referenced by direct rules and passthroughs.
    pub ebtables_tables_in_use: Vec<String>,
    /// Types of all configured ipsets, sorted and deduplicated.
    pub ipset_types_in_use: Vec<String>,
}

impl Default for FirewalldFacts {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            firewall_config_command: String::new(),
            ebtables_tables_in_use: Vec::new(),
            ipset_types_in_use: Vec::new(),
        }
    }
}

impl FirewalldFacts {
    /// Collect facts from a firewalld configuration directory.
    ///
    /// Missing files mean the feature is not configured and leave the fact empty.
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be read or is not valid XML.
    pub fn collect<P: AsRef<Path>>(config_dir: P) -> FirewalldResult<Self> {
        let config_dir = config_dir.as_ref();
        let mut facts = Self {
            config_dir: config_dir.to_path_buf(),
            ..Self::default()
        };

        let whitelist = config_dir.join(LOCKDOWN_WHITELIST_FILE);
        if let Some(content) = read_optional(&whitelist)? {
            facts.firewall_config_command =
                with_root(&content, &whitelist, extract_lockdown_command)?;
        }

        let direct = config_dir.join(DIRECT_FILE);
        if let Some(content) = read_optional(&direct)? {
            facts.ebtables_tables_in_use = with_root(&content, &direct, extract_ebtables_tables)?;
        }

        facts.ipset_types_in_use = collect_ipset_types(&config_dir.join(IPSETS_DIR))?;

        debug!(
            "Collected firewalld facts: dir={}, firewall_config_command={:?}, ebtables_tables={:?}, ipset_types={:?}",
            config_dir.display(),
            facts.firewall_config_command,
            facts.ebtables_tables_in_use,
            facts.ipset_types_in_use
        );
        Ok(facts)
    }
}

/// Read a file, treating a missing file as absent.
fn read_optional(path: &Path) -> FirewalldResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Firewalld file not present: file={}", path.display());
            Ok(None)
        }
        Err(e) => Err(FirewalldError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Parse `content` and hand its root element to `extract`.
fn with_root<T>(
    content: &str,
    path: &Path,
    extract: impl FnOnce(Node<'_, '_>) -> T,
) -> FirewalldResult<T> {
    // Hand-edited files may carry a DOCTYPE line; entities are still limited by roxmltree.
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document =
        Document::parse_with_options(content, options).map_err(|e| FirewalldError::ParseFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(extract(document.root_element()))
}

fn collect_ipset_types(ipsets_dir: &Path) -> FirewalldResult<Vec<String>> {
    if !ipsets_dir.is_dir() {
        debug!("Firewalld ipsets directory not present: dir={}", ipsets_dir.display());
        return Ok(Vec::new());
    }

    let mut types = BTreeSet::new();
    for entry in WalkDir::new(ipsets_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| FirewalldError::WalkDirFailed {
            path: ipsets_dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "xml") {
            continue;
        }
        let Some(content) = read_optional(path)? else {
            continue;
        };
        types.extend(with_root(&content, path, extract_ipset_types)?);
    }
    Ok(types.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const WHITELIST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<whitelist>
  <command name="/usr/bin/python -Es /usr/bin/firewall-config"/>
  <user id="0"/>
</whitelist>"#;

    const DIRECT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<direct>
  <rule priority="1" table="broute" ipv="eb" chain="BROUTING">-j ACCEPT</rule>
  <passthrough ipv="eb">-t nat -I PREROUTING 1 -j ACCEPT</passthrough>
</direct>"#;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_collect_missing_directory() {
        let facts = FirewalldFacts::collect("/nonexistent/firewalld").unwrap();
        assert_eq!(facts.config_dir, PathBuf::from("/nonexistent/firewalld"));
        assert_eq!(
            facts,
            FirewalldFacts {
                config_dir: PathBuf::from("/nonexistent/firewalld"),
                ..FirewalldFacts::default()
            }
        );
    }

    #[test]
    fn test_collect_all_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), LOCKDOWN_WHITELIST_FILE, WHITELIST);
        write(dir.path(), DIRECT_FILE, DIRECT);
        write(dir.path(), "ipsets/b.xml", r#"<ipset type="hash:net,port"/>"#);
        write(dir.path(), "ipsets/a.xml", r#"<ipset type="hash:ip"><entry>1.2.3.4</entry></ipset>"#);
        write(dir.path(), "ipsets/c.xml", r#"<ipset type="hash:ip"/>"#);

        let facts = FirewalldFacts::collect(dir.path()).unwrap();
        assert_eq!(
            facts.firewall_config_command,
            "/usr/bin/python -Es /usr/bin/firewall-config"
        );
        assert_eq!(facts.ebtables_tables_in_use, vec!["broute", "nat"]);
        assert_eq!(facts.ipset_types_in_use, vec!["hash:ip", "hash:net,port"]);
    }

    #[test]
    fn test_collect_partial_configuration() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), DIRECT_FILE, DIRECT);

        let facts = FirewalldFacts::collect(dir.path()).unwrap();
        assert_eq!(facts.firewall_config_command, "");
        assert_eq!(facts.ebtables_tables_in_use, vec!["broute", "nat"]);
        assert!(facts.ipset_types_in_use.is_empty());
    }

    #[test]
    fn test_collect_ignores_non_xml_ipset_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "ipsets/blocked.xml", r#"<ipset type="hash:mac"/>"#);
        write(dir.path(), "ipsets/blocked.xml.old", "not xml at all");
        write(dir.path(), "ipsets/nested/deep.xml", r#"<ipset type="hash:ip"/>"#);

        let facts = FirewalldFacts::collect(dir.path()).unwrap();
        assert_eq!(facts.ipset_types_in_use, vec!["hash:mac"]);
    }

    #[test]
    fn test_collect_invalid_xml() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), DIRECT_FILE, "<direct><rule></direct>");

        let err = FirewalldFacts::collect(dir.path()).unwrap_err();
        match err {
            FirewalldError::ParseFailed { path, .. } => assert!(path.ends_with(DIRECT_FILE)),
            other => panic!("Expected ParseFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_collect_unreadable_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(DIRECT_FILE)).unwrap();

        let err = FirewalldFacts::collect(dir.path()).unwrap_err();
        match err {
            FirewalldError::ReadFailed { path, .. } => assert!(path.ends_with(DIRECT_FILE)),
            other => panic!("Expected ReadFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_collect_skips_ipset_directories() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "ipsets/ok.xml", r#"<ipset type="hash:ip"/>"#);
        fs::create_dir(dir.path().join("ipsets/broken.xml")).unwrap();

        let facts = FirewalldFacts::collect(dir.path()).unwrap();
        assert_eq!(facts.ipset_types_in_use, vec!["hash:ip"]);
    }

    #[test]
    fn test_collect_accepts_doctype() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            DIRECT_FILE,
            r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE direct>
<direct>
  <passthrough ipv="eb">-t broute -I BROUTING 1 -j ACCEPT</passthrough>
</direct>"#,
        );

        let facts = FirewalldFacts::collect(dir.path()).unwrap();
        assert_eq!(facts.ebtables_tables_in_use, vec!["broute"]);
    }

    #[test]
    fn test_facts_json_shape() {
        let facts = FirewalldFacts {
            ebtables_tables_in_use: vec!["broute".to_string()],
            ..FirewalldFacts::default()
        };
        let json = serde_json::to_value(&facts).unwrap();
        assert!(json.get("config_dir").is_none());
        assert_eq!(json["firewall_config_command"], "");
        assert_eq!(json["ebtables_tables_in_use"], serde_json::json!(["broute"]));
        assert_eq!(json["ipset_types_in_use"], serde_json::json!([]));
    }
}
