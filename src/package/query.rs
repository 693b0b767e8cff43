// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Errors and process helpers for querying the installed RPM database.

use std::io::Read;
use std::os::unix::process::ExitStatusExt;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;
use thiserror::Error;
use wait_timeout::ChildExt;

/// Default timeout for the package database query (30 seconds).
pub(crate) const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Name/architecture pair per line, as consumed by `InstalledPackages::parse`.
pub(crate) const RPM_QUERY_FORMAT: &str = "%{NAME} %{ARCH}\\n";

/// Result type for package operations.
pub type PackageResult<T> = std::result::Result<T, PackageError>;

/// Errors that can occur while building the installed package inventory.
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("Failed to read package list: {path:?}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed package entry in {path:?} at line {line}: {content:?}")]
    MalformedEntry {
        path: PathBuf,
        line: usize,
        content: String,
    },
    #[error("Command not found: {command}")]
    CommandNotFound { command: String },
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Command timed out after {timeout:?}: {command}")]
    CommandTimeout { command: String, timeout: Duration },
    #[error("Package query failed: {command}: {reason}")]
    QueryFailed { command: String, reason: String },
}

/// Wait for a child process to complete with a timeout.
///
/// If the timeout is reached, the process is killed.
///
/// # Returns
/// - `Ok(ExitStatus)` if the process completed within the timeout
/// - `Err(PackageError::CommandTimeout)` if the process timed out
/// - `Err(PackageError::CommandFailed)` if there was an error waiting for the process
pub(crate) fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
    command: &str,
) -> PackageResult<ExitStatus> {
    let status = child
        .wait_timeout(timeout)
        .map_err(|e| PackageError::CommandFailed {
            command: command.to_string(),
            source: e,
        })?;
    match status {
        Some(status) if status.code().is_some() => Ok(status),
        Some(status) => {
            let reason = status.signal().map_or_else(
                || "Unknown process termination".to_string(),
                |signal| format!("Process terminated by signal: {signal}"),
            );
            Err(PackageError::CommandFailed {
                command: command.to_string(),
                source: std::io::Error::other(reason),
            })
        }
        None => {
            let _ = child.kill();
            let _ = child.wait();
            Err(PackageError::CommandTimeout {
                command: command.to_string(),
                timeout,
            })
        }
    }
}

/// Run `rpm -qa` and return its standard output.
///
/// Stdout is drained on a separate thread so a large package list cannot fill the pipe
/// and stall the child while we wait on it.
///
/// # Errors
/// Returns an error if `rpm` is missing, fails, exits non-zero or exceeds `timeout`.
pub(crate) fn query_rpm_database(timeout: Duration) -> PackageResult<String> {
    const COMMAND: &str = "rpm";

    let mut child = match Command::new(COMMAND)
        .arg("-qa")
        .arg("--queryformat")
        .arg(RPM_QUERY_FORMAT)
        .stdout(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(PackageError::CommandNotFound {
                command: COMMAND.to_string(),
            });
        }
        Err(e) => {
            return Err(PackageError::CommandFailed {
                command: COMMAND.to_string(),
                source: e,
            });
        }
    };

    let Some(mut stdout) = child.stdout.take() else {
        let _ = child.kill();
        let _ = child.wait();
        return Err(PackageError::QueryFailed {
            command: COMMAND.to_string(),
            reason: "Failed to get stdout from rpm".to_string(),
        });
    };
    let reader = thread::spawn(move || {
        let mut output = String::new();
        stdout.read_to_string(&mut output).map(|_| output)
    });

    let status = wait_with_timeout(&mut child, timeout, COMMAND)?;
    let output = reader
        .join()
        .map_err(|_| PackageError::QueryFailed {
            command: COMMAND.to_string(),
            reason: "stdout reader thread panicked".to_string(),
        })?
        .map_err(|e| PackageError::CommandFailed {
            command: COMMAND.to_string(),
            source: e,
        })?;

    if status.success() {
        Ok(output)
    } else {
        Err(PackageError::QueryFailed {
            command: COMMAND.to_string(),
            reason: format!(
                "exited with non-zero status: {}",
                status.code().unwrap_or(-1)
            ),
        })
    }
}
