//! Batch installation of scanned archives.
//!
//! Archives are installed one at a time in scan order. A failing archive is
//! recorded and the batch moves on, unless fail-fast mode is enabled.

use std::io::Write;

use log::{info, warn};

use crate::command::{CommandExecutor, failure_reason};
use crate::config::InstallSettings;
use crate::error::{InstallerError, Result};
use crate::install_command::InstallCommand;
use crate::report::write_line;
use crate::scanner::{Archive, ScanResult, SkippedArchive};

/// Switches controlling how a batch runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Print commands instead of running them.
    pub dry_run: bool,
    /// Stop at the first failed install.
    pub fail_fast: bool,
    /// Suppress progress lines and command output.
    pub quiet: bool,
}

/// An archive whose install command failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedInstall {
    /// Coordinates of the archive.
    pub coordinates: String,
    /// Why the install failed.
    pub reason: String,
}

/// Outcome of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Coordinates installed successfully.
    pub installed: Vec<String>,
    /// Coordinates that would have been installed in a dry run.
    pub planned: Vec<String>,
    /// Archives whose install command failed.
    pub failed: Vec<FailedInstall>,
    /// Files the scanner could not use.
    pub skipped: Vec<SkippedArchive>,
}

impl InstallReport {
    /// Returns true when no install failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of archives an install was attempted for.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.installed.len() + self.failed.len()
    }

    /// Convert a report with failures into [`InstallerError::BatchIncomplete`].
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::BatchIncomplete`] when any install failed.
    pub fn into_result(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(InstallerError::BatchIncomplete {
                failed: self.failed.len(),
                attempted: self.attempted(),
            })
        }
    }
}

/// Runs install commands for scanned archives.
pub struct Installer<'a> {
    executor: &'a dyn CommandExecutor,
    settings: &'a InstallSettings,
    options: BatchOptions,
}

impl<'a> Installer<'a> {
    /// Create an installer.
    #[must_use]
    pub fn new(
        executor: &'a dyn CommandExecutor,
        settings: &'a InstallSettings,
        options: BatchOptions,
    ) -> Self {
        Self {
            executor,
            settings,
            options,
        }
    }

    /// Install every archive in `scan`, writing progress to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::InstallFailed`] for the first failure when
    /// fail-fast mode is enabled. Otherwise failures are collected in the
    /// returned report.
    pub fn install_all(&self, scan: &ScanResult, out: &mut dyn Write) -> Result<InstallReport> {
        let mut report = InstallReport {
            skipped: scan.skipped.clone(),
            ..InstallReport::default()
        };

        for archive in &scan.archives {
            let coordinates = archive.coordinates();

            if self.options.dry_run {
                let command = InstallCommand::for_archive(archive, self.settings);
                write_line(out, format!("[{}] {}", archive.group_dir, command.display_line()));
                report.planned.push(coordinates);
                continue;
            }

            if !self.options.quiet {
                write_line(out, format!("Installing {coordinates}..."));
            }

            match self.install_one(archive, &coordinates, out) {
                Ok(()) => {
                    info!("installed {coordinates}");
                    report.installed.push(coordinates);
                }
                Err(err) if self.options.fail_fast => return Err(err),
                Err(err) => {
                    warn!("{err}");
                    let reason = match err {
                        InstallerError::InstallFailed { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    report.failed.push(FailedInstall {
                        coordinates,
                        reason,
                    });
                }
            }
        }

        Ok(report)
    }

    fn install_one(&self, archive: &Archive, coordinates: &str, out: &mut dyn Write) -> Result<()> {
        let command = InstallCommand::for_archive(archive, self.settings);
        let install_failed = |reason: String| InstallerError::InstallFailed {
            coordinates: coordinates.to_owned(),
            reason,
        };

        let output = self
            .executor
            .run(&command.program, &command.args, &archive.group_dir)
            .map_err(|e| install_failed(format!("could not run {}: {e}", command.program)))?;

        if !self.options.quiet {
            echo_output(out, &output.stdout);
            echo_output(out, &output.stderr);
        }

        if output.status.success() {
            Ok(())
        } else {
            Err(install_failed(failure_reason(&output)))
        }
    }
}

fn echo_output(out: &mut dyn Write, bytes: &[u8]) {
    for line in String::from_utf8_lossy(bytes).lines() {
        write_line(out, line);
    }
}
