//! Output formatting for scan plans and install reports.
//!
//! Both the `list` subcommand and the summary printed after an install run
//! come in a human-readable and a JSON flavour.

use std::fmt::Display;
use std::io::Write;

use serde::Serialize;

use crate::installer::InstallReport;
use crate::scanner::{ScanResult, SkippedArchive};

/// Write one line to `out`, ignoring write failures.
///
/// Progress output is best-effort; a closed pipe must not abort a batch
/// halfway through.
pub fn write_line(out: &mut dyn Write, message: impl Display) {
    if writeln!(out, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Format a scan result for human-readable output.
///
/// # Examples
///
/// ```
/// use jar_installer::report::format_plan_human;
/// use jar_installer::scanner::ScanResult;
///
/// let output = format_plan_human(&ScanResult::default());
/// assert!(output.contains("No archives found"));
/// ```
#[must_use]
pub fn format_plan_human(scan: &ScanResult) -> String {
    if scan.is_empty() {
        return String::from("No archives found.");
    }

    let mut output = format!("Archives to install ({}):\n", scan.archives.len());
    for archive in &scan.archives {
        output.push_str(&format!("  {}  ({})\n", archive.coordinates(), archive.file_name));
    }
    push_skipped(&mut output, &scan.skipped);
    output
}

/// Format a scan result as JSON.
#[must_use]
pub fn format_plan_json(scan: &ScanResult) -> String {
    let plan = PlanJson {
        archives: scan
            .archives
            .iter()
            .map(|archive| ArchiveEntry {
                group_id: archive.group_id.as_str().to_owned(),
                artifact_id: archive.name.artifact_id().to_owned(),
                version: archive.name.version().to_owned(),
                packaging: archive.packaging.clone(),
                path: archive.path().into_string(),
            })
            .collect(),
        skipped: skipped_entries(&scan.skipped),
    };
    to_json(&plan)
}

/// Format an install report for human-readable output.
///
/// # Examples
///
/// ```
/// use jar_installer::installer::InstallReport;
/// use jar_installer::report::format_report_human;
///
/// let report = InstallReport {
///     installed: vec!["g:a:1.0:jar".to_owned()],
///     ..InstallReport::default()
/// };
/// assert!(format_report_human(&report).contains("Installed 1 archive(s)"));
/// ```
#[must_use]
pub fn format_report_human(report: &InstallReport) -> String {
    let mut output = if report.planned.is_empty() {
        format!("Installed {} archive(s).\n", report.installed.len())
    } else {
        format!(
            "Dry run: {} archive(s) would be installed.\n",
            report.planned.len()
        )
    };

    if !report.failed.is_empty() {
        output.push_str(&format!("\nFailed ({}):\n", report.failed.len()));
        for failure in &report.failed {
            output.push_str(&format!("  {}: {}\n", failure.coordinates, failure.reason));
        }
    }

    push_skipped(&mut output, &report.skipped);
    output
}

/// Format an install report as JSON.
#[must_use]
pub fn format_report_json(report: &InstallReport) -> String {
    let json = ReportJson {
        installed: report.installed.clone(),
        planned: report.planned.clone(),
        failed: report
            .failed
            .iter()
            .map(|failure| FailedEntry {
                coordinates: failure.coordinates.clone(),
                reason: failure.reason.clone(),
            })
            .collect(),
        skipped: skipped_entries(&report.skipped),
    };
    to_json(&json)
}

fn push_skipped(output: &mut String, skipped: &[SkippedArchive]) {
    if skipped.is_empty() {
        return;
    }
    output.push_str(&format!("\nSkipped ({}):\n", skipped.len()));
    for entry in skipped {
        output.push_str(&format!("  {}: {}\n", entry.path, entry.reason));
    }
}

fn skipped_entries(skipped: &[SkippedArchive]) -> Vec<SkippedEntry> {
    skipped
        .iter()
        .map(|entry| SkippedEntry {
            path: entry.path.clone(),
            reason: entry.reason.to_string(),
        })
        .collect()
}

fn to_json<T: Serialize>(value: &T) -> String {
    // Use pretty printing for readability
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_owned())
}

/// JSON representation of a scan result.
#[derive(Debug, Serialize)]
pub struct PlanJson {
    /// Archives that would be installed.
    pub archives: Vec<ArchiveEntry>,
    /// Files that were skipped.
    pub skipped: Vec<SkippedEntry>,
}

/// JSON entry for an archive.
#[derive(Debug, Serialize)]
pub struct ArchiveEntry {
    /// Maven group id.
    pub group_id: String,
    /// Maven artifact id.
    pub artifact_id: String,
    /// Maven version.
    pub version: String,
    /// Maven packaging.
    pub packaging: String,
    /// Path to the archive.
    pub path: String,
}

/// JSON entry for a skipped file.
#[derive(Debug, Serialize)]
pub struct SkippedEntry {
    /// Path to the file.
    pub path: String,
    /// Why the file was skipped.
    pub reason: String,
}

/// JSON representation of an install report.
#[derive(Debug, Serialize)]
pub struct ReportJson {
    /// Coordinates installed.
    pub installed: Vec<String>,
    /// Coordinates planned in a dry run.
    pub planned: Vec<String>,
    /// Failed installs.
    pub failed: Vec<FailedEntry>,
    /// Skipped files.
    pub skipped: Vec<SkippedEntry>,
}

/// JSON entry for a failed install.
#[derive(Debug, Serialize)]
pub struct FailedEntry {
    /// Coordinates of the archive.
    pub coordinates: String,
    /// Failure reason.
    pub reason: String,
}
