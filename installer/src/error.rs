//! Error types for the jar installer.
//!
//! Variants carry enough context for the CLI to print an actionable message
//! without further decoration.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while scanning or installing archives.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The repository root does not exist or is not a directory.
    #[error("repository directory {path} not found; pass --repository or create it")]
    RepositoryNotFound {
        /// The path that was checked.
        path: Utf8PathBuf,
    },

    /// Listing the repository tree failed.
    #[error("failed to scan {path}")]
    ScanFailed {
        /// The directory being read.
        path: Utf8PathBuf,
        /// The underlying error that caused the scan to fail.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be read.
    #[error("failed to read config file {path}")]
    ConfigRead {
        /// Path to the config file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be parsed.
    #[error("invalid config file {path}: {reason}")]
    InvalidConfig {
        /// Path to the config file.
        path: Utf8PathBuf,
        /// Description of the parse error.
        reason: String,
    },

    /// The install command failed for an archive.
    #[error("install failed for {coordinates}: {reason}")]
    InstallFailed {
        /// Coordinates of the archive being installed.
        coordinates: String,
        /// Description of the failure.
        reason: String,
    },

    /// One or more archives failed during a batch that was allowed to
    /// continue.
    #[error("{failed} of {attempted} archive(s) failed to install")]
    BatchIncomplete {
        /// Number of failed installs.
        failed: usize,
        /// Number of attempted installs.
        attempted: usize,
    },

    /// Failed to write output.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Test stub received an unexpected or mismatched command invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_not_found_suggests_flag() {
        let err = InstallerError::RepositoryNotFound {
            path: Utf8PathBuf::from("maven-repos"),
        };
        let msg = err.to_string();
        assert!(msg.contains("maven-repos"));
        assert!(msg.contains("--repository"));
    }

    #[test]
    fn install_failed_includes_coordinates_and_reason() {
        let err = InstallerError::InstallFailed {
            coordinates: "org.example:core:1.0:jar".to_owned(),
            reason: "BUILD FAILURE".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("org.example:core:1.0:jar"));
        assert!(msg.contains("BUILD FAILURE"));
    }

    #[test]
    fn scan_failed_preserves_source() {
        let err = InstallerError::ScanFailed {
            path: Utf8PathBuf::from("/repo"),
            source: std::io::Error::other("permission denied"),
        };
        assert!(err.to_string().contains("/repo"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn batch_incomplete_counts_failures() {
        let err = InstallerError::BatchIncomplete {
            failed: 2,
            attempted: 5,
        };
        assert_eq!(err.to_string(), "2 of 5 archive(s) failed to install");
    }
}
