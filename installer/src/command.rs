//! External command execution.
//!
//! Installing an archive means running the package manager once per file.
//! The [`CommandExecutor`] trait is the seam between the installer and the
//! host so that batches can be exercised without spawning processes.

use crate::error::{InstallerError, Result};
use camino::Utf8Path;
use log::trace;
use std::process::{Command, Output, Stdio};

/// Abstraction for running external commands.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    /// Runs `program` with `args` inside `working_dir` and returns the
    /// captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the command.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use camino::Utf8Path;
    /// use jar_installer::command::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor;
    /// let output = executor.run("mvn", &["--version".to_owned()], Utf8Path::new("."))?;
    /// assert!(output.status.success());
    /// # Ok::<(), jar_installer::error::InstallerError>(())
    /// ```
    fn run(&self, program: &str, args: &[String], working_dir: &Utf8Path) -> Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, program: &str, args: &[String], working_dir: &Utf8Path) -> Result<Output> {
        trace!("running {program} {} in {working_dir}", args.join(" "));
        Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .output()
            .map_err(InstallerError::from)
    }
}

/// Returns the trimmed stderr of a failed command, falling back to stdout
/// and then to the exit status when stderr is empty.
///
/// Maven reports build failures on stdout, so stderr alone is often blank.
#[must_use]
pub fn failure_reason(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_owned();
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .rev()
        .find(|line| line.contains("ERROR"))
        .map(|line| line.trim().to_owned())
        .unwrap_or_else(|| format!("exited with {}", output.status))
}
