//! Shared test utilities for the installer crate.

use crate::command::CommandExecutor;
use crate::error::{InstallerError, Result};
use camino::Utf8Path;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::process::{ExitStatus, Output};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a successful command `Output` with empty stdout and stderr.
pub fn success_output() -> Output {
    Output {
        status: exit_status(0),
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The program to execute (e.g., "mvn").
    pub program: &'static str,
    /// The `-Dfile=` value the invocation must carry.
    pub file: String,
    /// The result to return when this command is invoked.
    pub result: Result<Output>,
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Records expected command invocations and returns predefined results,
/// allowing tests to verify command execution without side effects. Calls
/// are matched in order on the program and the archive file argument.
#[derive(Debug)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<ExpectedCall>>,
    working_dirs: RefCell<Vec<String>>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
            working_dirs: RefCell::new(Vec::new()),
        }
    }

    /// Working directories of the invocations received so far.
    pub fn working_dirs(&self) -> Vec<String> {
        self.working_dirs.borrow().clone()
    }

    /// Asserts that all expected command invocations have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining expected calls that were not invoked.
    pub fn assert_finished(&self) {
        assert!(
            self.expected.borrow().is_empty(),
            "expected no further command invocations"
        );
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, program: &str, args: &[String], working_dir: &Utf8Path) -> Result<Output> {
        let mut expected = self.expected.borrow_mut();
        let Some(call) = expected.pop_front() else {
            return Err(InstallerError::StubMismatch {
                message: format!("unexpected invocation of {program} {}", args.join(" ")),
            });
        };

        let file_arg = format!("-Dfile={}", call.file);
        if call.program != program || !args.contains(&file_arg) {
            return Err(InstallerError::StubMismatch {
                message: format!(
                    "expected {} with {file_arg}, got {program} {}",
                    call.program,
                    args.join(" ")
                ),
            });
        }

        self.working_dirs.borrow_mut().push(working_dir.to_string());
        call.result
    }
}
