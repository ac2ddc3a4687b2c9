//! Jar installer CLI entrypoint.
//!
//! This binary scans a repository directory for archives and registers each
//! one in the local Maven repository, printing Maven's output as it goes.

use camino::Utf8Path;
use clap::Parser;
use jar_installer::cli::{Cli, Command, InstallArgs, ListArgs, ScanArgs};
use jar_installer::command::{CommandExecutor, SystemCommandExecutor};
use jar_installer::config::{InstallSettings, SettingsOverrides};
use jar_installer::error::{InstallerError, Result};
use jar_installer::installer::Installer;
use jar_installer::report::{
    format_plan_human, format_plan_json, format_report_human, format_report_json, write_line,
};
use jar_installer::scanner::{ScanResult, scan_repository};
use log::info;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &SystemCommandExecutor, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Initialise `env_logger` at `level`; `RUST_LOG` takes precedence.
fn init_logging(level: log::LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

fn run(
    cli: &Cli,
    executor: &dyn CommandExecutor,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    match &cli.command {
        Some(Command::List(args)) => run_list(args, stdout),
        Some(Command::Install(args)) => run_install(args, executor, stdout, stderr),
        None => run_install(&cli.install, executor, stdout, stderr),
    }
}

/// Scans the repository and prints what would be installed.
fn run_list(args: &ListArgs, stdout: &mut dyn Write) -> Result<()> {
    let (_, scan) = load_and_scan(&args.scan, &args.overrides())?;

    let output = if args.scan.json {
        format_plan_json(&scan)
    } else {
        format_plan_human(&scan)
    };

    writeln!(stdout, "{output}").map_err(|e| InstallerError::WriteFailed { source: e })
}

/// Scans the repository and installs every archive found.
fn run_install(
    args: &InstallArgs,
    executor: &dyn CommandExecutor,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    let quiet = args.quiet || args.scan.json;
    if !quiet {
        write_line(stderr, "Getting all the files...");
    }

    let (settings, scan) = load_and_scan(&args.scan, &args.overrides())?;

    if !quiet {
        write_line(
            stderr,
            format!(
                "Found {} archive(s) under {}",
                scan.archives.len(),
                args.scan.repository
            ),
        );
    }

    let options = jar_installer::installer::BatchOptions {
        quiet,
        ..args.batch_options()
    };
    // JSON output owns stdout, so dry-run command lines go to stderr.
    let progress: &mut dyn Write = if args.scan.json {
        &mut *stderr
    } else {
        &mut *stdout
    };
    let report = Installer::new(executor, &settings, options).install_all(&scan, progress)?;
    info!(
        "batch finished: {} installed, {} failed, {} skipped",
        report.installed.len(),
        report.failed.len(),
        report.skipped.len()
    );

    if args.scan.json {
        writeln!(stdout, "{}", format_report_json(&report))
            .map_err(|e| InstallerError::WriteFailed { source: e })?;
    } else if !args.quiet {
        write_line(stdout, "");
        write_line(stdout, format_report_human(&report));
    }

    report.into_result().map(|_| ())
}

fn load_and_scan(
    scan_args: &ScanArgs,
    overrides: &SettingsOverrides,
) -> Result<(InstallSettings, ScanResult)> {
    let root: &Utf8Path = &scan_args.repository;
    let settings = InstallSettings::load(scan_args.config.as_deref(), root, overrides)?;
    let scan = scan_repository(root, |ext| settings.accepts_extension(ext))?;
    Ok((settings, scan))
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_line(stderr, format!("error: {err}"));
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jar_installer::test_utils::{ExpectedCall, StubExecutor, failure_output, success_output};
    use rstest::{fixture, rstest};
    use std::fs;
    use tempfile::TempDir;

    struct TempRepo {
        _temp: TempDir,
        root: String,
    }

    #[fixture]
    fn repo() -> TempRepo {
        let temp = TempDir::new().expect("failed to create temp dir");
        let root = temp.path().to_str().expect("non-UTF8 temp path").to_owned();
        for (group, file) in [
            ("commons-io", "commons-io-2.11.0.jar"),
            ("org.example", "lib-core-1.2.3.jar"),
            ("org.example", "nodotversion.jar"),
        ] {
            let dir = temp.path().join(group);
            fs::create_dir_all(&dir).expect("failed to create group dir");
            fs::write(dir.join(file), b"PK").expect("failed to write archive");
        }
        TempRepo { _temp: temp, root }
    }

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let err = InstallerError::BatchIncomplete {
            failed: 1,
            attempted: 3,
        };
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err), &mut stderr);
        assert_eq!(exit_code, 1);
        let printed = String::from_utf8(stderr).expect("utf8 stderr");
        assert!(printed.contains("1 of 3 archive(s) failed to install"));
    }

    #[rstest]
    fn install_runs_maven_for_each_archive(repo: TempRepo) {
        let cli = Cli::parse_from(["jar-installer", "-r", repo.root.as_str(), "--maven", "mvn"]);
        let executor = StubExecutor::new(vec![
            ExpectedCall {
                program: "mvn",
                file: "commons-io-2.11.0.jar".to_owned(),
                result: Ok(success_output()),
            },
            ExpectedCall {
                program: "mvn",
                file: "lib-core-1.2.3.jar".to_owned(),
                result: Ok(success_output()),
            },
        ]);
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        run(&cli, &executor, &mut stdout, &mut stderr).expect("install should succeed");

        executor.assert_finished();
        let printed = String::from_utf8(stdout).expect("utf8 stdout");
        assert!(printed.contains("Installed 2 archive(s)."));
        assert!(printed.contains("nodotversion.jar"));
    }

    #[rstest]
    fn install_reports_failures_as_error(repo: TempRepo) {
        let cli = Cli::parse_from(["jar-installer", "-r", repo.root.as_str(), "--maven", "mvn", "-q"]);
        let executor = StubExecutor::new(vec![
            ExpectedCall {
                program: "mvn",
                file: "commons-io-2.11.0.jar".to_owned(),
                result: Ok(failure_output("BUILD FAILURE")),
            },
            ExpectedCall {
                program: "mvn",
                file: "lib-core-1.2.3.jar".to_owned(),
                result: Ok(success_output()),
            },
        ]);
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        let err = run(&cli, &executor, &mut stdout, &mut stderr).expect_err("batch should fail");

        assert!(matches!(
            err,
            InstallerError::BatchIncomplete {
                failed: 1,
                attempted: 2
            }
        ));
        assert!(stdout.is_empty());
    }

    #[rstest]
    fn list_prints_json_plan(repo: TempRepo) {
        let cli = Cli::parse_from(["jar-installer", "list", "--json", "-r", repo.root.as_str()]);
        let executor = StubExecutor::new(Vec::new());
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        run(&cli, &executor, &mut stdout, &mut stderr).expect("list should succeed");

        let value: serde_json::Value =
            serde_json::from_slice(&stdout).expect("list output should be JSON");
        assert_eq!(value["archives"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["archives"][1]["artifact_id"], "lib-core");
        assert_eq!(value["skipped"].as_array().map(Vec::len), Some(1));
    }

    #[rstest]
    fn dry_run_json_keeps_stdout_parseable(repo: TempRepo) {
        let cli = Cli::parse_from([
            "jar-installer",
            "-r",
            repo.root.as_str(),
            "--maven",
            "mvn",
            "--dry-run",
            "--json",
        ]);
        let executor = StubExecutor::new(Vec::new());
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        run(&cli, &executor, &mut stdout, &mut stderr).expect("dry run should succeed");

        let value: serde_json::Value =
            serde_json::from_slice(&stdout).expect("dry-run output should be JSON");
        assert_eq!(value["planned"].as_array().map(Vec::len), Some(2));
        let progress = String::from_utf8(stderr).expect("utf8 stderr");
        assert_eq!(progress.matches("install:install-file").count(), 2);
    }

    #[test]
    fn progress_message_precedes_missing_repository_error() {
        let cli = Cli::parse_from(["jar-installer", "-r", "/nonexistent/maven-repos"]);
        let executor = StubExecutor::new(Vec::new());
        let mut stderr = Vec::new();

        let err = run(&cli, &executor, &mut Vec::new(), &mut stderr)
            .expect_err("missing repository should fail");

        assert!(matches!(err, InstallerError::RepositoryNotFound { .. }));
        let printed = String::from_utf8(stderr).expect("utf8 stderr");
        assert_eq!(printed.lines().collect::<Vec<_>>(), vec!["Getting all the files..."]);
    }

    #[test]
    fn missing_repository_is_reported() {
        let cli = Cli::parse_from(["jar-installer", "-r", "/nonexistent/maven-repos"]);
        let executor = StubExecutor::new(Vec::new());
        let err = run(&cli, &executor, &mut Vec::new(), &mut Vec::new())
            .expect_err("missing repository should fail");
        assert!(matches!(err, InstallerError::RepositoryNotFound { .. }));
    }
}
