//! Behaviour-driven tests for repository installation.
//!
//! These scenarios scan a temporary repository tree and drive the installer
//! with a stub executor, so no Maven process is ever spawned.

use camino::Utf8PathBuf;
use jar_installer::config::InstallSettings;
use jar_installer::installer::{BatchOptions, InstallReport, Installer};
use jar_installer::scanner::scan_repository;
use jar_installer::test_utils::{ExpectedCall, StubExecutor, failure_output, success_output};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::{Cell, RefCell};
use tempfile::TempDir;

struct InstallWorld {
    temp: TempDir,
    root: Utf8PathBuf,
    first_fails: Cell<bool>,
    dry_run: Cell<bool>,
    report: RefCell<Option<InstallReport>>,
    working_dirs: RefCell<Vec<String>>,
    printed: RefCell<String>,
}

#[fixture]
fn install_world() -> InstallWorld {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = Utf8PathBuf::try_from(temp.path().to_owned()).expect("non-UTF8 temp path");
    InstallWorld {
        temp,
        root,
        first_fails: Cell::new(false),
        dry_run: Cell::new(false),
        report: RefCell::new(None),
        working_dirs: RefCell::new(Vec::new()),
        printed: RefCell::new(String::new()),
    }
}

impl InstallWorld {
    fn add(&self, group: &str, file: &str) {
        let dir = self.temp.path().join(group);
        std::fs::create_dir_all(&dir).expect("failed to create group dir");
        std::fs::write(dir.join(file), b"PK").expect("failed to write archive");
    }

    fn report(&self) -> InstallReport {
        self.report
            .borrow()
            .clone()
            .expect("repository should have been installed")
    }
}

#[given("a repository with commons-io and org.example archives")]
fn given_two_groups(install_world: &InstallWorld) {
    install_world.add("commons-io", "commons-io-2.11.0.jar");
    install_world.add("org.example", "lib-core-1.2.3.jar");
}

#[given("a repository with a malformed archive name")]
fn given_malformed(install_world: &InstallWorld) {
    install_world.add("org.example", "lib-core-1.2.3.jar");
    install_world.add("org.example", "nodotversion.jar");
}

#[given("the first install fails")]
fn given_first_fails(install_world: &InstallWorld) {
    install_world.first_fails.set(true);
}

#[given("dry-run mode is enabled")]
fn given_dry_run(install_world: &InstallWorld) {
    install_world.dry_run.set(true);
}

#[when("the repository is installed")]
fn when_installed(install_world: &InstallWorld) {
    let settings = InstallSettings {
        maven: "mvn".to_owned(),
        ..InstallSettings::default()
    };
    let scan = scan_repository(&install_world.root, |ext| settings.accepts_extension(ext))
        .expect("scan should succeed");

    let expected = if install_world.dry_run.get() {
        Vec::new()
    } else {
        scan.archives
            .iter()
            .enumerate()
            .map(|(index, archive)| {
                let result = if index == 0 && install_world.first_fails.get() {
                    Ok(failure_output("repository locked"))
                } else {
                    Ok(success_output())
                };
                ExpectedCall {
                    program: "mvn",
                    file: archive.file_name.clone(),
                    result,
                }
            })
            .collect()
    };
    let executor = StubExecutor::new(expected);

    let options = BatchOptions {
        dry_run: install_world.dry_run.get(),
        ..BatchOptions::default()
    };
    let mut out = Vec::new();
    let report = Installer::new(&executor, &settings, options)
        .install_all(&scan, &mut out)
        .expect("batch should run");

    executor.assert_finished();
    install_world.working_dirs.replace(executor.working_dirs());
    install_world
        .printed
        .replace(String::from_utf8_lossy(&out).into_owned());
    install_world.report.replace(Some(report));
}

#[then("{count:usize} archives are installed")]
fn then_installed_count(install_world: &InstallWorld, count: usize) {
    assert_eq!(install_world.report().installed.len(), count);
}

#[then("each command runs inside its group directory")]
fn then_runs_in_group_dir(install_world: &InstallWorld) {
    let dirs = install_world.working_dirs.borrow();
    assert_eq!(
        *dirs,
        vec![
            install_world.root.join("commons-io").to_string(),
            install_world.root.join("org.example").to_string(),
        ]
    );
}

#[then("the malformed archive is reported as skipped")]
fn then_malformed_skipped(install_world: &InstallWorld) {
    let report = install_world.report();
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].path.ends_with("nodotversion.jar"));
}

#[then("the failure is reported for {group}")]
fn then_failure_reported(install_world: &InstallWorld, group: String) {
    let report = install_world.report();
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].coordinates.starts_with(&format!("{group}:")));
    assert_eq!(report.failed[0].reason, "repository locked");
}

#[then("{count:usize} commands are printed")]
fn then_commands_printed(install_world: &InstallWorld, count: usize) {
    let printed = install_world.printed.borrow();
    let commands = printed
        .lines()
        .filter(|line| line.contains("install:install-file"))
        .count();
    assert_eq!(commands, count);
    assert_eq!(install_world.report().planned.len(), count);
}

#[scenario(path = "tests/features/install.feature", index = 0)]
fn scenario_install_every_archive(install_world: InstallWorld) {
    let _ = install_world;
}

#[scenario(path = "tests/features/install.feature", index = 1)]
fn scenario_skip_malformed(install_world: InstallWorld) {
    let _ = install_world;
}

#[scenario(path = "tests/features/install.feature", index = 2)]
fn scenario_continue_past_failure(install_world: InstallWorld) {
    let _ = install_world;
}

#[scenario(path = "tests/features/install.feature", index = 3)]
fn scenario_dry_run(install_world: InstallWorld) {
    let _ = install_world;
}
