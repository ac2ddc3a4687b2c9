//! CLI argument definitions for the jar installer.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use crate::config::SettingsOverrides;
use crate::installer::BatchOptions;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Repository root used when `--repository` is not given.
pub const DEFAULT_REPOSITORY: &str = "maven-repos";

/// Install local archives into the Maven repository.
#[derive(Parser, Debug)]
#[command(name = "jar-installer")]
#[command(version, about)]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = concat!(
    "Install local archives into the Maven repository.\n\n",
    "The repository directory holds one sub-directory per group id. Every ",
    "archive inside a group directory is named <artifact>-<version>.<ext>; the ",
    "version starts at the first hyphen-separated segment that begins with a ",
    "digit and contains a dot. Each archive is registered with ",
    "`mvn install:install-file`.",
))]
#[command(after_help = concat!(
    "LAYOUT:\n",
    "  maven-repos/\n",
    "    commons-io/\n",
    "      commons-io-2.11.0.jar     -> commons-io:commons-io:2.11.0:jar\n",
    "    org.slf4j/\n",
    "      slf4j-api-2.0.9.jar       -> org.slf4j:slf4j-api:2.0.9:jar\n\n",
    "EXAMPLES:\n",
    "  Install everything under ./maven-repos:\n",
    "    $ jar-installer\n\n",
    "  Install from another directory into a custom local repository:\n",
    "    $ jar-installer -r ./vendor --local-repository /srv/m2\n\n",
    "  Preview the commands without running them:\n",
    "    $ jar-installer --dry-run\n\n",
    "  Show how file names are decoded:\n",
    "    $ jar-installer list --json",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Install arguments (used when no subcommand is given).
    #[command(flatten)]
    pub install: InstallArgs,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Install archives (default when no subcommand given).
    Install(InstallArgs),

    /// List the archives that would be installed.
    List(ListArgs),
}

/// Arguments shared by every subcommand that scans the repository.
#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Directory holding one sub-directory per group id.
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_REPOSITORY)]
    pub repository: Utf8PathBuf,

    /// Config file [default: <repository>/jar-installer.toml when present].
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Archive extension to install (can be repeated) [default: jar].
    #[arg(short, long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Output in JSON format for scripting.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the install command.
#[derive(Args, Debug, Clone)]
pub struct InstallArgs {
    /// Repository scanning options.
    #[command(flatten)]
    pub scan: ScanArgs,

    /// Package-manager program to run.
    #[arg(long, value_name = "PROGRAM")]
    pub maven: Option<String>,

    /// Install into this local repository instead of Maven's default.
    #[arg(long, value_name = "DIR")]
    pub local_repository: Option<Utf8PathBuf>,

    /// Run Maven in offline mode.
    #[arg(long)]
    pub offline: bool,

    /// Do not ask Maven to generate a POM for each archive.
    #[arg(long)]
    pub no_generate_pom: bool,

    /// Pass -q to Maven.
    #[arg(long)]
    pub maven_quiet: bool,

    /// Stop at the first archive that fails to install.
    #[arg(long)]
    pub fail_fast: bool,

    /// Print the commands without running them.
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output and Maven output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

/// Arguments for the list command.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Repository scanning options.
    #[command(flatten)]
    pub scan: ScanArgs,
}

impl Default for ScanArgs {
    fn default() -> Self {
        Self {
            repository: Utf8PathBuf::from(DEFAULT_REPOSITORY),
            config: None,
            extensions: Vec::new(),
            json: false,
        }
    }
}

impl Default for InstallArgs {
    /// Creates an `InstallArgs` instance with all flags disabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use jar_installer::cli::InstallArgs;
    ///
    /// let args = InstallArgs::default();
    /// assert!(!args.dry_run);
    /// assert_eq!(args.scan.repository, "maven-repos");
    /// ```
    fn default() -> Self {
        Self {
            scan: ScanArgs::default(),
            maven: None,
            local_repository: None,
            offline: false,
            no_generate_pom: false,
            maven_quiet: false,
            fail_fast: false,
            dry_run: false,
            verbosity: 0,
            quiet: false,
        }
    }
}

impl InstallArgs {
    /// Settings supplied on the command line.
    #[must_use]
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            maven: self.maven.clone(),
            extensions: self.scan.extensions.clone(),
            local_repository: self.local_repository.clone(),
            offline: self.offline,
            no_generate_pom: self.no_generate_pom,
            maven_quiet: self.maven_quiet,
        }
    }

    /// Batch switches supplied on the command line.
    #[must_use]
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            dry_run: self.dry_run,
            fail_fast: self.fail_fast,
            quiet: self.quiet,
        }
    }
}

impl ListArgs {
    /// Settings supplied on the command line.
    #[must_use]
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            extensions: self.scan.extensions.clone(),
            ..SettingsOverrides::default()
        }
    }
}

impl Cli {
    /// Returns the effective install arguments.
    ///
    /// If an `Install` subcommand was provided, returns those arguments.
    /// Otherwise returns the flattened install arguments.
    #[must_use]
    pub fn install_args(&self) -> &InstallArgs {
        match &self.command {
            Some(Command::Install(args)) => args,
            Some(Command::List(_)) | None => &self.install,
        }
    }

    /// Log level filter implied by `-v` and `-q`.
    #[must_use]
    pub fn log_level(&self) -> log::LevelFilter {
        let args = self.install_args();
        if args.quiet {
            return log::LevelFilter::Error;
        }
        match args.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
