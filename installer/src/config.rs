//! Layered installer configuration.
//!
//! Settings are resolved from, lowest to highest precedence: built-in
//! defaults, an optional `jar-installer.toml`, environment variables, and
//! command-line flags.
//!
//! ```toml
//! maven = "/opt/maven/bin/mvn"
//! extensions = ["jar", "aar"]
//! generate_pom = true
//! local_repository = "/srv/m2"
//! offline = false
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::Deserialize;

use crate::error::{InstallerError, Result};

/// File name looked up in the repository root when no config path is given.
pub const CONFIG_FILE_NAME: &str = "jar-installer.toml";

/// Environment variable overriding the package-manager program.
pub const MAVEN_ENV: &str = "JAR_INSTALLER_MAVEN";

/// Environment variable overriding the target local repository.
pub const LOCAL_REPOSITORY_ENV: &str = "JAR_INSTALLER_LOCAL_REPOSITORY";

/// Archive extension installed when none is configured.
pub const DEFAULT_EXTENSION: &str = "jar";

/// Returns the package-manager program name for the host platform.
#[must_use]
pub fn default_maven_program() -> &'static str {
    if cfg!(windows) { "mvn.cmd" } else { "mvn" }
}

/// Contents of a `jar-installer.toml` file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Package-manager program to invoke.
    pub maven: Option<String>,
    /// Archive extensions to install.
    pub extensions: Option<Vec<String>>,
    /// Whether Maven should generate a minimal POM.
    pub generate_pom: Option<bool>,
    /// Install into this repository instead of `~/.m2/repository`.
    pub local_repository: Option<Utf8PathBuf>,
    /// Run Maven in offline mode.
    pub offline: Option<bool>,
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    /// `--maven`.
    pub maven: Option<String>,
    /// `--extension`, repeatable. Empty means "not given".
    pub extensions: Vec<String>,
    /// `--local-repository`.
    pub local_repository: Option<Utf8PathBuf>,
    /// `--offline`.
    pub offline: bool,
    /// `--no-generate-pom`.
    pub no_generate_pom: bool,
    /// `--maven-quiet`.
    pub maven_quiet: bool,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallSettings {
    /// Package-manager program to invoke.
    pub maven: String,
    /// Lower-case archive extensions without a leading dot.
    pub extensions: Vec<String>,
    /// Pass `-DgeneratePom=true`.
    pub generate_pom: bool,
    /// Pass `-DlocalRepositoryPath=<dir>`.
    pub local_repository: Option<Utf8PathBuf>,
    /// Pass `-o`.
    pub offline: bool,
    /// Pass `-q`.
    pub maven_quiet: bool,
}

impl Default for InstallSettings {
    fn default() -> Self {
        Self {
            maven: default_maven_program().to_owned(),
            extensions: vec![DEFAULT_EXTENSION.to_owned()],
            generate_pom: true,
            local_repository: None,
            offline: false,
            maven_quiet: false,
        }
    }
}

impl InstallSettings {
    /// Resolve settings from the real environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit or discovered config file cannot be
    /// read or parsed.
    pub fn load(
        config_path: Option<&Utf8Path>,
        repository_root: &Utf8Path,
        overrides: &SettingsOverrides,
    ) -> Result<Self> {
        Self::load_with(config_path, repository_root, overrides, |key| {
            std::env::var(key).ok()
        })
    }

    /// Internal implementation with injectable environment lookup for testability.
    fn load_with<F>(
        config_path: Option<&Utf8Path>,
        repository_root: &Utf8Path,
        overrides: &SettingsOverrides,
        env: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match locate_config(config_path, repository_root) {
            Some(path) => load_config_file(&path)?,
            None => FileConfig::default(),
        };
        Ok(Self::merge(file, env, overrides))
    }

    fn merge<F>(file: FileConfig, env: F, overrides: &SettingsOverrides) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let maven = overrides
            .maven
            .clone()
            .or_else(|| env(MAVEN_ENV).filter(|value| !value.is_empty()))
            .or(file.maven)
            .unwrap_or(defaults.maven);

        let extensions = if overrides.extensions.is_empty() {
            file.extensions.unwrap_or_default()
        } else {
            overrides.extensions.clone()
        };

        let local_repository = overrides
            .local_repository
            .clone()
            .or_else(|| {
                env(LOCAL_REPOSITORY_ENV)
                    .filter(|value| !value.is_empty())
                    .map(Utf8PathBuf::from)
            })
            .or(file.local_repository);

        Self {
            maven,
            extensions: normalise_extensions(&extensions),
            generate_pom: !overrides.no_generate_pom
                && file.generate_pom.unwrap_or(defaults.generate_pom),
            local_repository,
            offline: overrides.offline || file.offline.unwrap_or(defaults.offline),
            maven_quiet: overrides.maven_quiet,
        }
    }

    /// Returns true when `extension` is one of the configured extensions.
    #[must_use]
    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(extension))
    }
}

/// Pick the config file to load: the explicit path, else the default file in
/// the repository root when it exists.
fn locate_config(config_path: Option<&Utf8Path>, repository_root: &Utf8Path) -> Option<Utf8PathBuf> {
    if let Some(path) = config_path {
        return Some(path.to_owned());
    }
    let candidate = repository_root.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// Read and parse a config file.
///
/// # Errors
///
/// Returns [`InstallerError::ConfigRead`] when the file cannot be read and
/// [`InstallerError::InvalidConfig`] when it is not valid TOML for
/// [`FileConfig`].
pub fn load_config_file(path: &Utf8Path) -> Result<FileConfig> {
    debug!("loading config from {path}");
    let contents = std::fs::read_to_string(path).map_err(|source| InstallerError::ConfigRead {
        path: path.to_owned(),
        source,
    })?;
    parse_config(&contents).map_err(|reason| InstallerError::InvalidConfig {
        path: path.to_owned(),
        reason,
    })
}

/// Parse config file contents.
///
/// # Errors
///
/// Returns the TOML error message when parsing fails.
pub fn parse_config(contents: &str) -> std::result::Result<FileConfig, String> {
    toml::from_str(contents).map_err(|e| e.message().to_owned())
}

fn normalise_extensions(extensions: &[String]) -> Vec<String> {
    let mut normalised: Vec<String> = Vec::with_capacity(extensions.len());
    for ext in extensions {
        let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        if !ext.is_empty() && !normalised.contains(&ext) {
            normalised.push(ext);
        }
    }
    if normalised.is_empty() {
        normalised.push(DEFAULT_EXTENSION.to_owned());
    }
    normalised
}
