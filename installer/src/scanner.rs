//! Repository scanner for discovering installable archives.
//!
//! The repository root holds one directory per group, each containing the
//! archives to install:
//!
//! ```text
//! {root}/{group_id}/{artifact_id}-{version}.{ext}
//! ```
//!
//! Files directly under the root and nested directories below a group are
//! ignored.

use std::fmt;
use std::path::{Path, PathBuf};

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};

use crate::artifact_name::{
    MalformedArtifactName, ParsedName, parse_artifact_name, split_extension,
};
use crate::error::{InstallerError, Result};
use crate::group_id::GroupId;

/// An archive discovered under a group directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    /// Group the archive is installed under.
    pub group_id: GroupId,
    /// Directory holding the archive; the install command runs here.
    pub group_dir: Utf8PathBuf,
    /// Bare file name including the extension.
    pub file_name: String,
    /// Lower-cased file extension, used as the Maven packaging.
    pub packaging: String,
    /// Artifact id and version decoded from the file stem.
    pub name: ParsedName,
}

impl Archive {
    /// Full path to the archive file.
    #[must_use]
    pub fn path(&self) -> Utf8PathBuf {
        self.group_dir.join(&self.file_name)
    }

    /// Maven coordinates in `group:artifact:version:packaging` form.
    ///
    /// # Examples
    ///
    /// ```
    /// use jar_installer::artifact_name::parse_artifact_name;
    /// use jar_installer::group_id::GroupId;
    /// use jar_installer::scanner::Archive;
    ///
    /// let archive = Archive {
    ///     group_id: GroupId::from("commons-io"),
    ///     group_dir: "repos/commons-io".into(),
    ///     file_name: "commons-io-2.11.0.jar".to_owned(),
    ///     packaging: "jar".to_owned(),
    ///     name: parse_artifact_name("commons-io-2.11.0").expect("valid stem"),
    /// };
    /// assert_eq!(archive.coordinates(), "commons-io:commons-io:2.11.0:jar");
    /// ```
    #[must_use]
    pub fn coordinates(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.group_id,
            self.name.artifact_id(),
            self.name.version(),
            self.packaging
        )
    }
}

/// Why a candidate file was left out of the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The stem has no version segment.
    MalformedName(MalformedArtifactName),
    /// The stem starts with the version, leaving no artifact id.
    MissingArtifactId,
    /// The file or group directory name is not valid UTF-8.
    NonUtf8Name,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedName(err) => fmt::Display::fmt(err, f),
            Self::MissingArtifactId => f.write_str("file name starts with the version"),
            Self::NonUtf8Name => f.write_str("name is not valid UTF-8"),
        }
    }
}

/// A candidate file, or an unreadable group directory, that will not be
/// installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedArchive {
    /// Path of the skipped entry, lossily rendered when not UTF-8.
    pub path: String,
    /// Why the file was skipped.
    pub reason: SkipReason,
}

/// Everything found under the repository root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Installable archives ordered by group, then file name.
    pub archives: Vec<Archive>,
    /// Files matching the extension filter that could not be used, plus
    /// group directories whose names are not UTF-8.
    pub skipped: Vec<SkippedArchive>,
}

impl ScanResult {
    /// Returns true when nothing was found at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archives.is_empty() && self.skipped.is_empty()
    }
}

/// Scan `root` for archives whose extension satisfies `accepts_extension`.
///
/// # Errors
///
/// Returns [`InstallerError::RepositoryNotFound`] when `root` is not a
/// directory and [`InstallerError::ScanFailed`] when a directory cannot be
/// listed.
pub fn scan_repository<F>(root: &Utf8Path, accepts_extension: F) -> Result<ScanResult>
where
    F: Fn(&str) -> bool,
{
    if !root.is_dir() {
        return Err(InstallerError::RepositoryNotFound {
            path: root.to_owned(),
        });
    }

    let mut result = ScanResult::default();

    for group_dir in list_group_dirs(root, &mut result)? {
        let Some(group_name) = group_dir.file_name() else {
            continue;
        };
        let group_id = GroupId::from(group_name);
        debug!("scanning group {group_id} at {group_dir}");
        scan_group(&group_dir, &group_id, &accepts_extension, &mut result)?;
    }

    Ok(result)
}

/// List the group directories directly under `root`, sorted by name.
///
/// Group directories with non-UTF-8 names are recorded as skipped.
fn list_group_dirs(root: &Utf8Path, result: &mut ScanResult) -> Result<Vec<Utf8PathBuf>> {
    let mut dirs = Vec::new();
    for entry in read_entries(root)? {
        match entry {
            Ok(path) if path.is_dir() => dirs.push(path),
            Ok(_) => {}
            Err(path) if path.is_dir() => {
                let path = path.to_string_lossy().into_owned();
                warn!("skipping group {path}: {}", SkipReason::NonUtf8Name);
                result.skipped.push(SkippedArchive {
                    path,
                    reason: SkipReason::NonUtf8Name,
                });
            }
            Err(_) => {}
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn scan_group<F>(
    group_dir: &Utf8Path,
    group_id: &GroupId,
    accepts_extension: &F,
    result: &mut ScanResult,
) -> Result<()>
where
    F: Fn(&str) -> bool,
{
    let mut entries = read_entries(group_dir)?;
    entries.sort_by_cached_key(sort_key);

    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(path) => {
                if is_candidate(&path, accepts_extension) {
                    let path = path.to_string_lossy().into_owned();
                    warn!("skipping {path}: {}", SkipReason::NonUtf8Name);
                    result.skipped.push(SkippedArchive {
                        path,
                        reason: SkipReason::NonUtf8Name,
                    });
                }
                continue;
            }
        };

        if !path.is_file() {
            continue;
        }

        let Some(file_name) = path.file_name() else {
            continue;
        };
        let Some((stem, extension)) = split_extension(file_name) else {
            continue;
        };
        if !accepts_extension(extension) {
            continue;
        }

        match classify(stem) {
            Ok(name) => result.archives.push(Archive {
                group_id: group_id.clone(),
                group_dir: group_dir.to_owned(),
                file_name: file_name.to_owned(),
                packaging: extension.to_ascii_lowercase(),
                name,
            }),
            Err(reason) => {
                warn!("skipping {path}: {reason}");
                result.skipped.push(SkippedArchive {
                    path: path.to_string(),
                    reason,
                });
            }
        }
    }

    Ok(())
}

fn classify(stem: &str) -> std::result::Result<ParsedName, SkipReason> {
    let name = parse_artifact_name(stem).map_err(SkipReason::MalformedName)?;
    if name.artifact_id().is_empty() {
        return Err(SkipReason::MissingArtifactId);
    }
    Ok(name)
}

/// Returns true when a non-UTF-8 `path` would otherwise have been an archive.
fn is_candidate<F>(path: &Path, accepts_extension: &F) -> bool
where
    F: Fn(&str) -> bool,
{
    let Some(file_name) = path.file_name() else {
        return false;
    };
    let file_name = file_name.to_string_lossy();
    path.is_file()
        && split_extension(&file_name).is_some_and(|(_, extension)| accepts_extension(extension))
}

/// Entry paths of `dir`; non-UTF-8 entries are returned as plain paths.
type DirEntries = Vec<std::result::Result<Utf8PathBuf, PathBuf>>;

fn read_entries(dir: &Utf8Path) -> Result<DirEntries> {
    let scan_failed = |source| InstallerError::ScanFailed {
        path: dir.to_owned(),
        source,
    };

    let mut entries = Vec::new();
    for entry in dir.read_dir().map_err(scan_failed)? {
        let entry = entry.map_err(scan_failed)?;
        entries.push(Utf8PathBuf::from_path_buf(entry.path()));
    }
    Ok(entries)
}

fn sort_key(entry: &std::result::Result<Utf8PathBuf, PathBuf>) -> String {
    match entry {
        Ok(path) => path.file_name().unwrap_or_default().to_owned(),
        Err(path) => path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}
