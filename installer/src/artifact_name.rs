//! Decomposition of archive filenames into artifact identity fields.
//!
//! Archive files follow the `<artifact>-<version>.<ext>` convention. The
//! artifact id and the version are both hyphen-separated, so the boundary is
//! found heuristically: the version starts at the first segment that begins
//! with a decimal digit and contains a `.`.

use std::fmt;

use thiserror::Error;

const SEGMENT_SEPARATOR: char = '-';

/// The identity fields decoded from an archive filename stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedName {
    artifact_id: String,
    version: String,
}

impl ParsedName {
    /// The segments preceding the version, rejoined with hyphens.
    ///
    /// Empty when the stem starts with the version.
    #[must_use]
    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    /// The version-start segment and everything after it.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Rebuild the stem this name was parsed from.
    ///
    /// # Examples
    ///
    /// ```
    /// use jar_installer::artifact_name::parse_artifact_name;
    ///
    /// let name = parse_artifact_name("commons-io-2.11.0").expect("valid stem");
    /// assert_eq!(name.to_stem(), "commons-io-2.11.0");
    /// ```
    #[must_use]
    pub fn to_stem(&self) -> String {
        if self.artifact_id.is_empty() {
            self.version.clone()
        } else {
            format!("{}{SEGMENT_SEPARATOR}{}", self.artifact_id, self.version)
        }
    }
}

impl fmt::Display for ParsedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.artifact_id, self.version)
    }
}

/// The stem has no segment that could start a version.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed artifact name {name:?}: no version segment (digit-led and containing '.')")]
pub struct MalformedArtifactName {
    /// The stem that failed to decompose.
    pub name: String,
}

/// Returns true when `segment` marks the start of the version.
///
/// Only ASCII digits `0-9` count as a leading digit; other Unicode decimal
/// digits do not start a version.
///
/// # Examples
///
/// ```
/// use jar_installer::artifact_name::is_version_start;
///
/// assert!(is_version_start("2.11.0"));
/// assert!(is_version_start("1.0.RELEASE"));
/// assert!(!is_version_start("v1.0"));
/// assert!(!is_version_start("2023"));
/// ```
#[must_use]
pub fn is_version_start(segment: &str) -> bool {
    segment.starts_with(|c: char| c.is_ascii_digit()) && segment.contains('.')
}

/// Split an extension-less archive name into artifact id and version.
///
/// # Errors
///
/// Returns [`MalformedArtifactName`] when the name is empty or no segment
/// qualifies as the start of a version.
///
/// # Examples
///
/// ```
/// use jar_installer::artifact_name::parse_artifact_name;
///
/// let name = parse_artifact_name("lib-core-1.2.3").expect("valid stem");
/// assert_eq!(name.artifact_id(), "lib-core");
/// assert_eq!(name.version(), "1.2.3");
///
/// assert!(parse_artifact_name("nodotversion").is_err());
/// ```
pub fn parse_artifact_name(name: &str) -> Result<ParsedName, MalformedArtifactName> {
    let malformed = || MalformedArtifactName {
        name: name.to_owned(),
    };

    if name.is_empty() {
        return Err(malformed());
    }

    let segments: Vec<&str> = name.split(SEGMENT_SEPARATOR).collect();
    let boundary = segments
        .iter()
        .position(|segment| is_version_start(segment))
        .ok_or_else(malformed)?;

    let (artifact, version) = segments.split_at(boundary);
    Ok(ParsedName {
        artifact_id: artifact.join("-"),
        version: version.join("-"),
    })
}

/// Split a filename into stem and extension on the last `.`.
///
/// Returns `None` when the name has no dot, or when either side is empty.
///
/// # Examples
///
/// ```
/// use jar_installer::artifact_name::split_extension;
///
/// assert_eq!(split_extension("guava-33.0.0-jre.jar"), Some(("guava-33.0.0-jre", "jar")));
/// assert_eq!(split_extension("README"), None);
/// ```
#[must_use]
pub fn split_extension(file_name: &str) -> Option<(&str, &str)> {
    let (stem, extension) = file_name.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() {
        return None;
    }
    Some((stem, extension))
}
