//! Rendering of the Maven `install:install-file` invocation.

use crate::config::InstallSettings;
use crate::scanner::Archive;

const INSTALL_GOAL: &str = "install:install-file";

/// A fully rendered command for one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
    /// Program to run.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<String>,
}

impl InstallCommand {
    /// Build the install command for `archive`.
    ///
    /// `-Dfile` is the bare file name; the command is expected to run with
    /// the archive's group directory as its working directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use jar_installer::artifact_name::parse_artifact_name;
    /// use jar_installer::config::InstallSettings;
    /// use jar_installer::group_id::GroupId;
    /// use jar_installer::install_command::InstallCommand;
    /// use jar_installer::scanner::Archive;
    ///
    /// let archive = Archive {
    ///     group_id: GroupId::from("org.example"),
    ///     group_dir: "repos/org.example".into(),
    ///     file_name: "lib-core-1.2.3.jar".to_owned(),
    ///     packaging: "jar".to_owned(),
    ///     name: parse_artifact_name("lib-core-1.2.3").expect("valid stem"),
    /// };
    /// let command = InstallCommand::for_archive(&archive, &InstallSettings::default());
    /// assert!(command.args.contains(&"-DartifactId=lib-core".to_owned()));
    /// ```
    #[must_use]
    pub fn for_archive(archive: &Archive, settings: &InstallSettings) -> Self {
        let mut args = Vec::with_capacity(10);

        if settings.offline {
            args.push("-o".to_owned());
        }
        if settings.maven_quiet {
            args.push("-q".to_owned());
        }

        args.push(INSTALL_GOAL.to_owned());
        args.push(property("groupId", archive.group_id.as_str()));
        args.push(property("artifactId", archive.name.artifact_id()));
        args.push(property("version", archive.name.version()));
        args.push(property("file", &archive.file_name));
        args.push(property("packaging", &archive.packaging));
        args.push(property("generatePom", if settings.generate_pom { "true" } else { "false" }));

        if let Some(repository) = &settings.local_repository {
            args.push(property("localRepositoryPath", repository.as_str()));
        }

        Self {
            program: settings.maven.clone(),
            args,
        }
    }

    /// Render the command as a single line for display.
    #[must_use]
    pub fn display_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            if arg.contains(char::is_whitespace) {
                line.push('"');
                line.push_str(arg);
                line.push('"');
            } else {
                line.push_str(arg);
            }
        }
        line
    }
}

fn property(key: &str, value: &str) -> String {
    format!("-D{key}={value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact_name::parse_artifact_name;
    use crate::group_id::GroupId;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};

    #[fixture]
    fn archive() -> Archive {
        Archive {
            group_id: GroupId::from("commons-io"),
            group_dir: Utf8PathBuf::from("/repos/commons-io"),
            file_name: "commons-io-2.11.0.jar".to_owned(),
            packaging: "jar".to_owned(),
            name: parse_artifact_name("commons-io-2.11.0").expect("valid stem"),
        }
    }

    #[rstest]
    fn default_settings_render_install_file_goal(archive: Archive) {
        let command = InstallCommand::for_archive(&archive, &InstallSettings::default());

        assert_eq!(command.program, crate::config::default_maven_program());
        assert_eq!(
            command.args,
            vec![
                "install:install-file",
                "-DgroupId=commons-io",
                "-DartifactId=commons-io",
                "-Dversion=2.11.0",
                "-Dfile=commons-io-2.11.0.jar",
                "-Dpackaging=jar",
                "-DgeneratePom=true",
            ]
        );
    }

    #[rstest]
    fn optional_settings_add_flags(archive: Archive) {
        let settings = InstallSettings {
            maven: "/opt/mvn".to_owned(),
            generate_pom: false,
            local_repository: Some(Utf8PathBuf::from("/srv/m2")),
            offline: true,
            maven_quiet: true,
            ..InstallSettings::default()
        };

        let command = InstallCommand::for_archive(&archive, &settings);

        assert_eq!(command.program, "/opt/mvn");
        assert_eq!(command.args.first().map(String::as_str), Some("-o"));
        assert_eq!(command.args.get(1).map(String::as_str), Some("-q"));
        assert!(command.args.contains(&"-DgeneratePom=false".to_owned()));
        assert_eq!(
            command.args.last().map(String::as_str),
            Some("-DlocalRepositoryPath=/srv/m2")
        );
    }

    #[rstest]
    fn display_line_quotes_whitespace(mut archive: Archive) {
        archive.file_name = "my lib-1.0.jar".to_owned();
        let settings = InstallSettings {
            maven: "mvn".to_owned(),
            ..InstallSettings::default()
        };

        let line = InstallCommand::for_archive(&archive, &settings).display_line();

        assert!(line.starts_with("mvn install:install-file "));
        assert!(line.contains("\"-Dfile=my lib-1.0.jar\""));
    }
}
