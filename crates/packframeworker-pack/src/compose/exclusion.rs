use std::path::{Component, Path, PathBuf};
use std::{fs, io};

use tracing::{debug, instrument, warn};

use super::{ComposeError, Result, remove_any};

/// A list of paths to delete from a composed build.
///
/// Lives in the output directory as [`Self::FILE_NAME`], one relative path per
/// line. Layers ship it to drop files that a lower layer brought in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct ExclusionManifest {
    entries: Vec<PathBuf>,
}

impl ExclusionManifest {
    pub const FILE_NAME: &'static str = "filesToRemove.txt";

    /// Parse the manifest. Blank lines are ignored, and so are entries that
    /// would point outside of the output directory or at the output directory
    /// itself.
    pub fn parse(contents: &str) -> Self {
        let entries = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| {
                let path = Path::new(line);
                let normalized = normalize(path);
                if normalized.is_none() {
                    warn!(?path, "Ignoring an exclusion outside of the output directory");
                }
                normalized
            })
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Read and delete the manifest in `output`, if there is one.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest exists but can't be read or removed.
    #[instrument(level = "debug")]
    pub fn take(output: &Path) -> Result<Option<Self>> {
        let path = output.join(Self::FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path).map_err(ComposeError::io(&path))?;
        fs::remove_file(&path).map_err(ComposeError::io(&path))?;
        Ok(Some(Self::parse(&contents)))
    }

    /// Delete every listed path under `output`, returning the ones that
    /// actually existed.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing entry fails to be removed.
    #[instrument(level = "debug", skip(self))]
    pub fn apply(&self, output: &Path) -> Result<Vec<PathBuf>> {
        let mut removed = vec![];
        for entry in &self.entries {
            let target = output.join(entry);
            match remove_any(&target) {
                Ok(()) => {
                    debug!(?target, "Removed");
                    removed.push(entry.clone());
                }
                Err(error) if error.kind() == io::ErrorKind::NotFound => {
                    debug!(?target, "Nothing to remove");
                }
                Err(source) => return Err(ComposeError::Io { source, path: target }),
            }
        }
        Ok(removed)
    }
}

/// `path` without `.` components, or `None` if it isn't a plain relative
/// path naming at least one entry.
fn normalize(path: &Path) -> Option<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (!normalized.as_os_str().is_empty()).then_some(normalized)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use rstest::rstest;
    use tempdir::TempDir;

    use super::ExclusionManifest;

    #[rstest]
    #[case("", &[])]
    #[case("mods/a.pw.toml\n\n  \n", &["mods/a.pw.toml"])]
    #[case("  config/x.toml  \r\nmods\n", &["config/x.toml", "mods"])]
    #[case("../outside\n/etc/passwd\nmods/../../x\nok.txt", &["ok.txt"])]
    #[case("./\n.\n././\n./mods/a.pw.toml", &["mods/a.pw.toml"])]
    fn parsing(#[case] contents: &str, #[case] expected: &[&str]) {
        let expected = expected.iter().map(PathBuf::from).collect::<Vec<_>>();
        assert_eq!(ExclusionManifest::parse(contents).entries(), expected);
    }

    #[test]
    fn take_consumes_the_file() {
        let dir = TempDir::new("packframeworker-exclusion").unwrap();
        let manifest_path = dir.path().join(ExclusionManifest::FILE_NAME);
        fs::write(&manifest_path, "a.txt\n").unwrap();

        let manifest = ExclusionManifest::take(dir.path()).unwrap().unwrap();

        assert_eq!(manifest.entries(), [PathBuf::from("a.txt")]);
        assert!(!manifest_path.exists());
        assert_eq!(ExclusionManifest::take(dir.path()).unwrap(), None);
    }

    #[test]
    fn apply_removes_files_and_directories() {
        let dir = TempDir::new("packframeworker-exclusion").unwrap();
        fs::create_dir_all(dir.path().join("mods/nested")).unwrap();
        fs::write(dir.path().join("mods/nested/x.toml"), "").unwrap();
        fs::write(dir.path().join("keep.txt"), "").unwrap();
        fs::write(dir.path().join("drop.txt"), "").unwrap();

        let manifest = ExclusionManifest::parse("mods\ndrop.txt\nmissing.txt\n");
        let removed = manifest.apply(dir.path()).unwrap();

        assert_eq!(removed, [PathBuf::from("mods"), PathBuf::from("drop.txt")]);
        assert!(!dir.path().join("mods").exists());
        assert!(!dir.path().join("drop.txt").exists());
        assert!(dir.path().join("keep.txt").exists());
    }
}
