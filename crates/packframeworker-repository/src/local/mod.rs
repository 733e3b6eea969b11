use std::path::{Path, PathBuf};
use std::{fs, io};

use packframeworker_pack::{Layout, PackVersion};
use tracing::{info, instrument};

pub mod persist;

/// The last pack version that was built, kept in `beta/lastVersion.txt`.
///
/// Unlike [`persist::PersistedEntity`]s, this is a bare text file holding
/// nothing but the version.
#[derive(Debug, Clone)]
#[must_use]
pub struct VersionStore {
    path: PathBuf,
}

impl VersionStore {
    pub fn new(layout: &Layout) -> Self {
        Self {
            path: layout.last_version_file(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored version, if there is a non-empty one.
    ///
    /// # Errors
    ///
    /// This function will return an error if the file exists but can't be
    /// read.
    #[instrument(level = "debug")]
    pub fn read(&self) -> Result<Option<PackVersion>, VersionStoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let version = PackVersion::new(contents);
                Ok((!version.is_empty()).then_some(version))
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(VersionStoreError::io(source, &self.path)),
        }
    }

    /// Overwrite the stored version, creating `beta/` if needed.
    ///
    /// # Errors
    ///
    /// This function will return an error if the file or its parent directory
    /// can't be written.
    #[instrument(level = "debug")]
    pub fn write(&self, version: &PackVersion) -> Result<(), VersionStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| VersionStoreError::io(source, parent))?;
        }
        fs::write(&self.path, version.to_string())
            .map_err(|source| VersionStoreError::io(source, &self.path))
    }

    /// Resolve the user's `input` against the stored version and persist the
    /// outcome.
    ///
    /// # Errors
    ///
    /// Returns [`VersionStoreError::NoVersion`] if `input` is blank and no
    /// version was stored before, or an I/O error from [`Self::read`] or
    /// [`Self::write`].
    #[instrument]
    pub fn select(&self, input: &str) -> Result<PackVersion, VersionStoreError> {
        let previous = self.read()?;
        let version = resolve(previous.as_ref(), input).ok_or(VersionStoreError::NoVersion)?;
        self.write(&version)?;
        info!(%version, "Selected modpack version");
        Ok(version)
    }
}

/// Pick the version to build: whatever was typed in, or `previous` if the
/// input is blank.
#[must_use]
pub fn resolve(previous: Option<&PackVersion>, input: &str) -> Option<PackVersion> {
    let typed = PackVersion::new(input);
    match typed.is_empty() {
        true => previous.cloned(),
        false => Some(typed),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VersionStoreError {
    #[error("An I/O error occurred, path at fault: {path:?}")]
    Io { source: io::Error, path: PathBuf },

    #[error("No version was entered and none was stored before")]
    NoVersion,
}

impl VersionStoreError {
    fn io(source: io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Some("1.0.0"), "", Some("1.0.0"))]
    #[case(Some("1.0.0"), "   ", Some("1.0.0"))]
    #[case(Some("1.0.0"), " 1.1.0\n", Some("1.1.0"))]
    #[case(None, "1.1.0", Some("1.1.0"))]
    #[case(None, "", None)]
    fn resolving(
        #[case] previous: Option<&str>,
        #[case] input: &str,
        #[case] expected: Option<&str>,
    ) {
        let previous = previous.map(PackVersion::new);
        assert_eq!(
            resolve(previous.as_ref(), input),
            expected.map(PackVersion::new)
        );
    }
}
