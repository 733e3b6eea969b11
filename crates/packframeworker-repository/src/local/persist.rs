use std::path::{Path, PathBuf};
use std::{fs, io};

use serde::{Deserialize, Serialize};
use tracing::{error, instrument};

#[derive(thiserror::Error, Debug)]
#[must_use]
pub enum PersistError {
    #[error("An I/O error occurred, path at fault: {path:?}")]
    Io {
        source: io::Error,
        path: Option<PathBuf>,
    },

    #[error("Failed to (de)serialize data to/from YAML")]
    SerdeYml(#[from] serde_yml::Error),
}

impl PersistError {
    pub const fn io(source: io::Error, path: PathBuf) -> Self {
        Self::Io {
            source,
            path: Some(path),
        }
    }

    /// Whether this error means the file simply isn't there.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// A trait that represents an entity (type) that can be persisted in a file.
pub trait PersistedEntity: Serialize + for<'de> Deserialize<'de> {
    /// The path to the file where this entity should be persisted, relative
    /// to the installation root.
    const FILE_PATH: &'static str;

    /// Where [`Self`] lives for the installation at `root`.
    fn path_in(root: &Path) -> PathBuf {
        root.join(Self::FILE_PATH)
    }

    /// Deserializes an instance of [`Self`] from [`Self::FILE_PATH`] under
    /// `root`.
    ///
    /// # Errors
    ///
    /// This function will return an error if there is an error reading
    /// [`Self::FILE_PATH`] or an error occurs when deserializing its
    /// contents into [`Self`].
    #[instrument]
    fn read(root: &Path) -> Result<Self, PersistError> {
        let path = Self::path_in(root);
        let yml = fs::read_to_string(&path)
            .inspect_err(|_| error!(?path, "failed to read file"))
            .map_err(|source| PersistError::io(source, path))?;
        let entity = serde_yml::from_str(&yml)?;
        Ok(entity)
    }

    /// Serialize `self` into a string and write it to [`Self::FILE_PATH`]
    /// under `root`.
    ///
    /// # Errors
    ///
    /// This function will return an error if an error occurs while serializing
    /// [`self`](Self) to a string or while writing that string to
    /// [`Self::FILE_PATH`].
    #[instrument(skip(self))]
    fn write(&self, root: &Path) -> Result<(), PersistError> {
        let path = Self::path_in(root);
        let yml = serde_yml::to_string(self)?;
        fs::write(&path, yml)
            .inspect_err(|_| error!(?path, "failed to write file"))
            .map_err(|source| PersistError::io(source, path))?;
        Ok(())
    }
}
