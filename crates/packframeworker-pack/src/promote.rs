use std::path::PathBuf;
use std::{fs, io};

use tracing::{info, instrument};

use crate::layout::Layout;

#[derive(Debug, thiserror::Error)]
pub enum PromoteError {
    #[error("There is no beta build to promote at {0:?}")]
    NoBeta(PathBuf),

    #[error("An I/O error occurred, path at fault: {path:?}")]
    Io { source: io::Error, path: PathBuf },

    #[error("Failed to copy over {} file(s) into the release directory", .error_list.len())]
    CopyDir { error_list: Vec<io::Error> },
}

/// Replace `release/` with a copy of `beta/`, minus the last version file.
///
/// Whatever was in `release/` before is gone afterwards.
///
/// # Errors
///
/// Returns an error if `beta/` doesn't exist, `release/` can't be cleaned up,
/// or some files fail to copy.
#[instrument(skip(layout), fields(root = ?layout.root()))]
pub fn promote(layout: &Layout) -> Result<PathBuf, PromoteError> {
    let (beta, release) = (layout.beta(), layout.release());
    if !beta.is_dir() {
        return Err(PromoteError::NoBeta(beta));
    }

    if fs::exists(&release).map_err(|source| PromoteError::Io {
        source,
        path: release.clone(),
    })? {
        fs::remove_dir_all(&release).map_err(|source| PromoteError::Io {
            source,
            path: release.clone(),
        })?;
    }

    match copy_dir::copy_dir(&beta, &release) {
        Err(source) => {
            return Err(PromoteError::Io {
                source,
                path: release,
            });
        }
        Ok(error_list) if !error_list.is_empty() => {
            return Err(PromoteError::CopyDir { error_list });
        }
        Ok(_) => {}
    }

    let last_version = release.join(Layout::LAST_VERSION_FILE);
    match fs::remove_file(&last_version) {
        Err(error) if error.kind() != io::ErrorKind::NotFound => {
            return Err(PromoteError::Io {
                source: error,
                path: last_version,
            });
        }
        _ => {}
    }

    info!(?release, "Promoted the beta builds to release");
    Ok(release)
}
