//! External programs PackFrameworker shells out to.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{info, instrument, warn};

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("Failed to run {program:?} in {directory:?}")]
    Spawn {
        source: io::Error,
        program: String,
        directory: PathBuf,
    },

    #[error("{program:?} exited with status code {code} in {directory:?}")]
    Failed {
        program: String,
        code: i32,
        directory: PathBuf,
    },

    #[error("{program:?} was terminated by a signal")]
    Terminated { program: String },
}

/// Run `packwiz refresh --build` inside a composed build.
///
/// # Errors
///
/// Returns an error if `packwiz` can't be started, or doesn't exit
/// successfully.
#[instrument]
pub fn refresh(packwiz: &str, directory: &Path) -> Result<(), RefreshError> {
    info!("Refreshing modpack using packwiz");
    let status = Command::new(packwiz)
        .args(["refresh", "--build"])
        .current_dir(directory)
        .status()
        .map_err(|source| RefreshError::Spawn {
            source,
            program: packwiz.to_owned(),
            directory: directory.to_path_buf(),
        })?;
    match status.code() {
        Some(0) => Ok(()),
        Some(code) => Err(RefreshError::Failed {
            program: packwiz.to_owned(),
            code,
            directory: directory.to_path_buf(),
        }),
        None => Err(RefreshError::Terminated {
            program: packwiz.to_owned(),
        }),
    }
}

/// The ones of `programs` that aren't on `$PATH`.
#[must_use]
pub fn missing_programs<'a>(programs: &[&'a str]) -> Vec<&'a str> {
    programs
        .iter()
        .copied()
        .filter(|program| which::which(program).is_err())
        .collect()
}

/// Warn about every program a build needs that isn't on `$PATH`.
///
/// A missing program isn't fatal here, promoting or changing settings works
/// without either.
pub fn check_dependencies(packwiz: &str) {
    for program in missing_programs(&["git", packwiz]) {
        warn!(program, "Not installed or not found in $PATH");
    }
}
