//! ## Layered composition
//!
//! A build of some [`Variant`] is produced by copying a stack of directories
//! into one output directory, later layers overwriting earlier ones:
//!
//! ```not-rust
//! framework/packwiz/<loader>/<mc>/<variant>/   (always)
//! mod/<loader>/all/server/                     (always)
//! mod/<loader>/all/nano/                       (nano, giga)
//! mod/<loader>/all/giga/                       (giga)
//! ```
//!
//! Once everything is in place, an [`ExclusionManifest`] left in the output
//! by one of the layers gets applied and deleted.

use std::path::{Path, PathBuf};
use std::{fs, io};

use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::instance::{Loader, MinecraftVersion};
use crate::layout::Layout;
use crate::variant::Variant;

mod exclusion;
pub use exclusion::*;

/// What [`compose`] ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Composition {
    /// The freshly composed output directory.
    pub output: PathBuf,
    /// Layers that were actually copied, in order.
    pub applied_layers: Vec<PathBuf>,
    /// Layers that were skipped because they don't exist.
    pub missing_layers: Vec<PathBuf>,
    /// Paths deleted because of an [`ExclusionManifest`].
    pub removed: Vec<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("An I/O error occurred, path at fault: {path:?}")]
    Io { source: io::Error, path: PathBuf },

    #[error("Failed to walk a layer directory")]
    Walkdir(#[from] walkdir::Error),
}

impl ComposeError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { source, path }
    }
}

pub type Result<T> = std::result::Result<T, ComposeError>;

/// The source directories of `variant`, lowest precedence first.
#[must_use]
pub fn layers(
    layout: &Layout,
    loader: Loader,
    minecraft_version: &MinecraftVersion,
    variant: Variant,
) -> Vec<PathBuf> {
    std::iter::once(layout.framework_manifest(loader, minecraft_version, variant))
        .chain(variant.layers().map(|layer| layout.shared_layer(loader, layer)))
        .collect()
}

/// Wipe the output directory of `variant` and compose it from scratch.
///
/// # Errors
///
/// Returns an error if the output directory can't be cleaned, or if any file
/// fails to copy or get excluded. There is no rollback, the output directory
/// is left as-is when that happens.
#[instrument(skip(layout), fields(root = ?layout.root()))]
pub fn compose(
    layout: &Layout,
    loader: Loader,
    minecraft_version: &MinecraftVersion,
    variant: Variant,
) -> Result<Composition> {
    let output = layout.output(loader, minecraft_version, variant);
    info!(?output, "Building {minecraft_version}-{variant}");
    recreate_dir(&output)?;

    let mut applied_layers = vec![];
    let mut missing_layers = vec![];
    for layer in layers(layout, loader, minecraft_version, variant) {
        if layer.is_dir() {
            overlay(&layer, &output)?;
            applied_layers.push(layer);
        } else {
            warn!(?layer, "Layer directory not found, skipping it");
            missing_layers.push(layer);
        }
    }

    let removed = match ExclusionManifest::take(&output)? {
        Some(manifest) => {
            info!(entries = manifest.entries().len(), "Removing files from the list");
            manifest.apply(&output)?
        }
        None => vec![],
    };

    Ok(Composition {
        output,
        applied_layers,
        missing_layers,
        removed,
    })
}

/// Remove `path` recursively if it exists, then create it again (empty).
///
/// # Errors
///
/// Returns an error if either step fails.
pub fn recreate_dir(path: &Path) -> Result<()> {
    if fs::exists(path).map_err(ComposeError::io(path))? {
        debug!(?path, "Cleaning up old files");
        remove_any(path).map_err(ComposeError::io(path))?;
    }
    fs::create_dir_all(path).map_err(ComposeError::io(path))
}

/// Copy everything under `source` into `destination`, overwriting whatever
/// is already there.
///
/// When a file in `source` collides with a directory in `destination` (or the
/// other way around), the entry from `source` wins.
///
/// # Errors
///
/// Returns an error if `source` can't be traversed or anything fails to copy.
#[instrument(level = "debug")]
pub fn overlay(source: &Path, destination: &Path) -> Result<()> {
    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .unwrap_or_else(|_| entry.path());
        let target = destination.join(relative);
        let target_metadata = fs::symlink_metadata(&target).ok();

        if entry.file_type().is_dir() {
            if target_metadata.is_some_and(|metadata| !metadata.is_dir()) {
                fs::remove_file(&target).map_err(ComposeError::io(&target))?;
            }
            fs::create_dir_all(&target).map_err(ComposeError::io(&target))?;
        } else {
            if target_metadata.is_some_and(|metadata| metadata.is_dir()) {
                fs::remove_dir_all(&target).map_err(ComposeError::io(&target))?;
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(ComposeError::io(parent))?;
            }
            fs::copy(entry.path(), &target).map_err(ComposeError::io(entry.path()))?;
        }
    }

    Ok(())
}

/// Remove a file or a whole directory tree.
pub(crate) fn remove_any(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempdir::TempDir;

    use super::*;

    #[test]
    fn overlay_replaces_directory_with_file() {
        let dir = TempDir::new("packframeworker-overlay").unwrap();
        let (source, destination) = (dir.path().join("src"), dir.path().join("dst"));
        fs::create_dir_all(destination.join("config/thing")).unwrap();
        fs::write(destination.join("config/thing/inner.txt"), "old").unwrap();
        fs::create_dir_all(source.join("config")).unwrap();
        fs::write(source.join("config/thing"), "new").unwrap();

        overlay(&source, &destination).unwrap();

        assert!(destination.join("config/thing").is_file());
        assert_eq!(fs::read_to_string(destination.join("config/thing")).unwrap(), "new");
    }

    #[test]
    fn overlay_replaces_file_with_directory() {
        let dir = TempDir::new("packframeworker-overlay").unwrap();
        let (source, destination) = (dir.path().join("src"), dir.path().join("dst"));
        fs::create_dir_all(&destination).unwrap();
        fs::write(destination.join("mods"), "not a directory").unwrap();
        fs::create_dir_all(source.join("mods")).unwrap();
        fs::write(source.join("mods/a.pw.toml"), "a").unwrap();

        overlay(&source, &destination).unwrap();

        assert_eq!(fs::read_to_string(destination.join("mods/a.pw.toml")).unwrap(), "a");
    }

    #[test]
    fn recreate_dir_empties_existing_directory() {
        let dir = TempDir::new("packframeworker-recreate").unwrap();
        let target = dir.path().join("out");
        fs::create_dir_all(target.join("nested")).unwrap();
        fs::write(target.join("nested/stale.txt"), "stale").unwrap();

        recreate_dir(&target).unwrap();

        assert!(target.is_dir());
        assert_eq!(fs::read_dir(&target).unwrap().count(), 0);
    }
}
