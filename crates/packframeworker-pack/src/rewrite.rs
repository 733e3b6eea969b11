//! Stamping the pack version into a composed build.
//!
//! `PackFramework` ships its files with a placeholder token (`noVersion` by
//! default) wherever the pack version should appear. This is a plain literal
//! find-and-replace, there's no templating or escaping of any kind.

use std::path::{Path, PathBuf};
use std::{fs, io};

use tracing::{debug, instrument, warn};

use crate::instance::PackVersion;
use crate::layout::Layout;
use crate::variant::Variant;

/// Files that carry the placeholder in every variant.
pub const COMMON_TARGETS: &[&str] = &["pack.toml", "config/bcc-common.toml"];

/// Files that only client variants carry.
pub const CLIENT_TARGETS: &[&str] = &["config/fancymenu/custom_locals/mod/en_us.local"];

/// Name of the changelog inside a client build.
pub const CHANGELOG_TARGET: &str = "changelog.md";

#[derive(Debug, thiserror::Error)]
#[error("Failed to rewrite {path:?}")]
pub struct RewriteError {
    source: io::Error,
    path: PathBuf,
}

impl RewriteError {
    fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self { source, path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// The result of rewriting a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rewrite {
    /// The file doesn't exist, nothing was done.
    Missing,
    /// The file was rewritten, replacing this many occurrences.
    Replaced(usize),
}

/// Replace every occurrence of `token` in the file at `path` with `version`.
///
/// A file without a single occurrence is left untouched.
///
/// # Errors
///
/// Returns an error if the file exists but can't be read or written.
#[instrument(level = "debug")]
pub fn replace_token(
    path: &Path,
    token: &str,
    version: &PackVersion,
) -> Result<Rewrite, RewriteError> {
    if !path.is_file() {
        return Ok(Rewrite::Missing);
    }
    let contents = fs::read_to_string(path).map_err(RewriteError::io(path))?;
    let occurrences = match token.is_empty() {
        true => 0,
        false => contents.matches(token).count(),
    };
    if occurrences > 0 {
        let rewritten = contents.replace(token, version.as_ref());
        fs::write(path, rewritten).map_err(RewriteError::io(path))?;
    }
    Ok(Rewrite::Replaced(occurrences))
}

/// The files in a `variant` build that carry the placeholder.
pub fn targets(variant: Variant) -> impl Iterator<Item = &'static str> {
    let client_targets: &[&str] = match variant.is_client() {
        true => CLIENT_TARGETS,
        false => &[],
    };
    COMMON_TARGETS.iter().chain(client_targets).copied()
}

/// Stamp `version` into every target of a `variant` build living in `output`
/// and, for client variants, drop the changelog in.
///
/// # Errors
///
/// Returns an error if any existing target can't be rewritten, or the
/// changelog fails to copy.
#[instrument(skip(layout))]
pub fn stamp_version(
    layout: &Layout,
    output: &Path,
    variant: Variant,
    token: &str,
    version: &PackVersion,
) -> Result<Vec<(PathBuf, Rewrite)>, RewriteError> {
    let mut results = vec![];
    for target in targets(variant) {
        let path = output.join(target);
        let rewrite = replace_token(&path, token, version)?;
        match rewrite {
            Rewrite::Missing => debug!(?path, "No such file, not stamping a version"),
            Rewrite::Replaced(count) => debug!(?path, count, "Stamped the version"),
        }
        results.push((path, rewrite));
    }

    if variant.is_client() {
        let changelog = layout.changelog();
        if changelog.is_file() {
            let target = output.join(CHANGELOG_TARGET);
            fs::copy(&changelog, &target).map_err(RewriteError::io(&changelog))?;
        } else {
            warn!(?changelog, "No changelog to ship with the pack");
        }
    }

    Ok(results)
}
