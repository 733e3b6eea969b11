use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use git2::build::CheckoutBuilder;
use git2::{AnnotatedCommit, FetchOptions, Repository};
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_REMOTE: &str = "origin";

/// A local working copy of `PackFramework`.
pub struct GitRepository {
    raw_repository: Repository,
}

#[derive(thiserror::Error, Debug)]
pub enum GitError {
    #[error("Failed to interact with the underlying Git repository")]
    Git2(#[from] git2::Error),

    #[error("The working copy at {0:?} has no branch checked out")]
    DetachedHead(PathBuf),

    #[error("The local branch {branch:?} has diverged from its remote, refusing to merge")]
    Diverged { branch: String },
}

pub type Result<T> = std::result::Result<T, GitError>;

/// What [`sync`] had to do to bring the working copy up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SyncOutcome {
    /// There was no working copy, so a fresh one was cloned.
    Cloned,
    /// The working copy already matched the remote.
    UpToDate,
    /// New commits were fast-forwarded into the working copy.
    FastForwarded,
}

impl From<Repository> for GitRepository {
    fn from(raw_repository: Repository) -> Self {
        Self { raw_repository }
    }
}

impl Deref for GitRepository {
    type Target = Repository;

    fn deref(&self) -> &Self::Target {
        &self.raw_repository
    }
}

impl DerefMut for GitRepository {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.raw_repository
    }
}

impl GitRepository {
    #[instrument]
    pub fn clone_remote(url: &Url, path: &Path) -> Result<Self> {
        info!("PackFramework folder not found, cloning repository");
        Ok(Repository::clone(url.as_str(), path)?.into())
    }

    pub fn open(path: &Path) -> Result<Self> {
        Ok(Repository::open(path)?.into())
    }

    /// `git pull --ff-only` for the checked out branch.
    ///
    /// Uncommitted changes are kept, unless the fetched commits touch the
    /// same files, in which case nothing is changed and an error is returned.
    #[instrument(skip(self), fields(path = ?self.path()))]
    pub fn pull(&self) -> Result<SyncOutcome> {
        info!("Found a PackFramework folder, trying to update");
        let head = self.raw_repository.head()?;
        let branch = match (head.is_branch(), head.shorthand()) {
            (true, Some(branch)) => branch.to_owned(),
            _ => return Err(GitError::DetachedHead(self.path().to_path_buf())),
        };

        let mut remote = self.raw_repository.find_remote(DEFAULT_REMOTE)?;
        let mut options = FetchOptions::new();
        options.download_tags(git2::AutotagOption::All);
        remote.fetch(&[branch.as_str()], Some(&mut options), None)?;

        let fetch_head = self.raw_repository.find_reference("FETCH_HEAD")?;
        let fetched = self.raw_repository.reference_to_annotated_commit(&fetch_head)?;
        self.fast_forward(&branch, &fetched)
    }

    fn fast_forward(&self, branch: &str, fetched: &AnnotatedCommit<'_>) -> Result<SyncOutcome> {
        let (analysis, _) = self.raw_repository.merge_analysis(&[fetched])?;
        if analysis.is_up_to_date() {
            return Ok(SyncOutcome::UpToDate);
        }
        if !analysis.is_fast_forward() {
            return Err(GitError::Diverged {
                branch: branch.to_owned(),
            });
        }

        // The working tree goes first: a conflict with uncommitted changes
        // must leave the branch where it was.
        let target = self.raw_repository.find_object(fetched.id(), None)?;
        self.raw_repository
            .checkout_tree(&target, Some(CheckoutBuilder::default().safe()))?;

        let refname = format!("refs/heads/{branch}");
        let mut reference = self.raw_repository.find_reference(&refname)?;
        let message = format!("fast-forward {branch} to {}", fetched.id());
        reference.set_target(fetched.id(), &message)?;
        self.raw_repository.set_head(&refname)?;
        Ok(SyncOutcome::FastForwarded)
    }
}

/// Make sure `path` holds an up-to-date working copy of `url`: pull if it's
/// there already, clone it otherwise.
///
/// # Errors
///
/// Returns an error if the clone, fetch or checkout fails, or if the working
/// copy can't be fast-forwarded.
#[instrument]
pub fn sync(url: &Url, path: &Path) -> Result<SyncOutcome> {
    if path.exists() {
        GitRepository::open(path)?.pull()
    } else {
        GitRepository::clone_remote(url, path).map(|_| SyncOutcome::Cloned)
    }
}
