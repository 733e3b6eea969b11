use std::fs;
use std::path::Path;

use color_eyre::eyre::Report;
use git2::{Repository, Signature};
use packframeworker_pack::{Layout, Loader, MinecraftVersion, PackVersion, Settings};
use packframeworker_repository::persist::PersistedEntity;
use packframeworker_repository::{SyncOutcome, VersionStore, VersionStoreError, sync};
use rstest::{fixture, rstest};
use tempdir::TempDir;
use url::Url;

const TEMPDIR_PREFIX: &str = "packframeworker-repository-test";

#[fixture]
fn dir() -> TempDir {
    TempDir::new(TEMPDIR_PREFIX).unwrap()
}

#[rstest]
fn settings_persistence(dir: TempDir) -> Result<(), Report> {
    let settings = Settings::new(MinecraftVersion::try_new("1.20.1")?, Loader::Neoforge);
    settings.write(dir.path())?;
    assert_eq!(Settings::read(dir.path())?, settings);
    Ok(())
}

#[rstest]
fn settings_defaults_are_filled_in(dir: TempDir) -> Result<(), Report> {
    fs::write(
        dir.path().join(Settings::FILE_PATH),
        "minecraft_version: 1.20.1\nloader: forge\n",
    )?;
    let settings = Settings::read(dir.path())?;
    assert_eq!(
        settings,
        Settings::new(MinecraftVersion::try_new("1.20.1")?, Loader::Forge)
    );
    Ok(())
}

#[rstest]
fn missing_settings(dir: TempDir) {
    let error = Settings::read(dir.path()).unwrap_err();
    assert!(error.is_not_found());
}

#[rstest]
fn empty_input_keeps_stored_version(dir: TempDir) -> Result<(), Report> {
    let store = VersionStore::new(&Layout::new(dir.path()));
    assert_eq!(store.read()?, None);

    assert_eq!(store.select("2.0.0-beta.1")?, PackVersion::new("2.0.0-beta.1"));
    assert_eq!(fs::read_to_string(store.path())?, "2.0.0-beta.1");

    assert_eq!(store.select("")?, PackVersion::new("2.0.0-beta.1"));
    assert_eq!(fs::read_to_string(store.path())?, "2.0.0-beta.1");

    assert_eq!(store.select("2.0.0")?, PackVersion::new("2.0.0"));
    assert_eq!(store.read()?, Some(PackVersion::new("2.0.0")));
    Ok(())
}

#[rstest]
fn no_version_at_all(dir: TempDir) {
    let store = VersionStore::new(&Layout::new(dir.path()));
    assert!(matches!(store.select("  "), Err(VersionStoreError::NoVersion)));
    assert!(!store.path().exists());
}

fn commit_file(repository: &Repository, name: &str, contents: &str) -> Result<(), Report> {
    let workdir = repository.workdir().ok_or(color_eyre::eyre::eyre!("bare repository"))?;
    fs::write(workdir.join(name), contents)?;
    let mut index = repository.index()?;
    index.add_path(Path::new(name))?;
    index.write()?;
    let tree = repository.find_tree(index.write_tree()?)?;
    let signature = Signature::now("PackFrameworker", "tests@packframeworker.invalid")?;
    let parent = repository.head().ok().and_then(|head| head.peel_to_commit().ok());
    let parents = parent.iter().collect::<Vec<_>>();
    repository.commit(Some("HEAD"), &signature, &signature, name, &tree, &parents)?;
    Ok(())
}

#[rstest]
fn clone_then_pull(dir: TempDir) -> Result<(), Report> {
    let upstream_path = dir.path().join("upstream");
    let upstream = Repository::init(&upstream_path)?;
    commit_file(&upstream, "README.md", "first")?;
    let url = Url::from_directory_path(&upstream_path)
        .map_err(|()| color_eyre::eyre::eyre!("not an absolute path"))?;

    let framework = Layout::new(dir.path()).framework();
    assert_eq!(sync(&url, &framework)?, SyncOutcome::Cloned);
    assert_eq!(fs::read_to_string(framework.join("README.md"))?, "first");

    assert_eq!(sync(&url, &framework)?, SyncOutcome::UpToDate);

    commit_file(&upstream, "README.md", "second")?;
    assert_eq!(sync(&url, &framework)?, SyncOutcome::FastForwarded);
    assert_eq!(fs::read_to_string(framework.join("README.md"))?, "second");
    Ok(())
}

#[rstest]
fn pull_keeps_uncommitted_changes(dir: TempDir) -> Result<(), Report> {
    let upstream_path = dir.path().join("upstream");
    let upstream = Repository::init(&upstream_path)?;
    commit_file(&upstream, "README.md", "first")?;
    commit_file(&upstream, "local.txt", "tracked")?;
    let url = Url::from_directory_path(&upstream_path)
        .map_err(|()| color_eyre::eyre::eyre!("not an absolute path"))?;

    let framework = Layout::new(dir.path()).framework();
    sync(&url, &framework)?;
    fs::write(framework.join("local.txt"), "edited locally")?;

    commit_file(&upstream, "README.md", "second")?;
    assert_eq!(sync(&url, &framework)?, SyncOutcome::FastForwarded);
    assert_eq!(fs::read_to_string(framework.join("README.md"))?, "second");
    assert_eq!(fs::read_to_string(framework.join("local.txt"))?, "edited locally");
    Ok(())
}

#[rstest]
fn conflicting_pull_changes_nothing(dir: TempDir) -> Result<(), Report> {
    let upstream_path = dir.path().join("upstream");
    let upstream = Repository::init(&upstream_path)?;
    commit_file(&upstream, "local.txt", "tracked")?;
    let url = Url::from_directory_path(&upstream_path)
        .map_err(|()| color_eyre::eyre::eyre!("not an absolute path"))?;

    let framework = Layout::new(dir.path()).framework();
    sync(&url, &framework)?;
    let before = Repository::open(&framework)?.head()?.peel_to_commit()?.id();
    fs::write(framework.join("local.txt"), "edited locally")?;

    commit_file(&upstream, "local.txt", "changed upstream")?;
    assert!(sync(&url, &framework).is_err());
    assert_eq!(fs::read_to_string(framework.join("local.txt"))?, "edited locally");
    let after = Repository::open(&framework)?.head()?.peel_to_commit()?.id();
    assert_eq!(before, after);
    Ok(())
}
