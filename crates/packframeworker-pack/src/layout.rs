use std::path::{Path, PathBuf};

use crate::instance::{Loader, MinecraftVersion};
use crate::variant::Variant;

/// The directory structure of a **PackFrameworker** installation.
///
/// ```not-rust
/// <root>/
///     CHANGELOG.md
///     framework/                       <- PackFramework's working copy
///         packwiz/<loader>/<mc>/<variant>/
///     mod/<loader>/all/
///         server/
///         nano/
///         giga/
///     beta/
///         lastVersion.txt
///         <loader>/<mc>/<variant>/     <- build output
///     release/                         <- promoted copy of `beta/`
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub const FRAMEWORK_DIRECTORY: &'static str = "framework";
    pub const MOD_DIRECTORY: &'static str = "mod";
    pub const SHARED_LAYER_DIRECTORY: &'static str = "all";
    pub const PACKWIZ_DIRECTORY: &'static str = "packwiz";
    pub const BETA_DIRECTORY: &'static str = "beta";
    pub const RELEASE_DIRECTORY: &'static str = "release";
    pub const LAST_VERSION_FILE: &'static str = "lastVersion.txt";
    pub const CHANGELOG_FILE: &'static str = "CHANGELOG.md";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn framework(&self) -> PathBuf {
        self.root.join(Self::FRAMEWORK_DIRECTORY)
    }

    /// `framework/packwiz/<loader>/<mc>/<variant>`, the first layer of every
    /// build.
    #[must_use]
    pub fn framework_manifest(
        &self,
        loader: Loader,
        minecraft_version: &MinecraftVersion,
        variant: Variant,
    ) -> PathBuf {
        self.framework()
            .join(Self::PACKWIZ_DIRECTORY)
            .join(loader.to_string())
            .join(minecraft_version.to_string())
            .join(variant.to_string())
    }

    /// `mod/<loader>/all/<layer>`
    #[must_use]
    pub fn shared_layer(&self, loader: Loader, layer: Variant) -> PathBuf {
        self.root
            .join(Self::MOD_DIRECTORY)
            .join(loader.to_string())
            .join(Self::SHARED_LAYER_DIRECTORY)
            .join(layer.to_string())
    }

    #[must_use]
    pub fn beta(&self) -> PathBuf {
        self.root.join(Self::BETA_DIRECTORY)
    }

    #[must_use]
    pub fn release(&self) -> PathBuf {
        self.root.join(Self::RELEASE_DIRECTORY)
    }

    #[must_use]
    pub fn last_version_file(&self) -> PathBuf {
        self.beta().join(Self::LAST_VERSION_FILE)
    }

    #[must_use]
    pub fn changelog(&self) -> PathBuf {
        self.root.join(Self::CHANGELOG_FILE)
    }

    /// `beta/<loader>/<mc>/<variant>`, wiped on every build.
    #[must_use]
    pub fn output(
        &self,
        loader: Loader,
        minecraft_version: &MinecraftVersion,
        variant: Variant,
    ) -> PathBuf {
        self.beta()
            .join(loader.to_string())
            .join(minecraft_version.to_string())
            .join(variant.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn paths() {
        let layout = Layout::new("/srv/pack");
        let version = MinecraftVersion::try_new("1.20.1").unwrap();

        assert_eq!(
            layout.framework_manifest(Loader::Forge, &version, Variant::Nano),
            PathBuf::from("/srv/pack/framework/packwiz/forge/1.20.1/nano"),
        );
        assert_eq!(
            layout.shared_layer(Loader::Forge, Variant::Giga),
            PathBuf::from("/srv/pack/mod/forge/all/giga"),
        );
        assert_eq!(
            layout.output(Loader::Fabric, &version, Variant::Server),
            PathBuf::from("/srv/pack/beta/fabric/1.20.1/server"),
        );
        assert_eq!(
            layout.last_version_file(),
            PathBuf::from("/srv/pack/beta/lastVersion.txt"),
        );
    }
}
