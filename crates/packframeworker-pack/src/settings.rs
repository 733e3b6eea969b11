//! Per-installation configuration for **PackFrameworker**.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::instance::{Loader, MinecraftVersion};

pub const DEFAULT_FRAMEWORK_URL: &str = "https://github.com/Den4enko/PackFramework";
pub const DEFAULT_PLACEHOLDER: &str = "noVersion";
pub const DEFAULT_PACKWIZ: &str = "packwiz";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Settings {
    pub minecraft_version: MinecraftVersion,
    pub loader: Loader,

    /// Where to clone `PackFramework` from.
    #[serde(default = "default_framework_url")]
    pub framework_url: Url,

    /// The token in pack files that gets replaced with the pack version.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Name of (or path to) the `packwiz` executable.
    #[serde(default = "default_packwiz")]
    pub packwiz: String,
}

impl Settings {
    /// Settings for `minecraft_version` and `loader`, everything else at its
    /// default.
    pub fn new(minecraft_version: MinecraftVersion, loader: Loader) -> Self {
        Self {
            minecraft_version,
            loader,
            framework_url: default_framework_url(),
            placeholder: default_placeholder(),
            packwiz: default_packwiz(),
        }
    }
}

fn default_framework_url() -> Url {
    // NOTE: The constant is a valid URL, this can't fail.
    Url::parse(DEFAULT_FRAMEWORK_URL).unwrap_or_else(|_| unreachable!())
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_owned()
}

fn default_packwiz() -> String {
    DEFAULT_PACKWIZ.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let version = MinecraftVersion::try_new("1.20.1").unwrap();
        let settings = Settings::new(version, Loader::Forge);
        assert_eq!(settings.framework_url.as_str(), DEFAULT_FRAMEWORK_URL);
        assert_eq!(settings.placeholder, "noVersion");
        assert_eq!(settings.packwiz, "packwiz");
    }
}
