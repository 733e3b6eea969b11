//! Types describing *what* is being built: the game version, the modloader
//! and the version of the modpack itself.

use nutype::nutype;
use serde::{Deserialize, Serialize};

/// A Minecraft version, as it appears in `PackFramework`'s directory names.
///
/// No attempt is made to understand the version, it is only ever used as a
/// path segment (`framework/packwiz/<loader>/<minecraft_version>/...`).
#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(
        TryFrom,
        Into,
        AsRef,
        Serialize,
        Deserialize,
        PartialEq,
        Eq,
        Display,
        Clone,
        Debug,
    )
)]
pub struct MinecraftVersion(String);

/// The version of the modpack being built.
///
/// This is whatever the user typed in, e.g. `2.3.1` or `beta-7`.
#[nutype(
    sanitize(trim),
    derive(
        From,
        Into,
        AsRef,
        Serialize,
        Deserialize,
        PartialEq,
        Eq,
        Display,
        Clone,
        Debug,
    )
)]
pub struct PackVersion(String);

impl PackVersion {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        AsRef::<str>::as_ref(self).is_empty()
    }
}

/// Modloaders `PackFramework` ships manifests for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum::EnumIter,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Loader {
    /// The [**Forge**](https://minecraftforge.net) modloader.
    Forge,

    /// The [**NeoForge**](https://neoforged.net) modloader.
    Neoforge,

    /// The [**Fabric**](https://fabricmc.net) modloader.
    Fabric,

    /// The [**Quilt**](https://quiltmc.org/en) modloader.
    Quilt,
}
