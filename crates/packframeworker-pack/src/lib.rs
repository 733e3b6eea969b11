//! This crate is a part of **[PackFrameworker]**.
//!
//! ## What's in here?
//!
//! The domain types of a layered modpack build ([`Variant`], [`Loader`],
//! [`Settings`]) and the filesystem operations that turn a handful of source
//! directories into a ready-to-refresh `packwiz` pack:
//!
//! - [`compose`] merges the layers of a variant into its output directory,
//! - [`rewrite`] stamps the pack version into a few well-known files,
//! - [`promote`] mirrors the `beta` builds into `release`.
//!
//! Nothing in here talks to the network or prompts the user.
//!
//! [PackFrameworker]: https://github.com/Den4enko/PackFrameworker

pub mod compose;
pub mod instance;
pub mod layout;
pub mod promote;
pub mod rewrite;
pub mod settings;
pub mod variant;

pub use instance::{Loader, MinecraftVersion, PackVersion};
pub use layout::Layout;
pub use settings::Settings;
pub use variant::Variant;
