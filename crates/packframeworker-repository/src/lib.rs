#![allow(clippy::missing_errors_doc)]

use packframeworker_pack::Settings;

use crate::local::persist::PersistedEntity;

mod git;
mod local;
pub use git::*;
pub use local::*;

impl PersistedEntity for Settings {
    const FILE_PATH: &'static str = "packframeworker.yml";
}
