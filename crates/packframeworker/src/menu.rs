use std::fmt;
use std::str::FromStr;

use color_eyre::eyre::Report;
use color_eyre::owo_colors::OwoColorize;
use eyre::Context;
use inquire::InquireError;
use inquire::validator::Validation;
use packframeworker_pack::promote::promote;
use packframeworker_pack::{Layout, Loader, MinecraftVersion, PackVersion, Settings};
use packframeworker_repository::VersionStore;
use packframeworker_repository::persist::PersistedEntity;
use strum::IntoEnumIterator;
use tracing::{info, instrument};

use crate::build;

pub const INVALID_CHOICE: &str = "I'm sorry, but it seems you've selected the wrong option.";

/// An entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter)]
pub enum MenuChoice {
    Build,
    Promote,
    Settings,
    Exit,
}

impl MenuChoice {
    /// What the user types to pick this entry.
    #[must_use]
    pub const fn key(self) -> char {
        match self {
            Self::Build => '1',
            Self::Promote => '2',
            Self::Settings => '3',
            Self::Exit => '0',
        }
    }
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Build => "Build",
            Self::Promote => "Copy Beta to Release folders",
            Self::Settings => "Change settings",
            Self::Exit => "Exit",
        };
        write!(f, "{}) {label}", self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("There is no menu entry {0:?}")]
pub struct InvalidChoice(String);

impl FromStr for MenuChoice {
    type Err = InvalidChoice;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        Self::iter()
            .find(|choice| input == choice.key().to_string())
            .ok_or_else(|| InvalidChoice(input.to_owned()))
    }
}

/// Show the menu and carry out whatever is picked, until the user exits.
///
/// A failing action is reported and the menu is shown again.
///
/// # Errors
///
/// Only fails if the terminal can't be prompted.
pub fn run(layout: &Layout, mut settings: Settings) -> Result<(), Report> {
    loop {
        println!(
            "{}",
            format!("[PackFrameworker {}]", env!("CARGO_PKG_VERSION")).bold().yellow()
        );
        println!("Select an action:");
        for choice in MenuChoice::iter() {
            println!("{choice}");
        }

        let input = match inquire::Text::new("Enter number:").prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(error) => return Err(error).wrap_err("Failed to prompt for a menu entry"),
        };

        let outcome = match input.parse::<MenuChoice>() {
            Ok(MenuChoice::Exit) => return Ok(()),
            Ok(MenuChoice::Build) => prompt_version(layout)
                .and_then(|version| build::run(layout, &settings, &version)),
            Ok(MenuChoice::Promote) => promote(layout)
                .map(|_| ())
                .wrap_err("Failed to copy beta to release"),
            Ok(MenuChoice::Settings) => change_settings(layout, &settings).map(|changed| {
                settings = changed;
            }),
            Err(_) => {
                eprintln!("{}", INVALID_CHOICE.red());
                continue;
            }
        };

        if let Err(report) = outcome {
            eprintln!("{report:?}");
        }
    }
}

/// Ask for the version to build, defaulting to the last one built, and
/// remember the answer.
///
/// # Errors
///
/// Fails if the prompt fails or the version can't be stored.
#[instrument(skip(layout))]
pub fn prompt_version(layout: &Layout) -> Result<PackVersion, Report> {
    let store = VersionStore::new(layout);
    let previous = store.read()?;
    let help = match &previous {
        Some(previous) => format!("Press Enter to keep '{previous}'"),
        None => "No version was built before".to_owned(),
    };
    let has_previous = previous.is_some();
    let input = inquire::Text::new("Select the new modpack version:")
        .with_help_message(&help)
        .with_validator(move |input: &str| {
            Ok(match has_previous || !input.trim().is_empty() {
                true => Validation::Valid,
                false => Validation::Invalid("Please enter a version".into()),
            })
        })
        .prompt()
        .wrap_err("Failed to prompt for the modpack version")?;
    Ok(store.select(&input)?)
}

/// Ask for the Minecraft version and the modloader from scratch.
///
/// # Errors
///
/// Fails if a prompt fails.
pub fn prompt_settings() -> Result<Settings, Report> {
    println!("Configuration file not found. Please enter the following settings:");
    let minecraft_version = inquire::Text::new("Minecraft version:")
        .with_placeholder("1.20.1")
        .with_validator(|input: &str| {
            Ok(match MinecraftVersion::try_new(input) {
                Ok(_) => Validation::Valid,
                Err(_) => Validation::Invalid("Please enter a non-empty version".into()),
            })
        })
        .prompt()
        .wrap_err("Failed to prompt for a Minecraft version")?;
    let loader = inquire::Select::new("Modloader:", Loader::iter().collect())
        .prompt()
        .wrap_err("Failed to prompt for a modloader")?;
    Ok(Settings::new(MinecraftVersion::try_new(minecraft_version)?, loader))
}

/// Let the user change the Minecraft version and loader, and persist the
/// result.
///
/// # Errors
///
/// Fails if a prompt fails or the settings can't be written.
#[instrument(skip_all)]
pub fn change_settings(layout: &Layout, current: &Settings) -> Result<Settings, Report> {
    println!("Current settings:");
    println!("1) Minecraft version: {}", current.minecraft_version);
    println!("2) Modloader: {}", current.loader);

    let minecraft_version = inquire::Text::new("Minecraft version:")
        .with_help_message("Press Enter to keep current")
        .prompt()
        .wrap_err("Failed to prompt for a Minecraft version")?;
    let loaders = Loader::iter().collect::<Vec<_>>();
    let cursor = loaders.iter().position(|loader| *loader == current.loader).unwrap_or(0);
    let loader = inquire::Select::new("Modloader:", loaders)
        .with_starting_cursor(cursor)
        .prompt()
        .wrap_err("Failed to prompt for a modloader")?;

    let changed = apply_changes(current, &minecraft_version, loader);
    changed.write(layout.root())?;
    info!("Settings updated");
    Ok(changed)
}

/// `current` with the non-blank answers applied.
pub fn apply_changes(current: &Settings, minecraft_version: &str, loader: Loader) -> Settings {
    let mut changed = current.clone();
    if let Ok(minecraft_version) = MinecraftVersion::try_new(minecraft_version) {
        changed.minecraft_version = minecraft_version;
    }
    changed.loader = loader;
    changed
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("1", MenuChoice::Build)]
    #[case(" 2 ", MenuChoice::Promote)]
    #[case("3\n", MenuChoice::Settings)]
    #[case("0", MenuChoice::Exit)]
    fn valid_choices(#[case] input: &str, #[case] expected: MenuChoice) {
        assert_eq!(input.parse::<MenuChoice>(), Ok(expected));
    }

    #[rstest]
    #[case("")]
    #[case("4")]
    #[case("11")]
    #[case("build")]
    fn invalid_choices(#[case] input: &str) {
        assert!(input.parse::<MenuChoice>().is_err());
    }

    #[test]
    fn menu_lines() {
        let lines = MenuChoice::iter().map(|choice| choice.to_string()).collect::<Vec<_>>();
        assert_eq!(
            lines,
            ["1) Build", "2) Copy Beta to Release folders", "3) Change settings", "0) Exit"]
        );
    }

    #[rstest]
    #[case("", Loader::Forge, "1.20.1", Loader::Forge)]
    #[case("  ", Loader::Fabric, "1.20.1", Loader::Fabric)]
    #[case("1.21.1", Loader::Neoforge, "1.21.1", Loader::Neoforge)]
    fn changing_settings(
        #[case] minecraft_version: &str,
        #[case] loader: Loader,
        #[case] expected_version: &str,
        #[case] expected_loader: Loader,
    ) {
        let current = Settings::new(MinecraftVersion::try_new("1.20.1").unwrap(), Loader::Forge);
        let changed = apply_changes(&current, minecraft_version, loader);
        assert_eq!(changed.minecraft_version.to_string(), expected_version);
        assert_eq!(changed.loader, expected_loader);
        assert_eq!(changed.framework_url, current.framework_url);
    }
}
