mod build;
mod cli;
mod menu;
mod tools;

use std::io;

use clap::{CommandFactory, Parser};
use color_eyre::Section;
use color_eyre::eyre::Report;
use eyre::Context;
use packframeworker_pack::promote::{PromoteError, promote};
use packframeworker_pack::{Layout, Settings};
use packframeworker_repository::persist::{PersistError, PersistedEntity};
use packframeworker_repository::{VersionStore, VersionStoreError};
use tracing::instrument;

use crate::cli::{Options, Subcommand};

fn main() -> Result<(), Report> {
    let options = Options::parse();
    color_eyre::install()?;
    install_tracing()?;

    let status = run_with_options(options);
    if let Err(mut report) = status {
        if let Some(error) = report.downcast_ref::<PersistError>() {
            match error {
                PersistError::Io { .. } => {
                    report = report
                        .with_note(|| "PackFrameworker encountered an I/O error.")
                        .with_suggestion(|| {
                            "Ensure you're in the right directory and have enough permissions."
                        });
                }
                PersistError::SerdeYml(_) => {
                    report = report
                        .with_note(|| "The settings file is not valid YAML.")
                        .with_suggestion(|| {
                            format!("Fix or delete `{}` to be asked again.", Settings::FILE_PATH)
                        });
                }
            }
        } else if let Some(PromoteError::NoBeta(_)) = report.downcast_ref::<PromoteError>() {
            report = report.with_suggestion(|| "Build the modpack at least once first.");
        } else if let Some(VersionStoreError::NoVersion) =
            report.downcast_ref::<VersionStoreError>()
        {
            report = report.with_suggestion(|| "Pass a version with `--pack-version`.");
        }

        return Err(report);
    }

    Ok(())
}

#[instrument(name = "action_handling")]
fn run_with_options(options: Options) -> Result<(), Report> {
    let layout = Layout::new(&options.root);

    match options.subcommand {
        None => {
            let settings = load_settings(&layout)?;
            tools::check_dependencies(&settings.packwiz);
            menu::run(&layout, settings)
        }

        Some(Subcommand::Build { pack_version }) => {
            let settings = load_settings(&layout)?;
            tools::check_dependencies(&settings.packwiz);
            let version = match pack_version {
                Some(input) => VersionStore::new(&layout).select(&input)?,
                None => menu::prompt_version(&layout)?,
            };
            build::run(&layout, &settings, &version)
        }

        Some(Subcommand::Promote) => promote(&layout)
            .map(|_| ())
            .wrap_err("Failed to copy beta to release"),

        Some(Subcommand::Completions { shell }) => {
            let mut command = Options::command();
            let bin_name = env!("CARGO_CRATE_NAME");
            let mut stdout = io::stdout();
            clap_complete::generate(shell, &mut command, bin_name, &mut stdout);
            Ok(())
        }
    }
}

/// Read the settings of the installation, asking for them (and saving them)
/// if there are none yet.
fn load_settings(layout: &Layout) -> Result<Settings, Report> {
    match Settings::read(layout.root()) {
        Ok(settings) => Ok(settings),
        Err(error) if error.is_not_found() => {
            let settings = menu::prompt_settings()?;
            settings.write(layout.root())?;
            Ok(settings)
        }
        Err(error) => Err(error.into()),
    }
}

fn install_tracing() -> Result<(), Report> {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};
    let format_layer = fmt::layer().pretty().without_time().with_writer(io::stderr);
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(format_layer)
        .with(ErrorLayer::default())
        .try_init()?;
    Ok(())
}
