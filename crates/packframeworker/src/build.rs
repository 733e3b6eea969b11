use std::path::PathBuf;

use color_eyre::Section;
use color_eyre::eyre::Report;
use eyre::Context;
use itertools::Itertools;
use packframeworker_pack::compose::compose;
use packframeworker_pack::rewrite::stamp_version;
use packframeworker_pack::{Layout, PackVersion, Settings, Variant};
use packframeworker_repository::{SyncOutcome, sync};
use strum::IntoEnumIterator;
use tracing::{info, instrument, warn};

use crate::tools;

/// A composed, version-stamped variant waiting for `packwiz`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedVariant {
    pub variant: Variant,
    pub output: PathBuf,
}

/// The whole build: sync the framework, compose and stamp every variant,
/// then let `packwiz` refresh each of them.
///
/// # Errors
///
/// Fails if the framework can't be synced *and* there's no older working
/// copy to fall back to, if any variant fails to compose, or if `packwiz`
/// fails for at least one variant (the others are still refreshed).
#[instrument(skip(layout, settings))]
pub fn run(layout: &Layout, settings: &Settings, version: &PackVersion) -> Result<(), Report> {
    sync_framework(layout, settings)?;
    let composed = compose_variants(layout, settings, version)?;
    refresh_variants(&settings.packwiz, &composed)?;
    info!(%version, "Done");
    Ok(())
}

/// Clone or update `PackFramework`.
///
/// A failed update is only a warning as long as some working copy exists,
/// the build then goes on with whatever is checked out.
///
/// # Errors
///
/// Fails if syncing fails and there's no working copy at all.
pub fn sync_framework(layout: &Layout, settings: &Settings) -> Result<(), Report> {
    let framework = layout.framework();
    let has_working_copy = framework.is_dir();
    match sync(&settings.framework_url, &framework) {
        Ok(outcome @ (SyncOutcome::Cloned | SyncOutcome::FastForwarded)) => {
            info!(%outcome, "PackFramework is now up to date");
            Ok(())
        }
        Ok(SyncOutcome::UpToDate) => {
            info!("PackFramework is already up to date");
            Ok(())
        }
        Err(error) if has_working_copy => {
            let error = Report::new(error);
            warn!(?error, "Failed to update PackFramework, building with the local copy");
            Ok(())
        }
        Err(error) => Err(error)
            .wrap_err("Failed to clone PackFramework")
            .with_note(|| format!("Tried to clone from {}", settings.framework_url))
            .with_suggestion(|| "Check your network connection and the `framework_url` setting."),
    }
}

/// Compose and stamp every variant, in build order.
///
/// # Errors
///
/// Stops at the first variant that fails to compose or stamp.
pub fn compose_variants(
    layout: &Layout,
    settings: &Settings,
    version: &PackVersion,
) -> Result<Vec<ComposedVariant>, Report> {
    let mut composed = vec![];
    for variant in Variant::iter() {
        let composition = compose(layout, settings.loader, &settings.minecraft_version, variant)
            .wrap_err_with(|| format!("Failed to compose the {variant} variant"))?;
        stamp_version(
            layout,
            &composition.output,
            variant,
            &settings.placeholder,
            version,
        )
        .wrap_err_with(|| format!("Failed to stamp the version into the {variant} variant"))?;
        composed.push(ComposedVariant {
            variant,
            output: composition.output,
        });
    }
    Ok(composed)
}

/// Run `packwiz refresh` in every composed variant.
///
/// # Errors
///
/// Fails if at least one refresh failed, listing all of them.
pub fn refresh_variants(packwiz: &str, composed: &[ComposedVariant]) -> Result<(), Report> {
    let failures = composed
        .iter()
        .filter_map(|ComposedVariant { variant, output }| {
            tools::refresh(packwiz, output)
                .inspect_err(|error| warn!(%variant, %error, "Refresh failed"))
                .err()
                .map(|error| (*variant, error))
        })
        .collect_vec();

    if failures.is_empty() {
        return Ok(());
    }
    let failed = failures.iter().map(|(variant, _)| variant).join(", ");
    let mut report = eyre::eyre!("packwiz failed to refresh: {failed}");
    for (variant, error) in failures {
        report = report.with_error(|| error).with_note(|| format!("while refreshing {variant}"));
    }
    Err(report.with_suggestion(|| format!("Make sure `{packwiz}` is installed and in your $PATH.")))
}
