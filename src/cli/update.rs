//! The default update pipeline and the `--check` dry run.

use super::Cli;
use super::common::{Session, fetch_catalog, local_version, prompt_destination};
use crate::config::SettingsStore;
use crate::constants::DEFAULT_STAGING_DIR;
use crate::engine::{EngineOptions, UpdateDecision, UpdateEngine, UpdateOutcome, UpdateRequest};
use crate::installer::{ArtifactInstaller, DriverLayout};
use crate::utils::platform::dir_on_path;
use crate::version::Classification;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Fetch, compare, and install when needed.
///
/// The install directory is only asked for once the comparison says an
/// install will happen.
pub(super) async fn execute(cli: &Cli) -> Result<()> {
    let mut session = Session::load(cli)?;
    let platform = session.platform(cli);
    let remembered = session.target_dir(cli)?;

    let layout = DriverLayout::new(&platform);
    let local = local_version(cli, &layout, &remembered).await;
    let raw_catalog = fetch_catalog(cli).await?;

    let installer = ArtifactInstaller::new(&platform)?.with_progress(!cli.no_progress);
    let mut engine = UpdateEngine::new(
        installer,
        EngineOptions {
            force: cli.force,
            ..EngineOptions::default()
        },
    );

    let decision = engine.check(&raw_catalog, local.as_deref())?;
    let will_install = (decision.needs_update || cli.force) && decision.download_url.is_some();
    let destination = if !will_install || cli.target_dir.is_some() || cli.yes {
        remembered
    } else {
        prompt_destination(&remembered)?
    };

    let request = UpdateRequest {
        raw_catalog,
        local_version: local,
        staging_dir: staging_dir(cli)?,
        destination_dir: destination.clone(),
    };
    let report = engine.run(&request).await?;
    print_versions(&report.decision);

    match report.outcome {
        UpdateOutcome::UpToDate => {
            println!("{} ChromeDriver is up to date", "✓".green().bold());
        }
        UpdateOutcome::Installed(installed) => {
            println!(
                "{} Installed ChromeDriver {} to {}",
                "✓".green().bold(),
                report.decision.target_version.bold(),
                installed.installed_path.display()
            );
            if let Some(backup) = &installed.backup_path {
                println!("  Previous driver kept at {}", backup.display());
            }

            session.settings.record_update(&destination, &platform);
            if let Err(e) = session.store.save(&session.settings) {
                warn!("Could not remember settings: {:#}", e);
            }

            print_path_hint(&destination);
        }
    }

    Ok(())
}

/// Report whether an update is needed without installing.
pub(super) async fn check(cli: &Cli) -> Result<()> {
    let session = Session::load(cli)?;
    let platform = session.platform(cli);
    let destination = session.target_dir(cli)?;

    let layout = DriverLayout::new(&platform);
    let local = local_version(cli, &layout, &destination).await;
    let raw_catalog = fetch_catalog(cli).await?;

    let installer = ArtifactInstaller::new(&platform)?;
    let mut engine = UpdateEngine::new(installer, EngineOptions::default());
    let decision = engine.check(&raw_catalog, local.as_deref())?;

    print_versions(&decision);
    if decision.needs_update {
        println!("{} An update is available", "!".yellow().bold());
        if decision.download_url.is_none() {
            println!("  No ChromeDriver download is listed for platform '{platform}'");
        }
    } else if decision.comparison.as_ref().map(|c| c.classification)
        == Some(Classification::Unparseable)
    {
        println!("{} Could not compare versions; nothing would be installed", "?".yellow().bold());
    } else {
        println!("{} ChromeDriver is up to date", "✓".green().bold());
    }

    Ok(())
}

fn staging_dir(cli: &Cli) -> Result<PathBuf> {
    match &cli.staging_dir {
        Some(dir) => Ok(dir.clone()),
        None => Ok(std::env::current_dir()
            .context("Failed to determine current directory")?
            .join(DEFAULT_STAGING_DIR)),
    }
}

fn print_versions(decision: &UpdateDecision) {
    println!(
        "Installed version: {}",
        decision.local_version.as_deref().unwrap_or("not installed").cyan()
    );
    println!("Stable version:    {}", decision.target_version.cyan());
}

fn print_path_hint(destination: &Path) {
    if !dir_on_path(destination) {
        println!(
            "{} {} is not on your PATH; add it so Selenium can find chromedriver",
            "hint:".yellow(),
            destination.display()
        );
    }
}
