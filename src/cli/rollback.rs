//! `--rollback`: restore the driver that the last update replaced.

use super::Cli;
use super::common::Session;
use crate::installer::{BackupManager, DriverLayout};
use anyhow::Result;
use colored::Colorize;

pub(super) async fn execute(cli: &Cli) -> Result<()> {
    let session = Session::load(cli)?;
    let layout = DriverLayout::new(session.platform(cli));
    let target_dir = session.target_dir(cli)?;

    let manager = BackupManager::new(layout.installed_path(&target_dir));
    manager.restore_backup().await?;

    println!(
        "{} Restored previous ChromeDriver at {}",
        "✓".green().bold(),
        manager.original_path().display()
    );
    Ok(())
}
