//! `--status`: list the channels in the catalog.

use super::Cli;
use super::common::{Session, fetch_catalog};
use crate::catalog::{self, Catalog};
use crate::constants::DRIVER_ARTIFACT_KIND;
use anyhow::{Context, Result};
use colored::Colorize;

pub(super) async fn execute(cli: &Cli) -> Result<()> {
    let session = Session::load(cli)?;
    let platform = session.platform(cli);

    let raw_catalog = fetch_catalog(cli).await?;
    let catalog = catalog::parse(&raw_catalog)?;

    if cli.json {
        let json = serde_json::to_string_pretty(&catalog).context("Failed to serialize catalog")?;
        println!("{json}");
        return Ok(());
    }

    print!("{}", render(&catalog, &platform));
    Ok(())
}

fn render(catalog: &Catalog, platform: &str) -> String {
    if catalog.is_empty() {
        return format!("{}\n", "No channels found in the catalog".yellow());
    }

    let mut out = String::new();
    for (channel, info) in catalog.channels() {
        let driver = if info.download_url(DRIVER_ARTIFACT_KIND, platform).is_some() {
            format!("chromedriver for {platform}").green()
        } else {
            format!("no chromedriver for {platform}").red()
        };
        out.push_str(&format!("{:<8} {:<16} {}\n", channel.to_string().bold(), info.version(), driver));
    }
    out
}
