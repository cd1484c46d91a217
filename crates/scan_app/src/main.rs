mod app;
mod cli;
mod config;
mod effects;
mod input;
mod render;

use anyhow::anyhow;
use clap::Parser;
use log::LevelFilter;
use scan_logging::{scan_info, LogDestination};

use crate::cli::Cli;
use crate::config::AppConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let destination = LogDestination::from_name(&cli.log)
        .ok_or_else(|| anyhow!("unknown log destination {:?} (use terminal, file or both)", cli.log))?;
    let level: LevelFilter = cli
        .log_level
        .parse()
        .map_err(|_| anyhow!("unknown log level {:?}", cli.log_level))?;
    scan_logging::initialize(destination, level);

    let config = AppConfig::load(cli.config.as_deref())?.with_overrides(&cli);
    scan_info!(
        "Starting scan_app server={} output={:?} policy={:?}",
        config.server_url,
        config.output_dir,
        config.submit_policy
    );

    app::run(config, cli.image)
}
