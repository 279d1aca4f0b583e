use std::{fs::File, io, path::Path, time::Instant};

use anyhow::Context;
use darkpack_core::{build, cfg::BuildConfig, fetch::ModrinthClient};
use log::{LevelFilter, info, warn};
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode, WriteLogger};

const CONFIG_PATH: &str = "config.json";
const LOG_PATH: &str = "latest.log";

fn main() -> anyhow::Result<()> {
    init_logger().context("failed to set up logging")?;
    load_env();

    let start = Instant::now();
    let cfg = BuildConfig::load(Path::new(CONFIG_PATH))
        .with_context(|| format!("failed to load '{CONFIG_PATH}'"))?;
    let registry = ModrinthClient::new(std::env::var("MODRINTH_TOKEN").ok())?;

    let summary = build::run(&cfg, &registry)?;
    info!(
        "Built pack from {} modpacks and {} mods: {} textures added, {} skipped, {} failures",
        summary.modpacks, summary.mods, summary.added, summary.skipped, summary.failures
    );
    info!("Done in: {:.3?}", start.elapsed());
    Ok(())
}

fn init_logger() -> anyhow::Result<()> {
    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), File::create(LOG_PATH)?),
    ])?;
    Ok(())
}

fn load_env() {
    match dotenv::dotenv() {
        Ok(_) => {}
        Err(dotenv::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to load .env file: {e}"),
    }
}
