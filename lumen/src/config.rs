//! Configuration Loader (C10): reads the four on-disk JSON records, falling
//! back to small built-in catalogs when a file is simply missing, and
//! aborting startup on any other read failure or validation error.

use crate::error::{EngineError, Result};
use lumen_config::{FixtureRegistry, KickFlashConfig, SceneCatalog, SequenceCatalog};
use std::path::Path;

pub struct Config {
    pub fixtures: FixtureRegistry,
    pub scenes: SceneCatalog,
    pub sequences: SequenceCatalog,
    pub kick_flash: KickFlashConfig,
}

fn read_or_default<T>(path: &Path, load: impl FnOnce(&str) -> lumen_config::Result<T>, default: impl FnOnce() -> T) -> Result<T> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(load(&contents)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            log::info!("{} not found, using built-in defaults", path.display());
            Ok(default())
        }
        Err(source) => Err(EngineError::Io { path: path.to_path_buf(), source }),
    }
}

pub fn load(cli: &crate::cli::Cli) -> Result<Config> {
    let fixtures = read_or_default(&cli.fixtures, FixtureRegistry::load, FixtureRegistry::default_catalog)?;
    let scenes = read_or_default(&cli.scenes, SceneCatalog::load, SceneCatalog::default_catalog)?;
    let sequences = read_or_default(
        &cli.sequences,
        |json| SequenceCatalog::load(json, &scenes),
        || SequenceCatalog::default_catalog(&scenes),
    )?;
    let kick_flash = read_or_default(&cli.kick_flash, KickFlashConfig::load, KickFlashConfig::default_config)?;

    Ok(Config { fixtures, scenes, sequences, kick_flash })
}
