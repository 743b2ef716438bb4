pub mod batch;
pub mod config;
pub mod encode;
pub mod export;
pub mod input;
pub mod process;

use std::path::Path;

use kaspi_core::models::config::KaspiConfig;

/// Load the configuration given with `--config`, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<KaspiConfig> {
    Ok(match config_path {
        Some(path) => KaspiConfig::from_file(Path::new(path))?,
        None => KaspiConfig::default(),
    })
}
