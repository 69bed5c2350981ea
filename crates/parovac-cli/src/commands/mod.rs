//! CLI command implementations.

pub mod config;
pub mod invoices;
pub mod mark_paid;
pub mod statements;

use std::path::Path;

use parovac_core::PairingConfig;

/// Output format shared by the listing commands.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}

/// Load configuration from an explicit path or the default location.
pub fn load_config(path: Option<&str>) -> anyhow::Result<PairingConfig> {
    if let Some(path) = path {
        return Ok(PairingConfig::from_file(Path::new(path))?);
    }
    let default = config::default_config_path();
    if default.exists() {
        Ok(PairingConfig::from_file(&default)?)
    } else {
        Ok(PairingConfig::default())
    }
}
