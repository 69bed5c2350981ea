//! Configuration for the pairing run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::PairingError;

/// Main configuration for the pairing toolkit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingConfig {
    /// Account name at the invoicing service; doubles as the basic-auth user.
    pub account: String,

    /// API key for the invoicing service.
    pub api_key: String,

    /// Base URL of the invoicing service, e.g. `https://acme.invoicing.example`.
    pub base_url: String,

    /// Directory scanned for `.eml` notification messages.
    pub mailbox_dir: PathBuf,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            account: String::new(),
            api_key: String::new(),
            base_url: String::new(),
            mailbox_dir: PathBuf::from("mail"),
        }
    }
}

impl PairingConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }

    /// Check that the remote service can be reached with this configuration.
    ///
    /// Runs before any network activity; missing credentials never make it
    /// to the transport.
    pub fn validate_service_access(&self) -> Result<(), PairingError> {
        if self.account.is_empty() || self.api_key.is_empty() {
            return Err(PairingError::Config(
                "missing account name or API key".to_string(),
            ));
        }
        if self.base_url.is_empty() {
            return Err(PairingError::Config("missing base URL".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_rejected() {
        let config = PairingConfig::default();
        assert!(matches!(
            config.validate_service_access(),
            Err(PairingError::Config(_))
        ));

        let config = PairingConfig {
            account: "acme".to_string(),
            api_key: "key".to_string(),
            base_url: "https://acme.invoicing.example".to_string(),
            ..PairingConfig::default()
        };
        assert!(config.validate_service_access().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let config = PairingConfig {
            account: "acme".to_string(),
            ..PairingConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let loaded: PairingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.account, "acme");
        assert_eq!(loaded.mailbox_dir, PathBuf::from("mail"));
    }
}
