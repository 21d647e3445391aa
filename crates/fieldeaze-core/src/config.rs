use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{FieldeazeError, Result};

/// Top-level configuration for the Fieldeaze assistant.
///
/// Loaded from `~/.fieldeaze/config.toml` by default. Missing sections
/// and fields fall back to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldeazeConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

impl FieldeazeConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FieldeazeConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| FieldeazeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Catalog JSON file. The built-in sample catalog is used when unset.
    pub catalog_path: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            catalog_path: None,
        }
    }
}

/// Chat assistant settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Whether the assistant accepts messages.
    pub enabled: bool,
    /// Simulated typing delay before a reply is shown, in milliseconds.
    pub typing_delay_ms: u64,
    /// Number dialled when the user taps "Call Support".
    pub support_phone: String,
    /// FAQ entries shown on the first FAQ page.
    pub faq_preview_count: usize,
    /// FAQ entries shown on the "More FAQs" page.
    pub faq_page_size: usize,
    /// Maximum accepted message length in characters.
    pub max_message_length: usize,
    /// Prefix used when formatting amounts.
    pub currency_symbol: String,
    /// Product name used in the welcome message.
    pub assistant_name: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            typing_delay_ms: 600,
            support_phone: "+919677782813".to_string(),
            faq_preview_count: 3,
            faq_page_size: 5,
            max_message_length: 2000,
            currency_symbol: "\u{20b9}".to_string(),
            assistant_name: "Fieldeaze".to_string(),
        }
    }
}
