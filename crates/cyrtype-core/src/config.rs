use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{CyrtypeError, Result};

/// Top-level configuration for cyrtype.
///
/// Loaded from `~/.cyrtype/config.toml` by default. Every section is
/// optional; missing sections and fields take their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CyrtypeConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub dictionary: DictionaryConfig,
    #[serde(default)]
    pub correction: CorrectionConfig,
    #[serde(default)]
    pub buffer: BufferConfig,
    #[serde(default)]
    pub table: TableConfig,
}

impl CyrtypeConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CyrtypeConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or is invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let cutoff = self.correction.cutoff;
        if !(0.0..=1.0).contains(&cutoff) {
            return Err(CyrtypeError::Config(format!(
                "correction.cutoff must be within 0.0..=1.0, got {}",
                cutoff
            )));
        }
        if self.buffer.max_len < 2 {
            return Err(CyrtypeError::Config(format!(
                "buffer.max_len must hold at least one digraph, got {}",
                self.buffer.max_len
            )));
        }
        for (source, target) in &self.table.extra_rules {
            let len = source.chars().count();
            if !(1..=2).contains(&len) {
                return Err(CyrtypeError::Config(format!(
                    "table rule '{}' must be 1 or 2 characters long",
                    source
                )));
            }
            if target.chars().count() != 1 {
                return Err(CyrtypeError::Config(format!(
                    "table rule '{}' must map to exactly one character, got '{}'",
                    source, target
                )));
            }
        }
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Word list used for autocorrection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// UTF-8 text file with one word per line.
    pub path: String,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            path: "russian_words.txt".to_string(),
        }
    }
}

/// Nearest-word lookup strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    /// Score every dictionary word.
    #[default]
    Linear,
    /// Only score words whose length can still reach the cutoff.
    LengthIndex,
}

/// Autocorrection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionConfig {
    /// When false, words are transliterated but never corrected.
    pub enabled: bool,
    /// Minimum similarity ratio for a dictionary word to be accepted.
    pub cutoff: f64,
    /// Nearest-word lookup strategy.
    pub matcher: MatcherKind,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cutoff: 0.8,
            matcher: MatcherKind::Linear,
        }
    }
}

/// Word buffer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Maximum number of raw characters remembered for the current word.
    pub max_len: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self { max_len: 20 }
    }
}

/// Additions to the built-in transliteration table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Latin sequence (1-2 chars) to target character. Overrides built-in
    /// rules with the same key.
    pub extra_rules: BTreeMap<String, String>,
}
