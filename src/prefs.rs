//! Client-persisted UI preferences.
//!
//! The target language survives restarts; everything else is re-fetched
//! from the server on startup. Stored in
//! `~/.config/babelterm/prefs.toml`.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

const PREFS_DIR: &str = "babelterm";
const PREFS_FILE: &str = "prefs.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Prefs {
    pub target_lang: String,
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            target_lang: "en".to_string(),
        }
    }
}

impl Prefs {
    pub fn default_path() -> Result<PathBuf> {
        let base = BaseDirs::new()
            .ok_or_else(|| AppError::Config("Could not determine home directory".to_string()))?;
        Ok(base.config_dir().join(PREFS_DIR).join(PREFS_FILE))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read prefs.toml: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse prefs.toml: {}", e)))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| AppError::Config(format!("Failed to create prefs dir: {}", e)))?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize prefs: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| AppError::Config(format!("Failed to write prefs.toml: {}", e)))
    }
}
