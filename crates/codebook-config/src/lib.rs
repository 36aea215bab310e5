use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

fn default_write_artifacts() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the chapter files, used when none is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_path: Option<PathBuf>,
    /// Treat listings in languages without a slug convention as violations.
    #[serde(default)]
    pub strict_languages: bool,
    /// Write `<chapter>.tmp` next to chapters that don't round-trip.
    #[serde(default = "default_write_artifacts")]
    pub write_artifacts: bool,
    /// Local checkout of the repository the chapters' `code:` links point at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_root: Option<PathBuf>,
    /// Link URL prefix that corresponds to `code_root`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_prefix: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            book_path: None,
            strict_languages: false,
            write_artifacts: default_write_artifacts(),
            code_root: None,
            repo_prefix: None,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded paths
        config.book_path = config
            .book_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));
        config.code_root = config
            .code_root
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/codebook");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
