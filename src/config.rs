//! Configuration loaded from `config.toml`
//!
//! ```toml
//! data_dir = "/home/ana/.local/share/repaso"
//! catalog_path = "/home/ana/words.csv"
//! default_tests_per_day = 20
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RepasoError, Result};
use crate::profile::DEFAULT_TESTS_PER_DAY;

const APP_DIR: &str = "repaso";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where records and profiles are stored
    pub data_dir: Option<PathBuf>,
    /// Word list (`.json` or `.csv`); defaults to `<data_dir>/words.json`
    pub catalog_path: Option<PathBuf>,
    /// Quota for users without a profile
    pub default_tests_per_day: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            catalog_path: None,
            default_tests_per_day: DEFAULT_TESTS_PER_DAY,
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `path` if given, else from the user config directory if a
    /// config file exists there, else defaults
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR).join("config.toml"))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_local_dir()
                .map(|p| p.join(APP_DIR))
                .ok_or(RepasoError::DataDirNotFound),
        }
    }

    pub fn catalog_path(&self) -> Result<PathBuf> {
        match &self.catalog_path {
            Some(path) => Ok(path.clone()),
            None => Ok(self.data_dir()?.join("words.json")),
        }
    }
}
