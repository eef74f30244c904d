//! TOML configuration.
//!
//! Everything defaults so a missing file means a working setup rooted at
//! `./data`; individual source paths can be pointed elsewhere.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::paths::DataPaths;
use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub sources: SourcesConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            sources: SourcesConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Overrides for the source-table locations; unset values resolve inside
/// the data directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub ids_table: Option<PathBuf>,
    pub stroke_index: Option<PathBuf>,
    pub dictionary: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbosity: u8,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { verbosity: 1 }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
    }

    pub fn paths(&self) -> DataPaths {
        DataPaths::new(&self.data_dir)
    }

    pub fn ids_table_path(&self) -> PathBuf {
        self.sources
            .ids_table
            .clone()
            .unwrap_or_else(|| self.paths().ids_table())
    }

    pub fn stroke_index_path(&self) -> PathBuf {
        self.sources
            .stroke_index
            .clone()
            .unwrap_or_else(|| self.paths().stroke_index())
    }

    pub fn dictionary_path(&self) -> PathBuf {
        self.sources
            .dictionary
            .clone()
            .unwrap_or_else(|| self.paths().dictionary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = Config::load(Path::new("/nonexistent/kanjigraph.toml")).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.logging.verbosity, 1);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kanjigraph.toml");
        fs::write(&path, "data_dir = \"/srv/japanese\"\n[sources]\nids_table = \"/srv/ids.txt\"\n")
            .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/japanese"));
        assert_eq!(config.ids_table_path(), PathBuf::from("/srv/ids.txt"));
        // Unset source paths resolve inside the data dir.
        assert_eq!(
            config.dictionary_path(),
            PathBuf::from("/srv/japanese/sources/dictionary.json")
        );
    }
}
