//! Configuration for SetKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, SetKvError};

/// Main configuration for a SetKV instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all data files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── values.dat       (record medium)
    ///     └── index.idx        (index side file)
    pub data_dir: PathBuf,

    /// File name of the record medium inside `data_dir`
    pub data_file: String,

    /// File name of the index side file inside `data_dir`
    pub index_file: String,

    // -------------------------------------------------------------------------
    // Placement Configuration
    // -------------------------------------------------------------------------
    /// Extra element slots reserved whenever a record is appended.
    /// 0 reserves exactly the current set size.
    pub record_slack: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./database"),
            data_file: "values.dat".to_string(),
            index_file: "index.idx".to_string(),
            record_slack: 0,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Full path of the record medium
    pub fn data_path(&self) -> PathBuf {
        self.data_dir.join(&self.data_file)
    }

    /// Full path of the index side file
    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join(&self.index_file)
    }

    /// Check that the file layout is usable
    pub fn validate(&self) -> Result<()> {
        if self.data_file.is_empty() {
            return Err(SetKvError::Config("data file name is empty".to_string()));
        }
        if self.index_file.is_empty() {
            return Err(SetKvError::Config("index file name is empty".to_string()));
        }
        if self.data_file == self.index_file {
            return Err(SetKvError::Config(format!(
                "data file and index file must differ (both are {:?})",
                self.data_file
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all storage)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the record medium file name
    pub fn data_file(mut self, name: impl Into<String>) -> Self {
        self.config.data_file = name.into();
        self
    }

    /// Set the index side file name
    pub fn index_file(mut self, name: impl Into<String>) -> Self {
        self.config.index_file = name.into();
        self
    }

    /// Set the number of spare element slots reserved on append
    pub fn record_slack(mut self, slots: u32) -> Self {
        self.config.record_slack = slots;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
