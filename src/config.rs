use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{Result, TaskmanError};

/// Environment variable that relocates the data directory.
pub const DATA_DIR_ENV: &str = "TASKMANAGER_DATA_DIR";

/// Directory name used under the home directory when no override is set.
pub const DEFAULT_DIR_NAME: &str = ".taskmanager";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Save after every mutation.
    pub auto_save: bool,
}

impl Config {
    /// `$TASKMANAGER_DATA_DIR`, else `~/.taskmanager`.
    pub fn from_env() -> Result<Self> {
        let data_dir = resolve_data_dir(std::env::var_os(DATA_DIR_ENV), dirs::home_dir())?;
        Ok(Self::with_data_dir(data_dir))
    }

    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            auto_save: true,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

pub fn resolve_data_dir(env_value: Option<OsString>, home: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(raw) = env_value
        && !raw.is_empty()
    {
        return Ok(PathBuf::from(raw));
    }
    home.map(|h| h.join(DEFAULT_DIR_NAME)).ok_or_else(|| {
        TaskmanError::Storage(format!(
            "cannot determine home directory; set {DATA_DIR_ENV} to choose a data directory"
        ))
    })
}
