use serde::Deserialize;
use std::fs::read_to_string;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_SEED_ITEMS: [&str; 3] = ["todo1", "todo2", "todo3"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read from '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse toml from '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Settings of the to-do server that are not part of the database.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TodoConfig {
    /// Items put into a list when it is created, and into the default list
    /// whenever it is found empty.
    pub seed_items: Vec<String>,
}

impl Default for TodoConfig {
    fn default() -> Self {
        TodoConfig {
            seed_items: DEFAULT_SEED_ITEMS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TodoConfig {
    pub fn from_toml(contents: &str, path: &str) -> Result<TodoConfig, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    pub fn read(path: &Path) -> Result<TodoConfig, ConfigError> {
        let display = path.display().to_string();
        let contents = read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        TodoConfig::from_toml(&contents, &display)
    }
}
