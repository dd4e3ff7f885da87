use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BankError;

/// How strictly a data set is checked while it loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Refuse data sets whose countries share a turn order ID or use the
    /// reserved `NO_ARMY` ID. When unset the problem is only logged.
    pub reject_invalid_turn_orders: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            reject_invalid_turn_orders: true,
        }
    }
}

impl LoadConfig {
    /// Reads a configuration from a JSON file. Missing keys keep their
    /// defaults.
    pub fn from_path(path: &Path) -> Result<Self, BankError> {
        let text = std::fs::read_to_string(path).map_err(|source| BankError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| BankError::Json {
            origin: path.display().to_string(),
            source,
        })
    }
}
