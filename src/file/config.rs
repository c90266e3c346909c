use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::error::{FileError, FileResult};
use super::{DEFAULT_DB_PATH, host_page_size};

/// How strictly caller contracts on freeing are enforced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractMode {
    /// Reject double frees and frees of never-allocated numbers
    #[default]
    Checked,
    /// Accept any number, as the free list has no per-page status
    Permissive,
}

/// Construction parameters of a page store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub page_size: usize,
    pub contract: ContractMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
            page_size: host_page_size(),
            contract: ContractMode::default(),
        }
    }
}

impl StoreConfig {
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_contract(mut self, contract: ContractMode) -> Self {
        self.contract = contract;
        self
    }

    /// Parse a config from JSON; absent fields keep their defaults
    pub fn from_json_str(json: &str) -> FileResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> FileResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            FileError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> FileResult<()> {
        if self.page_size == 0 {
            return Err(FileError::InvalidPageSize(self.page_size));
        }
        if self.path.as_os_str().is_empty() {
            return Err(FileError::Config("empty database path".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.path, PathBuf::from("nopesql.db"));
        assert_eq!(config.page_size, host_page_size());
        assert_eq!(config.contract, ContractMode::Checked);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = StoreConfig::from_json_str(r#"{ "page_size": 512 }"#).unwrap();
        assert_eq!(config.page_size, 512);
        assert_eq!(config.path, PathBuf::from("nopesql.db"));
        assert_eq!(config.contract, ContractMode::Checked);
    }

    #[test]
    fn test_json_contract_mode() {
        let config =
            StoreConfig::from_json_str(r#"{ "path": "x.db", "contract": "permissive" }"#).unwrap();
        assert_eq!(config.path, PathBuf::from("x.db"));
        assert_eq!(config.contract, ContractMode::Permissive);
    }

    #[test]
    fn test_invalid_json() {
        let result = StoreConfig::from_json_str("{ page_size: ");
        assert!(matches!(result, Err(FileError::Json(_))));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let config = StoreConfig::default().with_page_size(0);
        assert!(matches!(config.validate(), Err(FileError::InvalidPageSize(0))));
    }

    #[test]
    fn test_from_json_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("store.json");
        fs::write(&config_path, r#"{ "path": "data.db", "page_size": 64 }"#).unwrap();

        let config = StoreConfig::from_json_file(&config_path).unwrap();
        assert_eq!(config.path, PathBuf::from("data.db"));
        assert_eq!(config.page_size, 64);

        let missing = StoreConfig::from_json_file(temp_dir.path().join("missing.json"));
        assert!(matches!(missing, Err(FileError::Config(_))));
    }
}
