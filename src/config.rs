// src/config.rs
use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::error::{Result, XrayError};

pub const DEFAULT_XRAY_CONFIG: &str = "/tmp/xray_config.yaml";

/// Where to look for xray and where it may write.
///
/// ```yaml
/// search_path:
///   - /opt/xray/xray_linux_amd64
///   - /usr/local/bin/xray_linux_amd64
/// config_path: /etc/xray/config.yaml
/// cache_dir: /var/tmp/xray
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Candidate executables, tried in order. There is no built-in fallback.
    pub search_path: Vec<PathBuf>,
    /// Handed to xray as `--config`; never read here
    #[serde(default = "default_config_path")]
    pub config_path: PathBuf,
    /// Directory for the per-instance scratch files
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
}

fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_XRAY_CONFIG)
}

fn default_cache_dir() -> PathBuf {
    std::env::temp_dir()
}

impl ScannerConfig {
    pub fn new<I, P>(search_path: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            search_path: search_path.into_iter().map(Into::into).collect(),
            config_path: default_config_path(),
            cache_dir: default_cache_dir(),
        }
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: ScannerConfig =
            serde_yaml::from_str(content).map_err(|e| XrayError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| XrayError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_yaml_str(&content)
    }

    /// Settings files and the CLI must name a candidate. An empty list handed
    /// straight to the scanner ends in `NotFound` at discovery instead.
    pub fn validate(&self) -> Result<()> {
        if self.search_path.is_empty() {
            return Err(XrayError::Config("search_path must list at least one candidate".to_string()));
        }
        Ok(())
    }
}
