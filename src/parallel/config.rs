use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Worker pool flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolKind {
    /// Shared-memory thread pool
    Thread,
    /// Workers that only exchange serialized payloads
    Isolated,
}

/// Parallel apply settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Pool flavour
    pub kind: PoolKind,
    /// Upper bound on workers (None for one per CPU)
    pub max_workers: Option<usize>,
    /// Items per dispatched chunk
    pub chunk_size: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            kind: PoolKind::Thread,
            max_workers: Some(num_cpus::get()),
            chunk_size: 1024,
        }
    }
}

impl ParallelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(mut self, kind: PoolKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = Some(max_workers);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Effective number of workers
    pub fn workers(&self) -> usize {
        self.max_workers.unwrap_or_else(num_cpus::get).max(1)
    }

    /// Reject settings no pool can run with
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be at least 1".into()));
        }
        if self.max_workers == Some(0) {
            return Err(Error::Config("max_workers must be at least 1".into()));
        }
        Ok(())
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.toml`, `.yaml` or `.yml` file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&text),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            other => Err(Error::Config(format!(
                "unsupported configuration format: {}",
                other.unwrap_or("none")
            ))),
        }
    }
}
