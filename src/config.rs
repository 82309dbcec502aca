//! Configuration System
//!
//! Optional TOML file layered over built-in defaults. Command-line flags are
//! applied on top by the CLI. Hashing behaviour is never read from
//! environment variables.
//!
//! ```toml
//! [hashing]
//! algorithm = "sha512"
//! buffer_size = 16384
//!
//! [traversal]
//! parallel = true
//! threads = 0
//! links = "fail"
//!
//! [output]
//! path = "results"
//!
//! [logging]
//! level = "debug"
//! ```

use crate::error::HashTreeError;
use crate::logging::LoggingConfig;
use crate::output::DEFAULT_OUTPUT_FILE;
use crate::tree::builder::Strategy;
use crate::tree::hasher::{HashAlgorithm, Hasher, DEFAULT_BUFFER_SIZE};
use crate::tree::walker::{LinkPolicy, WalkerConfig};
use config::{Config, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirhashConfig {
    #[serde(default)]
    pub hashing: HashingConfig,

    #[serde(default)]
    pub traversal: TraversalConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HashingConfig {
    /// Hash algorithm name; only sha512 is available
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Read chunk size in bytes when streaming files
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

fn default_algorithm() -> String {
    HashAlgorithm::default().name().to_string()
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            buffer_size: default_buffer_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TraversalConfig {
    /// Hash sibling files and subtrees on a worker pool
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Worker count; 0 uses the available parallelism
    #[serde(default)]
    pub threads: usize,

    /// Handling of symlinks and special files
    #[serde(default)]
    pub links: LinkPolicy,
}

fn default_true() -> bool {
    true
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            parallel: default_true(),
            threads: 0,
            links: LinkPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILE)
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

impl DirhashConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), HashTreeError> {
        self.hashing.algorithm.parse::<HashAlgorithm>()?;

        if self.hashing.buffer_size == 0 {
            return Err(HashTreeError::Config(
                "hashing.buffer_size must be greater than zero".to_string(),
            ));
        }
        if self.output.path.as_os_str().is_empty() {
            return Err(HashTreeError::Config(
                "output.path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn hasher(&self) -> Result<Hasher, HashTreeError> {
        let algorithm = self.hashing.algorithm.parse::<HashAlgorithm>()?;
        Ok(Hasher::new(algorithm, self.hashing.buffer_size))
    }

    pub fn strategy(&self) -> Strategy {
        if self.traversal.parallel {
            Strategy::Parallel {
                threads: self.traversal.threads,
            }
        } else {
            Strategy::Sequential
        }
    }

    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig {
            links: self.traversal.links,
        }
    }
}

/// Loads [`DirhashConfig`] from an explicit file.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<DirhashConfig, HashTreeError> {
        if !path.exists() {
            return Err(HashTreeError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let config: DirhashConfig = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;

        debug!(config_path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load from `path` when given, otherwise return the defaults.
    pub fn load(path: Option<&Path>) -> Result<DirhashConfig, HashTreeError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(DirhashConfig::default()),
        }
    }
}
