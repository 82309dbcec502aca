//! CLI route: merges config with flags and runs hash-then-write.

use crate::cli::parse::Cli;
use crate::config::{ConfigLoader, DirhashConfig};
use crate::error::HashTreeError;
use crate::output::write_results_file;
use crate::tree::builder::TreeBuilder;
use crate::tree::path::{normalize_root, PathKey};
use crate::types::Digest;
use std::path::{Path, PathBuf};
use tracing::info;

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub root_path: PathBuf,
    pub root_key: PathKey,
    pub root_digest: Digest,
    pub entry_count: usize,
    pub output_path: PathBuf,
}

/// Runtime context for one hashing run: normalized root plus effective
/// configuration.
pub struct RunContext {
    root: PathBuf,
    config: DirhashConfig,
}

impl RunContext {
    pub fn new(root: &Path, config: DirhashConfig) -> Result<Self, HashTreeError> {
        config.validate()?;
        Ok(Self {
            root: normalize_root(root)?,
            config,
        })
    }

    /// Load the config file named on the command line (if any) and apply the
    /// remaining flags over it.
    pub fn from_cli(cli: &Cli) -> Result<Self, HashTreeError> {
        let mut config = ConfigLoader::load(cli.config.as_deref())?;
        apply_overrides(&mut config, cli)?;
        Self::new(&cli.root, config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &DirhashConfig {
        &self.config
    }

    /// Hash the tree and write the results file.
    ///
    /// The results file is only touched once the whole tree hashed
    /// successfully.
    pub fn execute(&self) -> Result<RunSummary, HashTreeError> {
        let tree = TreeBuilder::new(self.root.clone())
            .with_hasher(self.config.hasher()?)
            .with_walker_config(self.config.walker_config())
            .with_strategy(self.config.strategy())
            .build()?;

        let output_path = self.config.output.path.clone();
        write_results_file(&output_path, &tree.entries)?;
        info!(
            output = %output_path.display(),
            entry_count = tree.len(),
            "Results file written"
        );

        Ok(RunSummary {
            entry_count: tree.len(),
            root_path: tree.root_path,
            root_key: tree.root_key,
            root_digest: tree.root_digest,
            output_path,
        })
    }
}

/// Apply command-line flags over loaded configuration.
/// Precedence: CLI flags override config file override defaults.
pub fn apply_overrides(config: &mut DirhashConfig, cli: &Cli) -> Result<(), HashTreeError> {
    if let Some(ref output) = cli.output {
        config.output.path = output.clone();
    }
    if cli.sequential {
        config.traversal.parallel = false;
    }
    if let Some(threads) = cli.threads {
        config.traversal.threads = threads;
    }
    if let Some(ref links) = cli.links {
        config.traversal.links = links.parse()?;
    }
    if let Some(ref algorithm) = cli.algorithm {
        config.hashing.algorithm = algorithm.clone();
    }
    if let Some(buffer_size) = cli.buffer_size {
        config.hashing.buffer_size = buffer_size;
    }

    let logging = &mut config.logging;
    if cli.verbose {
        logging.enabled = true;
    }
    if let Some(ref level) = cli.log_level {
        logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        logging.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        logging.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        logging.file = Some(file.clone());
    }

    Ok(())
}
