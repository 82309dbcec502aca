//! CLI parse: clap types for dirhash. No behavior; definitions only.

use clap::Parser;
use std::path::PathBuf;

/// dirhash - Merkle-style digests for every file and directory in a tree
#[derive(Parser, Debug)]
#[command(name = "dirhash")]
#[command(about = "Compute a SHA-512 digest for every file and directory under a root")]
pub struct Cli {
    /// Root directory to hash
    pub root: PathBuf,

    /// Results file (default: ./results)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Configuration file path (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Walk the tree on a single thread
    #[arg(long)]
    pub sequential: bool,

    /// Worker threads for the parallel walk (0 = one per core)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Symlink and special file handling (fail, skip, follow)
    #[arg(long)]
    pub links: Option<String>,

    /// Hash algorithm (sha512)
    #[arg(long)]
    pub algorithm: Option<String>,

    /// Read chunk size in bytes
    #[arg(long)]
    pub buffer_size: Option<usize>,

    /// Enable logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
