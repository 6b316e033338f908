//! Command-line arguments for the Filepal shell.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Filepal: a conversational assistant over your phone's files.
#[derive(Parser, Debug)]
#[command(name = "filepal", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Data directory holding the chat database.
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// JSON seed file with `files` and `categories`.
    #[arg(short = 's', long = "seed")]
    pub seed: Option<PathBuf>,

    /// Keep the conversation and file changes in memory only.
    #[arg(long = "in-memory")]
    pub in_memory: bool,

    /// Forget the stored conversation and file changes before starting.
    #[arg(long = "reset")]
    pub reset: bool,
}

impl CliArgs {
    /// Priority: --config flag > FILEPAL_CONFIG env var > ~/.filepal/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("FILEPAL_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Priority: --data-dir flag > config file value.
    pub fn resolve_data_dir(&self, config_dir: &str) -> PathBuf {
        match self.data_dir {
            Some(ref p) => p.clone(),
            None => expand_home(config_dir),
        }
    }

    /// Priority: --log-level flag > RUST_LOG (passed in as `env_filter`) >
    /// config file value. A blank RUST_LOG counts as unset.
    pub fn resolve_log_filter(&self, env_filter: Option<String>, config_level: &str) -> String {
        if let Some(ref level) = self.log_level {
            return level.clone();
        }
        match env_filter {
            Some(filter) if !filter.trim().is_empty() => filter,
            _ => config_level.to_string(),
        }
    }

    /// Priority: --seed flag > config file value. `None` means built-in seed.
    pub fn resolve_seed_path(&self, config_seed: Option<&str>) -> Option<PathBuf> {
        self.seed
            .clone()
            .or_else(|| config_seed.map(expand_home))
    }
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => match home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(path),
        },
        None => PathBuf::from(path),
    }
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let var = "USERPROFILE";
    #[cfg(not(target_os = "windows"))]
    let var = "HOME";
    std::env::var(var).ok().map(PathBuf::from)
}

fn default_config_path() -> PathBuf {
    match home_dir() {
        Some(home) => home.join(".filepal").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}
