use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::search::scanner::Algorithm;

/// Settings for a search run.
///
/// Loaded from the following locations, later ones overriding earlier ones:
/// 1. Global `$CONFIG_DIR/bytescout/config.yaml`
/// 2. Local `.bytescout.yaml` in the current directory
/// 3. A file passed with `--config`
///
/// Command-line values are applied on top with [`SearchConfig::merge_with_cli`].
///
/// ```yaml
/// # Byte pattern to look for (taken literally)
/// pattern: "ABABCABAB"
///
/// # File to search
/// input: "data.bin"
///
/// # kmp or simd
/// algorithm: simd
///
/// # Worker threads (default: CPU cores)
/// thread_count: 8
///
/// # Re-check every reported match against the buffer
/// verify: true
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Pattern to search for; its UTF-8 bytes are matched exactly
    #[serde(default)]
    pub pattern: String,

    /// File to map and search
    #[serde(default)]
    pub input: Option<PathBuf>,

    /// Matching algorithm used inside each chunk
    #[serde(default)]
    pub algorithm: Algorithm,

    /// Number of worker threads, one chunk each
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Verify every reported match before returning
    #[serde(default)]
    pub verify: bool,

    /// Print only the match count
    #[serde(default)]
    pub stats_only: bool,

    /// Print results as JSON
    #[serde(default)]
    pub json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            input: None,
            algorithm: Algorithm::default(),
            thread_count: default_thread_count(),
            verify: false,
            stats_only: false,
            json: false,
            log_level: default_log_level(),
        }
    }
}

impl SearchConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from the default locations plus an explicit file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            dirs::config_dir().map(|p| p.join("bytescout/config.yaml")),
            Some(PathBuf::from(".bytescout.yaml")),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // An explicit file must exist.
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder.build()?.try_deserialize()
    }

    /// Applies command-line values on top of file values.
    ///
    /// `thread_count` and `algorithm` are only taken from the CLI when given there.
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(pattern) = cli.pattern {
            self.pattern = pattern;
        }
        if cli.input.is_some() {
            self.input = cli.input;
        }
        if let Some(algorithm) = cli.algorithm {
            self.algorithm = algorithm;
        }
        if let Some(threads) = cli.thread_count {
            self.thread_count = threads;
        }
        if cli.verify {
            self.verify = true;
        }
        if cli.stats_only {
            self.stats_only = true;
        }
        if cli.json {
            self.json = true;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        self
    }

    /// Pattern bytes as searched
    pub fn pattern_bytes(&self) -> &[u8] {
        self.pattern.as_bytes()
    }
}

/// Values given on the command line; `None`/`false` means "not given"
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub pattern: Option<String>,
    pub input: Option<PathBuf>,
    pub algorithm: Option<Algorithm>,
    pub thread_count: Option<NonZeroUsize>,
    pub verify: bool,
    pub stats_only: bool,
    pub json: bool,
    pub log_level: Option<String>,
}
