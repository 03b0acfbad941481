// ABOUTME: Configuration management for the drover application
// ABOUTME: Handles loading and merging configuration from files and environment variables

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Shared execution timeout applied when the command line does not
    /// provide one.
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub default_timeout: Duration,

    /// Base directory under which the dated output folder is created.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Shell override; falls back to `$SHELL` / the platform default.
    #[serde(default)]
    pub shell: Option<String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

fn default_timeout() -> Duration {
    Duration::from_secs(180)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_timeout: default_timeout(),
            output_dir: default_output_dir(),
            shell: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file path or default locations
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::find_config_file(),
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let mut config: Config = serde_yaml::from_str(&contents)?;

            config.merge_env()?;

            Ok(config)
        } else {
            let mut config = Config::default();
            config.merge_env()?;
            Ok(config)
        }
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> PathBuf {
        // Check home directory
        if let Some(home_dir) = dirs::home_dir() {
            let home_config = home_dir.join(".drover").join("config.yaml");
            if home_config.exists() {
                return home_config;
            }
        }

        // Check current directory
        let possible_paths = [
            PathBuf::from("drover.yaml"),
            PathBuf::from("drover.yml"),
            PathBuf::from(".drover.yaml"),
            PathBuf::from(".drover.yml"),
        ];

        for path in possible_paths {
            if path.exists() {
                return path;
            }
        }

        // Default path (may not exist)
        PathBuf::from("drover.yaml")
    }

    /// Merge environment variables into configuration
    fn merge_env(&mut self) -> Result<()> {
        if let Ok(level) = std::env::var("DROVER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("DROVER_LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Ok(output_dir) = std::env::var("DROVER_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(output_dir);
        }
        if let Ok(shell) = std::env::var("DROVER_SHELL") {
            self.shell = Some(shell);
        }
        if let Ok(timeout) = std::env::var("DROVER_TIMEOUT") {
            self.default_timeout = Duration::from_secs(timeout.parse()?);
        }

        Ok(())
    }
}
