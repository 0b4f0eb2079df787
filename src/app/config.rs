//! Application configuration
//!
//! Settings derived from the command line and the process before any
//! template is rendered.

use crate::error::ErrorExt;
use anyhow::Result;
use std::path::PathBuf;

/// Application configuration structure
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Verbosity level for logging
    pub verbose: u8,
    /// Working directory, where `./.env` is looked up
    pub working_dir: PathBuf,
    /// Home directory used for `~` expansion, if it could be determined
    pub home_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Create a new application configuration from the running process
    pub fn new(verbose: u8) -> Result<Self> {
        let working_dir =
            std::env::current_dir().to_config_error("Failed to get current directory")?;

        Ok(Self {
            verbose,
            working_dir,
            home_dir: dirs::home_dir(),
        })
    }

    /// Set the working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Set the home directory
    pub fn with_home_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.home_dir = dir;
        self
    }

    /// Get the log level string based on verbosity
    pub fn log_level(&self) -> &'static str {
        crate::cli::get_log_level(self.verbose)
    }

    /// Location of the implicit env file
    pub fn dotenv_path(&self) -> PathBuf {
        self.working_dir.join(".env")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            verbose: 0,
            working_dir: PathBuf::from("."),
            home_dir: None,
        }
    }
}
