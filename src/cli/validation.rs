//! Input validation utilities
//!
//! Resolves the path flags against the home directory and checks them before
//! anything is rendered.

use crate::app::AppConfig;
use crate::cli::args::Cli;
use crate::error::{common, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[cfg(windows)]
const HOME_TOKEN: &str = "%USERPROFILE%";
#[cfg(not(windows))]
const HOME_TOKEN: &str = "~";

/// Path flags after home expansion and validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub file: Option<PathBuf>,
    pub dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Replace a leading home token (`~` or `%USERPROFILE%` on Windows) with `home`
///
/// Paths are returned unchanged when no home directory is known.
pub fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    let Some(text) = path.to_str() else {
        return path.to_path_buf();
    };
    let Some(rest) = text.strip_prefix(HOME_TOKEN) else {
        return path.to_path_buf();
    };
    if !rest.is_empty() && !rest.starts_with(['/', '\\']) {
        return path.to_path_buf();
    }

    match home {
        Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
        None => {
            warn!("Cannot expand '{}': home directory unknown", text);
            path.to_path_buf()
        }
    }
}

/// Validate a template file path exists
pub fn validate_file(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(common::file_not_found(path))
    }
}

/// Validate a template directory path exists and is a directory
pub fn validate_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(common::directory_not_found(path))
    }
}

/// Reject an output directory that is the input directory, ignoring case
pub fn validate_output(input_dir: Option<&Path>, output: &Path) -> Result<()> {
    let normalize = |p: &Path| {
        p.to_string_lossy()
            .trim_end_matches(['/', '\\'])
            .to_lowercase()
    };

    match input_dir {
        Some(input) if normalize(input) == normalize(output) => {
            Err(common::same_input_output(output))
        }
        _ => Ok(()),
    }
}

/// Expand and validate every path flag of `cli`
pub fn resolve_paths(cli: &Cli, config: &AppConfig) -> Result<ResolvedPaths> {
    let home = config.home_dir.as_deref();
    let expand = |p: &Option<PathBuf>| p.as_deref().map(|p| expand_home(p, home));

    let paths = ResolvedPaths {
        file: expand(&cli.file),
        dir: expand(&cli.dir),
        output: expand(&cli.output),
    };

    if let Some(file) = &paths.file {
        validate_file(file)?;
    }
    if let Some(dir) = &paths.dir {
        validate_directory(dir)?;
    }
    if let Some(output) = &paths.output {
        validate_output(paths.dir.as_deref(), output)?;
    }

    debug!("Resolved paths: {:?}", paths);
    Ok(paths)
}
