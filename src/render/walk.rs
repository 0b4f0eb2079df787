//! Template directory listing

use super::ignore::IgnoreRules;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// A regular file found below a template directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    /// Full path to the file
    pub path: PathBuf,
    /// Path relative to the template directory, `/`-separated
    pub relative: String,
}

impl TemplateEntry {
    /// The directory part of [`Self::relative`], empty for top-level files
    pub fn relative_dir(&self) -> &str {
        match self.relative.rfind('/') {
            Some(idx) => &self.relative[..idx],
            None => "",
        }
    }
}

/// List regular files under `root`, sorted by relative path
///
/// Ignored directories are not descended into. Symlinks are never followed
/// and are left out along with every other non-regular file.
pub fn list_templates(root: &Path, ignore: &IgnoreRules) -> Result<Vec<TemplateEntry>> {
    let mut entries = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            let relative = relative_path(root, e.path());
            let skip = ignore.is_ignored(&relative, e.file_type().is_dir());
            if skip {
                trace!("Ignoring {}", relative);
            }
            !skip
        });

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        entries.push(TemplateEntry {
            relative: relative_path(root, entry.path()),
            path: entry.into_path(),
        });
    }

    entries.sort_by(|a, b| a.relative.cmp(&b.relative));
    debug!("Found {} template(s) in {}", entries.len(), root.display());
    Ok(entries)
}

fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
