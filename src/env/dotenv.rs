//! Parsing of `KEY=VALUE` variable definitions
//!
//! Used for env files (`--env-file`, `./.env`) and for `-e KEY=VALUE`
//! command-line pairs. Supported syntax:
//! - blank lines and `#` comments are skipped
//! - an optional `export ` prefix is accepted
//! - `'single quoted'` values are taken literally
//! - `"double quoted"` values understand `\n`, `\t`, `\r`, `\"` and `\\`
//! - unquoted values are trimmed and end at a ` #` comment

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

static ASSIGNMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:export\s+)?([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(.*)$")
        .expect("Valid regex pattern")
});

#[derive(Error, Debug)]
pub enum DotenvError {
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("failed to read env file '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DotenvError {
    fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }
}

/// Parse definitions from text, keeping their order (later keys win when applied)
pub fn parse_str(content: &str) -> Result<Vec<(String, String)>, DotenvError> {
    let mut vars = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let captures = ASSIGNMENT_REGEX
            .captures(line)
            .ok_or_else(|| DotenvError::parse(line_no, format!("expected KEY=VALUE, got '{}'", line)))?;
        let key = captures[1].to_string();
        let value = parse_value(&captures[2], line_no)?;
        vars.push((key, value));
    }

    Ok(vars)
}

/// Parse definitions from a file
pub fn from_file(path: &Path) -> Result<Vec<(String, String)>, DotenvError> {
    let content = std::fs::read_to_string(path).map_err(|source| DotenvError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let vars = parse_str(&content)?;
    debug!("Loaded {} variable(s) from {}", vars.len(), path.display());
    Ok(vars)
}

/// Parse `KEY=VALUE` pairs given one per item, as on the command line
pub fn parse_pairs<S: AsRef<str>>(pairs: &[S]) -> Result<Vec<(String, String)>, DotenvError> {
    let joined = pairs
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join("\n");
    parse_str(&joined)
}

fn parse_value(raw: &str, line: usize) -> Result<String, DotenvError> {
    let raw = raw.trim();

    if let Some(rest) = raw.strip_prefix('\'') {
        let end = rest
            .find('\'')
            .ok_or_else(|| DotenvError::parse(line, "unterminated single-quoted value"))?;
        ensure_only_comment(&rest[end + 1..], line)?;
        return Ok(rest[..end].to_string());
    }

    if let Some(rest) = raw.strip_prefix('"') {
        let mut value = String::new();
        let mut chars = rest.char_indices();
        while let Some((idx, c)) = chars.next() {
            match c {
                '"' => {
                    ensure_only_comment(&rest[idx + 1..], line)?;
                    return Ok(value);
                }
                '\\' => match chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, other)) => value.push(other),
                    None => break,
                },
                c => value.push(c),
            }
        }
        return Err(DotenvError::parse(line, "unterminated double-quoted value"));
    }

    let value = match raw.find(" #") {
        Some(idx) => &raw[..idx],
        None => raw,
    };
    Ok(value.trim_end().to_string())
}

fn ensure_only_comment(trailing: &str, line: usize) -> Result<(), DotenvError> {
    let trailing = trailing.trim();
    if trailing.is_empty() || trailing.starts_with('#') {
        Ok(())
    } else {
        Err(DotenvError::parse(
            line,
            format!("unexpected text after quoted value: '{}'", trailing),
        ))
    }
}
