//! Process-environment backed variable scopes
//!
//! [`ScopedEnv`] reads through to the process environment and keeps every
//! write in an in-memory overlay. The process environment itself is never
//! modified: assignments made by `${var=default}`, env files and `-e` pairs
//! live only as long as the scope does.

use super::traits::{EnvReader, Environment};
use std::collections::HashMap;
use std::ffi::OsString;
use tracing::trace;

/// Production implementation that reads from std::env
#[derive(Clone, Default, Debug)]
pub struct RealEnvReader;

impl EnvReader for RealEnvReader {
    fn var(&self, key: &str) -> Result<String, std::env::VarError> {
        std::env::var(key)
    }

    fn var_os(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }
}

/// A writable scope layered over an [`EnvReader`]
///
/// Lookups consult the overlay first, then the reader. Values that are not
/// valid UTF-8 are converted lossily rather than treated as unset.
///
/// # Examples
///
/// ```
/// use boilr::env::{Environment, MockEnvReader, ScopedEnv};
///
/// let reader = MockEnvReader::new().with_env("USER", "alice");
/// let mut env = ScopedEnv::new(reader);
/// assert_eq!(env.get("USER").as_deref(), Some("alice"));
///
/// env.set("USER", "bob".to_string());
/// assert_eq!(env.get("USER").as_deref(), Some("bob"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScopedEnv<R: EnvReader> {
    reader: R,
    overlay: HashMap<String, String>,
}

impl ScopedEnv<RealEnvReader> {
    /// A scope over the real process environment
    pub fn process() -> Self {
        Self::new(RealEnvReader)
    }
}

impl<R: EnvReader> ScopedEnv<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            overlay: HashMap::new(),
        }
    }

    /// Layer `vars` on top of everything loaded so far
    pub fn extend<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let key = key.into();
            trace!("Overriding variable '{}'", key);
            self.overlay.insert(key, value.into());
        }
    }

    /// Variables set on this scope, excluding the underlying reader
    pub fn overlay(&self) -> &HashMap<String, String> {
        &self.overlay
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }
}

impl<R: EnvReader> Environment for ScopedEnv<R> {
    fn get(&self, name: &str) -> Option<String> {
        if let Some(value) = self.overlay.get(name) {
            return Some(value.clone());
        }
        self.reader
            .var_os(name)
            .map(|value| value.to_string_lossy().into_owned())
    }

    fn set(&mut self, name: &str, value: String) {
        self.overlay.insert(name.to_string(), value);
    }
}
