//! In-memory variable scopes for tests and embedding
//!
//! These implementations never consult the process environment, so each
//! test gets an isolated, deterministic fixture.

use super::traits::{EnvReader, Environment};
use std::collections::HashMap;
use std::ffi::OsString;

/// A plain in-memory variable scope
///
/// # Examples
///
/// ```
/// use boilr::env::MapEnv;
/// use boilr::expand::expand;
///
/// let mut env = MapEnv::from_pairs([("name", "World")]);
/// assert_eq!(expand("Hello, ${name}!", &mut env).unwrap(), "Hello, World!");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        pairs.into_iter().collect()
    }

    /// Builder-style variant of [`Environment::set`]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Remove `name`, making it unset
    pub fn unset(&mut self, name: &str) -> Option<String> {
        self.vars.remove(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.vars
    }
}

impl Environment for MapEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: String) {
        self.vars.insert(name.to_string(), value);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, String>> for MapEnv {
    fn from(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }
}

/// An [`EnvReader`] over a fixed map, standing in for the process environment
#[derive(Debug, Clone, Default)]
pub struct MockEnvReader {
    vars: HashMap<String, String>,
}

impl MockEnvReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl EnvReader for MockEnvReader {
    fn var(&self, key: &str) -> Result<String, std::env::VarError> {
        self.vars
            .get(key)
            .cloned()
            .ok_or(std::env::VarError::NotPresent)
    }

    fn var_os(&self, key: &str) -> Option<OsString> {
        self.vars.get(key).map(OsString::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_env_set_and_unset() {
        let mut env = MapEnv::new().with_var("a", "1");
        assert_eq!(env.get("a").as_deref(), Some("1"));
        assert_eq!(env.len(), 1);

        env.set("a", "2".to_string());
        assert_eq!(env.get("a").as_deref(), Some("2"));

        assert_eq!(env.unset("a").as_deref(), Some("2"));
        assert!(env.is_empty());
        assert!(!env.is_set("a"));
    }

    #[test]
    fn test_mock_reader() {
        let reader = MockEnvReader::new().with_env("HOME", "/home/test");
        assert_eq!(reader.var("HOME").unwrap(), "/home/test");
        assert!(matches!(
            reader.var("MISSING"),
            Err(std::env::VarError::NotPresent)
        ));
        assert_eq!(reader.var_os("HOME"), Some(OsString::from("/home/test")));
    }
}
