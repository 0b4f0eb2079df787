//! Variable lookup trait definitions
//!
//! The expansion engine never touches process state directly. It reads and
//! writes variables through [`Environment`], and production lookups read
//! the process environment through [`EnvReader`].

use std::collections::HashMap;
use std::ffi::OsString;

/// A mutable name → value scope consulted by the expansion engine
///
/// A variable is either unset (`get` returns `None`) or set, possibly to the
/// empty string. The distinction drives the `-`/`:-` and `=`/`:=` operators.
///
/// # Examples
///
/// ```
/// use boilr::env::{Environment, MapEnv};
///
/// let mut env = MapEnv::new();
/// assert_eq!(env.get("name"), None);
///
/// env.set("name", "".to_string());
/// assert_eq!(env.get("name").as_deref(), Some(""));
/// ```
pub trait Environment {
    /// Current value of `name`, or `None` when the variable is unset
    fn get(&self, name: &str) -> Option<String>;

    /// Assign `value` to `name` for the rest of this scope's lifetime
    fn set(&mut self, name: &str, value: String);

    /// Whether `name` is set (possibly to the empty string)
    fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl Environment for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }

    fn set(&mut self, name: &str, value: String) {
        self.insert(name.to_string(), value);
    }
}

impl<E: Environment + ?Sized> Environment for &mut E {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }

    fn set(&mut self, name: &str, value: String) {
        (**self).set(name, value)
    }
}

/// Read-only access to process environment variables
///
/// Abstracts environment variable access so that scopes layered on top of
/// the process environment can be tested without `std::env::set_var`.
pub trait EnvReader: Send + Sync {
    /// Read an environment variable as a String
    ///
    /// # Errors
    ///
    /// Returns `VarError::NotPresent` if the variable is not set,
    /// or `VarError::NotUnicode` if the value contains invalid UTF-8.
    fn var(&self, key: &str) -> Result<String, std::env::VarError>;

    /// Read an environment variable as an OsString
    ///
    /// Returns `None` if the variable is not set.
    fn var_os(&self, key: &str) -> Option<OsString>;
}
