//! Shell-style `${var...}` parameter expansion
//!
//! The engine is split into four pieces, leaf first:
//! - `pattern` - glob matching with shortest/longest and start/end anchoring
//! - `parser` - turns a marker body into an [`Expression`]
//! - `evaluator` - computes an [`Expression`] against an [`Environment`]
//! - `scanner` - finds markers in free text and splices their values in
//!
//! # Supported forms
//!
//! | Form | Result |
//! |---|---|
//! | `${var}` | value of `var` |
//! | `${#var}` | length of the value |
//! | `${var^}` / `${var^^}` | uppercase first / all characters |
//! | `${var,}` / `${var,,}` | lowercase first / all characters |
//! | `${var:n}` / `${var:n:len}` | substring |
//! | `${var#pat}` / `${var##pat}` | strip shortest / longest prefix match |
//! | `${var*pat}` / `${var**pat}` | strip shortest / longest suffix match |
//! | `${var-def}` / `${var:-def}` | default if unset / unset or empty |
//! | `${var=def}` / `${var:=def}` | as above, and assign the default |
//! | `${var/pat/rep}` / `${var//pat/rep}` | replace first / all matches |
//! | `${var/#pat/rep}` / `${var/*pat/rep}` | replace match at start / end |
//!
//! # Examples
//!
//! ```
//! use boilr::env::MapEnv;
//! use boilr::expand::expand;
//!
//! let mut env = MapEnv::from_pairs([("name", "world")]);
//! let out = expand("Hello ${name^}, ${greeting:-welcome}!", &mut env).unwrap();
//! assert_eq!(out, "Hello World, welcome!");
//! ```

mod error;
mod evaluator;
mod parser;
pub mod pattern;
mod scanner;

pub use error::SyntaxError;
pub use evaluator::{evaluate, render_word};
pub use parser::{
    parse, CaseConversion, DefaultWhen, Expression, Operator, ReplaceScope, Segment, Word,
};
pub use pattern::{find_match, Anchor, Greediness, Pattern};
pub use scanner::expand;

use crate::env::{RealEnvReader, ScopedEnv};
use once_cell::sync::Lazy;
use std::sync::Mutex;

/// Process-wide scope shared by every [`expand_env`] call
static PROCESS_SCOPE: Lazy<Mutex<ScopedEnv<RealEnvReader>>> =
    Lazy::new(|| Mutex::new(ScopedEnv::process()));

/// Expand `text` against the real process environment.
///
/// Assignments made by `=`/`:=` markers land in one process-wide overlay and
/// stay visible to later calls. The process environment itself is never
/// written.
pub fn expand_env(text: &str) -> Result<String, SyntaxError> {
    let mut env = match PROCESS_SCOPE.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    expand(text, &mut *env)
}
