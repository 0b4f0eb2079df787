//! # boilr
//!
//! Text templates using shell-style `${var}` expansion.
//!
//! ## Usage
//!
//! ```bash
//! boilr -e 'var=World' 'Hello, ${var}!'
//! boilr -s vars.env -o out -d templates
//! ```
//!
//! ## Modules
//!
//! - `expand` - The expansion engine: pattern matching, parsing, evaluation and scanning
//! - `env` - Variable scopes the engine reads and assigns through, and env-file parsing
//! - `render` - Rendering of strings, readers, files and directory trees
//! - `error` - Application error type with codes and exit statuses
//! - `app` - Configuration, logging and fatal-error handling for the binary
//! - `cli` - Argument parsing, validation and routing
pub mod app;
pub mod cli;
pub mod env;
pub mod error;
pub mod expand;
pub mod render;

pub use expand::{expand, expand_env, SyntaxError};
