//! Variable scopes for the expansion engine
//!
//! The engine receives its variables through the [`Environment`] trait rather
//! than reading a process-wide singleton:
//! - [`MapEnv`] is an isolated in-memory scope for tests and embedding
//! - [`ScopedEnv`] layers writes over an [`EnvReader`], normally
//!   [`RealEnvReader`] for the process environment
//! - [`dotenv`] parses `KEY=VALUE` definitions from files and CLI pairs
//!
//! # Usage
//!
//! ```
//! use boilr::env::{dotenv, Environment, MockEnvReader, ScopedEnv};
//!
//! let mut env = ScopedEnv::new(MockEnvReader::new().with_env("USER", "alice"));
//! env.extend(dotenv::parse_str("GREETING=hello\nUSER=bob").unwrap());
//!
//! assert_eq!(env.get("GREETING").as_deref(), Some("hello"));
//! assert_eq!(env.get("USER").as_deref(), Some("bob"));
//! ```

pub mod dotenv;
pub mod mock;
pub mod real;
pub mod traits;

pub use dotenv::DotenvError;
pub use mock::{MapEnv, MockEnvReader};
pub use real::{RealEnvReader, ScopedEnv};
pub use traits::{EnvReader, Environment};
