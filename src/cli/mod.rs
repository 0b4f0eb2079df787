//! CLI command handlers
//!
//! This module contains all CLI-related functionality including:
//! - Argument parsing structures
//! - Help text and log levels
//! - Input validation
//! - Routing input to the renderers

pub mod args;
pub mod help;
pub mod router;
pub mod validation;

// Re-export the main CLI structures for convenience
pub use args::Cli;
pub use help::get_log_level;
pub use router::{execute, run};
pub use validation::{expand_home, resolve_paths, ResolvedPaths};
