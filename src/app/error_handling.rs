//! Error handling utilities
//!
//! This module provides centralized error handling for the application.

use crate::error::BoilrError;
use tracing::error;

/// Render an error for the terminal and pick the process exit code
///
/// - For `BoilrError`: the user message, plus the developer message with the
///   full cause chain when `verbose >= 1`
/// - For other errors: the error message, plus its chain when `verbose >= 1`
pub fn describe_fatal_error(error: &anyhow::Error, verbose: u8) -> (String, i32) {
    if let Some(boilr_err) = error.downcast_ref::<BoilrError>() {
        let mut text = boilr_err.user_message();
        if verbose >= 1 {
            text.push_str(&format!("\n\nContext Chain:\n{}", boilr_err.developer_message()));
        }
        return (text, boilr_err.exit_code());
    }

    let mut text = format!("Error: {error}");
    if verbose >= 1 {
        text.push_str("\n\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            text.push_str(&format!("\n  {}: {}", i, cause));
        }
    }
    (text, 1)
}

/// Handle fatal errors and exit with appropriate status code
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {}", error);

    let (text, exit_code) = describe_fatal_error(&error, verbose);
    eprintln!("{}", text);

    std::process::exit(exit_code)
}
