//! Error handling utilities
//!
//! This module provides centralized error handling for the application.

use tracing::error;

use crate::error::HdctlError;

/// Exit code for an error that reached `main`
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<HdctlError>()
        .map(HdctlError::exit_code)
        .unwrap_or(1)
}

/// Handle fatal errors and exit with appropriate status code
///
/// - For `HdctlError`: shows the user message, and the developer message
///   with its source chain in verbose mode
/// - For other errors: shows the error, and its chain in verbose mode
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {}", error);

    if let Some(err) = error.downcast_ref::<HdctlError>() {
        eprintln!("Error: {}", err.user_message());

        if verbose >= 1 {
            eprintln!("\nContext Chain:\n{}", err.developer_message());
        }
    } else {
        eprintln!("Error: {error}");

        if verbose >= 1 {
            eprintln!("\nError chain:");
            for (i, cause) in error.chain().enumerate() {
                eprintln!("  {}: {}", i, cause);
            }
        }
    }

    std::process::exit(exit_code_for(&error))
}
