//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the dupekeep application.
///
/// - 0: Success (operation completed)
/// - 1: General error (unexpected failure)
/// - 2: Nothing to do (a file operation found no checked items)
/// - 3: Partial success (some file operations failed)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: The operation completed.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// Nothing to do: No item was checked for the requested operation.
    NothingSelected = 2,
    /// Partial success: The batch finished but some files could not be processed.
    PartialSuccess = 3,
    /// Interrupted: The batch was interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DK000",
            Self::GeneralError => "DK001",
            Self::NothingSelected => "DK002",
            Self::PartialSuccess => "DK003",
            Self::Interrupted => "DK130",
        }
    }

    /// Exit code for a finished batch.
    ///
    /// Interruption wins over failures.
    #[must_use]
    pub fn for_batch(interrupted: bool, has_failures: bool) -> Self {
        if interrupted {
            Self::Interrupted
        } else if has_failures {
            Self::PartialSuccess
        } else {
            Self::Success
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DK001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    ///
    /// The message includes the whole context chain.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
