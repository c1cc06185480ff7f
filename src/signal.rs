//! Signal handling for graceful shutdown.
//!
//! Ctrl+C sets a shared `AtomicBool`. Batch file operations check the flag
//! before each item and stop issuing new operations once it is set; a delete
//! batch still repairs the groups it touched before returning.
//!
//! # Usage
//!
//! ```rust,no_run
//! use dupekeep::actions::{DeleteConfig, GroupMutator};
//! use dupekeep::signal::install_handler;
//!
//! let handler = install_handler().expect("Failed to install signal handler");
//! let mutator = GroupMutator::from_config(&DeleteConfig::trash())
//!     .with_shutdown(handler.get_flag());
//! ```
//!
//! When a signal is received the application should exit with code 130
//! (128 + SIGINT).

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Exit code for SIGINT (Ctrl+C) interruption.
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

/// Shared shutdown flag.
///
/// Clones share the same flag.
#[derive(Debug, Clone)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a new shutdown handler with the flag initially set to `false`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if shutdown has been requested.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Manually request a shutdown.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Get a clone of the shutdown flag for the mutator and transfers.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Reset the shutdown flag to `false`.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl Default for ShutdownHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install a Ctrl+C handler that sets the shutdown flag on interrupt.
///
/// Call once, early in startup. Later calls in the same process (tests
/// driving `run_app` repeatedly) get the already-installed handler back with
/// its flag reset.
///
/// # Errors
///
/// Returns `SignalError::InstallFailed` if the platform refuses the hook.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        return Ok(handler.clone());
    }

    let handler = ShutdownHandler::new();
    let flag = handler.get_flag();

    let installed = ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        let _ = writeln!(std::io::stderr(), "\nInterrupted. Finishing current file...");
        let _ = std::io::stderr().flush();
        log::info!("Shutdown signal received");
    });

    match installed {
        Ok(()) => {
            let _ = GLOBAL_HANDLER.set(handler.clone());
            Ok(handler)
        }
        Err(e) => match GLOBAL_HANDLER.get() {
            Some(existing) => {
                existing.reset();
                Ok(existing.clone())
            }
            // The hook belongs to someone else; Ctrl+C won't reach this flag
            // but manual requests still work.
            None if matches!(e, ctrlc::Error::MultipleHandlers) => {
                log::debug!("Ctrl+C handler already registered, using unhooked handler");
                let fallback = GLOBAL_HANDLER.get_or_init(ShutdownHandler::new);
                Ok(fallback.clone())
            }
            None => Err(SignalError::InstallFailed(e)),
        },
    }
}

/// Create a handler without installing any signal hooks.
///
/// ```
/// use dupekeep::signal::create_handler;
/// let handler = create_handler();
/// assert!(!handler.is_shutdown_requested());
/// ```
#[must_use]
pub fn create_handler() -> ShutdownHandler {
    ShutdownHandler::new()
}
