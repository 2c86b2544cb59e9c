//! Cooperative termination.
//!
//! SIGTERM and SIGINT only set a flag. The driver polls the flag once per
//! cycle and forwards it to the debug session; all teardown happens on the
//! driver thread.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::common::SessionError;

/// A stop request that may be raised from a signal handler.
#[derive(Debug, Clone, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    /// Creates a token with no stop requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a stop.
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once a stop has been requested.
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Token raised by the process signal handler.
static PROCESS_STOP: OnceLock<StopToken> = OnceLock::new();

extern "C" fn handle_termination(_signum: libc::c_int) {
    // Atomic store only.
    if let Some(token) = PROCESS_STOP.get() {
        token.request();
    }
}

/// Installs the SIGTERM/SIGINT handler and returns the token it raises.
///
/// Repeated calls return the same token.
///
/// # Errors
///
/// Returns [`SessionError::Signal`] if the kernel rejects the handler.
pub fn install_termination_handler() -> Result<StopToken, SessionError> {
    let token = PROCESS_STOP.get_or_init(StopToken::new).clone();
    let handler = handle_termination as extern "C" fn(libc::c_int) as libc::sighandler_t;
    for signum in [libc::SIGTERM, libc::SIGINT] {
        // SAFETY: the handler only performs an atomic store.
        let previous = unsafe { libc::signal(signum, handler) };
        if previous == libc::SIG_ERR {
            return Err(SessionError::Signal(io::Error::last_os_error()));
        }
    }
    debug!("termination handler installed");
    Ok(token)
}
