//! Process state for shutdown coordination.
//!
//! Two orthogonal flags:
//! - `SHUTDOWN`: Has shutdown been requested? (Ctrl+C received)
//! - `LOOP_ACTIVE`: Is the refresh loop running? (decides immediate vs
//!   deferred exit)

use std::sync::atomic::{AtomicBool, Ordering};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// The refresh loop is running and will observe SHUTDOWN at its next cycle
/// boundary (then persist sessions before exiting)
static LOOP_ACTIVE: AtomicBool = AtomicBool::new(false);

// =============================================================================
// SHUTDOWN state
// =============================================================================

/// Setup the global Ctrl+C handler. Call once at program start
///
/// The handler behavior depends on whether the refresh loop is active:
/// - Before `set_loop_active(true)`: exit immediately, nothing to wind down
/// - After: set the SHUTDOWN flag; the loop stops at its next cycle boundary
///   and runs the persistence sweep
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        if !LOOP_ACTIVE.load(Ordering::SeqCst) {
            std::process::exit(0);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Request shutdown programmatically (same path as Ctrl+C)
pub fn request_shutdown() {
    SHUTDOWN.store(true, Ordering::SeqCst);
}

/// Check if shutdown has been requested
///
/// Relaxed ordering; the loop observes the flag no later than its next
/// cycle boundary
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

// =============================================================================
// LOOP_ACTIVE state
// =============================================================================

/// Mark the refresh loop as running (or stopped)
pub fn set_loop_active(active: bool) {
    LOOP_ACTIVE.store(active, Ordering::SeqCst);
}

/// Check if the refresh loop is running
pub fn is_loop_active() -> bool {
    LOOP_ACTIVE.load(Ordering::SeqCst)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_flag() {
        SHUTDOWN.store(false, Ordering::SeqCst);
        assert!(!is_shutdown());

        request_shutdown();
        assert!(is_shutdown());

        SHUTDOWN.store(false, Ordering::SeqCst);
    }

    #[test]
    fn test_loop_active_flag() {
        LOOP_ACTIVE.store(false, Ordering::SeqCst);
        assert!(!is_loop_active());

        set_loop_active(true);
        assert!(is_loop_active());

        set_loop_active(false);
        assert!(!is_loop_active());
    }
}
