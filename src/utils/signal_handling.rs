use std::sync::atomic::{AtomicBool, Ordering};

use log::warn;

static CTRL_C_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Installs a handler for SIGINT/SIGTERM that only records the signal. Long-running
/// enumerations poll [`received_ctrl_c`] and return their best result so far.
pub fn initialize() {
    if let Err(e) = ctrlc::set_handler(|| {
        CTRL_C_RECEIVED.store(true, Ordering::Release);
    }) {
        warn!("Cannot install signal handler: {e}");
    }
}

pub fn received_ctrl_c() -> bool {
    CTRL_C_RECEIVED.load(Ordering::Acquire)
}
