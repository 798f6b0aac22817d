use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Activate buffering. While active, `warn()` stores messages
/// instead of printing to stderr.
pub fn activate() {
    *BUFFER.lock().unwrap_or_else(PoisonError::into_inner) = Some(Vec::new());
}

/// Deactivate buffering and return all collected messages.
pub fn drain() -> Vec<String> {
    BUFFER
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
        .unwrap_or_default()
}

/// Write a warning message. If buffering is active the message is stored;
/// otherwise it is printed to stderr immediately.
pub fn warn(msg: String) {
    let mut guard = BUFFER.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(buf) = guard.as_mut() {
        buf.push(msg);
    } else {
        drop(guard);
        eprintln!("{}", msg);
    }
}

/// Turn verbose diagnostics on or off for the whole process (`--verbose`).
pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Like `warn()`, but dropped unless verbose mode is on.
pub fn verbose(msg: String) {
    if is_verbose() {
        warn(msg);
    }
}

/// Convenience macro that works like `eprintln!` but routes through the
/// stderr buffer when it is active.
#[macro_export]
macro_rules! buffered_eprintln {
    ($($arg:tt)*) => {
        $crate::stderr_buffer::warn(format!($($arg)*))
    };
}

/// `buffered_eprintln!` that only fires under `--verbose`.
#[macro_export]
macro_rules! verbose_eprintln {
    ($($arg:tt)*) => {
        if $crate::stderr_buffer::is_verbose() {
            $crate::stderr_buffer::verbose(format!($($arg)*))
        }
    };
}
