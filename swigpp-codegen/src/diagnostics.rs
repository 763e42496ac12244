// Process-wide diagnostic counter. The only mutable state shared across files.

use std::sync::atomic::{AtomicUsize, Ordering};

static WARNINGS: AtomicUsize = AtomicUsize::new(0);

/// Count one emitted warning.
pub fn record_warning() {
    WARNINGS.fetch_add(1, Ordering::Relaxed);
}

/// Number of warnings emitted since process start (or the last reset).
pub fn warning_count() -> usize {
    WARNINGS.load(Ordering::Relaxed)
}

/// Reset the counter at the start of a run.
pub fn reset() {
    WARNINGS.store(0, Ordering::Relaxed);
}

/// `tracing::warn!` plus a bump of the warning counter.
#[macro_export]
macro_rules! diag_warn {
    ($($arg:tt)*) => {{
        $crate::diagnostics::record_warning();
        ::tracing::warn!($($arg)*);
    }};
}
