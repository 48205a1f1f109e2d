//
// perf.rs
//
// Timing instrumentation for validation passes. Controlled via the
// STARLING_PERF environment variable; disabled guards cost one branch.
//

use std::sync::OnceLock;
use std::time::{Duration, Instant};

static PERF_ENABLED: OnceLock<bool> = OnceLock::new();

/// Whether performance timing logs are enabled.
pub fn is_enabled() -> bool {
    *PERF_ENABLED.get_or_init(|| {
        std::env::var("STARLING_PERF")
            .map(|v| !v.is_empty() && v != "0" && v.to_lowercase() != "false")
            .unwrap_or(false)
    })
}

/// RAII timing guard that logs its label and duration on drop.
pub struct TimingGuard {
    start: Instant,
    label: String,
    enabled: bool,
}

impl TimingGuard {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            label: label.into(),
            enabled: is_enabled(),
        }
    }

    /// Elapsed time without consuming the guard.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        if self.enabled {
            log::debug!("[PERF] {} completed in {:?}", self.label, self.start.elapsed());
        }
    }
}

/// Run `thunk`, log its duration at `level` when timing is enabled, and
/// return its result.
pub fn time<T>(level: log::Level, label: &str, thunk: impl FnOnce() -> T) -> T {
    if !is_enabled() {
        return thunk();
    }
    let start = Instant::now();
    let result = thunk();
    log::log!(level, "[PERF] {} took {:?}", label, start.elapsed());
    result
}
