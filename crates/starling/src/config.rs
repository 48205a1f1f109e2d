//
// config.rs
//
// Host-facing diagnostic suppression configuration
//

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostic;
use crate::files::pkg_path_key;

/// Suppression rules applied when merging diagnostics for the host.
///
/// Hosts typically deserialize this from project configuration; the default
/// suppresses nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticFilter {
    /// Diagnostic codes to drop entirely.
    pub suppressed_codes: Vec<u16>,
    /// Pkg-path prefixes (case-insensitive) whose diagnostics are dropped,
    /// e.g. `pkg:/source/vendor/`.
    pub ignored_path_prefixes: Vec<String>,
}

impl DiagnosticFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The suppression predicate consumed by diagnostic merging.
    pub fn is_suppressed(&self, diagnostic: &Diagnostic) -> bool {
        if self.suppressed_codes.contains(&diagnostic.code) {
            return true;
        }
        if self.ignored_path_prefixes.is_empty() {
            return false;
        }
        let file_key = pkg_path_key(&diagnostic.file);
        self.ignored_path_prefixes
            .iter()
            .any(|prefix| file_key.starts_with(&pkg_path_key(prefix)))
    }
}
