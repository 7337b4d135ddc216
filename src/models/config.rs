use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Page size used when the URL does not carry a `limit`
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Quiescence window for free-text filter input
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Computer list configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Page size applied when none is requested
    pub default_page_size: usize,

    /// Debounce window for text filters, in milliseconds
    pub debounce_window_ms: u64,
}

impl FilterConfig {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_window_ms)
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            debounce_window_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}
