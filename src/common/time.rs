//! Latency helpers used when logging request handling.

use std::time::Instant;

/// Milliseconds elapsed since `start`, saturating at `u64::MAX`.
pub fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
