//! Exponential backoff with jitter.

use std::time::Duration;
use rand::Rng;

/// Delay before restart number `attempt` (1-based).
///
/// `base_ms * 2^(attempt-1)`, capped at `max_ms`, plus up to 10% jitter.
/// Attempt 0 means "no wait".
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let factor = 2u64.saturating_pow(attempt - 1);
    let capped_delay = base_ms.saturating_mul(factor).min(max_ms);

    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}
