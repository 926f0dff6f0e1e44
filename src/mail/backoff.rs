use rand::Rng;
use std::time::Duration;

/// Calculate exponential backoff delay with jitter.
///
/// `attempt` is zero based: the first retry waits roughly `base`.
pub fn calculate_backoff_delay(attempt: u32, base: Duration) -> Duration {
    // Cap the exponent to prevent overflow
    let capped_attempt = attempt.min(10);

    let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
    let delay_ms = base_ms.saturating_mul(2_u64.saturating_pow(capped_attempt));

    // Add jitter: ±30% randomness
    let jitter_factor = rand::thread_rng().gen_range(0.7..1.3);
    let delay_with_jitter = (delay_ms as f64 * jitter_factor).round() as u64;

    Duration::from_millis(delay_with_jitter)
}
