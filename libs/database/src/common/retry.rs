use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff schedule for database connection attempts.
///
/// The window for attempt `n` is `base_delay_ms * 2^n`, capped at
/// `max_delay_ms`. With jitter enabled each sleep is drawn uniformly from
/// the whole window (full jitter), which spreads reconnect storms out
/// better than scaling a fixed delay.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retry attempts after the initial try
    pub max_retries: u32,

    /// Width of the first backoff window in milliseconds
    pub base_delay_ms: u64,

    /// Cap on the backoff window in milliseconds
    pub max_delay_ms: u64,

    /// Draw sleeps uniformly from the window instead of sleeping its full width
    pub jitter: bool,
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_delay(mut self, delay_ms: u64) -> Self {
        self.base_delay_ms = delay_ms;
        self
    }

    pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Backoff window for the zero-based attempt number. The shift is
    /// clamped so large attempt counts saturate at the cap instead of
    /// overflowing.
    fn window_ms(&self, attempt: u32) -> u64 {
        let doubling = 1u64 << attempt.min(20);
        self.base_delay_ms
            .saturating_mul(doubling)
            .min(self.max_delay_ms)
    }

    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let window = self.window_ms(attempt);
        let ms = if self.jitter {
            draw_from_window(window)
        } else {
            window
        };
        Duration::from_millis(ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 5000,
            jitter: true,
        }
    }
}

/// Uniform draw from `[0, window_ms]`. Hashing the clock avoids pulling in
/// a rand dependency for a handful of calls on the startup path.
fn draw_from_window(window_ms: u64) -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    if window_ms == 0 {
        return 0;
    }

    RandomState::new().hash_one(std::time::SystemTime::now()) % (window_ms + 1)
}

/// Run an async operation, retrying failures on the config's backoff
/// schedule.
///
/// # Example
/// ```ignore
/// let schedule = RetryConfig::new().with_max_retries(5);
/// let client = retry_with_backoff(|| mongodb::connect_from_config(&config), schedule).await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    for attempt in 0..=config.max_retries {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!(attempt, "Operation recovered after retrying");
                }
                return Ok(result);
            }
            Err(e) if attempt == config.max_retries => {
                warn!(attempts = attempt + 1, "Operation failed permanently: {}", e);
                return Err(e);
            }
            Err(e) => {
                let delay = config.delay_for_attempt(attempt);
                debug!(
                    attempt = attempt + 1,
                    retries_left = config.max_retries - attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Operation failed: {}. Backing off before the next attempt",
                    e
                );
                tokio::time::sleep(delay).await;
            }
        }
    }

    unreachable!("the attempt matching max_retries always returns");
}
