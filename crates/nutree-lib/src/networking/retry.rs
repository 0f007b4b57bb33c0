use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Errors that may succeed when the same call is repeated
pub trait Retryable {
    fn is_transient(&self) -> bool;
}

/// Backoff strategy for transient failures
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Initial backoff duration
    pub initial: Duration,
    /// Maximum backoff duration
    pub max: Duration,
    /// Multiplier for exponential backoff
    pub multiplier: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(200),
            max: Duration::from_secs(5),
            multiplier: 2.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub backoff: BackoffConfig,
    /// Retries after the first attempt
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff: BackoffConfig::default(),
            max_retries: 3,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    pub fn with_backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = backoff;
        self
    }

    /// Policy that never retries
    pub fn none() -> Self {
        Self::new(0)
    }

    /// Delay before retry number `attempt` (zero-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.backoff.multiplier.powi(attempt as i32);
        let delay = Duration::from_secs_f64(self.backoff.initial.as_secs_f64() * factor);
        delay.min(self.backoff.max)
    }

    /// Run `operation` until it succeeds, fails permanently or retries run out
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + Display,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let delay = self.delay_for(attempt);
                    attempt += 1;
                    warn!(
                        "{} failed transiently ({}), backing off for {:?} (retry {}/{})",
                        label, e, delay, attempt, self.max_retries
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    include!("retry.test.rs");
}
