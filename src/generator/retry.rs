use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{GenerationError, GenerationSettings, TextGenerator};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(5);

/// Fixed attempt count with linearly growing backoff between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay after failed attempt `attempt` (1-based); the multiplier stops
    /// growing at `max_attempts - 1`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let cap = self.max_attempts.saturating_sub(1).max(1);
        self.base_delay * attempt.clamp(1, cap)
    }
}

/// Wraps a [`TextGenerator`] and retries rate-limited calls.
pub struct RetryingGenerator<G> {
    inner: G,
    policy: RetryPolicy,
}

impl<G> RetryingGenerator<G> {
    pub fn new(inner: G, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    pub fn into_inner(self) -> G {
        self.inner
    }
}

#[async_trait]
impl<G> TextGenerator for RetryingGenerator<G>
where
    G: TextGenerator + Send + Sync,
{
    async fn generate(
        &self,
        prompt: &str,
        settings: &GenerationSettings,
    ) -> Result<String, GenerationError> {
        let mut attempt = 1;
        loop {
            debug!(attempt, max_attempts = self.policy.max_attempts, "requesting generation");

            match self.inner.generate(prompt, settings).await {
                Ok(text) => return Ok(text),
                Err(error) if error.is_retryable() && attempt < self.policy.max_attempts => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(attempt, ?delay, "generation rate limited, backing off: {}", error);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
