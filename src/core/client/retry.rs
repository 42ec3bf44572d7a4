use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Specifies the backoff strategy for retrying failed requests.
#[derive(Clone, Debug, PartialEq)]
pub enum Backoff {
    /// Uses a fixed delay between retries.
    Fixed(Duration),
    /// Uses an exponential delay between retries.
    /// The delay is calculated as `base * (factor ^ (attempt - 1))`.
    Exponential {
        /// The initial backoff duration.
        base: Duration,
        /// The multiplicative factor for each subsequent retry.
        factor: f64,
        /// The maximum duration to wait between retries.
        max: Duration,
    },
}

impl Backoff {
    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            Self::Fixed(d) => *d,
            Self::Exponential { base, factor, max } => {
                let exp = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
                let secs = (base.as_secs_f64() * factor.powi(exp)).max(0.0);
                if !secs.is_finite() || secs >= max.as_secs_f64() {
                    *max
                } else {
                    Duration::from_secs_f64(secs)
                }
            }
        }
    }
}

/// Configuration for the automatic retry mechanism of one pipeline stage.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Enables or disables the retry mechanism. When disabled every call makes a single attempt.
    pub enabled: bool,
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// The backoff strategy to use between attempts.
    pub backoff: Backoff,
    /// HTTP status codes that should trigger a retry of the landing-page GET.
    pub retry_on_status: Vec<u16>,
    /// Whether to retry the landing-page GET on request timeouts.
    pub retry_on_timeout: bool,
    /// Whether to retry the landing-page GET on connection errors.
    pub retry_on_connect: bool,
}

impl Default for RetryConfig {
    /// Landing-page policy: three retries on throttling and server errors.
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 4,
            backoff: Backoff::Exponential {
                base: Duration::from_millis(500),
                factor: 2.0,
                max: Duration::from_secs(10),
            },
            retry_on_status: vec![429, 500, 502, 503, 504],
            retry_on_timeout: true,
            retry_on_connect: true,
        }
    }
}

impl RetryConfig {
    /// Balance-request policy: three attempts, two seconds apart.
    ///
    /// The balance stage retries every failure except a rejected card, so the
    /// `retry_on_*` lists are not consulted there.
    pub fn balance() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            backoff: Backoff::Fixed(Duration::from_secs(2)),
            retry_on_status: Vec::new(),
            retry_on_timeout: true,
            retry_on_connect: true,
        }
    }

    /// Same policy with a different attempt budget.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Same policy with a different backoff.
    #[must_use]
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub(crate) fn attempts(&self) -> u32 {
        if self.enabled {
            self.max_attempts.max(1)
        } else {
            1
        }
    }

    /// Whether a transport error is worth another landing-page attempt.
    pub(crate) fn is_transient(&self, err: &reqwest::Error) -> bool {
        if let Some(status) = err.status() {
            return self.retry_on_status.contains(&status.as_u16());
        }
        (self.retry_on_timeout && err.is_timeout()) || (self.retry_on_connect && err.is_connect())
    }
}

/// What to do with a failed attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Decision {
    /// Wait the backoff delay and try again, if budget remains.
    Retry,
    /// Give up and surface this error.
    Fail,
}

/// Runs `op` until it succeeds, `classify` says [`Decision::Fail`], or the
/// attempt budget is spent. `op` receives the 1-based attempt number.
///
/// The error of the last attempt is returned unchanged.
pub(crate) async fn retry<T, E, F, Fut, C>(
    config: &RetryConfig,
    stage: &'static str,
    mut op: F,
    classify: C,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> Decision,
    E: Display,
{
    let max_attempts = config.attempts();
    let mut attempt = 1;
    loop {
        tracing::debug!(stage, attempt, max_attempts, "sending request");
        let err = match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if classify(&err) == Decision::Fail {
            tracing::debug!(stage, attempt, error = %err, "non-retryable failure");
            return Err(err);
        }
        if attempt >= max_attempts {
            tracing::warn!(stage, attempt, error = %err, "retry budget exhausted");
            return Err(err);
        }

        let delay = config.backoff.delay(attempt);
        tracing::warn!(stage, attempt, ?delay, error = %err, "attempt failed, retrying");
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
