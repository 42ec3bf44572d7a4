//! Public client surface + builder.
//! Internals are split into `constants` (UA + defaults) and `retry` (backoff policy).

mod constants;
mod retry;

pub use constants::{DEFAULT_SCAN_INTERVAL_SECS, DEFAULT_URL_API, DEFAULT_URL_HTML, SESSION_COOKIE};
pub use retry::{Backoff, RetryConfig};
pub(crate) use retry::{Decision, retry};

use crate::core::SzepError;
use constants::{DEFAULT_TIMEOUT, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Holds the configured HTTP client, the two portal endpoints and the retry
/// policy of each pipeline stage.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct SzepClient {
    http: Client,
    page_url: Url,
    api_url: Url,
    timeout: Duration,
    scrape_retry: RetryConfig,
    fetch_retry: RetryConfig,
}

impl Default for SzepClient {
    fn default() -> Self {
        Self::builder().build().expect("default client")
    }
}

impl SzepClient {
    /// Create a new builder.
    pub fn builder() -> SzepClientBuilder {
        SzepClientBuilder::default()
    }

    /* -------- internal getters used by other modules -------- */

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }
    pub(crate) fn page_url(&self) -> &Url {
        &self.page_url
    }
    pub(crate) fn api_url(&self) -> &Url {
        &self.api_url
    }
    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }
    pub(crate) fn scrape_retry(&self) -> &RetryConfig {
        &self.scrape_retry
    }
    pub(crate) fn fetch_retry(&self) -> &RetryConfig {
        &self.fetch_retry
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct SzepClientBuilder {
    user_agent: Option<String>,
    page_url: Option<Url>,
    api_url: Option<Url>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    scrape_retry: Option<RetryConfig>,
    fetch_retry: Option<RetryConfig>,
}

impl SzepClientBuilder {
    /// Override the User-Agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Override the landing page (e.g., `https://magan.szepkartya.otpportalok.hu/fooldal/`).
    pub fn page_url(mut self, url: Url) -> Self {
        self.page_url = Some(url);
        self
    }

    /// Override the balance endpoint (e.g., `https://magan.szepkartya.otpportalok.hu/ajax/egyenleglekerdezes/`).
    pub fn api_url(mut self, url: Url) -> Self {
        self.api_url = Some(url);
        self
    }

    /// Set the timeout applied to every single HTTP attempt. Default: 10s.
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: none.
    pub fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// Retry policy for the landing-page GET. Default: [`RetryConfig::default`].
    pub fn scrape_retry(mut self, cfg: RetryConfig) -> Self {
        self.scrape_retry = Some(cfg);
        self
    }

    /// Retry policy for the balance POST. Default: [`RetryConfig::balance`].
    pub fn fetch_retry(mut self, cfg: RetryConfig) -> Self {
        self.fetch_retry = Some(cfg);
        self
    }

    pub fn build(self) -> Result<SzepClient, SzepError> {
        let page_url = match self.page_url {
            Some(u) => u,
            None => Url::parse(DEFAULT_URL_HTML)?,
        };
        let api_url = match self.api_url {
            Some(u) => u,
            None => Url::parse(DEFAULT_URL_API)?,
        };

        // The session cookie is attached by hand so it stays scoped to one tick.
        let mut httpb = reqwest::Client::builder()
            .user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT))
            .cookie_store(false);

        if let Some(ct) = self.connect_timeout {
            httpb = httpb.connect_timeout(ct);
        }

        let http = httpb.build()?;

        Ok(SzepClient {
            http,
            page_url,
            api_url,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            scrape_retry: self.scrape_retry.unwrap_or_default(),
            fetch_retry: self.fetch_retry.unwrap_or_else(RetryConfig::balance),
        })
    }
}
