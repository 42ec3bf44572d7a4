use std::time::Duration;

use url::Url;

use crate::core::client::DEFAULT_SCAN_INTERVAL_SECS;
use crate::core::{AccountIdentity, SzepClient, SzepError};

/// Settings of one card integration: display name, identity, poll interval
/// and optional endpoint overrides.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub name: String,
    pub identity: AccountIdentity,
    pub(crate) scan_interval: Duration,
    pub page_url: Option<Url>,
    pub api_url: Option<Url>,
}

impl PollerConfig {
    /// Validates the card fields; the interval starts at the 1200 s default.
    ///
    /// # Errors
    ///
    /// Returns [`SzepError::Config`] for a blank name or wrong-length card fields.
    pub fn new(
        name: impl Into<String>,
        card_number: impl Into<String>,
        card_code: impl Into<String>,
    ) -> Result<Self, SzepError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(SzepError::Config("name must not be empty".into()));
        }
        Ok(Self {
            name,
            identity: AccountIdentity::new(card_number, card_code)?,
            scan_interval: Duration::from_secs(DEFAULT_SCAN_INTERVAL_SECS),
            page_url: None,
            api_url: None,
        })
    }

    /// Sets the poll interval.
    ///
    /// # Errors
    ///
    /// Returns [`SzepError::Config`] if `secs` is zero.
    pub fn scan_interval_secs(mut self, secs: u64) -> Result<Self, SzepError> {
        if secs == 0 {
            return Err(SzepError::Config("scan interval must be positive".into()));
        }
        self.scan_interval = Duration::from_secs(secs);
        Ok(self)
    }

    /// Poll interval; always at least one second once set through
    /// [`scan_interval_secs`](Self::scan_interval_secs).
    pub fn scan_interval(&self) -> Duration {
        self.scan_interval
    }

    /// Reads the settings from `SZEP_*` environment variables.
    ///
    /// | Variable             | Required | Default               |
    /// |----------------------|----------|-----------------------|
    /// | `SZEP_CARD_NUMBER`   | yes      |                       |
    /// | `SZEP_CARD_CODE`     | yes      |                       |
    /// | `SZEP_NAME`          | no       | `SZEP card`           |
    /// | `SZEP_SCAN_INTERVAL` | no       | `1200` (seconds)      |
    /// | `SZEP_URL_HTML`      | no       | portal landing page   |
    /// | `SZEP_URL_API`       | no       | portal balance API    |
    ///
    /// # Errors
    ///
    /// Returns [`SzepError::Config`] for missing or invalid values and
    /// [`SzepError::Url`] for unparsable URL overrides.
    pub fn from_env() -> Result<Self, SzepError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, SzepError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| SzepError::Config(format!("{key} is not set")))
        };

        let mut cfg = Self::new(
            lookup("SZEP_NAME").unwrap_or_else(|| "SZEP card".to_string()),
            required("SZEP_CARD_NUMBER")?,
            required("SZEP_CARD_CODE")?,
        )?;

        if let Some(raw) = lookup("SZEP_SCAN_INTERVAL") {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                SzepError::Config(format!("SZEP_SCAN_INTERVAL {raw:?} is not a number: {e}"))
            })?;
            cfg = cfg.scan_interval_secs(secs)?;
        }
        if let Some(raw) = lookup("SZEP_URL_HTML") {
            cfg.page_url = Some(Url::parse(raw.trim())?);
        }
        if let Some(raw) = lookup("SZEP_URL_API") {
            cfg.api_url = Some(Url::parse(raw.trim())?);
        }

        Ok(cfg)
    }

    /// Builds a client with this config's endpoint overrides and default retry policies.
    ///
    /// # Errors
    ///
    /// Returns [`SzepError::Http`] if the HTTP client cannot be constructed.
    pub fn client(&self) -> Result<SzepClient, SzepError> {
        let mut b = SzepClient::builder();
        if let Some(u) = &self.page_url {
            b = b.page_url(u.clone());
        }
        if let Some(u) = &self.api_url {
            b = b.api_url(u.clone());
        }
        b.build()
    }
}
