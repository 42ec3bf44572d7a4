//! szep-balance: poll SZÉP card balances from the OTP card portal.
//!
//! The portal has no public API. Every cycle scrapes the landing page for a
//! short-lived `ajax_token` and a `PHPSESSID` session, then posts them with
//! the card identity to the balance endpoint.
//!
//! ```no_run
//! use std::sync::Arc;
//! use szep_balance::{BalancePoller, PollerConfig};
//!
//! # async fn run() -> Result<(), szep_balance::SzepError> {
//! let config = PollerConfig::new("Home", "12345678", "123")?;
//! let client = config.client()?;
//! let poller = Arc::new(BalancePoller::new(config, client));
//!
//! let snapshot = poller.run_once().await?;
//! println!("accommodation: {} HUF", snapshot.accommodation);
//!
//! let handle = poller.clone().spawn();
//! # handle.shutdown();
//! # Ok(())
//! # }
//! ```

pub mod balance;
pub mod core;
pub mod poller;
pub mod scrape;

pub use crate::core::client::{DEFAULT_URL_API, DEFAULT_URL_HTML};
pub use crate::core::{
    AccountIdentity, Backoff, BalanceKind, BalanceService, BalanceSnapshot, CredentialService,
    Credentials, FetchError, Reading, RetryConfig, ScrapeError, SzepClient, SzepClientBuilder,
    SzepError,
};
pub use balance::fetch_balance;
pub use poller::{BalancePoller, PollerConfig, PollerHandle, SnapshotStore};
pub use scrape::scrape_credentials;
