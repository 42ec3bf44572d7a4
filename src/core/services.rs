use crate::core::{AccountIdentity, BalanceSnapshot, Credentials, FetchError, ScrapeError};

/// Boxed, `Send` future returned by the service traits.
pub type BoxFuture<'a, T> = std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// A trait for services that can produce fresh portal credentials.
///
/// Implemented by [`SzepClient`](crate::SzepClient); the poller depends on this
/// trait so either stage can be replaced in tests.
pub trait CredentialService: Send + Sync {
    /// Scrapes a token and session id that are valid for one tick.
    fn scrape_credentials(&self) -> BoxFuture<'_, Result<Credentials, ScrapeError>>;
}

/// A trait for services that can fetch a balance snapshot with given credentials.
///
/// Implemented by [`SzepClient`](crate::SzepClient).
pub trait BalanceService: Send + Sync {
    /// Runs the balance request, including its retry loop.
    fn fetch_balance<'a>(
        &'a self,
        identity: &'a AccountIdentity,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<BalanceSnapshot, FetchError>>;
}

/// One raw balance request: send the form, hand back the response body.
///
/// Status classification and decoding happen above this seam, in
/// [`crate::balance`]. Implemented by [`SzepClient`](crate::SzepClient).
pub trait BalanceTransport: Send + Sync {
    /// Posts the balance form once. Non-2xx statuses must surface as [`FetchError::Transport`].
    fn post_balance<'a>(
        &'a self,
        identity: &'a AccountIdentity,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<String, FetchError>>;
}
