//! Scrape the portal landing page for the balance API credentials.
//!
//! The page embeds a short-lived `ajax_token` in an inline script and opens a
//! PHP session via `Set-Cookie: PHPSESSID=...`. Both are needed by the balance
//! endpoint and both must be fetched again on every tick.

pub mod extract;

use crate::core::client::{Decision, SESSION_COOKIE, retry};
use crate::core::services::BoxFuture;
use crate::core::{CredentialService, Credentials, ScrapeError, SzepClient};

/// Fetches the landing page and extracts a fresh token and session id.
///
/// The GET is retried on the statuses and transport faults listed in the
/// client's scrape [`RetryConfig`](crate::RetryConfig). Extraction failures are
/// not retried.
///
/// # Errors
///
/// - [`ScrapeError::Transport`] if the page could not be fetched.
/// - [`ScrapeError::TokenNotFound`] if the page carries no well-formed token.
/// - [`ScrapeError::SessionCookieMissing`] if no `PHPSESSID` cookie was set.
#[tracing::instrument(skip_all, fields(url = %client.page_url()))]
pub async fn scrape_credentials(client: &SzepClient) -> Result<Credentials, ScrapeError> {
    let policy = client.scrape_retry();
    let url = client.page_url();

    let resp = retry(
        policy,
        "landing_page",
        |_| async move {
            let resp = client
                .http()
                .get(url.clone())
                .timeout(client.timeout())
                .send()
                .await?;
            Ok::<_, ScrapeError>(resp.error_for_status()?)
        },
        |e| match e {
            ScrapeError::Transport(err) if policy.is_transient(err) => Decision::Retry,
            _ => Decision::Fail,
        },
    )
    .await?;

    let session_id = resp
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.value().to_string());
    let body = resp.text().await?;

    let token = extract::token_from_html(&body)?;
    let session_id = session_id
        .filter(|s| !s.is_empty())
        .ok_or(ScrapeError::SessionCookieMissing)?;

    tracing::info!("scraped token and session id");
    Ok(Credentials { token, session_id })
}

impl CredentialService for SzepClient {
    fn scrape_credentials(&self) -> BoxFuture<'_, Result<Credentials, ScrapeError>> {
        Box::pin(scrape_credentials(self))
    }
}
