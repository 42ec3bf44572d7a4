//! Authenticated balance request against the portal's AJAX endpoint.
//!
//! One call is a small attempt loop: post the form, decode the
//! `[code, payload]` answer, then either return the snapshot, retry on a
//! captcha challenge or transient fault, or stop on a rejected card.

pub(crate) mod wire;

use reqwest::header::COOKIE;

use crate::core::client::{Decision, RetryConfig, SESSION_COOKIE, retry};
use crate::core::services::BoxFuture;
use crate::core::{
    AccountIdentity, BalanceService, BalanceSnapshot, BalanceTransport, Credentials, FetchError,
    SzepClient,
};
use wire::BalanceReply;

/// Form fields of the balance request, in the order the portal's own page sends them.
pub(crate) fn balance_form<'a>(
    identity: &'a AccountIdentity,
    credentials: &'a Credentials,
) -> [(&'static str, &'a str); 4] {
    [
        ("s_azonosito_k", identity.card_number()),
        ("s_telekod_k", identity.card_code()),
        ("ajax_token", credentials.token.as_str()),
        ("s_captcha", ""),
    ]
}

/// Fetches both balances with the client's balance [`RetryConfig`].
///
/// The same credentials are reused for every attempt; they are not re-scraped
/// after a captcha challenge.
///
/// # Errors
///
/// - [`FetchError::InvalidCredentials`] immediately, without retrying.
/// - [`FetchError::CaptchaBlocked`] if every attempt was answered with a challenge.
/// - [`FetchError::Transport`] or [`FetchError::MalformedResponse`] from the last attempt
///   once the budget is spent.
pub async fn fetch_balance(
    client: &SzepClient,
    identity: &AccountIdentity,
    credentials: &Credentials,
) -> Result<BalanceSnapshot, FetchError> {
    fetch_with(client, client.fetch_retry(), identity, credentials).await
}

pub(crate) async fn fetch_with<T>(
    transport: &T,
    policy: &RetryConfig,
    identity: &AccountIdentity,
    credentials: &Credentials,
) -> Result<BalanceSnapshot, FetchError>
where
    T: BalanceTransport + ?Sized,
{
    let snapshot = retry(
        policy,
        "balance",
        |attempt| async move {
            let body = transport.post_balance(identity, credentials).await?;
            match BalanceReply::decode(&body)? {
                BalanceReply::CaptchaChallenge => {
                    tracing::warn!(attempt, "captcha triggered due to too many requests");
                    Err(FetchError::CaptchaBlocked { attempts: attempt })
                }
                BalanceReply::InvalidIdentity => Err(FetchError::InvalidCredentials),
                BalanceReply::Success { code, payload } => {
                    tracing::debug!(attempt, %code, "balance payload received");
                    wire::extract_snapshot(payload)
                }
            }
        },
        |e| match e {
            FetchError::InvalidCredentials => Decision::Fail,
            _ => Decision::Retry,
        },
    )
    .await?;

    tracing::info!("balance fetched successfully");
    Ok(snapshot)
}

async fn post_balance_form(
    client: &SzepClient,
    identity: &AccountIdentity,
    credentials: &Credentials,
) -> Result<String, FetchError> {
    let resp = client
        .http()
        .post(client.api_url().clone())
        .timeout(client.timeout())
        .header(COOKIE, format!("{SESSION_COOKIE}={}", credentials.session_id))
        .form(&balance_form(identity, credentials))
        .send()
        .await?
        .error_for_status()?;
    Ok(resp.text().await?)
}

impl BalanceTransport for SzepClient {
    fn post_balance<'a>(
        &'a self,
        identity: &'a AccountIdentity,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<String, FetchError>> {
        Box::pin(post_balance_form(self, identity, credentials))
    }
}

impl BalanceService for SzepClient {
    fn fetch_balance<'a>(
        &'a self,
        identity: &'a AccountIdentity,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<BalanceSnapshot, FetchError>> {
        Box::pin(fetch_balance(self, identity, credentials))
    }
}
