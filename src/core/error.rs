use thiserror::Error;

/// Failures of the landing-page scrape that yields the token and session id.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The page could not be fetched: connection failure, timeout or a non-2xx status.
    #[error("landing page request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// No `<script>` block carries a well-formed `ajax_token` assignment.
    #[error("ajax_token not found: {0}")]
    TokenNotFound(&'static str),

    /// The landing page response did not set the session cookie.
    #[error("PHPSESSID cookie not found in response")]
    SessionCookieMissing,
}

/// Failures of the authenticated balance request.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection failure, timeout or a non-2xx status on the balance endpoint.
    #[error("balance request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The portal kept answering with a captcha challenge (`RC`) until the retry budget ran out.
    #[error("captcha protection could not be bypassed after {attempts} attempts")]
    CaptchaBlocked {
        /// How many requests were made before giving up.
        attempts: u32,
    },

    /// The portal rejected the card number or card code (`HI`).
    #[error("invalid card number or card code")]
    InvalidCredentials,

    /// The body was not a `[code, payload]` array, or the balance fields were missing.
    #[error("malformed balance response: {0}")]
    MalformedResponse(String),
}

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum SzepError {
    /// The credential scrape failed.
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    /// The balance request failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Account or polling settings failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),
}
