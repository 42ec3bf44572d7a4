//! Centralized constants for default endpoints, UA and timing.

use std::time::Duration;

/// Default desktop UA; the portal serves a stripped page to obvious bots.
pub(crate) const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (X11; Linux x86_64) ",
    "AppleWebKit/537.36 (KHTML, like Gecko) ",
    "Chrome/122.0.0.0 Safari/537.36"
);

/// Landing page that embeds `ajax_token` and sets `PHPSESSID`.
pub const DEFAULT_URL_HTML: &str = "https://magan.szepkartya.otpportalok.hu/fooldal/";

/// Balance query endpoint (form-encoded POST, JSON answer).
pub const DEFAULT_URL_API: &str = "https://magan.szepkartya.otpportalok.hu/ajax/egyenleglekerdezes/";

/// Name of the session cookie correlating the scrape and the balance request.
pub const SESSION_COOKIE: &str = "PHPSESSID";

/// Per-attempt request timeout.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Seconds between scheduled ticks.
pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 1200;
