use crate::common;
use httpmock::Method::GET;
use szep_balance::{ScrapeError, scrape_credentials};

#[tokio::test]
async fn scrape_returns_embedded_token_and_session_cookie() {
    let server = common::setup_server();
    let page = common::mock_landing_page(&server);

    let creds = scrape_credentials(&common::client(&server)).await.unwrap();

    page.assert();
    assert_eq!(creds.token, common::TOKEN);
    assert_eq!(creds.token.len(), 64);
    assert_eq!(creds.session_id, common::SESSION);
}

#[tokio::test]
async fn page_without_marker_is_token_not_found() {
    let server = common::setup_server();
    let page = server.mock(|when, then| {
        when.method(GET).path(common::PAGE_PATH);
        then.status(200)
            .header("set-cookie", "PHPSESSID=abc; path=/")
            .body("<html><head><script>var lang = 'hu';</script></head></html>");
    });

    let err = scrape_credentials(&common::client(&server))
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::TokenNotFound(_)), "{err:?}");
    assert_eq!(page.hits(), 1, "extraction failures are not retried");
}

#[tokio::test]
async fn malformed_token_is_token_not_found() {
    let server = common::setup_server();
    let _page = server.mock(|when, then| {
        when.method(GET).path(common::PAGE_PATH);
        then.status(200)
            .header("set-cookie", "PHPSESSID=abc; path=/")
            .body("<script>var ajax_token = 'TOO-SHORT';</script>");
    });

    let err = scrape_credentials(&common::client(&server))
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::TokenNotFound(_)), "{err:?}");
}

#[tokio::test]
async fn missing_session_cookie_is_an_error() {
    let server = common::setup_server();
    let _page = server.mock(|when, then| {
        when.method(GET).path(common::PAGE_PATH);
        then.status(200)
            .header("set-cookie", "lang=hu; path=/")
            .body(common::fixture("landing_page.html"));
    });

    let err = scrape_credentials(&common::client(&server))
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::SessionCookieMissing), "{err:?}");
}
