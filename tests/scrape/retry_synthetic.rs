use crate::common;
use httpmock::Method::GET;
use szep_balance::{ScrapeError, SzepClient, scrape_credentials};
use url::Url;

#[tokio::test]
async fn server_errors_are_retried_up_to_the_budget() {
    let server = common::setup_server();
    let page = server.mock(|when, then| {
        when.method(GET).path(common::PAGE_PATH);
        then.status(503).body("maintenance");
    });

    let err = scrape_credentials(&common::client(&server))
        .await
        .unwrap_err();

    match err {
        ScrapeError::Transport(e) => assert_eq!(e.status().map(|s| s.as_u16()), Some(503)),
        other => panic!("expected Transport error, got {other:?}"),
    }
    // one attempt plus three retries
    assert_eq!(page.hits(), 4);
}

#[tokio::test]
async fn throttling_is_retried() {
    let server = common::setup_server();
    let page = server.mock(|when, then| {
        when.method(GET).path(common::PAGE_PATH);
        then.status(429);
    });

    let client = SzepClient::builder()
        .page_url(Url::parse(&format!("{}{}", server.base_url(), common::PAGE_PATH)).unwrap())
        .scrape_retry(common::instant_scrape_retry().with_max_attempts(2))
        .build()
        .unwrap();

    assert!(scrape_credentials(&client).await.is_err());
    assert_eq!(page.hits(), 2);
}

#[tokio::test]
async fn client_errors_fail_fast() {
    let server = common::setup_server();
    let page = server.mock(|when, then| {
        when.method(GET).path(common::PAGE_PATH);
        then.status(404);
    });

    let err = scrape_credentials(&common::client(&server))
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::Transport(_)), "{err:?}");
    assert_eq!(page.hits(), 1);
}
