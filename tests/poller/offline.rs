use crate::common;
use httpmock::Method::GET;
use httpmock::MockServer;
use szep_balance::{BalancePoller, BalanceSnapshot, PollerConfig, ScrapeError, SzepError};

fn poller(server: &MockServer) -> BalancePoller {
    let config = PollerConfig::new("Home", "12345678", "123").unwrap();
    BalancePoller::new(config, common::client(server))
}

const EXPECTED: BalanceSnapshot = BalanceSnapshot {
    accommodation: 1000,
    active_hungarians: 2000,
};

#[tokio::test]
async fn run_once_scrapes_then_fetches_and_stores() {
    let server = common::setup_server();
    let page = common::mock_landing_page(&server);
    let api = common::mock_balance(&server, common::OK_BODY);

    let p = poller(&server);
    assert_eq!(p.snapshot(), None);

    let snap = p.run_once().await.unwrap();

    page.assert();
    api.assert();
    assert_eq!(snap, EXPECTED);
    assert_eq!(p.snapshot(), Some(EXPECTED));
}

#[tokio::test]
async fn identical_ticks_do_not_notify_twice() {
    let server = common::setup_server();
    let page = common::mock_landing_page(&server);
    let api = common::mock_balance(&server, common::OK_BODY);

    let p = poller(&server);
    let mut rx = p.subscribe();

    p.tick().await;
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), Some(EXPECTED));

    p.tick().await;
    assert!(!rx.has_changed().unwrap());
    assert_eq!(p.snapshot(), Some(EXPECTED));

    // credentials are scraped again on every tick
    assert_eq!(page.hits(), 2);
    assert_eq!(api.hits(), 2);
}

#[tokio::test]
async fn failed_scrape_leaves_snapshot_untouched() {
    let server = common::setup_server();
    let mut page = common::mock_landing_page(&server);
    let api = common::mock_balance(&server, common::OK_BODY);

    let p = poller(&server);
    p.tick().await;
    assert_eq!(p.snapshot(), Some(EXPECTED));

    page.delete();
    let _broken = server.mock(|when, then| {
        when.method(GET).path(common::PAGE_PATH);
        then.status(200)
            .header("set-cookie", format!("PHPSESSID={}; path=/", common::SESSION))
            .body("<html><script>var redesigned = true;</script></html>");
    });

    let err = p.run_once().await.unwrap_err();
    assert!(
        matches!(err, SzepError::Scrape(ScrapeError::TokenNotFound(_))),
        "{err:?}"
    );

    p.tick().await;
    assert_eq!(p.snapshot(), Some(EXPECTED));
    assert_eq!(api.hits(), 1, "balance endpoint is not called without credentials");
}

#[tokio::test]
async fn rejected_card_keeps_previous_value_unset() {
    let server = common::setup_server();
    let _page = common::mock_landing_page(&server);
    let api = common::mock_balance(&server, r#"["HI", {}]"#);

    let p = poller(&server);
    p.tick().await;

    assert_eq!(p.snapshot(), None);
    assert!(p.readings().iter().all(|r| r.value.is_none()));
    assert_eq!(api.hits(), 1);
}

#[derive(Clone, Default)]
struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn failed_tick_is_logged_without_secrets() {
    use tracing::instrument::WithSubscriber;

    let server = common::setup_server();
    let _page = common::mock_landing_page(&server);
    let _api = common::mock_balance(&server, r#"["RC", {}]"#);

    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .finish();

    let p = poller(&server);
    p.tick().with_subscriber(subscriber).await;

    let out = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert!(out.contains("balance update failed"), "log output: {out}");
    assert!(out.contains("captcha"), "log output: {out}");
    assert!(!out.contains(common::TOKEN));
    assert!(!out.contains(common::SESSION));
    assert_eq!(p.snapshot(), None);
}
