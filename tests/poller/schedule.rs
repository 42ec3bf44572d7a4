use crate::common;
use std::sync::Arc;
use std::time::Duration;
use szep_balance::{BalancePoller, PollerConfig};

#[tokio::test]
async fn spawned_poller_ticks_immediately() {
    let server = common::setup_server();
    let _page = common::mock_landing_page(&server);
    let api = common::mock_balance(&server, common::OK_BODY);

    let config = PollerConfig::new("Home", "12345678", "123")
        .unwrap()
        .scan_interval_secs(3600)
        .unwrap();
    let poller = Arc::new(BalancePoller::new(config, common::client(&server)));
    let mut rx = poller.subscribe();

    let handle = poller.clone().spawn();
    tokio::time::timeout(Duration::from_secs(10), rx.changed())
        .await
        .expect("first tick within timeout")
        .unwrap();

    let readings = poller.readings();
    assert_eq!(readings[0].value, Some(1000));
    assert_eq!(readings[1].value, Some(2000));
    assert_eq!(api.hits(), 1);

    handle.shutdown();
}
