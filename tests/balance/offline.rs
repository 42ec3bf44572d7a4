use crate::common;
use szep_balance::{AccountIdentity, BalanceSnapshot, Credentials, FetchError, fetch_balance};

fn identity() -> AccountIdentity {
    AccountIdentity::new(common::CARD_NUMBER, common::CARD_CODE).unwrap()
}

fn creds() -> Credentials {
    Credentials {
        token: common::TOKEN.to_string(),
        session_id: common::SESSION.to_string(),
    }
}

#[tokio::test]
async fn success_returns_both_pockets() {
    let server = common::setup_server();
    let api = common::mock_balance(&server, common::OK_BODY);

    let snap = fetch_balance(&common::client(&server), &identity(), &creds())
        .await
        .unwrap();

    api.assert();
    assert_eq!(
        snap,
        BalanceSnapshot {
            accommodation: 1000,
            active_hungarians: 2000
        }
    );
}

#[tokio::test]
async fn invalid_identity_makes_exactly_one_call() {
    let server = common::setup_server();
    let api = common::mock_balance(&server, r#"["HI", {}]"#);

    let err = fetch_balance(&common::client(&server), &identity(), &creds())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::InvalidCredentials), "{err:?}");
    assert_eq!(api.hits(), 1);
}

#[tokio::test]
async fn missing_balance_key_is_malformed_on_every_attempt() {
    let server = common::setup_server();
    let api = common::mock_balance(&server, r#"["OK", {"szamla_osszeg9": 1000}]"#);

    let err = fetch_balance(&common::client(&server), &identity(), &creds())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::MalformedResponse(_)), "{err:?}");
    assert_eq!(api.hits(), 3);
}

#[tokio::test]
async fn html_error_page_is_malformed() {
    let server = common::setup_server();
    let _api = common::mock_balance(&server, "<html><body>Hiba</body></html>");

    let err = fetch_balance(&common::client(&server), &identity(), &creds())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::MalformedResponse(_)), "{err:?}");
}

#[tokio::test]
async fn form_carries_the_requested_card() {
    let server = common::setup_server();
    let api = common::mock_balance(&server, common::OK_BODY);

    let other = AccountIdentity::new("87654321", "123").unwrap();
    let err = fetch_balance(&common::client(&server), &other, &creds())
        .await
        .unwrap_err();

    // the mock only matches the common card, so this request is unanswered
    assert!(matches!(err, FetchError::Transport(_)), "{err:?}");
    assert_eq!(api.hits(), 0);
}
