#![allow(clippy::unwrap_used)]
// End-to-end reconciliation tests against a wiremock switch.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use wiremock::matchers::{body_string, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gsctl_core::mapping::SPEED;
use gsctl_core::{
    CoreError, MemoryTokenStore, PoeSettingsChange, PortSetting, PortSettingsChange, Session,
    SwitchModel, TokenStore, TransportConfig,
};

const GS308EP_DASHBOARD: &str = include_str!("../../gsctl-api/fixtures/gs308ep_dashboard.html");
const GS308EP_POE_CONFIG: &str = include_str!("../../gsctl-api/fixtures/gs308ep_poe_config.html");
const GS30X_LOGIN: &str = include_str!("../../gsctl-api/fixtures/gs30x_login.html");
const GS316EP_ROOT: &str = include_str!("../../gsctl-api/fixtures/gs316ep_root.html");
const GS316EP_LOGIN: &str = include_str!("../../gsctl-api/fixtures/gs316ep_login.html");
const GS316EP_LOGIN_SUCCESS: &str =
    include_str!("../../gsctl-api/fixtures/gs316ep_login_success.html");
const GS316EP_DASHBOARD: &str = include_str!("../../gsctl-api/fixtures/gs316ep_dashboard.html");
const GS316EP_POE_CONFIG: &str = include_str!("../../gsctl-api/fixtures/gs316ep_poe_config.html");
const GS316EP_POE_STATUS: &str = include_str!("../../gsctl-api/fixtures/gs316ep_poe_status.html");

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup_with(
    stored: Option<&str>,
    timeout: Duration,
) -> (MockServer, Session, Arc<MemoryTokenStore>) {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryTokenStore::new());
    if let Some(value) = stored {
        store.save(&server.uri(), value).unwrap();
    }
    let session = Session::new(
        &server.uri(),
        &TransportConfig::with_timeout(timeout),
        store.clone(),
    )
    .unwrap();
    (server, session, store)
}

async fn setup(stored: &str) -> (MockServer, Session) {
    let (server, session, _) = setup_with(Some(stored), Duration::from_secs(5)).await;
    (server, session)
}

fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(body.into())
}

async fn mount_once(server: &MockServer, verb: &str, route: &str, body: &str) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(html(body))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

// ── Port settings ───────────────────────────────────────────────────

#[tokio::test]
async fn test_gs30x_disable_port_end_to_end() {
    let (server, mut session) = setup("GS308EP:sid1").await;

    let before = "class=\"port\" value=\"2\">\n        <input type=\"hidden\" class=\"portName\" value=\"\">\n        <input type=\"hidden\" class=\"Speed\" value=\"1\">";
    let after = before.replace("class=\"Speed\" value=\"1\"", "class=\"Speed\" value=\"2\"");
    assert!(GS308EP_DASHBOARD.contains(before));

    mount_once(&server, "GET", "/dashboard.cgi", GS308EP_DASHBOARD).await;
    mount_once(&server, "GET", "/dashboard.cgi", GS308EP_DASHBOARD).await;
    Mock::given(method("GET"))
        .and(path("/dashboard.cgi"))
        .respond_with(html(GS308EP_DASHBOARD.replace(before, &after)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/port_status.cgi"))
        .and(body_string(
            "hash=4f11f5d2b8ec3a6c&port2=checked&SPEED=2&FLOW_CONTROL=2&DESCRIPTION=&IngressRate=1&EgressRate=1&priority=0",
        ))
        .respond_with(html("SUCCESS"))
        .expect(1)
        .mount(&server)
        .await;

    let original = session.get_port_settings(&[2]).await.unwrap();
    let change = PortSettingsChange {
        speed: Some("Disable".into()),
        ..PortSettingsChange::default()
    };
    let ports = session.set_port_settings(&[2], change).await.unwrap();

    assert_eq!(SPEED.display(&ports[0].speed), "Disable");
    let expected = vec![PortSetting {
        speed: ports[0].speed.clone(),
        ..original[0].clone()
    }];
    pretty_assertions::assert_eq!(ports, expected);
    assert_ne!(original[0].speed, ports[0].speed);
}

#[tokio::test]
async fn test_set_with_no_ports_returns_nothing() {
    let (server, mut session) = setup("GS308EP:sid1").await;
    Mock::given(method("GET"))
        .and(path("/dashboard.cgi"))
        .respond_with(html(GS308EP_DASHBOARD))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/port_status.cgi"))
        .respond_with(html("SUCCESS"))
        .expect(0)
        .mount(&server)
        .await;

    let change = PortSettingsChange {
        speed: Some("Disable".into()),
        ..PortSettingsChange::default()
    };
    let ports = session.set_port_settings(&[], change).await.unwrap();
    assert!(ports.is_empty());
}

#[tokio::test]
async fn test_gs316_disable_port_end_to_end() {
    let (server, mut session) = setup("GS316EP:TOK").await;

    let before = "<span class=\"port-number\">4</span>\n        <span class=\"port-name\"><span class=\"name\"></span></span>\n        <p class=\"speed-text\">Auto</p>";
    let after = before.replace("Auto", "Disable");
    assert!(GS316EP_DASHBOARD.contains(before));

    mount_once(&server, "GET", "/iss/specific/dashboard.html", GS316EP_DASHBOARD).await;
    Mock::given(method("GET"))
        .and(path("/iss/specific/dashboard.html"))
        .respond_with(html(GS316EP_DASHBOARD.replace(before, &after)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/iss/specific/dashboard.html"))
        .and(query_param("Gambit", "TOK"))
        .and(body_string_contains("PORT_NO=4"))
        .and(body_string_contains("INGRESS=NOTSET&EGRESS=NOTSET&FLOW_CONTROL=NOTSET"))
        .and(body_string_contains(
            "PORT_CTRL_MODE=3&PORT_CTRL_SPEED=NOTSET&PORT_CTRL_DUPLEX=NOTSET",
        ))
        .respond_with(html("SUCCESS"))
        .expect(1)
        .mount(&server)
        .await;

    let change = PortSettingsChange {
        speed: Some("disable".into()),
        ..PortSettingsChange::default()
    };
    let ports = session.set_port_settings(&[4], change).await.unwrap();

    assert_eq!(ports.len(), 1);
    assert_eq!(ports[0].speed, "2");
    assert_eq!(ports[0].flow_control, "1");
}

#[tokio::test]
async fn test_gs316_labels_come_back_as_codes() {
    let (server, mut session) = setup("GS316EP:TOK").await;
    Mock::given(method("GET"))
        .and(path("/iss/specific/dashboard.html"))
        .respond_with(html(GS316EP_DASHBOARD))
        .mount(&server)
        .await;

    let ports = session.get_port_settings(&[5, 3]).await.unwrap();

    assert_eq!(ports[0].index, 5);
    assert_eq!(ports[0].ingress_rate, "6");
    assert_eq!(ports[0].egress_rate, "7");
    assert_eq!(ports[1].speed, "6");
}

#[tokio::test]
async fn test_port_out_of_range_sends_nothing() {
    let (server, mut session) = setup("GS308EP:sid1").await;
    Mock::given(method("GET"))
        .and(path("/dashboard.cgi"))
        .respond_with(html(GS308EP_DASHBOARD))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(html("SUCCESS"))
        .expect(0)
        .mount(&server)
        .await;

    let change = PortSettingsChange {
        name: Some("Spare".into()),
        ..PortSettingsChange::default()
    };
    let err = session.set_port_settings(&[1, 9], change).await.unwrap_err();
    assert!(matches!(err, CoreError::PortOutOfRange { port: 9, max: 8 }));
}

#[tokio::test]
async fn test_invalid_label_sends_nothing() {
    let (server, mut session) = setup("GS308EP:sid1").await;
    Mock::given(method("GET"))
        .and(path("/dashboard.cgi"))
        .respond_with(html(GS308EP_DASHBOARD))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(html("SUCCESS"))
        .expect(0)
        .mount(&server)
        .await;

    let change = PortSettingsChange {
        ingress_rate: Some("infinite".into()),
        ..PortSettingsChange::default()
    };
    let err = session.set_port_settings(&[1], change).await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidSettingValue { .. }));
}

// ── PoE settings ────────────────────────────────────────────────────

#[tokio::test]
async fn test_mid_batch_rejection_leaves_earlier_ports_applied() {
    // Known inconsistency: there is no rollback of port 1.
    let (server, mut session) = setup("GS308EP:sid1").await;
    Mock::given(method("GET"))
        .and(path("/PoEPortConfig.cgi"))
        .respond_with(html(GS308EP_POE_CONFIG))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/PoEPortConfig.cgi"))
        .and(body_string_contains("portID=0"))
        .respond_with(html("SUCCESS"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/PoEPortConfig.cgi"))
        .and(body_string_contains("portID=1"))
        .respond_with(html("FAIL: port busy"))
        .expect(1)
        .mount(&server)
        .await;

    let change = PoeSettingsChange {
        admin: Some("disable".into()),
        ..PoeSettingsChange::default()
    };
    let err = session.set_poe_settings(&[1, 2, 3], change).await.unwrap_err();

    match err {
        CoreError::DeviceRejected { message } => assert_eq!(message, "FAIL: port busy"),
        other => panic!("expected DeviceRejected, got {other:?}"),
    }
    // No third write, and no verifying re-fetch.
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_gs30x_power_limit_falls_back_when_out_of_range() {
    let (server, mut session) = setup("GS308EP:sid1").await;
    Mock::given(method("GET"))
        .and(path("/PoEPortConfig.cgi"))
        .respond_with(html(GS308EP_POE_CONFIG))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/PoEPortConfig.cgi"))
        .and(body_string_contains("portID=0"))
        .and(body_string_contains("POW_LIMT=15.0"))
        .respond_with(html("SUCCESS"))
        .expect(1)
        .mount(&server)
        .await;

    let change = PoeSettingsChange {
        power_limit: Some("99999999.0".into()),
        ..PoeSettingsChange::default()
    };
    let ports = session.set_poe_settings(&[1], change).await.unwrap();
    assert_eq!(ports[0].limit_watts, "15.0");
}

#[tokio::test]
async fn test_gs316_power_limit_is_sent_in_tenths() {
    let (server, mut session) = setup("GS316EP:TOK").await;
    Mock::given(method("GET"))
        .and(path("/iss/specific/poePortConf.html"))
        .and(query_param("Gambit", "TOK"))
        .respond_with(html(GS316EP_POE_CONFIG))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/iss/specific/poePortConf.html"))
        .and(body_string_contains("PORT_NO=3&POWER_LIMIT_VALUE=200"))
        .and(body_string_contains(
            "PRIORITY=NOTSET&POWER_MODE=NOTSET&POWER_LIMIT_TYPE=2&DETECTION=NOTSET&ADMIN_STATE=NOTSET&DISCONNECT_TYPE=NOTSET",
        ))
        .respond_with(html("SUCCESS"))
        .expect(1)
        .mount(&server)
        .await;

    let change = PoeSettingsChange {
        power_limit: Some("20".into()),
        ..PoeSettingsChange::default()
    };
    session.set_poe_settings(&[3], change).await.unwrap();
}

// ── Power cycle ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_gs316_cycle_posts_mask_and_rereads_config() {
    let (server, mut session) = setup("GS316EP:TOK").await;
    Mock::given(method("POST"))
        .and(path("/iss/specific/poePortConf.html"))
        .and(body_string("Gambit=TOK&TYPE=resetPoe&PoePort=001010000000000"))
        .respond_with(html("SUCCESS"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/iss/specific/poePortConf.html"))
        .and(query_param("Gambit", "TOK"))
        .respond_with(html(GS316EP_POE_CONFIG))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/iss/specific/poePortStatus.html"))
        .respond_with(html(GS316EP_POE_STATUS))
        .expect(0)
        .mount(&server)
        .await;

    let settings = session.cycle_poe_power(&[5, 3]).await.unwrap();
    let indices: Vec<u8> = settings.iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![5, 3]);
    assert_eq!(settings[0].limit_watts, "30.0");

    let requests = server.received_requests().await.unwrap();
    let trail: Vec<String> = requests
        .iter()
        .map(|r| format!("{} {}", r.method, r.url.path()))
        .collect();
    assert_eq!(
        trail,
        vec![
            "POST /iss/specific/poePortConf.html",
            "GET /iss/specific/poePortConf.html"
        ]
    );
}

#[tokio::test]
async fn test_gs316_cycle_rejects_port_16() {
    let (server, mut session) = setup("GS316EP:TOK").await;

    let err = session.cycle_poe_power(&[16]).await.unwrap_err();

    assert!(matches!(err, CoreError::PortOutOfRange { port: 16, max: 15 }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_gs30x_cycle_uses_hash_and_zero_based_ports() {
    let (server, mut session) = setup("GS308EP:sid1").await;
    Mock::given(method("GET"))
        .and(path("/PoEPortConfig.cgi"))
        .respond_with(html(GS308EP_POE_CONFIG))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/PoEPortConfig.cgi"))
        .and(body_string(
            "hash=5a2d0c7e91b3f4aa&ACTION=Reset&port0=checked&port3=checked",
        ))
        .respond_with(html("SUCCESS"))
        .expect(1)
        .mount(&server)
        .await;

    let settings = session.cycle_poe_power(&[1, 4]).await.unwrap();
    assert_eq!(settings.len(), 2);
    assert_eq!(settings[0].name, "Camera");
    assert_eq!(settings[1].index, 4);

    let requests = server.received_requests().await.unwrap();
    let trail: Vec<String> = requests
        .iter()
        .map(|r| format!("{} {}", r.method, r.url.path()))
        .collect();
    assert_eq!(
        trail,
        vec![
            "GET /PoEPortConfig.cgi",
            "POST /PoEPortConfig.cgi",
            "GET /PoEPortConfig.cgi"
        ]
    );
}

// ── Session ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_token_is_not_authenticated() {
    let (server, mut session, _) = setup_with(None, Duration::from_secs(5)).await;

    let err = session.get_poe_status(&[]).await.unwrap_err();

    assert!(matches!(err, CoreError::NotAuthenticated { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_token_is_stale() {
    let (_server, mut session) = setup("not a token").await;
    let err = session.get_poe_status(&[]).await.unwrap_err();
    assert!(matches!(err, CoreError::StaleTokenFormat { .. }));

    let (_server, mut session) = setup("GS999:abc").await;
    let err = session.get_poe_status(&[]).await.unwrap_err();
    assert!(matches!(err, CoreError::StaleTokenFormat { .. }));
}

#[tokio::test]
async fn test_expired_session_requires_login() {
    let (server, mut session) = setup("GS308EP:old").await;
    Mock::given(method("GET"))
        .and(path("/getPoePortStatus.cgi"))
        .respond_with(html(GS30X_LOGIN))
        .mount(&server)
        .await;

    let err = session.get_poe_status(&[]).await.unwrap_err();
    assert!(matches!(err, CoreError::LoginRequired { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_timeout_is_not_retried() {
    let (server, mut session, _) =
        setup_with(Some("GS308EP:sid1"), Duration::from_millis(200)).await;
    Mock::given(method("GET"))
        .and(path("/dashboard.cgi"))
        .respond_with(html(GS308EP_DASHBOARD).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let err = session
        .set_port_settings(&[1], PortSettingsChange::default())
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "expected a timeout, got {err:?}");
    assert!(!err.is_retryable());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_login_detects_and_persists_token() {
    let (server, mut session, store) = setup_with(None, Duration::from_secs(5)).await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(GS316EP_ROOT))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wmi/login"))
        .respond_with(html(GS316EP_LOGIN))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/redirect.html"))
        .respond_with(html(GS316EP_LOGIN_SUCCESS))
        .mount(&server)
        .await;

    let model = session
        .login(&SecretString::from("secret".to_owned()))
        .await
        .unwrap();

    assert_eq!(model, SwitchModel::Gs316ep);
    assert_eq!(session.model(), Some(SwitchModel::Gs316ep));
    assert_eq!(
        store.load(&server.uri()).unwrap().as_deref(),
        Some("GS316EP:GKJHMNHMLLBMGHIOCKMLBFPLDPCAMFIN")
    );
}

#[tokio::test]
async fn test_declared_model_skips_detection() {
    let (server, session, store) = setup_with(None, Duration::from_secs(5)).await;
    let mut session = session.with_model(SwitchModel::Gs308epp);
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(GS316EP_ROOT))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/login.cgi"))
        .respond_with(html(GS30X_LOGIN))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login.cgi"))
        .respond_with(ResponseTemplate::new(200).insert_header("Set-Cookie", "SID=xyz;PATH=/"))
        .mount(&server)
        .await;

    session
        .login(&SecretString::from("secret".to_owned()))
        .await
        .unwrap();

    assert_eq!(
        store.load(&server.uri()).unwrap().as_deref(),
        Some("GS308EPP:xyz")
    );
}

#[tokio::test]
async fn test_debug_report_without_token_is_public_only() {
    let (server, mut session, _) = setup_with(None, Duration::from_secs(5)).await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(GS316EP_ROOT))
        .mount(&server)
        .await;

    let pages = session.debug_report().await;

    assert_eq!(pages.len(), 4);
    assert!(pages.iter().all(|p| !p.authenticated));
}
