mod common;

use common::{controller_for, controller_with_url, unreachable_url};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wvguard_license::{ActivationResult, LicenseAction, LicenseError, LicenseState, RowDecision, RowMeta};

// ── check_requirement ────────────────────────────────────────────

#[tokio::test]
async fn requirement_false_leaves_controller_inert() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("action", "get_metadata"))
        .and(query_param("license_key", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"license_required": false})))
        .expect(1)
        .mount(&server)
        .await;

    let (mut controller, _) = controller_for(&server);
    assert!(!controller.check_requirement().await.unwrap());
    assert!(!controller.is_active());
}

#[tokio::test]
async fn requirement_true_activates_controller() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("action", "get_metadata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"license_required": true})))
        .mount(&server)
        .await;

    let (mut controller, _) = controller_for(&server);
    assert!(controller.check_requirement().await.unwrap());
    assert!(controller.is_active());
}

#[tokio::test]
async fn requirement_sends_placeholder_even_when_licensed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("action", "get_metadata"))
        .and(query_param("license_key", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"license_required": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let (mut controller, store) = controller_for(&server);
    store.set("demo", "AAAA-1111-2222-3333").unwrap();
    assert!(controller.check_requirement().await.unwrap());
}

#[tokio::test]
async fn requirement_malformed_body_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let (mut controller, _) = controller_for(&server);
    let err = controller.check_requirement().await.unwrap_err();
    assert!(matches!(err, LicenseError::Protocol(_)));
    assert!(!controller.is_active());
}

// ── activate ─────────────────────────────────────────────────────

#[tokio::test]
async fn activate_success_stores_key_and_masks_it() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("action", "activate"))
        .and(query_param("license_key", "AAAA-1111-2222-3333"))
        .and(query_param("plugin_slug", "demo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "license_key": "AAAA-1111-2222-3333",
            "message": "ok"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (mut controller, store) = controller_for(&server);
    let result = controller.activate("AAAA-1111-2222-3333", "demo").await.unwrap();

    match &result {
        ActivationResult::Success { license_key, metadata } => {
            assert_eq!(license_key, "AAAA-1111-2222-3333");
            assert_eq!(metadata.message().as_deref(), Some("ok"));
        }
        ActivationResult::Failure { message } => panic!("unexpected failure: {message}"),
    }
    assert_eq!(store.get("demo").unwrap().as_deref(), Some("AAAA-1111-2222-3333"));
    assert!(controller.status().unwrap());
    assert_eq!(controller.display_key(true).unwrap(), "AAAA-****-****-****");
    assert_eq!(controller.display_key(false).unwrap(), "AAAA-1111-2222-3333");
}

#[tokio::test]
async fn activate_rejection_clears_previous_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("action", "activate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "invalid key"})))
        .mount(&server)
        .await;

    let (mut controller, store) = controller_for(&server);
    store.set("demo", "OLD-0000-0000-0000").unwrap();

    let result = controller.activate("BAD-KEY", "demo").await.unwrap();

    assert_eq!(
        result,
        ActivationResult::Failure {
            message: "invalid key".to_string()
        }
    );
    assert_eq!(store.get("demo").unwrap(), None);
    assert!(!controller.status().unwrap());
}

#[tokio::test]
async fn activate_null_license_key_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "license_key": null,
            "message": "expired"
        })))
        .mount(&server)
        .await;

    let (mut controller, _) = controller_for(&server);
    let result = controller.activate("AAAA-1111-2222-3333", "demo").await.unwrap();
    assert!(!result.is_success());
    let err = result.into_result().unwrap_err();
    assert!(matches!(err, LicenseError::Validation(ref m) if m == "expired"));
}

#[tokio::test]
async fn activate_rejection_without_message_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let (mut controller, _) = controller_for(&server);
    let result = controller.activate("X", "demo").await.unwrap();
    match result {
        ActivationResult::Failure { message } => assert!(!message.is_empty()),
        ActivationResult::Success { .. } => panic!("expected failure"),
    }
}

#[tokio::test]
async fn activate_overwrites_slug_for_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("plugin_slug", "other"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"license_key": "K-1-2-3"})))
        .expect(1)
        .mount(&server)
        .await;

    let (mut controller, store) = controller_for(&server);
    controller.activate("K-1-2-3", "other").await.unwrap();

    assert_eq!(controller.plugin_slug(), "other");
    assert_eq!(store.get("other").unwrap().as_deref(), Some("K-1-2-3"));
    assert_eq!(store.get("demo").unwrap(), None);
}

#[tokio::test]
async fn activate_network_failure_keeps_stored_key() {
    let (mut controller, store) = controller_with_url(&unreachable_url());
    store.set("demo", "OLD-0000-0000-0000").unwrap();

    let result = controller.activate("NEW-1111-2222-3333", "demo").await.unwrap();

    match result {
        ActivationResult::Failure { message } => assert!(message.contains("network error")),
        ActivationResult::Success { .. } => panic!("expected failure"),
    }
    assert_eq!(store.get("demo").unwrap().as_deref(), Some("OLD-0000-0000-0000"));
}

#[tokio::test]
async fn activate_protocol_failure_reported_as_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let (mut controller, _) = controller_for(&server);
    let result = controller.activate("K", "demo").await.unwrap();
    match result {
        ActivationResult::Failure { message } => assert!(message.contains("protocol error")),
        ActivationResult::Success { .. } => panic!("expected failure"),
    }
}

// ── deactivate ───────────────────────────────────────────────────

#[tokio::test]
async fn deactivate_without_key_makes_no_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let (mut controller, store) = controller_for(&server);
    assert!(!controller.deactivate().await.unwrap());
    assert_eq!(store.get("demo").unwrap(), None);
}

#[tokio::test]
async fn deactivate_clears_key_whatever_the_answer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("action", "deactivate"))
        .and(query_param("license_key", "AAAA-1111-2222-3333"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false, "message": "unknown license"})))
        .expect(1)
        .mount(&server)
        .await;

    let (mut controller, store) = controller_for(&server);
    store.set("demo", "AAAA-1111-2222-3333").unwrap();

    assert!(controller.deactivate().await.unwrap());
    assert!(!controller.status().unwrap());
    assert_eq!(store.get("demo").unwrap(), None);
}

#[tokio::test]
async fn deactivate_network_failure_keeps_key() {
    let (mut controller, store) = controller_with_url(&unreachable_url());
    store.set("demo", "AAAA-1111-2222-3333").unwrap();

    let err = controller.deactivate().await.unwrap_err();
    assert!(matches!(err, LicenseError::Network(_)));
    assert!(controller.status().unwrap());
}

#[tokio::test]
async fn empty_stored_key_counts_as_unlicensed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let (mut controller, store) = controller_for(&server);
    store.set("demo", "").unwrap();
    assert!(!controller.status().unwrap());
    assert!(!controller.deactivate().await.unwrap());
}

// ── Presentation ─────────────────────────────────────────────────

#[tokio::test]
async fn state_tracks_store_and_form() {
    let server = MockServer::start().await;
    let (controller, store) = controller_for(&server);

    assert_eq!(controller.state(false).unwrap(), LicenseState::Unlicensed);
    assert_eq!(controller.state(true).unwrap(), LicenseState::ActivationPending);
    store.set("demo", "AAAA-1111-2222-3333").unwrap();
    assert_eq!(controller.state(true).unwrap(), LicenseState::Licensed);
}

#[tokio::test]
async fn decide_uses_status() {
    let server = MockServer::start().await;
    let (controller, store) = controller_for(&server);

    assert_eq!(
        controller.decide("demo/demo.php", Some(LicenseAction::Activate)).unwrap(),
        RowDecision::RenderActivationForm
    );
    store.set("demo", "AAAA-1111-2222-3333").unwrap();
    assert_eq!(
        controller.decide("demo/demo.php", Some(LicenseAction::Deactivate)).unwrap(),
        RowDecision::PerformDeactivation
    );
    assert_eq!(
        controller.decide("demo/demo.php", Some(LicenseAction::Activate)).unwrap(),
        RowDecision::NoOp
    );
}

#[tokio::test]
async fn row_meta_offers_activation_when_unlicensed() {
    let server = MockServer::start().await;
    let (controller, _) = controller_for(&server);

    let meta = controller.row_meta("demo/demo.php").unwrap();
    assert_eq!(
        meta,
        vec![RowMeta::Link {
            label: "Activate license".to_string(),
            href: "?license_action=activate&plugin=demo".to_string(),
        }]
    );
    assert!(controller.row_meta("other/other.php").unwrap().is_empty());
}

#[tokio::test]
async fn row_meta_shows_masked_key_when_licensed() {
    let server = MockServer::start().await;
    let (controller, store) = controller_for(&server);
    store.set("demo", "AAAA-1111-2222-3333").unwrap();

    let meta = controller.row_meta("demo/demo.php").unwrap();
    assert_eq!(meta.len(), 2);
    assert_eq!(
        meta[0],
        RowMeta::Link {
            label: "Deactivate license".to_string(),
            href: "?license_action=deactivate&plugin=demo".to_string(),
        }
    );
    assert_eq!(
        meta[1],
        RowMeta::Text {
            text: "AAAA-****-****-****".to_string()
        }
    );
}

#[tokio::test]
async fn update_metadata_url_carries_stored_key() {
    let (controller, store) = controller_with_url("https://license.test/v1");
    store.set("demo", "AAAA-1111-2222-3333").unwrap();

    let url = controller.update_metadata_url().unwrap();
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert!(pairs.contains(&("action".to_string(), "get_metadata".to_string())));
    assert!(pairs.contains(&("license_key".to_string(), "AAAA-1111-2222-3333".to_string())));
    assert!(pairs.contains(&("domain".to_string(), "shop.example.com".to_string())));
}
