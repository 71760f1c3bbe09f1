//! API integration tests.
//!
//! These tests drive the router directly: the operational endpoints and the
//! signed interaction webhook.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use jobwatch::api::{ApiState, SignatureVerifier, build_router};
use jobwatch::{
    CommandHandler, Dispatcher, InMemoryStore, Scheduler, SearchCycle, StateStore,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use crate::common::{
    RecordingChannel, ScriptedSource, body_json, job, signed_interaction, signing_key,
};

struct TestApp {
    state: ApiState,
    store: Arc<InMemoryStore>,
    channel: Arc<RecordingChannel>,
}

/// Build API state over in-memory components with a running scheduler.
async fn create_test_app() -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let channel = Arc::new(RecordingChannel::default());
    let source = Arc::new(ScriptedSource::default().with(
        "system administrator",
        vec![job("42", "Linux System Administrator").with_company("Acme")],
    ));
    let dispatcher = Arc::new(Dispatcher::new(channel.clone()));
    let cycle = Arc::new(SearchCycle::new(store.clone(), source, dispatcher.clone()));
    let commands = Arc::new(CommandHandler::new(store.clone(), dispatcher));

    let now = Utc.with_ymd_and_hms(2024, 1, 15, 6, 0, 0).unwrap();
    let (handle, _task) = Scheduler::new(cycle, store.clone(), "Europe/Berlin")
        .start_at(now)
        .await
        .unwrap();

    let state = ApiState {
        handle,
        commands,
        verifier: Some(Arc::new(SignatureVerifier::new(
            signing_key().verifying_key(),
        ))),
    };

    TestApp {
        state,
        store,
        channel,
    }
}

fn command(name: &str, options: Value) -> Value {
    json!({"type": 2, "id": "1", "data": {"name": name, "options": options}})
}

fn button(custom_id: &str) -> Value {
    json!({"type": 3, "id": "2", "data": {"custom_id": custom_id, "component_type": 2}})
}

async fn interact(state: &ApiState, body: Value) -> Value {
    let response = build_router(state.clone())
        .oneshot(signed_interaction(&signing_key(), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

/// Test: Health endpoint responds with status ok.
#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app().await;

    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let response = build_router(app.state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

/// Test: Scheduler state reports the next fire in UTC.
#[tokio::test]
async fn test_scheduler_state_endpoint() {
    let app = create_test_app().await;

    let request = Request::builder()
        .uri("/api/scheduler/state")
        .body(Body::empty())
        .unwrap();
    let response = build_router(app.state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["state"], "waiting_for_fire");
    // 12:00 Berlin in January.
    assert_eq!(json["next_fire"], "2024-01-15T11:00:00Z");
    assert!(json["last_cycle"].is_null());
}

/// Test: Manual trigger runs a cycle and returns its report.
#[tokio::test]
async fn test_trigger_cycle_endpoint() {
    let app = create_test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/cycle/trigger")
        .body(Body::empty())
        .unwrap();
    let response = build_router(app.state.clone())
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["fetched"], 1);
    assert_eq!(json["new_jobs"], 1);
    assert_eq!(json["published"], 1);
    assert_eq!(app.channel.contents().len(), 1);
}

/// Test: PING is answered with PONG.
#[tokio::test]
async fn test_ping_interaction() {
    let app = create_test_app().await;
    let json = interact(&app.state, json!({"type": 1})).await;
    assert_eq!(json, json!({"type": 1}));
}

/// Test: A request with a bad signature is rejected.
#[tokio::test]
async fn test_invalid_signature_is_unauthorized() {
    let app = create_test_app().await;
    let mut request = signed_interaction(&signing_key(), &json!({"type": 1}));
    request
        .headers_mut()
        .insert(jobwatch::api::TIMESTAMP_HEADER, "1700000001".parse().unwrap());

    let response = build_router(app.state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Test: A request without signature headers is rejected.
#[tokio::test]
async fn test_unsigned_request_is_unauthorized() {
    let app = create_test_app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/interactions")
        .body(Body::from(r#"{"type":1}"#))
        .unwrap();

    let response = build_router(app.state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Test: Interactions are refused when no public key is configured.
#[tokio::test]
async fn test_interactions_disabled_without_key() {
    let mut app = create_test_app().await;
    app.state.verifier = None;

    let response = build_router(app.state)
        .oneshot(signed_interaction(&signing_key(), &json!({"type": 1})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

/// Test: config followed by show_config reflects the new values; replies are
/// private.
#[tokio::test]
async fn test_config_and_show_config_commands() {
    let app = create_test_app().await;

    let saved = interact(
        &app.state,
        command(
            "config",
            json!([
                {"name": "location", "type": 3, "value": "Bamberg"},
                {"name": "radius", "type": 4, "value": 30},
                {"name": "keywords", "type": 3, "value": "devops, sre"}
            ]),
        ),
    )
    .await;
    assert_eq!(saved["type"], 4);
    assert_eq!(saved["data"]["content"], "✅ Configuration saved.");
    assert_eq!(saved["data"]["flags"], 64);

    let shown = interact(&app.state, command("show_config", json!([]))).await;
    assert_eq!(
        shown["data"]["content"],
        "📍 Location: Bamberg\n📏 Radius: 30 km\n🔍 Keywords: devops, sre\n🧭 Work type: all\n⏰ Execution time: 12:00"
    );
}

/// Test: set_time validates and normalizes the time.
#[tokio::test]
async fn test_set_time_command() {
    let app = create_test_app().await;

    let bad = interact(
        &app.state,
        command("set_time", json!([{"name": "time", "type": 3, "value": "25:00"}])),
    )
    .await;
    assert_eq!(
        bad["data"]["content"],
        "❌ Invalid format. Use HH:MM (e.g. 08:00)."
    );

    let good = interact(
        &app.state,
        command("set_time", json!([{"name": "time", "type": 3, "value": "7:30"}])),
    )
    .await;
    assert_eq!(good["data"]["content"], "✅ Time set to 07:30.");
    assert_eq!(app.store.load_config().await.unwrap().execution_time, "07:30");
}

/// Test: Save on a published job appends it; favorites lists it.
#[tokio::test]
async fn test_save_button_then_favorites() {
    let app = create_test_app().await;
    app.state.handle.trigger_now().await.unwrap();

    let saved = interact(&app.state, button("save:42")).await;
    assert_eq!(saved["data"]["content"], "✅ Job saved!");

    let favorites = interact(&app.state, command("favorites", json!([]))).await;
    assert_eq!(
        favorites["data"]["content"],
        "💼 **Linux System Administrator**\n🏢 Acme\n📍 Unknown location\n🔗 https://jobs.test/42"
    );

    let cleared = interact(&app.state, command("clear_favorites", json!([]))).await;
    assert_eq!(cleared["data"]["content"], "🧹 All saved jobs have been cleared.");
    assert!(app.store.list_saved().await.unwrap().is_empty());
}

/// Test: A button press runs end to end through the router and answers with
/// a private channel message.
#[tokio::test]
async fn test_button_press_through_router() {
    let app = create_test_app().await;
    app.state.handle.trigger_now().await.unwrap();
    assert_eq!(app.channel.contents().len(), 1);

    let response = build_router(app.state.clone())
        .oneshot(signed_interaction(&signing_key(), &button("save:42")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["type"], 4);
    assert_eq!(json["data"]["flags"], 64);
    assert_eq!(json["data"]["content"], "✅ Job saved!");
    assert_eq!(app.store.list_saved().await.unwrap()[0].id.as_str(), "42");
}

/// Test: Skip replies without touching saved jobs; Save for an unknown job
/// is reported.
#[tokio::test]
async fn test_skip_and_unknown_save() {
    let app = create_test_app().await;

    let skipped = interact(&app.state, button("skip:42")).await;
    assert_eq!(skipped["data"]["content"], "⏩ Skipped.");

    let unknown = interact(&app.state, button("save:999")).await;
    assert_eq!(
        unknown["data"]["content"],
        "⚠️ This job is no longer available."
    );
    assert!(app.store.list_saved().await.unwrap().is_empty());
}

/// Test: export_favorites is a stub.
#[tokio::test]
async fn test_export_favorites_is_disabled() {
    let app = create_test_app().await;
    let json = interact(&app.state, command("export_favorites", json!([]))).await;
    assert_eq!(json["data"]["content"], "📎 Export is currently disabled.");
}

/// Test: Unknown interaction types are rejected.
#[tokio::test]
async fn test_unsupported_interaction_type() {
    let app = create_test_app().await;

    let response = build_router(app.state)
        .oneshot(signed_interaction(&signing_key(), &json!({"type": 4})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
