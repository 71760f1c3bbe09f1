//! Chat client tests against a local fake of the REST API.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{post, put};
use axum::{Json, Router};
use jobwatch::commands::definitions;
use jobwatch::dispatch::{ChannelError, ChatChannel, DiscordChannel, render_job_message};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

use crate::common::{job, serve};

#[derive(Default)]
struct Captured {
    messages: Vec<(String, Option<String>, Value)>,
    commands: Vec<(String, Value)>,
}

type Shared = Arc<Mutex<Captured>>;

async fn create_message(
    State(captured): State<Shared>,
    Path(channel_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    if channel_id == "forbidden" {
        return Err(StatusCode::FORBIDDEN);
    }
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    captured.lock().unwrap().messages.push((channel_id, auth, body));
    Ok(Json(json!({"id": "1"})))
}

async fn overwrite_commands(
    State(captured): State<Shared>,
    Path(application_id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    captured
        .lock()
        .unwrap()
        .commands
        .push((application_id, body.clone()));
    Json(body)
}

async fn fake_discord() -> (String, Shared) {
    let captured: Shared = Arc::new(Mutex::new(Captured::default()));
    let router = Router::new()
        .route("/channels/{channel_id}/messages", post(create_message))
        .route("/applications/{application_id}/commands", put(overwrite_commands))
        .with_state(Arc::clone(&captured));
    (serve(router).await, captured)
}

/// Test: A job message is posted to the configured channel with bot auth,
/// highlighted content and one row of Save/Skip buttons.
#[tokio::test]
async fn test_send_posts_message_with_buttons() {
    let (base, captured) = fake_discord().await;
    let channel = DiscordChannel::new(&base, "secret-token", "555").unwrap();
    let message = render_job_message(
        &job("4011", "Linux Systems Administrator").with_location("Coburg"),
        &["systems administrator"],
    );

    channel.send(&message).await.unwrap();

    let captured = captured.lock().unwrap();
    let (channel_id, auth, body) = &captured.messages[0];
    assert_eq!(channel_id, "555");
    assert_eq!(auth.as_deref(), Some("Bot secret-token"));
    assert_eq!(
        body["content"],
        "🏢 **Linux **Systems Administrator****\n📍 Coburg\n🔗 https://jobs.test/4011"
    );
    let buttons = &body["components"][0]["components"];
    assert_eq!(buttons[0]["custom_id"], "save:4011");
    assert_eq!(buttons[0]["label"], "💾 Save");
    assert_eq!(buttons[1]["custom_id"], "skip:4011");
    assert_eq!(body["allowed_mentions"]["parse"], json!([]));
}

/// Test: A rejected post is reported with its status.
#[tokio::test]
async fn test_send_reports_platform_status() {
    let (base, _) = fake_discord().await;
    let channel = DiscordChannel::new(&base, "secret-token", "forbidden").unwrap();
    let message = render_job_message(&job("1", "Admin"), &["admin"]);

    let result = channel.send(&message).await;

    assert!(matches!(result, Err(ChannelError::Status { status: 403, .. })));
}

/// Test: Slash-command sync overwrites every command in one request.
#[tokio::test]
async fn test_sync_commands_registers_all_definitions() {
    let (base, captured) = fake_discord().await;
    let channel = DiscordChannel::new(&base, "secret-token", "555").unwrap();

    let count = channel.sync_commands("app-1", &definitions()).await.unwrap();

    assert_eq!(count, 6);
    let captured = captured.lock().unwrap();
    let (application_id, body) = &captured.commands[0];
    assert_eq!(application_id, "app-1");
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "favorites",
            "clear_favorites",
            "export_favorites",
            "config",
            "show_config",
            "set_time"
        ]
    );
    assert_eq!(body[5]["options"][0]["name"], "time");
    assert_eq!(body[5]["options"][0]["required"], true);
}
