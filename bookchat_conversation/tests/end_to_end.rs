//! Widget + HTTP transport against an in-process backend.

use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use bookchat_conversation::{ChatWidget, SubmitOutcome, WidgetConfig};
use bookchat_core::{AskError, Sender};
use bookchat_providers::HttpTransport;
use serde_json::{Value, json};

async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve test backend");
    });
    format!("http://{addr}")
}

fn widget(base: &str) -> ChatWidget<HttpTransport> {
    let transport = HttpTransport::new(Duration::from_secs(5)).expect("build transport");
    ChatWidget::new(WidgetConfig::default().with_api_base_url(base), transport)
}

#[tokio::test]
async fn answered_question_is_appended_after_the_user_turn() {
    let router = Router::new().route(
        "/ask",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body, json!({"question": "What is chapter 2 about?"}));
            Json(json!({
                "answer": "Chapter 2 covers kinematics.",
                "source_chunks": ["Kinematics describes motion..."],
            }))
        }),
    );
    let base = spawn_backend(router).await;
    let widget = widget(&base);

    let outcome = widget.submit("What is chapter 2 about?").await;

    assert!(matches!(outcome, SubmitOutcome::Answered(_)));
    let state = widget.snapshot();
    assert!(!state.pending);
    let tail: Vec<(Sender, &str)> = state.messages[state.messages.len() - 2..]
        .iter()
        .map(|m| (m.sender, m.text.as_str()))
        .collect();
    assert_eq!(
        tail,
        vec![
            (Sender::User, "What is chapter 2 about?"),
            (Sender::Assistant, "Chapter 2 covers kinematics."),
        ]
    );
}

#[tokio::test]
async fn server_error_yields_fallback_and_last_error() {
    let router = Router::new().route(
        "/ask",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = spawn_backend(router).await;
    let widget = widget(&format!("{base}/"));

    widget.submit("What is chapter 2 about?").await;

    let state = widget.snapshot();
    assert!(!state.pending);
    assert_eq!(
        state.last_message().map(|m| m.text.as_str()),
        Some(widget.config().fallback_message.as_str())
    );
    assert!(matches!(
        state.last_error,
        Some(AskError::Server { status: 500, .. })
    ));
    assert!(
        !state.messages.iter().any(|m| m.text.contains("boom")),
        "failure detail must not be rendered"
    );
}

#[tokio::test]
async fn legacy_response_field_is_rendered() {
    let router = Router::new().route(
        "/ask",
        post(|| async { Json(json!({"response": "Legacy answer", "sources": []})) }),
    );
    let base = spawn_backend(router).await;
    let widget = widget(&base);

    widget.submit("hi").await;

    assert_eq!(
        widget.snapshot().last_message().map(|m| m.text.as_str()),
        Some("Legacy answer")
    );
}
