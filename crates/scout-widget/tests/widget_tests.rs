// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Widget session lifecycle tests against a mocked gateway.

use scout_core::types::Sender;
use scout_widget::{
    GatewayClient, IMAGE_ONLY_TEXT, REPLY_FAILED_TEXT, SESSION_FAILED_TEXT, StateStore,
    UPLOAD_FAILED_TEXT, WidgetMessage, WidgetSession, WidgetState,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GREETING: &str = "Hi there! I'm Scout.";

struct Fixture {
    server: MockServer,
    store: StateStore,
    dir: tempfile::TempDir,
}

impl Fixture {
    async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        Self {
            server: MockServer::start().await,
            store: StateStore::new(dir.path().join("widget.json")),
            dir,
        }
    }

    fn session(&self) -> WidgetSession {
        let client = GatewayClient::new(self.server.uri()).unwrap();
        WidgetSession::new(client, self.store.clone(), GREETING)
    }

    async fn mount_create_session(&self) {
        Mock::given(method("POST"))
            .and(path("/api/create-session"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    async fn mount_chat_reply(&self, reply: &str) {
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": reply,
                "shouldSaveToSheets": false
            })))
            .mount(&self.server)
            .await;
    }
}

#[tokio::test]
async fn init_persists_session_id() {
    let fx = Fixture::new().await;
    fx.mount_create_session().await;
    let mut session = fx.session();

    let id = session.init().await.unwrap();
    assert!(id.starts_with("session_"));
    assert_eq!(session.session_id(), Some(id.as_str()));

    // A second init reuses the registered session.
    assert_eq!(session.init().await.unwrap(), id);

    let state = fx.store.load().await.unwrap();
    assert_eq!(state.session_id.as_deref(), Some(id.as_str()));
}

#[tokio::test]
async fn first_send_starts_session_and_records_reply() {
    let fx = Fixture::new().await;
    fx.mount_create_session().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "message": "I have ants",
            "history": [{ "sender": "bot", "content": GREETING }],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Oh no! Where are they?",
            "shouldSaveToSheets": false
        })))
        .expect(1)
        .mount(&fx.server)
        .await;

    let mut session = fx.session().with_user_name(Some("Dana".into()));
    let reply = session.send("I have ants").await.unwrap();
    assert_eq!(reply, "Oh no! Where are they?");

    let senders: Vec<_> = session.messages().iter().map(|m| m.sender).collect();
    assert_eq!(senders, vec![Sender::Bot, Sender::User, Sender::Bot]);

    let state = fx.store.load().await.unwrap();
    let id = session.session_id().unwrap();
    assert_eq!(state.session_id.as_deref(), Some(id));
    assert_eq!(state.transcripts[id].len(), 3);
}

#[tokio::test]
async fn reset_clears_persisted_session() {
    let fx = Fixture::new().await;
    fx.mount_create_session().await;
    fx.mount_chat_reply("Got it").await;

    let mut session = fx.session();
    session.send("hello").await.unwrap();
    assert!(session.session_id().is_some());

    session.reset().await.unwrap();
    assert!(session.session_id().is_none());
    assert_eq!(session.messages().len(), 1);
    assert_eq!(session.messages()[0].content, GREETING);
    assert_eq!(fx.store.load().await.unwrap(), WidgetState::default());
}

#[tokio::test]
async fn restore_rehydrates_from_server() {
    let fx = Fixture::new().await;
    fx.store
        .save(&WidgetState {
            session_id: Some("session_1_restored0".into()),
            ..WidgetState::default()
        })
        .await
        .unwrap();
    Mock::given(method("GET"))
        .and(path("/api/get-chat-history"))
        .and(query_param("sessionId", "session_1_restored0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [
                { "role": "assistant", "content": GREETING },
                { "role": "user", "content": { "text": "see photo", "imageReference": "https://cdn/a.png" }, "timestamp": "2026-01-01T00:00:00.000Z" },
                { "role": "assistant", "content": "Those are termites." }
            ]
        })))
        .mount(&fx.server)
        .await;

    let mut session = fx.session();
    assert!(session.restore().await.unwrap());
    assert_eq!(session.session_id(), Some("session_1_restored0"));

    let messages = session.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].sender, Sender::User);
    assert_eq!(messages[1].image_reference.as_deref(), Some("https://cdn/a.png"));
    assert_eq!(messages[1].timestamp, "2026-01-01T00:00:00.000Z");
    assert_eq!(messages[2].content, "Those are termites.");
}

#[tokio::test]
async fn restore_falls_back_to_local_cache() {
    let fx = Fixture::new().await;
    let mut state = WidgetState {
        session_id: Some("session_1_cached000".into()),
        ..WidgetState::default()
    };
    state.transcripts.insert(
        "session_1_cached000".into(),
        vec![
            WidgetMessage::new(Sender::Bot, GREETING, None),
            WidgetMessage::new(Sender::User, "mice", None),
        ],
    );
    fx.store.save(&state).await.unwrap();
    Mock::given(method("GET"))
        .and(path("/api/get-chat-history"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "messages": [] })))
        .mount(&fx.server)
        .await;

    let mut session = fx.session();
    assert!(session.restore().await.unwrap());
    assert_eq!(session.messages().len(), 2);
    assert_eq!(session.messages()[1].content, "mice");
}

#[tokio::test]
async fn restore_without_persisted_session() {
    let fx = Fixture::new().await;
    let mut session = fx.session();
    assert!(!session.restore().await.unwrap());
    assert_eq!(session.messages().len(), 1);
}

#[tokio::test]
async fn chat_failure_shows_apology() {
    let fx = Fixture::new().await;
    fx.mount_create_session().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Failed to process message",
            "response": "I apologize"
        })))
        .mount(&fx.server)
        .await;

    let mut session = fx.session();
    let reply = session.send("hello").await.unwrap();
    assert_eq!(reply, REPLY_FAILED_TEXT);
    assert_eq!(session.messages().last().unwrap().content, REPLY_FAILED_TEXT);
}

#[tokio::test]
async fn session_failure_skips_chat() {
    let fx = Fixture::new().await;
    Mock::given(method("POST"))
        .and(path("/api/create-session"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "Failed to create session" })))
        .mount(&fx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&fx.server)
        .await;

    let mut session = fx.session();
    let reply = session.send("hello").await.unwrap();
    assert_eq!(reply, SESSION_FAILED_TEXT);
}

#[tokio::test]
async fn empty_turn_is_rejected() {
    let fx = Fixture::new().await;
    let mut session = fx.session();
    assert!(session.send("   ").await.is_err());
    assert_eq!(session.messages().len(), 1);
}

#[tokio::test]
async fn uploaded_image_rides_along_with_next_turn() {
    let fx = Fixture::new().await;
    fx.mount_create_session().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "http://127.0.0.1:3000/media/pest-assessment-1-wasp.jpg",
            "filename": "wasp.jpg",
            "size": 4,
            "type": "image/jpeg"
        })))
        .expect(1)
        .mount(&fx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "message": IMAGE_ONLY_TEXT,
            "imageReference": "http://127.0.0.1:3000/media/pest-assessment-1-wasp.jpg"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "That looks like a paper wasp.",
            "shouldSaveToSheets": false
        })))
        .expect(1)
        .mount(&fx.server)
        .await;

    let file = fx.dir.path().join("wasp.jpg");
    std::fs::write(&file, b"jpeg").unwrap();

    let mut session = fx.session();
    let uploaded = session.upload(&file).await.unwrap();
    assert_eq!(uploaded.content_type, "image/jpeg");
    assert_eq!(session.pending_image(), Some(uploaded.url.as_str()));

    let reply = session.send("").await.unwrap();
    assert_eq!(reply, "That looks like a paper wasp.");
    assert!(session.pending_image().is_none());
    let user_turn = &session.messages()[1];
    assert_eq!(user_turn.content, IMAGE_ONLY_TEXT);
    assert_eq!(user_turn.image_reference.as_deref(), Some(uploaded.url.as_str()));
}

#[tokio::test]
async fn upload_failure_is_reported_in_chat() {
    let fx = Fixture::new().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error": "Only image and video files are allowed" })),
        )
        .mount(&fx.server)
        .await;

    let file = fx.dir.path().join("notes.pdf");
    std::fs::write(&file, b"%PDF").unwrap();

    let mut session = fx.session();
    let err = session.upload(&file).await.unwrap_err();
    assert!(err.to_string().contains("Only image and video files are allowed"));
    assert!(session.pending_image().is_none());
    assert_eq!(session.messages().last().unwrap().content, UPLOAD_FAILED_TEXT);
}
