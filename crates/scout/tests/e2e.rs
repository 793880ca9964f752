// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: the terminal widget talking to a live gateway.
//!
//! Each test binds the gateway router on an ephemeral port with a scripted
//! model and temp SQLite, then drives it through `WidgetSession` over HTTP.

use std::sync::Arc;
use std::time::{Duration, Instant};

use scout_agent::{Orchestrator, OrchestratorConfig};
use scout_core::types::{ContentPart, LeadStatus, Sender};
use scout_core::{LeadStore, PluginAdapter, TranscriptStore};
use scout_gateway::{AppState, GatewayConfig, HealthState, router};
use scout_test_utils::TestHarness;
use scout_widget::{GatewayClient, StateStore, WidgetSession};
use serde_json::json;

struct Running {
    harness: TestHarness,
    base_url: String,
    state_dir: tempfile::TempDir,
}

impl Running {
    async fn start() -> Self {
        let harness = TestHarness::new().await.unwrap();
        let orchestrator = Arc::new(Orchestrator::new(
            Arc::new(harness.model.clone()),
            harness.storage.clone(),
            harness.storage.clone(),
            OrchestratorConfig::from_config(&harness.config),
        ));
        let state = AppState {
            orchestrator,
            leads: harness.storage.clone(),
            transcripts: harness.storage.clone(),
            ingestor: harness.ingestor(),
            health: HealthState {
                start_time: Instant::now(),
                components: vec![harness.storage.clone() as Arc<dyn PluginAdapter>],
            },
        };
        let app = router(state, &GatewayConfig::from_config(&harness.config));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            harness,
            base_url: format!("http://{addr}"),
            state_dir: tempfile::tempdir().unwrap(),
        }
    }

    fn widget(&self) -> WidgetSession {
        let client = GatewayClient::new(self.base_url.clone()).unwrap();
        let store = StateStore::new(self.state_dir.path().join("widget.json"));
        WidgetSession::new(client, store, self.harness.config.chat.greeting.clone())
    }

    /// Transcript writes happen in the background; poll until `len` turns land.
    async fn wait_for_transcript(&self, session_id: &str, len: usize) {
        for _ in 0..100 {
            let turns = self.harness.storage.transcript(session_id).await.unwrap();
            if turns.len() >= len {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("transcript for {session_id} never reached {len} turns");
    }
}

#[tokio::test]
async fn conversation_captures_and_finalizes_lead() {
    let running = Running::start().await;
    let model = &running.harness.model;

    model
        .push_tool_call("updateLead", json!({ "name": "Dana", "city": "Sacramento" }))
        .await;
    model.push_text("Thanks Dana! What's the best number to reach you?").await;
    model
        .push_tool_call("updateLead", json!({ "phone": "916-555-0100" }))
        .await;
    model
        .push_tool_call("finalizeLead", json!({ "finalNote": "Ants in kitchen" }))
        .await;
    // Summarizer call made by finalizeLead.
    model.push_text("- Ants in the kitchen, Sacramento").await;
    model.push_text("You're all set. A specialist will call you soon.").await;

    let mut widget = running.widget().with_user_name(Some("Dana".into()));
    let first = widget
        .send("Hi, I'm Dana in Sacramento and I have ants")
        .await
        .unwrap();
    assert_eq!(first, "Thanks Dana! What's the best number to reach you?");
    let session_id = widget.session_id().unwrap().to_string();

    let lead = running.harness.storage.get_lead(&session_id).await.unwrap().unwrap();
    assert_eq!(lead.name.as_deref(), Some("Dana"));
    assert_eq!(lead.city.as_deref(), Some("Sacramento"));
    assert_eq!(lead.status, LeadStatus::Open);

    let second = widget.send("916-555-0100").await.unwrap();
    assert_eq!(second, "You're all set. A specialist will call you soon.");

    let lead = running.harness.storage.get_lead(&session_id).await.unwrap().unwrap();
    assert_eq!(lead.phone.as_deref(), Some("916-555-0100"));
    assert_eq!(lead.status, LeadStatus::Completed);
    assert_eq!(
        lead.summary.as_deref(),
        Some("- Ants in the kitchen, Sacramento")
    );
    assert_eq!(lead.notes.as_deref(), Some("Ants in kitchen"));

    // Greeting plus two user/assistant pairs.
    running.wait_for_transcript(&session_id, 5).await;
}

#[tokio::test]
async fn restarted_widget_resumes_from_server_transcript() {
    let running = Running::start().await;
    running.harness.model.push_text("Where have you seen them?").await;

    let mut widget = running.widget();
    widget.send("I think I have mice").await.unwrap();
    let session_id = widget.session_id().unwrap().to_string();
    running.wait_for_transcript(&session_id, 3).await;

    let mut resumed = running.widget();
    assert!(resumed.restore().await.unwrap());
    assert_eq!(resumed.session_id(), Some(session_id.as_str()));

    let messages = resumed.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].sender, Sender::Bot);
    assert_eq!(messages[1].content, "I think I have mice");
    assert_eq!(messages[2].content, "Where have you seen them?");
}

#[tokio::test]
async fn uploaded_photo_reaches_the_model() {
    let running = Running::start().await;
    running.harness.model.push_text("That looks like a carpenter ant.").await;

    let photo = running.state_dir.path().join("ant.png");
    std::fs::write(&photo, b"\x89PNG\r\n\x1a\nfake").unwrap();

    let mut widget = running.widget();
    let uploaded = widget.upload(&photo).await.unwrap();
    assert_eq!(uploaded.content_type, "image/png");
    assert!(uploaded.url.ends_with("-ant.png"));

    let reply = widget.send("").await.unwrap();
    assert_eq!(reply, "That looks like a carpenter ant.");

    let requests = running.harness.model.requests().await;
    let last = requests[0].messages.last().unwrap();
    assert!(last.parts.contains(&ContentPart::Image {
        url: uploaded.url.clone()
    }));
}
