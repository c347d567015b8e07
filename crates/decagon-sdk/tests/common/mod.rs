//! Common test utilities and fixtures for integration tests

#![allow(dead_code)]

use decagon_auth::FixedClock;
use decagon_rest::MockHttpTransport;
use decagon_sdk::{Event, EventReceiver, SessionClient};
use decagon_ws::{MockConnector, MockRemote};
use std::sync::Arc;
use std::sync::Once;
use std::time::Duration;

pub const BASE_URL: &str = "https://api.decagon.ai";
pub const TEAM_ID: &str = "team_42";
pub const SECRET: &str = "test-private-key";

/// Unix time the fixture clock starts at
pub const NOW: i64 = 1_700_000_000;

/// Inbound chat message frame
pub const CHAT_MESSAGE_FRAME: &str = r#"{"type":"chat_message","data":{"text":"hi"}}"#;

/// Inbound frame of a type the SDK does not model
pub const TYPING_FRAME: &str = r#"{"type":"typing","data":{"role":"AI"}}"#;

/// Sample conversation history response
pub const HISTORY_RESPONSE: &str = r#"{
    "messages": [
        {
            "id": 1,
            "conversation_id": "conv_1",
            "role": "USER",
            "text": "Where is my order?",
            "created_at": "2024-05-01T12:00:00Z",
            "time_ago": "2 minutes ago"
        },
        {
            "id": 2,
            "conversation_id": "conv_1",
            "role": "AI",
            "text": "Let me check that for you.",
            "created_at": "2024-05-01T12:00:05Z",
            "time_ago": "2 minutes ago",
            "sentiment": "neutral"
        }
    ],
    "destination": "AI"
}"#;

/// Sample chat completion response
pub const CHAT_COMPLETION_RESPONSE: &str = r#"{
    "events": [
        {"type": "chat_message", "role": "AI", "text": "Your order ships tomorrow."},
        {"type": "chat_message", "role": "AI", "text": "Anything else?", "channel": "web"}
    ]
}"#;

/// Everything a test needs to drive a client without network access
pub struct Harness {
    pub client: SessionClient,
    pub http: Arc<MockHttpTransport>,
    pub sockets: Arc<MockConnector>,
    pub clock: Arc<FixedClock>,
}

/// Build a client over mock transports and a fixed clock
pub fn harness() -> Harness {
    harness_with_secret(SECRET)
}

pub fn harness_with_secret(secret: &str) -> Harness {
    init_tracing();

    let http = Arc::new(MockHttpTransport::new());
    let sockets = Arc::new(MockConnector::new());
    let clock = Arc::new(FixedClock::new(NOW));

    let client = SessionClient::builder(BASE_URL, TEAM_ID, secret)
        .with_http_transport(http.clone())
        .with_connector(sockets.clone())
        .with_clock(clock.clone())
        .build()
        .expect("valid test configuration");

    Harness {
        client,
        http,
        sockets,
        clock,
    }
}

/// Connect and complete the handshake
pub async fn open(harness: &Harness, subject_id: &str) -> (EventReceiver, MockRemote) {
    let mut events = harness
        .client
        .connect(subject_id, Some("conv_1"))
        .await
        .expect("connect");
    let remote = harness.sockets.last_remote().expect("transport created");
    remote.open();
    assert_eq!(next_event(&mut events).await, Event::Opened);
    (events, remote)
}

/// Next event, failing the test instead of hanging
pub async fn next_event(events: &mut EventReceiver) -> Event {
    tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("event within timeout")
        .expect("event channel open")
}

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
