//! Push channel: persistent websocket delivering server-initiated updates.

use futures::StreamExt;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::Duration;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::api::types::{Stats, StatusSnapshot};
use crate::constants::{PUSH_RECONNECT_INITIAL_SECS, PUSH_RECONNECT_MAX_SECS};

/// Events delivered by the push channel.
#[derive(Debug)]
pub enum PushEvent {
    Connected,
    Disconnected,
    /// A `status_update` message; `running` is implicitly true.
    Status(StatusSnapshot),
    /// A `webhook_processing` message flipped the transient flag.
    WebhookProcessing(bool),
}

/// Spawn the push listener; it reconnects forever with capped backoff.
pub fn spawn_push_channel(url: String) -> mpsc::Receiver<PushEvent> {
    let (tx, rx) = mpsc::channel(64);
    tokio::spawn(push_loop(url, tx));
    rx
}

async fn push_loop(url: String, tx: mpsc::Sender<PushEvent>) {
    let mut backoff = Duration::from_secs(PUSH_RECONNECT_INITIAL_SECS);
    loop {
        let (mut ws, _) = match connect_async(url.clone()).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("push connect failed: {}", err);
                tokio::time::sleep(backoff).await;
                backoff = next_backoff(backoff);
                continue;
            }
        };
        backoff = Duration::from_secs(PUSH_RECONNECT_INITIAL_SECS);
        if tx.send(PushEvent::Connected).await.is_err() {
            return;
        }

        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    if let Some(event) = parse_push_event(&text) {
                        if tx.send(event).await.is_err() {
                            return;
                        }
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(_)) | None => break,
            }
        }

        if tx.send(PushEvent::Disconnected).await.is_err() {
            return;
        }
        let _ = ws.close(None).await;
        tokio::time::sleep(backoff).await;
        backoff = next_backoff(backoff);
    }
}

fn next_backoff(current: Duration) -> Duration {
    (current + current).min(Duration::from_secs(PUSH_RECONNECT_MAX_SECS))
}

#[derive(Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: Value,
}

#[derive(Deserialize)]
struct StatusUpdate {
    #[serde(default)]
    status: String,
    #[serde(default)]
    stats: Option<Stats>,
}

#[derive(Deserialize)]
struct WebhookProcessing {
    status: String,
}

/// Parse one text frame. Unknown or malformed events are dropped.
fn parse_push_event(text: &str) -> Option<PushEvent> {
    let envelope: Envelope = serde_json::from_str(text).ok()?;
    match envelope.event.as_str() {
        "status_update" => {
            let update: StatusUpdate = serde_json::from_value(envelope.data).ok()?;
            Some(PushEvent::Status(StatusSnapshot {
                running: true,
                status: update.status,
                stats: update.stats,
            }))
        }
        "webhook_processing" => {
            let payload: WebhookProcessing = serde_json::from_value(envelope.data).ok()?;
            match payload.status.as_str() {
                "processing" => Some(PushEvent::WebhookProcessing(true)),
                "complete" => Some(PushEvent::WebhookProcessing(false)),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_update_implies_running() {
        let text = r#"{
            "event": "status_update",
            "data": {"status": "Idle", "stats": {"next_check": "14:30:00"}}
        }"#;
        let Some(PushEvent::Status(snapshot)) = parse_push_event(text) else {
            panic!("expected status event");
        };
        assert!(snapshot.running);
        assert_eq!(snapshot.status, "Idle");
        assert_eq!(
            snapshot.stats.unwrap().next_check.as_deref(),
            Some("14:30:00")
        );
    }

    #[test]
    fn webhook_processing_toggles_flag() {
        let start = r#"{"event": "webhook_processing", "data": {"status": "processing"}}"#;
        assert!(matches!(
            parse_push_event(start),
            Some(PushEvent::WebhookProcessing(true))
        ));

        let done = r#"{"event": "webhook_processing", "data": {"status": "complete"}}"#;
        assert!(matches!(
            parse_push_event(done),
            Some(PushEvent::WebhookProcessing(false))
        ));
    }

    #[test]
    fn unknown_events_are_dropped() {
        assert!(parse_push_event(r#"{"event": "heartbeat", "data": {}}"#).is_none());
        assert!(parse_push_event("not json").is_none());
    }

    #[test]
    fn backoff_doubles_to_cap() {
        let mut delay = Duration::from_secs(PUSH_RECONNECT_INITIAL_SECS);
        for _ in 0..10 {
            delay = next_backoff(delay);
        }
        assert_eq!(delay, Duration::from_secs(PUSH_RECONNECT_MAX_SECS));
    }
}
